// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2024.

//! Interfaces for pin controllers.
//!
//! A pin controller owns the pad multiplexing of a chip. It exposes *groups*
//! (named sets of pins that are configured together) and *functions* (named
//! mux settings that can be applied to groups). Both are addressed by a
//! selector, a small index handed out in creation order.
//!
//! The generic pin-control framework drives a controller through these
//! traits:
//!
//! 1. When a consumer asks for a named pinctrl state, the framework hands the
//!    state's device-tree node to [`PinctrlDt::dt_node_to_map`] and gets back
//!    a function and group selector.
//! 2. [`PinmuxOps::set_mux`] applies that function to the group.
//! 3. When a GPIO driver claims a line, the framework calls
//!    [`PinmuxOps::gpio_request_enable`] so the pad is muxed to GPIO.
//!
//! Selectors are stable for the life of the controller. There is no way to
//! unregister a single group or function.

use alloc::vec::Vec;
use core::fmt;

use crate::of::Node;
use crate::ErrorCode;

/// Group enumeration.
pub trait PinctrlOps<'a> {
    fn groups_count(&self) -> usize;

    /// Returns `INVAL` if `group` was never created.
    fn group_name(&self, group: usize) -> Result<&'a str, ErrorCode>;

    /// The pins covered by `group`. Returns `INVAL` if `group` was never
    /// created.
    fn group_pins(&self, group: usize) -> Result<Vec<u32>, ErrorCode>;
}

/// Function enumeration and mux selection.
pub trait PinmuxOps<'a> {
    fn functions_count(&self) -> usize;

    /// Returns `INVAL` if `function` was never created.
    fn function_name(&self, function: usize) -> Result<&'a str, ErrorCode>;

    /// Names of the groups `function` can be applied to.
    fn function_groups(&self, function: usize) -> Result<Vec<&'a str>, ErrorCode>;

    /// Apply `function` to `group`.
    fn set_mux(&self, function: usize, group: usize) -> Result<(), ErrorCode>;

    /// Mux `pin` for use as a GPIO line.
    ///
    /// Pins the controller knows nothing about are left alone and the call
    /// succeeds.
    fn gpio_request_enable(&self, pin: u32) -> Result<(), ErrorCode>;

    /// Called when a GPIO line on `pin` is released.
    fn gpio_disable_free(&self, _pin: u32) {}
}

/// Result of mapping one device-tree state node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PinctrlMap<'a> {
    /// Name of the state node the map was built from.
    pub name: &'a str,
    pub function: usize,
    pub group: usize,
}

/// Translation of device-tree pinctrl state nodes.
pub trait PinctrlDt<'a> {
    fn dt_node_to_map(&self, node: &Node<'a>) -> Result<PinctrlMap<'a>, ErrorCode>;
}

/// Operator introspection.
pub trait PinctrlDebug {
    /// Write a one line description of the current mux state of `pin`.
    fn pin_dbg_show(&self, pin: u32, out: &mut dyn fmt::Write) -> Result<(), ErrorCode>;
}

/// A complete pin controller.
pub trait Pinctrl<'a>: PinctrlOps<'a> + PinmuxOps<'a> + PinctrlDt<'a> + PinctrlDebug {
    /// Map a state node and apply it, as the framework does when a consumer
    /// selects a named state.
    fn apply_state(&self, node: &Node<'a>) -> Result<PinctrlMap<'a>, ErrorCode> {
        let map = self.dt_node_to_map(node)?;
        self.set_mux(map.function, map.group)?;
        Ok(map)
    }
}
