// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2024.

//! Shared kernel support for the Leo BSP.
//!
//! The kernel crate holds the code that every chip crate builds on: the
//! Hardware Interface Layer (HIL) traits that a generic pin-control framework
//! calls into, the standard [`ErrorCode`], the `debug!` output facility, the
//! device-tree node abstraction, and the register access utilities.
//!
//! Chip crates implement the HIL traits for their hardware. They do not
//! depend on each other.

#![no_std]

extern crate alloc;

pub mod debug;
pub mod errorcode;
pub mod hil;
pub mod of;
pub mod utilities;

pub use crate::errorcode::ErrorCode;

// This is used to run the tests on a host
#[cfg(test)]
#[macro_use]
extern crate std;
