// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2024.

//! Leo pin controller.
//!
//! Ties the pad multiplexer, the function registry and the GPIO fallback
//! ranges of one `pinctrl` device-tree node together and implements the
//! `kernel::hil::pinctrl` traits for them.
//!
//! Usage
//! -----
//!
//! ```rust,ignore
//! let pinctrl = unsafe { LeoPinctrl::probe_mmio(&PINCTRL_NODE) }?;
//! // A consumer selects its default state.
//! pinctrl.apply_state(PINCTRL_NODE.find_child("uart2").unwrap())?;
//! // The GPIO driver claims a line.
//! pinctrl.gpio_request_enable(5)?;
//! ```
//!
//! Every child of the controller node carrying a `pinmux` property is
//! registered at probe as a function and a pin group, both named after the
//! child's full node name (`i2c0@0`, not `i2c0`). The selector of both is the
//! registration order.

use alloc::vec;
use alloc::vec::Vec;
use core::fmt;

use kernel::hil::pinctrl::{Pinctrl, PinctrlDebug, PinctrlDt, PinctrlMap, PinctrlOps, PinmuxOps};
use kernel::of::{self, Node};
use kernel::ErrorCode;
use kernel::{debug, debug_verbose};
use spin::Mutex;

use crate::chip_config::CONFIG;
use crate::gpio_range::GpioRanges;
use crate::padmux::{Padmux, PadmuxMmio, PadmuxRegisterFile};
use crate::padmux_sel::{self, SocFamily};

pub const DRIVER_NAME: &str = "leo-pinctrl";

pub const OF_MATCH: [(&str, SocFamily); 2] = [
    ("nationalchip,leo-pinctrl", SocFamily::Leo),
    ("nationalchip,leo-mini-pinctrl", SocFamily::LeoMini),
];

const SECONDARY_DOMAIN_PROPERTY: &str = "is-secondary-domain";
const PINMUX_PROPERTY: &str = "pinmux";

/// A named list of `(pin, function value)` assignments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Function<'a> {
    name: &'a str,
    vals: Vec<(u32, u32)>,
    groups: Vec<&'a str>,
}

impl<'a> Function<'a> {
    pub fn name(&self) -> &'a str {
        self.name
    }

    pub fn vals(&self) -> &[(u32, u32)] {
        &self.vals
    }

    pub fn groups(&self) -> &[&'a str] {
        &self.groups
    }
}

/// The pins of one function.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PinGroup<'a> {
    name: &'a str,
    pins: Vec<u32>,
}

impl<'a> PinGroup<'a> {
    pub fn name(&self) -> &'a str {
        self.name
    }

    pub fn pins(&self) -> &[u32] {
        &self.pins
    }
}

/// Append-only store of functions and pin groups.
///
/// Each function comes with one group of the same name, so a function and
/// its group share a selector.
#[derive(Debug, Default)]
pub struct Registry<'a> {
    functions: Vec<Function<'a>>,
    groups: Vec<PinGroup<'a>>,
}

impl<'a> Registry<'a> {
    pub const fn new() -> Registry<'a> {
        Registry {
            functions: Vec::new(),
            groups: Vec::new(),
        }
    }

    /// Register `name` for the given assignments and return its selector.
    ///
    /// Pins are not checked against any table here; `set_mux` does that.
    pub fn add_function(&mut self, name: &'a str, vals: &[(u32, u32)]) -> usize {
        let selector = self.functions.len();
        self.groups.push(PinGroup {
            name,
            pins: vals.iter().map(|&(pin, _)| pin).collect(),
        });
        self.functions.push(Function {
            name,
            vals: vals.to_vec(),
            groups: vec![name],
        });
        selector
    }

    pub fn functions_count(&self) -> usize {
        self.functions.len()
    }

    pub fn groups_count(&self) -> usize {
        self.groups.len()
    }

    pub fn function(&self, selector: usize) -> Result<&Function<'a>, ErrorCode> {
        self.functions.get(selector).ok_or(ErrorCode::INVAL)
    }

    pub fn group(&self, selector: usize) -> Result<&PinGroup<'a>, ErrorCode> {
        self.groups.get(selector).ok_or(ErrorCode::INVAL)
    }

    pub fn function_selector(&self, name: &str) -> Option<usize> {
        self.functions.iter().position(|f| f.name == name)
    }

    pub fn group_selector(&self, name: &str) -> Option<usize> {
        self.groups.iter().position(|g| g.name == name)
    }
}

/// One Leo pad multiplexer instance.
pub struct LeoPinctrl<'a, F: PadmuxRegisterFile> {
    padmux: Padmux<F>,
    registry: Mutex<Registry<'a>>,
    gpio_ranges: GpioRanges,
}

impl<'a> LeoPinctrl<'a, PadmuxMmio> {
    /// Probe `node` and drive the register window named by its `reg`
    /// property.
    ///
    /// ## Safety
    ///
    /// The `reg` window of `node` must be the pad multiplexer and mapped for
    /// the rest of the program.
    pub unsafe fn probe_mmio(node: &Node<'a>) -> Result<Self, ErrorCode> {
        Self::probe(node, |base, size| PadmuxMmio::new(base, size))
    }
}

impl<'a, F: PadmuxRegisterFile> LeoPinctrl<'a, F> {
    /// Build a controller from its device-tree node.
    ///
    /// `map` turns the `reg` window into a register file. Every child state
    /// node with a `pinmux` property is registered before this returns.
    pub fn probe(
        node: &Node<'a>,
        map: impl FnOnce(usize, usize) -> F,
    ) -> Result<Self, ErrorCode> {
        let family = of::match_node(node, &OF_MATCH).ok_or(ErrorCode::NOSUPPORT)?;
        let secondary = node.read_bool(SECONDARY_DOMAIN_PROPERTY);
        let table = padmux_sel::select(family, secondary);

        let (base, size) = node.reg()?;
        let padmux = Padmux::new(table, map(base, size))?;

        let gpio_ranges = GpioRanges::from_node(node)?;
        if CONFIG.debug_gpio_ranges {
            for (first, second) in gpio_ranges.overlaps() {
                debug_verbose!(
                    "{}: gpio-range {} overlaps earlier range {}, range {} wins",
                    node.full_name(),
                    second,
                    first,
                    first
                );
            }
        }

        let pinctrl = LeoPinctrl {
            padmux,
            registry: Mutex::new(Registry::new()),
            gpio_ranges,
        };
        for state in node
            .children()
            .filter(|child| child.property(PINMUX_PROPERTY).is_some())
        {
            pinctrl.dt_node_to_map(state)?;
        }

        if CONFIG.trace_pinmux {
            debug!(
                "{}: {} with {} pins, {} states, {} gpio ranges",
                DRIVER_NAME,
                table.name(),
                table.len(),
                pinctrl.functions_count(),
                pinctrl.gpio_ranges.len()
            );
        }
        Ok(pinctrl)
    }

    pub fn padmux(&self) -> &Padmux<F> {
        &self.padmux
    }

    pub fn gpio_ranges(&self) -> &GpioRanges {
        &self.gpio_ranges
    }

    /// Register a function and its pin group. Returns the shared selector.
    pub fn add_function(&self, name: &'a str, vals: &[(u32, u32)]) -> usize {
        self.registry.lock().add_function(name, vals)
    }

    pub fn function_selector(&self, name: &str) -> Option<usize> {
        self.registry.lock().function_selector(name)
    }

    pub fn group_selector(&self, name: &str) -> Option<usize> {
        self.registry.lock().group_selector(name)
    }

    /// Mux `pin` to the function of the first GPIO range containing it.
    ///
    /// Pins outside every range are left alone.
    pub fn request_as_gpio(&self, pin: u32) -> Result<(), ErrorCode> {
        match self.gpio_ranges.find(pin) {
            Some(range) => {
                if CONFIG.trace_pinmux {
                    debug!(
                        "{}: gpio {} -> func {}",
                        DRIVER_NAME, pin, range.function
                    );
                }
                self.padmux.set_function(pin, range.function)
            }
            None => Ok(()),
        }
    }

    /// Current function value of `pin`, read back from the registers.
    pub fn dump_pin_state(&self, pin: u32) -> Result<u32, ErrorCode> {
        self.padmux.dump_pin_state(pin)
    }

    fn parse_state(node: &Node<'a>) -> Result<Vec<(u32, u32)>, ErrorCode> {
        let cells = node.read_u32_array(PINMUX_PROPERTY)?;
        if cells.len() % 2 != 0 {
            return Err(ErrorCode::SIZE);
        }
        if cells.len() == 0 {
            return Err(ErrorCode::INVAL);
        }
        let cells: Vec<u32> = cells.collect();
        Ok(cells
            .chunks_exact(2)
            .map(|pair| (pair[0], pair[1]))
            .collect())
    }
}

impl<'a, F: PadmuxRegisterFile> PinctrlOps<'a> for LeoPinctrl<'a, F> {
    fn groups_count(&self) -> usize {
        self.registry.lock().groups_count()
    }

    fn group_name(&self, group: usize) -> Result<&'a str, ErrorCode> {
        self.registry.lock().group(group).map(PinGroup::name)
    }

    fn group_pins(&self, group: usize) -> Result<Vec<u32>, ErrorCode> {
        self.registry
            .lock()
            .group(group)
            .map(|group| group.pins().to_vec())
    }
}

impl<'a, F: PadmuxRegisterFile> PinmuxOps<'a> for LeoPinctrl<'a, F> {
    fn functions_count(&self) -> usize {
        self.registry.lock().functions_count()
    }

    fn function_name(&self, function: usize) -> Result<&'a str, ErrorCode> {
        self.registry.lock().function(function).map(Function::name)
    }

    fn function_groups(&self, function: usize) -> Result<Vec<&'a str>, ErrorCode> {
        self.registry
            .lock()
            .function(function)
            .map(|function| function.groups().to_vec())
    }

    fn set_mux(&self, function: usize, group: usize) -> Result<(), ErrorCode> {
        let vals = {
            let registry = self.registry.lock();
            registry.group(group)?;
            registry.function(function)?.vals().to_vec()
        };
        if CONFIG.validate_set_mux {
            for &(pin, _) in &vals {
                self.padmux.selectors(pin)?;
            }
        }
        for (pin, value) in vals {
            self.padmux.set_function(pin, value)?;
        }
        Ok(())
    }

    fn gpio_request_enable(&self, pin: u32) -> Result<(), ErrorCode> {
        self.request_as_gpio(pin)
    }
}

impl<'a, F: PadmuxRegisterFile> PinctrlDt<'a> for LeoPinctrl<'a, F> {
    /// Register `node` as a function and group named after its full node
    /// name, unit address included.
    ///
    /// Mapping a node again returns the existing selector. A different
    /// `pinmux` list under a name already taken is `ALREADY`.
    fn dt_node_to_map(&self, node: &Node<'a>) -> Result<PinctrlMap<'a>, ErrorCode> {
        let name = node.full_name();
        let vals = Self::parse_state(node)?;
        let mut registry = self.registry.lock();
        let selector = match registry.function_selector(name) {
            Some(selector) if registry.function(selector)?.vals() == vals.as_slice() => selector,
            Some(_) => return Err(ErrorCode::ALREADY),
            None => registry.add_function(name, &vals),
        };
        Ok(PinctrlMap {
            name,
            function: selector,
            group: selector,
        })
    }
}

impl<F: PadmuxRegisterFile> PinctrlDebug for LeoPinctrl<'_, F> {
    fn pin_dbg_show(&self, pin: u32, out: &mut dyn fmt::Write) -> Result<(), ErrorCode> {
        let function = self.padmux.dump_pin_state(pin)?;
        write!(out, "{}: func {}", DRIVER_NAME, function).map_err(|_| ErrorCode::FAIL)
    }
}

impl<'a, F: PadmuxRegisterFile> Pinctrl<'a> for LeoPinctrl<'a, F> {}
