// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2024.

//! Chip specific configuration.
//!
//! Options are collected in one `const` object so that every code path is
//! type-checked whatever the feature set, and disabled paths fold away. This
//! is the only place in the crate where Cargo features are read.

/// Compile-time configuration of the Leo pin controller.
pub struct Config {
    /// Print a debug line for every mux bit written and every GPIO claim.
    pub trace_pinmux: bool,

    /// Report overlapping `gpio-range` entries when the controller probes.
    ///
    /// Only a report. The first declared range still wins.
    pub debug_gpio_ranges: bool,

    /// Check every pin of a function before `set_mux` writes anything.
    ///
    /// When disabled, an out-of-range pin in the middle of a function leaves
    /// the pins before it already switched.
    pub validate_set_mux: bool,
}

pub const CONFIG: Config = Config {
    trace_pinmux: cfg!(feature = "trace_pinmux"),
    debug_gpio_ranges: cfg!(feature = "debug_gpio_ranges"),
    validate_set_mux: !cfg!(feature = "no_set_mux_validation"),
};
