// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2024.

//! Peripheral implementations for the NationalChip Leo SoC family.
//!
//! Leo parts carry two CPU domains, an A7 application core and a CK
//! co-processor, each with its own pad multiplexer. Leo Mini is the reduced
//! pin-count variant. This crate provides the pin controller for all four
//! combinations.

#![no_std]

extern crate alloc;

pub mod chip_config;
pub mod gpio_range;
pub mod padmux;
pub mod padmux_sel;
pub mod pinctrl;

// This is used to run the tests on a host
#[cfg(test)]
#[macro_use]
extern crate std;
