// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2024.

//! Pad multiplexer register access.
//!
//! [`Padmux`] resolves a pin and a 3-bit function value to the mux bits
//! listed in the pin's [`PadmuxSel`](crate::padmux_sel::PadmuxSel) row and
//! updates them with a read-modify-write of the owning register. Unrelated
//! pins share registers, so all accesses of one instance go through a single
//! lock, held for the whole pin update.
//!
//! The register file sits behind [`PadmuxRegisterFile`]. On hardware it is
//! [`PadmuxMmio`]; host tests use in-memory registers.

use kernel::debug;
use kernel::utilities::registers::interfaces::{Readable, Writeable};
use kernel::utilities::registers::{Field, FieldValue, LocalRegisterCopy, ReadWrite};
use kernel::utilities::StaticRef;
use kernel::ErrorCode;
use spin::Mutex;

use crate::chip_config::CONFIG;
use crate::padmux_sel::{PadmuxSel, PadmuxTable, Selector};

/// A linear array of 32-bit mux registers.
///
/// `index` must be below [`len`](PadmuxRegisterFile::len). [`Padmux::new`]
/// checks this once for a whole table; other callers check it themselves.
pub trait PadmuxRegisterFile: Send {
    /// Number of registers in the window.
    fn len(&self) -> usize;

    fn read(&self, index: usize) -> u32;

    fn write(&mut self, index: usize, value: u32);
}

/// Memory mapped mux registers.
pub struct PadmuxMmio {
    regs: StaticRef<[ReadWrite<u32>]>,
}

// The window is only reached through the `Padmux` lock.
unsafe impl Send for PadmuxMmio {}

impl PadmuxMmio {
    /// Map the register window `reg = <base size>`.
    ///
    /// ## Safety
    ///
    /// `base` must be the physical address of the pad multiplexer, mapped for
    /// the rest of the program, with at least `size` bytes of registers.
    pub unsafe fn new(base: usize, size: usize) -> PadmuxMmio {
        PadmuxMmio {
            regs: StaticRef::new_slice(base as *const ReadWrite<u32>, size / 4),
        }
    }
}

impl PadmuxRegisterFile for PadmuxMmio {
    fn len(&self) -> usize {
        self.regs.len()
    }

    fn read(&self, index: usize) -> u32 {
        debug_assert!(index < self.regs.len(), "mux register {} out of window", index);
        self.regs.get(index).map_or(0, |reg| reg.get())
    }

    fn write(&mut self, index: usize, value: u32) {
        debug_assert!(index < self.regs.len(), "mux register {} out of window", index);
        if let Some(reg) = self.regs.get(index) {
            reg.set(value);
        }
    }
}

/// The pad multiplexer of one controller instance.
pub struct Padmux<F: PadmuxRegisterFile> {
    table: &'static PadmuxTable,
    regs: Mutex<F>,
}

impl<F: PadmuxRegisterFile> Padmux<F> {
    /// Bind a selector table to a register file.
    ///
    /// Fails with `SIZE` if some selector of the table lies past the end of
    /// the register window.
    pub fn new(table: &'static PadmuxTable, regs: F) -> Result<Padmux<F>, ErrorCode> {
        if let Some((pin, sel)) = table.check(regs.len()) {
            debug!(
                "{}: pin {} selector {} outside {} mux registers",
                table.name(),
                pin,
                sel.index(),
                regs.len()
            );
            return Err(ErrorCode::SIZE);
        }
        Ok(Padmux {
            table,
            regs: Mutex::new(regs),
        })
    }

    pub fn table(&self) -> &'static PadmuxTable {
        self.table
    }

    /// Number of pins this instance controls.
    pub fn pin_count(&self) -> usize {
        self.table.len()
    }

    /// The selector row of `pin`, or `INVAL` for a pin the table lacks.
    pub fn selectors(&self, pin: u32) -> Result<&'static PadmuxSel, ErrorCode> {
        self.table.row(pin).ok_or(ErrorCode::INVAL)
    }

    /// Route `pin` to `function`.
    ///
    /// Bit `i` of `function` is written to the selector in slot `i`; absent
    /// slots and bits above the third are ignored. A pin without any
    /// selector is accepted and left alone. Pins past the end of the table
    /// return `INVAL` before any register is touched.
    pub fn set_function(&self, pin: u32, function: u32) -> Result<(), ErrorCode> {
        let row = self.selectors(pin)?;
        let mut regs = self.regs.lock();
        for (slot, sel) in row.slots().iter().enumerate() {
            if let Some(sel) = sel {
                let value = (function >> slot) & 1;
                write_bit(&mut *regs, *sel, value);
                if CONFIG.trace_pinmux {
                    debug!(
                        "{}: pin {} slot {} -> reg {} bit {} = {}",
                        self.table.name(),
                        pin,
                        slot,
                        sel.register_index(),
                        sel.bit(),
                        value
                    );
                }
            }
        }
        Ok(())
    }

    /// Read back the function value `pin` is currently routed to.
    ///
    /// Absent slots read as zero.
    pub fn dump_pin_state(&self, pin: u32) -> Result<u32, ErrorCode> {
        let row = self.selectors(pin)?;
        let regs = self.regs.lock();
        let function = row
            .slots()
            .iter()
            .enumerate()
            .fold(0, |acc, (slot, sel)| match sel {
                Some(sel) => acc | (read_bit(&*regs, *sel) << slot),
                None => acc,
            });
        Ok(function)
    }

    #[cfg(test)]
    pub(crate) fn with_registers<R>(&self, f: impl FnOnce(&mut F) -> R) -> R {
        f(&mut self.regs.lock())
    }
}

fn write_bit<F: PadmuxRegisterFile + ?Sized>(regs: &mut F, sel: Selector, value: u32) {
    let index = sel.register_index();
    let mut reg = LocalRegisterCopy::<u32>::new(regs.read(index));
    reg.modify(FieldValue::<u32, ()>::new(1, sel.bit(), value));
    regs.write(index, reg.get());
}

fn read_bit<F: PadmuxRegisterFile + ?Sized>(regs: &F, sel: Selector) -> u32 {
    let reg = LocalRegisterCopy::<u32>::new(regs.read(sel.register_index()));
    reg.read(Field::<u32, ()>::new(1, sel.bit()))
}


#[cfg(test)]
mod tests {
    use super::testing::FakeRegisters;
    use super::{Padmux, PadmuxMmio, PadmuxRegisterFile};
    use std::boxed::Box;
    use crate::padmux_sel::{LEO_A7, LEO_CK, LEO_MINI_A7};
    use kernel::ErrorCode;
    use std::vec::Vec;

    fn leo_a7() -> Padmux<FakeRegisters> {
        Padmux::new(&LEO_A7, FakeRegisters::new(LEO_A7.register_count())).unwrap()
    }

    fn snapshot(padmux: &Padmux<FakeRegisters>) -> Vec<u32> {
        padmux.with_registers(|regs| regs.snapshot())
    }

    fn write_count(padmux: &Padmux<FakeRegisters>) -> usize {
        padmux.with_registers(|regs| regs.writes().len())
    }

    #[test]
    fn window_must_cover_table() {
        assert!(Padmux::new(&LEO_A7, FakeRegisters::new(3)).is_err());
        assert_eq!(
            Padmux::new(&LEO_CK, FakeRegisters::new(1)).err(),
            Some(ErrorCode::SIZE)
        );
        assert!(Padmux::new(&LEO_CK, FakeRegisters::new(8)).is_ok());
    }

    #[test]
    fn scenario_pin9_two_bits() {
        let padmux = leo_a7();
        padmux.with_registers(|regs| regs.preset(2, 0x0000_0001));
        padmux.set_function(9, 0b01).unwrap();
        let regs = snapshot(&padmux);
        assert_eq!(regs[0], 1 << 9);
        assert_eq!(regs[2], 0);
        assert_eq!(regs[1], 0);
        assert_eq!(regs[3], 0);
        padmux.with_registers(|regs| {
            let touched: Vec<usize> = regs.writes().iter().map(|w| w.0).collect();
            assert_eq!(touched, [0, 2]);
        });
    }

    #[test]
    fn scenario_pin0_single_bit() {
        let padmux = leo_a7();
        padmux.set_function(0, 0b111).unwrap();
        assert_eq!(snapshot(&padmux), [1, 0, 0, 0]);
        padmux.with_registers(|regs| assert_eq!(regs.writes(), [(0, 1)]));
    }

    #[test]
    fn mmio_window_over_ram() {
        let base = Box::leak(Box::new([0u32; 4])).as_mut_ptr() as usize;
        let mmio = unsafe { PadmuxMmio::new(base, 16) };
        assert_eq!(mmio.len(), 4);
        let padmux = Padmux::new(&LEO_A7, mmio).unwrap();
        padmux.set_function(9, 0b11).unwrap();
        assert_eq!(padmux.dump_pin_state(9), Ok(0b11));
        assert_eq!(padmux.dump_pin_state(10), Ok(0));
    }

    #[test]
    #[should_panic(expected = "out of window")]
    #[cfg_attr(not(debug_assertions), ignore)]
    fn mmio_index_past_window() {
        let base = Box::leak(Box::new([0u32; 2])).as_mut_ptr() as usize;
        let mut mmio = unsafe { PadmuxMmio::new(base, 8) };
        mmio.write(2, 1);
    }

    #[test]
    fn two_bit_pin_touches_only_its_bits() {
        // Pin 9 is bit 9 of register 0 and bit 0 of register 2.
        let others_0 = !(1u32 << 9);
        let others_2 = !1u32;
        for function in 0..8 {
            let padmux = leo_a7();
            padmux.with_registers(|regs| {
                regs.preset(0, 0xdead_beef);
                regs.preset(1, 0x1234_5678);
                regs.preset(2, 0xc0ff_ee00);
                regs.preset(3, 0x0f0f_0f0f);
            });
            padmux.set_function(9, function).unwrap();
            let regs = snapshot(&padmux);
            assert_eq!(regs[0] & others_0, 0xdead_beef & others_0);
            assert_eq!(regs[2] & others_2, 0xc0ff_ee00 & others_2);
            assert_eq!((regs[0] >> 9) & 1, function & 1);
            assert_eq!(regs[2] & 1, (function >> 1) & 1);
            assert_eq!(regs[1], 0x1234_5678);
            assert_eq!(regs[3], 0x0f0f_0f0f);
            padmux.with_registers(|regs| {
                assert!(regs.writes().iter().all(|&(index, _)| index == 0 || index == 2));
            });
        }
    }

    #[test]
    fn concurrent_updates_of_one_register() {
        let padmux = leo_a7();
        std::thread::scope(|scope| {
            for pin in [3, 4] {
                let padmux = &padmux;
                scope.spawn(move || {
                    for _ in 0..1000 {
                        padmux.set_function(pin, 1).unwrap();
                    }
                });
            }
        });
        assert_eq!(snapshot(&padmux)[0], (1 << 3) | (1 << 4));
        assert_eq!(padmux.dump_pin_state(3), Ok(1));
        assert_eq!(padmux.dump_pin_state(4), Ok(1));
    }

    #[test]
    fn idempotent() {
        let padmux = leo_a7();
        padmux.set_function(30, 0b101).unwrap();
        let first = snapshot(&padmux);
        padmux.set_function(30, 0b101).unwrap();
        assert_eq!(snapshot(&padmux), first);
    }

    #[test]
    fn other_bits_untouched() {
        let padmux = leo_a7();
        padmux.with_registers(|regs| {
            for index in 0..4 {
                regs.preset(index, 0xa5a5_5a5a);
            }
        });
        padmux.set_function(28, 0b111).unwrap();
        padmux.set_function(29, 0b000).unwrap();
        let regs = snapshot(&padmux);
        // pin 28: bits 28, 79 and 96; pin 29: bits 29, 80 and 97.
        assert_eq!(regs[0], (0xa5a5_5a5a & !(1 << 28 | 1 << 29)) | (1 << 28));
        assert_eq!(regs[2], (0xa5a5_5a5a & !(1 << 15 | 1 << 16)) | (1 << 15));
        assert_eq!(regs[3], (0xa5a5_5a5a & !(1 << 0 | 1 << 1)) | 1);
        assert_eq!(regs[1], 0xa5a5_5a5a);
    }

    #[test]
    fn unmuxed_pin_is_a_no_op() {
        let padmux = leo_a7();
        padmux.set_function(64, 0b111).unwrap();
        padmux.set_function(67, 0).unwrap();
        assert_eq!(write_count(&padmux), 0);
    }

    #[test]
    fn out_of_range_pin() {
        let padmux = leo_a7();
        assert_eq!(padmux.set_function(68, 1), Err(ErrorCode::INVAL));
        assert_eq!(padmux.set_function(u32::MAX, 1), Err(ErrorCode::INVAL));
        assert_eq!(padmux.dump_pin_state(68), Err(ErrorCode::INVAL));
        assert_eq!(write_count(&padmux), 0);
    }

    #[test]
    fn high_bits_ignored() {
        let padmux = leo_a7();
        padmux.set_function(9, 0b1111_1010).unwrap();
        assert_eq!(padmux.dump_pin_state(9), Ok(0b10));
    }

    #[test]
    fn round_trip_every_pin() {
        let padmux = Padmux::new(&LEO_MINI_A7, FakeRegisters::new(3)).unwrap();
        for pin in 0..padmux.pin_count() as u32 {
            let row = padmux.selectors(pin).unwrap();
            for function in 0..8 {
                padmux.set_function(pin, function).unwrap();
                let mask = row
                    .slots()
                    .iter()
                    .enumerate()
                    .filter(|(_, sel)| sel.is_some())
                    .fold(0, |acc, (slot, _)| acc | 1 << slot);
                assert_eq!(padmux.dump_pin_state(pin), Ok(function & mask));
            }
        }
    }

    #[test]
    fn shared_bit_follows_last_writer() {
        let padmux = leo_a7();
        padmux.set_function(56, 0b10).unwrap();
        assert_eq!(padmux.dump_pin_state(57), Ok(0b10));
        padmux.set_function(57, 0b01).unwrap();
        assert_eq!(padmux.dump_pin_state(56), Ok(0b00));
    }
}
