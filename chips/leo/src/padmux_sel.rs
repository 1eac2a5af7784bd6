// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2024.

//! Pad multiplexer selector tables.
//!
//! Every pad of a Leo part is routed by up to three control bits, spread over
//! a linear array of 32-bit mux registers. A table row lists those bits for
//! one pin as *selectors*: selector `n` is bit `n % 32` of register `n / 32`.
//! Bit `i` of a function value drives the selector in slot `i`.
//!
//! Each SoC family has one table per CPU domain. The A7 domain owns most
//! pads; the CK co-processor domain has its own, smaller register window.
//! A selector may appear in more than one row when two pads share a control
//! bit.

/// One control bit in the mux register array.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Selector(u16);

impl Selector {
    pub const fn new(index: u16) -> Selector {
        Selector(index)
    }

    pub const fn index(self) -> u16 {
        self.0
    }

    /// Index of the 32-bit register holding this bit.
    pub const fn register_index(self) -> usize {
        self.0 as usize / 32
    }

    /// Bit position inside that register.
    pub const fn bit(self) -> usize {
        self.0 as usize % 32
    }
}

/// The selectors of one pin, in function value bit order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PadmuxSel {
    slots: [Option<Selector>; PadmuxSel::SLOTS],
}

impl PadmuxSel {
    /// Number of mux bits a pin can have.
    pub const SLOTS: usize = 3;

    pub const fn new(
        bit0: Option<Selector>,
        bit1: Option<Selector>,
        bit2: Option<Selector>,
    ) -> PadmuxSel {
        PadmuxSel {
            slots: [bit0, bit1, bit2],
        }
    }

    pub const fn slots(&self) -> &[Option<Selector>; PadmuxSel::SLOTS] {
        &self.slots
    }

    /// True when the pin has no mux bit at all.
    pub fn is_unmuxed(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }
}

/// A selector table for one SoC family and domain.
#[derive(Debug)]
pub struct PadmuxTable {
    name: &'static str,
    rows: &'static [PadmuxSel],
}

impl PadmuxTable {
    pub const fn new(name: &'static str, rows: &'static [PadmuxSel]) -> PadmuxTable {
        PadmuxTable { name, rows }
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Number of pins the table covers.
    pub const fn len(&self) -> usize {
        self.rows.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, pin: u32) -> Option<&'static PadmuxSel> {
        self.rows.get(usize::try_from(pin).ok()?)
    }

    /// Number of mux registers the table reaches, from register 0 to the
    /// highest register any selector names.
    pub const fn register_count(&self) -> usize {
        let mut count = 0;
        let mut row = 0;
        while row < self.rows.len() {
            let mut slot = 0;
            while slot < PadmuxSel::SLOTS {
                if let Some(sel) = self.rows[row].slots[slot] {
                    if sel.register_index() + 1 > count {
                        count = sel.register_index() + 1;
                    }
                }
                slot += 1;
            }
            row += 1;
        }
        count
    }

    /// Find the first pin with a selector outside a window of `registers`
    /// mux registers.
    pub fn check(&self, registers: usize) -> Option<(u32, Selector)> {
        self.rows.iter().zip(0u32..).find_map(|(row, pin)| {
            row.slots
                .iter()
                .flatten()
                .find(|sel| sel.register_index() >= registers)
                .map(|sel| (pin, *sel))
        })
    }
}

/// SoC family, from the controller's compatible string.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SocFamily {
    Leo,
    LeoMini,
}

/// Pick the table for a family and domain.
pub fn select(family: SocFamily, secondary: bool) -> &'static PadmuxTable {
    match (family, secondary) {
        (SocFamily::Leo, false) => &LEO_A7,
        (SocFamily::Leo, true) => &LEO_CK,
        (SocFamily::LeoMini, false) => &LEO_MINI_A7,
        (SocFamily::LeoMini, true) => &LEO_MINI_CK,
    }
}

const INV: Option<Selector> = None;

const fn s(index: u16) -> Option<Selector> {
    Some(Selector::new(index))
}

pub static LEO_A7: PadmuxTable = PadmuxTable::new("leo-a7", &LEO_A7_SEL);
pub static LEO_CK: PadmuxTable = PadmuxTable::new("leo-ck", &LEO_CK_SEL);
pub static LEO_MINI_A7: PadmuxTable = PadmuxTable::new("leo-mini-a7", &LEO_MINI_A7_SEL);
pub static LEO_MINI_CK: PadmuxTable = PadmuxTable::new("leo-mini-ck", &LEO_MINI_CK_SEL);

static LEO_A7_SEL: [PadmuxSel; 68] = [
    /*  0 */ PadmuxSel::new(s(0), INV, INV),
    /*  1 */ PadmuxSel::new(s(1), INV, INV),
    /*  2 */ PadmuxSel::new(s(2), INV, INV),
    /*  3 */ PadmuxSel::new(s(3), INV, INV),
    /*  4 */ PadmuxSel::new(s(4), INV, INV),
    /*  5 */ PadmuxSel::new(s(5), INV, INV),
    /*  6 */ PadmuxSel::new(s(6), INV, INV),
    /*  7 */ PadmuxSel::new(s(7), INV, INV),
    /*  8 */ PadmuxSel::new(s(8), INV, INV),
    // Second mux bit lives in register 2.
    /*  9 */ PadmuxSel::new(s(9), s(64), INV),
    /* 10 */ PadmuxSel::new(s(10), s(65), INV),
    /* 11 */ PadmuxSel::new(s(11), s(66), INV),
    /* 12 */ PadmuxSel::new(s(12), s(67), INV),
    /* 13 */ PadmuxSel::new(s(13), s(68), INV),
    /* 14 */ PadmuxSel::new(s(14), s(69), INV),
    /* 15 */ PadmuxSel::new(s(15), s(70), INV),
    /* 16 */ PadmuxSel::new(s(16), s(71), INV),
    /* 17 */ PadmuxSel::new(s(17), s(72), INV),
    /* 18 */ PadmuxSel::new(s(18), s(73), INV),
    /* 19 */ PadmuxSel::new(s(19), s(74), INV),
    /* 20 */ PadmuxSel::new(s(20), s(75), INV),
    /* 21 */ PadmuxSel::new(s(21), s(76), INV),
    /* 22 */ PadmuxSel::new(s(22), s(77), INV),
    /* 23 */ PadmuxSel::new(s(23), s(78), INV),
    /* 24 */ PadmuxSel::new(s(24), INV, INV),
    /* 25 */ PadmuxSel::new(s(25), INV, INV),
    /* 26 */ PadmuxSel::new(s(26), INV, INV),
    /* 27 */ PadmuxSel::new(s(27), INV, INV),
    // Three-way pads: uart2, spi1 and i2s share these.
    /* 28 */ PadmuxSel::new(s(28), s(79), s(96)),
    /* 29 */ PadmuxSel::new(s(29), s(80), s(97)),
    /* 30 */ PadmuxSel::new(s(30), s(81), s(98)),
    /* 31 */ PadmuxSel::new(s(31), s(82), s(99)),
    /* 32 */ PadmuxSel::new(s(32), s(83), s(100)),
    /* 33 */ PadmuxSel::new(s(33), s(84), s(101)),
    /* 34 */ PadmuxSel::new(s(34), s(85), s(102)),
    /* 35 */ PadmuxSel::new(s(35), s(86), s(103)),
    /* 36 */ PadmuxSel::new(s(36), s(87), INV),
    /* 37 */ PadmuxSel::new(s(37), s(88), INV),
    /* 38 */ PadmuxSel::new(s(38), s(89), INV),
    /* 39 */ PadmuxSel::new(s(39), s(90), INV),
    /* 40 */ PadmuxSel::new(s(40), s(91), INV),
    /* 41 */ PadmuxSel::new(s(41), s(92), INV),
    /* 42 */ PadmuxSel::new(s(42), s(93), INV),
    /* 43 */ PadmuxSel::new(s(43), s(94), INV),
    /* 44 */ PadmuxSel::new(s(44), s(95), INV),
    /* 45 */ PadmuxSel::new(s(45), INV, s(104)),
    /* 46 */ PadmuxSel::new(s(46), INV, s(105)),
    /* 47 */ PadmuxSel::new(s(47), INV, s(106)),
    /* 48 */ PadmuxSel::new(s(48), INV, s(107)),
    /* 49 */ PadmuxSel::new(s(49), INV, s(108)),
    /* 50 */ PadmuxSel::new(s(50), INV, s(109)),
    /* 51 */ PadmuxSel::new(s(51), INV, s(110)),
    /* 52 */ PadmuxSel::new(s(52), INV, s(111)),
    /* 53 */ PadmuxSel::new(s(53), INV, s(112)),
    /* 54 */ PadmuxSel::new(s(54), INV, s(113)),
    /* 55 */ PadmuxSel::new(s(55), INV, s(114)),
    // 56 and 57 share one control bit.
    /* 56 */ PadmuxSel::new(s(56), s(115), INV),
    /* 57 */ PadmuxSel::new(s(57), s(115), INV),
    /* 58 */ PadmuxSel::new(s(58), INV, INV),
    /* 59 */ PadmuxSel::new(s(59), INV, INV),
    /* 60 */ PadmuxSel::new(s(60), INV, INV),
    /* 61 */ PadmuxSel::new(s(61), INV, INV),
    /* 62 */ PadmuxSel::new(s(62), INV, INV),
    /* 63 */ PadmuxSel::new(s(63), INV, INV),
    // Bonded out but not muxed.
    /* 64 */ PadmuxSel::new(INV, INV, INV),
    /* 65 */ PadmuxSel::new(INV, INV, INV),
    /* 66 */ PadmuxSel::new(INV, INV, INV),
    /* 67 */ PadmuxSel::new(INV, INV, INV),
];

static LEO_CK_SEL: [PadmuxSel; 40] = [
    /*  0 */ PadmuxSel::new(s(0), INV, INV),
    /*  1 */ PadmuxSel::new(s(1), INV, INV),
    /*  2 */ PadmuxSel::new(s(2), INV, INV),
    /*  3 */ PadmuxSel::new(s(3), INV, INV),
    /*  4 */ PadmuxSel::new(s(4), INV, INV),
    /*  5 */ PadmuxSel::new(s(5), INV, INV),
    /*  6 */ PadmuxSel::new(s(6), INV, INV),
    /*  7 */ PadmuxSel::new(s(7), INV, INV),
    /*  8 */ PadmuxSel::new(s(8), INV, INV),
    /*  9 */ PadmuxSel::new(s(9), INV, INV),
    /* 10 */ PadmuxSel::new(s(10), INV, INV),
    /* 11 */ PadmuxSel::new(s(11), INV, INV),
    /* 12 */ PadmuxSel::new(s(12), INV, INV),
    /* 13 */ PadmuxSel::new(s(13), INV, INV),
    /* 14 */ PadmuxSel::new(s(14), INV, INV),
    /* 15 */ PadmuxSel::new(s(15), INV, INV),
    /* 16 */ PadmuxSel::new(s(16), s(32), INV),
    /* 17 */ PadmuxSel::new(s(17), s(33), INV),
    /* 18 */ PadmuxSel::new(s(18), s(34), INV),
    /* 19 */ PadmuxSel::new(s(19), s(35), INV),
    /* 20 */ PadmuxSel::new(s(20), s(36), INV),
    /* 21 */ PadmuxSel::new(s(21), s(37), INV),
    /* 22 */ PadmuxSel::new(s(22), s(38), INV),
    /* 23 */ PadmuxSel::new(s(23), s(39), INV),
    /* 24 */ PadmuxSel::new(s(24), s(40), s(48)),
    /* 25 */ PadmuxSel::new(s(25), s(41), s(49)),
    /* 26 */ PadmuxSel::new(s(26), s(42), s(50)),
    /* 27 */ PadmuxSel::new(s(27), s(43), s(51)),
    /* 28 */ PadmuxSel::new(s(28), s(44), s(52)),
    /* 29 */ PadmuxSel::new(s(29), s(45), s(53)),
    /* 30 */ PadmuxSel::new(s(30), s(46), s(54)),
    /* 31 */ PadmuxSel::new(s(31), s(47), s(55)),
    // Reserved.
    /* 32 */ PadmuxSel::new(INV, INV, INV),
    /* 33 */ PadmuxSel::new(INV, INV, INV),
    /* 34 */ PadmuxSel::new(INV, INV, INV),
    /* 35 */ PadmuxSel::new(INV, INV, INV),
    /* 36 */ PadmuxSel::new(s(56), INV, INV),
    /* 37 */ PadmuxSel::new(s(57), INV, INV),
    /* 38 */ PadmuxSel::new(s(58), INV, INV),
    /* 39 */ PadmuxSel::new(s(59), INV, INV),
];

static LEO_MINI_A7_SEL: [PadmuxSel; 48] = [
    /*  0 */ PadmuxSel::new(s(0), INV, INV),
    /*  1 */ PadmuxSel::new(s(1), INV, INV),
    /*  2 */ PadmuxSel::new(s(2), INV, INV),
    /*  3 */ PadmuxSel::new(s(3), INV, INV),
    /*  4 */ PadmuxSel::new(s(4), INV, INV),
    /*  5 */ PadmuxSel::new(s(5), INV, INV),
    /*  6 */ PadmuxSel::new(s(6), INV, INV),
    /*  7 */ PadmuxSel::new(s(7), INV, INV),
    /*  8 */ PadmuxSel::new(s(8), s(48), INV),
    /*  9 */ PadmuxSel::new(s(9), s(49), INV),
    /* 10 */ PadmuxSel::new(s(10), s(50), INV),
    /* 11 */ PadmuxSel::new(s(11), s(51), INV),
    /* 12 */ PadmuxSel::new(s(12), s(52), INV),
    /* 13 */ PadmuxSel::new(s(13), s(53), INV),
    /* 14 */ PadmuxSel::new(s(14), s(54), INV),
    /* 15 */ PadmuxSel::new(s(15), s(55), INV),
    /* 16 */ PadmuxSel::new(s(16), s(56), s(64)),
    /* 17 */ PadmuxSel::new(s(17), s(57), s(65)),
    /* 18 */ PadmuxSel::new(s(18), s(58), s(66)),
    /* 19 */ PadmuxSel::new(s(19), s(59), s(67)),
    /* 20 */ PadmuxSel::new(s(20), s(60), s(68)),
    /* 21 */ PadmuxSel::new(s(21), s(61), s(69)),
    /* 22 */ PadmuxSel::new(s(22), s(62), s(70)),
    /* 23 */ PadmuxSel::new(s(23), s(63), s(71)),
    /* 24 */ PadmuxSel::new(s(24), INV, INV),
    /* 25 */ PadmuxSel::new(s(25), INV, INV),
    /* 26 */ PadmuxSel::new(s(26), INV, INV),
    /* 27 */ PadmuxSel::new(s(27), INV, INV),
    /* 28 */ PadmuxSel::new(s(28), INV, INV),
    /* 29 */ PadmuxSel::new(s(29), INV, INV),
    /* 30 */ PadmuxSel::new(s(30), INV, INV),
    /* 31 */ PadmuxSel::new(s(31), INV, INV),
    /* 32 */ PadmuxSel::new(s(32), INV, INV),
    /* 33 */ PadmuxSel::new(s(33), INV, INV),
    /* 34 */ PadmuxSel::new(s(34), INV, INV),
    /* 35 */ PadmuxSel::new(s(35), INV, INV),
    /* 36 */ PadmuxSel::new(s(36), INV, INV),
    /* 37 */ PadmuxSel::new(s(37), INV, INV),
    /* 38 */ PadmuxSel::new(s(38), INV, INV),
    /* 39 */ PadmuxSel::new(s(39), INV, INV),
    /* 40 */ PadmuxSel::new(s(40), s(72), INV),
    /* 41 */ PadmuxSel::new(s(41), s(73), INV),
    /* 42 */ PadmuxSel::new(s(42), s(74), INV),
    /* 43 */ PadmuxSel::new(s(43), s(75), INV),
    /* 44 */ PadmuxSel::new(INV, INV, INV),
    /* 45 */ PadmuxSel::new(INV, INV, INV),
    /* 46 */ PadmuxSel::new(INV, INV, INV),
    /* 47 */ PadmuxSel::new(INV, INV, INV),
];

static LEO_MINI_CK_SEL: [PadmuxSel; 24] = [
    /*  0 */ PadmuxSel::new(s(0), INV, INV),
    /*  1 */ PadmuxSel::new(s(1), INV, INV),
    /*  2 */ PadmuxSel::new(s(2), INV, INV),
    /*  3 */ PadmuxSel::new(s(3), INV, INV),
    /*  4 */ PadmuxSel::new(s(4), INV, INV),
    /*  5 */ PadmuxSel::new(s(5), INV, INV),
    /*  6 */ PadmuxSel::new(s(6), INV, INV),
    /*  7 */ PadmuxSel::new(s(7), INV, INV),
    /*  8 */ PadmuxSel::new(s(8), INV, INV),
    /*  9 */ PadmuxSel::new(s(9), INV, INV),
    /* 10 */ PadmuxSel::new(s(10), INV, INV),
    /* 11 */ PadmuxSel::new(s(11), INV, INV),
    /* 12 */ PadmuxSel::new(s(12), s(32), INV),
    /* 13 */ PadmuxSel::new(s(13), s(33), INV),
    /* 14 */ PadmuxSel::new(s(14), s(34), INV),
    /* 15 */ PadmuxSel::new(s(15), s(35), INV),
    /* 16 */ PadmuxSel::new(s(16), s(36), INV),
    /* 17 */ PadmuxSel::new(s(17), s(37), INV),
    /* 18 */ PadmuxSel::new(s(18), s(38), INV),
    /* 19 */ PadmuxSel::new(s(19), s(39), INV),
    /* 20 */ PadmuxSel::new(s(40), INV, INV),
    /* 21 */ PadmuxSel::new(s(41), INV, INV),
    /* 22 */ PadmuxSel::new(s(42), INV, INV),
    /* 23 */ PadmuxSel::new(s(43), INV, INV),
];

#[cfg(test)]
mod tests {
    use super::*;

    fn all() -> [&'static PadmuxTable; 4] {
        [&LEO_A7, &LEO_CK, &LEO_MINI_A7, &LEO_MINI_CK]
    }

    #[test]
    fn selector_addressing() {
        let sel = Selector::new(64);
        assert_eq!(sel.register_index(), 2);
        assert_eq!(sel.bit(), 0);
        let sel = Selector::new(115);
        assert_eq!(sel.register_index(), 3);
        assert_eq!(sel.bit(), 19);
    }

    #[test]
    fn selection_by_family_and_domain() {
        assert_eq!(select(SocFamily::Leo, false).name(), "leo-a7");
        assert_eq!(select(SocFamily::Leo, true).name(), "leo-ck");
        assert_eq!(select(SocFamily::LeoMini, false).name(), "leo-mini-a7");
        assert_eq!(select(SocFamily::LeoMini, true).name(), "leo-mini-ck");
        assert_eq!(LEO_A7.len(), 68);
        assert_eq!(LEO_CK.len(), 40);
        assert_eq!(LEO_MINI_A7.len(), 48);
        assert_eq!(LEO_MINI_CK.len(), 24);
    }

    #[test]
    fn register_windows() {
        assert_eq!(LEO_A7.register_count(), 4);
        assert_eq!(LEO_CK.register_count(), 2);
        assert_eq!(LEO_MINI_A7.register_count(), 3);
        assert_eq!(LEO_MINI_CK.register_count(), 2);
        for table in all() {
            assert_eq!(table.check(table.register_count()), None, "{}", table.name());
        }
        assert_eq!(LEO_A7.check(3), Some((28, Selector::new(96))));
        assert_eq!(LEO_A7.check(0), Some((0, Selector::new(0))));
    }

    #[test]
    fn known_rows() {
        assert_eq!(LEO_A7.row(9), Some(&PadmuxSel::new(s(9), s(64), INV)));
        assert_eq!(LEO_A7.row(0), Some(&PadmuxSel::new(s(0), INV, INV)));
        let shared = LEO_A7.row(56).unwrap().slots()[1];
        assert_eq!(shared, s(115));
        assert_eq!(LEO_A7.row(57).unwrap().slots()[1], shared);
        assert!(LEO_A7.row(64).unwrap().is_unmuxed());
        assert!(!LEO_A7.row(63).unwrap().is_unmuxed());
        assert_eq!(LEO_A7.row(68), None);
        assert_eq!(LEO_A7.row(u32::MAX), None);
    }

    #[test]
    fn primary_bit_is_unique_per_table() {
        // Slot 0 bits are never shared, so a GPIO claim on one pin cannot
        // switch another.
        for table in all() {
            let mut seen = std::vec::Vec::new();
            for pin in 0..table.len() as u32 {
                if let Some(sel) = table.row(pin).unwrap().slots()[0] {
                    assert!(!seen.contains(&sel), "{} pin {}", table.name(), pin);
                    seen.push(sel);
                }
            }
        }
    }
}
