// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2024.

//! GPIO fallback ranges.
//!
//! The `gpio-range` property lists `<offset count function>` triples. When a
//! GPIO line is claimed, the pin is muxed to the function of the first range
//! that contains it. Ranges are kept in declaration order and are not
//! required to be disjoint.

use alloc::vec::Vec;

use kernel::of::Node;
use kernel::ErrorCode;

pub const GPIO_RANGE_PROPERTY: &str = "gpio-range";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GpioRange {
    pub offset: u32,
    pub count: u32,
    /// Function value that routes a pin of this range to GPIO.
    pub function: u32,
}

impl GpioRange {
    pub fn contains(&self, pin: u32) -> bool {
        pin >= self.offset && pin - self.offset < self.count
    }

    fn overlaps(&self, other: &GpioRange) -> bool {
        let end = u64::from(self.offset) + u64::from(self.count);
        let other_end = u64::from(other.offset) + u64::from(other.count);
        u64::from(self.offset) < other_end && u64::from(other.offset) < end
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GpioRanges {
    ranges: Vec<GpioRange>,
}

impl GpioRanges {
    pub const fn new() -> GpioRanges {
        GpioRanges { ranges: Vec::new() }
    }

    /// Parse the `gpio-range` property of `node`.
    ///
    /// A missing property gives no ranges. A cell count that is not a
    /// multiple of three is `SIZE`.
    pub fn from_node(node: &Node) -> Result<GpioRanges, ErrorCode> {
        let cells = match node.read_u32_array(GPIO_RANGE_PROPERTY) {
            Ok(cells) => cells,
            Err(_) if node.property(GPIO_RANGE_PROPERTY).is_none() => {
                return Ok(GpioRanges::new())
            }
            Err(err) => return Err(err),
        };
        if cells.len() % 3 != 0 {
            return Err(ErrorCode::SIZE);
        }
        let cells: Vec<u32> = cells.collect();
        let ranges = cells
            .chunks_exact(3)
            .map(|triple| GpioRange {
                offset: triple[0],
                count: triple[1],
                function: triple[2],
            })
            .collect();
        Ok(GpioRanges { ranges })
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn iter(&self) -> core::slice::Iter<'_, GpioRange> {
        self.ranges.iter()
    }

    /// The first declared range containing `pin`.
    pub fn find(&self, pin: u32) -> Option<&GpioRange> {
        self.ranges.iter().find(|range| range.contains(pin))
    }

    /// Pairs of range indices `(earlier, later)` that cover a common pin.
    pub fn overlaps(&self) -> Vec<(usize, usize)> {
        let mut found = Vec::new();
        for (i, first) in self.ranges.iter().enumerate() {
            for (j, second) in self.ranges.iter().enumerate().skip(i + 1) {
                if first.overlaps(second) {
                    found.push((i, j));
                }
            }
        }
        found
    }
}
