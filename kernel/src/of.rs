// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2024.

//! Devicetree (Open Firmware) node abstraction.
//!
//! Drivers are configured from device-tree shaped descriptions: a node with a
//! name, a list of properties, and child nodes. The board either builds these
//! as `const` data or hands over nodes unflattened from a DTB; drivers only see
//! the [`Node`] API.
//!
//! ```ignore
//! const UART2: Node = Node::new(
//!     "uart2",
//!     &[Property::cells("pinmux", &[28, 1, 29, 1])],
//!     &[],
//! );
//! ```
//!
//! Cell properties can also be supplied as raw big-endian bytes, exactly as
//! they are stored in a flattened device tree.

use core::iter::FusedIterator;
use core::slice;

use crate::ErrorCode;

const NO_CELLS: &[u32] = &[];

/// The value of one property.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Value<'a> {
    /// A property with no value, used as a boolean flag.
    Empty,
    /// A list of 32-bit cells.
    Cells(&'a [u32]),
    /// A string, or a string list separated by NUL bytes.
    Str(&'a str),
    /// Raw property bytes in device-tree (big-endian) encoding.
    Bytes(&'a [u8]),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Property<'a> {
    name: &'a str,
    value: Value<'a>,
}

impl<'a> Property<'a> {
    pub const fn flag(name: &'a str) -> Self {
        Property {
            name,
            value: Value::Empty,
        }
    }

    pub const fn cells(name: &'a str, cells: &'a [u32]) -> Self {
        Property {
            name,
            value: Value::Cells(cells),
        }
    }

    pub const fn string(name: &'a str, value: &'a str) -> Self {
        Property {
            name,
            value: Value::Str(value),
        }
    }

    pub const fn bytes(name: &'a str, bytes: &'a [u8]) -> Self {
        Property {
            name,
            value: Value::Bytes(bytes),
        }
    }

    pub fn name(&self) -> &'a str {
        self.name
    }

    pub fn value(&self) -> Value<'a> {
        self.value
    }
}

/// One device-tree node.
#[derive(Clone, Copy, Debug)]
pub struct Node<'a> {
    name: &'a str,
    properties: &'a [Property<'a>],
    children: &'a [Node<'a>],
}

impl<'a> Node<'a> {
    pub const fn new(
        name: &'a str,
        properties: &'a [Property<'a>],
        children: &'a [Node<'a>],
    ) -> Self {
        Node {
            name,
            properties,
            children,
        }
    }

    /// Full node name, including any `@unit-address` suffix.
    pub fn full_name(&self) -> &'a str {
        self.name
    }

    /// Node name without the unit address.
    pub fn name(&self) -> &'a str {
        match self.name.split_once('@') {
            Some((base, _)) => base,
            None => self.name,
        }
    }

    pub fn property(&self, name: &str) -> Option<&'a Property<'a>> {
        self.properties.iter().find(|prop| prop.name == name)
    }

    /// True when the property exists, whatever its value.
    pub fn read_bool(&self, name: &str) -> bool {
        self.property(name).is_some()
    }

    /// Iterate the 32-bit cells of a property.
    ///
    /// Returns `INVAL` when the property is missing or holds a string, and
    /// `SIZE` when raw bytes are not a whole number of cells.
    pub fn read_u32_array(&self, name: &str) -> Result<Cells<'a>, ErrorCode> {
        match self.property(name).map(|prop| prop.value) {
            Some(Value::Cells(cells)) => Ok(Cells::Native(cells.iter())),
            Some(Value::Bytes(bytes)) => {
                if bytes.len() % 4 != 0 {
                    return Err(ErrorCode::SIZE);
                }
                Ok(Cells::BigEndian(bytes.chunks_exact(4)))
            }
            Some(Value::Empty) => Ok(Cells::Native(NO_CELLS.iter())),
            Some(Value::Str(_)) | None => Err(ErrorCode::INVAL),
        }
    }

    /// Check the `compatible` string list for `compat`.
    pub fn is_compatible(&self, compat: &str) -> bool {
        match self.read_compatible() {
            Some(list) => list.split('\0').any(|entry| entry == compat),
            None => false,
        }
    }

    fn read_compatible(&self) -> Option<&'a str> {
        match self.property("compatible")?.value {
            Value::Str(list) => Some(list),
            _ => None,
        }
    }

    /// Decode the first `reg` entry as `(base, size)`.
    ///
    /// One cell each for address and size, or two cells each for 64-bit
    /// parents. A missing property means the node has no register window.
    pub fn reg(&self) -> Result<(usize, usize), ErrorCode> {
        let mut cells = self.read_u32_array("reg").map_err(|err| match err {
            ErrorCode::INVAL => ErrorCode::NODEVICE,
            other => other,
        })?;
        match cells.len() {
            2 => {
                let base = cells.next().unwrap_or(0) as usize;
                let size = cells.next().unwrap_or(0) as usize;
                Ok((base, size))
            }
            4 => {
                let mut wide = || {
                    let hi = u64::from(cells.next().unwrap_or(0));
                    let lo = u64::from(cells.next().unwrap_or(0));
                    (hi << 32) | lo
                };
                let base = usize::try_from(wide()).map_err(|_| ErrorCode::SIZE)?;
                let size = usize::try_from(wide()).map_err(|_| ErrorCode::SIZE)?;
                Ok((base, size))
            }
            _ => Err(ErrorCode::SIZE),
        }
    }

    pub fn children(&self) -> slice::Iter<'a, Node<'a>> {
        self.children.iter()
    }

    /// Find a direct child by name, with or without its unit address.
    pub fn find_child(&self, name: &str) -> Option<&'a Node<'a>> {
        self.children
            .iter()
            .find(|child| child.full_name() == name || child.name() == name)
    }
}

/// Iterator over the cells of a property.
#[derive(Clone, Debug)]
pub enum Cells<'a> {
    Native(slice::Iter<'a, u32>),
    BigEndian(slice::ChunksExact<'a, u8>),
}

impl Iterator for Cells<'_> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        match self {
            Cells::Native(iter) => iter.next().copied(),
            Cells::BigEndian(chunks) => chunks
                .next()
                .map(|c| u32::from_be_bytes([c[0], c[1], c[2], c[3]])),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            Cells::Native(iter) => iter.size_hint(),
            Cells::BigEndian(chunks) => chunks.size_hint(),
        }
    }
}

impl ExactSizeIterator for Cells<'_> {}

impl FusedIterator for Cells<'_> {}

/// Return the data of the first table entry whose compatible string the node
/// carries, in table order.
pub fn match_node<D: Copy>(node: &Node, table: &[(&str, D)]) -> Option<D> {
    table
        .iter()
        .find(|(compat, _)| node.is_compatible(compat))
        .map(|(_, data)| *data)
}

#[cfg(test)]
mod tests {
    use super::{match_node, Node, Property};
    use crate::ErrorCode;
    use std::vec::Vec;

    const STATES: [Node; 2] = [
        Node::new("uart2", &[Property::cells("pinmux", &[28, 1, 29, 1])], &[]),
        Node::new(
            "i2c0@0",
            &[Property::bytes("pinmux", &[0, 0, 0, 4, 0, 0, 0, 2])],
            &[],
        ),
    ];

    const CTRL: Node = Node::new(
        "pinctrl@8a00000",
        &[
            Property::string("compatible", "vendor,other\0nationalchip,leo-pinctrl"),
            Property::cells("reg", &[0x8a0_0000, 0x100]),
            Property::flag("is-secondary-domain"),
            Property::bytes("odd", &[1, 2, 3]),
            Property::string("label", "pinmux"),
        ],
        &STATES,
    );

    #[test]
    fn names_and_children() {
        assert_eq!(CTRL.name(), "pinctrl");
        assert_eq!(CTRL.full_name(), "pinctrl@8a00000");
        assert_eq!(CTRL.children().count(), 2);
        assert!(CTRL.find_child("i2c0").is_some());
        assert!(CTRL.find_child("i2c0@0").is_some());
        assert!(CTRL.find_child("spi0").is_none());
    }

    #[test]
    fn cells_native_and_big_endian_agree() {
        let uart = CTRL.find_child("uart2").unwrap();
        let cells: Vec<u32> = uart.read_u32_array("pinmux").unwrap().collect();
        assert_eq!(cells, [28, 1, 29, 1]);

        let i2c = CTRL.find_child("i2c0").unwrap();
        let raw = i2c.read_u32_array("pinmux").unwrap();
        assert_eq!(raw.len(), 2);
        assert_eq!(raw.collect::<Vec<u32>>(), [4, 2]);
    }

    #[test]
    fn malformed_properties() {
        assert_eq!(CTRL.read_u32_array("odd").err(), Some(ErrorCode::SIZE));
        assert_eq!(CTRL.read_u32_array("label").err(), Some(ErrorCode::INVAL));
        assert_eq!(CTRL.read_u32_array("missing").err(), Some(ErrorCode::INVAL));
        assert_eq!(CTRL.read_u32_array("is-secondary-domain").unwrap().len(), 0);
    }

    #[test]
    fn flags_strings_and_reg() {
        assert!(CTRL.read_bool("is-secondary-domain"));
        assert!(!CTRL.read_bool("gpio-range"));
        assert_eq!(CTRL.reg(), Ok((0x8a0_0000, 0x100)));

        const WIDE: Node = Node::new("w", &[Property::cells("reg", &[0, 0x1000, 0, 0x20])], &[]);
        const NONE: Node = Node::new("n", &[], &[]);
        const SHORT: Node = Node::new("s", &[Property::cells("reg", &[1, 2, 3])], &[]);
        assert_eq!(WIDE.reg(), Ok((0x1000, 0x20)));
        assert_eq!(NONE.reg(), Err(ErrorCode::NODEVICE));
        assert_eq!(SHORT.reg(), Err(ErrorCode::SIZE));
    }

    #[test]
    fn compatible_matching_uses_table_order() {
        let table = [
            ("nationalchip,leo-mini-pinctrl", 2),
            ("nationalchip,leo-pinctrl", 1),
            ("vendor,other", 3),
        ];
        assert!(CTRL.is_compatible("vendor,other"));
        assert_eq!(match_node(&CTRL, &table), Some(1));
        assert_eq!(match_node(&STATES[0], &table), None);
    }
}
