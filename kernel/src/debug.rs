// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2024.

//! Support for the `debug!` and `debug_verbose!` macros.
//!
//! The board hands the kernel a sink for debug text once, early during
//! initialization:
//!
//! ```ignore
//! static mut CONSOLE: UartConsole = UartConsole::new();
//! kernel::debug::set_debug_writer(unsafe { &mut *addr_of_mut!(CONSOLE) });
//! ```
//!
//! Any crate can then print formatted messages:
//!
//! ```ignore
//! debug!("pin {} -> func {}", pin, value);
//! debug_verbose!("registry holds {} functions", count);
//! ```
//!
//! `debug_verbose!` prefixes each line with a running message counter and the
//! `file:line` of the call site. Messages issued before a sink is registered
//! are dropped.

use core::fmt::{self, Write};
use core::sync::atomic::{AtomicUsize, Ordering};

use spin::Mutex;

/// A byte sink for debug output, typically a UART or a RAM ring buffer.
pub trait IoWrite {
    /// Write as much of `buf` as possible and return the number of bytes
    /// consumed. Returning 0 means the sink is full.
    fn write(&mut self, buf: &[u8]) -> usize;
}

type DebugSink = &'static mut (dyn IoWrite + Send);

static DEBUG_WRITER: Mutex<Option<DebugSink>> = Mutex::new(None);

/// Number of `debug_verbose!` messages issued so far.
static DEBUG_COUNT: AtomicUsize = AtomicUsize::new(0);

/// Install the sink that receives all debug output, returning the previous
/// one, if any.
pub fn set_debug_writer(writer: DebugSink) -> Option<DebugSink> {
    DEBUG_WRITER.lock().replace(writer)
}

/// Remove the current sink. Later debug output is dropped.
pub fn take_debug_writer() -> Option<DebugSink> {
    DEBUG_WRITER.lock().take()
}

struct LineWriter<'a> {
    sink: &'a mut (dyn IoWrite + Send + 'static),
}

impl Write for LineWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let mut buf = s.as_bytes();
        while !buf.is_empty() {
            let written = self.sink.write(buf);
            if written == 0 {
                return Err(fmt::Error);
            }
            buf = &buf[written.min(buf.len())..];
        }
        Ok(())
    }
}

fn with_writer<F: FnOnce(&mut LineWriter)>(f: F) {
    let mut slot = DEBUG_WRITER.lock();
    if let Some(sink) = slot.as_deref_mut() {
        f(&mut LineWriter { sink });
    }
}

pub fn debug_println(args: fmt::Arguments) {
    with_writer(|writer| {
        let _ = writer.write_fmt(args);
        let _ = writer.write_str("\r\n");
    });
}

pub fn debug_verbose_println(args: fmt::Arguments, file_line: (&'static str, u32)) {
    let count = DEBUG_COUNT.fetch_add(1, Ordering::Relaxed) + 1;
    let (file, line) = file_line;
    with_writer(|writer| {
        let _ = write!(writer, "TOCK_DEBUG({}): {}:{}: ", count, file, line);
        let _ = writer.write_fmt(args);
        let _ = writer.write_str("\r\n");
    });
}

/// In-kernel `println()` debugging.
#[macro_export]
macro_rules! debug {
    ($($arg:tt)+) => ({
        $crate::debug::debug_println(format_args!($($arg)+));
    });
}

/// In-kernel `println()` debugging with call site and message counter.
#[macro_export]
macro_rules! debug_verbose {
    ($($arg:tt)+) => ({
        $crate::debug::debug_verbose_println(format_args!($($arg)+), (file!(), line!()));
    });
}

#[cfg(test)]
mod tests {
    use super::{set_debug_writer, take_debug_writer, IoWrite};
    use std::boxed::Box;
    use std::string::String;
    use std::sync::{Arc, Mutex};
    use std::vec::Vec;

    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl IoWrite for Capture {
        fn write(&mut self, buf: &[u8]) -> usize {
            // Accept at most 8 bytes per call to exercise the retry loop.
            let n = buf.len().min(8);
            self.0.lock().unwrap().extend_from_slice(&buf[..n]);
            n
        }
    }

    // A single test owns the global sink so parallel tests cannot interleave.
    #[test]
    fn debug_output_reaches_sink() {
        let out = Arc::new(Mutex::new(Vec::new()));
        let sink: &'static mut Capture = Box::leak(Box::new(Capture(out.clone())));
        let _ = set_debug_writer(sink);

        debug!("pin {} func {}", 9, 1);
        debug_verbose!("registered {}", "uart2");

        assert!(take_debug_writer().is_some());
        debug!("dropped");

        let text = String::from_utf8(out.lock().unwrap().clone()).unwrap();
        assert!(text.starts_with("pin 9 func 1\r\n"));
        assert!(text.contains("TOCK_DEBUG(1): "));
        assert!(text.contains("debug.rs:"));
        assert!(text.ends_with("registered uart2\r\n"));
        assert!(!text.contains("dropped"));
    }
}
