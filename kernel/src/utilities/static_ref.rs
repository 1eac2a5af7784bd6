// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2024.

//! Wrapper type for safe pointers to static memory.

use core::ops::Deref;
use core::ptr::NonNull;

/// A pointer to statically allocated mutable data such as memory mapped I/O
/// registers.
///
/// Wraps a raw pointer and performs the unsafe dereference in one audited
/// place. `T` may be unsized, so a `StaticRef<[ReadWrite<u32>]>` describes a
/// register window whose length is only known at probe time.
#[derive(Debug)]
pub struct StaticRef<T: ?Sized> {
    ptr: NonNull<T>,
}

impl<T> StaticRef<T> {
    /// Create a new `StaticRef` from a raw pointer.
    ///
    /// ## Safety
    ///
    /// Callers must pass a non-null pointer to memory that stays valid for
    /// the rest of the program and holds a `T`.
    pub const unsafe fn new(ptr: *const T) -> StaticRef<T> {
        StaticRef {
            ptr: NonNull::new_unchecked(ptr.cast_mut()),
        }
    }
}

impl<T> StaticRef<[T]> {
    /// Create a `StaticRef` to `len` consecutive `T` starting at `ptr`.
    ///
    /// ## Safety
    ///
    /// Same as [`StaticRef::new`], for all `len` elements.
    pub unsafe fn new_slice(ptr: *const T, len: usize) -> StaticRef<[T]> {
        let slice = core::ptr::slice_from_raw_parts(ptr, len);
        StaticRef {
            ptr: NonNull::new_unchecked(slice.cast_mut()),
        }
    }
}

impl<T: ?Sized> Clone for StaticRef<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: ?Sized> Copy for StaticRef<T> {}

impl<T: ?Sized> Deref for StaticRef<T> {
    type Target = T;
    fn deref(&self) -> &T {
        // SAFETY: `new` and `new_slice` callers promised a valid pointer for
        // the program lifetime.
        unsafe { self.ptr.as_ref() }
    }
}
