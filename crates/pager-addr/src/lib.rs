//! Virtual address arithmetic shared by the pager's bookkeeping tables.
//!
//! This is a much smaller cousin of a kernel's `Virtual`/`Physical` address
//! wrappers: the pager never walks multi-level page tables or deals with
//! canonical-address checks, it only ever needs to align an address down to
//! a page boundary and to step through a process's page-aligned address
//! range, so that is all this crate provides.

use std::fmt;
use std::ops::{Add, Sub};

/// A virtual address as seen by a client process.
///
/// Unlike a hardware address, a [`VAddr`] carries no assumption about
/// canonicality or bit width beyond what fits in a `u64`: the pager treats
/// addresses as opaque integers supplied by the host and only ever aligns
/// or compares them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct VAddr(u64);

impl VAddr {
    #[must_use]
    pub const fn new(address: u64) -> Self {
        Self(address)
    }

    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    #[must_use]
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }

    /// Align the address down to a `page_size` boundary.
    ///
    /// # Panics
    /// Panics if `page_size` is not a power of two.
    #[must_use]
    pub fn page_align_down(self, page_size: u64) -> Self {
        assert!(page_size.is_power_of_two(), "page size must be a power of two");
        Self(self.0 & !(page_size - 1))
    }

    /// True if the address is aligned to a `page_size` boundary.
    ///
    /// # Panics
    /// Panics if `page_size` is not a power of two.
    #[must_use]
    pub fn is_page_aligned(self, page_size: u64) -> bool {
        assert!(page_size.is_power_of_two(), "page size must be a power of two");
        self.0 & (page_size - 1) == 0
    }

    /// Offset of this address within its containing page.
    #[must_use]
    pub fn page_offset(self, page_size: u64) -> u64 {
        assert!(page_size.is_power_of_two(), "page size must be a power of two");
        self.0 & (page_size - 1)
    }
}

impl fmt::LowerHex for VAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

impl fmt::Display for VAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:016x}", self.0)
    }
}

impl From<VAddr> for u64 {
    fn from(addr: VAddr) -> Self {
        addr.0
    }
}

impl From<u64> for VAddr {
    fn from(addr: u64) -> Self {
        Self(addr)
    }
}

impl Add<u64> for VAddr {
    type Output = VAddr;

    fn add(self, rhs: u64) -> Self::Output {
        Self(self.0 + rhs)
    }
}

impl Sub<VAddr> for VAddr {
    type Output = u64;

    fn sub(self, rhs: VAddr) -> Self::Output {
        self.0 - rhs.0
    }
}
