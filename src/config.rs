//! Host-supplied constants.
//!
//! This pager has no boot-time memory map of its own to derive a base
//! address or page size from; those are supplied by the host integration
//! layer when constructing a [`crate::Pager`]. The constants below are the
//! defaults used by this crate's own tests and examples.

/// Default base address at which a process's user pages begin, used by
/// tests and examples that don't care about a specific value.
pub const DEFAULT_UVM_BASEADDR: u64 = 0x0000_5555_0000_0000;

/// Default page size (4 KiB), used by tests and examples.
pub const DEFAULT_PAGE_SIZE: u64 = 4096;
