//! The pager's recoverable error type.
//!
//! A plain enum with explicit `Display`/`Error` impls rather than a
//! `thiserror` derive, matching this crate's house style for small, closed
//! error sets.
//!
//! Not every failure mode is a variant here: "unknown pid" and "fault on a
//! never-extended address" are fatal programmer errors, implemented as
//! panics at the call site rather than as `Result` variants a caller could
//! reasonably handle.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PagerError {
    /// `extend` found no free block in the Block Table. No state change is
    /// made when this is returned.
    NoFreeBlock,

    /// `syslog`'s `[addr, addr+len)` range crosses into a page the process
    /// never `extend`ed, or touches a non-resident page. No partial output
    /// is emitted when this is returned.
    OutOfRange,

    /// `create` was called twice for the same pid, which would otherwise
    /// violate the Page Table Registry's invariant that each pid appears
    /// at most once.
    DuplicateProcess,
}

impl fmt::Display for PagerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoFreeBlock => write!(f, "no free block available in the block table"),
            Self::OutOfRange => write!(f, "address range falls outside the process's allocated pages"),
            Self::DuplicateProcess => write!(f, "process id is already registered"),
        }
    }
}

impl std::error::Error for PagerError {}
