//! The Page Table Registry: maps process ids to their Page Table.

use std::collections::HashMap;

use addr::VAddr;

use crate::page::PageTable;
use crate::{PagerError, Pid};

/// Set of Page Tables keyed by process id; each pid appears at most once
/// (spec.md §3).
#[derive(Default)]
pub struct Registry {
    tables: HashMap<Pid, PageTable>,
}

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `pid` with a fresh, empty page table.
    ///
    /// # Errors
    /// Returns [`PagerError::DuplicateProcess`] if `pid` is already
    /// registered, preserving the "each pid appears at most once"
    /// invariant from spec.md §3.
    pub fn create(&mut self, pid: Pid, base: VAddr, page_size: u64) -> Result<(), PagerError> {
        if self.tables.contains_key(&pid) {
            return Err(PagerError::DuplicateProcess);
        }
        self.tables.insert(pid, PageTable::new(base, page_size));
        Ok(())
    }

    #[must_use]
    pub fn contains(&self, pid: Pid) -> bool {
        self.tables.contains_key(&pid)
    }

    /// Look up `pid`'s page table.
    ///
    /// # Panics
    /// Panics if `pid` was never `create`d. Per spec.md §7 error kind 3,
    /// an unknown pid reaching any per-pid entry point is a fatal
    /// programmer error: callers are contractually required to `create`
    /// before any other per-pid call, so this is not a recoverable
    /// condition.
    pub fn get(&self, pid: Pid) -> &PageTable {
        self.tables
            .get(&pid)
            .unwrap_or_else(|| panic!("pager: unknown pid {pid} (was `create` called first?)"))
    }

    /// Mutable counterpart of [`Registry::get`]; panics under the same
    /// condition.
    pub fn get_mut(&mut self, pid: Pid) -> &mut PageTable {
        self.tables
            .get_mut(&pid)
            .unwrap_or_else(|| panic!("pager: unknown pid {pid} (was `create` called first?)"))
    }

    /// Remove and return `pid`'s page table, discarding it (spec.md §4.1
    /// `destroy`).
    ///
    /// # Panics
    /// Panics if `pid` is unknown, same as [`Registry::get`].
    pub fn remove(&mut self, pid: Pid) -> PageTable {
        self.tables
            .remove(&pid)
            .unwrap_or_else(|| panic!("pager: unknown pid {pid} (was `create` called first?)"))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&Pid, &mut PageTable)> {
        self.tables.iter_mut()
    }
}
