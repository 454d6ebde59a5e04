//! The Frame Table: a fixed-size array of physical frame descriptors.
//!
//! An arena-plus-index design: a frame never stores a pointer to its
//! occupant's [`crate::page::Page`], only the `(pid, page_index)` pair
//! needed to look it back up in the owning process's page table. This
//! sidesteps the cyclic ownership a pointer-based `Frame <-> Page`
//! back-reference would otherwise require.

use crate::Pid;

/// Index of a frame in the Frame Table. Frames are identified purely by
/// position; there is no notion of a frame's own address, since the pager
/// never touches physical memory directly, only through the MMU interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameIndex(pub usize);

impl FrameIndex {
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }
}

/// The page currently occupying a frame, identified by its owning process
/// and its position in that process's page table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occupant {
    pub pid: Pid,
    pub page_index: usize,
}

/// One physical frame descriptor.
#[derive(Debug, Clone, Copy, Default)]
pub struct Frame {
    occupant: Option<Occupant>,
    referenced: bool,
}

impl Frame {
    const fn free() -> Self {
        Self {
            occupant: None,
            referenced: false,
        }
    }

    #[must_use]
    pub fn is_free(&self) -> bool {
        self.occupant.is_none()
    }

    #[must_use]
    pub fn occupant(&self) -> Option<Occupant> {
        self.occupant
    }

    #[must_use]
    pub fn referenced(&self) -> bool {
        self.referenced
    }

    pub fn set_referenced(&mut self, referenced: bool) {
        self.referenced = referenced;
    }

    /// Bind this (currently free) frame to a page.
    ///
    /// # Panics
    /// Panics if the frame is already occupied; callers must free a frame
    /// before reassigning it.
    pub fn assign(&mut self, pid: Pid, page_index: usize) {
        assert!(self.is_free(), "assigning an already-occupied frame");
        self.occupant = Some(Occupant { pid, page_index });
        self.referenced = true;
    }

    /// Release this frame, making it free again.
    pub fn release(&mut self) {
        self.occupant = None;
        self.referenced = false;
    }
}

/// Fixed-size table of physical frame descriptors, owning the clock hand
/// used by the second-chance replacement policy.
pub struct FrameTable {
    frames: Vec<Frame>,
    hand: usize,
}

impl FrameTable {
    #[must_use]
    pub fn new(nframes: usize) -> Self {
        Self {
            frames: vec![Frame::free(); nframes],
            hand: 0,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    #[must_use]
    pub fn hand(&self) -> usize {
        self.hand
    }

    pub fn set_hand(&mut self, hand: usize) {
        self.hand = hand % self.frames.len().max(1);
    }

    pub fn get(&self, index: FrameIndex) -> &Frame {
        &self.frames[index.0]
    }

    pub fn get_mut(&mut self, index: FrameIndex) -> &mut Frame {
        &mut self.frames[index.0]
    }

    /// Find the lowest-index free frame, without consuming it.
    #[must_use]
    pub fn find_free(&self) -> Option<FrameIndex> {
        self.frames
            .iter()
            .position(Frame::is_free)
            .map(FrameIndex::new)
    }
}
