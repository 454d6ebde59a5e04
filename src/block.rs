//! The Block Table: a fixed-size array of backing-store block descriptors.
//!
//! Like [`crate::frame`], a block only carries a back-reference to its
//! owning page as a `(pid, page_index)` pair rather than a pointer, an
//! arena-plus-index design that sidesteps pointer cycles entirely.

use crate::Pid;

/// Index of a block in the Block Table (the backing store / simulated
/// disk).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlockIndex(pub usize);

impl BlockIndex {
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }
}

/// One backing-store block descriptor.
#[derive(Debug, Clone, Copy, Default)]
struct Block {
    owner: Option<(Pid, usize)>,
    ever_written: bool,
}

/// Fixed-size table of backing-store block descriptors.
pub struct BlockTable {
    blocks: Vec<Block>,
}

impl BlockTable {
    #[must_use]
    pub fn new(nblocks: usize) -> Self {
        Self {
            blocks: vec![Block::default(); nblocks],
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    #[must_use]
    pub fn free_count(&self) -> usize {
        self.blocks.iter().filter(|b| b.owner.is_none()).count()
    }

    #[must_use]
    pub fn ever_written(&self, index: BlockIndex) -> bool {
        self.blocks[index.0].ever_written
    }

    pub fn mark_written(&mut self, index: BlockIndex) {
        self.blocks[index.0].ever_written = true;
    }

    /// Reserve the lowest-index free block for `(pid, page_index)`. Returns
    /// `None` if every block is owned.
    pub fn reserve_free(&mut self, pid: Pid, page_index: usize) -> Option<BlockIndex> {
        let index = self.blocks.iter().position(|b| b.owner.is_none())?;
        self.blocks[index].owner = Some((pid, page_index));
        Some(BlockIndex::new(index))
    }

    /// Return a block to the free pool and reset it to a clean baseline:
    /// `ever_written` goes back to `false`, since the block's contents
    /// belonged to a page that no longer exists.
    pub fn release(&mut self, index: BlockIndex) {
        self.blocks[index.0] = Block::default();
    }
}
