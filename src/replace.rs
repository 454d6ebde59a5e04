//! Second-chance (clock) replacement policy over the Frame Table
//! (spec.md §4.3).

use crate::frame::{FrameIndex, FrameTable};

/// Select a victim frame starting at the table's clock hand.
///
/// Scans cyclically: a frame with `referenced == false` is chosen
/// immediately and the hand advances one position past it; a frame with
/// `referenced == true` has its bit cleared and the scan continues.
/// Termination is guaranteed because every frame is inspected at most
/// twice before its `referenced` bit is forced to `false`.
///
/// # Panics
/// Panics if the table has no frames at all.
pub fn select_victim(table: &mut FrameTable) -> FrameIndex {
    assert!(!table.is_empty(), "no frames to select a victim from");
    loop {
        let hand = table.hand();
        let victim = FrameIndex::new(hand);
        if table.get(victim).referenced() {
            table.get_mut(victim).set_referenced(false);
            table.set_hand(hand + 1);
        } else {
            table.set_hand(hand + 1);
            return victim;
        }
    }
}
