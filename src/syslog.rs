//! The Syslog Reader (spec.md §4.4).

use addr::VAddr;

use crate::mmu::Mmu;
use crate::{Pager, PagerError, Pid};

impl Pager {
    /// Read `len` bytes starting at `addr` from `pid`'s address space and
    /// print them as lowercase hex, followed by a single newline iff
    /// `len > 0` (spec.md §4.4, matching `printf("%02x", byte)` per byte
    /// then `"\n"`).
    ///
    /// Returns `0` on success, `-1` if any byte offset falls outside the
    /// process's allocated virtual range or lands on a non-resident page
    /// (SPEC_FULL.md's resolution of the matching Open Question: this
    /// operation never faults pages in, so a non-resident page is treated
    /// the same as an unallocated one rather than read from undefined
    /// frame contents). No partial output is ever emitted.
    ///
    /// # Panics
    /// Panics if `pid` was never `create`d (spec.md §7, error kind 3).
    pub fn syslog(&self, pid: Pid, addr: VAddr, len: usize, mmu: &dyn Mmu) -> i32 {
        match self.read_bytes(pid, addr, len, mmu) {
            Ok(bytes) => {
                for byte in &bytes {
                    print!("{byte:02x}");
                }
                if !bytes.is_empty() {
                    println!();
                }
                0
            }
            Err(PagerError::OutOfRange) => -1,
            Err(other) => unreachable!("syslog only ever fails with OutOfRange, got {other:?}"),
        }
    }

    /// The testable core of [`Pager::syslog`]: computes the byte vector
    /// without touching stdout, so tests can assert on content instead of
    /// captured process output.
    pub(crate) fn read_bytes(
        &self,
        pid: Pid,
        addr: VAddr,
        len: usize,
        mmu: &dyn Mmu,
    ) -> Result<Vec<u8>, PagerError> {
        let table = self.registry.get(pid);
        let pmem = mmu.pmem();
        let mut bytes = Vec::with_capacity(len);

        for i in 0..len as u64 {
            let byte_addr = addr + i;
            let page_index = table.index_of(byte_addr).ok_or(PagerError::OutOfRange)?;
            let page = table.get(page_index);
            let frame = page.frame().ok_or(PagerError::OutOfRange)?;
            let offset = (byte_addr - page.vaddr()) as usize;
            let phys_index = frame.get() * self.page_size as usize + offset;
            bytes.push(pmem[phys_index]);
        }

        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mmu::Protection;
    use crate::Pager;

    struct RecordingMmu {
        pmem: Vec<u8>,
    }

    impl RecordingMmu {
        fn new(nframes: usize, page_size: usize) -> Self {
            Self {
                pmem: vec![0; nframes * page_size],
            }
        }
    }

    impl Mmu for RecordingMmu {
        fn resident(&mut self, _pid: i32, _vaddr: u64, _frame: crate::frame::FrameIndex, _prot: Protection) {}
        fn nonresident(&mut self, _pid: i32, _vaddr: u64) {}
        fn chprot(&mut self, _pid: i32, _vaddr: u64, _prot: Protection) {}
        fn disk_read(&mut self, _block: crate::block::BlockIndex, _frame: crate::frame::FrameIndex) {}
        fn disk_write(&mut self, _frame: crate::frame::FrameIndex, _block: crate::block::BlockIndex) {}
        fn zero_fill(&mut self, frame: crate::frame::FrameIndex) {
            let start = frame.get() * 4096;
            self.pmem[start..start + 4096].fill(0);
        }
        fn pmem(&self) -> &[u8] {
            &self.pmem
        }
    }

    #[test]
    fn reads_zero_filled_bytes_from_a_freshly_faulted_page() {
        let mut pager = Pager::new(2, 2, 4096, VAddr::new(0x1000_0000));
        let mut mmu = RecordingMmu::new(2, 4096);
        pager.create(7).unwrap();
        let a = pager.extend(7).unwrap();
        pager.fault(7, a, &mut mmu);

        let bytes = pager.read_bytes(7, a, 4, &mmu).unwrap();
        assert_eq!(bytes, vec![0, 0, 0, 0]);
    }

    #[test]
    fn out_of_range_read_returns_error_and_emits_no_output() {
        let mut pager = Pager::new(2, 2, 4096, VAddr::new(0x1000_0000));
        let mmu = RecordingMmu::new(2, 4096);
        pager.create(11).unwrap();
        let a = pager.extend(11).unwrap();

        assert_eq!(
            pager.read_bytes(11, a, 2 * 4096, &mmu),
            Err(PagerError::OutOfRange)
        );
    }

    #[test]
    fn non_resident_page_is_treated_as_out_of_range() {
        let mut pager = Pager::new(2, 2, 4096, VAddr::new(0x1000_0000));
        let mmu = RecordingMmu::new(2, 4096);
        pager.create(3).unwrap();
        let a = pager.extend(3).unwrap();
        // Never faulted in: page exists but is not resident.
        assert_eq!(pager.read_bytes(3, a, 1, &mmu), Err(PagerError::OutOfRange));
    }
}
