use alloc::{vec, vec::Vec};

use spin::Mutex;

use crate::{BlockDevice, SECTOR_SIZE};

/// 内存盘，把一段连续内存当作块设备
#[derive(Debug)]
pub struct MemoryDisk {
    sectors: Mutex<Vec<u8>>,
    num_blocks: usize,
}

impl MemoryDisk {
    /// 创建全零的内存盘
    pub fn new(num_blocks: usize) -> Self {
        Self::filled(num_blocks, 0)
    }

    /// 创建每个字节都为 `byte` 的内存盘
    pub fn filled(num_blocks: usize, byte: u8) -> Self {
        Self {
            sectors: Mutex::new(vec![byte; num_blocks * SECTOR_SIZE]),
            num_blocks,
        }
    }

    /// 拷贝整张盘的内容
    pub fn snapshot(&self) -> Vec<u8> {
        self.sectors.lock().clone()
    }

    fn range(&self, block_id: usize, len: usize) -> core::ops::Range<usize> {
        assert!(
            block_id < self.num_blocks,
            "block {block_id} out of range 0..{}",
            self.num_blocks
        );
        assert_eq!(len, SECTOR_SIZE, "not a complete block!");

        let start = block_id * SECTOR_SIZE;
        start..start + SECTOR_SIZE
    }
}

impl BlockDevice for MemoryDisk {
    fn read_block(&self, block_id: usize, buf: &mut [u8]) {
        let range = self.range(block_id, buf.len());
        buf.copy_from_slice(&self.sectors.lock()[range]);
    }

    fn write_block(&self, block_id: usize, buf: &[u8]) {
        let range = self.range(block_id, buf.len());
        self.sectors.lock()[range].copy_from_slice(buf);
    }

    fn num_blocks(&self) -> usize {
        self.num_blocks
    }
}
