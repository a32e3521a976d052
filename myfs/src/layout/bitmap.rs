//! 空闲块位图
//!
//! 整张位图占一个块，第 `i` 位指示第 `i` 块是否已被占用，
//! 字节内从最低位开始编号。

use alloc::boxed::Box;
use core::ops::Range;

use crate::DataBlock;

/// 内存中的位图副本，写回磁盘由卷负责
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    bits: Box<DataBlock>,
}

impl Default for Bitmap {
    fn default() -> Self {
        Self {
            bits: Box::new([0; crate::BLOCK_SIZE]),
        }
    }
}

impl From<DataBlock> for Bitmap {
    fn from(block: DataBlock) -> Self {
        Self {
            bits: Box::new(block),
        }
    }
}

impl Bitmap {
    #[inline]
    pub fn as_block(&self) -> &DataBlock {
        &self.bits
    }

    #[inline]
    pub fn is_set(&self, id: u32) -> bool {
        self.bits[id as usize / 8] & (1 << (id % 8)) != 0
    }

    #[inline]
    pub fn set(&mut self, id: u32) {
        self.bits[id as usize / 8] |= 1 << (id % 8);
    }

    /// 把整段区域标记为占用
    pub fn reserve(&mut self, range: Range<u32>) {
        range.for_each(|id| self.set(id));
    }

    /// 区域内空闲块的数量
    pub fn count_clear(&self, range: Range<u32>) -> u32 {
        range.filter(|&id| !self.is_set(id)).count() as u32
    }

    /// 在区域内找到首个空闲块，标记后返回其编号
    pub fn alloc(&mut self, mut range: Range<u32>) -> Option<u32> {
        let id = range.find(|&id| !self.is_set(id))?;
        self.set(id);
        Some(id)
    }
}
