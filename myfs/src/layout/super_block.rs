use binrw::binrw;

use crate::{BLOCK_SIZE, Error, INODE_REGION_START, MAGIC, ROOT_INODE, Result};

use super::DiskInode;

/// 超级块，位于 0 号块的开头，块的其余部分为零
#[binrw]
#[brw(little)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuperBlock {
    pub magic: u32,
    pub block_size: u32,
    pub total_blocks: u32,
    pub inode_region_start: u32,
    pub inode_count: u32,
    pub data_region_start: u32,
    /// 数据区内空闲块的数量
    pub free_blocks: u32,
    pub root_inode: u32,
}

impl SuperBlock {
    /// 编码后的字节数
    pub const SIZE: usize = 32;

    /// 计算新卷的几何参数，此时数据区尚未分配任何块
    pub fn new(total_blocks: u32, inode_blocks: u32) -> Self {
        let inode_count = (inode_blocks as usize * DiskInode::PER_BLOCK).min(u16::MAX as usize);
        let data_region_start = INODE_REGION_START + inode_blocks;

        Self {
            magic: MAGIC,
            block_size: BLOCK_SIZE as u32,
            total_blocks,
            inode_region_start: INODE_REGION_START,
            inode_count: inode_count as u32,
            data_region_start,
            free_blocks: total_blocks - data_region_start,
            root_inode: ROOT_INODE,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.magic != MAGIC {
            return Err(Error::InvalidSignature);
        }
        if self.block_size as usize != BLOCK_SIZE {
            return Err(Error::UnsupportedBlockSize);
        }
        if self.root_inode != ROOT_INODE
            || self.inode_region_start != INODE_REGION_START
            || self.inode_region_start >= self.data_region_start
            || self.data_region_start > self.total_blocks
        {
            return Err(Error::Corrupted);
        }
        // inode 表须放得下全部 inode，编号须能写进目录项
        let capacity = self.inode_blocks() as usize * DiskInode::PER_BLOCK;
        if self.inode_count == 0
            || self.inode_count as usize > capacity.min(u16::MAX as usize)
        {
            return Err(Error::Corrupted);
        }

        Ok(())
    }

    #[inline]
    pub fn inode_blocks(&self) -> u32 {
        self.data_region_start - self.inode_region_start
    }
}
