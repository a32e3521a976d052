//! 磁盘上的 inode 记录
//!
//! inode 通过块索引找到其拥有的块：
//! - 直接索引：前 [`DIRECT_COUNT`] 块的编号直接记录在 inode 中
//! - 一级间接索引：间接块连续存储 [`INDIRECT_COUNT`] 个块编号
//!
//! 编号 0 表示该块尚未映射，读出时视为全零。

use alloc::sync::Arc;
use binrw::binrw;
use block_dev::BlockDevice;

use crate::{BLOCK_SIZE, DataBlock, Error, Result};

use super::{decode, encode};

/// 直接索引的编号数量
const DIRECT_COUNT: usize = 12;
/// 间接块的编号容量
const INDIRECT_COUNT: usize = BLOCK_SIZE / 4;

#[binrw]
#[brw(repr = u32)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InodeKind {
    /// 未分配
    #[default]
    Free = 0,
    Regular = 1,
    Directory = 2,
}

#[binrw]
#[brw(little)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiskInode {
    /// 编号，从 1 开始
    pub number: u32,
    pub kind: InodeKind,
    /// 字节数
    pub size: u32,
    direct: [u32; DIRECT_COUNT],
    /// 指向一级间接块
    indirect: u32,
}

/// 一级间接块
#[binrw]
#[brw(little)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndirectBlock {
    pub entries: [u32; INDIRECT_COUNT],
}

impl Default for IndirectBlock {
    fn default() -> Self {
        Self {
            entries: [0; INDIRECT_COUNT],
        }
    }
}

impl DiskInode {
    /// 编码后的字节数
    pub const SIZE: usize = 64;
    /// 每块容纳的 inode 数
    pub const PER_BLOCK: usize = BLOCK_SIZE / Self::SIZE;
    /// 一个 inode 最多能映射的块数
    pub const MAX_BLOCKS: usize = DIRECT_COUNT + INDIRECT_COUNT;

    pub fn new(number: u32, kind: InodeKind) -> Self {
        Self {
            number,
            kind,
            size: 0,
            direct: [0; DIRECT_COUNT],
            indirect: 0,
        }
    }

    #[inline]
    pub fn is_dir(&self) -> bool {
        self.kind == InodeKind::Directory
    }

    #[inline]
    pub fn is_free(&self) -> bool {
        self.kind == InodeKind::Free
    }

    /// 第 `index` 块的块编号，未映射时返回空
    pub fn block_addr(
        &self,
        index: usize,
        block_device: &Arc<dyn BlockDevice>,
    ) -> Result<Option<u32>> {
        let addr = if index < DIRECT_COUNT {
            self.direct[index]
        } else if index < Self::MAX_BLOCKS && self.indirect != 0 {
            self.load_indirect(block_device)?.entries[index - DIRECT_COUNT]
        } else {
            0
        };

        Ok((addr != 0).then_some(addr))
    }

    /// 映射第 `index` 块前是否需要先分配间接块
    #[inline]
    pub fn needs_indirect(&self, index: usize) -> bool {
        index >= DIRECT_COUNT && self.indirect == 0
    }

    /// 挂上一个已清零的间接块
    #[inline]
    pub fn set_indirect(&mut self, block: u32) {
        self.indirect = block;
    }

    /// 把第 `index` 块映射到块 `block`
    pub fn map_block(
        &mut self,
        index: usize,
        block: u32,
        block_device: &Arc<dyn BlockDevice>,
    ) -> Result<()> {
        if index < DIRECT_COUNT {
            self.direct[index] = block;
            return Ok(());
        }
        if index >= Self::MAX_BLOCKS {
            return Err(Error::NoSpace);
        }
        if self.indirect == 0 {
            return Err(Error::Corrupted);
        }

        let mut indirect = self.load_indirect(block_device)?;
        indirect.entries[index - DIRECT_COUNT] = block;
        let mut buf: DataBlock = [0; BLOCK_SIZE];
        encode(&indirect, &mut buf)?;
        block_device.write_block(self.indirect as usize, &buf);

        Ok(())
    }

    /// 已分配的块数，含间接块本身
    pub fn block_count(&self, block_device: &Arc<dyn BlockDevice>) -> Result<u32> {
        let direct = self.direct.iter().filter(|&&addr| addr != 0).count();
        let indirect = if self.indirect != 0 {
            let entries = self.load_indirect(block_device)?.entries;
            1 + entries.iter().filter(|&&addr| addr != 0).count()
        } else {
            0
        };

        Ok((direct + indirect) as u32)
    }

    fn load_indirect(&self, block_device: &Arc<dyn BlockDevice>) -> Result<IndirectBlock> {
        let mut buf: DataBlock = [0; BLOCK_SIZE];
        block_device.read_block(self.indirect as usize, &mut buf);
        decode(&buf)
    }
}

#[cfg(test)]
mod tests {
    use block_dev::MemoryDisk;

    use super::*;

    #[test]
    fn record_is_64_bytes() {
        let mut inode = DiskInode::new(3, InodeKind::Regular);
        inode.size = 700;
        let mut buf = [0xaau8; DiskInode::SIZE + 1];
        encode(&inode, &mut buf).unwrap();

        assert_eq!(&buf[0..4], &3u32.to_le_bytes());
        assert_eq!(&buf[4..8], &1u32.to_le_bytes());
        assert_eq!(&buf[8..12], &700u32.to_le_bytes());
        assert_eq!(buf[DiskInode::SIZE], 0xaa);
        assert_eq!(decode::<DiskInode>(&buf), Ok(inode));
        assert_eq!(DiskInode::PER_BLOCK, 8);
    }

    #[test]
    fn unknown_kind_is_corrupted() {
        let mut buf = [0u8; DiskInode::SIZE];
        buf[4] = 7;
        assert_eq!(decode::<DiskInode>(&buf), Err(Error::Corrupted));
    }

    #[test]
    fn direct_and_indirect_mapping() {
        let dev: Arc<dyn BlockDevice> = Arc::new(MemoryDisk::new(8));
        let mut inode = DiskInode::new(1, InodeKind::Regular);

        inode.map_block(0, 5, &dev).unwrap();
        assert_eq!(inode.block_addr(0, &dev), Ok(Some(5)));
        assert_eq!(inode.block_addr(1, &dev), Ok(None));

        assert!(inode.needs_indirect(DIRECT_COUNT));
        assert_eq!(inode.map_block(DIRECT_COUNT, 7, &dev), Err(Error::Corrupted));
        inode.set_indirect(6);
        inode.map_block(DIRECT_COUNT + 3, 7, &dev).unwrap();
        assert!(!inode.needs_indirect(DIRECT_COUNT));

        assert_eq!(inode.block_addr(DIRECT_COUNT + 3, &dev), Ok(Some(7)));
        assert_eq!(inode.block_addr(DIRECT_COUNT, &dev), Ok(None));
        assert_eq!(inode.block_count(&dev), Ok(3));

        assert_eq!(
            inode.map_block(DiskInode::MAX_BLOCKS, 7, &dev),
            Err(Error::NoSpace)
        );
        assert_eq!(inode.block_addr(DiskInode::MAX_BLOCKS, &dev), Ok(None));
    }
}
