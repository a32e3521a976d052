//! # 卷
//!
//! 已挂载的文件系统在内存中的全部状态：超级块副本、位图副本与打开描述符表。
//! 位图与超级块总是一起写回磁盘。
//!
//! 磁盘布局：
//!
//! | 块 | 内容 |
//! |----|------|
//! | 0 | 超级块 |
//! | 1 | 空闲块位图 |
//! | `[2, data_region_start)` | inode 表 |
//! | `[data_region_start, total_blocks)` | 数据块 |

use alloc::sync::Arc;
use block_dev::BlockDevice;

use crate::fd_table::FdTable;
use crate::layout::{Bitmap, DiskInode, InodeKind, SuperBlock, decode, encode};
use crate::{
    BITMAP_BLOCK_ID, BLOCK_BITS, BLOCK_SIZE, DataBlock, Error, INODE_REGION_PERCENT,
    INODE_REGION_START, ROOT_INODE, Result, SUPER_BLOCK_ID,
};

#[derive(Debug)]
pub struct Volume {
    pub block_device: Arc<dyn BlockDevice>,
    pub super_block: SuperBlock,
    bitmap: Bitmap,
    pub files: FdTable,
}

impl Volume {
    /// 在块设备上建立新卷，返回数据区的空闲块数
    pub fn format(block_device: &Arc<dyn BlockDevice>, block_size: usize) -> Result<u32> {
        if block_size != BLOCK_SIZE {
            return Err(Error::UnsupportedBlockSize);
        }

        let total_blocks = block_device.num_blocks();
        if total_blocks > BLOCK_BITS {
            return Err(Error::DeviceTooLarge);
        }
        let total_blocks = total_blocks as u32;
        let inode_blocks = (total_blocks * INODE_REGION_PERCENT / 100).max(1);
        // 两个固定块、inode 区，再加至少一个数据块
        if INODE_REGION_START + inode_blocks >= total_blocks {
            return Err(Error::DeviceTooSmall);
        }

        let super_block = SuperBlock::new(total_blocks, inode_blocks);
        let mut bitmap = Bitmap::default();
        bitmap.reserve(0..super_block.data_region_start);

        let mut volume = Self {
            block_device: block_device.clone(),
            super_block,
            bitmap,
            files: FdTable::new(),
        };
        volume.sync_meta()?;
        volume.init_inode_table()?;

        let mut root = DiskInode::new(ROOT_INODE, InodeKind::Directory);
        volume.grow(&mut root, 0)?;
        volume.save_inode(&root)?;

        log::info!(
            "formatted {total_blocks} blocks: {} inodes, data region at {}, {} free",
            volume.super_block.inode_count,
            volume.super_block.data_region_start,
            volume.super_block.free_blocks,
        );

        Ok(volume.super_block.free_blocks)
    }

    /// 读出并校验超级块，载入位图
    pub fn mount(block_device: &Arc<dyn BlockDevice>) -> Result<Self> {
        let device_blocks = block_device.num_blocks();
        if device_blocks <= BITMAP_BLOCK_ID {
            return Err(Error::DeviceTooSmall);
        }

        let mut buf: DataBlock = [0; BLOCK_SIZE];
        block_device.read_block(SUPER_BLOCK_ID, &mut buf);
        let super_block: SuperBlock = decode(&buf)?;
        super_block.validate()?;
        if super_block.total_blocks as usize > device_blocks.min(BLOCK_BITS) {
            return Err(Error::Corrupted);
        }

        block_device.read_block(BITMAP_BLOCK_ID, &mut buf);

        Ok(Self {
            block_device: block_device.clone(),
            super_block,
            bitmap: Bitmap::from(buf),
            files: FdTable::new(),
        })
    }

    /// 在数据区分配一个块，位图与超级块随即写回
    pub fn alloc_block(&mut self) -> Result<u32> {
        let data_region = self.super_block.data_region_start..self.super_block.total_blocks;
        let block = self.bitmap.alloc(data_region).ok_or(Error::NoSpace)?;
        self.super_block.free_blocks = self.super_block.free_blocks.saturating_sub(1);
        self.sync_meta()?;

        log::debug!(
            "allocated block {block}, {} free",
            self.super_block.free_blocks
        );
        Ok(block)
    }

    /// 让 inode 拥有第 `index` 块，按需先分配间接块；新块均已清零。
    ///
    /// 由调用方保存 inode，失败时也一样，否则已分配的间接块会丢失。
    pub fn grow(&mut self, inode: &mut DiskInode, index: usize) -> Result<u32> {
        if index >= DiskInode::MAX_BLOCKS {
            return Err(Error::NoSpace);
        }

        if inode.needs_indirect(index) {
            let indirect = self.alloc_block()?;
            self.write_block(indirect, &[0; BLOCK_SIZE]);
            inode.set_indirect(indirect);
        }

        let block = self.alloc_block()?;
        self.write_block(block, &[0; BLOCK_SIZE]);
        inode.map_block(index, block, &self.block_device)?;

        Ok(block)
    }

    /// inode 第 `index` 块的块编号，编号须落在数据区内
    pub fn block_of(&self, inode: &DiskInode, index: usize) -> Result<Option<u32>> {
        let Some(block) = inode.block_addr(index, &self.block_device)? else {
            return Ok(None);
        };

        let sb = &self.super_block;
        if !(sb.data_region_start..sb.total_blocks).contains(&block) {
            log::error!("inode {} maps block {index} to {block}", inode.number);
            return Err(Error::Corrupted);
        }

        Ok(Some(block))
    }

    pub fn load_inode(&self, number: u32) -> Result<DiskInode> {
        let (block, offset) = self.inode_pos(number)?;
        let inode: DiskInode = decode(&self.read_block(block)[offset..])?;
        if inode.number != number {
            log::error!("inode slot {number} holds inode {}", inode.number);
            return Err(Error::Corrupted);
        }

        Ok(inode)
    }

    pub fn save_inode(&self, inode: &DiskInode) -> Result<()> {
        let (block, offset) = self.inode_pos(inode.number)?;
        let mut buf = self.read_block(block);
        encode(inode, &mut buf[offset..])?;
        self.write_block(block, &buf);
        Ok(())
    }

    /// 取出首个空闲 inode，标记为 `kind` 并写回
    pub fn alloc_inode(&mut self, kind: InodeKind) -> Result<DiskInode> {
        for number in 1..=self.super_block.inode_count {
            if self.load_inode(number)?.is_free() {
                let inode = DiskInode::new(number, kind);
                self.save_inode(&inode)?;
                log::debug!("allocated inode {number} as {kind:?}");
                return Ok(inode);
            }
        }

        Err(Error::NoInode)
    }

    pub fn read_block(&self, block: u32) -> DataBlock {
        let mut buf = [0; BLOCK_SIZE];
        self.block_device.read_block(block as usize, &mut buf);
        buf
    }

    #[inline]
    pub fn write_block(&self, block: u32, buf: &DataBlock) {
        self.block_device.write_block(block as usize, buf);
    }

    /// 数据区中的空闲块数
    #[inline]
    pub fn free_blocks(&self) -> u32 {
        self.super_block.free_blocks
    }

    #[cfg(test)]
    pub fn bitmap(&self) -> &Bitmap {
        &self.bitmap
    }

    /// inode 所在的块及块内偏移
    fn inode_pos(&self, number: u32) -> Result<(u32, usize)> {
        if number == 0 || number > self.super_block.inode_count {
            return Err(Error::InvalidInode);
        }

        let slot = (number - 1) as usize;
        let block = self.super_block.inode_region_start + (slot / DiskInode::PER_BLOCK) as u32;
        Ok((block, slot % DiskInode::PER_BLOCK * DiskInode::SIZE))
    }

    /// 整个 inode 区重写为空闲 inode，槽位之外清零
    fn init_inode_table(&self) -> Result<()> {
        let sb = &self.super_block;
        for (i, block) in (sb.inode_region_start..sb.data_region_start).enumerate() {
            let mut buf: DataBlock = [0; BLOCK_SIZE];
            for slot in 0..DiskInode::PER_BLOCK {
                let number = (i * DiskInode::PER_BLOCK + slot + 1) as u32;
                if number > sb.inode_count {
                    break;
                }
                let offset = slot * DiskInode::SIZE;
                encode(&DiskInode::new(number, InodeKind::Free), &mut buf[offset..])?;
            }
            self.write_block(block, &buf);
        }

        Ok(())
    }

    fn sync_meta(&self) -> Result<()> {
        self.write_block(BITMAP_BLOCK_ID as u32, self.bitmap.as_block());

        let mut buf: DataBlock = [0; BLOCK_SIZE];
        encode(&self.super_block, &mut buf)?;
        self.write_block(SUPER_BLOCK_ID as u32, &buf);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use block_dev::MemoryDisk;

    use super::*;

    fn formatted(blocks: usize) -> Arc<dyn BlockDevice> {
        let dev: Arc<dyn BlockDevice> = Arc::new(MemoryDisk::new(blocks));
        Volume::format(&dev, BLOCK_SIZE).unwrap();
        dev
    }

    #[test]
    fn root_directory_after_format() {
        let volume = Volume::mount(&formatted(20)).unwrap();
        let root = volume.load_inode(ROOT_INODE).unwrap();
        assert!(root.is_dir());
        assert_eq!(root.size, 0);
        assert_eq!(root.block_addr(0, &volume.block_device), Ok(Some(4)));
        assert!(volume.load_inode(2).unwrap().is_free());
        assert_eq!(volume.load_inode(0), Err(Error::InvalidInode));
        assert_eq!(volume.load_inode(17), Err(Error::InvalidInode));
    }

    #[test]
    fn free_blocks_matches_bitmap() {
        let mut volume = Volume::mount(&formatted(20)).unwrap();
        assert_eq!(volume.bitmap().count_clear(volume_range(&volume)), 15);
        assert_eq!(volume.free_blocks(), 15);
        assert_eq!(volume.alloc_block(), Ok(5));
        assert_eq!(volume.free_blocks(), 14);
        assert_eq!(volume.bitmap().count_clear(volume_range(&volume)), 14);

        while volume.alloc_block().is_ok() {}
        assert_eq!(volume.free_blocks(), 0);
        assert_eq!(volume.alloc_block(), Err(Error::NoSpace));
    }

    fn volume_range(volume: &Volume) -> core::ops::Range<u32> {
        volume.super_block.data_region_start..volume.super_block.total_blocks
    }

    #[test]
    fn allocation_is_written_through() {
        let dev = formatted(20);
        let mut volume = Volume::mount(&dev).unwrap();
        volume.alloc_block().unwrap();

        let remounted = Volume::mount(&dev).unwrap();
        assert_eq!(remounted.free_blocks(), 14);
        assert!(remounted.bitmap().is_set(5));
    }

    #[test]
    fn inode_exhaustion() {
        let mut volume = Volume::mount(&formatted(20)).unwrap();
        for number in 2..=16 {
            assert_eq!(volume.alloc_inode(InodeKind::Regular).unwrap().number, number);
        }
        assert_eq!(volume.alloc_inode(InodeKind::Regular), Err(Error::NoInode));
    }
}
