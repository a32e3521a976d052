//! # 目录表
//!
//! 目录项紧密排列在目录 inode 的数据块中，每块 [`ENTRIES_PER_BLOCK`] 项。
//! 目录大小界定有效目录项的范围；删除只清零槽位，留下的空洞可被复用。

use crate::layout::{DirEntry, DiskInode, decode, encode};
use crate::volume::Volume;
use crate::{BLOCK_SIZE, DataBlock, Error, Result};

pub const ENTRIES_PER_BLOCK: usize = BLOCK_SIZE / DirEntry::SIZE;

/// 目录项在磁盘上的位置
struct Slot {
    block: u32,
    index: usize,
}

#[inline]
fn entry_at(buf: &DataBlock, slot: usize) -> Result<DirEntry> {
    decode(&buf[slot * DirEntry::SIZE..])
}

impl Volume {
    pub fn dir_lookup(&self, dir: &DiskInode, name: &str) -> Result<Option<DirEntry>> {
        Ok(self.dir_find(dir, name)?.map(|(entry, _)| entry))
    }

    /// 在首个空槽写入新目录项，块用尽时为目录追加一块
    pub fn dir_insert(&mut self, dir: &mut DiskInode, name: &str, inode_number: u32) -> Result<()> {
        let inode_number = u16::try_from(inode_number).map_err(|_| Error::InvalidInode)?;
        if self.dir_find(dir, name)?.is_some() {
            return Err(Error::AlreadyExists);
        }

        let entry = DirEntry::new(name, inode_number);
        for index in 0..DiskInode::MAX_BLOCKS {
            let block = match self.block_of(dir, index)? {
                Some(block) => block,
                None => match self.grow(dir, index) {
                    Ok(block) => {
                        log::debug!("directory {} grows to {} blocks", dir.number, index + 1);
                        block
                    }
                    Err(err) => {
                        self.save_inode(dir)?;
                        return Err(err);
                    }
                },
            };

            let mut buf = self.read_block(block);
            let mut free = None;
            for slot in 0..ENTRIES_PER_BLOCK {
                if entry_at(&buf, slot)?.is_free() {
                    free = Some(slot);
                    break;
                }
            }
            let Some(slot) = free else {
                continue;
            };

            encode(&entry, &mut buf[slot * DirEntry::SIZE..])?;
            self.write_block(block, &buf);

            let end = (index * BLOCK_SIZE + (slot + 1) * DirEntry::SIZE) as u32;
            dir.size = dir.size.max(end);
            self.save_inode(dir)?;

            log::debug!("linked {name:?} -> inode {inode_number}");
            return Ok(());
        }

        Err(Error::NoSpace)
    }

    /// 清零目录项，返回它指向的 inode 编号；目录大小不变
    pub fn dir_remove(&self, dir: &DiskInode, name: &str) -> Result<u32> {
        let (entry, slot) = self.dir_find(dir, name)?.ok_or(Error::NotFound)?;

        let mut buf = self.read_block(slot.block);
        encode(&DirEntry::default(), &mut buf[slot.index * DirEntry::SIZE..])?;
        self.write_block(slot.block, &buf);

        log::debug!("unlinked {name:?} (inode {})", entry.inode_number());
        Ok(entry.inode_number())
    }

    /// 从 `cursor` 起的下一个有效目录项，以及下次继续的位置。
    ///
    /// 越过目录大小或遇到未映射的块即为读尽。
    pub fn dir_next(&self, dir: &DiskInode, mut cursor: usize) -> Result<Option<(DirEntry, usize)>> {
        let end = dir.size as usize / DirEntry::SIZE;

        while cursor < end {
            let index = cursor / ENTRIES_PER_BLOCK;
            let Some(block) = self.block_of(dir, index)? else {
                return Ok(None);
            };

            let buf = self.read_block(block);
            while cursor < end && cursor / ENTRIES_PER_BLOCK == index {
                let entry = entry_at(&buf, cursor % ENTRIES_PER_BLOCK)?;
                cursor += 1;
                if !entry.is_free() {
                    return Ok(Some((entry, cursor)));
                }
            }
        }

        Ok(None)
    }

    fn dir_find(&self, dir: &DiskInode, name: &str) -> Result<Option<(DirEntry, Slot)>> {
        let blocks = (dir.size as usize).div_ceil(BLOCK_SIZE);

        for index in 0..blocks {
            let Some(block) = self.block_of(dir, index)? else {
                continue;
            };

            let buf = self.read_block(block);
            for slot in 0..ENTRIES_PER_BLOCK {
                let entry = entry_at(&buf, slot)?;
                if !entry.is_free() && entry.name_matches(name) {
                    return Ok(Some((entry, Slot { block, index: slot })));
                }
            }
        }

        Ok(None)
    }
}
