//! # 数据传输层
//!
//! 路径与描述符在这里落到 inode 上：文件按块读写，目录按项迭代。
//! 所有路径都是根目录下的单层名字，形如 `/name`。

use vfs::{Fd, Stat, StatKind};

use crate::fd_table::FileKind;
use crate::layout::{DiskInode, InodeKind};
use crate::volume::Volume;
use crate::{BLOCK_SIZE, DataBlock, Error, NAME_MAX_LEN, ROOT_INODE, Result};

/// 从 `/name` 中取出名字
fn file_name(path: &str) -> Result<&str> {
    let name = path.strip_prefix('/').ok_or(Error::InvalidPath)?;
    validate_name(name)?;
    Ok(name)
}

fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() || name.len() > NAME_MAX_LEN || name.contains(['/', '\0']) {
        return Err(Error::InvalidPath);
    }

    Ok(())
}

impl Volume {
    /// 打开根目录下的文件，不存在时创建
    pub fn open(&mut self, path: &str) -> Result<Fd> {
        let name = file_name(path)?;
        let mut root = self.load_inode(ROOT_INODE)?;

        let number = match self.dir_lookup(&root, name)? {
            Some(entry) => {
                let mut inode = self.load_inode(entry.inode_number())?;
                match inode.kind {
                    InodeKind::Directory => return Err(Error::IsADirectory),
                    // 仅被链接过的空闲 inode，此时才成为文件
                    InodeKind::Free => {
                        inode.kind = InodeKind::Regular;
                        self.save_inode(&inode)?;
                    }
                    InodeKind::Regular => {}
                }
                inode.number
            }
            None => {
                let inode = self.alloc_inode(InodeKind::Regular)?;
                if let Err(err) = self.dir_insert(&mut root, name, inode.number) {
                    self.save_inode(&DiskInode::new(inode.number, InodeKind::Free))?;
                    return Err(err);
                }
                log::debug!("created {path} as inode {}", inode.number);
                inode.number
            }
        };

        self.files.acquire(number, FileKind::File)
    }

    /// 从游标处读出至多 `buf.len()` 字节，未映射的块读出为零
    pub fn read(&mut self, fd: Fd, buf: &mut [u8]) -> Result<usize> {
        let file = *self.files.get(fd, FileKind::File)?;
        let inode = self.load_inode(file.inode)?;

        let size = inode.size as usize;
        if file.cursor >= size {
            return Ok(0);
        }
        let len = buf.len().min(size - file.cursor);

        let mut done = 0;
        while done < len {
            let pos = file.cursor + done;
            let (index, offset) = (pos / BLOCK_SIZE, pos % BLOCK_SIZE);
            let chunk = (BLOCK_SIZE - offset).min(len - done);
            let dst = &mut buf[done..done + chunk];

            match self.block_of(&inode, index)? {
                Some(block) => dst.copy_from_slice(&self.read_block(block)[offset..offset + chunk]),
                None => dst.fill(0),
            }
            log::trace!("read {chunk} bytes at {pos} of inode {}", inode.number);
            done += chunk;
        }

        self.files.get_mut(fd, FileKind::File)?.cursor += done;
        Ok(done)
    }

    /// 从游标处写入，按需分配块。空间用尽时提前停止，返回已写入的字节数；
    /// 中途出错时已写入的部分照样生效。
    pub fn write(&mut self, fd: Fd, data: &[u8]) -> Result<usize> {
        let file = *self.files.get(fd, FileKind::File)?;
        let mut inode = self.load_inode(file.inode)?;
        let mut dirty = false;
        let mut failure = None;

        let mut done = 0;
        while done < data.len() {
            let pos = file.cursor + done;
            let (index, offset) = (pos / BLOCK_SIZE, pos % BLOCK_SIZE);
            let chunk = (BLOCK_SIZE - offset).min(data.len() - done);

            let mapped = match self.block_of(&inode, index) {
                Ok(mapped) => mapped,
                Err(err) => {
                    failure = Some(err);
                    break;
                }
            };
            let (block, mut buf): (u32, DataBlock) = match mapped {
                Some(block) if chunk < BLOCK_SIZE => (block, self.read_block(block)),
                Some(block) => (block, [0; BLOCK_SIZE]),
                None => {
                    // 即便失败，间接块也可能已挂上
                    dirty = true;
                    match self.grow(&mut inode, index) {
                        Ok(block) => (block, [0; BLOCK_SIZE]),
                        Err(Error::NoSpace) => {
                            log::warn!(
                                "inode {} is out of space, wrote {done} of {} bytes",
                                inode.number,
                                data.len()
                            );
                            break;
                        }
                        Err(err) => {
                            failure = Some(err);
                            break;
                        }
                    }
                }
            };

            buf[offset..offset + chunk].copy_from_slice(&data[done..done + chunk]);
            self.write_block(block, &buf);
            log::trace!("wrote {chunk} bytes at {pos} of inode {}", inode.number);
            done += chunk;
        }

        let end = (file.cursor + done) as u32;
        if done > 0 && end > inode.size {
            inode.size = end;
            dirty = true;
        }
        if dirty {
            self.save_inode(&inode)?;
        }
        self.files.get_mut(fd, FileKind::File)?.cursor += done;

        match failure {
            Some(err) if done == 0 => Err(err),
            Some(err) => {
                log::warn!("write to inode {} stopped after {done} bytes: {err}", inode.number);
                Ok(done)
            }
            None => Ok(done),
        }
    }

    /// 越过文件末尾后写入会留下读出为零的空洞
    pub fn seek(&mut self, fd: Fd, offset: usize) -> Result<()> {
        let file = self.files.get_mut(fd, FileKind::File)?;
        if offset > DiskInode::MAX_BLOCKS * BLOCK_SIZE {
            return Err(Error::InvalidOffset);
        }

        file.cursor = offset;
        Ok(())
    }

    pub fn stat(&self, fd: Fd) -> Result<Stat> {
        let file = self.files.get_any(fd)?;
        self.inode_stat(&self.load_inode(file.inode)?)
    }

    /// 按路径查看文件，不创建也不改动任何东西。
    ///
    /// 名字不存在，或只链接到了空闲 inode 时返回空。
    pub fn lookup(&self, path: &str) -> Result<Option<Stat>> {
        let name = file_name(path)?;
        let root = self.load_inode(ROOT_INODE)?;
        let Some(entry) = self.dir_lookup(&root, name)? else {
            return Ok(None);
        };

        let inode = self.load_inode(entry.inode_number())?;
        if inode.is_free() {
            return Ok(None);
        }
        self.inode_stat(&inode).map(Some)
    }

    fn inode_stat(&self, inode: &DiskInode) -> Result<Stat> {
        Ok(Stat {
            inode: inode.number as u64,
            kind: if inode.is_dir() {
                StatKind::DIR
            } else {
                StatKind::FILE
            },
            block_size: BLOCK_SIZE as u64,
            blocks: inode.block_count(&self.block_device)? as u64,
            size: inode.size as u64,
        })
    }

    pub fn close(&mut self, fd: Fd) -> Result<()> {
        self.files.release(fd, FileKind::File)
    }

    /// 只有根目录可以打开
    pub fn open_dir(&mut self, path: &str) -> Result<Fd> {
        if path != "/" {
            return Err(Error::InvalidPath);
        }
        if !self.load_inode(ROOT_INODE)?.is_dir() {
            return Err(Error::NotADirectory);
        }

        self.files.acquire(ROOT_INODE, FileKind::Directory)
    }

    pub fn read_dir(&mut self, fd: Fd) -> Result<Option<vfs::DirEntry>> {
        let file = *self.files.get(fd, FileKind::Directory)?;
        let dir = self.load_inode(file.inode)?;

        let Some((entry, next)) = self.dir_next(&dir, file.cursor)? else {
            return Ok(None);
        };
        self.files.get_mut(fd, FileKind::Directory)?.cursor = next;

        Ok(Some(vfs::DirEntry {
            inode: entry.inode_number(),
            name: entry.name(),
        }))
    }

    /// 在目录下为编号 `inode` 的 inode 新增名字
    pub fn link(&mut self, fd: Fd, name: &str, inode: u32) -> Result<()> {
        let file = *self.files.get(fd, FileKind::Directory)?;
        validate_name(name)?;
        if inode == 0 || inode > self.super_block.inode_count {
            return Err(Error::InvalidInode);
        }

        let mut dir = self.load_inode(file.inode)?;
        self.dir_insert(&mut dir, name, inode)
    }

    /// 删除名字，inode 与其数据块保持原样
    pub fn unlink(&mut self, fd: Fd, name: &str) -> Result<()> {
        let file = *self.files.get(fd, FileKind::Directory)?;
        validate_name(name)?;

        let dir = self.load_inode(file.inode)?;
        self.dir_remove(&dir, name).map(drop)
    }

    pub fn close_dir(&mut self, fd: Fd) -> Result<()> {
        self.files.release(fd, FileKind::Directory)
    }
}
