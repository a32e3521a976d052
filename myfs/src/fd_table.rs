//! 打开描述符表
//!
//! 描述符 `n` 对应第 `n - 1` 个槽位，描述符 0 永远无效。

use vfs::Fd;

use crate::{Error, MAX_OPEN_FILES, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    File,
    Directory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenFile {
    pub inode: u32,
    /// 文件为字节偏移，目录为目录项下标
    pub cursor: usize,
    pub kind: FileKind,
}

#[derive(Debug)]
pub struct FdTable {
    slots: [Option<OpenFile>; MAX_OPEN_FILES],
}

impl FdTable {
    pub fn new() -> Self {
        Self {
            slots: [None; MAX_OPEN_FILES],
        }
    }

    /// 没有正在使用的描述符
    pub fn is_idle(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// 占用首个空槽
    pub fn acquire(&mut self, inode: u32, kind: FileKind) -> Result<Fd> {
        let index = self
            .slots
            .iter()
            .position(Option::is_none)
            .ok_or(Error::TableFull)?;
        self.slots[index] = Some(OpenFile {
            inode,
            cursor: 0,
            kind,
        });

        Ok(Fd::from_index(index))
    }

    pub fn get(&self, fd: Fd, kind: FileKind) -> Result<&OpenFile> {
        let index = self.index_of(fd, kind)?;
        self.slots[index].as_ref().ok_or(Error::InvalidHandle)
    }

    pub fn get_mut(&mut self, fd: Fd, kind: FileKind) -> Result<&mut OpenFile> {
        let index = self.index_of(fd, kind)?;
        self.slots[index].as_mut().ok_or(Error::InvalidHandle)
    }

    /// 不区分种类地取出打开的描述符
    pub fn get_any(&self, fd: Fd) -> Result<&OpenFile> {
        fd.index()
            .and_then(|index| self.slots.get(index))
            .and_then(Option::as_ref)
            .ok_or(Error::InvalidHandle)
    }

    pub fn release(&mut self, fd: Fd, kind: FileKind) -> Result<()> {
        let index = self.index_of(fd, kind)?;
        self.slots[index] = None;
        Ok(())
    }

    fn index_of(&self, fd: Fd, kind: FileKind) -> Result<usize> {
        let index = fd
            .index()
            .filter(|&index| index < MAX_OPEN_FILES)
            .ok_or(Error::InvalidHandle)?;
        match self.slots[index] {
            Some(file) if file.kind == kind => Ok(index),
            _ => Err(Error::InvalidHandle),
        }
    }
}
