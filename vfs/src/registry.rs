//! 文件系统登记表
//!
//! 每种文件系统以一个字符作为标识符登记，
//! 挂载方通过标识符在块设备上实例化对应的文件系统。

use alloc::{boxed::Box, sync::Arc, vec::Vec};

use block_dev::BlockDevice;
use enumflags2::{BitFlags, bitflags};
use spin::Mutex;

use crate::{Error, FileSystem, Result};

/// 文件系统提供的能力
#[bitflags]
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    File = 0b01,
    Directory = 0b10,
}

/// 已实例化的文件系统，锁即是整个卷的互斥区
pub type SharedFs = Arc<Mutex<Box<dyn FileSystem>>>;

#[derive(Debug, Clone, Copy)]
pub struct FsInfo {
    /// 标识符
    pub fsid: char,
    pub name: &'static str,
    pub capabilities: BitFlags<Capability>,
    /// 在块设备上构造文件系统实例
    pub create: fn(Arc<dyn BlockDevice>) -> Box<dyn FileSystem>,
}

#[derive(Debug, Default)]
pub struct Registry {
    drivers: Vec<FsInfo>,
}

impl Registry {
    /// 最多可登记的文件系统种类
    pub const CAPACITY: usize = 8;

    pub const fn new() -> Self {
        Self {
            drivers: Vec::new(),
        }
    }

    /// 登记文件系统，返回其所在槽位
    pub fn register(&mut self, info: FsInfo) -> Result<usize> {
        if self.find(info.fsid).is_some() {
            return Err(Error::AlreadyExists);
        }
        if self.drivers.len() >= Self::CAPACITY {
            return Err(Error::NoSpace);
        }

        self.drivers.push(info);
        Ok(self.drivers.len() - 1)
    }

    pub fn find(&self, fsid: char) -> Option<&FsInfo> {
        self.drivers.iter().find(|info| info.fsid == fsid)
    }

    /// 在块设备上实例化标识符为 `fsid` 的文件系统
    pub fn instantiate(&self, fsid: char, block_device: Arc<dyn BlockDevice>) -> Result<SharedFs> {
        let info = self.find(fsid).ok_or(Error::NotFound)?;
        Ok(Arc::new(Mutex::new((info.create)(block_device))))
    }

    pub fn iter(&self) -> impl Iterator<Item = &FsInfo> {
        self.drivers.iter()
    }
}
