//! 文件系统与操作系统之间的接口层
//!
//! 具体文件系统实现 [`FileSystem`] 等特质，
//! 再通过 [`FsInfo`] 登记到 [`Registry`]，由挂载方按标识符实例化。

#![no_std]

extern crate alloc;

mod dirent;
mod error;
mod fd;
mod fs;
mod registry;
mod stat;

pub use self::{
    dirent::DirEntry,
    error::{Error, Result},
    fd::Fd,
    fs::{DirOps, FileOps, FileSystem},
    registry::{Capability, FsInfo, Registry, SharedFs},
    stat::{Stat, StatKind},
};
