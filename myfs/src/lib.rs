#![no_std]

extern crate alloc;

/* myfs 的整体架构，自上而下 */

// 对接层：向 vfs 登记的文件系统
mod vfs;

// 控制层：挂载、卸载与格式化
mod mfs;

// 数据传输层：文件读写与目录操作
mod file;

// 打开描述符表
mod fd_table;

// 目录表：根目录内的目录项管理
mod directory;

// 卷：超级块、位图与 inode 表的持久化
mod volume;

// 磁盘数据结构层
mod layout;

mod config;
mod error;

pub use self::{
    config::*,
    error::{Error, Result},
    layout::SuperBlock,
    mfs::MyFileSystem,
    vfs::fs_info,
};

type DataBlock = [u8; BLOCK_SIZE];
