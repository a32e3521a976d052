//! # 磁盘数据结构层
//!
//! 所有记录均为小端序，经由 [`decode`] / [`encode`] 与块内字节互转。

mod bitmap;
mod dir_entry;
mod inode;
mod super_block;

use binrw::io::Cursor;
use binrw::{BinRead, BinWrite, Endian};

pub use self::{
    bitmap::Bitmap,
    dir_entry::DirEntry,
    inode::{DiskInode, InodeKind},
    super_block::SuperBlock,
};

use crate::{Error, Result};

/// 从字节切片的开头解码出一条记录
pub fn decode<T>(bytes: &[u8]) -> Result<T>
where
    T: for<'a> BinRead<Args<'a> = ()>,
{
    T::read_options(&mut Cursor::new(bytes), Endian::Little, ()).map_err(|err| {
        log::error!("failed to decode on-disk record: {err:?}");
        Error::Corrupted
    })
}

/// 把记录编码到字节切片的开头，切片的其余部分不变
pub fn encode<T>(value: &T, bytes: &mut [u8]) -> Result<()>
where
    T: for<'a> BinWrite<Args<'a> = ()>,
{
    value
        .write_options(&mut Cursor::new(bytes), Endian::Little, ())
        .map_err(|err| {
            log::error!("failed to encode on-disk record: {err:?}");
            Error::Corrupted
        })
}
