//! # 块设备接口层
//!
//! 块设备以**扇区**为单位存储数据；
//! [`BlockDevice`] 是对读写块设备的抽象，
//! 实现了此特质的类型称为**块设备驱动**。

#![no_std]

extern crate alloc;

mod memory;

pub use self::memory::MemoryDisk;

/// 扇区大小
pub const SECTOR_SIZE: usize = 512;

/// 块设备驱动特质
///
/// 驱动只搬运完整的扇区，越界访问视为调用方的错误。
pub trait BlockDevice: core::fmt::Debug + Send + Sync {
    fn read_block(&self, block_id: usize, buf: &mut [u8]);
    fn write_block(&self, block_id: usize, buf: &[u8]);
    /// 设备拥有的扇区数
    fn num_blocks(&self) -> usize;
}
