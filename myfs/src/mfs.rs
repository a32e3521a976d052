//! # 控制层
//!
//! [`MyFileSystem`] 持有块设备，挂载后再持有一个 [`Volume`]。
//! 未挂载时，除格式化以外的操作都返回 [`Error::NotMounted`]。

use alloc::sync::Arc;
use block_dev::BlockDevice;
use vfs::{DirEntry, Fd, Stat};

use crate::layout::SuperBlock;
use crate::volume::Volume;
use crate::{Error, Result};

#[derive(Debug)]
pub struct MyFileSystem {
    block_device: Arc<dyn BlockDevice>,
    volume: Option<Volume>,
}

impl MyFileSystem {
    pub fn new(block_device: Arc<dyn BlockDevice>) -> Self {
        Self {
            block_device,
            volume: None,
        }
    }

    /// 在块设备上建立新卷，返回空闲块数。挂载期间不可格式化
    pub fn format(&mut self, block_size: usize) -> Result<u32> {
        if self.volume.is_some() {
            return Err(Error::Busy);
        }

        Volume::format(&self.block_device, block_size)
    }

    /// 失败时保持未挂载
    pub fn mount(&mut self) -> Result<()> {
        if self.volume.is_some() {
            return Err(Error::AlreadyMounted);
        }

        let volume = Volume::mount(&self.block_device)?;
        log::info!(
            "mounted: {} blocks, {} free",
            volume.super_block.total_blocks,
            volume.free_blocks()
        );
        self.volume = Some(volume);
        Ok(())
    }

    /// 仍有打开的描述符时拒绝卸载
    pub fn unmount(&mut self) -> Result<()> {
        let volume = self.volume.as_ref().ok_or(Error::NotMounted)?;
        if !volume.files.is_idle() {
            log::warn!("unmount refused: descriptors still open");
            return Err(Error::Busy);
        }

        self.volume = None;
        log::info!("unmounted");
        Ok(())
    }

    #[inline]
    pub fn is_mounted(&self) -> bool {
        self.volume.is_some()
    }

    /// 未挂载，或没有正在使用的描述符
    pub fn is_idle(&self) -> bool {
        self.volume
            .as_ref()
            .is_none_or(|volume| volume.files.is_idle())
    }

    pub fn superblock(&self) -> Result<SuperBlock> {
        self.volume().map(|volume| volume.super_block)
    }

    pub fn free_blocks(&self) -> Result<u32> {
        self.volume().map(Volume::free_blocks)
    }

    pub fn open(&mut self, path: &str) -> Result<Fd> {
        self.volume_mut()?.open(path)
    }

    pub fn read(&mut self, fd: Fd, buf: &mut [u8]) -> Result<usize> {
        self.volume_mut()?.read(fd, buf)
    }

    pub fn write(&mut self, fd: Fd, data: &[u8]) -> Result<usize> {
        self.volume_mut()?.write(fd, data)
    }

    pub fn seek(&mut self, fd: Fd, offset: usize) -> Result<()> {
        self.volume_mut()?.seek(fd, offset)
    }

    pub fn stat(&self, fd: Fd) -> Result<Stat> {
        self.volume()?.stat(fd)
    }

    /// 只读地查看根目录下的文件，名字不存在或指向空闲 inode 时返回空
    pub fn lookup(&self, path: &str) -> Result<Option<Stat>> {
        self.volume()?.lookup(path)
    }

    pub fn close(&mut self, fd: Fd) -> Result<()> {
        self.volume_mut()?.close(fd)
    }

    pub fn open_dir(&mut self, path: &str) -> Result<Fd> {
        self.volume_mut()?.open_dir(path)
    }

    pub fn read_dir(&mut self, fd: Fd) -> Result<Option<DirEntry>> {
        self.volume_mut()?.read_dir(fd)
    }

    pub fn link(&mut self, fd: Fd, name: &str, inode: u32) -> Result<()> {
        self.volume_mut()?.link(fd, name, inode)
    }

    pub fn unlink(&mut self, fd: Fd, name: &str) -> Result<()> {
        self.volume_mut()?.unlink(fd, name)
    }

    pub fn close_dir(&mut self, fd: Fd) -> Result<()> {
        self.volume_mut()?.close_dir(fd)
    }

    fn volume(&self) -> Result<&Volume> {
        self.volume.as_ref().ok_or(Error::NotMounted)
    }

    fn volume_mut(&mut self) -> Result<&mut Volume> {
        self.volume.as_mut().ok_or(Error::NotMounted)
    }
}
