//! 向 vfs 登记的 MyFS

use alloc::{boxed::Box, sync::Arc};
use block_dev::BlockDevice;
use vfs::{Capability, DirEntry, DirOps, Fd, FileOps, FileSystem, FsInfo, Result, Stat};

use crate::MyFileSystem;

impl FileOps for MyFileSystem {
    fn open(&mut self, path: &str) -> Result<Fd> {
        Ok(MyFileSystem::open(self, path)?)
    }

    fn read(&mut self, fd: Fd, buf: &mut [u8]) -> Result<usize> {
        Ok(MyFileSystem::read(self, fd, buf)?)
    }

    fn write(&mut self, fd: Fd, buf: &[u8]) -> Result<usize> {
        Ok(MyFileSystem::write(self, fd, buf)?)
    }

    fn seek(&mut self, fd: Fd, offset: usize) -> Result<()> {
        Ok(MyFileSystem::seek(self, fd, offset)?)
    }

    fn stat(&mut self, fd: Fd) -> Result<Stat> {
        Ok(MyFileSystem::stat(self, fd)?)
    }

    fn close(&mut self, fd: Fd) -> Result<()> {
        Ok(MyFileSystem::close(self, fd)?)
    }
}

impl DirOps for MyFileSystem {
    fn open_dir(&mut self, path: &str) -> Result<Fd> {
        Ok(MyFileSystem::open_dir(self, path)?)
    }

    fn read_dir(&mut self, fd: Fd) -> Result<Option<DirEntry>> {
        Ok(MyFileSystem::read_dir(self, fd)?)
    }

    fn link(&mut self, fd: Fd, name: &str, inode: u32) -> Result<()> {
        Ok(MyFileSystem::link(self, fd, name, inode)?)
    }

    fn unlink(&mut self, fd: Fd, name: &str) -> Result<()> {
        Ok(MyFileSystem::unlink(self, fd, name)?)
    }

    fn close_dir(&mut self, fd: Fd) -> Result<()> {
        Ok(MyFileSystem::close_dir(self, fd)?)
    }
}

impl FileSystem for MyFileSystem {
    fn format(&mut self, block_size: usize) -> Result<u32> {
        Ok(MyFileSystem::format(self, block_size)?)
    }

    fn mount(&mut self) -> Result<()> {
        Ok(MyFileSystem::mount(self)?)
    }

    fn unmount(&mut self) -> Result<()> {
        Ok(MyFileSystem::unmount(self)?)
    }

    fn is_idle(&self) -> bool {
        MyFileSystem::is_idle(self)
    }

    fn file_ops(&mut self) -> Option<&mut dyn FileOps> {
        Some(self)
    }

    fn dir_ops(&mut self) -> Option<&mut dyn DirOps> {
        Some(self)
    }
}

/// 登记用的描述，标识符为 `'M'`
pub fn fs_info() -> FsInfo {
    FsInfo {
        fsid: 'M',
        name: "MyFS",
        capabilities: Capability::File | Capability::Directory,
        create,
    }
}

fn create(block_device: Arc<dyn BlockDevice>) -> Box<dyn FileSystem> {
    Box::new(MyFileSystem::new(block_device))
}
