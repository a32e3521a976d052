use crate::{DirEntry, Error, Fd, Result, Stat};

/// 文件读写能力
pub trait FileOps {
    /// 打开文件，不存在时创建
    fn open(&mut self, path: &str) -> Result<Fd>;
    fn read(&mut self, fd: Fd, buf: &mut [u8]) -> Result<usize>;
    fn write(&mut self, fd: Fd, buf: &[u8]) -> Result<usize>;
    /// 把读写游标移到 `offset` 处
    fn seek(&mut self, fd: Fd, offset: usize) -> Result<()>;
    fn stat(&mut self, fd: Fd) -> Result<Stat>;
    fn close(&mut self, fd: Fd) -> Result<()>;
}

/// 目录操作能力
pub trait DirOps {
    fn open_dir(&mut self, path: &str) -> Result<Fd>;
    /// 读出下一个目录项，读尽时返回空
    fn read_dir(&mut self, fd: Fd) -> Result<Option<DirEntry>>;
    /// 在目录 `fd` 下为已有的 inode 新增名字 `name`
    fn link(&mut self, fd: Fd, name: &str, inode: u32) -> Result<()>;
    fn unlink(&mut self, fd: Fd, name: &str) -> Result<()>;
    fn close_dir(&mut self, fd: Fd) -> Result<()>;
}

/// 可登记的文件系统
pub trait FileSystem: core::fmt::Debug + Send {
    /// 在块设备上建立全新的文件系统，返回剩余的空闲块数
    fn format(&mut self, block_size: usize) -> Result<u32>;
    fn mount(&mut self) -> Result<()>;
    fn unmount(&mut self) -> Result<()>;
    /// 未挂载，或没有打开的描述符
    fn is_idle(&self) -> bool;

    fn file_ops(&mut self) -> Option<&mut dyn FileOps> {
        None
    }

    fn dir_ops(&mut self) -> Option<&mut dyn DirOps> {
        None
    }
}

impl dyn FileSystem {
    pub fn files(&mut self) -> Result<&mut dyn FileOps> {
        self.file_ops().ok_or(Error::Unsupported)
    }

    pub fn dirs(&mut self) -> Result<&mut dyn DirOps> {
        self.dir_ops().ok_or(Error::Unsupported)
    }
}
