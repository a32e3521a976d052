use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

/// 文件系统对外报告的错误
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    #[error("file system is not mounted")]
    NotMounted,
    #[error("file system is already mounted")]
    AlreadyMounted,
    #[error("invalid path")]
    InvalidPath,
    #[error("invalid argument")]
    InvalidArgument,
    #[error("bad file system")]
    BadFileSystem,
    #[error("no space left on device")]
    NoSpace,
    #[error("no free inode")]
    NoInode,
    #[error("too many open files")]
    TooManyOpenFiles,
    #[error("entry already exists")]
    AlreadyExists,
    #[error("entry not found")]
    NotFound,
    #[error("bad descriptor")]
    BadDescriptor,
    #[error("resource busy")]
    Busy,
    #[error("not a directory")]
    NotADirectory,
    #[error("is a directory")]
    IsADirectory,
    #[error("operation not supported")]
    Unsupported,
    #[error("corrupted on-disk structure")]
    Corrupted,
}
