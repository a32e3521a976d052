use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    #[error("file system is not mounted")]
    NotMounted,
    #[error("file system is already mounted")]
    AlreadyMounted,
    #[error("path must be `/` followed by a 1..=14 byte name")]
    InvalidPath,
    #[error("bad superblock magic")]
    InvalidSignature,
    #[error("unsupported block size")]
    UnsupportedBlockSize,
    #[error("device too small to hold the file system")]
    DeviceTooSmall,
    #[error("device has more blocks than one bitmap block can track")]
    DeviceTooLarge,
    #[error("no free data block")]
    NoSpace,
    #[error("no free inode")]
    NoInode,
    #[error("inode number out of range")]
    InvalidInode,
    #[error("offset beyond the largest file size")]
    InvalidOffset,
    #[error("open file table is full")]
    TableFull,
    #[error("name already exists")]
    AlreadyExists,
    #[error("name not found")]
    NotFound,
    #[error("invalid handle")]
    InvalidHandle,
    #[error("descriptors are still open")]
    Busy,
    #[error("not a directory")]
    NotADirectory,
    #[error("is a directory")]
    IsADirectory,
    #[error("corrupted on-disk record")]
    Corrupted,
}

impl From<Error> for vfs::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::NotMounted => Self::NotMounted,
            Error::AlreadyMounted => Self::AlreadyMounted,
            Error::InvalidPath => Self::InvalidPath,
            Error::InvalidSignature | Error::UnsupportedBlockSize => Self::BadFileSystem,
            Error::DeviceTooSmall | Error::DeviceTooLarge => Self::InvalidArgument,
            Error::InvalidInode | Error::InvalidOffset => Self::InvalidArgument,
            Error::NoSpace => Self::NoSpace,
            Error::NoInode => Self::NoInode,
            Error::TableFull => Self::TooManyOpenFiles,
            Error::AlreadyExists => Self::AlreadyExists,
            Error::NotFound => Self::NotFound,
            Error::InvalidHandle => Self::BadDescriptor,
            Error::Busy => Self::Busy,
            Error::NotADirectory => Self::NotADirectory,
            Error::IsADirectory => Self::IsADirectory,
            Error::Corrupted => Self::Corrupted,
        }
    }
}
