use alloc::string::String;

/// 目录迭代交出的目录项
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    /// Inode number
    pub inode: u32,
    pub name: String,
}
