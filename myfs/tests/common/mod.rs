#![allow(dead_code)]

use std::sync::Arc;

use block_dev::MemoryDisk;
use myfs::{BLOCK_SIZE, MyFileSystem};

pub fn init_log() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// 格式化并挂载一张 `blocks` 块的内存盘
pub fn mounted(blocks: usize) -> (Arc<MemoryDisk>, MyFileSystem) {
    init_log();
    let disk = Arc::new(MemoryDisk::new(blocks));
    let mut fs = MyFileSystem::new(disk.clone());
    fs.format(BLOCK_SIZE).unwrap();
    fs.mount().unwrap();
    (disk, fs)
}

/// 根目录下的全部 (名字, inode) 对
pub fn list_root(fs: &mut MyFileSystem) -> Vec<(String, u32)> {
    let dir = fs.open_dir("/").unwrap();
    let mut entries = Vec::new();
    while let Some(entry) = fs.read_dir(dir).unwrap() {
        entries.push((entry.name, entry.inode));
    }
    fs.close_dir(dir).unwrap();
    entries
}

pub fn block(disk: &MemoryDisk, id: usize) -> Vec<u8> {
    disk.snapshot()[id * BLOCK_SIZE..(id + 1) * BLOCK_SIZE].to_vec()
}
