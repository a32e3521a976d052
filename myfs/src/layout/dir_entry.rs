use alloc::string::String;
use binrw::binrw;

use crate::NAME_MAX_LEN;

/// 目录项，inode 编号为 0 表示空槽
#[binrw]
#[brw(little)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirEntry {
    inode_number: u16,
    /// 以零填充，占满时没有结尾的零
    name: [u8; NAME_MAX_LEN],
}

impl DirEntry {
    pub const SIZE: usize = 16;

    /// 名字须事先检查过长度
    pub fn new(name: &str, inode_number: u16) -> Self {
        Self {
            inode_number,
            name: pad_name(name),
        }
    }

    #[inline]
    pub fn is_free(&self) -> bool {
        self.inode_number == 0
    }

    #[inline]
    pub fn inode_number(&self) -> u32 {
        self.inode_number as u32
    }

    /// 按定长名字比较
    pub fn name_matches(&self, name: &str) -> bool {
        name.len() <= NAME_MAX_LEN && self.name == pad_name(name)
    }

    /// 非 UTF-8 的字节以替换字符代替，这样的名字无法再用来查找
    pub fn name(&self) -> String {
        let len = self
            .name
            .iter()
            .rposition(|&b| b != 0)
            .map_or(0, |last| last + 1);
        let raw = &self.name[..len];

        match core::str::from_utf8(raw) {
            Ok(name) => String::from(name),
            Err(_) => {
                log::warn!(
                    "name {raw:?} of inode {} is not UTF-8",
                    self.inode_number
                );
                String::from_utf8_lossy(raw).into_owned()
            }
        }
    }
}

fn pad_name(name: &str) -> [u8; NAME_MAX_LEN] {
    let mut padded = [0; NAME_MAX_LEN];
    let len = name.len().min(NAME_MAX_LEN);
    padded[..len].copy_from_slice(&name.as_bytes()[..len]);
    padded
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{decode, encode};

    #[test]
    fn layout() {
        let entry = DirEntry::new("b.txt", 5);
        let mut buf = [0xffu8; DirEntry::SIZE];
        encode(&entry, &mut buf).unwrap();

        assert_eq!(&buf[0..2], &[5, 0]);
        assert_eq!(&buf[2..7], b"b.txt");
        assert!(buf[7..].iter().all(|&b| b == 0));
        assert_eq!(decode::<DirEntry>(&buf), Ok(entry));
    }

    #[test]
    fn full_width_name() {
        let entry = DirEntry::new("abcdefghijklmn", 2);
        assert_eq!(entry.name(), "abcdefghijklmn");
        assert!(entry.name_matches("abcdefghijklmn"));
        assert!(!entry.name_matches("abcdefghijklm"));
        assert!(!entry.name_matches("abcdefghijklmno"));
    }

    #[test]
    fn raw_name_that_is_not_utf8() {
        let mut buf = [0u8; DirEntry::SIZE];
        buf[0] = 4;
        buf[2..5].copy_from_slice(&[b'a', 0xff, b'b']);
        let entry = decode::<DirEntry>(&buf).unwrap();

        assert_eq!(entry.name(), "a\u{fffd}b");
        assert!(!entry.name_matches(&entry.name()));
    }

    #[test]
    fn free_slot() {
        assert!(DirEntry::default().is_free());
        assert!(!DirEntry::new("a", 1).is_free());
        assert_eq!(DirEntry::new("a", 1).inode_number(), 1);
    }
}
