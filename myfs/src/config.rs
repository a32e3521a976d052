//! 编译期配置

/// 超级块魔数，即 "MyFS"
pub const MAGIC: u32 = 0x4D79_4653;
/// 唯一支持的块大小
pub const BLOCK_SIZE: usize = 512;
/// 一个位图块能指示的块数
pub const BLOCK_BITS: usize = BLOCK_SIZE * 8;

pub const SUPER_BLOCK_ID: usize = 0;
pub const BITMAP_BLOCK_ID: usize = 1;
/// inode 区的起始块
pub const INODE_REGION_START: u32 = 2;
/// inode 区占设备总块数的百分比，至少一块
pub const INODE_REGION_PERCENT: u32 = 10;

/// 根目录的 inode 编号
pub const ROOT_INODE: u32 = 1;
/// 目录项名字的最大字节数
pub const NAME_MAX_LEN: usize = 14;
/// 打开描述符表的容量
pub const MAX_OPEN_FILES: usize = 20;
