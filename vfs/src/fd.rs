use derive_more::{From, Into};

/// 文件描述符
///
/// 0 永远无效，描述符 `n` 对应打开表的第 `n - 1` 个槽位。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, From, Into)]
#[repr(transparent)]
pub struct Fd(usize);

impl Fd {
    #[inline]
    pub fn from_index(index: usize) -> Self {
        Self(index + 1)
    }

    /// 对应的槽位下标，描述符为 0 时返回空
    #[inline]
    pub fn index(self) -> Option<usize> {
        self.0.checked_sub(1)
    }

    #[inline]
    pub fn raw(self) -> usize {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_mapping() {
        assert_eq!(Fd::from_index(0).raw(), 1);
        assert_eq!(Fd::from(5).index(), Some(4));
        assert_eq!(Fd::from(0).index(), None);
        assert_eq!(usize::from(Fd::from_index(19)), 20);
    }
}
