//! 链接节点
//!
//! 内容是一段不透明的字节串，由上层解释。第一次写入之前没有目标。

use alloc::string::String;
use alloc::vec::Vec;

use sync::SpinLock;
use vfs::FsError;

pub(crate) struct LinkNode {
    target: SpinLock<Option<Vec<u8>>>,
}

impl LinkNode {
    pub(crate) fn new() -> Self {
        Self {
            target: SpinLock::new(None),
        }
    }

    /// 目标长度，未设置时为 0
    pub(crate) fn len(&self) -> usize {
        self.target.lock().as_ref().map_or(0, Vec::len)
    }

    /// 从 offset 处复制目标；越过末尾返回 0
    pub(crate) fn read_at(&self, offset: usize, buf: &mut [u8]) -> usize {
        let target = self.target.lock();
        let Some(target) = target.as_ref() else {
            return 0;
        };
        if offset >= target.len() {
            return 0;
        }

        let count = buf.len().min(target.len() - offset);
        buf[..count].copy_from_slice(&target[offset..offset + count]);
        count
    }

    /// 用 `buf` 整体替换目标
    ///
    /// 链接没有部分写入的语义，任何 offset 都按从 0 开始处理。
    pub(crate) fn write_at(&self, _offset: usize, buf: &[u8]) -> Result<usize, FsError> {
        let mut new_target = Vec::new();
        new_target
            .try_reserve_exact(buf.len())
            .map_err(|_| FsError::NoMemory)?;
        new_target.extend_from_slice(buf);

        let old = self.target.lock().replace(new_target);
        // 旧目标在锁外释放
        drop(old);
        Ok(buf.len())
    }

    pub(crate) fn target_string(&self) -> Result<String, FsError> {
        let target = self.target.lock();
        let bytes = target.as_deref().unwrap_or(&[]);
        let text = core::str::from_utf8(bytes).map_err(|_| FsError::InvalidArgument)?;
        crate::inode::try_string(text)
    }
}
