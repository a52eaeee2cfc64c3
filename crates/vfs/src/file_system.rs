//! 文件系统抽象

use alloc::sync::Arc;

use crate::{FsError, Inode};

/// 文件系统 trait
///
/// 所有文件系统实现都必须实现此 trait。
/// 挂载时 VFS 先调用 [`FileSystem::initialize`]，之后才通过 [`FileSystem::root_inode`] 访问目录树。
pub trait FileSystem: Send + Sync {
    /// 文件系统类型名称
    fn fs_type(&self) -> &'static str;

    /// 挂载时的初始化，每个实例只调用一次
    fn initialize(&self) -> Result<(), FsError>;

    /// 获取根 inode
    fn root_inode(&self) -> Arc<dyn Inode>;

    /// 同步文件系统
    fn sync(&self) -> Result<(), FsError>;

    /// 卸载文件系统（可选）
    fn umount(&self) -> Result<(), FsError> {
        self.sync()
    }
}
