//! Inode 抽象层 - VFS 存储层接口
//!
//! 该模块定义了文件系统实现需要满足的 inode 契约。
//!
//! `Inode` 侧接口以“显式 offset”的随机访问为主，不保存打开状态，
//! 因此可以被多个打开的文件会话共享；offset、flags 等由上层维护。

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::Any;
use core::ops::ControlFlow;

use crate::FsError;

/// 文件类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InodeType {
    /// 普通文件
    File,
    /// 目录
    Directory,
    /// 符号链接
    Symlink,
    /// 字符设备
    CharDevice,
    /// 块设备
    BlockDevice,
    /// 命名管道
    Fifo,
    /// 套接字
    Socket,
}

impl InodeType {
    /// 该类型在 mode 中对应的类型位
    pub fn mode_bits(self) -> FileMode {
        match self {
            InodeType::File => FileMode::S_IFREG,
            InodeType::Directory => FileMode::S_IFDIR,
            InodeType::Symlink => FileMode::S_IFLNK,
            InodeType::CharDevice => FileMode::S_IFCHR,
            InodeType::BlockDevice => FileMode::S_IFBLK,
            InodeType::Fifo => FileMode::S_IFIFO,
            InodeType::Socket => FileMode::S_IFSOCK,
        }
    }
}

/// mode 类型位与文件类型的对应关系
const MODE_TYPES: [(FileMode, InodeType); 7] = [
    (FileMode::S_IFREG, InodeType::File),
    (FileMode::S_IFDIR, InodeType::Directory),
    (FileMode::S_IFLNK, InodeType::Symlink),
    (FileMode::S_IFCHR, InodeType::CharDevice),
    (FileMode::S_IFBLK, InodeType::BlockDevice),
    (FileMode::S_IFIFO, InodeType::Fifo),
    (FileMode::S_IFSOCK, InodeType::Socket),
];

bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    /// 文件权限和类型（与 POSIX 兼容）
    pub struct FileMode: u32 {
        // 文件类型掩码
        /// 文件类型掩码
        const S_IFMT   = 0o170000;
        /// 普通文件
        const S_IFREG  = 0o100000;
        /// 目录
        const S_IFDIR  = 0o040000;
        /// 符号链接
        const S_IFLNK  = 0o120000;
        /// 字符设备
        const S_IFCHR  = 0o020000;
        /// 块设备
        const S_IFBLK  = 0o060000;
        /// FIFO
        const S_IFIFO  = 0o010000;
        /// Socket
        const S_IFSOCK = 0o140000;

        // 用户权限
        /// 用户读
        const S_IRUSR  = 0o400;
        /// 用户写
        const S_IWUSR  = 0o200;
        /// 用户执行
        const S_IXUSR  = 0o100;

        // 组权限
        /// 组读
        const S_IRGRP  = 0o040;
        /// 组写
        const S_IWGRP  = 0o020;
        /// 组执行
        const S_IXGRP  = 0o010;

        // 其他用户权限
        /// 其他读
        const S_IROTH  = 0o004;
        /// 其他写
        const S_IWOTH  = 0o002;
        /// 其他执行
        const S_IXOTH  = 0o001;

        // 特殊位
        /// Set UID
        const S_ISUID  = 0o4000;
        /// Set GID
        const S_ISGID  = 0o2000;
        /// Sticky bit
        const S_ISVTX  = 0o1000;
    }
}

impl FileMode {
    /// 解析 mode 中的文件类型位，没有类型位或类型位无效时返回 `None`
    ///
    /// 类型位是一个多位字段，必须整体比较：`S_IFBLK` 同时包含 `S_IFCHR` 与 `S_IFDIR` 的位。
    pub fn file_type(&self) -> Option<InodeType> {
        let ty = *self & FileMode::S_IFMT;
        MODE_TYPES
            .iter()
            .find(|(bits, _)| *bits == ty)
            .map(|&(_, inode_type)| inode_type)
    }

    /// 只保留权限位（含 setuid/setgid/sticky）
    pub fn permissions(&self) -> FileMode {
        *self & !FileMode::S_IFMT
    }

    /// 替换类型位，保留权限位
    pub fn with_type(&self, inode_type: InodeType) -> FileMode {
        self.permissions() | inode_type.mode_bits()
    }
}

/// 轻量级目录项（目录遍历时产生）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    /// 文件名
    pub name: String,
    /// Inode 编号
    pub inode_no: u64,
    /// 文件类型
    pub inode_type: InodeType,
}

/// 文件元数据
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InodeMetadata {
    /// Inode 编号
    pub inode_no: u64,
    /// 文件类型
    pub inode_type: InodeType,
    /// 类型位与权限位
    pub mode: FileMode,
    /// 用户 ID
    pub uid: u32,
    /// 组 ID
    pub gid: u32,
    /// 文件大小（字节）
    pub size: usize,
    /// 硬链接数
    pub nlinks: usize,
    /// 设备号（仅对 CharDevice 和 BlockDevice 有效）
    pub rdev: u64,
}

/// 文件系统底层存储接口
///
/// 所有方法都以同步方式返回结果；转发到设备的读写可能阻塞调用者。
/// 权限检查由调用方负责，inode 只保存 mode/uid/gid。
pub trait Inode: Send + Sync + Any {
    /// 获取文件元数据
    fn metadata(&self) -> Result<InodeMetadata, FsError>;

    /// 从指定偏移量读取至多 `buf.len()` 字节
    fn read_at(&self, offset: usize, buf: &mut [u8]) -> Result<usize, FsError>;

    /// 向指定偏移量写入 `buf`
    fn write_at(&self, offset: usize, buf: &[u8]) -> Result<usize, FsError>;

    /// 在目录中按名字查找子项
    fn lookup(&self, name: &str) -> Result<Arc<dyn Inode>, FsError>;

    /// 遍历目录项（含 `.` 与 `..`），visitor 返回 `Break` 时提前结束
    fn traverse_as_directory(
        &self,
        visitor: &mut dyn FnMut(&DirEntry) -> ControlFlow<()>,
    ) -> Result<(), FsError>;

    /// 列出目录内容
    fn readdir(&self) -> Result<Vec<DirEntry>, FsError> {
        let mut entries = Vec::new();
        self.traverse_as_directory(&mut |entry| {
            entries.push(entry.clone());
            ControlFlow::Continue(())
        })?;
        Ok(entries)
    }

    /// 在目录中创建子项，类型由 `mode` 的类型位决定；`dev` 仅对设备有效
    fn create_child(
        &self,
        name: &str,
        mode: FileMode,
        dev: u64,
        uid: u32,
        gid: u32,
    ) -> Result<Arc<dyn Inode>, FsError>;

    /// 把已构造好的 inode 挂到目录下
    fn add_child(&self, child: Arc<dyn Inode>, name: &str, mode: FileMode) -> Result<(), FsError>;

    /// 从目录中摘除子项
    fn remove_child(&self, name: &str) -> Result<(), FsError>;

    /// 修改文件权限模式
    fn chmod(&self, mode: FileMode) -> Result<(), FsError>;

    /// 修改文件所有者和组
    fn chown(&self, uid: u32, gid: u32) -> Result<(), FsError>;

    /// 截断文件到指定大小
    fn truncate(&self, size: usize) -> Result<(), FsError>;

    /// 把元数据写回存储
    fn flush_metadata(&self) -> Result<(), FsError>;

    /// 向下转型为 &dyn Any，用于支持 downcast
    fn as_any(&self) -> &dyn Any;
}

/// 为 `Arc<dyn Inode>` 提供向下转型辅助方法
impl dyn Inode {
    /// 尝试向下转型为具体的 Inode 类型
    pub fn downcast_arc<T: Inode>(self: Arc<Self>) -> Result<Arc<T>, Arc<Self>> {
        if (*self).as_any().is::<T>() {
            // SAFETY: 已经通过 is::<T>() 检查了类型
            unsafe {
                let ptr = Arc::into_raw(self);
                Ok(Arc::from_raw(ptr as *const T))
            }
        } else {
            Err(self)
        }
    }
}
