//! devtmpfs inode
//!
//! 所有节点共用一个 [`DevTmpFsInode`] 结构，节点种类是一个封闭的枚举 [`Node`]。
//! [`Inode`] 的实现按种类分派，未覆盖的种类走默认行为：
//! 非目录拒绝目录操作，目录拒绝字节读写，根目录拒绝 chmod/chown。

use alloc::string::String;
use alloc::sync::Arc;
use core::any::Any;
use core::ops::ControlFlow;
use core::sync::atomic::{AtomicU64, Ordering};

use sync::SpinLock;
use vfs::{DirEntry, FileMode, FsError, Inode, InodeMetadata, InodeType, makedev};

use crate::device::{DeviceKind, DeviceNode};
use crate::directory::DirectoryNode;
use crate::fs::{DevTmpFs, FsShared};
use crate::link::LinkNode;

/// 节点种类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    /// 块设备
    BlockDevice,
    /// 字符设备
    CharacterDevice,
    /// 普通目录
    Directory,
    /// 挂载根目录
    RootDirectory,
    /// 链接
    Link,
}

pub(crate) enum Node {
    Device(DeviceNode),
    Link(LinkNode),
    Directory(DirectoryNode),
    Root(DirectoryNode),
}

#[derive(Debug, Clone, Copy)]
struct InodeAttrs {
    mode: FileMode,
    uid: u32,
    gid: u32,
}

/// devtmpfs inode
pub struct DevTmpFsInode {
    /// 所属文件系统的共享状态
    fs: Arc<FsShared>,
    /// 实例内唯一的编号；根目录在 initialize 之前为 0
    index: AtomicU64,
    /// 显示名，与目录项名字无关
    name: String,
    attrs: SpinLock<InodeAttrs>,
    node: Node,
}

/// 可失败地复制名字
pub(crate) fn try_string(s: &str) -> Result<String, FsError> {
    let mut owned = String::new();
    owned.try_reserve_exact(s.len()).map_err(|_| FsError::NoMemory)?;
    owned.push_str(s);
    Ok(owned)
}

impl DevTmpFsInode {
    fn new(
        fs: Arc<FsShared>,
        index: u64,
        name: String,
        mode: FileMode,
        uid: u32,
        gid: u32,
        node: Node,
    ) -> Arc<Self> {
        let inode_type = node_inode_type(&node);
        Arc::new(Self {
            fs,
            index: AtomicU64::new(index),
            name,
            attrs: SpinLock::new(InodeAttrs {
                mode: mode.with_type(inode_type),
                uid,
                gid,
            }),
            node,
        })
    }

    pub(crate) fn new_root(fs: Arc<FsShared>) -> Result<Arc<Self>, FsError> {
        let config = fs.config();
        let (mode, uid, gid) = (config.root_mode, config.root_uid, config.root_gid);
        let name = try_string(".")?;
        Ok(Self::new(
            fs,
            0,
            name,
            mode,
            uid,
            gid,
            Node::Root(DirectoryNode::new()),
        ))
    }

    pub(crate) fn new_directory(
        fs: Arc<FsShared>,
        index: u64,
        name: String,
        mode: FileMode,
        uid: u32,
        gid: u32,
    ) -> Arc<Self> {
        Self::new(
            fs,
            index,
            name,
            mode,
            uid,
            gid,
            Node::Directory(DirectoryNode::new()),
        )
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new_device(
        fs: Arc<FsShared>,
        index: u64,
        name: String,
        kind: DeviceKind,
        major: u32,
        minor: u32,
        mode: FileMode,
        uid: u32,
        gid: u32,
    ) -> Arc<Self> {
        Self::new(
            fs,
            index,
            name,
            mode,
            uid,
            gid,
            Node::Device(DeviceNode::new(kind, major, minor)),
        )
    }

    pub(crate) fn new_link(
        fs: Arc<FsShared>,
        index: u64,
        name: String,
        mode: FileMode,
        uid: u32,
        gid: u32,
    ) -> Arc<Self> {
        Self::new(fs, index, name, mode, uid, gid, Node::Link(LinkNode::new()))
    }

    pub(crate) fn assign_index(&self, index: u64) {
        self.index.store(index, Ordering::Release);
    }

    pub(crate) fn fs(&self) -> &Arc<FsShared> {
        &self.fs
    }

    /// 目录与根目录共享同一套子项实现
    pub(crate) fn as_directory(&self) -> Option<&DirectoryNode> {
        match &self.node {
            Node::Directory(dir) | Node::Root(dir) => Some(dir),
            _ => None,
        }
    }

    /// inode 编号
    pub fn index(&self) -> u64 {
        self.index.load(Ordering::Acquire)
    }

    /// 显示名，根目录为 `.`
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 节点种类
    pub fn node_type(&self) -> NodeType {
        match &self.node {
            Node::Device(dev) => match dev.kind() {
                DeviceKind::Block => NodeType::BlockDevice,
                DeviceKind::Character => NodeType::CharacterDevice,
            },
            Node::Link(_) => NodeType::Link,
            Node::Directory(_) => NodeType::Directory,
            Node::Root(_) => NodeType::RootDirectory,
        }
    }

    /// VFS 层看到的文件类型
    pub fn inode_type(&self) -> InodeType {
        node_inode_type(&self.node)
    }

    /// 设备号 (major, minor)，非设备节点返回 `None`
    pub fn device_numbers(&self) -> Option<(u32, u32)> {
        match &self.node {
            Node::Device(dev) => Some((dev.major(), dev.minor())),
            _ => None,
        }
    }

    /// 是否属于给定的文件系统实例
    pub fn belongs_to(&self, fs: &DevTmpFs) -> bool {
        Arc::ptr_eq(&self.fs, fs.shared())
    }

    /// 读取链接目标
    ///
    /// 尚未写入目标时返回空串；非链接节点或目标不是 UTF-8 时返回 [`FsError::InvalidArgument`]。
    pub fn readlink(&self) -> Result<String, FsError> {
        match &self.node {
            Node::Link(link) => link.target_string(),
            _ => Err(FsError::InvalidArgument),
        }
    }
}

fn node_inode_type(node: &Node) -> InodeType {
    match node {
        Node::Device(dev) => dev.kind().inode_type(),
        Node::Link(_) => InodeType::Symlink,
        Node::Directory(_) | Node::Root(_) => InodeType::Directory,
    }
}

impl Inode for DevTmpFsInode {
    fn metadata(&self) -> Result<InodeMetadata, FsError> {
        let attrs = *self.attrs.lock();
        let (size, nlinks, rdev) = match &self.node {
            Node::Device(dev) => (0, 1, makedev(dev.major(), dev.minor())),
            Node::Link(link) => (link.len(), 1, 0),
            Node::Directory(_) | Node::Root(_) => (0, 2, 0),
        };

        Ok(InodeMetadata {
            inode_no: self.index(),
            inode_type: self.inode_type(),
            mode: attrs.mode,
            uid: attrs.uid,
            gid: attrs.gid,
            size,
            nlinks,
            rdev,
        })
    }

    fn read_at(&self, offset: usize, buf: &mut [u8]) -> Result<usize, FsError> {
        match &self.node {
            Node::Device(dev) => dev.read_at(offset, buf),
            Node::Link(link) => Ok(link.read_at(offset, buf)),
            Node::Directory(_) | Node::Root(_) => Err(FsError::IsDirectory),
        }
    }

    fn write_at(&self, offset: usize, buf: &[u8]) -> Result<usize, FsError> {
        match &self.node {
            Node::Device(dev) => dev.write_at(offset, buf),
            Node::Link(link) => link.write_at(offset, buf),
            Node::Directory(_) | Node::Root(_) => Err(FsError::IsDirectory),
        }
    }

    fn lookup(&self, name: &str) -> Result<Arc<dyn Inode>, FsError> {
        let dir = self.as_directory().ok_or(FsError::NotDirectory)?;
        dir.lookup(self, name)
    }

    fn traverse_as_directory(
        &self,
        visitor: &mut dyn FnMut(&DirEntry) -> ControlFlow<()>,
    ) -> Result<(), FsError> {
        let dir = self.as_directory().ok_or(FsError::NotDirectory)?;
        dir.traverse(self, visitor)
    }

    fn create_child(
        &self,
        name: &str,
        mode: FileMode,
        dev: u64,
        uid: u32,
        gid: u32,
    ) -> Result<Arc<dyn Inode>, FsError> {
        let dir = self.as_directory().ok_or(FsError::NotDirectory)?;
        let child = dir.create_child(self, name, mode, dev, uid, gid)?;
        Ok(child as Arc<dyn Inode>)
    }

    fn add_child(&self, child: Arc<dyn Inode>, name: &str, mode: FileMode) -> Result<(), FsError> {
        let dir = self.as_directory().ok_or(FsError::NotDirectory)?;
        dir.add_child(self, child, name, mode)
    }

    fn remove_child(&self, name: &str) -> Result<(), FsError> {
        let dir = self.as_directory().ok_or(FsError::NotDirectory)?;
        dir.remove_child(self, name)
    }

    fn chmod(&self, mode: FileMode) -> Result<(), FsError> {
        if let Node::Root(_) = self.node {
            log::warn!("devtmpfs: refusing chmod {:o} on mount root", mode.bits());
            return Err(FsError::NotPermitted);
        }

        let mut attrs = self.attrs.lock();
        attrs.mode = mode.with_type(self.inode_type());
        Ok(())
    }

    fn chown(&self, uid: u32, gid: u32) -> Result<(), FsError> {
        if let Node::Root(_) = self.node {
            log::warn!("devtmpfs: refusing chown {}:{} on mount root", uid, gid);
            return Err(FsError::NotPermitted);
        }

        let mut attrs = self.attrs.lock();
        attrs.uid = uid;
        attrs.gid = gid;
        Ok(())
    }

    fn truncate(&self, _size: usize) -> Result<(), FsError> {
        match &self.node {
            // 设备和链接没有按长度寻址的存储
            Node::Device(_) | Node::Link(_) => Ok(()),
            Node::Directory(_) | Node::Root(_) => Err(FsError::NotSupported),
        }
    }

    fn flush_metadata(&self) -> Result<(), FsError> {
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
