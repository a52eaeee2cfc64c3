//! 设备节点
//!
//! 节点只记录设备号，不缓存任何数据。每次读写都按设备号向注册表查询驱动并原样转发。

use alloc::sync::Arc;

use vfs::{DeviceDriver, FsError, InodeType, get_blkdev_driver, get_chrdev_driver, makedev};

/// 设备种类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceKind {
    /// 字符设备
    Character,
    /// 块设备
    Block,
}

impl DeviceKind {
    /// 对应的 VFS 文件类型
    pub fn inode_type(self) -> InodeType {
        match self {
            DeviceKind::Character => InodeType::CharDevice,
            DeviceKind::Block => InodeType::BlockDevice,
        }
    }

    /// 从 VFS 文件类型反查，非设备类型返回 `None`
    pub fn from_inode_type(inode_type: InodeType) -> Option<Self> {
        match inode_type {
            InodeType::CharDevice => Some(DeviceKind::Character),
            InodeType::BlockDevice => Some(DeviceKind::Block),
            _ => None,
        }
    }
}

pub(crate) struct DeviceNode {
    kind: DeviceKind,
    major: u32,
    minor: u32,
}

impl DeviceNode {
    pub(crate) fn new(kind: DeviceKind, major: u32, minor: u32) -> Self {
        Self { kind, major, minor }
    }

    pub(crate) fn kind(&self) -> DeviceKind {
        self.kind
    }

    pub(crate) fn major(&self) -> u32 {
        self.major
    }

    pub(crate) fn minor(&self) -> u32 {
        self.minor
    }

    /// 查询驱动；设备不存在时注册表给出的错误原样返回
    fn driver(&self) -> Result<Arc<dyn DeviceDriver>, FsError> {
        let dev = makedev(self.major, self.minor);
        match self.kind {
            DeviceKind::Character => get_chrdev_driver(dev),
            DeviceKind::Block => get_blkdev_driver(dev),
        }
    }

    pub(crate) fn read_at(&self, offset: usize, buf: &mut [u8]) -> Result<usize, FsError> {
        self.driver()?.read_at(offset, buf)
    }

    pub(crate) fn write_at(&self, offset: usize, buf: &[u8]) -> Result<usize, FsError> {
        self.driver()?.write_at(offset, buf)
    }
}
