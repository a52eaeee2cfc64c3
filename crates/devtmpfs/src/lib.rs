//! # devtmpfs
//!
//! 纯内存的设备文件系统，挂载在 `/dev`，只包含三类节点：
//!
//! - **设备节点**：字符设备或块设备，读写按 (major, minor) 转发给 [`vfs::DeviceOps`] 查到的驱动
//! - **链接节点**：内容是一段文本目标，类似符号链接
//! - **目录**：按插入顺序保存子项，根目录的属主和权限在挂载期间不可修改
//!
//! 没有后备存储，所有状态都在挂载时重建。
//!
//! ## 并发
//!
//! 每个文件系统实例有一把读写锁（见 [`DevTmpFs`]）：创建、挂接、摘除子项以及
//! inode 编号分配都持写锁，查找和遍历持读锁。
//!
//! ## 生命周期
//!
//! 所有 inode 都由 `Arc` 计数：文件系统持有根目录，目录持有子项，子项不引用父目录。
//! 从目录摘除的 inode 只要还有别处持有引用就继续有效。

#![no_std]

extern crate alloc;

#[cfg(test)]
extern crate std;

pub mod config;
pub mod hotplug;

mod device;
pub(crate) mod directory;
mod fs;
mod inode;
pub(crate) mod link;

pub use config::DevTmpFsConfig;
pub use device::DeviceKind;
pub use fs::{DevTmpFs, InodeIndexAllocator};
pub use hotplug::{register_device_node, unregister_device_node};
pub use inode::{DevTmpFsInode, NodeType};

#[cfg(test)]
mod tests;
