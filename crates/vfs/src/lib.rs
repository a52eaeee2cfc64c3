//! 内核虚拟文件系统层
//!
//! 此 crate 定义具体文件系统需要实现的契约：
//!
//! - [`Inode`] trait - 索引节点接口
//! - [`FileSystem`] trait - 文件系统接口
//! - [`FsError`] - POSIX 风格错误码
//! - [`DeviceOps`] / [`DeviceDriver`] - 设备节点转发读写所用的设备注册表
//! - 设备号编码 ([`makedev`], [`major`], [`minor`])

#![no_std]

extern crate alloc;

pub mod dev;
pub mod error;
pub mod ops;

mod devno;
mod file_system;
mod inode;

// Re-export ops
pub use ops::{DeviceDriver, DeviceOps, device_ops, register_device_ops};

// Re-export error
pub use error::FsError;

// Re-export dev
pub use dev::{major, makedev, minor};

// Re-export inode
pub use inode::{DirEntry, FileMode, Inode, InodeMetadata, InodeType};

// Re-export file_system
pub use file_system::FileSystem;

// Re-export devno
pub use devno::{
    blkdev_major, chrdev_major, get_blkdev_driver, get_chrdev_driver, mem_minor, misc_minor,
};
