//! VFS 运行时操作 trait 定义和注册
//!
//! 设备节点本身不保存数据，读写要按设备号转发给驱动。
//! 驱动由 os crate 管理，这里只定义查询接口，通过 trait 抽象与 os crate 解耦。

use alloc::sync::Arc;
use core::sync::atomic::{AtomicUsize, Ordering};

use crate::FsError;

/// 设备驱动对象
///
/// 设备节点的读写原样转发到这里，返回值和错误也原样交还调用者。
/// 实现可以阻塞调用者直到设备就绪，VFS 不做重试或超时。
pub trait DeviceDriver: Send + Sync {
    /// 从设备的 offset 处读取
    fn read_at(&self, offset: usize, buf: &mut [u8]) -> Result<usize, FsError>;

    /// 向设备的 offset 处写入
    fn write_at(&self, offset: usize, buf: &[u8]) -> Result<usize, FsError>;
}

/// 设备注册表
///
/// 按设备号查找驱动。字符设备与块设备的设备号空间相互独立。
/// 找不到设备时返回的错误由实现决定（通常为 [`FsError::NoDevice`]），调用方原样传递。
pub trait DeviceOps: Send + Sync {
    /// 获取字符设备驱动
    fn get_chrdev_driver(&self, dev: u64) -> Result<Arc<dyn DeviceDriver>, FsError>;

    /// 获取块设备驱动
    fn get_blkdev_driver(&self, dev: u64) -> Result<Arc<dyn DeviceDriver>, FsError>;
}

// ========== DeviceOps 注册 ==========

static DEVICE_OPS_DATA: AtomicUsize = AtomicUsize::new(0);
static DEVICE_OPS_VTABLE: AtomicUsize = AtomicUsize::new(0);

/// 注册设备操作实现
///
/// # Safety
/// 必须在单线程环境下调用，且只能调用一次
pub unsafe fn register_device_ops(ops: &'static dyn DeviceOps) {
    let ptr = ops as *const dyn DeviceOps;
    // SAFETY: 将 fat pointer 拆分为 data 和 vtable 两部分存储
    let (data, vtable) =
        unsafe { core::mem::transmute::<*const dyn DeviceOps, (usize, usize)>(ptr) };
    DEVICE_OPS_VTABLE.store(vtable, Ordering::Release);
    DEVICE_OPS_DATA.store(data, Ordering::Release);
}

/// 获取已注册的设备操作实现
///
/// # Panics
/// 如果尚未调用 [`register_device_ops`] 注册实现，则 panic
#[inline]
pub fn device_ops() -> &'static dyn DeviceOps {
    let data = DEVICE_OPS_DATA.load(Ordering::Acquire);
    let vtable = DEVICE_OPS_VTABLE.load(Ordering::Acquire);
    if data == 0 {
        panic!("vfs: DeviceOps not registered");
    }
    // SAFETY: 重组 fat pointer
    unsafe { &*core::mem::transmute::<(usize, usize), *const dyn DeviceOps>((data, vtable)) }
}
