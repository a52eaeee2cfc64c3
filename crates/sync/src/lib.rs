//! 同步原语
//!
//! - [`SpinLock`]：关本地中断的互斥自旋锁
//! - [`RwLock`]：读写自旋锁，不关中断
//!
//! 两者都建立在 `lock_api` 之上，只实现底层的 raw lock。
//!
//! # 架构依赖
//!
//! 关中断由 [`ArchOps`] 提供，使用任何 [`SpinLock`] 之前必须先调用
//! [`register_arch_ops`]。

#![no_std]

#[cfg(test)]
extern crate std;

mod irq;
mod raw_spin_lock;
mod rwlock;
mod spin_lock;

pub use raw_spin_lock::*;
pub use rwlock::*;
pub use spin_lock::*;

use core::sync::atomic::{AtomicUsize, Ordering};

/// 中断控制
///
/// 由 os crate 实现并注册。返回的 flags 对 sync 不透明，只会原样交还给
/// [`ArchOps::restore_interrupts`]。
pub trait ArchOps: Send + Sync {
    /// 读取并禁用中断，返回之前的状态
    ///
    /// # Safety
    /// 调用者必须确保在适当的上下文中调用
    unsafe fn read_and_disable_interrupts(&self) -> usize;

    /// 恢复中断状态
    ///
    /// # Safety
    /// flags 必须是之前 read_and_disable_interrupts 返回的值
    unsafe fn restore_interrupts(&self, flags: usize);
}

// fat pointer 拆成 data 和 vtable 两个字分别保存
static ARCH_OPS_DATA: AtomicUsize = AtomicUsize::new(0);
static ARCH_OPS_VTABLE: AtomicUsize = AtomicUsize::new(0);

/// 注册中断控制实现
///
/// # Safety
/// 必须在第一次加锁之前、单线程环境下调用，且只能调用一次
pub unsafe fn register_arch_ops(ops: &'static dyn ArchOps) {
    let ptr = ops as *const dyn ArchOps;
    // SAFETY: *const dyn Trait 由 data 和 vtable 两个字组成
    let (data, vtable) = unsafe { core::mem::transmute::<*const dyn ArchOps, (usize, usize)>(ptr) };
    ARCH_OPS_VTABLE.store(vtable, Ordering::Release);
    ARCH_OPS_DATA.store(data, Ordering::Release);
}

/// 获取架构操作实例
#[inline]
pub(crate) fn arch_ops() -> &'static dyn ArchOps {
    let data = ARCH_OPS_DATA.load(Ordering::Acquire);
    let vtable = ARCH_OPS_VTABLE.load(Ordering::Acquire);
    if data == 0 {
        panic!("sync: ArchOps not registered, call register_arch_ops first");
    }
    // SAFETY: data 和 vtable 是通过 register_arch_ops 设置的有效指针
    unsafe { &*core::mem::transmute::<(usize, usize), *const dyn ArchOps>((data, vtable)) }
}

#[cfg(test)]
mod tests;
