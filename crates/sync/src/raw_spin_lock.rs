//! 自旋锁底层实现
//!
//! 基于原子操作的互斥自旋锁，实现 `lock_api::RawMutex`。
//! 加锁时先关闭本地中断，解锁时恢复加锁前的中断状态。

use core::hint;
use core::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use lock_api::{GuardNoSend, RawMutex};

use crate::irq::{restore, save_and_disable};

/// 关中断的自旋锁
///
/// 不可重入。保存的中断状态属于当前 CPU，因此保护器不能跨线程移动。
#[derive(Debug)]
pub struct RawSpinLock {
    locked: AtomicBool,
    /// 持有者加锁前的中断状态，只在持有锁期间有意义
    saved_flags: AtomicUsize,
}

impl RawSpinLock {
    /// 创建一个未加锁的 RawSpinLock
    pub const fn new() -> Self {
        RawSpinLock {
            locked: AtomicBool::new(false),
            saved_flags: AtomicUsize::new(0),
        }
    }

    fn acquire(&self, weak: bool) -> bool {
        let result = if weak {
            self.locked
                .compare_exchange_weak(false, true, Ordering::Acquire, Ordering::Relaxed)
        } else {
            self.locked
                .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
        };
        result.is_ok()
    }
}

impl Default for RawSpinLock {
    fn default() -> Self {
        Self::new()
    }
}

unsafe impl RawMutex for RawSpinLock {
    #[allow(clippy::declare_interior_mutable_const)]
    const INIT: Self = RawSpinLock::new();

    type GuardMarker = GuardNoSend;

    fn lock(&self) {
        let flags = save_and_disable();
        while !self.acquire(true) {
            hint::spin_loop();
        }
        self.saved_flags.store(flags, Ordering::Relaxed);
    }

    fn try_lock(&self) -> bool {
        let flags = save_and_disable();
        if self.acquire(false) {
            self.saved_flags.store(flags, Ordering::Relaxed);
            true
        } else {
            // SAFETY: flags 刚由本 CPU 保存
            unsafe { restore(flags) };
            false
        }
    }

    unsafe fn unlock(&self) {
        let flags = self.saved_flags.load(Ordering::Relaxed);
        self.locked.store(false, Ordering::Release);
        // SAFETY: flags 是持有者加锁时保存的
        unsafe { restore(flags) };
    }

    fn is_locked(&self) -> bool {
        self.locked.load(Ordering::Relaxed)
    }
}
