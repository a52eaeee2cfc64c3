//! 读写自旋锁
//!
//! 基于 `lock_api` 的读写锁封装：允许多个读者并发持有，写者独占。
//!
//! 与 [`crate::SpinLock`] 不同，读写锁不关闭本地中断，
//! 因此不能在中断上下文中获取。

use core::hint;
use core::sync::atomic::{AtomicUsize, Ordering};

use lock_api::{GuardSend, RawRwLock};

/// 写者位
const WRITER: usize = 1;
/// 每个读者占用的计数单位
const READER: usize = 1 << 1;

/// 读写锁的底层实现
///
/// 状态字最低位表示写者是否持有锁，其余位为读者计数。
#[derive(Debug)]
pub struct RawRwSpinLock {
    state: AtomicUsize,
}

unsafe impl RawRwLock for RawRwSpinLock {
    #[allow(clippy::declare_interior_mutable_const)]
    const INIT: Self = RawRwSpinLock {
        state: AtomicUsize::new(0),
    };

    type GuardMarker = GuardSend;

    fn lock_shared(&self) {
        while !self.try_lock_shared() {
            hint::spin_loop();
        }
    }

    fn try_lock_shared(&self) -> bool {
        let prev = self.state.fetch_add(READER, Ordering::Acquire);
        if prev & WRITER != 0 {
            // 写者持有锁，撤销本次计数
            self.state.fetch_sub(READER, Ordering::Release);
            return false;
        }
        true
    }

    unsafe fn unlock_shared(&self) {
        self.state.fetch_sub(READER, Ordering::Release);
    }

    fn lock_exclusive(&self) {
        while !self.try_lock_exclusive() {
            hint::spin_loop();
        }
    }

    fn try_lock_exclusive(&self) -> bool {
        self.state
            .compare_exchange(0, WRITER, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
    }

    unsafe fn unlock_exclusive(&self) {
        self.state.fetch_and(!WRITER, Ordering::Release);
    }

    fn is_locked(&self) -> bool {
        self.state.load(Ordering::Relaxed) != 0
    }

    fn is_locked_exclusive(&self) -> bool {
        self.state.load(Ordering::Relaxed) & WRITER != 0
    }
}

/// 读写锁
///
/// # 示例
/// ```ignore
/// let lock = RwLock::new(0);
/// {
///     let r1 = lock.read();
///     let r2 = lock.read(); // 多个读者可同时持有
/// }
/// *lock.write() += 1; // 写者独占
/// ```
pub type RwLock<T> = lock_api::RwLock<RawRwSpinLock, T>;

/// 读锁 RAII 保护器
pub type RwLockReadGuard<'a, T> = lock_api::RwLockReadGuard<'a, RawRwSpinLock, T>;

/// 写锁 RAII 保护器
pub type RwLockWriteGuard<'a, T> = lock_api::RwLockWriteGuard<'a, RawRwSpinLock, T>;
