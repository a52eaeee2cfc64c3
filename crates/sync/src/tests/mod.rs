// Unit tests for sync, run with host `cargo test`.
//
// SpinLock disables interrupts through the registered ArchOps, so spin lock
// tests register the mock from `test-support` first and hold INTR_STATE while
// they run. RwLock never touches interrupts.

use std::sync::atomic::Ordering;
use std::sync::{Arc, Mutex, MutexGuard, Once};
use std::thread;
use std::vec::Vec;

use test_support::mock::arch::{MOCK_ARCH_OPS, MockArchOps};

use crate::{ArchOps, RwLock, SpinLock, register_arch_ops};

impl ArchOps for MockArchOps {
    unsafe fn read_and_disable_interrupts(&self) -> usize {
        unsafe { MockArchOps::read_and_disable_interrupts(self) }
    }

    unsafe fn restore_interrupts(&self, flags: usize) {
        unsafe { MockArchOps::restore_interrupts(self, flags) }
    }
}

static INIT: Once = Once::new();

fn init_once() {
    INIT.call_once(|| unsafe { register_arch_ops(&MOCK_ARCH_OPS) });
}

/// 模拟的中断开关是全局状态，检查它的测试需要串行执行
static INTR_STATE: Mutex<()> = Mutex::new(());

fn lock_intr_state() -> MutexGuard<'static, ()> {
    init_once();
    let guard = INTR_STATE.lock().unwrap_or_else(|e| e.into_inner());
    MOCK_ARCH_OPS.interrupt_state.store(true, Ordering::SeqCst);
    guard
}
