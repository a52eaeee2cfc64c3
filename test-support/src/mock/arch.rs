//! 架构相关操作的 Mock 实现
//!
//! 用一个原子布尔值模拟本地中断开关，供 `sync` 的锁在宿主机上运行。

use core::sync::atomic::{AtomicBool, Ordering};

/// 模拟的 SIE 位
pub const SIE: usize = 0x2;

/// Mock 架构操作
pub struct MockArchOps {
    /// 当前是否“开中断”
    pub interrupt_state: AtomicBool,
}

impl MockArchOps {
    /// 创建一个开中断的 Mock
    pub const fn new() -> Self {
        Self {
            interrupt_state: AtomicBool::new(true),
        }
    }

    /// 关中断，返回之前的状态（开中断时为 SIE 位）
    ///
    /// # Safety
    /// 与真实实现保持相同签名，Mock 本身没有前置条件
    pub unsafe fn read_and_disable_interrupts(&self) -> usize {
        if self.interrupt_state.swap(false, Ordering::SeqCst) {
            SIE
        } else {
            0
        }
    }

    /// 按 flags 恢复中断状态
    ///
    /// # Safety
    /// 与真实实现保持相同签名，Mock 本身没有前置条件
    pub unsafe fn restore_interrupts(&self, flags: usize) {
        self.interrupt_state.store(flags & SIE != 0, Ordering::SeqCst);
    }

    /// 当前是否处于开中断状态
    pub fn interrupts_enabled(&self) -> bool {
        self.interrupt_state.load(Ordering::SeqCst)
    }
}

impl Default for MockArchOps {
    fn default() -> Self {
        Self::new()
    }
}

/// 全局 Mock 实例
pub static MOCK_ARCH_OPS: MockArchOps = MockArchOps::new();
