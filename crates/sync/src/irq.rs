//! 本地中断开关
//!
//! 关中断只排除本 CPU 上任务与中断处理程序之间的并发，
//! 其它 CPU 的访问仍由锁本身排除。

use crate::arch_ops;

/// 禁用本地中断，返回之前的中断状态
#[inline]
pub(crate) fn save_and_disable() -> usize {
    // SAFETY: 返回值只会交还给 restore，由调用方保证配对
    unsafe { arch_ops().read_and_disable_interrupts() }
}

/// 恢复由 [`save_and_disable`] 保存的中断状态
///
/// # Safety
/// flags 必须来自同一 CPU 上最近一次未配对的 save_and_disable
#[inline]
pub(crate) unsafe fn restore(flags: usize) {
    unsafe { arch_ops().restore_interrupts(flags) };
}
