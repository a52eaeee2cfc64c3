// Unit tests for devtmpfs internals, run with host `cargo test`.
//
// Behaviour visible through the `Inode` contract is covered by the
// integration tests under `tests/`.

use std::sync::Once;

use sync::{ArchOps, register_arch_ops};

/// 宿主机上没有中断可关，锁只需要一个能调用的 ArchOps
struct HostArch;

impl ArchOps for HostArch {
    unsafe fn read_and_disable_interrupts(&self) -> usize {
        0
    }

    unsafe fn restore_interrupts(&self, _flags: usize) {}
}

static HOST_ARCH: HostArch = HostArch;
static INIT: Once = Once::new();

fn init_once() {
    INIT.call_once(|| unsafe { register_arch_ops(&HOST_ARCH) });
}

mod allocator;
mod exhaustion;
