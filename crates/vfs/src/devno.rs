//! 常用设备号与驱动查找

use alloc::sync::Arc;

use crate::{DeviceDriver, FsError, device_ops};

/// 标准字符设备 major 号
pub mod chrdev_major {
    /// /dev/null, /dev/zero 等
    pub const MEM: u32 = 1;
    /// /dev/tty*, /dev/ttyS*
    pub const TTY: u32 = 4;
    /// /dev/console
    pub const CONSOLE: u32 = 5;
    /// /dev/misc/* (rtc=135)
    pub const MISC: u32 = 10;
    /// /dev/input/*
    pub const INPUT: u32 = 13;
    /// /dev/pts/*
    pub const PTY_SLAVE: u32 = 136;
}

/// MEM 设备 minor 号
pub mod mem_minor {
    /// /dev/null
    pub const NULL: u32 = 3;
    /// /dev/zero
    pub const ZERO: u32 = 5;
    /// /dev/random
    pub const RANDOM: u32 = 8;
    /// /dev/urandom
    pub const URANDOM: u32 = 9;
}

/// MISC 设备 minor 号
pub mod misc_minor {
    /// RTC 设备
    pub const RTC: u32 = 135;
}

/// 标准块设备 major 号
pub mod blkdev_major {
    /// /dev/loop*
    pub const LOOP: u32 = 7;
    /// /dev/sd*
    pub const SCSI_DISK: u32 = 8;
    /// /dev/vd*
    pub const VIRTIO_BLK: u32 = 254;
}

/// 查找字符设备驱动
pub fn get_chrdev_driver(dev: u64) -> Result<Arc<dyn DeviceDriver>, FsError> {
    device_ops().get_chrdev_driver(dev)
}

/// 查找块设备驱动
pub fn get_blkdev_driver(dev: u64) -> Result<Arc<dyn DeviceDriver>, FsError> {
    device_ops().get_blkdev_driver(dev)
}
