//! 集成测试共用的宿主机环境
//!
//! 注册一个不关中断的 ArchOps 和一个可在测试中动态挂载驱动的设备注册表。

#![allow(dead_code)]

use std::sync::{Arc, Mutex, Once, OnceLock};

use devtmpfs::{DevTmpFs, DeviceKind};
use sync::{ArchOps, register_arch_ops};
use vfs::{DeviceDriver, DeviceOps, FileMode, FsError, InodeType, makedev, register_device_ops};

struct HostArch;

impl ArchOps for HostArch {
    unsafe fn read_and_disable_interrupts(&self) -> usize {
        0
    }

    unsafe fn restore_interrupts(&self, _flags: usize) {}
}

type DriverTable = Mutex<Vec<(DeviceKind, u64, Arc<dyn DeviceDriver>)>>;

static DRIVERS: OnceLock<DriverTable> = OnceLock::new();

fn drivers() -> &'static DriverTable {
    DRIVERS.get_or_init(|| Mutex::new(Vec::new()))
}

/// 按 (种类, 设备号) 查表，找不到返回 NoDevice
struct TestDevices;

impl TestDevices {
    fn find(kind: DeviceKind, dev: u64) -> Result<Arc<dyn DeviceDriver>, FsError> {
        drivers()
            .lock()
            .unwrap()
            .iter()
            .find(|(k, d, _)| *k == kind && *d == dev)
            .map(|(_, _, driver)| driver.clone())
            .ok_or(FsError::NoDevice)
    }
}

impl DeviceOps for TestDevices {
    fn get_chrdev_driver(&self, dev: u64) -> Result<Arc<dyn DeviceDriver>, FsError> {
        Self::find(DeviceKind::Character, dev)
    }

    fn get_blkdev_driver(&self, dev: u64) -> Result<Arc<dyn DeviceDriver>, FsError> {
        Self::find(DeviceKind::Block, dev)
    }
}

static HOST_ARCH: HostArch = HostArch;
static TEST_DEVICES: TestDevices = TestDevices;
static INIT: Once = Once::new();

pub fn init_once() {
    INIT.call_once(|| unsafe {
        register_arch_ops(&HOST_ARCH);
        register_device_ops(&TEST_DEVICES);
    });
}

/// 注册驱动；同一设备号重复注册时后注册的被忽略
pub fn install_driver(kind: DeviceKind, major: u32, minor: u32, driver: Arc<dyn DeviceDriver>) {
    init_once();
    drivers()
        .lock()
        .unwrap()
        .push((kind, makedev(major, minor), driver));
}

/// 已初始化的新实例
pub fn mounted() -> Arc<DevTmpFs> {
    init_once();
    let fs = DevTmpFs::try_create().unwrap();
    fs.initialize().unwrap();
    fs
}

pub fn mode(ty: InodeType, perm: u32) -> FileMode {
    FileMode::from_bits_truncate(perm).with_type(ty)
}

/// 读出全零，写入全部丢弃
pub struct ZeroDriver;

impl DeviceDriver for ZeroDriver {
    fn read_at(&self, _offset: usize, buf: &mut [u8]) -> Result<usize, FsError> {
        buf.fill(0);
        Ok(buf.len())
    }

    fn write_at(&self, _offset: usize, buf: &[u8]) -> Result<usize, FsError> {
        Ok(buf.len())
    }
}

/// 按 offset 读写的内存设备
#[derive(Default)]
pub struct RamDriver {
    data: Mutex<Vec<u8>>,
}

impl RamDriver {
    pub fn contents(&self) -> Vec<u8> {
        self.data.lock().unwrap().clone()
    }
}

impl DeviceDriver for RamDriver {
    fn read_at(&self, offset: usize, buf: &mut [u8]) -> Result<usize, FsError> {
        let data = self.data.lock().unwrap();
        if offset >= data.len() {
            return Ok(0);
        }
        let count = buf.len().min(data.len() - offset);
        buf[..count].copy_from_slice(&data[offset..offset + count]);
        Ok(count)
    }

    fn write_at(&self, offset: usize, buf: &[u8]) -> Result<usize, FsError> {
        let mut data = self.data.lock().unwrap();
        let end = offset + buf.len();
        if data.len() < end {
            data.resize(end, 0);
        }
        data[offset..end].copy_from_slice(buf);
        Ok(buf.len())
    }
}

/// 永远没有数据可读的设备
pub struct BusyDriver;

impl DeviceDriver for BusyDriver {
    fn read_at(&self, _offset: usize, _buf: &mut [u8]) -> Result<usize, FsError> {
        Err(FsError::WouldBlock)
    }

    fn write_at(&self, _offset: usize, _buf: &[u8]) -> Result<usize, FsError> {
        Err(FsError::IoError)
    }
}
