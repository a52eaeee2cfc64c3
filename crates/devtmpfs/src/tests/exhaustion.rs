use vfs::{FileMode, FsError, Inode, InodeType, makedev};

use super::init_once;
use crate::{DevTmpFs, DeviceKind, register_device_node};

fn mode(ty: InodeType, perm: u32) -> FileMode {
    FileMode::from_bits_truncate(perm).with_type(ty)
}

#[test]
fn test_create_child_out_of_indexes() {
    init_once();
    let fs = DevTmpFs::try_create().unwrap();
    fs.initialize().unwrap();
    fs.shared().restart_indexes_at(u64::MAX);
    let root = fs.root();

    let attempts = [
        ("null", mode(InodeType::CharDevice, 0o666), makedev(1, 3)),
        ("sda", mode(InodeType::BlockDevice, 0o660), makedev(8, 0)),
        ("input", mode(InodeType::Directory, 0o755), 0),
        ("stdin", mode(InodeType::Symlink, 0o777), 0),
    ];
    for (name, mode, dev) in attempts {
        assert_eq!(root.create_child(name, mode, dev, 0, 0).err(), Some(FsError::NoSpace));
        // 失败的创建不会留下目录项
        assert_eq!(root.lookup(name).err(), Some(FsError::NotFound));
    }
    assert_eq!(root.readdir().unwrap().len(), 2);

    fs.shared().restart_indexes_at(100);
    let null = root
        .create_child("null", mode(InodeType::CharDevice, 0o666), makedev(1, 3), 0, 0)
        .unwrap();
    assert_eq!(null.metadata().unwrap().inode_no, 100);
    assert_eq!(root.readdir().unwrap().len(), 3);
}

#[test]
fn test_hotplug_out_of_indexes() {
    init_once();
    let fs = DevTmpFs::try_create().unwrap();
    fs.initialize().unwrap();
    fs.shared().restart_indexes_at(u64::MAX);

    let perm = FileMode::from_bits_truncate(0o600);
    assert_eq!(
        fs.make_device_inode("mice", DeviceKind::Character, 13, 63, perm, 0, 0).err(),
        Some(FsError::NoSpace)
    );
    assert_eq!(
        register_device_node(&fs, "input", "mice", DeviceKind::Character, 13, 63, perm).err(),
        Some(FsError::NoSpace)
    );
    // 中间目录也没有建出来
    assert_eq!(fs.root().lookup("input").err(), Some(FsError::NotFound));
}

#[test]
fn test_initialize_retry_after_exhaustion() {
    init_once();
    let fs = DevTmpFs::try_create().unwrap();
    fs.shared().restart_indexes_at(u64::MAX);

    assert_eq!(fs.initialize(), Err(FsError::NoSpace));
    assert!(!fs.is_initialized());
    assert_eq!(fs.root().index(), 0);

    fs.shared().restart_indexes_at(7);
    assert_eq!(fs.initialize(), Ok(()));
    assert!(fs.is_initialized());
    assert_eq!(fs.root().index(), 7);
}
