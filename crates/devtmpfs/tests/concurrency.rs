//! 多线程下的目录修改与编号分配

mod common;

use std::collections::HashSet;
use std::sync::{Arc, Barrier};
use std::thread;

use common::{mode, mounted};
use devtmpfs::{DeviceKind, register_device_node};
use vfs::{FileMode, Inode, InodeType, makedev};

const THREADS: usize = 8;
const PER_THREAD: usize = 32;

#[test]
fn test_concurrent_create_unique_indexes() {
    let fs = mounted();
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let fs = fs.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                let root = fs.root();
                (0..PER_THREAD)
                    .map(|i| {
                        let name = format!("tty{}_{}", t, i);
                        let node = root
                            .create_child(
                                &name,
                                mode(InodeType::CharDevice, 0o620),
                                makedev(4, (t * PER_THREAD + i) as u32),
                                0,
                                0,
                            )
                            .unwrap();
                        node.metadata().unwrap().inode_no
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut indexes = HashSet::new();
    for handle in handles {
        for index in handle.join().unwrap() {
            assert!(indexes.insert(index), "inode {} issued twice", index);
        }
    }
    assert_eq!(indexes.len(), THREADS * PER_THREAD);
    assert!(!indexes.contains(&fs.root().index()));
    assert_eq!(fs.root().readdir().unwrap().len(), THREADS * PER_THREAD + 2);
}

#[test]
fn test_concurrent_same_name() {
    let fs = mounted();
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let fs = fs.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                let console = mode(InodeType::CharDevice, 0o600);
                fs.root()
                    .create_child("console", console, makedev(5, 1), 0, 0)
                    .is_ok()
            })
        })
        .collect();

    let winners = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|&ok| ok)
        .count();
    assert_eq!(winners, 1);
}

#[test]
fn test_concurrent_hotplug_shared_directory() {
    let fs = mounted();
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let fs = fs.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                register_device_node(
                    &fs,
                    "input",
                    &format!("event{}", t),
                    DeviceKind::Character,
                    13,
                    64 + t as u32,
                    FileMode::from_bits_truncate(0o660),
                )
                .unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    // 中间目录只建了一次
    let entries = fs.root().readdir().unwrap();
    assert_eq!(entries.iter().filter(|e| e.name == "input").count(), 1);
    let input = fs.root().lookup("input").unwrap();
    assert_eq!(input.readdir().unwrap().len(), THREADS + 2);
}

#[test]
fn test_readers_during_removal() {
    let fs = mounted();
    let root = fs.root();
    for i in 0..PER_THREAD {
        root.create_child(
            &format!("loop{}", i),
            mode(InodeType::BlockDevice, 0o660),
            makedev(7, i as u32),
            0,
            6,
        )
        .unwrap();
    }

    let reader = {
        let fs = fs.clone();
        thread::spawn(move || {
            for _ in 0..100 {
                let entries = fs.root().readdir().unwrap();
                // 每次快照都包含 . 和 ..，且没有重复项
                assert_eq!(entries[0].name, ".");
                assert_eq!(entries[1].name, "..");
                let unique: HashSet<_> = entries.iter().map(|e| e.name.clone()).collect();
                assert_eq!(unique.len(), entries.len());
            }
        })
    };

    for i in 0..PER_THREAD {
        root.remove_child(&format!("loop{}", i)).unwrap();
    }
    reader.join().unwrap();
    assert_eq!(root.readdir().unwrap().len(), 2);
}
