//! 目录节点
//!
//! 子项按插入顺序保存在一个 `Vec` 中，查找是线性扫描，名字按字节精确比较。
//! 目录树很小且很少修改（设备热插拔），线性扫描足够。
//!
//! 锁顺序：文件系统读写锁 → 父目录子项锁 → 子目录子项锁。

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::ops::ControlFlow;

use sync::SpinLock;
use vfs::{DirEntry, FileMode, FsError, Inode, InodeType, major, minor};

use crate::config::DevTmpFsConfig;
use crate::device::DeviceKind;
use crate::inode::{DevTmpFsInode, NodeType, try_string};

struct ChildEntry {
    name: String,
    inode: Arc<DevTmpFsInode>,
}

pub(crate) struct DirectoryNode {
    children: SpinLock<Vec<ChildEntry>>,
}

/// create_child 能够构造的节点
enum NewNode {
    Directory,
    Device(DeviceKind),
    Link,
}

/// 检查目录项名字
pub(crate) fn validate_name(config: &DevTmpFsConfig, name: &str) -> Result<(), FsError> {
    if name.is_empty() || name.contains('/') || name.contains('\0') {
        return Err(FsError::InvalidArgument);
    }
    if name == "." || name == ".." {
        return Err(FsError::AlreadyExists);
    }
    if name.len() > config.max_name_len {
        return Err(FsError::NameTooLong);
    }
    Ok(())
}

impl DirectoryNode {
    pub(crate) fn new() -> Self {
        Self {
            children: SpinLock::new(Vec::new()),
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.children.lock().is_empty()
    }

    pub(crate) fn lookup(
        &self,
        dir: &DevTmpFsInode,
        name: &str,
    ) -> Result<Arc<dyn Inode>, FsError> {
        let _tree = dir.fs().lock_tree_shared();
        let children = self.children.lock();
        children
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| entry.inode.clone() as Arc<dyn Inode>)
            .ok_or(FsError::NotFound)
    }

    /// 先 `.`、`..`，再按插入顺序遍历子项
    ///
    /// 目录项在读锁下整体快照，visitor 在锁外执行，可以重新进入文件系统。
    /// `..` 使用本目录自己的编号，真正的父目录由上层路径解析负责。
    pub(crate) fn traverse(
        &self,
        dir: &DevTmpFsInode,
        visitor: &mut dyn FnMut(&DirEntry) -> ControlFlow<()>,
    ) -> Result<(), FsError> {
        let index = dir.index();
        let mut entries = Vec::new();
        {
            let _tree = dir.fs().lock_tree_shared();
            let children = self.children.lock();
            entries
                .try_reserve_exact(children.len() + 2)
                .map_err(|_| FsError::NoMemory)?;

            for name in [".", ".."] {
                entries.push(DirEntry {
                    name: try_string(name)?,
                    inode_no: index,
                    inode_type: InodeType::Directory,
                });
            }
            for child in children.iter() {
                entries.push(DirEntry {
                    name: try_string(&child.name)?,
                    inode_no: child.inode.index(),
                    inode_type: child.inode.inode_type(),
                });
            }
        }

        for entry in &entries {
            if visitor(entry).is_break() {
                break;
            }
        }
        Ok(())
    }

    pub(crate) fn create_child(
        &self,
        dir: &DevTmpFsInode,
        name: &str,
        mode: FileMode,
        dev: u64,
        uid: u32,
        gid: u32,
    ) -> Result<Arc<DevTmpFsInode>, FsError> {
        let fs = dir.fs();
        validate_name(fs.config(), name)?;

        let kind = match mode.file_type() {
            Some(InodeType::Directory) => NewNode::Directory,
            Some(InodeType::Symlink) => NewNode::Link,
            Some(ty) => match DeviceKind::from_inode_type(ty) {
                Some(kind) => NewNode::Device(kind),
                None => return Err(FsError::InvalidArgument),
            },
            None => return Err(FsError::InvalidArgument),
        };

        let entry_name = try_string(name)?;
        let inode_name = try_string(name)?;

        let mut tree = fs.lock_tree();
        let mut children = self.children.lock();

        if children.iter().any(|entry| entry.name == name) {
            return Err(FsError::AlreadyExists);
        }
        children.try_reserve(1).map_err(|_| FsError::NoMemory)?;

        // 编号在挂入目录之前分配，查找者不会看到没有编号的节点
        let index = tree.allocate()?;
        let inode = match kind {
            NewNode::Directory => {
                DevTmpFsInode::new_directory(fs.clone(), index, inode_name, mode, uid, gid)
            }
            NewNode::Device(kind) => DevTmpFsInode::new_device(
                fs.clone(),
                index,
                inode_name,
                kind,
                major(dev),
                minor(dev),
                mode,
                uid,
                gid,
            ),
            NewNode::Link => DevTmpFsInode::new_link(fs.clone(), index, inode_name, mode, uid, gid),
        };

        children.push(ChildEntry {
            name: entry_name,
            inode: inode.clone(),
        });
        drop(children);
        drop(tree);

        log::debug!(
            "devtmpfs: created '{}' (inode {}, {:?}) in inode {}",
            name,
            index,
            inode.node_type(),
            dir.index()
        );
        Ok(inode)
    }

    /// 挂接一个预先构造好的 inode
    ///
    /// 只接受同一实例的设备或链接节点：目录只能由 create_child 创建，
    /// 否则同一目录可能出现在两处，甚至挂进自己的子树。
    pub(crate) fn add_child(
        &self,
        dir: &DevTmpFsInode,
        child: Arc<dyn Inode>,
        name: &str,
        mode: FileMode,
    ) -> Result<(), FsError> {
        let fs = dir.fs();
        validate_name(fs.config(), name)?;

        let child = child
            .downcast_arc::<DevTmpFsInode>()
            .map_err(|_| FsError::InvalidArgument)?;
        if !Arc::ptr_eq(child.fs(), fs) {
            return Err(FsError::InvalidArgument);
        }
        match child.node_type() {
            NodeType::Directory | NodeType::RootDirectory => return Err(FsError::InvalidArgument),
            NodeType::BlockDevice | NodeType::CharacterDevice | NodeType::Link => {}
        }
        if let Some(ty) = mode.file_type() {
            if ty != child.inode_type() {
                return Err(FsError::InvalidArgument);
            }
        }

        let entry_name = try_string(name)?;

        let _tree = fs.lock_tree();
        let mut children = self.children.lock();
        if children.iter().any(|entry| entry.name == name) {
            return Err(FsError::AlreadyExists);
        }
        children.try_reserve(1).map_err(|_| FsError::NoMemory)?;

        let index = child.index();
        children.push(ChildEntry {
            name: entry_name,
            inode: child,
        });
        drop(children);

        log::debug!(
            "devtmpfs: attached inode {} as '{}' in inode {}",
            index,
            name,
            dir.index()
        );
        Ok(())
    }

    /// 摘除目录项
    ///
    /// 只断开目录对子项的引用，其它地方持有的引用仍然有效。
    pub(crate) fn remove_child(&self, dir: &DevTmpFsInode, name: &str) -> Result<(), FsError> {
        let removed = {
            let _tree = dir.fs().lock_tree();
            let mut children = self.children.lock();

            let pos = children
                .iter()
                .position(|entry| entry.name == name)
                .ok_or(FsError::NotFound)?;

            if let Some(subdir) = children[pos].inode.as_directory() {
                if !subdir.is_empty() {
                    return Err(FsError::DirectoryNotEmpty);
                }
            }

            children.remove(pos)
        };

        log::debug!(
            "devtmpfs: removed '{}' (inode {}) from inode {}",
            name,
            removed.inode.index(),
            dir.index()
        );
        Ok(())
    }
}
