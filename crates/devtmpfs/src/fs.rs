//! devtmpfs 文件系统实例

use alloc::sync::Arc;
use core::sync::atomic::{AtomicBool, Ordering};

use sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use vfs::{FileSystem, FsError, Inode};

use crate::config::{DevTmpFsConfig, FIRST_INODE_INDEX};
use crate::inode::DevTmpFsInode;

/// inode 编号分配器
///
/// 编号单调递增，实例存活期间不回绕也不复用。
/// 只能通过文件系统写锁拿到可变引用，因此分配总是与目录结构修改串行。
#[derive(Debug)]
pub struct InodeIndexAllocator {
    next: u64,
}

impl InodeIndexAllocator {
    /// 创建从 `first` 开始分配的分配器
    pub const fn starting_at(first: u64) -> Self {
        Self { next: first }
    }

    /// 分配下一个编号
    ///
    /// 编号空间耗尽时返回 [`FsError::NoSpace`]，之后的调用都会失败。
    pub fn allocate(&mut self) -> Result<u64, FsError> {
        let index = self.next;
        self.next = index.checked_add(1).ok_or(FsError::NoSpace)?;
        Ok(index)
    }

    /// 下一个将要分配的编号
    pub fn peek(&self) -> u64 {
        self.next
    }
}

/// 文件系统实例内所有 inode 共享的状态
///
/// inode 通过 `Arc` 持有它而不是持有 [`DevTmpFs`]，这样根目录不会与实例形成环。
pub(crate) struct FsShared {
    /// 文件系统级读写锁，保护所有目录的子项集合与编号分配
    tree: RwLock<InodeIndexAllocator>,
    config: DevTmpFsConfig,
}

impl FsShared {
    fn new(config: DevTmpFsConfig) -> Self {
        Self {
            tree: RwLock::new(InodeIndexAllocator::starting_at(FIRST_INODE_INDEX)),
            config,
        }
    }

    /// 结构修改：持写锁，同时拿到编号分配器
    pub(crate) fn lock_tree(&self) -> RwLockWriteGuard<'_, InodeIndexAllocator> {
        self.tree.write()
    }

    /// 只读访问目录结构
    pub(crate) fn lock_tree_shared(&self) -> RwLockReadGuard<'_, InodeIndexAllocator> {
        self.tree.read()
    }

    pub(crate) fn config(&self) -> &DevTmpFsConfig {
        &self.config
    }

    /// 让分配器从 `next` 继续分配
    #[cfg(test)]
    pub(crate) fn restart_indexes_at(&self, next: u64) {
        *self.tree.write() = InodeIndexAllocator::starting_at(next);
    }
}

/// devtmpfs 文件系统
///
/// 每次挂载一个实例。[`DevTmpFs::try_create`] 只分配实例和根目录，
/// 根目录的编号在 [`DevTmpFs::initialize`] 中确定。
pub struct DevTmpFs {
    shared: Arc<FsShared>,
    root: Arc<DevTmpFsInode>,
    initialized: AtomicBool,
}

impl DevTmpFs {
    /// 使用默认配置创建 devtmpfs
    pub fn try_create() -> Result<Arc<Self>, FsError> {
        Self::try_create_with(DevTmpFsConfig::default())
    }

    /// 使用指定的挂载配置创建 devtmpfs
    pub fn try_create_with(config: DevTmpFsConfig) -> Result<Arc<Self>, FsError> {
        let shared = Arc::new(FsShared::new(config));
        let root = DevTmpFsInode::new_root(shared.clone())?;

        Ok(Arc::new(Self {
            shared,
            root,
            initialized: AtomicBool::new(false),
        }))
    }

    /// 挂载时初始化：为根目录分配编号
    ///
    /// 编号分配失败时实例保持未初始化，可以重试。
    ///
    /// # Panics
    /// 同一实例成功初始化后再次调用会 panic
    pub fn initialize(&self) -> Result<(), FsError> {
        let mut tree = self.shared.lock_tree();
        if self.initialized.load(Ordering::Acquire) {
            panic!("devtmpfs: initialize called twice");
        }

        let index = tree.allocate()?;
        self.root.assign_index(index);
        self.initialized.store(true, Ordering::Release);
        drop(tree);

        log::info!(
            "devtmpfs: mounted, root inode {} mode {:o}",
            index,
            self.shared.config().root_mode.bits()
        );
        Ok(())
    }

    /// 是否已完成 [`DevTmpFs::initialize`]
    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    /// 根目录
    pub fn root(&self) -> Arc<DevTmpFsInode> {
        self.root.clone()
    }

    /// 分配一个新的 inode 编号
    pub fn allocate_inode_index(&self) -> Result<u64, FsError> {
        self.shared.lock_tree().allocate()
    }

    /// 挂载配置
    pub fn config(&self) -> &DevTmpFsConfig {
        self.shared.config()
    }

    pub(crate) fn shared(&self) -> &Arc<FsShared> {
        &self.shared
    }
}

impl FileSystem for DevTmpFs {
    fn fs_type(&self) -> &'static str {
        "devtmpfs"
    }

    fn initialize(&self) -> Result<(), FsError> {
        DevTmpFs::initialize(self)
    }

    fn root_inode(&self) -> Arc<dyn Inode> {
        self.root.clone() as Arc<dyn Inode>
    }

    fn sync(&self) -> Result<(), FsError> {
        // 没有后备存储
        Ok(())
    }

    fn umount(&self) -> Result<(), FsError> {
        // 卸载时目录树随实例一起释放
        Ok(())
    }
}
