//! 设备注册接口
//!
//! 供驱动在启动探测或热插拔时创建、删除设备节点。
//! 目录路径相对 devtmpfs 根目录，以 `/` 分隔，例如 `"input"` 或 `"pts"`；空串表示根目录。

use alloc::sync::Arc;

use vfs::{FileMode, FsError, Inode, InodeType, makedev};

use crate::config::DEFAULT_DIR_MODE;
use crate::device::DeviceKind;
use crate::fs::DevTmpFs;
use crate::inode::{DevTmpFsInode, try_string};

impl DevTmpFs {
    /// 构造一个尚未挂入任何目录的设备 inode
    ///
    /// 编号立即分配，之后可以用 [`Inode::add_child`] 挂到任意目录下。
    #[allow(clippy::too_many_arguments)]
    pub fn make_device_inode(
        &self,
        name: &str,
        kind: DeviceKind,
        major: u32,
        minor: u32,
        mode: FileMode,
        uid: u32,
        gid: u32,
    ) -> Result<Arc<DevTmpFsInode>, FsError> {
        let name = try_string(name)?;
        let index = self.allocate_inode_index()?;
        Ok(DevTmpFsInode::new_device(
            self.shared().clone(),
            index,
            name,
            kind,
            major,
            minor,
            mode,
            uid,
            gid,
        ))
    }
}

/// 在 `dir` 下创建设备节点，缺失的中间目录会以默认权限创建
///
/// 节点属主为 root，`mode` 只取权限位。
pub fn register_device_node(
    fs: &DevTmpFs,
    dir: &str,
    name: &str,
    kind: DeviceKind,
    major: u32,
    minor: u32,
    mode: FileMode,
) -> Result<Arc<dyn Inode>, FsError> {
    let parent = walk(fs, dir, true)?;
    let inode = parent.create_child(
        name,
        mode.with_type(kind.inode_type()),
        makedev(major, minor),
        0,
        0,
    )?;

    log::debug!(
        "devtmpfs: registered {:?} device {}:{} at '{}/{}'",
        kind,
        major,
        minor,
        dir,
        name
    );
    Ok(inode)
}

/// 删除 `dir` 下的设备节点
///
/// 目标不是设备节点时返回 [`FsError::InvalidArgument`]。中间目录保留。
pub fn unregister_device_node(fs: &DevTmpFs, dir: &str, name: &str) -> Result<(), FsError> {
    let parent = walk(fs, dir, false)?;
    let child = parent.lookup(name)?;
    if DeviceKind::from_inode_type(child.metadata()?.inode_type).is_none() {
        return Err(FsError::InvalidArgument);
    }
    parent.remove_child(name)?;

    log::debug!("devtmpfs: unregistered device at '{}/{}'", dir, name);
    Ok(())
}

/// 从根目录逐级查找 `dir`，`create` 为真时补建缺失的目录
fn walk(fs: &DevTmpFs, dir: &str, create: bool) -> Result<Arc<dyn Inode>, FsError> {
    let mut current: Arc<dyn Inode> = fs.root();

    for component in dir.split('/').filter(|c| !c.is_empty() && *c != ".") {
        if component == ".." {
            return Err(FsError::InvalidArgument);
        }

        current = match current.lookup(component) {
            Ok(next) => next,
            Err(FsError::NotFound) if create => {
                let mode = FileMode::from_bits_truncate(DEFAULT_DIR_MODE)
                    .with_type(InodeType::Directory);
                match current.create_child(component, mode, 0, 0, 0) {
                    Ok(created) => created,
                    // 并发注册者先建好了
                    Err(FsError::AlreadyExists) => current.lookup(component)?,
                    Err(e) => return Err(e),
                }
            }
            Err(e) => return Err(e),
        };
    }

    Ok(current)
}
