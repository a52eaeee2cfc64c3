//! devtmpfs 配置
//!
//! 编译期默认值，以及挂载参数字符串的解析。

use vfs::{FileMode, FsError};

/// 分配器发出的第一个 inode 编号
pub const FIRST_INODE_INDEX: u64 = 1;

/// 根目录默认权限
pub const DEFAULT_ROOT_MODE: u32 = 0o755;

/// 热插拔时自动创建的中间目录权限
pub const DEFAULT_DIR_MODE: u32 = 0o755;

/// 单个目录项名字的最大字节数
pub const MAX_NAME_LEN: usize = 255;

/// 挂载配置
///
/// 根目录的 mode/uid/gid 在创建文件系统时从这里取值，此后不可修改。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DevTmpFsConfig {
    /// 根目录权限位
    pub root_mode: FileMode,
    /// 根目录属主
    pub root_uid: u32,
    /// 根目录属组
    pub root_gid: u32,
    /// 名字长度上限
    pub max_name_len: usize,
}

impl Default for DevTmpFsConfig {
    fn default() -> Self {
        Self {
            root_mode: FileMode::from_bits_truncate(DEFAULT_ROOT_MODE),
            root_uid: 0,
            root_gid: 0,
            max_name_len: MAX_NAME_LEN,
        }
    }
}

impl DevTmpFsConfig {
    /// 解析挂载参数，例如 `mode=0755,uid=0,gid=0`
    ///
    /// `mode` 按八进制解析，只允许权限位；`uid`/`gid` 按十进制解析。
    /// 未知参数或格式错误返回 [`FsError::InvalidArgument`]。
    pub fn parse(data: &str) -> Result<Self, FsError> {
        let mut config = Self::default();

        for option in data.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let (key, value) = option.split_once('=').ok_or(FsError::InvalidArgument)?;
            match key.trim() {
                "mode" => {
                    let bits = u32::from_str_radix(value.trim(), 8)
                        .map_err(|_| FsError::InvalidArgument)?;
                    if bits & !0o7777 != 0 {
                        return Err(FsError::InvalidArgument);
                    }
                    config.root_mode = FileMode::from_bits_truncate(bits);
                }
                "uid" => config.root_uid = parse_id(value)?,
                "gid" => config.root_gid = parse_id(value)?,
                other => {
                    log::warn!("devtmpfs: unknown mount option '{}'", other);
                    return Err(FsError::InvalidArgument);
                }
            }
        }

        Ok(config)
    }
}

fn parse_id(value: &str) -> Result<u32, FsError> {
    value
        .trim()
        .parse::<u32>()
        .map_err(|_| FsError::InvalidArgument)
}
