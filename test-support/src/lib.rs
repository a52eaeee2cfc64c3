//! 测试支持 crate
//!
//! 提供宿主机 `cargo test` 所需的 Mock 实现

#![no_std]

pub mod mock;
