//! Mock 实现模块
//!
//! 这里不依赖任何内核 crate（避免循环依赖），
//! 由拥有对应 trait 的 crate 在 `cfg(test)` 下为 Mock 类型实现 trait。

pub mod arch;
