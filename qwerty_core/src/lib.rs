//! `qwerty_core`：纯逻辑层，不做任何 I/O。
//!
//! 设计目标：
//! - **与宿主无关**：编辑器插件、CLI 都通过 `bridge` 的两个 trait 接入同一套状态机
//! - **分层清晰**：事件 -> processor 链 -> `Context`（练习状态）-> 输出（`UiState` + `Action`）
//! - **可测试**：时间由宿主注入（`InputEvent::Tick`），定时器行为可以确定性地测试
pub mod bridge;
pub mod comparator;
pub mod config;
pub mod context;
pub mod dictionary;
pub mod engine;
pub mod error;
pub mod key_event;
pub mod model;
pub mod processor;
pub mod scheduler;
pub mod session;

pub use error::SessionError;
