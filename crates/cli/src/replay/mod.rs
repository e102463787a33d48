//! 事件回放模块
//!
//! 把蓝图中的脚本化 handler 注册到 `HandlerRegistry`，再依次分发蓝图里的事件。

mod session;
mod stats;

pub use session::{EventReport, ReplaySession};
pub use stats::ReplayStats;
