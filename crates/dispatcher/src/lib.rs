//! # Dispatcher
//!
//! 事件冒泡分发模块。
//!
//! 负责：
//! - 按节点登记 / 注销 handler (`HandlerRegistry`, `SharedHandlerRegistry`)
//! - 从起始节点沿父链向根遍历，直到某个 handler 消费事件 (`Dispatcher`)
//! - 由调用方决定未处理事件的后果 (`EventTrigger`, `apply_policy`)

pub mod dispatcher;
pub mod error;
pub mod metrics;
pub mod registry;
pub mod trigger;

pub use contracts::{handler, Handler, HandlerLookup, Hierarchy, Outcome, UnhandledPolicy};
pub use dispatcher::{DispatchReport, Dispatcher};
pub use error::DispatcherError;
pub use metrics::{DispatchMetrics, MetricsSnapshot};
pub use registry::{HandlerRegistry, Registration, SharedHandlerRegistry};
pub use trigger::{apply_policy, EventTrigger};
