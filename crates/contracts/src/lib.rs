//! # Contracts
//!
//! Frozen interface contracts shared by every crate in the workspace.
//! Business crates depend on this crate only, never on each other in reverse.
//!
//! ## Model
//! - A node lives in a hierarchy owned by the host; this crate only sees it
//!   through the [`Hierarchy`] parent lookup.
//! - Events are opaque to the core. [`EventEnvelope`] is the concrete event
//!   used by the blueprint-driven tooling.
//! - A dispatch ends in an [`Outcome`]; `Unhandled` is a value, not an error.

mod blueprint;
mod error;
mod event;
mod handler;
mod hierarchy;
mod node_id;
mod outcome;

pub use blueprint::*;
pub use error::*;
pub use event::EventEnvelope;
pub use handler::{handler, Handler, HandlerLookup};
pub use hierarchy::{parent_fn, Ancestors, Hierarchy, ParentFn, ParentMap};
pub use node_id::NodeId;
pub use outcome::Outcome;
