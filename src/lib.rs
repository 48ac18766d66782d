//! Persisted reactive state cells with cross-context change propagation.
//!
//! A [`Cell`] binds a serializable value to a named slot in a [`Store`]:
//! reads are in-memory and infallible, writes persist immediately, and
//! writes made by sibling contexts over the same durable store flow back in
//! through a per-key observer registry (the [`Hub`]). Two scopes exist:
//! durable (directory-backed, shared, survives restarts) and session
//! (in-memory, private to the process).
//!
//! ```no_run
//! use stowage::Context;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let ctx = Context::open("/tmp/stowage-demo")?;
//! let counter = ctx.durable_cell(0i64, "counter")?;
//! counter.update(|n| n + 1)?;
//!
//! // Each event-loop tick, fold in changes made by other processes.
//! ctx.pump();
//! # Ok(())
//! # }
//! ```

pub mod cell;
pub mod cli;
pub mod context;
pub mod model;
pub mod ops;
pub mod store;
pub mod sync;

pub use cell::{Cell, CellError};
pub use context::{Context, ContextError};
pub use store::{DurableStore, Scope, SessionStore, Store, StoreError};
pub use sync::{ChangeEvent, Hub, StoreWatcher};
