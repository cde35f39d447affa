//! CLI command implementations

pub mod lifecycle;
pub mod probe;
pub mod status;
pub mod sync;

pub use lifecycle::{LifecycleOp, PathArgs};
pub use probe::ProbeArgs;
pub use status::StatusArgs;
pub use sync::SyncArgs;
