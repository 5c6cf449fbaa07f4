//! Domain types.

mod mode;
mod payload;
mod secret;
mod sync;

pub use mode::Mode;
pub use payload::SecretPayload;
pub use secret::SecretId;
pub use sync::{Counts, Outcome, RunSummary, ServiceReport};
