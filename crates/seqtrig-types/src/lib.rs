//! Shared types for the seqtrig sequence trigger.

mod limit;
mod mode;
mod policy;
mod summary;

pub use limit::*;
pub use mode::*;
pub use policy::*;
pub use summary::*;
