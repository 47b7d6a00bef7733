// Application layer: the transaction service that owns the in-memory cache,
// report assembly on top of the pure aggregator, and application errors.

pub mod error;
mod reporting;
mod service;

pub use error::*;
pub use reporting::*;
pub use service::*;
