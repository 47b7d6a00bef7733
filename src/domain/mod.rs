mod aggregate;
mod formatting;
mod money;
mod period;
mod transaction;

pub use aggregate::*;
pub use formatting::*;
pub use money::*;
pub use period::*;
pub use transaction::*;
