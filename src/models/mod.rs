pub mod aggregate;
pub mod reading;

pub use aggregate::AggregateOp;
pub use reading::*;
