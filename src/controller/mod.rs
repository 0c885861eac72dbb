pub mod allocator;
pub mod controller;
pub mod driver;
pub mod queue;

pub use allocator::Allocator;
pub use controller::Controller;
pub use driver::{ClaimAllocation, DraDriver, Driver, DriverError};
