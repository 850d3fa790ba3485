pub mod availability;
pub mod booking;
pub mod interval;
pub mod payment;
pub mod time;

pub use availability::*;
pub use booking::*;
pub use interval::*;
pub use payment::*;
pub use time::*;
