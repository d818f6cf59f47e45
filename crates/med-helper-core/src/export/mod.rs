//! Export functionality for notifications and health logs.

mod notification;
mod vitals;

pub use notification::*;
pub use vitals::*;
