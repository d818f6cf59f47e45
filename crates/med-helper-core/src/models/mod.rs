//! Domain models for the med-helper system.

mod contact;
mod medication;
mod profile;
mod reminder;
mod vitals;

pub use contact::*;
pub use medication::*;
pub use profile::*;
pub use reminder::*;
pub use vitals::*;
