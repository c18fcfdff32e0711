//! Models Module
//!
//! Response DTOs the driver serializes to JSON.

pub mod responses;

pub use responses::*;
