//! Pure Rust codec for the WDATA world-definition binary format.
//!
//! This crate is IO-free: [`Document::from_bytes`] decodes an in-memory byte
//! buffer and [`Document::to_bytes`] produces one. File handling, UI, and
//! persistence live with the caller.

#![forbid(unsafe_code)]

mod cursor;
mod decode;
mod encode;
mod error;
mod model;
mod version;

pub use error::*;
pub use model::*;
pub use version::*;



#[cfg(test)]
mod round_trip_tests;
