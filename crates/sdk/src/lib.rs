//! cvarkit SDK - Console Variable Type Definitions
//!
//! This crate contains the plain data types shared by the registry and its
//! users. It has no dependencies and compiles quickly, allowing parallel
//! compilation of dependent crates.
//!
//! # Modules
//!
//! - [`convar`] - Value type tag, handles and `FCVAR_*` flag bits
//! - [`math`] - Color and vector aggregates
//! - [`slots`] - Split-screen slots, player slots and command targets

pub mod convar;
pub mod math;
pub mod slots;

pub use convar::*;
pub use math::*;
pub use slots::*;
