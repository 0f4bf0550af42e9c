//! Value types - tagged values, text conversions and the descriptor table
//!
//! Variables store [`Value`]s. All type-specific behaviour is routed through
//! the [`TypeDescriptor`] for the variable's [`VarType`], so the rest of the
//! registry never matches on concrete types.
//!
//! # Example
//!
//! ```ignore
//! use cvarkit_core::types::{descriptor, Value};
//! use cvarkit_core::sdk::VarType;
//!
//! let desc = descriptor(VarType::Vector3);
//! let v = desc.parse("1 2 3")?;
//! assert_eq!(desc.format(&v), "1 2 3");
//! ```

mod descriptor;
mod parse;
mod value;

pub use descriptor::{descriptor, TypeDescriptor};
pub use parse::ParseError;
pub use value::{ConVarValue, Value};
