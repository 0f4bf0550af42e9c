//! Console variables
//!
//! Variables are registered with a [`ConVarSetup`] (untyped) or a
//! [`ConVarCreation<T>`] (typed) and addressed through [`ConVarRef`] or the
//! typed [`ConVar<T>`] wrapper. All access goes through a [`Registry`].
//!
//! # Example
//!
//! ```ignore
//! use cvarkit_core::convars::{ConVar, ConVarCreation};
//! use cvarkit_core::Registry;
//!
//! let registry = Registry::default();
//! let max_players = ConVar::register(
//!     &registry,
//!     ConVarCreation::new("sv_max_players", 10, "Max players in queue")
//!         .with_min(1)
//!         .with_max(64)
//!         .with_on_change(|_, change| {
//!             tracing::info!("Max players changed: {} -> {}", change.old_value, change.new_value);
//!         }),
//! );
//!
//! max_players.set(&registry, 100);
//! assert_eq!(max_players.get(&registry), 64);
//! ```
//!
//! [`Registry`]: crate::registry::Registry

mod access;
pub(crate) mod callbacks;
mod convar;
mod creation;
mod dispatch;
pub mod flags;
pub(crate) mod record;

pub use callbacks::{
    ChangeCallback, ChangeCallbackKey, ChangeEvent, FilterCallback, FilterCallbackKey,
    GlobalChangeCallback, GlobalChangeEvent, GlobalChangeKey,
};
pub use convar::ConVar;
pub use creation::{ConVarChange, ConVarCreation, ConVarSetup};
pub use flags::ConVarFlags;
pub use record::{INVALID_HELP, INVALID_NAME};

pub use cvarkit_sdk::{ConVarRef, VarType, INVALID_ACCESS_INDEX};
