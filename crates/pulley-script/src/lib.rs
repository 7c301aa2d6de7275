//! Pulley Script - RON loader for joint presets
//!
//! Loads named pulley joint configurations from RON files so scenes can
//! share tuned parameter sets:
//!
//! ```ron
//! (
//!     joints: [
//!         (id: "crane", joint: (length_a: 120.0, stiffness: 8.0)),
//!         (id: "elevator", description: "Counterweighted lift", joint: (damping: 4.0)),
//!     ]
//! )
//! ```
//!
//! Fields left out of `joint` take the default joint configuration.

mod error;
mod loader;

pub use error::{Error, Result};
pub use loader::{JointDef, JointDefs, Loader};
