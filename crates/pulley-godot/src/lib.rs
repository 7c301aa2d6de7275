//! Pulley Godot - GDExtension bindings for Godot 4
//!
//! Exposes the pulley joint to Godot as the native `PulleyJoint2D` class.

mod adapters;
mod bridge;
mod joint;

use godot::prelude::*;

struct PulleyExtension;

#[gdextension]
unsafe impl ExtensionLibrary for PulleyExtension {}

pub use joint::PulleyJoint2D;
