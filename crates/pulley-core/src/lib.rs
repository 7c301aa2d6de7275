//! Pulley Core - Engine-agnostic 2D pulley joint node
//!
//! This crate provides the configuration side of a pulley constraint:
//! - World-space anchor computation from the node transform
//! - Parameter forwarding (rest length, stiffness, damping) to a physics server
//! - Tracking of the secondary anchor's relative transform
//! - Debug gizmo emission
//! - Property reflection with editor hints
//!
//! ## Collaborators
//!
//! The solver, the scene tree and the renderer live outside this crate and are
//! reached through traits:
//! - `PhysicsServer` - owns joint handles and the actual pulley dynamics
//! - `SceneTree` - resolves node paths and reports global transforms
//! - `Canvas` - receives debug line segments
//!
//! Test doubles for each (`RecordingServer`, `StaticScene`, `RecordingCanvas`)
//! are exported for hosts and downstream tests.

pub mod config;
pub mod draw;
mod error;
mod identity;
pub mod joint;
pub mod property;
pub mod scene;
pub mod server;

pub use config::PulleyConfig;
pub use draw::{ArmGizmo, Canvas, Color, DrawnLine, RecordingCanvas, Segment};
pub use error::{Error, Result};
pub use identity::{BodyRid, JointRid, NodePath, PresetId};
pub use joint::{ConfiguredJoint, JointState, PulleyAnchors, PulleyJoint};
pub use property::{PropertyHint, PropertyInfo, PropertyKind, PropertyList, PropertyValue, RangeHint};
pub use scene::{ResolvedNode, SceneTree, StaticScene};
pub use server::{PhysicsServer, PulleyParam, RecordingServer, ServerCall};

pub use glam::{Affine2, Vec2};
