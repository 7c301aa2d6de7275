//! Pulley joint configuration
//!
//! The editable parameters of a joint as a plain serializable value. Missing
//! fields deserialize to their defaults, so presets only need to name what
//! they change.

use crate::identity::NodePath;
use serde::{Deserialize, Serialize};

/// Editable parameters of a pulley joint
///
/// # Example
///
/// ```
/// use pulley_core::PulleyConfig;
///
/// let config = PulleyConfig::default()
///     .with_lengths(120.0, 80.0)
///     .with_stiffness(8.0)
///     .with_other_anchor("../Counterweight");
/// assert_eq!(config.effective_rest_length(), 120.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PulleyConfig {
    /// Length of the first arm, measured down the node's local Y axis
    pub length_a: f32,
    /// Length of the second arm (drawing only)
    pub length_b: f32,
    /// Combined rest length; 0 lets `length_a` stand in
    pub rest_length: f32,
    pub stiffness: f32,
    pub damping: f32,
    /// Node carrying the second arm's gizmo
    pub other_anchor: NodePath,
}

impl PulleyConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set both arm lengths
    pub fn with_lengths(mut self, length_a: f32, length_b: f32) -> Self {
        self.length_a = length_a;
        self.length_b = length_b;
        self
    }

    pub fn with_rest_length(mut self, rest_length: f32) -> Self {
        self.rest_length = rest_length;
        self
    }

    pub fn with_stiffness(mut self, stiffness: f32) -> Self {
        self.stiffness = stiffness;
        self
    }

    pub fn with_damping(mut self, damping: f32) -> Self {
        self.damping = damping;
        self
    }

    pub fn with_other_anchor(mut self, path: impl Into<NodePath>) -> Self {
        self.other_anchor = path.into();
        self
    }

    /// Rest length as the server should see it when updated live
    pub fn effective_rest_length(&self) -> f32 {
        effective_rest_length(self.rest_length, self.length_a)
    }
}

/// A zero rest length is replaced by `length_a`
pub(crate) fn effective_rest_length(rest_length: f32, length_a: f32) -> f32 {
    if rest_length != 0.0 {
        rest_length
    } else {
        length_a
    }
}

impl Default for PulleyConfig {
    fn default() -> Self {
        Self {
            length_a: 50.0,
            length_b: 50.0,
            rest_length: 0.0,
            stiffness: 20.0,
            damping: 1.0,
            other_anchor: NodePath::default(),
        }
    }
}
