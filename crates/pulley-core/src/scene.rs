//! Scene-graph boundary
//!
//! The joint asks the scene for its own global transform, for whatever a node
//! path points at, and for the debug-visualization flags.

use crate::identity::{BodyRid, NodePath};
use glam::Affine2;
use std::collections::HashMap;

/// What a node path resolved to
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResolvedNode {
    /// A node with a 2D global transform
    Node2D { global_transform: Affine2 },
    /// A node without a 2D transform
    Other,
}

impl ResolvedNode {
    pub fn global_transform(&self) -> Option<Affine2> {
        match self {
            ResolvedNode::Node2D { global_transform } => Some(*global_transform),
            ResolvedNode::Other => None,
        }
    }
}

/// Scene queries consumed by the pulley joint
pub trait SceneTree {
    /// Global transform of the joint node itself
    fn global_transform(&self) -> Affine2;

    /// Resolve a path relative to the joint node
    fn resolve(&self, path: &NodePath) -> Option<ResolvedNode>;

    /// Physics body handle of the node at `path`, if it is a body
    fn resolve_body(&self, _path: &NodePath) -> Option<BodyRid> {
        None
    }

    /// Running inside an editor
    fn is_editor_hint(&self) -> bool {
        false
    }

    /// Collision shapes are being visualized at runtime
    fn debug_collisions_hint(&self) -> bool {
        false
    }

    /// Whether debug gizmos should be drawn at all
    fn debug_draw_enabled(&self) -> bool {
        self.is_editor_hint() || self.debug_collisions_hint()
    }
}

/// Fixed scene snapshot
///
/// Holds the joint's global transform and a table of resolvable paths.
#[derive(Debug, Clone)]
pub struct StaticScene {
    global_transform: Affine2,
    nodes: HashMap<NodePath, ResolvedNode>,
    bodies: HashMap<NodePath, BodyRid>,
    editor_hint: bool,
    debug_collisions: bool,
}

impl StaticScene {
    /// Scene where the joint sits at `global_transform`
    pub fn new(global_transform: Affine2) -> Self {
        Self {
            global_transform,
            nodes: HashMap::new(),
            bodies: HashMap::new(),
            editor_hint: false,
            debug_collisions: false,
        }
    }

    /// Add a 2D node reachable at `path`
    pub fn with_node_2d(mut self, path: impl Into<NodePath>, global_transform: Affine2) -> Self {
        self.nodes
            .insert(path.into(), ResolvedNode::Node2D { global_transform });
        self
    }

    /// Add a node without a 2D transform reachable at `path`
    pub fn with_plain_node(mut self, path: impl Into<NodePath>) -> Self {
        self.nodes.insert(path.into(), ResolvedNode::Other);
        self
    }

    /// Add a physics body reachable at `path`
    pub fn with_body(mut self, path: impl Into<NodePath>, body: BodyRid) -> Self {
        self.add_body(path, body);
        self
    }

    /// Add (or replace) a physics body
    pub fn add_body(&mut self, path: impl Into<NodePath>, body: BodyRid) {
        let path = path.into();
        self.nodes.insert(
            path.clone(),
            ResolvedNode::Node2D {
                global_transform: Affine2::IDENTITY,
            },
        );
        self.bodies.insert(path, body);
    }

    pub fn with_editor_hint(mut self, enabled: bool) -> Self {
        self.editor_hint = enabled;
        self
    }

    pub fn with_debug_collisions(mut self, enabled: bool) -> Self {
        self.debug_collisions = enabled;
        self
    }

    /// Move the joint node
    pub fn set_global_transform(&mut self, transform: Affine2) {
        self.global_transform = transform;
    }

    /// Move (or add) a 2D node
    pub fn set_node_transform(&mut self, path: impl Into<NodePath>, transform: Affine2) {
        self.nodes.insert(
            path.into(),
            ResolvedNode::Node2D {
                global_transform: transform,
            },
        );
    }

    /// Remove a node so its path no longer resolves
    pub fn remove_node(&mut self, path: &NodePath) {
        self.nodes.remove(path);
        self.bodies.remove(path);
    }
}

impl Default for StaticScene {
    fn default() -> Self {
        Self::new(Affine2::IDENTITY)
    }
}

impl SceneTree for StaticScene {
    fn global_transform(&self) -> Affine2 {
        self.global_transform
    }

    fn resolve(&self, path: &NodePath) -> Option<ResolvedNode> {
        self.nodes.get(path).copied()
    }

    fn resolve_body(&self, path: &NodePath) -> Option<BodyRid> {
        self.bodies.get(path).copied()
    }

    fn is_editor_hint(&self) -> bool {
        self.editor_hint
    }

    fn debug_collisions_hint(&self) -> bool {
        self.debug_collisions
    }
}
