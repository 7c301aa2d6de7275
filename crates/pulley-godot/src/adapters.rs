//! Godot implementations of the pulley-core collaborator traits
//!
//! Main thread only: every adapter talks to engine singletons or live nodes.

use godot::classes::{Engine, PhysicsBody2D, PhysicsServer2D};
use godot::prelude::*;
use pulley_core::{Affine2, BodyRid, Canvas, JointRid, PhysicsServer, PulleyParam, ResolvedNode, Vec2};

use crate::bridge::{from_transform2d, to_color, to_rid, to_transform2d, to_vector2};

/// `PhysicsServer2D` with the pulley joint extension
///
/// Stock Godot has no typed pulley API, so the pulley calls go through
/// dynamic dispatch and only take effect on engine builds that register them.
pub struct GodotPhysicsServer {
    server: Gd<PhysicsServer2D>,
}

impl GodotPhysicsServer {
    pub fn singleton() -> Self {
        Self {
            server: PhysicsServer2D::singleton(),
        }
    }

    /// Create a joint handle owned by the server
    pub fn joint_create(&mut self) -> Rid {
        self.server.joint_create()
    }

    pub fn free_rid(&mut self, rid: Rid) {
        self.server.free_rid(rid);
    }
}

impl PhysicsServer for GodotPhysicsServer {
    fn joint_make_pulley(
        &mut self,
        joint: JointRid,
        anchor_a: Vec2,
        anchor_b: Vec2,
        body_a: BodyRid,
        body_b: BodyRid,
    ) {
        self.server.call(
            "joint_make_pulley",
            &[
                to_rid(joint.raw()).to_variant(),
                to_vector2(anchor_a).to_variant(),
                to_vector2(anchor_b).to_variant(),
                to_rid(body_a.raw()).to_variant(),
                to_rid(body_b.raw()).to_variant(),
            ],
        );
    }

    fn pulley_joint_set_param(&mut self, joint: JointRid, param: PulleyParam, value: f32) {
        self.server.call(
            "pulley_joint_set_param",
            &[
                to_rid(joint.raw()).to_variant(),
                (param.index() as i64).to_variant(),
                (value as f64).to_variant(),
            ],
        );
    }

    fn joint_clear(&mut self, joint: JointRid) {
        self.server.joint_clear(to_rid(joint.raw()));
    }
}

/// Scene queries answered by a live `Node2D`
pub struct NodeScene {
    node: Gd<Node2D>,
}

impl NodeScene {
    pub fn new(node: Gd<Node2D>) -> Self {
        Self { node }
    }
}

impl pulley_core::SceneTree for NodeScene {
    fn global_transform(&self) -> Affine2 {
        from_transform2d(self.node.get_global_transform())
    }

    fn resolve(&self, path: &pulley_core::NodePath) -> Option<ResolvedNode> {
        if path.is_empty() {
            return None;
        }
        let node = self.node.get_node_or_null(path.as_str())?;
        match node.try_cast::<Node2D>() {
            Ok(node_2d) => Some(ResolvedNode::Node2D {
                global_transform: from_transform2d(node_2d.get_global_transform()),
            }),
            Err(_) => Some(ResolvedNode::Other),
        }
    }

    fn resolve_body(&self, path: &pulley_core::NodePath) -> Option<BodyRid> {
        if path.is_empty() {
            return None;
        }
        let body = self.node.try_get_node_as::<PhysicsBody2D>(path.as_str())?;
        Some(BodyRid::new(body.get_rid().to_u64()))
    }

    fn is_editor_hint(&self) -> bool {
        Engine::singleton().is_editor_hint()
    }

    fn debug_collisions_hint(&self) -> bool {
        self.node
            .get_tree()
            .map(|tree| tree.is_debugging_collisions_hint())
            .unwrap_or(false)
    }
}

/// Canvas drawing into a `Node2D` during its draw callback
pub struct NodeCanvas {
    node: Gd<Node2D>,
}

impl NodeCanvas {
    pub fn new(node: Gd<Node2D>) -> Self {
        Self { node }
    }
}

impl Canvas for NodeCanvas {
    fn draw_line(&mut self, from: Vec2, to: Vec2, color: pulley_core::Color, width: f32) {
        self.node
            .draw_line_ex(to_vector2(from), to_vector2(to), to_color(color))
            .width(width)
            .done();
    }

    fn set_transform(&mut self, transform: Affine2) {
        self.node.draw_set_transform_matrix(to_transform2d(transform));
    }
}
