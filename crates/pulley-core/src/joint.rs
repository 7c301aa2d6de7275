//! The pulley joint node
//!
//! `PulleyJoint` holds the editable parameters, tracks whether a server-side
//! constraint has been made, and reacts to lifecycle notifications from its
//! host:
//!
//! - `enter_tree` / `exit_tree` bracket the node's time in an active scene
//! - `configure` makes the constraint on the server once both bodies are known
//! - `process` runs once per frame and follows the secondary anchor
//! - `draw` emits debug gizmos when the scene asks for them
//!
//! Setters cache the value, request a redraw and, while configured, push the
//! change to the server immediately.

use crate::config::{self, PulleyConfig};
use crate::draw::{ArmGizmo, Canvas};
use crate::error::{Error, Result};
use crate::identity::{BodyRid, JointRid, NodePath};
use crate::property::{PropertyList, PropertyValue};
use crate::scene::{ResolvedNode, SceneTree};
use crate::server::{PhysicsServer, PulleyParam};
use glam::{Affine2, Vec2};
use tracing::{debug, trace};

/// Server-side constraint the joint currently refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfiguredJoint {
    pub joint: JointRid,
    pub body_a: BodyRid,
    pub body_b: BodyRid,
}

/// Whether a server-side constraint exists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JointState {
    /// No constraint; setters only cache values
    #[default]
    Unconfigured,
    /// Constraint made; setters also push live updates
    Configured(ConfiguredJoint),
}

/// World-space anchors of the two pulley arms
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PulleyAnchors {
    pub a: Vec2,
    pub b: Vec2,
}

impl PulleyAnchors {
    /// Anchor A is the node origin, anchor B sits `length_a` down local Y
    pub fn from_transform(global: &Affine2, length_a: f32) -> Self {
        Self {
            a: global.translation,
            b: global.transform_point2(Vec2::new(0.0, length_a)),
        }
    }
}

/// A 2D pulley joint between two physics bodies
pub struct PulleyJoint<S: PhysicsServer> {
    server: S,
    length_a: f32,
    length_b: f32,
    rest_length: f32,
    stiffness: f32,
    damping: f32,
    other_anchor: NodePath,
    /// Bodies looked up by `configure_bodies`
    node_a: NodePath,
    node_b: NodePath,
    /// Server handle to make the pulley on when bodies are looked up by path
    handle: Option<JointRid>,
    /// Last observed transform of the secondary anchor, relative to this node
    other_transform: Affine2,
    state: JointState,
    inside_tree: bool,
    processing: bool,
    redraw_requested: bool,
}

impl<S: PhysicsServer> PulleyJoint<S> {
    /// Create a joint with default parameters
    pub fn new(server: S) -> Self {
        Self::with_config(server, PulleyConfig::default())
    }

    /// Create a joint from a configuration
    pub fn with_config(server: S, config: PulleyConfig) -> Self {
        Self {
            server,
            length_a: config.length_a,
            length_b: config.length_b,
            rest_length: config.rest_length,
            stiffness: config.stiffness,
            damping: config.damping,
            other_anchor: config.other_anchor,
            node_a: NodePath::default(),
            node_b: NodePath::default(),
            handle: None,
            other_transform: Affine2::IDENTITY,
            state: JointState::Unconfigured,
            inside_tree: false,
            processing: false,
            redraw_requested: false,
        }
    }

    /// Snapshot of the editable parameters
    pub fn config(&self) -> PulleyConfig {
        PulleyConfig {
            length_a: self.length_a,
            length_b: self.length_b,
            rest_length: self.rest_length,
            stiffness: self.stiffness,
            damping: self.damping,
            other_anchor: self.other_anchor.clone(),
        }
    }

    /// Apply every parameter of `config` through the regular setters
    pub fn apply_config(&mut self, scene: &impl SceneTree, config: PulleyConfig) {
        self.set_length_a(config.length_a);
        self.set_length_b(config.length_b);
        self.set_rest_length(config.rest_length);
        self.set_stiffness(config.stiffness);
        self.set_damping(config.damping);
        self.set_other_anchor(scene, config.other_anchor);
    }

    pub fn server(&self) -> &S {
        &self.server
    }

    pub fn server_mut(&mut self) -> &mut S {
        &mut self.server
    }

    pub fn state(&self) -> JointState {
        self.state
    }

    pub fn is_configured(&self) -> bool {
        matches!(self.state, JointState::Configured(_))
    }

    /// Server handle used by `configure_bodies`
    pub fn handle(&self) -> Option<JointRid> {
        self.handle
    }

    pub fn set_handle(&mut self, joint: JointRid) {
        self.handle = Some(joint);
    }

    /// Handle of the server-side joint, while configured
    pub fn joint_rid(&self) -> Option<JointRid> {
        match self.state {
            JointState::Configured(configured) => Some(configured.joint),
            JointState::Unconfigured => None,
        }
    }

    // === Lifecycle ===

    /// The node entered an active scene; per-frame updates start
    pub fn enter_tree(&mut self) {
        self.inside_tree = true;
        self.processing = true;
        self.queue_redraw();
    }

    /// The node left the scene; any server-side constraint is cleared
    pub fn exit_tree(&mut self) {
        self.clear();
        self.processing = false;
        self.inside_tree = false;
    }

    pub fn is_inside_tree(&self) -> bool {
        self.inside_tree
    }

    /// Whether the per-frame update is subscribed
    pub fn is_processing(&self) -> bool {
        self.processing
    }

    /// Make the pulley constraint on the server
    ///
    /// Anchor A is this node's global origin, anchor B is `length_a` along
    /// the node's local Y axis. Rest length is only sent when nonzero.
    pub fn configure(
        &mut self,
        scene: &impl SceneTree,
        joint: JointRid,
        body_a: BodyRid,
        body_b: BodyRid,
    ) -> PulleyAnchors {
        let anchors = self.anchors(&scene.global_transform());

        self.server
            .joint_make_pulley(joint, anchors.a, anchors.b, body_a, body_b);
        if self.rest_length != 0.0 {
            self.server
                .pulley_joint_set_param(joint, PulleyParam::RestLength, self.rest_length);
        }
        self.server
            .pulley_joint_set_param(joint, PulleyParam::Stiffness, self.stiffness);
        self.server
            .pulley_joint_set_param(joint, PulleyParam::Damping, self.damping);

        self.state = JointState::Configured(ConfiguredJoint {
            joint,
            body_a,
            body_b,
        });
        self.handle = Some(joint);
        debug!(
            joint = %joint,
            %body_a,
            %body_b,
            anchor_a = ?anchors.a,
            anchor_b = ?anchors.b,
            "configured pulley joint"
        );
        anchors
    }

    /// Look up `node_a` / `node_b` and make the pulley between them
    ///
    /// Needs the node inside the tree and a handle. An existing constraint is
    /// cleared first. Returns false, leaving the joint unconfigured, when
    /// either path does not name a physics body.
    pub fn configure_bodies(&mut self, scene: &impl SceneTree) -> bool {
        if !self.inside_tree {
            return false;
        }
        let Some(joint) = self.handle else {
            return false;
        };
        self.clear();

        let (Some(body_a), Some(body_b)) = (
            resolve_body(scene, &self.node_a),
            resolve_body(scene, &self.node_b),
        ) else {
            debug!(node_a = %self.node_a, node_b = %self.node_b, "pulley bodies not found");
            return false;
        };
        self.configure(scene, joint, body_a, body_b);
        true
    }

    /// World-space anchors for a node at `global`
    pub fn anchors(&self, global: &Affine2) -> PulleyAnchors {
        PulleyAnchors::from_transform(global, self.length_a)
    }

    /// Per-frame update
    ///
    /// Follows the secondary anchor and requests a redraw when its transform
    /// relative to this node changed. Returns whether a redraw was requested.
    pub fn process(&mut self, scene: &impl SceneTree) -> bool {
        if !self.processing {
            return false;
        }
        let Some(other_global) = self
            .resolve_other(scene)
            .and_then(|node| node.global_transform())
        else {
            return false;
        };

        let candidate = scene.global_transform().inverse() * other_global;
        if candidate == self.other_transform {
            return false;
        }
        trace!(anchor = %self.other_anchor, "secondary anchor moved");
        self.other_transform = candidate;
        self.queue_redraw();
        true
    }

    /// Emit debug gizmos
    ///
    /// Draws nothing outside the tree or when the scene has debug drawing
    /// disabled. Returns the number of segments drawn.
    pub fn draw(&self, scene: &impl SceneTree, canvas: &mut impl Canvas) -> usize {
        if !self.inside_tree || !scene.debug_draw_enabled() {
            return 0;
        }

        let mut drawn = ArmGizmo::draw(&mut *canvas, self.length_a);
        if self.resolve_other(scene).is_some() {
            canvas.set_transform(self.other_transform);
            drawn += ArmGizmo::draw(&mut *canvas, self.length_b);
        }
        drawn
    }

    /// Transform of the secondary anchor relative to this node, as last seen
    pub fn other_transform(&self) -> Affine2 {
        self.other_transform
    }

    /// Drain the pending redraw request
    pub fn take_redraw_request(&mut self) -> bool {
        std::mem::take(&mut self.redraw_requested)
    }

    pub fn is_redraw_requested(&self) -> bool {
        self.redraw_requested
    }

    // === Properties ===

    pub fn length_a(&self) -> f32 {
        self.length_a
    }

    pub fn set_length_a(&mut self, length: f32) {
        self.length_a = length;
        self.queue_redraw();
    }

    pub fn length_b(&self) -> f32 {
        self.length_b
    }

    /// Drawing only; the server has no second length
    pub fn set_length_b(&mut self, length: f32) {
        self.length_b = length;
        self.queue_redraw();
    }

    pub fn rest_length(&self) -> f32 {
        self.rest_length
    }

    /// Zero is forwarded to a configured joint as `length_a`
    pub fn set_rest_length(&mut self, rest_length: f32) {
        self.rest_length = rest_length;
        self.queue_redraw();
        let value = config::effective_rest_length(rest_length, self.length_a);
        self.push_param(PulleyParam::RestLength, value);
    }

    pub fn stiffness(&self) -> f32 {
        self.stiffness
    }

    pub fn set_stiffness(&mut self, stiffness: f32) {
        self.stiffness = stiffness;
        self.queue_redraw();
        self.push_param(PulleyParam::Stiffness, stiffness);
    }

    pub fn damping(&self) -> f32 {
        self.damping
    }

    pub fn set_damping(&mut self, damping: f32) {
        self.damping = damping;
        self.queue_redraw();
        self.push_param(PulleyParam::Damping, damping);
    }

    pub fn other_anchor(&self) -> &NodePath {
        &self.other_anchor
    }

    /// Point the secondary arm at another node
    ///
    /// Setting the current path again does nothing. Otherwise a joint inside
    /// the tree is cleared and made again.
    /// Returns whether the path changed.
    pub fn set_other_anchor(&mut self, scene: &impl SceneTree, path: impl Into<NodePath>) -> bool {
        let path = path.into();
        if self.other_anchor == path {
            return false;
        }
        self.other_anchor = path;
        self.queue_redraw();
        self.update_joint(scene);
        true
    }

    pub fn node_a(&self) -> &NodePath {
        &self.node_a
    }

    /// Change the first body; a joint inside the tree is made again
    pub fn set_node_a(&mut self, scene: &impl SceneTree, path: impl Into<NodePath>) -> bool {
        let path = path.into();
        if self.node_a == path {
            return false;
        }
        self.node_a = path;
        self.update_joint(scene);
        true
    }

    pub fn node_b(&self) -> &NodePath {
        &self.node_b
    }

    /// Change the second body; a joint inside the tree is made again
    pub fn set_node_b(&mut self, scene: &impl SceneTree, path: impl Into<NodePath>) -> bool {
        let path = path.into();
        if self.node_b == path {
            return false;
        }
        self.node_b = path;
        self.update_joint(scene);
        true
    }

    /// Editable properties and their hints
    pub fn property_list(&self) -> PropertyList {
        PropertyList::pulley()
    }

    /// Read a property by name
    pub fn get(&self, name: &str) -> Result<PropertyValue> {
        let value = match name {
            "length_a" => PropertyValue::Float(self.length_a),
            "length_b" => PropertyValue::Float(self.length_b),
            "rest_length" => PropertyValue::Float(self.rest_length),
            "stiffness" => PropertyValue::Float(self.stiffness),
            "damping" => PropertyValue::Float(self.damping),
            "other_anchor" => PropertyValue::NodePath(self.other_anchor.clone()),
            _ => return Err(Error::UnknownProperty(name.to_string())),
        };
        Ok(value)
    }

    /// Write a property by name through its typed setter
    pub fn set(&mut self, scene: &impl SceneTree, name: &str, value: PropertyValue) -> Result<()> {
        let expected = self
            .property_list()
            .get(name)
            .map(|info| info.kind)
            .ok_or_else(|| Error::UnknownProperty(name.to_string()))?;
        if value.kind() != expected {
            return Err(Error::TypeMismatch {
                property: name.to_string(),
                expected: expected.as_str(),
                got: value.kind().as_str(),
            });
        }

        match (name, value) {
            ("other_anchor", PropertyValue::NodePath(path)) => {
                self.set_other_anchor(scene, path);
            }
            ("length_a", PropertyValue::Float(v)) => self.set_length_a(v),
            ("length_b", PropertyValue::Float(v)) => self.set_length_b(v),
            ("rest_length", PropertyValue::Float(v)) => self.set_rest_length(v),
            ("stiffness", PropertyValue::Float(v)) => self.set_stiffness(v),
            ("damping", PropertyValue::Float(v)) => self.set_damping(v),
            _ => return Err(Error::UnknownProperty(name.to_string())),
        }
        Ok(())
    }

    // === Helpers ===

    fn queue_redraw(&mut self) {
        self.redraw_requested = true;
    }

    fn push_param(&mut self, param: PulleyParam, value: f32) {
        if let JointState::Configured(configured) = self.state {
            self.server
                .pulley_joint_set_param(configured.joint, param, value);
        }
    }

    fn resolve_other(&self, scene: &impl SceneTree) -> Option<ResolvedNode> {
        if self.other_anchor.is_empty() {
            return None;
        }
        scene.resolve(&self.other_anchor)
    }

    fn clear(&mut self) -> Option<ConfiguredJoint> {
        let JointState::Configured(configured) = self.state else {
            return None;
        };
        self.server.joint_clear(configured.joint);
        self.state = JointState::Unconfigured;
        debug!(joint = %configured.joint, "cleared pulley joint");
        Some(configured)
    }

    /// Clear and make the constraint again from the current paths
    ///
    /// Without body paths the bodies last passed to `configure` are reused.
    fn update_joint(&mut self, scene: &impl SceneTree) {
        if !self.inside_tree {
            return;
        }
        if !self.node_a.is_empty() || !self.node_b.is_empty() {
            self.configure_bodies(scene);
            return;
        }
        if let Some(configured) = self.clear() {
            debug!(joint = %configured.joint, anchor = %self.other_anchor, "reconfiguring pulley joint");
            self.configure(scene, configured.joint, configured.body_a, configured.body_b);
        }
    }
}

fn resolve_body(scene: &impl SceneTree, path: &NodePath) -> Option<BodyRid> {
    if path.is_empty() {
        return None;
    }
    scene.resolve_body(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::RecordingCanvas;
    use crate::scene::StaticScene;
    use crate::server::{RecordingServer, ServerCall};
    use std::f32::consts::FRAC_PI_2;

    const JOINT: JointRid = JointRid(11);
    const BODY_A: BodyRid = BodyRid(21);
    const BODY_B: BodyRid = BodyRid(22);

    fn active_joint() -> PulleyJoint<RecordingServer> {
        let mut joint = PulleyJoint::new(RecordingServer::new());
        joint.enter_tree();
        joint.take_redraw_request();
        joint
    }

    fn configured_joint(scene: &StaticScene) -> PulleyJoint<RecordingServer> {
        let mut joint = active_joint();
        joint.configure(scene, JOINT, BODY_A, BODY_B);
        joint.server_mut().reset();
        joint.take_redraw_request();
        joint
    }

    fn approx(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn test_defaults() {
        let joint = PulleyJoint::new(RecordingServer::new());
        assert_eq!(joint.config(), PulleyConfig::default());
        assert_eq!(joint.state(), JointState::Unconfigured);
        assert!(!joint.is_processing());
        assert_eq!(joint.other_transform(), Affine2::IDENTITY);
    }

    #[test]
    fn test_enter_tree_enables_processing() {
        let mut joint = PulleyJoint::new(RecordingServer::new());
        joint.enter_tree();
        assert!(joint.is_inside_tree());
        assert!(joint.is_processing());
        assert!(joint.take_redraw_request());
        assert!(!joint.take_redraw_request());
    }

    #[test]
    fn test_configure_anchors_from_transform() {
        let global =
            Affine2::from_angle_translation(FRAC_PI_2, Vec2::new(100.0, 50.0));
        let scene = StaticScene::new(global);
        let mut joint = active_joint();
        joint.set_length_a(30.0);

        let anchors = joint.configure(&scene, JOINT, BODY_A, BODY_B);

        assert_eq!(anchors.a, Vec2::new(100.0, 50.0));
        // Rotating (0, 30) by a quarter turn points it along -X
        assert!(approx(anchors.b, Vec2::new(70.0, 50.0)));
        assert!(approx(anchors.b, global.transform_point2(Vec2::new(0.0, 30.0))));

        let ServerCall::MakePulley { joint: rid, anchor_a, anchor_b, body_a, body_b } =
            joint.server().calls()[0].clone()
        else {
            panic!("first call should make the pulley");
        };
        assert_eq!(rid, JOINT);
        assert_eq!(anchor_a, anchors.a);
        assert_eq!(anchor_b, anchors.b);
        assert_eq!((body_a, body_b), (BODY_A, BODY_B));
        assert_eq!(joint.joint_rid(), Some(JOINT));
    }

    #[test]
    fn test_configure_skips_zero_rest_length() {
        let scene = StaticScene::default();
        let mut joint = active_joint();
        joint.configure(&scene, JOINT, BODY_A, BODY_B);

        let server = joint.server();
        assert_eq!(server.calls().len(), 3);
        assert!(server.param_values(PulleyParam::RestLength).is_empty());
        assert_eq!(server.last_param(PulleyParam::Stiffness), Some(20.0));
        assert_eq!(server.last_param(PulleyParam::Damping), Some(1.0));
    }

    #[test]
    fn test_configure_sends_nonzero_rest_length_first() {
        let scene = StaticScene::default();
        let config = PulleyConfig::default().with_rest_length(75.0);
        let mut joint = PulleyJoint::with_config(RecordingServer::new(), config);
        joint.enter_tree();
        joint.configure(&scene, JOINT, BODY_A, BODY_B);

        let calls = joint.server().calls();
        assert_eq!(calls.len(), 4);
        assert_eq!(
            calls[1],
            ServerCall::SetParam { joint: JOINT, param: PulleyParam::RestLength, value: 75.0 }
        );
    }

    #[test]
    fn test_setters_only_cache_while_unconfigured() {
        let mut joint = active_joint();
        joint.set_stiffness(3.0);
        joint.set_damping(0.2);
        joint.set_rest_length(10.0);

        assert!(joint.server().calls().is_empty());
        assert_eq!(joint.stiffness(), 3.0);
        assert_eq!(joint.damping(), 0.2);
        assert_eq!(joint.rest_length(), 10.0);
        assert!(joint.take_redraw_request());
    }

    #[test]
    fn test_setters_push_while_configured() {
        let scene = StaticScene::default();
        let mut joint = configured_joint(&scene);

        joint.set_stiffness(6.0);
        joint.set_damping(0.5);

        let server = joint.server();
        assert_eq!(server.last_param(PulleyParam::Stiffness), Some(6.0));
        assert_eq!(server.last_param(PulleyParam::Damping), Some(0.5));
    }

    #[test]
    fn test_rest_length_setter_falls_back_to_length_a() {
        let scene = StaticScene::default();
        let mut joint = configured_joint(&scene);
        joint.set_length_a(42.0);

        joint.set_rest_length(0.0);
        assert_eq!(joint.server().last_param(PulleyParam::RestLength), Some(42.0));

        joint.set_rest_length(60.0);
        assert_eq!(joint.server().last_param(PulleyParam::RestLength), Some(60.0));
        assert_eq!(joint.rest_length(), 60.0);
    }

    #[test]
    fn test_lengths_are_not_pushed() {
        let scene = StaticScene::default();
        let mut joint = configured_joint(&scene);

        joint.set_length_a(12.0);
        joint.set_length_b(13.0);

        assert!(joint.server().calls().is_empty());
        assert!(joint.take_redraw_request());
    }

    #[test]
    fn test_other_anchor_idempotent() {
        let scene = StaticScene::default().with_node_2d("Weight", Affine2::IDENTITY);
        let mut joint = configured_joint(&scene);

        assert!(joint.set_other_anchor(&scene, "Weight"));
        assert!(!joint.set_other_anchor(&scene, "Weight"));

        let server = joint.server();
        assert_eq!(server.make_pulley_count(), 1);
        assert_eq!(server.calls()[0], ServerCall::Clear { joint: JOINT });
        assert_eq!(joint.state(), JointState::Configured(ConfiguredJoint {
            joint: JOINT,
            body_a: BODY_A,
            body_b: BODY_B,
        }));
    }

    #[test]
    fn test_other_anchor_while_unconfigured_only_stores() {
        let scene = StaticScene::default();
        let mut joint = active_joint();

        assert!(joint.set_other_anchor(&scene, "Weight"));
        assert_eq!(joint.other_anchor(), &NodePath::from("Weight"));
        assert!(joint.server().calls().is_empty());
    }

    #[test]
    fn test_reconfigure_uses_current_transform() {
        let mut scene = StaticScene::default();
        let mut joint = configured_joint(&scene);

        scene.set_global_transform(Affine2::from_translation(Vec2::new(0.0, 200.0)));
        joint.set_other_anchor(&scene, "Weight");

        let make = joint
            .server()
            .calls()
            .iter()
            .find_map(|call| match call {
                ServerCall::MakePulley { anchor_a, .. } => Some(*anchor_a),
                _ => None,
            });
        assert_eq!(make, Some(Vec2::new(0.0, 200.0)));
    }

    fn body_joint() -> PulleyJoint<RecordingServer> {
        let mut joint = active_joint();
        joint.set_handle(JOINT);
        joint
    }

    #[test]
    fn test_configure_bodies_resolves_paths() {
        let scene = StaticScene::default()
            .with_body("Left", BODY_A)
            .with_body("Right", BODY_B);
        let mut joint = body_joint();
        joint.set_node_a(&scene, "Left");
        joint.set_node_b(&scene, "Right");
        assert!(!joint.is_configured());

        assert!(joint.configure_bodies(&scene));
        assert_eq!(joint.state(), JointState::Configured(ConfiguredJoint {
            joint: JOINT,
            body_a: BODY_A,
            body_b: BODY_B,
        }));
    }

    #[test]
    fn test_configure_bodies_missing_body() {
        let scene = StaticScene::default()
            .with_body("Left", BODY_A)
            .with_node_2d("Marker", Affine2::IDENTITY);
        let mut joint = body_joint();
        joint.set_node_a(&scene, "Left");
        joint.set_node_b(&scene, "Marker");

        assert!(!joint.configure_bodies(&scene));
        assert!(joint.server().calls().is_empty());
        assert!(!joint.is_configured());
    }

    #[test]
    fn test_configure_bodies_needs_tree_and_handle() {
        let scene = StaticScene::default()
            .with_body("Left", BODY_A)
            .with_body("Right", BODY_B);

        let mut joint = active_joint();
        joint.set_node_a(&scene, "Left");
        joint.set_node_b(&scene, "Right");
        assert!(!joint.configure_bodies(&scene));

        let mut joint = PulleyJoint::new(RecordingServer::new());
        joint.set_handle(JOINT);
        joint.set_node_a(&scene, "Left");
        joint.set_node_b(&scene, "Right");
        assert!(!joint.configure_bodies(&scene));
        assert!(joint.server().calls().is_empty());
    }

    #[test]
    fn test_other_anchor_configures_once_bodies_appear() {
        let mut scene = StaticScene::default();
        let mut joint = body_joint();
        joint.set_node_a(&scene, "Left");
        joint.set_node_b(&scene, "Right");
        assert!(!joint.configure_bodies(&scene));

        scene.add_body("Left", BODY_A);
        scene.add_body("Right", BODY_B);
        joint.set_other_anchor(&scene, "Weight");

        assert!(joint.is_configured());
        assert_eq!(joint.server().make_pulley_count(), 1);
    }

    #[test]
    fn test_body_path_change_looks_up_new_body() {
        let other = BodyRid(23);
        let scene = StaticScene::default()
            .with_body("Left", BODY_A)
            .with_body("Right", BODY_B)
            .with_body("Spare", other);
        let mut joint = body_joint();
        joint.set_node_a(&scene, "Left");
        joint.set_node_b(&scene, "Right");
        joint.configure_bodies(&scene);
        joint.server_mut().reset();

        assert!(joint.set_node_b(&scene, "Spare"));
        assert!(!joint.set_node_b(&scene, "Spare"));

        let calls = joint.server().calls();
        assert_eq!(calls[0], ServerCall::Clear { joint: JOINT });
        assert!(matches!(
            calls[1],
            ServerCall::MakePulley { body_a: BODY_A, body_b, .. } if body_b == other
        ));
        assert_eq!(joint.server().make_pulley_count(), 1);
    }

    #[test]
    fn test_body_path_change_to_missing_body_clears() {
        let scene = StaticScene::default()
            .with_body("Left", BODY_A)
            .with_body("Right", BODY_B);
        let mut joint = body_joint();
        joint.set_node_a(&scene, "Left");
        joint.set_node_b(&scene, "Right");
        joint.configure_bodies(&scene);
        joint.server_mut().reset();

        joint.set_node_a(&scene, "Gone");

        assert_eq!(joint.server().calls(), &[ServerCall::Clear { joint: JOINT }]);
        assert!(!joint.is_configured());
    }

    #[test]
    fn test_exit_tree_clears_joint() {
        let scene = StaticScene::default();
        let mut joint = configured_joint(&scene);

        joint.exit_tree();

        assert_eq!(joint.server().calls(), &[ServerCall::Clear { joint: JOINT }]);
        assert_eq!(joint.state(), JointState::Unconfigured);
        assert!(!joint.is_processing());

        joint.set_stiffness(9.0);
        assert_eq!(joint.server().calls().len(), 1);
    }

    #[test]
    fn test_process_unresolved_anchor_is_noop() {
        let scene = StaticScene::default();
        let mut joint = active_joint();
        joint.set_other_anchor(&scene, "Missing");
        joint.take_redraw_request();

        assert!(!joint.process(&scene));
        assert_eq!(joint.other_transform(), Affine2::IDENTITY);
        assert!(!joint.take_redraw_request());
    }

    #[test]
    fn test_process_ignores_nodes_without_transform() {
        let scene = StaticScene::default().with_plain_node("Timer");
        let mut joint = active_joint();
        joint.set_other_anchor(&scene, "Timer");
        joint.take_redraw_request();

        assert!(!joint.process(&scene));
        assert!(!joint.take_redraw_request());
    }

    #[test]
    fn test_process_tracks_relative_transform() {
        let joint_at = Affine2::from_translation(Vec2::new(10.0, 10.0));
        let mut scene = StaticScene::new(joint_at)
            .with_node_2d("Weight", Affine2::from_translation(Vec2::new(40.0, 10.0)));
        let mut joint = active_joint();
        joint.set_other_anchor(&scene, "Weight");
        joint.take_redraw_request();

        assert!(joint.process(&scene));
        assert_eq!(
            joint.other_transform(),
            Affine2::from_translation(Vec2::new(30.0, 0.0))
        );
        assert!(joint.take_redraw_request());

        // Unchanged
        assert!(!joint.process(&scene));
        assert!(!joint.take_redraw_request());

        scene.set_node_transform("Weight", Affine2::from_translation(Vec2::new(40.0, 25.0)));
        assert!(joint.process(&scene));
        assert_eq!(
            joint.other_transform(),
            Affine2::from_translation(Vec2::new(30.0, 15.0))
        );
    }

    #[test]
    fn test_process_requires_tree() {
        let scene = StaticScene::default()
            .with_node_2d("Weight", Affine2::from_translation(Vec2::new(1.0, 0.0)));
        let mut joint = PulleyJoint::new(RecordingServer::new());
        joint.set_other_anchor(&scene, "Weight");

        assert!(!joint.process(&scene));
        assert_eq!(joint.other_transform(), Affine2::IDENTITY);
    }

    #[test]
    fn test_draw_primary_arm_only() {
        let scene = StaticScene::default().with_debug_collisions(true);
        let joint = active_joint();
        let mut canvas = RecordingCanvas::new();

        assert_eq!(joint.draw(&scene, &mut canvas), 3);
        assert_eq!(canvas.lines().len(), 3);
        assert_eq!(canvas.lines()[2].segment.to, Vec2::new(0.0, 50.0));
    }

    #[test]
    fn test_draw_both_arms() {
        let other = Affine2::from_translation(Vec2::new(80.0, 0.0));
        let scene = StaticScene::default()
            .with_editor_hint(true)
            .with_node_2d("Weight", other);
        let mut joint = active_joint();
        joint.set_length_b(20.0);
        joint.set_other_anchor(&scene, "Weight");
        joint.process(&scene);

        let mut canvas = RecordingCanvas::new();
        assert_eq!(joint.draw(&scene, &mut canvas), 6);

        let lines = canvas.lines();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0].transform, Affine2::IDENTITY);
        assert_eq!(lines[3].transform, other);
        assert_eq!(canvas.transformed_segments()[5].to, Vec2::new(80.0, 20.0));
    }

    #[test]
    fn test_draw_plain_node_anchor() {
        let scene = StaticScene::default()
            .with_debug_collisions(true)
            .with_plain_node("Timer");
        let mut joint = active_joint();
        joint.set_other_anchor(&scene, "Timer");
        joint.process(&scene);

        let mut canvas = RecordingCanvas::new();
        assert_eq!(joint.draw(&scene, &mut canvas), 6);
        assert_eq!(canvas.lines()[3].transform, Affine2::IDENTITY);
    }

    #[test]
    fn test_draw_disabled_without_debug_flags() {
        let scene = StaticScene::default();
        let joint = active_joint();
        let mut canvas = RecordingCanvas::new();

        assert_eq!(joint.draw(&scene, &mut canvas), 0);
        assert!(canvas.lines().is_empty());
    }

    #[test]
    fn test_draw_outside_tree() {
        let scene = StaticScene::default().with_editor_hint(true);
        let joint = PulleyJoint::new(RecordingServer::new());
        let mut canvas = RecordingCanvas::new();

        assert_eq!(joint.draw(&scene, &mut canvas), 0);
    }

    #[test]
    fn test_reflection_roundtrip() {
        let scene = StaticScene::default();
        let mut joint = active_joint();

        joint.set(&scene, "stiffness", PropertyValue::Float(2.5)).unwrap();
        joint
            .set(&scene, "other_anchor", PropertyValue::NodePath(NodePath::from("B")))
            .unwrap();

        assert_eq!(joint.get("stiffness").unwrap(), PropertyValue::Float(2.5));
        assert_eq!(
            joint.get("other_anchor").unwrap(),
            PropertyValue::NodePath(NodePath::from("B"))
        );
    }

    #[test]
    fn test_reflection_errors() {
        let scene = StaticScene::default();
        let mut joint = active_joint();

        assert_eq!(
            joint.get("bias"),
            Err(Error::UnknownProperty("bias".to_string()))
        );
        assert_eq!(
            joint.set(&scene, "damping", PropertyValue::NodePath(NodePath::from("x"))),
            Err(Error::TypeMismatch {
                property: "damping".to_string(),
                expected: "float",
                got: "node_path",
            })
        );
        assert_eq!(joint.damping(), 1.0);
    }

    #[test]
    fn test_reflection_accepts_out_of_range() {
        let scene = StaticScene::default();
        let mut joint = active_joint();

        joint.set(&scene, "stiffness", PropertyValue::Float(500.0)).unwrap();
        assert_eq!(joint.stiffness(), 500.0);
    }

    #[test]
    fn test_apply_config_pushes_live() {
        let scene = StaticScene::default();
        let mut joint = configured_joint(&scene);
        let config = PulleyConfig::default()
            .with_lengths(90.0, 40.0)
            .with_stiffness(12.0)
            .with_damping(0.3);

        joint.apply_config(&scene, config.clone());

        assert_eq!(joint.config(), config);
        let server = joint.server();
        assert_eq!(server.last_param(PulleyParam::RestLength), Some(90.0));
        assert_eq!(server.last_param(PulleyParam::Stiffness), Some(12.0));
        assert_eq!(server.last_param(PulleyParam::Damping), Some(0.3));
        assert_eq!(server.make_pulley_count(), 0);
    }
}
