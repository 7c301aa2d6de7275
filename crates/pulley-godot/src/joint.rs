//! PulleyJoint2D node class for Godot integration

use godot::classes::{INode2D, Node2D, ProjectSettings};
use godot::prelude::*;
use pulley_core::{JointRid, PresetId, PulleyJoint};
use pulley_script::Loader;
use std::path::PathBuf;

use crate::adapters::{GodotPhysicsServer, NodeCanvas, NodeScene};
use crate::bridge::{from_transform2d, property_to_variant, to_vector2, variant_to_property};

/// A 2D pulley joint between the bodies at `node_a` and `node_b`
///
/// The exported fields mirror the core joint for the inspector and scene
/// files; every write goes through the core joint first.
#[derive(GodotClass)]
#[class(base=Node2D)]
pub struct PulleyJoint2D {
    base: Base<Node2D>,
    /// Joint state and parameters
    joint: PulleyJoint<GodotPhysicsServer>,
    /// Server-side joint handle, owned for the node's lifetime
    rid: Rid,
    /// First body attached to the pulley
    #[var(get = get_node_a, set = set_node_a)]
    #[export(node_path = ["PhysicsBody2D"])]
    node_a: NodePath,
    /// Second body attached to the pulley
    #[var(get = get_node_b, set = set_node_b)]
    #[export(node_path = ["PhysicsBody2D"])]
    node_b: NodePath,
    #[var(get = get_other_anchor, set = set_other_anchor)]
    #[export(node_path = ["Node2D"])]
    other_anchor: NodePath,
    #[var(get = get_length_a, set = set_length_a)]
    #[export(range = (1.0, 65535.0, 1.0, exp, suffix = "px"))]
    length_a: f32,
    #[var(get = get_length_b, set = set_length_b)]
    #[export(range = (1.0, 65535.0, 1.0, exp, suffix = "px"))]
    length_b: f32,
    #[var(get = get_rest_length, set = set_rest_length)]
    #[export(range = (0.0, 65535.0, 1.0, exp, suffix = "px"))]
    rest_length: f32,
    #[var(get = get_stiffness, set = set_stiffness)]
    #[export(range = (0.1, 64.0, 0.1, exp))]
    stiffness: f32,
    #[var(get = get_damping, set = set_damping)]
    #[export(range = (0.01, 16.0, 0.01, exp))]
    damping: f32,
}

#[godot_api]
impl INode2D for PulleyJoint2D {
    fn init(base: Base<Node2D>) -> Self {
        let mut server = GodotPhysicsServer::singleton();
        let rid = server.joint_create();
        let mut joint = PulleyJoint::new(server);
        joint.set_handle(JointRid::new(rid.to_u64()));

        let mut node = Self {
            base,
            joint,
            rid,
            node_a: NodePath::default(),
            node_b: NodePath::default(),
            other_anchor: NodePath::default(),
            length_a: 0.0,
            length_b: 0.0,
            rest_length: 0.0,
            stiffness: 0.0,
            damping: 0.0,
        };
        node.sync_exports();
        node
    }

    fn enter_tree(&mut self) {
        self.joint.enter_tree();
        let processing = self.joint.is_processing();
        self.base_mut().set_process(processing);
        // Sibling bodies may not be inside the tree yet
        self.base_mut().call_deferred("configure_bodies", &[]);
        self.flush_redraw();
    }

    fn exit_tree(&mut self) {
        self.joint.exit_tree();
        self.base_mut().set_process(false);
    }

    fn process(&mut self, _delta: f64) {
        let scene = self.scene();
        self.joint.process(&scene);
        self.flush_redraw();
    }

    fn draw(&mut self) {
        let scene = self.scene();
        let mut canvas = NodeCanvas::new(self.base().clone());
        self.joint.draw(&scene, &mut canvas);
    }
}

#[godot_api]
impl PulleyJoint2D {
    // === Joint ===

    /// Resolve `node_a` / `node_b` and make the pulley on the physics server
    #[func]
    fn configure_bodies(&mut self) -> bool {
        if !self.base().is_inside_tree() {
            return false;
        }
        let scene = self.scene();
        if !self.joint.configure_bodies(&scene) {
            godot_warn!(
                "PulleyJoint2D: bodies not found (node_a: {}, node_b: {})",
                self.node_a,
                self.node_b
            );
            return false;
        }
        true
    }

    /// Whether the pulley currently exists on the physics server
    #[func]
    fn is_configured(&self) -> bool {
        self.joint.is_configured()
    }

    /// World-space anchors as they would be sent to the server
    #[func]
    fn get_anchors(&self) -> PackedVector2Array {
        let global = from_transform2d(self.base().get_global_transform());
        let anchors = self.joint.anchors(&global);
        PackedVector2Array::from(&[to_vector2(anchors.a), to_vector2(anchors.b)][..])
    }

    /// Transform of `other_anchor` relative to this node, as last observed
    #[func]
    fn get_other_offset(&self) -> Vector2 {
        to_vector2(self.joint.other_transform().translation)
    }

    // === Properties ===

    #[func]
    fn set_node_a(&mut self, path: NodePath) {
        let scene = self.scene();
        self.joint.set_node_a(&scene, path.to_string());
        self.node_a = path;
    }

    #[func]
    fn get_node_a(&self) -> NodePath {
        self.node_a.clone()
    }

    #[func]
    fn set_node_b(&mut self, path: NodePath) {
        let scene = self.scene();
        self.joint.set_node_b(&scene, path.to_string());
        self.node_b = path;
    }

    #[func]
    fn get_node_b(&self) -> NodePath {
        self.node_b.clone()
    }

    #[func]
    fn set_length_a(&mut self, length: f32) {
        self.joint.set_length_a(length);
        self.length_a = length;
        self.flush_redraw();
    }

    #[func]
    fn get_length_a(&self) -> f32 {
        self.length_a
    }

    #[func]
    fn set_length_b(&mut self, length: f32) {
        self.joint.set_length_b(length);
        self.length_b = length;
        self.flush_redraw();
    }

    #[func]
    fn get_length_b(&self) -> f32 {
        self.length_b
    }

    #[func]
    fn set_rest_length(&mut self, rest_length: f32) {
        self.joint.set_rest_length(rest_length);
        self.rest_length = rest_length;
        self.flush_redraw();
    }

    #[func]
    fn get_rest_length(&self) -> f32 {
        self.rest_length
    }

    #[func]
    fn set_stiffness(&mut self, stiffness: f32) {
        self.joint.set_stiffness(stiffness);
        self.stiffness = stiffness;
        self.flush_redraw();
    }

    #[func]
    fn get_stiffness(&self) -> f32 {
        self.stiffness
    }

    #[func]
    fn set_damping(&mut self, damping: f32) {
        self.joint.set_damping(damping);
        self.damping = damping;
        self.flush_redraw();
    }

    #[func]
    fn get_damping(&self) -> f32 {
        self.damping
    }

    #[func]
    fn set_other_anchor(&mut self, path: NodePath) {
        let scene = self.scene();
        self.joint.set_other_anchor(&scene, path.to_string());
        self.other_anchor = path;
        self.flush_redraw();
    }

    #[func]
    fn get_other_anchor(&self) -> NodePath {
        self.other_anchor.clone()
    }

    /// Set a property by name; returns false for unknown names or wrong types
    #[func]
    fn set_param(&mut self, name: GString, value: Variant) -> bool {
        let name = name.to_string();
        let Some(info) = self.joint.property_list().get(&name).cloned() else {
            godot_error!("PulleyJoint2D: unknown property {}", name);
            return false;
        };
        let Some(value) = variant_to_property(&value, info.kind) else {
            godot_error!(
                "PulleyJoint2D: {} expects {}, got {:?}",
                name,
                info.kind.as_str(),
                value.get_type()
            );
            return false;
        };

        let scene = self.scene();
        let result = self.joint.set(&scene, &name, value);
        self.sync_exports();
        self.flush_redraw();
        match result {
            Ok(()) => true,
            Err(e) => {
                godot_error!("PulleyJoint2D: {}", e);
                false
            }
        }
    }

    /// Get a property by name; nil for unknown names
    #[func]
    fn get_param(&self, name: GString) -> Variant {
        match self.joint.get(&name.to_string()) {
            Ok(value) => property_to_variant(&value),
            Err(_) => Variant::nil(),
        }
    }

    /// Editor hint string for each property, in display order
    #[func]
    fn get_param_hints(&self) -> VarDictionary {
        let mut dict = VarDictionary::new();
        for info in self.joint.property_list().iter() {
            dict.set(info.name, info.hint.hint_string().to_variant());
        }
        dict
    }

    // === Presets ===

    /// Load presets from a RON file or directory and apply the one named `id`
    #[func]
    fn apply_preset(&mut self, path: GString, id: GString) -> bool {
        let path = ProjectSettings::singleton().globalize_path(&path);
        let path = PathBuf::from(path.to_string());

        let mut loader = Loader::new();
        let loaded = if path.is_dir() {
            loader.load_directory(&path)
        } else {
            loader.load_file(&path)
        };
        if let Err(e) = loaded {
            godot_error!("Failed to load joint presets: {}", e);
            return false;
        }

        let defs = loader.finish();
        let Some(config) = defs.get(&PresetId::new(id.to_string())).cloned() else {
            godot_error!("Unknown joint preset: {}", id);
            return false;
        };

        let scene = self.scene();
        self.joint.apply_config(&scene, config);
        self.sync_exports();
        self.flush_redraw();
        godot_print!("Applied joint preset {} from {:?}", id, path);
        true
    }

    // === Helpers ===

    fn scene(&self) -> NodeScene {
        NodeScene::new(self.base().clone())
    }

    fn flush_redraw(&mut self) {
        if self.joint.take_redraw_request() {
            self.base_mut().queue_redraw();
        }
    }

    /// Copy the core joint's parameters into the exported fields
    fn sync_exports(&mut self) {
        let config = self.joint.config();
        self.length_a = config.length_a;
        self.length_b = config.length_b;
        self.rest_length = config.rest_length;
        self.stiffness = config.stiffness;
        self.damping = config.damping;
        self.other_anchor = NodePath::from(config.other_anchor.as_str());
    }
}

impl Drop for PulleyJoint2D {
    fn drop(&mut self) {
        GodotPhysicsServer::singleton().free_rid(self.rid);
    }
}
