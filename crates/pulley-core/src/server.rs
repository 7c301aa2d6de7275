//! Physics server boundary
//!
//! The server owns joint handles and solves the pulley dynamics. The joint node
//! only describes the constraint and forwards parameter changes through this
//! trait; every call is fire-and-forget.

use crate::identity::{BodyRid, JointRid};
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Tunable server-side parameters of a pulley joint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PulleyParam {
    /// Combined rest length of both arms
    RestLength,
    Stiffness,
    Damping,
}

impl PulleyParam {
    /// All parameters, in server index order
    pub const ALL: [PulleyParam; 3] = [
        PulleyParam::RestLength,
        PulleyParam::Stiffness,
        PulleyParam::Damping,
    ];

    /// Stable integer index used by engines that address params by number
    pub fn index(self) -> i32 {
        match self {
            PulleyParam::RestLength => 0,
            PulleyParam::Stiffness => 1,
            PulleyParam::Damping => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PulleyParam::RestLength => "rest_length",
            PulleyParam::Stiffness => "stiffness",
            PulleyParam::Damping => "damping",
        }
    }
}

/// Physics server operations consumed by the pulley joint
pub trait PhysicsServer {
    /// Turn `joint` into a pulley between `body_a` and `body_b`
    ///
    /// Both anchors are in world space.
    fn joint_make_pulley(
        &mut self,
        joint: JointRid,
        anchor_a: Vec2,
        anchor_b: Vec2,
        body_a: BodyRid,
        body_b: BodyRid,
    );

    /// Set a pulley parameter on an already-made joint
    fn pulley_joint_set_param(&mut self, joint: JointRid, param: PulleyParam, value: f32);

    /// Drop whatever constraint `joint` currently describes
    ///
    /// The handle stays valid and can be made into a pulley again.
    fn joint_clear(&mut self, joint: JointRid);
}

impl<S: PhysicsServer + ?Sized> PhysicsServer for &mut S {
    fn joint_make_pulley(
        &mut self,
        joint: JointRid,
        anchor_a: Vec2,
        anchor_b: Vec2,
        body_a: BodyRid,
        body_b: BodyRid,
    ) {
        (**self).joint_make_pulley(joint, anchor_a, anchor_b, body_a, body_b)
    }

    fn pulley_joint_set_param(&mut self, joint: JointRid, param: PulleyParam, value: f32) {
        (**self).pulley_joint_set_param(joint, param, value)
    }

    fn joint_clear(&mut self, joint: JointRid) {
        (**self).joint_clear(joint)
    }
}

/// A single call received by a [`RecordingServer`]
#[derive(Debug, Clone, PartialEq)]
pub enum ServerCall {
    MakePulley {
        joint: JointRid,
        anchor_a: Vec2,
        anchor_b: Vec2,
        body_a: BodyRid,
        body_b: BodyRid,
    },
    SetParam {
        joint: JointRid,
        param: PulleyParam,
        value: f32,
    },
    Clear {
        joint: JointRid,
    },
}

/// Physics server that records every call instead of simulating
///
/// Useful for tests and for hosts that want to inspect the traffic a joint
/// produces before wiring a real server.
#[derive(Debug, Default, Clone)]
pub struct RecordingServer {
    calls: Vec<ServerCall>,
}

impl RecordingServer {
    pub fn new() -> Self {
        Self::default()
    }

    /// All calls received so far, oldest first
    pub fn calls(&self) -> &[ServerCall] {
        &self.calls
    }

    /// Forget recorded calls
    pub fn reset(&mut self) {
        self.calls.clear();
    }

    /// Number of `joint_make_pulley` calls received
    pub fn make_pulley_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, ServerCall::MakePulley { .. }))
            .count()
    }

    /// Values pushed for `param`, oldest first
    pub fn param_values(&self, param: PulleyParam) -> Vec<f32> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                ServerCall::SetParam { param: p, value, .. } if *p == param => Some(*value),
                _ => None,
            })
            .collect()
    }

    /// Most recent value pushed for `param`
    pub fn last_param(&self, param: PulleyParam) -> Option<f32> {
        self.param_values(param).last().copied()
    }
}

impl PhysicsServer for RecordingServer {
    fn joint_make_pulley(
        &mut self,
        joint: JointRid,
        anchor_a: Vec2,
        anchor_b: Vec2,
        body_a: BodyRid,
        body_b: BodyRid,
    ) {
        self.calls.push(ServerCall::MakePulley {
            joint,
            anchor_a,
            anchor_b,
            body_a,
            body_b,
        });
    }

    fn pulley_joint_set_param(&mut self, joint: JointRid, param: PulleyParam, value: f32) {
        self.calls.push(ServerCall::SetParam { joint, param, value });
    }

    fn joint_clear(&mut self, joint: JointRid) {
        self.calls.push(ServerCall::Clear { joint });
    }
}
