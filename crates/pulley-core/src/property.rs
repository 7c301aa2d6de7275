//! Property reflection for editors and scripting hosts
//!
//! Describes the joint's editable properties together with advisory hints.
//! Hints are for UI only: values outside a range are still accepted.

use crate::identity::NodePath;
use indexmap::IndexMap;
use std::fmt;

/// Value type of a property
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    Float,
    NodePath,
}

impl PropertyKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PropertyKind::Float => "float",
            PropertyKind::NodePath => "node_path",
        }
    }
}

/// Numeric range hint
#[derive(Debug, Clone, PartialEq)]
pub struct RangeHint {
    pub min: f32,
    pub max: f32,
    pub step: f32,
    /// Slider should scale exponentially
    pub exponential: bool,
    pub suffix: Option<&'static str>,
}

impl RangeHint {
    pub fn new(min: f32, max: f32, step: f32) -> Self {
        Self {
            min,
            max,
            step,
            exponential: false,
            suffix: None,
        }
    }

    pub fn exp(mut self) -> Self {
        self.exponential = true;
        self
    }

    pub fn suffix(mut self, suffix: &'static str) -> Self {
        self.suffix = Some(suffix);
        self
    }

    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }
}

impl fmt::Display for RangeHint {
    /// Editor hint string, e.g. `1,65535,1,exp,suffix:px`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.min, self.max, self.step)?;
        if self.exponential {
            write!(f, ",exp")?;
        }
        if let Some(suffix) = self.suffix {
            write!(f, ",suffix:{}", suffix)?;
        }
        Ok(())
    }
}

/// Editor hint attached to a property
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyHint {
    None,
    Range(RangeHint),
    /// Path should point at a node of one of these types
    NodePathValidTypes(Vec<&'static str>),
}

impl PropertyHint {
    pub fn hint_string(&self) -> String {
        match self {
            PropertyHint::None => String::new(),
            PropertyHint::Range(range) => range.to_string(),
            PropertyHint::NodePathValidTypes(types) => types.join(","),
        }
    }
}

/// Description of one editable property
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyInfo {
    pub name: &'static str,
    pub kind: PropertyKind,
    pub hint: PropertyHint,
}

/// Dynamically typed property value
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Float(f32),
    NodePath(NodePath),
}

impl PropertyValue {
    pub fn kind(&self) -> PropertyKind {
        match self {
            PropertyValue::Float(_) => PropertyKind::Float,
            PropertyValue::NodePath(_) => PropertyKind::NodePath,
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match self {
            PropertyValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_node_path(&self) -> Option<&NodePath> {
        match self {
            PropertyValue::NodePath(p) => Some(p),
            _ => None,
        }
    }
}

impl From<f32> for PropertyValue {
    fn from(v: f32) -> Self {
        PropertyValue::Float(v)
    }
}

impl From<NodePath> for PropertyValue {
    fn from(p: NodePath) -> Self {
        PropertyValue::NodePath(p)
    }
}

/// Ordered set of property descriptions, in editor display order
#[derive(Debug, Clone, Default)]
pub struct PropertyList {
    properties: IndexMap<&'static str, PropertyInfo>,
}

impl PropertyList {
    pub fn new() -> Self {
        Self::default()
    }

    /// The properties a pulley joint exposes
    pub fn pulley() -> Self {
        let length = RangeHint::new(1.0, 65535.0, 1.0).exp().suffix("px");
        let mut list = Self::new();
        list.push(PropertyInfo {
            name: "other_anchor",
            kind: PropertyKind::NodePath,
            hint: PropertyHint::NodePathValidTypes(vec!["Node2D"]),
        });
        list.push(PropertyInfo {
            name: "length_a",
            kind: PropertyKind::Float,
            hint: PropertyHint::Range(length.clone()),
        });
        list.push(PropertyInfo {
            name: "length_b",
            kind: PropertyKind::Float,
            hint: PropertyHint::Range(length),
        });
        list.push(PropertyInfo {
            name: "rest_length",
            kind: PropertyKind::Float,
            hint: PropertyHint::Range(RangeHint::new(0.0, 65535.0, 1.0).exp().suffix("px")),
        });
        list.push(PropertyInfo {
            name: "stiffness",
            kind: PropertyKind::Float,
            hint: PropertyHint::Range(RangeHint::new(0.1, 64.0, 0.1).exp()),
        });
        list.push(PropertyInfo {
            name: "damping",
            kind: PropertyKind::Float,
            hint: PropertyHint::Range(RangeHint::new(0.01, 16.0, 0.01).exp()),
        });
        list
    }

    /// Add a property, replacing any with the same name
    pub fn push(&mut self, info: PropertyInfo) {
        self.properties.insert(info.name, info);
    }

    pub fn get(&self, name: &str) -> Option<&PropertyInfo> {
        self.properties.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PropertyInfo> {
        self.properties.values()
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}
