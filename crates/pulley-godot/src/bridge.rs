//! Type conversion between pulley-core and Godot types

use godot::prelude::*;
use pulley_core::{Affine2, PropertyKind, PropertyValue, Vec2};

/// Convert a glam vector to a Godot Vector2
pub fn to_vector2(v: Vec2) -> Vector2 {
    Vector2::new(v.x, v.y)
}

/// Convert a Godot Vector2 to a glam vector
pub fn from_vector2(v: Vector2) -> Vec2 {
    Vec2::new(v.x, v.y)
}

/// Convert a Godot Transform2D to an affine transform (columns a, b, origin)
pub fn from_transform2d(t: Transform2D) -> Affine2 {
    Affine2::from_cols(from_vector2(t.a), from_vector2(t.b), from_vector2(t.origin))
}

/// Convert an affine transform to a Godot Transform2D
pub fn to_transform2d(t: Affine2) -> Transform2D {
    Transform2D::from_cols(
        to_vector2(t.matrix2.x_axis),
        to_vector2(t.matrix2.y_axis),
        to_vector2(t.translation),
    )
}

pub fn to_color(c: pulley_core::Color) -> Color {
    Color::from_rgba(c.r, c.g, c.b, c.a)
}

pub fn to_rid(raw: u64) -> Rid {
    Rid::new(raw)
}

/// Convert a property value to a Godot Variant
pub fn property_to_variant(value: &PropertyValue) -> Variant {
    match value {
        PropertyValue::Float(v) => (*v as f64).to_variant(),
        PropertyValue::NodePath(path) => NodePath::from(path.as_str()).to_variant(),
    }
}

/// Convert a Godot Variant to a property value of the expected kind
///
/// Node paths are also accepted as plain strings.
pub fn variant_to_property(variant: &Variant, kind: PropertyKind) -> Option<PropertyValue> {
    match kind {
        PropertyKind::Float => match variant.get_type() {
            VariantType::FLOAT => Some(PropertyValue::Float(variant.to::<f64>() as f32)),
            VariantType::INT => Some(PropertyValue::Float(variant.to::<i64>() as f32)),
            _ => None,
        },
        PropertyKind::NodePath => match variant.get_type() {
            VariantType::NODE_PATH => Some(PropertyValue::NodePath(
                variant.to::<NodePath>().to_string().into(),
            )),
            VariantType::STRING => Some(PropertyValue::NodePath(
                variant.to::<GString>().to_string().into(),
            )),
            _ => None,
        },
    }
}
