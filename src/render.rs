// Copyright (c) 2024 Mike Tsao. All rights reserved.

//! The renderer-facing output contract: plain, immutable object descriptors.

use crate::{colors::Color, types::Normal};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, IntoStaticStr};

/// The geometry a [VisualObject] asks the renderer to draw.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Display,
    EnumIter,
    Eq,
    IntoStaticStr,
    PartialEq,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ObjectKind {
    #[default]
    Cube,
    Sphere,
    Plane,
    Ring,
    Torus,
    Cylinder,
    Cone,
    Icosahedron,
}

/// Either a uniform scale factor or a per-axis vector.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scale {
    Uniform(f64),
    Vector([f64; 3]),
}
impl Scale {
    pub fn to_vector(self) -> [f64; 3] {
        match self {
            Self::Uniform(f) => [f, f, f],
            Self::Vector(v) => v,
        }
    }

    /// Multiplies every axis by `factor`, preserving the uniform/vector form.
    pub fn scaled_by(self, factor: f64) -> Self {
        match self {
            Self::Uniform(f) => Self::Uniform(f * factor),
            Self::Vector([x, y, z]) => Self::Vector([x * factor, y * factor, z * factor]),
        }
    }
}
impl Default for Scale {
    fn default() -> Self {
        Self::Uniform(1.0)
    }
}

/// Spatial and appearance attributes. All optional except color; rotation is
/// in degrees.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ObjectProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<[f64; 3]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<[f64; 3]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<Scale>,
    pub color: Color,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<Normal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
}

/// One renderable object descriptor. A plain value: every pipeline stage that
/// changes one produces a new [VisualObject] rather than mutating in place,
/// so no two stages ever share a mutable nested value.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct VisualObject {
    #[serde(rename = "type")]
    pub kind: ObjectKind,
    pub properties: ObjectProperties,
}
impl VisualObject {
    pub fn new_with(kind: ObjectKind, properties: ObjectProperties) -> Self {
        Self { kind, properties }
    }

    /// Position, defaulting to the origin.
    pub fn position(&self) -> [f64; 3] {
        self.properties.position.unwrap_or([0.0, 0.0, 0.0])
    }

    /// Rotation in degrees, defaulting to none.
    pub fn rotation(&self) -> [f64; 3] {
        self.properties.rotation.unwrap_or([0.0, 0.0, 0.0])
    }

    /// Scale, defaulting to uniform 1.0.
    pub fn scale(&self) -> Scale {
        self.properties.scale.unwrap_or_default()
    }

    /// Opacity, defaulting to fully opaque.
    pub fn opacity(&self) -> Normal {
        self.properties.opacity.unwrap_or_default()
    }

    // Consuming with_* helpers for effects building changed copies.

    #[must_use]
    pub fn with_position(mut self, position: [f64; 3]) -> Self {
        self.properties.position = Some(position);
        self
    }

    #[must_use]
    pub fn with_rotation(mut self, rotation: [f64; 3]) -> Self {
        self.properties.rotation = Some(rotation);
        self
    }

    #[must_use]
    pub fn with_scale(mut self, scale: Scale) -> Self {
        self.properties.scale = Some(scale);
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.properties.color = color;
        self
    }

    #[must_use]
    pub fn with_opacity(mut self, opacity: Normal) -> Self {
        self.properties.opacity = Some(opacity);
        self
    }

    #[must_use]
    pub fn with_size(mut self, size: f64) -> Self {
        self.properties.size = Some(size);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialized_form_matches_renderer_contract() {
        let object = VisualObject::new_with(
            ObjectKind::Sphere,
            ObjectProperties {
                position: Some([1.0, 2.0, 3.0]),
                color: Color::new(255, 0, 0),
                opacity: Some(Normal::new(0.5)),
                ..Default::default()
            },
        );
        let json: serde_json::Value = serde_json::to_value(&object).unwrap();
        assert_eq!(json["type"], "sphere");
        assert_eq!(json["properties"]["position"][2], 3.0);
        assert_eq!(json["properties"]["color"], "#ff0000");
        assert_eq!(json["properties"]["opacity"], 0.5);
        // Unset attributes are omitted, not serialized as nulls.
        assert!(json["properties"].get("rotation").is_none());
    }

    #[test]
    fn scale_serializes_as_number_or_vector() {
        assert_eq!(
            serde_json::to_string(&Scale::Uniform(2.0)).unwrap(),
            "2.0"
        );
        assert_eq!(
            serde_json::to_string(&Scale::Vector([1.0, 2.0, 1.0])).unwrap(),
            "[1.0,2.0,1.0]"
        );
        let back: Scale = serde_json::from_str("0.25").unwrap();
        assert_eq!(back, Scale::Uniform(0.25));
    }

    #[test]
    fn scale_arithmetic() {
        assert_eq!(Scale::Uniform(2.0).scaled_by(3.0), Scale::Uniform(6.0));
        assert_eq!(
            Scale::Vector([1.0, 2.0, 3.0]).scaled_by(2.0).to_vector(),
            [2.0, 4.0, 6.0]
        );
        assert_eq!(Scale::default().to_vector(), [1.0, 1.0, 1.0]);
    }
}
