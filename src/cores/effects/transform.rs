// Copyright (c) 2024 Mike Tsao. All rights reserved.

use crate::{
    impl_has_properties,
    properties::{PropertyMetadata, PropertySet, PropertyValue},
    render::{Scale, VisualObject},
    traits::VisualEffect,
    types::{Beats, Tempo},
};

/// Translates every object by a constant offset.
#[derive(Clone, Debug)]
pub struct PositionOffsetEffect {
    props: PropertySet,
}
impl PositionOffsetEffect {
    pub const KEY: &'static str = "position-offset";

    pub const OFFSET: &'static str = "offset";

    pub fn new_with(offset: [f64; 3]) -> Self {
        let mut e = Self::default();
        e.props.update(Self::OFFSET, PropertyValue::Vec3(offset));
        e
    }
}
impl Default for PositionOffsetEffect {
    fn default() -> Self {
        Self {
            props: PropertySet::default().with(
                Self::OFFSET,
                PropertyValue::Vec3([0.0, 0.0, 0.0]),
                PropertyMetadata::vector("Offset"),
            ),
        }
    }
}
impl_has_properties!(PositionOffsetEffect);
impl VisualEffect for PositionOffsetEffect {
    fn type_key(&self) -> &'static str {
        Self::KEY
    }

    fn apply(&mut self, objects: &[VisualObject], _time: Beats, _tempo: Tempo) -> Vec<VisualObject> {
        let [dx, dy, dz] = self.props.vec3(Self::OFFSET);
        objects
            .iter()
            .map(|o| {
                let [x, y, z] = o.position();
                o.clone().with_position([x + dx, y + dy, z + dz])
            })
            .collect()
    }

    fn make_another(&self) -> Box<dyn VisualEffect> {
        Box::new(self.clone())
    }
}

/// Scales the whole scene about the origin: positions, scales, and sizes all
/// multiply by the factor. Because positions scale too, this effect does not
/// commute with [PositionOffsetEffect].
#[derive(Clone, Debug)]
pub struct ScaleEffect {
    props: PropertySet,
}
impl ScaleEffect {
    pub const KEY: &'static str = "scale";

    pub const FACTOR: &'static str = "factor";

    pub fn new_with(factor: f64) -> Self {
        let mut e = Self::default();
        e.props.update(Self::FACTOR, PropertyValue::Float(factor));
        e
    }
}
impl Default for ScaleEffect {
    fn default() -> Self {
        Self {
            props: PropertySet::default().with(
                Self::FACTOR,
                PropertyValue::Float(1.0),
                PropertyMetadata::slider("Factor", 0.0, 10.0, 0.05),
            ),
        }
    }
}
impl_has_properties!(ScaleEffect);
impl VisualEffect for ScaleEffect {
    fn type_key(&self) -> &'static str {
        Self::KEY
    }

    fn apply(&mut self, objects: &[VisualObject], _time: Beats, _tempo: Tempo) -> Vec<VisualObject> {
        let factor = self.props.float(Self::FACTOR);
        objects
            .iter()
            .map(|o| {
                let [x, y, z] = o.position();
                let scale = o.scale().scaled_by(factor);
                let mut out = o
                    .clone()
                    .with_position([x * factor, y * factor, z * factor])
                    .with_scale(scale);
                if let Some(size) = out.properties.size {
                    out.properties.size = Some(size * factor);
                }
                out
            })
            .collect()
    }

    fn make_another(&self) -> Box<dyn VisualEffect> {
        Box::new(self.clone())
    }
}

/// Adds a constant rotation, plus an optional spin that accumulates per
/// beat. Spin is a pure function of the query time: scrubbing backwards
/// unwinds it.
#[derive(Clone, Debug)]
pub struct RotateEffect {
    props: PropertySet,
}
impl RotateEffect {
    pub const KEY: &'static str = "rotate";

    pub const ROTATION: &'static str = "rotation";
    pub const SPIN: &'static str = "spin";

    pub fn new_with(rotation: [f64; 3], spin: [f64; 3]) -> Self {
        let mut e = Self::default();
        e.props.update(Self::ROTATION, PropertyValue::Vec3(rotation));
        e.props.update(Self::SPIN, PropertyValue::Vec3(spin));
        e
    }
}
impl Default for RotateEffect {
    fn default() -> Self {
        Self {
            props: PropertySet::default()
                .with(
                    Self::ROTATION,
                    PropertyValue::Vec3([0.0, 0.0, 0.0]),
                    PropertyMetadata::vector("Rotation (deg)"),
                )
                .with(
                    Self::SPIN,
                    PropertyValue::Vec3([0.0, 0.0, 0.0]),
                    PropertyMetadata::vector("Spin (deg/beat)"),
                ),
        }
    }
}
impl_has_properties!(RotateEffect);
impl VisualEffect for RotateEffect {
    fn type_key(&self) -> &'static str {
        Self::KEY
    }

    fn apply(&mut self, objects: &[VisualObject], time: Beats, _tempo: Tempo) -> Vec<VisualObject> {
        let rotation = self.props.vec3(Self::ROTATION);
        let spin = self.props.vec3(Self::SPIN);
        objects
            .iter()
            .map(|o| {
                let old = o.rotation();
                o.clone().with_rotation([
                    old[0] + rotation[0] + spin[0] * time.0,
                    old[1] + rotation[1] + spin[1] * time.0,
                    old[2] + rotation[2] + spin[2] * time.0,
                ])
            })
            .collect()
    }

    fn make_another(&self) -> Box<dyn VisualEffect> {
        Box::new(self.clone())
    }
}
