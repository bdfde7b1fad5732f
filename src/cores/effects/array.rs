// Copyright (c) 2024 Mike Tsao. All rights reserved.

use crate::{
    impl_has_properties,
    properties::{PropertyMetadata, PropertySet, PropertyValue},
    render::VisualObject,
    traits::VisualEffect,
    types::{Beats, Normal, Tempo},
};
use std::f64::consts::TAU;

/// Duplicates every object across a plane: output is the original plus a
/// copy with the chosen axis of its position negated.
#[derive(Clone, Debug)]
pub struct MirrorEffect {
    props: PropertySet,
}
impl MirrorEffect {
    pub const KEY: &'static str = "mirror";

    pub const AXIS: &'static str = "axis";

    pub fn new_with(axis: &str) -> Self {
        let mut e = Self::default();
        e.props
            .update(Self::AXIS, PropertyValue::Text(axis.to_string()));
        e
    }

    fn axis_index(&self) -> usize {
        // Unrecognized axis text reads as "x"; metadata is advisory.
        match self.props.text(Self::AXIS) {
            "y" => 1,
            "z" => 2,
            _ => 0,
        }
    }
}
impl Default for MirrorEffect {
    fn default() -> Self {
        Self {
            props: PropertySet::default().with(
                Self::AXIS,
                PropertyValue::Text("x".to_string()),
                PropertyMetadata::select("Axis", &["x", "y", "z"]),
            ),
        }
    }
}
impl_has_properties!(MirrorEffect);
impl VisualEffect for MirrorEffect {
    fn type_key(&self) -> &'static str {
        Self::KEY
    }

    fn apply(&mut self, objects: &[VisualObject], _time: Beats, _tempo: Tempo) -> Vec<VisualObject> {
        let axis = self.axis_index();
        let mut out = Vec::with_capacity(objects.len() * 2);
        for o in objects {
            out.push(o.clone());
            let mut position = o.position();
            position[axis] = -position[axis];
            out.push(o.clone().with_position(position));
        }
        out
    }

    fn make_another(&self) -> Box<dyn VisualEffect> {
        Box::new(self.clone())
    }
}

/// Duplicates every object into a symmetric row along the x axis, fading
/// each copy by `fade^k`.
#[derive(Clone, Debug)]
pub struct LinearArrayEffect {
    props: PropertySet,
}
impl LinearArrayEffect {
    pub const KEY: &'static str = "linear-array";

    pub const COPIES: &'static str = "copies";
    pub const SPACING: &'static str = "spacing";
    pub const FADE: &'static str = "fade";

    pub fn new_with(copies: i64, spacing: f64) -> Self {
        let mut e = Self::default();
        e.props.update(Self::COPIES, PropertyValue::Int(copies));
        e.props.update(Self::SPACING, PropertyValue::Float(spacing));
        e
    }
}
impl Default for LinearArrayEffect {
    fn default() -> Self {
        Self {
            props: PropertySet::default()
                .with(
                    Self::COPIES,
                    PropertyValue::Int(2),
                    PropertyMetadata::slider("Copies per side", 0.0, 8.0, 1.0),
                )
                .with(
                    Self::SPACING,
                    PropertyValue::Float(1.5),
                    PropertyMetadata::slider("Spacing", 0.1, 10.0, 0.1),
                )
                .with(
                    Self::FADE,
                    PropertyValue::Float(0.7),
                    PropertyMetadata::slider("Fade", 0.0, 1.0, 0.05),
                ),
        }
    }
}
impl_has_properties!(LinearArrayEffect);
impl VisualEffect for LinearArrayEffect {
    fn type_key(&self) -> &'static str {
        Self::KEY
    }

    fn apply(&mut self, objects: &[VisualObject], _time: Beats, _tempo: Tempo) -> Vec<VisualObject> {
        let copies = self.props.int(Self::COPIES).max(0) as usize;
        let spacing = self.props.float(Self::SPACING);
        let fade = self.props.float(Self::FADE);

        let mut out = Vec::with_capacity(objects.len() * (1 + copies * 2));
        for o in objects {
            out.push(o.clone());
            let [x, y, z] = o.position();
            for k in 1..=copies {
                let offset = k as f64 * spacing;
                let opacity = Normal::new(o.opacity().0 * fade.powi(k as i32));
                out.push(
                    o.clone()
                        .with_position([x + offset, y, z])
                        .with_opacity(opacity),
                );
                out.push(
                    o.clone()
                        .with_position([x - offset, y, z])
                        .with_opacity(opacity),
                );
            }
        }
        out
    }

    fn make_another(&self) -> Box<dyn VisualEffect> {
        Box::new(self.clone())
    }
}

/// Duplicates every object around a circle in the xy plane: the original
/// plus `copies` duplicates at equal angles, each `radius` away from the
/// object's own position.
#[derive(Clone, Debug)]
pub struct RadialArrayEffect {
    props: PropertySet,
}
impl RadialArrayEffect {
    pub const KEY: &'static str = "radial-array";

    pub const COPIES: &'static str = "copies";
    pub const RADIUS: &'static str = "radius";

    pub fn new_with(copies: i64, radius: f64) -> Self {
        let mut e = Self::default();
        e.props.update(Self::COPIES, PropertyValue::Int(copies));
        e.props.update(Self::RADIUS, PropertyValue::Float(radius));
        e
    }
}
impl Default for RadialArrayEffect {
    fn default() -> Self {
        Self {
            props: PropertySet::default()
                .with(
                    Self::COPIES,
                    PropertyValue::Int(3),
                    PropertyMetadata::slider("Copies", 0.0, 12.0, 1.0),
                )
                .with(
                    Self::RADIUS,
                    PropertyValue::Float(1.0),
                    PropertyMetadata::slider("Radius", 0.0, 10.0, 0.1),
                ),
        }
    }
}
impl_has_properties!(RadialArrayEffect);
impl VisualEffect for RadialArrayEffect {
    fn type_key(&self) -> &'static str {
        Self::KEY
    }

    fn apply(&mut self, objects: &[VisualObject], _time: Beats, _tempo: Tempo) -> Vec<VisualObject> {
        let copies = self.props.int(Self::COPIES).max(0) as usize;
        let radius = self.props.float(Self::RADIUS);

        let mut out = Vec::with_capacity(objects.len() * (1 + copies));
        for o in objects {
            out.push(o.clone());
            let [x, y, z] = o.position();
            for k in 0..copies {
                let angle = k as f64 / copies as f64 * TAU;
                out.push(o.clone().with_position([
                    x + radius * angle.cos(),
                    y + radius * angle.sin(),
                    z,
                ]));
            }
        }
        out
    }

    fn make_another(&self) -> Box<dyn VisualEffect> {
        Box::new(self.clone())
    }
}
