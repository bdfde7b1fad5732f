// Copyright (c) 2024 Mike Tsao. All rights reserved.

//! The property model. Every tunable parameter of a synthesizer or effect is
//! declared as a [Property] in a [PropertySet]; there is no other mechanism
//! for exposing configuration, so UIs, persistence, and tests all go through
//! the same surface.

use crate::colors::Color;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, IntoStaticStr};

/// The value of a single property. Serializes untagged, so the persisted form
/// is a plain JSON value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Vec3([f64; 3]),
    Color(Color),
    Text(String),
}
impl PropertyValue {
    /// Numeric widening: an [PropertyValue::Int] reads as a float. JSON can't
    /// tell `2` from `2.0`, so a float property round-tripped through
    /// persistence may come back as an integer.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            Self::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<Color> {
        match self {
            Self::Color(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_vec3(&self) -> Option<[f64; 3]> {
        match self {
            Self::Vec3(v) => Some(*v),
            _ => None,
        }
    }

    /// Converts this value into the same variant kind as `target`, if the two
    /// are compatible. Used when applying serialized values to declared
    /// properties.
    fn coerced_like(&self, target: &PropertyValue) -> Option<PropertyValue> {
        match target {
            Self::Float(_) => self.as_float().map(Self::Float),
            Self::Int(_) => self.as_int().map(Self::Int),
            Self::Bool(_) => self.as_bool().map(Self::Bool),
            Self::Vec3(_) => self.as_vec3().map(Self::Vec3),
            Self::Color(_) => self.as_color().map(Self::Color),
            Self::Text(_) => self.as_text().map(|s| Self::Text(s.to_string())),
        }
    }
}

/// Which widget a UI should present for a property. Advisory, like the rest
/// of [PropertyMetadata].
#[derive(
    Clone, Copy, Debug, Display, EnumIter, Eq, IntoStaticStr, PartialEq, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum UiType {
    Slider,
    Number,
    Checkbox,
    ColorPicker,
    Select,
    Vector,
}

/// UI hints for a property. Bounds are advisory only: the core never enforces
/// them, and out-of-range values arriving through persistence are kept as-is.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PropertyMetadata {
    pub ui_type: UiType,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<String>>,
}
impl PropertyMetadata {
    pub fn slider(label: &str, min: f64, max: f64, step: f64) -> Self {
        Self {
            ui_type: UiType::Slider,
            label: label.to_string(),
            description: None,
            min: Some(min),
            max: Some(max),
            step: Some(step),
            choices: None,
        }
    }

    pub fn number(label: &str) -> Self {
        Self {
            ui_type: UiType::Number,
            label: label.to_string(),
            description: None,
            min: None,
            max: None,
            step: None,
            choices: None,
        }
    }

    pub fn checkbox(label: &str) -> Self {
        Self {
            ui_type: UiType::Checkbox,
            label: label.to_string(),
            description: None,
            min: None,
            max: None,
            step: None,
            choices: None,
        }
    }

    pub fn color(label: &str) -> Self {
        Self {
            ui_type: UiType::ColorPicker,
            label: label.to_string(),
            description: None,
            min: None,
            max: None,
            step: None,
            choices: None,
        }
    }

    pub fn vector(label: &str) -> Self {
        Self {
            ui_type: UiType::Vector,
            label: label.to_string(),
            description: None,
            min: None,
            max: None,
            step: None,
            choices: None,
        }
    }

    pub fn select(label: &str, choices: &[&str]) -> Self {
        Self {
            ui_type: UiType::Select,
            label: label.to_string(),
            description: None,
            min: None,
            max: None,
            step: None,
            choices: Some(choices.iter().map(|c| c.to_string()).collect()),
        }
    }

    /// Adds a description to any of the above constructors.
    pub fn describe(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }
}

/// A named, typed configuration value with UI metadata, owned by exactly one
/// synthesizer or effect instance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Property {
    pub name: String,
    pub value: PropertyValue,
    pub metadata: PropertyMetadata,
}

/// An ordered name-to-[Property] map. Declaration order is preserved so that
/// UIs and serialized forms are stable; lookup is by name.
///
/// Cloning a [PropertySet] value-copies every property, including nested
/// vectors and strings, so a clone never aliases its source.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PropertySet {
    properties: Vec<Property>,
    index: FxHashMap<String, usize>,
}
impl PropertySet {
    /// Declares a property. Chainable for use in `Default` impls. Panics on a
    /// duplicate name, which is a mistake in the declaring entity, not data.
    #[must_use]
    pub fn with(mut self, name: &str, value: PropertyValue, metadata: PropertyMetadata) -> Self {
        if self.index.contains_key(name) {
            panic!("with({name}): duplicate property name");
        }
        self.index.insert(name.to_string(), self.properties.len());
        self.properties.push(Property {
            name: name.to_string(),
            value,
            metadata,
        });
        self
    }

    pub fn get(&self, name: &str) -> Option<&Property> {
        self.index.get(name).map(|i| &self.properties[*i])
    }

    /// Sets a declared property's value. Unknown names are an error; bounds
    /// in the metadata are not checked.
    pub fn set_value(&mut self, name: &str, value: PropertyValue) -> anyhow::Result<()> {
        match self.index.get(name) {
            Some(i) => {
                self.properties[*i].value = value;
                Ok(())
            }
            None => Err(anyhow::anyhow!("no property named {name}")),
        }
    }

    /// Like [PropertySet::set_value], but panics on an unknown name. For
    /// constructors that set properties they themselves declared.
    pub(crate) fn update(&mut self, name: &str, value: PropertyValue) {
        match self.index.get(name) {
            Some(i) => self.properties[*i].value = value,
            None => panic!("update({name}): no such property"),
        }
    }

    /// The properties in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Property> {
        self.properties.iter()
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// The ordered name/plain-value pairs that cross the persistence boundary.
    pub fn serialized(&self) -> Vec<(String, PropertyValue)> {
        self.properties
            .iter()
            .map(|p| (p.name.clone(), p.value.clone()))
            .collect()
    }

    /// Applies serialized values. Names that aren't present keep their
    /// defaults; unknown names and incompatible value kinds are skipped; the
    /// rest are accepted as-is, including values outside the advisory bounds.
    pub fn apply_serialized(&mut self, entries: &[(String, PropertyValue)]) {
        for (name, value) in entries {
            if let Some(i) = self.index.get(name) {
                if let Some(coerced) = value.coerced_like(&self.properties[*i].value) {
                    self.properties[*i].value = coerced;
                }
            }
        }
    }

    // Typed accessors for entities reading their own declared properties. A
    // missing or mistyped name here is a bug in the entity's declaration, so
    // these panic rather than limp along with a silent default.

    pub fn float(&self, name: &str) -> f64 {
        match self.get(name).map(|p| p.value.as_float()) {
            Some(Some(v)) => v,
            _ => panic!("float({name}): no such float property"),
        }
    }

    pub fn int(&self, name: &str) -> i64 {
        match self.get(name).map(|p| p.value.as_int()) {
            Some(Some(v)) => v,
            _ => panic!("int({name}): no such int property"),
        }
    }

    pub fn boolean(&self, name: &str) -> bool {
        match self.get(name).map(|p| p.value.as_bool()) {
            Some(Some(v)) => v,
            _ => panic!("boolean({name}): no such bool property"),
        }
    }

    pub fn text(&self, name: &str) -> &str {
        match self.get(name).map(|p| &p.value) {
            Some(PropertyValue::Text(v)) => v,
            _ => panic!("text({name}): no such text property"),
        }
    }

    pub fn color(&self, name: &str) -> Color {
        match self.get(name).map(|p| p.value.as_color()) {
            Some(Some(v)) => v,
            _ => panic!("color({name}): no such color property"),
        }
    }

    pub fn vec3(&self, name: &str) -> [f64; 3] {
        match self.get(name).map(|p| p.value.as_vec3()) {
            Some(Some(v)) => v,
            _ => panic!("vec3({name}): no such vec3 property"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_set() -> PropertySet {
        PropertySet::default()
            .with(
                "radius",
                PropertyValue::Float(2.0),
                PropertyMetadata::slider("Radius", 0.0, 10.0, 0.1),
            )
            .with(
                "copies",
                PropertyValue::Int(3),
                PropertyMetadata::number("Copies"),
            )
            .with(
                "tint",
                PropertyValue::Color(Color::new(255, 0, 0)),
                PropertyMetadata::color("Tint"),
            )
    }

    #[test]
    fn declaration_order_is_preserved() {
        let names: Vec<_> = sample_set().iter().map(|p| p.name.clone()).collect();
        assert_eq!(names, vec!["radius", "copies", "tint"]);

        let serialized = sample_set().serialized();
        assert_eq!(serialized[0].0, "radius");
        assert_eq!(serialized[2].0, "tint");
    }

    #[test]
    fn clone_is_value_isolated() {
        let original = sample_set();
        let mut copy = original.clone();
        copy.set_value("radius", PropertyValue::Float(9.0)).unwrap();
        assert_eq!(original.float("radius"), 2.0);
        assert_eq!(copy.float("radius"), 9.0);
    }

    #[test]
    fn set_value_rejects_unknown_names() {
        let mut set = sample_set();
        assert!(set.set_value("no-such", PropertyValue::Float(1.0)).is_err());
    }

    #[test]
    fn apply_serialized_follows_deserialization_rules() {
        let mut set = sample_set();
        set.apply_serialized(&[
            // Known name: applied, even though it's outside the slider bounds.
            ("radius".to_string(), PropertyValue::Float(99.0)),
            // Unknown name: skipped.
            ("ghost".to_string(), PropertyValue::Float(1.0)),
            // Incompatible kind for "copies": skipped, default kept.
            ("copies".to_string(), PropertyValue::Text("three".to_string())),
        ]);
        assert_eq!(set.float("radius"), 99.0);
        assert_eq!(set.int("copies"), 3);
    }

    #[test]
    fn apply_serialized_widens_ints_to_floats() {
        // JSON round trips 2.0 as 2; a float property must accept it.
        let mut set = sample_set();
        set.apply_serialized(&[("radius".to_string(), PropertyValue::Int(5))]);
        assert_eq!(set.float("radius"), 5.0);
    }

    #[test]
    fn untagged_values_round_trip_as_plain_json() {
        let v = PropertyValue::Vec3([1.0, 2.0, 3.0]);
        assert_eq!(serde_json::to_string(&v).unwrap(), "[1.0,2.0,3.0]");
        let back: PropertyValue = serde_json::from_str("[1.0,2.0,3.0]").unwrap();
        assert_eq!(back, v);

        let back: PropertyValue = serde_json::from_str("\"#00ff00\"").unwrap();
        assert_eq!(back, PropertyValue::Color(Color::new(0, 255, 0)));

        let back: PropertyValue = serde_json::from_str("\"hello\"").unwrap();
        assert_eq!(back, PropertyValue::Text("hello".to_string()));
    }

    #[test]
    #[should_panic(expected = "duplicate property name")]
    fn duplicate_declaration_panics() {
        let _ = PropertySet::default()
            .with("x", PropertyValue::Float(0.0), PropertyMetadata::number("X"))
            .with("x", PropertyValue::Float(1.0), PropertyMetadata::number("X"));
    }
}
