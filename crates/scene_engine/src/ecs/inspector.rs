//! Property inspection seam
//!
//! Components describe their editable fields through the [`Inspector`]
//! trait, in the immediate-mode style of an editor UI: every call shows one
//! widget and returns whether the user changed the value. [`PropertySheet`]
//! is a headless implementation that records the widgets and applies queued
//! edits, which is what tools and tests use.

use std::collections::HashMap;

use crate::foundation::math::Vec3;

/// Immediate-mode property editor
pub trait Inspector {
    /// Read-only text
    fn label(&mut self, text: &str);

    /// Boolean toggle
    fn checkbox(&mut self, label: &str, value: &mut bool) -> bool;

    /// Scalar drag field; `min >= max` means unbounded
    fn drag_float(&mut self, label: &str, value: &mut f32, speed: f32, min: f32, max: f32) -> bool;

    /// Vector drag field
    fn drag_vec3(&mut self, label: &str, value: &mut Vec3, speed: f32) -> bool;

    /// RGB colour picker
    fn color_edit(&mut self, label: &str, value: &mut Vec3) -> bool;

    /// Selection from a fixed list
    fn combo(&mut self, label: &str, current: &mut usize, items: &[&str]) -> bool;
}

/// Value shown by or queued for one widget
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    /// Label text
    Text(String),
    /// Checkbox state
    Bool(bool),
    /// Drag field value
    Float(f32),
    /// Vector field value
    Vec3(Vec3),
    /// Colour value
    Color(Vec3),
    /// Combo selection index
    Choice(usize),
}

/// Headless [`Inspector`] recording every widget it is shown
///
/// Edits queued with [`PropertySheet::queue_edit`] are applied when the
/// widget with the matching label is next shown.
#[derive(Debug, Clone, Default)]
pub struct PropertySheet {
    properties: Vec<(String, PropertyValue)>,
    edits: HashMap<String, PropertyValue>,
}

impl PropertySheet {
    /// Create an empty sheet
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a value for the widget labelled `label`
    pub fn queue_edit(&mut self, label: impl Into<String>, value: PropertyValue) {
        self.edits.insert(label.into(), value);
    }

    /// Widgets shown so far, in order
    pub fn properties(&self) -> &[(String, PropertyValue)] {
        &self.properties
    }

    /// Last value shown for `label`
    pub fn get(&self, label: &str) -> Option<&PropertyValue> {
        self.properties
            .iter()
            .rev()
            .find(|(name, _)| name == label)
            .map(|(_, value)| value)
    }

    /// Edits that never met a matching widget
    pub fn pending_edits(&self) -> usize {
        self.edits.len()
    }

    /// Forget recorded widgets (queued edits are kept)
    pub fn clear(&mut self) {
        self.properties.clear();
    }

    fn record(&mut self, label: &str, value: PropertyValue) {
        self.properties.push((label.to_string(), value));
    }

    fn take_edit(&mut self, label: &str) -> Option<PropertyValue> {
        self.edits.remove(label)
    }
}

impl Inspector for PropertySheet {
    fn label(&mut self, text: &str) {
        self.record(text, PropertyValue::Text(text.to_string()));
    }

    fn checkbox(&mut self, label: &str, value: &mut bool) -> bool {
        let changed = match self.take_edit(label) {
            Some(PropertyValue::Bool(v)) => {
                *value = v;
                true
            }
            Some(other) => {
                log::warn!("PropertySheet: '{}' expects a bool, got {:?}", label, other);
                false
            }
            None => false,
        };
        self.record(label, PropertyValue::Bool(*value));
        changed
    }

    fn drag_float(&mut self, label: &str, value: &mut f32, _speed: f32, min: f32, max: f32) -> bool {
        let changed = match self.take_edit(label) {
            Some(PropertyValue::Float(v)) => {
                *value = if min < max { v.clamp(min, max) } else { v };
                true
            }
            Some(other) => {
                log::warn!("PropertySheet: '{}' expects a float, got {:?}", label, other);
                false
            }
            None => false,
        };
        self.record(label, PropertyValue::Float(*value));
        changed
    }

    fn drag_vec3(&mut self, label: &str, value: &mut Vec3, _speed: f32) -> bool {
        let changed = match self.take_edit(label) {
            Some(PropertyValue::Vec3(v)) => {
                *value = v;
                true
            }
            Some(other) => {
                log::warn!("PropertySheet: '{}' expects a vector, got {:?}", label, other);
                false
            }
            None => false,
        };
        self.record(label, PropertyValue::Vec3(*value));
        changed
    }

    fn color_edit(&mut self, label: &str, value: &mut Vec3) -> bool {
        let changed = match self.take_edit(label) {
            Some(PropertyValue::Color(v)) => {
                *value = v.map(|c| c.clamp(0.0, 1.0));
                true
            }
            Some(other) => {
                log::warn!("PropertySheet: '{}' expects a colour, got {:?}", label, other);
                false
            }
            None => false,
        };
        self.record(label, PropertyValue::Color(*value));
        changed
    }

    fn combo(&mut self, label: &str, current: &mut usize, items: &[&str]) -> bool {
        let changed = match self.take_edit(label) {
            Some(PropertyValue::Choice(i)) if i < items.len() => {
                *current = i;
                true
            }
            Some(other) => {
                log::warn!("PropertySheet: '{}' rejected {:?}", label, other);
                false
            }
            None => false,
        };
        self.record(label, PropertyValue::Choice(*current));
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_widgets_in_order() {
        let mut sheet = PropertySheet::new();
        let mut flag = true;
        let mut speed = 2.0;

        sheet.label("Header");
        assert!(!sheet.checkbox("Flag", &mut flag));
        assert!(!sheet.drag_float("Speed", &mut speed, 0.1, 0.0, 10.0));

        let labels: Vec<_> = sheet.properties().iter().map(|(l, _)| l.as_str()).collect();
        assert_eq!(labels, vec!["Header", "Flag", "Speed"]);
        assert_eq!(sheet.get("Speed"), Some(&PropertyValue::Float(2.0)));
    }

    #[test]
    fn test_queued_edits_apply_and_clamp() {
        let mut sheet = PropertySheet::new();
        sheet.queue_edit("Speed", PropertyValue::Float(50.0));
        sheet.queue_edit("Axis", PropertyValue::Choice(2));

        let mut speed = 1.0;
        let mut axis = 1;
        assert!(sheet.drag_float("Speed", &mut speed, 0.1, 0.0, 10.0));
        assert!(sheet.combo("Axis", &mut axis, &["X", "Y", "Z"]));

        assert_eq!(speed, 10.0);
        assert_eq!(axis, 2);
        assert_eq!(sheet.pending_edits(), 0);
    }

    #[test]
    fn test_mismatched_edit_is_dropped() {
        let mut sheet = PropertySheet::new();
        sheet.queue_edit("Flag", PropertyValue::Float(1.0));
        sheet.queue_edit("Axis", PropertyValue::Choice(9));

        let mut flag = false;
        let mut axis = 0;
        assert!(!sheet.checkbox("Flag", &mut flag));
        assert!(!sheet.combo("Axis", &mut axis, &["X", "Y"]));
        assert!(!flag);
        assert_eq!(axis, 0);
    }
}
