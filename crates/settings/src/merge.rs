//! Deep merge of partial configuration over a base.
//!
//! For every field present in the override: nested records merge
//! recursively, anything else replaces the base value. Fields absent from
//! the override keep the base value.

use serde_json::{Map, Value};

use crate::config::{
    CameraConfig, CameraDelta, ColorConfig, ColorsDelta, ConfigDelta, CubeConfig,
};

/// Types that can absorb a partial update of type `D`.
pub trait DeepMerge<D: ?Sized> {
    fn merge_from(&mut self, delta: &D);

    fn merged(&self, delta: &D) -> Self
    where
        Self: Clone,
    {
        let mut next = self.clone();
        next.merge_from(delta);
        next
    }
}

fn take<T: Clone>(slot: &mut T, value: &Option<T>) {
    if let Some(value) = value {
        *slot = value.clone();
    }
}

fn take_opt<T: Clone>(slot: &mut Option<T>, value: &Option<T>) {
    if value.is_some() {
        slot.clone_from(value);
    }
}

fn merge_nested<T, D>(slot: &mut Option<T>, value: &Option<D>)
where
    T: DeepMerge<D> + Default,
{
    if let Some(delta) = value {
        slot.get_or_insert_with(T::default).merge_from(delta);
    }
}

impl DeepMerge<ConfigDelta> for CubeConfig {
    fn merge_from(&mut self, delta: &ConfigDelta) {
        take(&mut self.auto_rotate, &delta.auto_rotate);
        take(&mut self.show_cube_wireframe, &delta.show_cube_wireframe);
        take(&mut self.show_nodes, &delta.show_nodes);
        take(&mut self.show_node_numbers, &delta.show_node_numbers);
        take(&mut self.line_mode, &delta.line_mode);
        take(&mut self.node_size, &delta.node_size);
        take(&mut self.rotation_speed, &delta.rotation_speed);
        if let Some(camera) = &delta.camera {
            self.camera.merge_from(camera);
        }
        if let Some(colors) = &delta.colors {
            self.colors.merge_from(colors);
        }
        self.extra.merge_from(&delta.extra);
    }
}

impl DeepMerge<CameraDelta> for CameraConfig {
    fn merge_from(&mut self, delta: &CameraDelta) {
        take(&mut self.fov, &delta.fov);
        take(&mut self.distance, &delta.distance);
    }
}

impl DeepMerge<ColorsDelta> for ColorConfig {
    fn merge_from(&mut self, delta: &ColorsDelta) {
        take(&mut self.background, &delta.background);
        take(&mut self.nodes, &delta.nodes);
        take(&mut self.wireframe, &delta.wireframe);
        take(&mut self.sequence_line, &delta.sequence_line);
    }
}

/// Composing deltas: the later delta wins field by field.
impl DeepMerge<ConfigDelta> for ConfigDelta {
    fn merge_from(&mut self, delta: &ConfigDelta) {
        take_opt(&mut self.auto_rotate, &delta.auto_rotate);
        take_opt(&mut self.show_cube_wireframe, &delta.show_cube_wireframe);
        take_opt(&mut self.show_nodes, &delta.show_nodes);
        take_opt(&mut self.show_node_numbers, &delta.show_node_numbers);
        take_opt(&mut self.line_mode, &delta.line_mode);
        take_opt(&mut self.node_size, &delta.node_size);
        take_opt(&mut self.rotation_speed, &delta.rotation_speed);
        merge_nested(&mut self.camera, &delta.camera);
        merge_nested(&mut self.colors, &delta.colors);
        self.extra.merge_from(&delta.extra);
    }
}

impl DeepMerge<CameraDelta> for CameraDelta {
    fn merge_from(&mut self, delta: &CameraDelta) {
        take_opt(&mut self.fov, &delta.fov);
        take_opt(&mut self.distance, &delta.distance);
    }
}

impl DeepMerge<ColorsDelta> for ColorsDelta {
    fn merge_from(&mut self, delta: &ColorsDelta) {
        take_opt(&mut self.background, &delta.background);
        take_opt(&mut self.nodes, &delta.nodes);
        take_opt(&mut self.wireframe, &delta.wireframe);
        take_opt(&mut self.sequence_line, &delta.sequence_line);
    }
}

/// Untyped keys. `null` is a value like any other and replaces the base.
impl DeepMerge<Map<String, Value>> for Map<String, Value> {
    fn merge_from(&mut self, delta: &Map<String, Value>) {
        for (key, value) in delta {
            if let (Some(Value::Object(base)), Value::Object(over)) = (self.get_mut(key), value) {
                base.merge_from(over);
                continue;
            }
            self.insert(key.clone(), value.clone());
        }
    }
}

impl DeepMerge<Value> for Value {
    fn merge_from(&mut self, delta: &Value) {
        match (self, delta) {
            (Value::Object(base), Value::Object(over)) => base.merge_from(over),
            (slot, value) => *slot = value.clone(),
        }
    }
}
