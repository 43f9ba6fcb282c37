use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Effective configuration of a cube view. Every field has a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CubeConfig {
    /// Spin the cube when the user is not dragging it.
    pub auto_rotate: bool,
    pub show_cube_wireframe: bool,
    pub show_nodes: bool,
    pub show_node_numbers: bool,
    pub line_mode: LineMode,
    /// Sphere radius in world units.
    pub node_size: f32,
    /// Radians added to the cube rotation each frame.
    pub rotation_speed: f32,
    pub camera: CameraConfig,
    pub colors: ColorConfig,
    /// Keys this crate does not know about, kept as given.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for CubeConfig {
    fn default() -> Self {
        Self {
            auto_rotate: true,
            show_cube_wireframe: true,
            show_nodes: true,
            show_node_numbers: true,
            line_mode: LineMode::Full,
            node_size: 0.15,
            rotation_speed: 0.003,
            camera: CameraConfig::default(),
            colors: ColorConfig::default(),
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    pub fov: f32,
    /// Distance from the cube centre.
    pub distance: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov: 75.0,
            distance: 25.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColorConfig {
    pub background: Rgb,
    pub nodes: Rgb,
    pub wireframe: Rgb,
    pub sequence_line: Rgb,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            background: Rgb(0xffffff),
            nodes: Rgb(0x333333),
            wireframe: Rgb(0x333333),
            sequence_line: Rgb(0x000000),
        }
    }
}

/// Packed `0xRRGGBB` colour. Bits above the low 24 are carried but ignored
/// when split into channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rgb(pub u32);

impl Rgb {
    pub const fn from_channels(r: u8, g: u8, b: u8) -> Self {
        Self(((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    pub const fn channels(self) -> [u8; 3] {
        [
            ((self.0 >> 16) & 0xff) as u8,
            ((self.0 >> 8) & 0xff) as u8,
            (self.0 & 0xff) as u8,
        ]
    }

    /// Channels in `0.0..=1.0`.
    pub fn to_f32(self) -> [f32; 3] {
        self.channels().map(|c| c as f32 / 255.0)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.0)
    }
}

/// Which numbers the sequence line passes through.
///
/// Unrecognised names are kept verbatim and draw the full sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LineMode {
    #[default]
    Full,
    Even,
    Odd,
    Off,
    Unrecognized(String),
}

impl LineMode {
    pub const ALL: [LineMode; 4] = [LineMode::Full, LineMode::Even, LineMode::Odd, LineMode::Off];

    pub fn as_str(&self) -> &str {
        match self {
            LineMode::Full => "full",
            LineMode::Even => "even",
            LineMode::Odd => "odd",
            LineMode::Off => "none",
            LineMode::Unrecognized(name) => name,
        }
    }

    pub fn draws_line(&self) -> bool {
        !matches!(self, LineMode::Off)
    }

    /// Whether `number` is a vertex of the sequence line.
    pub fn includes(&self, number: u32) -> bool {
        match self {
            LineMode::Even => number % 2 == 0,
            LineMode::Odd => number % 2 == 1,
            LineMode::Off => false,
            LineMode::Full | LineMode::Unrecognized(_) => true,
        }
    }
}

impl From<String> for LineMode {
    fn from(value: String) -> Self {
        match value.as_str() {
            "full" => LineMode::Full,
            "even" => LineMode::Even,
            "odd" => LineMode::Odd,
            "none" => LineMode::Off,
            _ => LineMode::Unrecognized(value),
        }
    }
}

impl From<&str> for LineMode {
    fn from(value: &str) -> Self {
        LineMode::from(value.to_owned())
    }
}

impl From<LineMode> for String {
    fn from(value: LineMode) -> Self {
        match value {
            LineMode::Unrecognized(name) => name,
            other => other.as_str().to_owned(),
        }
    }
}

impl fmt::Display for LineMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Partial configuration. `None` means "not part of this update".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfigDelta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_rotate: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_cube_wireframe: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_nodes: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_node_numbers: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_mode: Option<LineMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_size: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation_speed: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub camera: Option<CameraDelta>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colors: Option<ColorsDelta>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ConfigDelta {
    pub fn is_empty(&self) -> bool {
        *self == ConfigDelta::default()
    }

    pub fn auto_rotate(mut self, value: bool) -> Self {
        self.auto_rotate = Some(value);
        self
    }

    pub fn show_cube_wireframe(mut self, value: bool) -> Self {
        self.show_cube_wireframe = Some(value);
        self
    }

    pub fn show_nodes(mut self, value: bool) -> Self {
        self.show_nodes = Some(value);
        self
    }

    pub fn show_node_numbers(mut self, value: bool) -> Self {
        self.show_node_numbers = Some(value);
        self
    }

    pub fn line_mode(mut self, value: impl Into<LineMode>) -> Self {
        self.line_mode = Some(value.into());
        self
    }

    pub fn node_size(mut self, value: f32) -> Self {
        self.node_size = Some(value);
        self
    }

    pub fn rotation_speed(mut self, value: f32) -> Self {
        self.rotation_speed = Some(value);
        self
    }

    pub fn fov(mut self, value: f32) -> Self {
        self.camera.get_or_insert_with(Default::default).fov = Some(value);
        self
    }

    pub fn distance(mut self, value: f32) -> Self {
        self.camera.get_or_insert_with(Default::default).distance = Some(value);
        self
    }

    pub fn background(mut self, value: Rgb) -> Self {
        self.colors.get_or_insert_with(Default::default).background = Some(value);
        self
    }

    pub fn node_color(mut self, value: Rgb) -> Self {
        self.colors.get_or_insert_with(Default::default).nodes = Some(value);
        self
    }

    pub fn wireframe_color(mut self, value: Rgb) -> Self {
        self.colors.get_or_insert_with(Default::default).wireframe = Some(value);
        self
    }

    pub fn sequence_line_color(mut self, value: Rgb) -> Self {
        self.colors.get_or_insert_with(Default::default).sequence_line = Some(value);
        self
    }

    pub fn extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Fields of `colors` present in this delta, or an empty delta.
    pub fn colors(&self) -> ColorsDelta {
        self.colors.clone().unwrap_or_default()
    }

    /// Fields of `camera` present in this delta, or an empty delta.
    pub fn camera(&self) -> CameraDelta {
        self.camera.clone().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraDelta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fov: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColorsDelta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<Rgb>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nodes: Option<Rgb>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wireframe: Option<Rgb>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequence_line: Option<Rgb>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_match_documented_values() {
        let config = CubeConfig::default();
        assert!(config.auto_rotate);
        assert!(config.show_cube_wireframe);
        assert!(config.show_nodes);
        assert!(config.show_node_numbers);
        assert_eq!(config.line_mode, LineMode::Full);
        assert_eq!(config.node_size, 0.15);
        assert_eq!(config.rotation_speed, 0.003);
        assert_eq!(config.camera.fov, 75.0);
        assert_eq!(config.camera.distance, 25.0);
        assert_eq!(config.colors.background, Rgb(0xffffff));
        assert_eq!(config.colors.sequence_line, Rgb(0x000000));
    }

    #[test]
    fn delta_parses_camel_case_json() {
        let delta: ConfigDelta = serde_json::from_value(json!({
            "lineMode": "even",
            "showNodeNumbers": false,
            "camera": { "fov": 60 },
            "colors": { "sequenceLine": 16711680 },
            "labelFont": "monospace"
        }))
        .unwrap();

        assert_eq!(delta.line_mode, Some(LineMode::Even));
        assert_eq!(delta.show_node_numbers, Some(false));
        assert_eq!(delta.camera().fov, Some(60.0));
        assert_eq!(delta.camera().distance, None);
        assert_eq!(delta.colors().sequence_line, Some(Rgb(0xff0000)));
        assert_eq!(delta.extra.get("labelFont"), Some(&json!("monospace")));
        assert_eq!(delta.auto_rotate, None);
    }

    #[test]
    fn unknown_line_mode_round_trips_verbatim() {
        let mode: LineMode = serde_json::from_value(json!("zigzag")).unwrap();
        assert_eq!(mode, LineMode::Unrecognized("zigzag".into()));
        assert!(mode.draws_line());
        assert!(mode.includes(7));
        assert_eq!(serde_json::to_value(&mode).unwrap(), json!("zigzag"));
    }

    #[test]
    fn line_mode_membership() {
        assert!(LineMode::Even.includes(4));
        assert!(!LineMode::Even.includes(5));
        assert!(LineMode::Odd.includes(5));
        assert!(!LineMode::Off.includes(5));
        assert!(!LineMode::Off.draws_line());
        assert_eq!(LineMode::from("none"), LineMode::Off);
        assert_eq!(LineMode::Off.to_string(), "none");
    }

    #[test]
    fn rgb_channels() {
        let color = Rgb::from_channels(0x12, 0x34, 0x56);
        assert_eq!(color, Rgb(0x123456));
        assert_eq!(color.channels(), [0x12, 0x34, 0x56]);
        assert_eq!(color.to_string(), "#123456");
        assert_eq!(Rgb(0xff_000000 | 0x0000ff).channels(), [0, 0, 0xff]);
    }

    #[test]
    fn empty_delta_serializes_to_empty_object() {
        assert!(ConfigDelta::default().is_empty());
        assert_eq!(serde_json::to_value(ConfigDelta::default()).unwrap(), json!({}));
        assert!(!ConfigDelta::default().fov(40.0).is_empty());
    }
}
