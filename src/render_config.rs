//! Style/composition payload handed to the render backend.
//!
//! The panel never interprets these fields; it forwards them unchanged with
//! every copy or save request.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderConfig {
    pub aspect_ratio: String,
    pub background: BackgroundConfig,
    pub camera: CameraConfig,
    pub audio: AudioConfig,
    pub cursor: CursorConfig,
    pub hotkeys: HotkeysConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackgroundConfig {
    pub source: BackgroundSource,
    pub blur: f64,
    pub padding: f64,
    pub rounding: f64,
    pub inset: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum BackgroundSource {
    Color([u8; 3]),
    Image(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraConfig {
    pub hide: bool,
    pub mirror: bool,
    pub position: CameraPosition,
    pub rounding: f64,
    pub shadow: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraPosition {
    pub x: String,
    pub y: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioConfig {
    pub mute: bool,
    pub improve: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CursorConfig {
    pub hide_when_idle: bool,
    pub size: u32,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotkeysConfig {
    pub show: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            aspect_ratio: "classic".to_string(),
            background: BackgroundConfig {
                source: BackgroundSource::Color([0, 0, 0]),
                blur: 0.0,
                padding: 0.0,
                rounding: 0.0,
                inset: 0.0,
            },
            camera: CameraConfig {
                hide: false,
                mirror: false,
                position: CameraPosition {
                    x: "left".to_string(),
                    y: "bottom".to_string(),
                },
                rounding: 0.0,
                shadow: 0.0,
            },
            audio: AudioConfig {
                mute: false,
                improve: false,
            },
            cursor: CursorConfig {
                hide_when_idle: false,
                size: 16,
                kind: "pointer".to_string(),
            },
            hotkeys: HotkeysConfig { show: false },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn default_serializes_to_backend_shape() {
        let value = serde_json::to_value(RenderConfig::default()).expect("serialize");
        assert_eq!(
            value,
            json!({
                "aspectRatio": "classic",
                "background": {
                    "source": { "type": "color", "value": [0, 0, 0] },
                    "blur": 0.0,
                    "padding": 0.0,
                    "rounding": 0.0,
                    "inset": 0.0
                },
                "camera": {
                    "hide": false,
                    "mirror": false,
                    "position": { "x": "left", "y": "bottom" },
                    "rounding": 0.0,
                    "shadow": 0.0
                },
                "audio": { "mute": false, "improve": false },
                "cursor": { "hideWhenIdle": false, "size": 16, "type": "pointer" },
                "hotkeys": { "show": false }
            })
        );
    }
}
