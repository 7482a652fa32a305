use std::{fs, path::Path};

use anyhow::bail;
use serde::{de::Visitor, Deserialize};

use crate::{
    palette::{PaletteColor, Rgba},
    render::{Brush, DEFAULT_BRUSH_WIDTH},
};

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Name of the monitor to open the canvas on. Uses the current monitor if unset.
    pub monitor: Option<String>,
    #[serde(default = "default_true")]
    pub fullscreen: bool,
    #[serde(default)]
    pub background: Background,
    #[serde(default)]
    pub brush: BrushConfig,
    #[serde(default)]
    pub picker: PickerConfig,
    #[serde(default)]
    pub sound: SoundConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            monitor: None,
            fullscreen: true,
            background: Background::default(),
            brush: BrushConfig::default(),
            picker: PickerConfig::default(),
            sound: SoundConfig::default(),
        }
    }
}

impl Config {
    pub fn load<A: AsRef<Path>>(path: A) -> anyhow::Result<Self> {
        Self::load_impl(path.as_ref())
    }

    fn load_impl(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    fn parse(contents: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(contents)?;

        // Validate configuration.
        // - Every size has to be a positive number.
        // - Circular swatches have to fit inside the picker.
        // - Volume is a factor from 0-1.

        let sizes = [
            ("brush.width", config.brush.width),
            ("picker.radius", config.picker.radius),
            ("picker.size", config.picker.size),
            ("picker.swatch", config.picker.swatch),
        ];
        for (name, value) in sizes {
            if !(value.is_finite() && value > 0.0) {
                bail!("`{name}` must be a positive number (found {value})");
            }
        }

        let picker = &config.picker;
        if picker.layout == Layout::Circular && picker.radius + picker.swatch / 2.0 > picker.size / 2.0
        {
            bail!(
                "circular picker swatches don't fit: `picker.radius` + `picker.swatch` / 2 must be at most `picker.size` / 2 ({} > {})",
                picker.radius + picker.swatch / 2.0,
                picker.size / 2.0,
            );
        }

        if !(0.0..=1.0).contains(&config.sound.volume) {
            bail!(
                "`sound.volume` must be between 0 and 1 (found {})",
                config.sound.volume
            );
        }

        Ok(config)
    }
}

fn default_true() -> bool {
    true
}

/// Canvas background color, written as `"#rrggbb"`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Background(pub Rgba);

impl Default for Background {
    fn default() -> Self {
        Self(Rgba::WHITE)
    }
}

impl<'a> Deserialize<'a> for Background {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'a>,
    {
        struct FromStrVisitor;

        impl<'de> Visitor<'de> for FromStrVisitor {
            type Value = Background;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("color in the form \"#rrggbb\"")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(Background(v.parse().map_err(|e| {
                    E::custom(format_args!("invalid color '{v}': {e}"))
                })?))
            }
        }

        deserializer.deserialize_str(FromStrVisitor)
    }
}

#[derive(Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BrushConfig {
    pub width: f32,
    /// Paint dots over both ends of every stroke.
    pub explicit_caps: bool,
}

impl Default for BrushConfig {
    fn default() -> Self {
        let brush = Brush::default();
        Self {
            width: brush.width,
            explicit_caps: brush.explicit_caps,
        }
    }
}

impl BrushConfig {
    pub fn brush(&self) -> Brush {
        Brush {
            width: self.width,
            explicit_caps: self.explicit_caps,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// Swatches on a circle inside a floating, draggable box.
    Circular,
    /// A single row of swatches along the top edge.
    Linear,
}

#[derive(Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PickerConfig {
    pub layout: Layout,
    pub default_color: PaletteColor,
    /// Distance of the swatch centers from the center of a circular picker.
    pub radius: f32,
    /// Width and height of a circular picker.
    pub size: f32,
    /// Diameter of a single swatch.
    pub swatch: f32,
    pub draggable: bool,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            layout: Layout::Circular,
            default_color: PaletteColor::Blue,
            radius: 60.0,
            size: 200.0,
            swatch: DEFAULT_BRUSH_WIDTH,
            draggable: true,
        }
    }
}

#[derive(Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SoundConfig {
    pub enabled: bool,
    pub volume: f32,
}

impl Default for SoundConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            volume: 0.3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_example_config() {
        let config = Config::load("config.example.toml").unwrap();
        assert_eq!(config.picker.layout, Layout::Circular);
        assert_eq!(config.picker.default_color, PaletteColor::Blue);
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert!(config.fullscreen);
        assert_eq!(config.background, Background(Rgba::WHITE));
        assert_eq!(config.brush.width, DEFAULT_BRUSH_WIDTH);
        assert!(!config.brush.explicit_caps);
        assert_eq!(config.picker.radius, 60.0);
        assert!(config.sound.enabled);
    }

    #[test]
    fn parses_sections() {
        let config = Config::parse(
            r##"
            monitor = "HDMI-1"
            background = "#000000"

            [brush]
            width = 12.5
            explicit_caps = true

            [picker]
            layout = "linear"
            default_color = "red"

            [sound]
            enabled = false
            "##,
        )
        .unwrap();
        assert_eq!(config.monitor.as_deref(), Some("HDMI-1"));
        assert_eq!(config.background, Background(Rgba::BLACK));
        assert_eq!(config.brush.brush().width, 12.5);
        assert!(config.brush.brush().explicit_caps);
        assert_eq!(config.picker.layout, Layout::Linear);
        assert_eq!(config.picker.default_color, PaletteColor::Red);
        assert!(!config.sound.enabled);
    }

    #[test]
    fn rejects_invalid_values() {
        for toml in [
            "[brush]\nwidth = 0.0",
            "[picker]\nswatch = -1.0",
            "[picker]\nradius = 90.0",
            "[picker]\ndefault_color = \"magenta\"",
            "[sound]\nvolume = 1.5",
            "background = \"white\"",
            "colour = \"#ffffff\"",
        ] {
            assert!(Config::parse(toml).is_err(), "accepted {toml:?}");
        }
    }

    #[test]
    fn linear_layout_ignores_circle_fit() {
        Config::parse("[picker]\nlayout = \"linear\"\nradius = 500.0").unwrap();
    }
}
