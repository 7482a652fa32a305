use std::{fmt, str::FromStr};

use anyhow::bail;
use serde::Deserialize;

/// A color with straight (non-premultiplied) alpha, all components in sRGB space from 0-1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    fn hex(rgb: u32) -> Self {
        Self::rgb(
            ((rgb >> 16) & 0xff) as f32 / 255.0,
            ((rgb >> 8) & 0xff) as f32 / 255.0,
            (rgb & 0xff) as f32 / 255.0,
        )
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Converts the color channels from sRGB to linear light, leaving alpha alone.
    pub fn to_linear(self) -> Self {
        fn channel(c: f32) -> f32 {
            if c <= 0.04045 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }
        Self {
            r: channel(self.r),
            g: channel(self.g),
            b: channel(self.b),
            a: self.a,
        }
    }

    pub fn premultiplied(self) -> [f32; 4] {
        [self.r * self.a, self.g * self.a, self.b * self.a, self.a]
    }
}

impl FromStr for Rgba {
    type Err = anyhow::Error;

    /// Parses `#rrggbb`.
    fn from_str(s: &str) -> anyhow::Result<Self> {
        let Some(digits) = s.strip_prefix('#') else {
            bail!("color '{s}' must start with '#'");
        };
        if digits.len() != 6 {
            bail!("color '{s}' must have the form #rrggbb");
        }
        let rgb = u32::from_str_radix(digits, 16)?;
        Ok(Self::hex(rgb))
    }
}

/// One of the fixed colors a stroke can be painted with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaletteColor {
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    Indigo,
    Purple,
}

impl PaletteColor {
    /// Every palette entry, in display order.
    pub const ALL: [Self; 7] = [
        Self::Red,
        Self::Orange,
        Self::Yellow,
        Self::Green,
        Self::Blue,
        Self::Indigo,
        Self::Purple,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Orange => "orange",
            Self::Yellow => "yellow",
            Self::Green => "green",
            Self::Blue => "blue",
            Self::Indigo => "indigo",
            Self::Purple => "purple",
        }
    }

    pub fn rgba(self) -> Rgba {
        match self {
            Self::Red => Rgba::hex(0xff3b30),
            Self::Orange => Rgba::hex(0xff9500),
            Self::Yellow => Rgba::hex(0xffcc00),
            Self::Green => Rgba::hex(0x34c759),
            Self::Blue => Rgba::hex(0x007aff),
            Self::Indigo => Rgba::hex(0x5856d6),
            Self::Purple => Rgba::hex(0xaf52de),
        }
    }
}

impl fmt::Display for PaletteColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Tracks which palette entry is selected. There is always exactly one.
#[derive(Debug, Clone)]
pub struct Palette {
    selected: PaletteColor,
}

impl Palette {
    pub fn new(selected: PaletteColor) -> Self {
        Self { selected }
    }

    pub fn selected(&self) -> PaletteColor {
        self.selected
    }

    pub fn is_selected(&self, color: PaletteColor) -> bool {
        self.selected == color
    }

    /// Selects `color`, returning whether the selection changed.
    pub fn select(&mut self, color: PaletteColor) -> bool {
        let changed = self.selected != color;
        self.selected = color;
        changed
    }
}
