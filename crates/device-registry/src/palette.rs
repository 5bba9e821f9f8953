//! Named colours understood in lighting phrases.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Lowercase colour names with their RGB values, in declaration order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColorPalette {
    colors: Vec<(String, Rgb)>,
}

impl ColorPalette {
    pub fn new(colors: impl IntoIterator<Item = (String, Rgb)>) -> Self {
        Self {
            colors: colors
                .into_iter()
                .map(|(name, rgb)| (name.to_lowercase(), rgb))
                .collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<Rgb> {
        let name = name.to_lowercase();
        self.colors
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, rgb)| *rgb)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.colors.iter().map(|(n, _)| n.as_str())
    }
}

const DEFAULT_COLORS: &[(&str, Rgb)] = &[
    ("red", Rgb::new(255, 0, 0)),
    ("green", Rgb::new(0, 255, 0)),
    ("blue", Rgb::new(0, 0, 255)),
    ("yellow", Rgb::new(255, 255, 0)),
    ("cyan", Rgb::new(0, 255, 255)),
    ("turquoise", Rgb::new(0, 255, 255)),
    ("magenta", Rgb::new(255, 0, 255)),
    ("purple", Rgb::new(255, 0, 255)),
    ("white", Rgb::new(255, 255, 255)),
    ("warm white", Rgb::new(255, 245, 230)),
    ("cool white", Rgb::new(173, 216, 230)),
    ("lavender", Rgb::new(230, 230, 250)),
    ("orange", Rgb::new(255, 165, 0)),
    ("pink", Rgb::new(255, 182, 193)),
    ("lime green", Rgb::new(50, 205, 50)),
    ("deep blue", Rgb::new(0, 0, 139)),
    ("gold", Rgb::new(255, 215, 0)),
    ("silver", Rgb::new(192, 192, 192)),
    ("bronze", Rgb::new(205, 127, 50)),
    ("teal", Rgb::new(0, 128, 128)),
    ("sky blue", Rgb::new(135, 206, 235)),
    ("slate gray", Rgb::new(112, 128, 144)),
];

impl Default for ColorPalette {
    fn default() -> Self {
        Self::new(
            DEFAULT_COLORS
                .iter()
                .map(|(name, rgb)| (name.to_string(), *rgb)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_palette() {
        let palette = ColorPalette::default();
        assert_eq!(palette.names().count(), 22);
        assert_eq!(palette.get("Warm White"), Some(Rgb::new(255, 245, 230)));
        assert_eq!(palette.get("purple"), palette.get("magenta"));
        assert!(!palette.contains("chartreuse"));
    }
}
