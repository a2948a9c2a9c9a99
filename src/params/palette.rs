use crate::foundation::core::Rgb8;
use crate::foundation::error::{DreamError, DreamResult};
use crate::foundation::math::unit_index;

/// Palette used until the user edits it.
pub const DEFAULT_PALETTE: [&str; 5] = ["#1e0326", "#f18f96", "#6702ff", "#ff6c08", "#a0f5ff"];

/// Colour appended by [`Palette::add`].
pub const NEW_COLOR: &str = "#ffffff";

/// Parse `#rgb` / `#rrggbb` (leading `#` optional). Anything unparsable is black.
pub fn parse_hex(hex: &str) -> Rgb8 {
    let mut h = hex.trim();
    if let Some(rest) = h.strip_prefix('#') {
        h = rest;
    }
    let expanded;
    if h.len() == 3 && h.is_ascii() {
        expanded = h.chars().flat_map(|c| [c, c]).collect::<String>();
        h = &expanded;
    }
    let digits = h.bytes().take_while(u8::is_ascii_hexdigit).count();
    if digits == 0 {
        return Rgb8::BLACK;
    }
    let Ok(num) = u32::from_str_radix(&h[..digits], 16) else {
        return Rgb8::BLACK;
    };
    Rgb8 {
        r: ((num >> 16) & 255) as u8,
        g: ((num >> 8) & 255) as u8,
        b: (num & 255) as u8,
    }
}

/// Ordered list of hex colours; never empty.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Palette {
    colors: Vec<String>,
}

impl Palette {
    /// Palette from hex strings; errors when `colors` is empty.
    pub fn new<I, S>(colors: I) -> DreamResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let colors: Vec<String> = colors.into_iter().map(Into::into).collect();
        if colors.is_empty() {
            return Err(DreamError::validation("palette must hold at least one colour"));
        }
        Ok(Self { colors })
    }

    /// Colour count, at least 1.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always `false` for a constructed palette.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Colours as entered.
    pub fn hex(&self) -> &[String] {
        &self.colors
    }

    /// Colours parsed to RGB.
    pub fn rgb(&self) -> Vec<Rgb8> {
        self.colors.iter().map(|c| parse_hex(c)).collect()
    }

    /// First colour; the background base fill.
    pub fn base(&self) -> Rgb8 {
        self.colors.first().map(|c| parse_hex(c)).unwrap_or_default()
    }

    /// Append white.
    pub fn add(&mut self) {
        self.colors.push(NEW_COLOR.to_owned());
    }

    /// Remove entry `index`. Refused (returns `false`) when it would empty the palette.
    pub fn remove(&mut self, index: usize) -> bool {
        if self.colors.len() <= 1 || index >= self.colors.len() {
            return false;
        }
        self.colors.remove(index);
        true
    }

    /// Replace the colour at `index`; `false` when out of range.
    pub fn edit(&mut self, index: usize, hex: impl Into<String>) -> bool {
        match self.colors.get_mut(index) {
            Some(slot) => {
                *slot = hex.into();
                true
            }
            None => false,
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: DEFAULT_PALETTE.iter().map(|c| (*c).to_owned()).collect(),
        }
    }
}

impl TryFrom<Vec<String>> for Palette {
    type Error = DreamError;

    fn try_from(colors: Vec<String>) -> DreamResult<Self> {
        Self::new(colors)
    }
}

impl From<Palette> for Vec<String> {
    fn from(p: Palette) -> Self {
        p.colors
    }
}

/// Parsed palette as the generators consume it.
#[derive(Clone, Debug)]
pub struct PaletteRgb(Vec<Rgb8>);

impl PaletteRgb {
    /// Parse every colour of `palette`.
    pub fn new(palette: &Palette) -> Self {
        Self(palette.rgb())
    }

    /// Colour count.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `true` for an empty list.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Cyclic lookup (`i % len`).
    pub fn cycle(&self, i: usize) -> Rgb8 {
        if self.0.is_empty() {
            return Rgb8::BLACK;
        }
        self.0[i % self.0.len()]
    }

    /// Colour for a noise value in `[0, 1)`.
    pub fn for_noise(&self, n: f64) -> Rgb8 {
        if self.0.is_empty() {
            return Rgb8::BLACK;
        }
        self.0[unit_index(n, self.0.len())]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/params/palette.rs"]
mod tests;
