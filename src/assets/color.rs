use crate::foundation::core::Rgba8Premul;
use serde::{Deserialize, Serialize};

/// Straight-alpha color with channels in `0..=1`, as it appears in scene
/// JSON. Deserializes from a CSS-like hex string (`"#111111"`), an
/// `{r,g,b,a}` object, or an `[r,g,b]`/`[r,g,b,a]` array.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ColorDef {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl ColorDef {
    pub fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Straight RGBA8 bytes, the form consumed by gradient synthesis.
    pub fn to_straight_rgba8(self) -> [u8; 4] {
        fn to_u8(x: f64) -> u8 {
            (x.clamp(0.0, 1.0) * 255.0).round() as u8
        }

        [to_u8(self.r), to_u8(self.g), to_u8(self.b), to_u8(self.a)]
    }

    pub fn to_rgba8_premul(self) -> Rgba8Premul {
        let [r, g, b, a] = self.to_straight_rgba8();
        Rgba8Premul::from_straight_rgba(r, g, b, a)
    }
}

impl Default for ColorDef {
    /// Opaque black, the conventional veil tint for hero backgrounds.
    fn default() -> Self {
        Self::rgba(0.0, 0.0, 0.0, 1.0)
    }
}

impl<'de> Deserialize<'de> for ColorDef {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Hex(String),
            RgbaObj {
                r: f64,
                g: f64,
                b: f64,
                #[serde(default = "one")]
                a: f64,
            },
            Arr(Vec<f64>),
        }

        fn one() -> f64 {
            1.0
        }

        match Repr::deserialize(deserializer)? {
            Repr::Hex(s) => parse_hex(&s).map_err(serde::de::Error::custom),
            Repr::RgbaObj { r, g, b, a } => Ok(Self::rgba(r, g, b, a)),
            Repr::Arr(v) => {
                if v.len() == 3 {
                    Ok(Self::rgba(v[0], v[1], v[2], 1.0))
                } else if v.len() == 4 {
                    Ok(Self::rgba(v[0], v[1], v[2], v[3]))
                } else {
                    Err(serde::de::Error::custom(
                        "rgba array must have len 3 ([r,g,b]) or 4 ([r,g,b,a])",
                    ))
                }
            }
        }
    }
}

/// Parse `#rgb`, `#rrggbb`, or `#rrggbbaa`.
fn parse_hex(s: &str) -> Result<ColorDef, String> {
    let hex = s.strip_prefix('#').unwrap_or(s);
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(format!("invalid hex color '{s}'"));
    }

    fn channel(pair: &str) -> Result<f64, String> {
        u8::from_str_radix(pair, 16)
            .map(|v| f64::from(v) / 255.0)
            .map_err(|_| format!("invalid hex channel '{pair}'"))
    }

    match hex.len() {
        3 => {
            let mut ch = [0.0f64; 3];
            for (i, c) in hex.chars().enumerate() {
                let v = u8::from_str_radix(&c.to_string(), 16)
                    .map_err(|_| format!("invalid hex channel '{c}'"))?;
                ch[i] = f64::from(v * 17) / 255.0;
            }
            Ok(ColorDef::rgba(ch[0], ch[1], ch[2], 1.0))
        }
        6 => Ok(ColorDef::rgba(
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
            1.0,
        )),
        8 => Ok(ColorDef::rgba(
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
            channel(&hex[6..8])?,
        )),
        _ => Err(format!("hex color '{s}' must have 3, 6, or 8 digits")),
    }
}
