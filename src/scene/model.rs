use crate::{
    assets::color::ColorDef,
    foundation::core::SurfaceSize,
    foundation::error::{SpotdriftError, SpotdriftResult},
};

/// Declarative description of one animated hero scene: the surface, the
/// shared tint, motion tuning, and an ordered item list (draw order =
/// list order).
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Scene {
    pub surface: SurfaceSize,
    /// Default illumination tint for items without their own color.
    pub color: ColorDef,
    /// Optional opaque backdrop; the surface clears to transparent without it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<ColorDef>,
    #[serde(default)]
    pub tuning: Tuning,
    pub items: Vec<ItemSpec>,
}

/// One image+region pairing: what to draw and where it may drift.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct ItemSpec {
    /// Image source path, resolved relative to the scene root.
    pub source: String,
    /// Drawn width as a percentage of surface width.
    pub width_pct: f64,
    pub wrap: WrapRect,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<ColorDef>,
}

/// Placement rectangle in percentages of the surface dimensions.
///
/// Values are expected in `[0, 100]` but are deliberately not clamped:
/// out-of-range values drift out of bounds exactly as given.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct WrapRect {
    pub x0: f64,
    pub y0: f64,
    pub width: f64,
    pub height: f64,
}

/// Motion and illumination tuning, per animator instance.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Drift speed; the per-frame phase step is
    /// `animation_speed * frame_interval / 1000`.
    pub animation_speed: f64,
    /// Nominal frame period in seconds. Motion speed is tied to tick
    /// frequency, not to measured wall-clock time.
    pub frame_interval: f64,
    /// Fraction of the gradient ramp spent fading; `1.0` is a pure linear
    /// fade from tint to transparent, smaller values hold an opaque
    /// plateau before the fade.
    pub spotlight_power: f64,
    /// Hot-spot orbit radius as a fraction of the gradient radius.
    pub spotlight_range: f64,
    /// Hot-spot angular speed relative to the drift phase.
    pub rotation_speed: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            animation_speed: 500.0,
            frame_interval: 1.0 / 60.0,
            spotlight_power: 1.0,
            spotlight_range: 0.2,
            rotation_speed: 2.0,
        }
    }
}

impl Tuning {
    /// Phase advance applied once per rendered frame.
    pub fn phase_step(&self) -> f64 {
        self.animation_speed * self.frame_interval / 1000.0
    }

    pub fn validate(&self) -> SpotdriftResult<()> {
        if !self.frame_interval.is_finite() || self.frame_interval <= 0.0 {
            return Err(SpotdriftError::validation("frame_interval must be > 0"));
        }
        if !self.animation_speed.is_finite() {
            return Err(SpotdriftError::validation("animation_speed must be finite"));
        }
        if !(0.0..=1.0).contains(&self.spotlight_power) {
            return Err(SpotdriftError::validation(
                "spotlight_power must be within [0, 1]",
            ));
        }
        if !self.spotlight_range.is_finite() || !self.rotation_speed.is_finite() {
            return Err(SpotdriftError::validation(
                "spotlight_range and rotation_speed must be finite",
            ));
        }
        Ok(())
    }
}

impl Scene {
    pub fn validate(&self) -> SpotdriftResult<()> {
        if self.surface.is_zero_area() {
            return Err(SpotdriftError::validation(
                "surface width/height must be > 0",
            ));
        }
        self.tuning.validate()?;

        for (idx, item) in self.items.iter().enumerate() {
            if item.source.trim().is_empty() {
                return Err(SpotdriftError::validation(format!(
                    "item {idx} has an empty image source"
                )));
            }
            // Percentages are accepted as-is, including out-of-range values,
            // but NaN/inf would poison every downstream computation.
            let nums = [
                item.width_pct,
                item.wrap.x0,
                item.wrap.y0,
                item.wrap.width,
                item.wrap.height,
            ];
            if nums.iter().any(|v| !v.is_finite()) {
                return Err(SpotdriftError::validation(format!(
                    "item {idx} has a non-finite percentage"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn basic_scene() -> Scene {
        Scene {
            surface: SurfaceSize::new(1920, 1080),
            color: ColorDef::rgba(0.07, 0.07, 0.07, 1.0),
            background: None,
            tuning: Tuning::default(),
            items: vec![ItemSpec {
                source: "shapes/circle.svg".to_string(),
                width_pct: 9.0,
                wrap: WrapRect {
                    x0: 18.0,
                    y0: 4.0,
                    width: 9.0,
                    height: 30.0,
                },
                color: None,
            }],
        }
    }

    #[test]
    fn json_roundtrip() {
        let scene = basic_scene();
        let s = serde_json::to_string_pretty(&scene).unwrap();
        let de: Scene = serde_json::from_str(&s).unwrap();
        assert_eq!(de.surface.width, 1920);
        assert_eq!(de.items.len(), 1);
        assert_eq!(de.tuning, Tuning::default());
    }

    #[test]
    fn tuning_defaults_and_phase_step() {
        let tuning = Tuning::default();
        assert_eq!(tuning.animation_speed, 500.0);
        assert_eq!(tuning.spotlight_range, 0.2);
        assert_eq!(tuning.rotation_speed, 2.0);
        // 500 * (1/60) / 1000
        assert!((tuning.phase_step() - 1.0 / 120.0).abs() < 1e-12);
    }

    #[test]
    fn validate_rejects_zero_surface() {
        let mut scene = basic_scene();
        scene.surface = SurfaceSize::new(0, 1080);
        assert!(scene.validate().is_err());
    }

    #[test]
    fn validate_accepts_out_of_range_percentages() {
        let mut scene = basic_scene();
        scene.items[0].width_pct = 250.0;
        scene.items[0].wrap.x0 = -40.0;
        assert!(scene.validate().is_ok());
    }

    #[test]
    fn validate_rejects_non_finite_percentages() {
        let mut scene = basic_scene();
        scene.items[0].wrap.width = f64::NAN;
        assert!(scene.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_source() {
        let mut scene = basic_scene();
        scene.items[0].source = "  ".to_string();
        assert!(scene.validate().is_err());
    }
}
