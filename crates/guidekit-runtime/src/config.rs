#![forbid(unsafe_code)]

//! Provider configuration.
//!
//! Defaults reproduce the stock look: 8-unit highlight padding and corner
//! radius, a black dim at 40 % opacity, and a 280-wide white tooltip.
//!
//! # Environment variables
//!
//! | Variable | Field |
//! |----------|-------|
//! | `GUIDEKIT_HIGHLIGHT_PADDING` | [`GuideConfig::highlight_padding`] |
//! | `GUIDEKIT_CORNER_RADIUS` | [`GuideConfig::corner_radius`] |
//! | `GUIDEKIT_MASK_OPACITY` | [`GuideConfig::mask_opacity`] |
//! | `GUIDEKIT_MASK_COLOR` | [`GuideConfig::mask_color`] (`#rrggbb`) |
//! | `GUIDEKIT_MAX_UNMEASURED_FRAMES` | [`GuideConfig::max_unmeasured_frames`] (`none` or `0` = unbounded) |

use std::env;

use guidekit_render::Rgba;

use crate::error::{GuideError, Result};

/// Tooltip bubble dimensions and typography.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TooltipMetrics {
    /// Bubble width.
    pub width: f64,
    /// Inner padding on all sides.
    pub padding: f64,
    pub corner_radius: f64,
    /// Minimum height of the body text block.
    pub body_min_height: f64,
    /// Vertical gap between title, body and button row.
    pub section_gap: f64,
    pub arrow_width: f64,
    pub arrow_height: f64,
    /// Distance of a left/right arrow from the bubble edge.
    pub arrow_inset: f64,
    /// How far the arrow overlaps the bubble edge.
    pub arrow_overlap: f64,
    /// Gap between a top-placed bubble's arrow and the highlight.
    pub gap_above: f64,
    /// Gap between the highlight and a bottom-placed bubble.
    pub gap_below: f64,
    pub title_size: f64,
    pub body_size: f64,
    pub button_text_size: f64,
    /// Horizontal and vertical padding of the button label.
    pub button_padding_x: f64,
    pub button_padding_y: f64,
    pub background: Rgba,
    pub text_color: Rgba,
    pub button_color: Rgba,
    pub button_text_color: Rgba,
    /// Used when a tooltip has no label of its own.
    pub default_button_label: String,
}

impl Default for TooltipMetrics {
    fn default() -> Self {
        Self {
            width: 280.0,
            padding: 20.0,
            corner_radius: 16.0,
            body_min_height: 57.0,
            section_gap: 8.0,
            arrow_width: 20.0,
            arrow_height: 13.0,
            arrow_inset: 16.0,
            arrow_overlap: 2.0,
            gap_above: 8.0,
            gap_below: 24.0,
            title_size: 16.0,
            body_size: 14.0,
            button_text_size: 14.0,
            button_padding_x: 12.0,
            button_padding_y: 6.0,
            background: Rgba::WHITE,
            text_color: Rgba::rgb(0x22, 0x22, 0x22),
            button_color: Rgba::rgb(0x1f, 0x6f, 0xeb),
            button_text_color: Rgba::WHITE,
            default_button_label: "Next".to_owned(),
        }
    }
}

/// Configuration shared by everything under one provider.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GuideConfig {
    /// Padding added around a measured target when a wrapper sets none.
    pub highlight_padding: f64,
    /// Corner radius of the highlight hole.
    pub corner_radius: f64,
    pub mask_color: Rgba,
    /// Opacity of the dim layer.
    pub mask_opacity: f64,
    /// Stop polling after this many consecutive unavailable measurements.
    /// `None` polls until the target becomes measurable or inactive.
    pub max_unmeasured_frames: Option<u32>,
    pub tooltip: TooltipMetrics,
}

impl Default for GuideConfig {
    fn default() -> Self {
        Self {
            highlight_padding: 8.0,
            corner_radius: 8.0,
            mask_color: Rgba::BLACK,
            mask_opacity: 0.4,
            max_unmeasured_frames: None,
            tooltip: TooltipMetrics::default(),
        }
    }
}

impl GuideConfig {
    #[must_use]
    pub fn with_highlight_padding(mut self, padding: f64) -> Self {
        self.highlight_padding = padding;
        self
    }

    #[must_use]
    pub fn with_corner_radius(mut self, radius: f64) -> Self {
        self.corner_radius = radius;
        self
    }

    #[must_use]
    pub fn with_mask(mut self, color: Rgba, opacity: f64) -> Self {
        self.mask_color = color;
        self.mask_opacity = opacity;
        self
    }

    #[must_use]
    pub fn with_max_unmeasured_frames(mut self, frames: Option<u32>) -> Self {
        self.max_unmeasured_frames = frames;
        self
    }

    #[must_use]
    pub fn with_tooltip(mut self, tooltip: TooltipMetrics) -> Self {
        self.tooltip = tooltip;
        self
    }

    /// Defaults overridden by `GUIDEKIT_*` environment variables.
    ///
    /// Invalid values are logged and ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Like [`from_env`](Self::from_env) but fails on the first invalid value.
    pub fn try_from_env() -> Result<Self> {
        Self::try_from_lookup(|name| env::var(name).ok())
    }

    /// [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        for (name, apply) in ENV_VARS {
            if let Some(raw) = lookup(name)
                && let Err(_err) = apply(&mut config, raw.trim())
            {
                guidekit_core::warn!(error = %_err, "ignoring invalid guidekit setting");
            }
        }
        config
    }

    /// [`try_from_env`](Self::try_from_env) with a custom variable source.
    pub fn try_from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        for (name, apply) in ENV_VARS {
            if let Some(raw) = lookup(name) {
                apply(&mut config, raw.trim())?;
            }
        }
        Ok(config)
    }
}

type Apply = fn(&mut GuideConfig, &str) -> Result<()>;

const ENV_VARS: [(&str, Apply); 5] = [
    ("GUIDEKIT_HIGHLIGHT_PADDING", apply_highlight_padding),
    ("GUIDEKIT_CORNER_RADIUS", apply_corner_radius),
    ("GUIDEKIT_MASK_OPACITY", apply_mask_opacity),
    ("GUIDEKIT_MASK_COLOR", apply_mask_color),
    ("GUIDEKIT_MAX_UNMEASURED_FRAMES", apply_max_unmeasured_frames),
];

fn apply_highlight_padding(c: &mut GuideConfig, v: &str) -> Result<()> {
    c.highlight_padding = parse_length("GUIDEKIT_HIGHLIGHT_PADDING", v)?;
    Ok(())
}

fn apply_corner_radius(c: &mut GuideConfig, v: &str) -> Result<()> {
    c.corner_radius = parse_length("GUIDEKIT_CORNER_RADIUS", v)?;
    Ok(())
}

fn apply_mask_opacity(c: &mut GuideConfig, v: &str) -> Result<()> {
    c.mask_opacity = v
        .parse::<f64>()
        .ok()
        .filter(|o| (0.0..=1.0).contains(o))
        .ok_or_else(|| {
            invalid(
                "GUIDEKIT_MASK_OPACITY",
                v,
                "expected a number between 0 and 1",
            )
        })?;
    Ok(())
}

fn apply_mask_color(c: &mut GuideConfig, v: &str) -> Result<()> {
    c.mask_color = Rgba::from_hex(v).ok_or_else(|| {
        invalid(
            "GUIDEKIT_MASK_COLOR",
            v,
            "expected #rgb, #rrggbb or #rrggbbaa",
        )
    })?;
    Ok(())
}

fn apply_max_unmeasured_frames(c: &mut GuideConfig, v: &str) -> Result<()> {
    if v.eq_ignore_ascii_case("none") {
        c.max_unmeasured_frames = None;
        return Ok(());
    }
    let frames = v.parse::<u32>().map_err(|_| {
        invalid(
            "GUIDEKIT_MAX_UNMEASURED_FRAMES",
            v,
            "expected a frame count or \"none\"",
        )
    })?;
    c.max_unmeasured_frames = (frames > 0).then_some(frames);
    Ok(())
}

fn parse_length(key: &'static str, v: &str) -> Result<f64> {
    v.parse::<f64>()
        .ok()
        .filter(|n| n.is_finite() && *n >= 0.0)
        .ok_or_else(|| invalid(key, v, "expected a non-negative number"))
}

fn invalid(key: &'static str, value: &str, reason: &'static str) -> GuideError {
    GuideError::InvalidConfig {
        key,
        value: value.to_owned(),
        reason,
    }
}
