//! Safety validation for proposed layout mutations.
//!
//! Guarantees enforced before any mutation is applied:
//! - WCAG 2.1 AA contrast (ratio ≥ 4.5) when both colors are known
//! - no DOM reorder (layout shift)
//! - no positional overlap
//! - font scale in [0.75, 1.5], spacing scale in [0.5, 2.0]
//! - density token in {compact, default, comfortable}

use evolution_types::DensityToken;
use serde::{Deserialize, Serialize};
use std::fmt;

/// WCAG AA minimum contrast for normal text.
pub const WCAG_AA_NORMAL: f64 = 4.5;

pub const FONT_SCALE_RANGE: (f64, f64) = (0.75, 1.5);
pub const SPACING_SCALE_RANGE: (f64, f64) = (0.5, 2.0);

/// Reason a mutation was blocked.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuardrailViolation {
    ContrastTooLow,
    LayoutShiftRisk,
    ElementOverlap,
    FontScaleOutOfRange,
    SpacingOutOfRange,
    DensityInvalid,
}

impl GuardrailViolation {
    pub fn as_str(&self) -> &'static str {
        match self {
            GuardrailViolation::ContrastTooLow => "contrast_too_low",
            GuardrailViolation::LayoutShiftRisk => "layout_shift_risk",
            GuardrailViolation::ElementOverlap => "element_overlap",
            GuardrailViolation::FontScaleOutOfRange => "font_scale_out_of_range",
            GuardrailViolation::SpacingOutOfRange => "spacing_out_of_range",
            GuardrailViolation::DensityInvalid => "density_invalid",
        }
    }
}

impl fmt::Display for GuardrailViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validator verdict.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardrailResult {
    pub safe: bool,
    pub violations: Vec<GuardrailViolation>,
}

/// What the guardrail inspects about a mutation.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_scale: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spacing_scale: Option<f64>,
    /// `#RRGGBB` or `rgb(r, g, b)`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreground_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default)]
    pub causes_dom_reorder: bool,
    #[serde(default)]
    pub risks_overlap: bool,
    /// Raw density token; validated rather than typed so externally supplied
    /// payloads can be rejected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub density: Option<String>,
}

impl MutationPayload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_font_scale(mut self, scale: f64) -> Self {
        self.font_scale = Some(scale);
        self
    }

    pub fn with_spacing_scale(mut self, scale: f64) -> Self {
        self.spacing_scale = Some(scale);
        self
    }

    pub fn with_colors(mut self, foreground: impl Into<String>, background: impl Into<String>) -> Self {
        self.foreground_color = Some(foreground.into());
        self.background_color = Some(background.into());
        self
    }

    pub fn with_density(mut self, density: DensityToken) -> Self {
        self.density = Some(density.as_str().to_string());
        self
    }

    pub fn with_raw_density(mut self, density: impl Into<String>) -> Self {
        self.density = Some(density.into());
        self
    }

    pub fn with_dom_reorder(mut self) -> Self {
        self.causes_dom_reorder = true;
        self
    }

    pub fn with_overlap_risk(mut self) -> Self {
        self.risks_overlap = true;
        self
    }
}

/// Validate a payload against every guardrail. Pure: never mutates input.
pub fn mutation_guardrail(payload: &MutationPayload) -> GuardrailResult {
    let mut violations = Vec::new();

    if let (Some(fg), Some(bg)) = (&payload.foreground_color, &payload.background_color) {
        if contrast_ratio(fg, bg) < WCAG_AA_NORMAL {
            violations.push(GuardrailViolation::ContrastTooLow);
        }
    }

    if payload.causes_dom_reorder {
        violations.push(GuardrailViolation::LayoutShiftRisk);
    }

    if payload.risks_overlap {
        violations.push(GuardrailViolation::ElementOverlap);
    }

    if let Some(scale) = payload.font_scale {
        if !within(scale, FONT_SCALE_RANGE) {
            violations.push(GuardrailViolation::FontScaleOutOfRange);
        }
    }

    if let Some(scale) = payload.spacing_scale {
        if !within(scale, SPACING_SCALE_RANGE) {
            violations.push(GuardrailViolation::SpacingOutOfRange);
        }
    }

    if let Some(density) = &payload.density {
        if DensityToken::parse(density).is_none() {
            violations.push(GuardrailViolation::DensityInvalid);
        }
    }

    GuardrailResult {
        safe: violations.is_empty(),
        violations,
    }
}

/// WCAG contrast ratio between two colors, in [1, 21].
///
/// Colors that cannot be parsed yield 21, so the contrast check fails open.
pub fn contrast_ratio(foreground: &str, background: &str) -> f64 {
    let (Some(fg), Some(bg)) = (parse_color(foreground), parse_color(background)) else {
        return 21.0;
    };
    let l1 = relative_luminance(fg);
    let l2 = relative_luminance(bg);
    let (lighter, darker) = if l1 >= l2 { (l1, l2) } else { (l2, l1) };
    (lighter + 0.05) / (darker + 0.05)
}

fn within(value: f64, (lo, hi): (f64, f64)) -> bool {
    value >= lo && value <= hi
}

fn linear_channel(channel: u8) -> f64 {
    let c = channel as f64 / 255.0;
    if c <= 0.03928 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

fn relative_luminance([r, g, b]: [u8; 3]) -> f64 {
    0.2126 * linear_channel(r) + 0.7152 * linear_channel(g) + 0.0722 * linear_channel(b)
}

/// Parse `#RRGGBB` (case-insensitive) or `rgb(r, g, b)`. Decimal channels
/// above 255 saturate.
fn parse_color(color: &str) -> Option<[u8; 3]> {
    if let Some(hex) = color.strip_prefix('#') {
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        return Some([channel(0)?, channel(2)?, channel(4)?]);
    }

    let inner = color.strip_prefix("rgb(")?.strip_suffix(')')?;
    let mut parts = inner.split(',').map(|p| p.trim());
    let mut rgb = [0u8; 3];
    for slot in rgb.iter_mut() {
        let part = parts.next()?;
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        // digits only, so a parse failure is overflow
        *slot = part
            .parse::<u32>()
            .map_or(u8::MAX, |v| u8::try_from(v).unwrap_or(u8::MAX));
    }
    if parts.next().is_some() {
        return None;
    }
    Some(rgb)
}
