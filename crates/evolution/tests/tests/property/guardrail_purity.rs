//! Property tests: the guardrail is a pure, total function of its payload.

use evolution_mutation::{contrast_ratio, mutation_guardrail, GuardrailViolation, MutationPayload};
use evolution_types::DensityToken;
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Helpers / Strategies
// ---------------------------------------------------------------------------

fn arb_hex_color() -> impl Strategy<Value = String> {
    any::<[u8; 3]>().prop_map(|[r, g, b]| format!("#{:02x}{:02X}{:02x}", r, g, b))
}

fn arb_color() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => arb_hex_color(),
        2 => any::<[u8; 3]>().prop_map(|[r, g, b]| format!("rgb({}, {},{})", r, g, b)),
        1 => "[a-z#()0-9, ]{0,12}",
    ]
}

fn arb_scale() -> impl Strategy<Value = Option<f64>> {
    proptest::option::of(prop_oneof![
        4 => 0.0f64..3.0,
        1 => Just(f64::NAN),
        1 => Just(f64::INFINITY),
    ])
}

fn arb_density() -> impl Strategy<Value = Option<String>> {
    proptest::option::of(prop_oneof![
        Just(DensityToken::Compact.as_str().to_string()),
        Just(DensityToken::Default.as_str().to_string()),
        Just(DensityToken::Comfortable.as_str().to_string()),
        "[a-z]{1,10}",
    ])
}

fn arb_payload() -> impl Strategy<Value = MutationPayload> {
    (
        arb_scale(),
        arb_scale(),
        proptest::option::of((arb_color(), arb_color())),
        any::<bool>(),
        any::<bool>(),
        arb_density(),
    )
        .prop_map(|(font_scale, spacing_scale, colors, reorder, overlap, density)| {
            let (foreground_color, background_color) = match colors {
                Some((fg, bg)) => (Some(fg), Some(bg)),
                None => (None, None),
            };
            MutationPayload {
                font_scale,
                spacing_scale,
                foreground_color,
                background_color,
                causes_dom_reorder: reorder,
                risks_overlap: overlap,
                density,
            }
        })
}

// ---------------------------------------------------------------------------
// Property Tests
// ---------------------------------------------------------------------------

proptest! {
    /// Same payload, same verdict; the payload itself is untouched.
    #[test]
    fn verdict_is_deterministic(payload in arb_payload()) {
        let before = format!("{:?}", payload);
        let first = mutation_guardrail(&payload);
        let second = mutation_guardrail(&payload);
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(format!("{:?}", payload), before);
    }

    /// `safe` holds exactly when no violation was reported, and no violation
    /// is reported twice.
    #[test]
    fn safe_iff_no_violations(payload in arb_payload()) {
        let result = mutation_guardrail(&payload);
        prop_assert_eq!(result.safe, result.violations.is_empty());

        let mut unique = result.violations.clone();
        unique.sort_by_key(|v| v.as_str());
        unique.dedup();
        prop_assert_eq!(unique.len(), result.violations.len());
    }

    /// Font scale is accepted exactly inside [0.75, 1.5].
    #[test]
    fn font_scale_bounds(scale in -1.0f64..3.0) {
        let result = mutation_guardrail(&MutationPayload::new().with_font_scale(scale));
        let in_range = (0.75..=1.5).contains(&scale);
        prop_assert_eq!(result.safe, in_range);
        prop_assert_eq!(
            result.violations.contains(&GuardrailViolation::FontScaleOutOfRange),
            !in_range
        );
    }

    /// Contrast is symmetric and bounded.
    #[test]
    fn contrast_is_symmetric_and_bounded(fg in arb_color(), bg in arb_color()) {
        let forward = contrast_ratio(&fg, &bg);
        let backward = contrast_ratio(&bg, &fg);
        prop_assert!((forward - backward).abs() < 1e-12);
        prop_assert!((1.0..=21.0 + 1e-9).contains(&forward));
    }

    /// A color never contrasts with itself.
    #[test]
    fn identical_colors_have_unit_contrast(color in arb_hex_color()) {
        prop_assert!((contrast_ratio(&color, &color) - 1.0).abs() < 1e-12);
    }
}
