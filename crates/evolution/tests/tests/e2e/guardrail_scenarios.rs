//! End-to-end test: guardrails keep unsafe mutations away from the page.

use evolution_aggregator::BehaviorEvent;
use evolution_controller::{AttemptOutcome, RefusalReason};
use evolution_engine::{EngineConfig, EngineContext};
use evolution_mutation::{
    contrast_ratio, mutation_guardrail, GuardrailViolation, LayoutMutation, MutationCatalogue,
    MutationPayload, StyleVar, WCAG_AA_NORMAL,
};
use evolution_tests::{TestBed, START_MS};
use evolution_types::ManualClock;
use std::collections::BTreeMap;
use std::sync::Arc;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn huge_type() -> LayoutMutation {
    LayoutMutation::new("huge-type", "Huge type")
        .with_var(StyleVar::FontScale, "1.6")
        .with_payload(MutationPayload::new().with_font_scale(1.6))
}

fn low_contrast() -> LayoutMutation {
    LayoutMutation::new("washed-out", "Washed out text")
        .with_var(StyleVar::CtaWeight, "300")
        .with_payload(MutationPayload::new().with_colors("#777777", "#888888"))
}

fn larger_type() -> LayoutMutation {
    LayoutMutation::new("larger-type", "Larger type")
        .with_var(StyleVar::FontScale, "1.2")
        .with_payload(MutationPayload::new().with_font_scale(1.2))
}

fn bed_with(mutations: Vec<LayoutMutation>) -> TestBed {
    let catalogue = MutationCatalogue::new(mutations, BTreeMap::new()).unwrap();
    let clock = Arc::new(ManualClock::new(START_MS));
    let ctx = EngineContext::with_clock(clock.clone()).with_catalogue(catalogue);
    TestBed::mount(clock, ctx, EngineConfig::default(), "guarded")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn font_scale_limits() {
    let rejected = mutation_guardrail(&MutationPayload::new().with_font_scale(1.6));
    assert!(!rejected.safe);
    assert_eq!(rejected.violations, vec![GuardrailViolation::FontScaleOutOfRange]);

    assert!(mutation_guardrail(&MutationPayload::new().with_font_scale(1.2)).safe);
}

#[test]
fn contrast_extremes() {
    assert!((contrast_ratio("#000000", "#FFFFFF") - 21.0).abs() < 1e-9);
    assert!(contrast_ratio("#777777", "#888888") < WCAG_AA_NORMAL);
    assert!(contrast_ratio("rgb(0, 0, 0)", "#ffffff") > WCAG_AA_NORMAL);
}

#[test]
fn every_violation_is_reported() {
    let payload = MutationPayload::new()
        .with_font_scale(0.5)
        .with_spacing_scale(3.0)
        .with_colors("#777777", "#888888")
        .with_raw_density("cramped")
        .with_dom_reorder()
        .with_overlap_risk();
    let result = mutation_guardrail(&payload);
    assert!(!result.safe);
    assert_eq!(result.violations.len(), 6);
}

#[test]
fn unsafe_entries_are_skipped() {
    let bed = bed_with(vec![huge_type(), low_contrast(), larger_type()]);
    bed.ingest(BehaviorEvent::Scroll { value: 0.5 });

    let outcome = bed.engine.evaluate();
    let applied = outcome.report().unwrap().attempt.applied().cloned().unwrap();
    assert_eq!(applied.id, "larger-type");
    assert_eq!(bed.styles.value_of(StyleVar::FontScale).as_deref(), Some("1.2"));
    assert_eq!(
        bed.styles.value_of(StyleVar::CtaWeight).as_deref(),
        Some(StyleVar::CtaWeight.baseline())
    );
}

#[test]
fn all_unsafe_catalogue_is_exhausted() {
    let bed = bed_with(vec![huge_type(), low_contrast()]);
    bed.ingest(BehaviorEvent::Scroll { value: 0.5 });

    let outcome = bed.engine.evaluate();
    let report = outcome.report().unwrap();
    assert!(matches!(
        report.attempt,
        AttemptOutcome::Refused(RefusalReason::CatalogueExhausted)
    ));
    for var in StyleVar::ALL {
        assert_eq!(bed.styles.value_of(var).as_deref(), Some(var.baseline()));
    }
    bed.engine
        .with_controller(|c| assert_eq!(c.state().total_mutations, 0));
}

#[test]
fn standard_catalogue_is_entirely_safe() {
    for mutation in MutationCatalogue::standard().iter() {
        let verdict = mutation_guardrail(&mutation.payload);
        assert!(verdict.safe, "{} violates {:?}", mutation.id, verdict.violations);
    }
}
