#[path = "property/metric_bounds.rs"]
mod metric_bounds;

#[path = "property/ledger_forward_only.rs"]
mod ledger_forward_only;

#[path = "property/controller_limits.rs"]
mod controller_limits;

#[path = "property/guardrail_purity.rs"]
mod guardrail_purity;
