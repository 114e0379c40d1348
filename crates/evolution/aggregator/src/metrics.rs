use crate::event::BehaviorEvent;
use evolution_types::{FeatureVector, SessionId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Session length (minutes) that maps to a full duration score.
pub const SESSION_MINUTES_CEILING: f64 = 30.0;

/// Feature uses per minute that map to a full frequency score.
pub const FEATURE_FREQ_CEILING: f64 = 5.0;

const MS_PER_MINUTE: f64 = 60_000.0;

/// Rolling behavioral snapshot for one anonymous session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionMetrics {
    pub session_id: SessionId,
    pub click_count: u64,
    pub impression_count: u64,
    /// Clicks / impressions, clamped to [0, 1].
    pub ctr: f64,
    /// High-water mark of scroll depth.
    pub scroll_completion: f64,
    /// Elapsed time since the session started.
    pub session_duration_ms: u64,
    pub ended: bool,
    /// True until the first interaction.
    pub bounced: bool,
    pub conversion_rate: f64,
    pub feature_use_count: u64,
    /// Feature uses per elapsed minute (not normalized).
    pub feature_usage_freq: f64,
    /// Recency-biased average of per-hop efficiency signals.
    pub navigation_efficiency: f64,
    pub drop_off_zones: BTreeMap<String, u64>,
    /// Time from session start to the first click.
    pub time_to_action_ms: Option<u64>,
    pub started_at_ms: u64,
    pub updated_at_ms: u64,
}

impl SessionMetrics {
    pub fn new(session_id: SessionId, now_ms: u64) -> Self {
        Self {
            session_id,
            click_count: 0,
            impression_count: 0,
            ctr: 0.0,
            scroll_completion: 0.0,
            session_duration_ms: 0,
            ended: false,
            bounced: true,
            conversion_rate: 0.0,
            feature_use_count: 0,
            feature_usage_freq: 0.0,
            navigation_efficiency: 0.0,
            drop_off_zones: BTreeMap::new(),
            time_to_action_ms: None,
            started_at_ms: now_ms,
            updated_at_ms: now_ms,
        }
    }

    /// Count one meaningful render.
    pub fn record_impression(&mut self, now_ms: u64) {
        self.impression_count += 1;
        self.recompute_ctr();
        self.touch(now_ms);
    }

    /// Fold one event into the snapshot.
    ///
    /// Non-finite payload values are ignored; finite ones are clamped to
    /// [0, 1] so normalized fields never escape their bounds.
    pub fn apply(&mut self, event: &BehaviorEvent, now_ms: u64) {
        match event {
            BehaviorEvent::Click => {
                self.click_count += 1;
                self.recompute_ctr();
                if self.time_to_action_ms.is_none() {
                    self.time_to_action_ms = Some(self.elapsed_ms(now_ms));
                }
            }
            BehaviorEvent::Scroll { value } => {
                if let Some(v) = unit(*value) {
                    self.scroll_completion = self.scroll_completion.max(v);
                }
            }
            BehaviorEvent::SessionEnd => {
                self.ended = true;
            }
            BehaviorEvent::Conversion { value } => {
                if let Some(v) = unit(value.unwrap_or(1.0)) {
                    self.conversion_rate = v;
                }
            }
            BehaviorEvent::FeatureUse => {
                self.feature_use_count += 1;
                let mut elapsed_min = self.elapsed_ms(now_ms) as f64 / MS_PER_MINUTE;
                if elapsed_min == 0.0 {
                    elapsed_min = 1.0;
                }
                self.feature_usage_freq = self.feature_use_count as f64 / elapsed_min;
            }
            BehaviorEvent::Navigation { value } => {
                if let Some(v) = unit(*value) {
                    self.navigation_efficiency = (self.navigation_efficiency + v) / 2.0;
                }
            }
            BehaviorEvent::DropOff { target } => {
                *self.drop_off_zones.entry(target.clone()).or_insert(0) += 1;
            }
        }

        if event.clears_bounce() {
            self.bounced = false;
        }
        self.touch(now_ms);
    }

    /// Derive the normalized 7-dimension feature vector.
    pub fn feature_vector(&self) -> FeatureVector {
        let minutes = self.session_duration_ms as f64 / MS_PER_MINUTE;
        FeatureVector::new([
            self.ctr,
            self.scroll_completion,
            (minutes / SESSION_MINUTES_CEILING).min(1.0),
            if self.bounced { 1.0 } else { 0.0 },
            self.conversion_rate,
            (self.feature_usage_freq / FEATURE_FREQ_CEILING).min(1.0),
            self.navigation_efficiency,
        ])
    }

    pub fn elapsed_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.started_at_ms)
    }

    fn recompute_ctr(&mut self) {
        self.ctr = if self.impression_count > 0 {
            (self.click_count as f64 / self.impression_count as f64).min(1.0)
        } else {
            0.0
        };
    }

    fn touch(&mut self, now_ms: u64) {
        self.session_duration_ms = self.session_duration_ms.max(self.elapsed_ms(now_ms));
        self.updated_at_ms = self.updated_at_ms.max(now_ms);
    }
}

fn unit(value: f64) -> Option<f64> {
    value.is_finite().then(|| value.clamp(0.0, 1.0))
}
