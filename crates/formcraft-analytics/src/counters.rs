//! Per-form counter rows

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque form identifier.
pub type FormId = Uuid;

/// Read-time snapshot of a form's counters.
///
/// `conversion_rate` is derived, never stored: submissions / views * 100
/// when there are views, else 0.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountersSnapshot {
    pub form_id: FormId,
    pub views: u64,
    pub submissions: u64,
    pub conversion_rate: f64,
    pub average_completion_time: Option<u32>,
    pub updated_at: DateTime<Utc>,
}

struct CounterRow {
    views: AtomicU64,
    submissions: AtomicU64,
    completion_seconds: AtomicU64,
    completion_samples: AtomicU64,
    updated_at: RwLock<DateTime<Utc>>,
}

impl CounterRow {
    fn new() -> Self {
        Self {
            views: AtomicU64::new(0),
            submissions: AtomicU64::new(0),
            completion_seconds: AtomicU64::new(0),
            completion_samples: AtomicU64::new(0),
            updated_at: RwLock::new(Utc::now()),
        }
    }

    fn touch(&self) {
        *self.updated_at.write() = Utc::now();
    }
}

/// Counter store, one row per form, created lazily.
#[derive(Default)]
pub struct AnalyticsEngine {
    rows: DashMap<FormId, CounterRow>,
}

impl AnalyticsEngine {
    pub fn new() -> Self {
        Self {
            rows: DashMap::new(),
        }
    }

    /// Record one public view of the form.
    pub fn record_view(&self, form_id: &FormId) {
        let row = self.rows.entry(*form_id).or_insert_with(CounterRow::new);
        row.views.fetch_add(1, Ordering::Relaxed);
        row.touch();
    }

    /// Record one accepted submission.
    pub fn record_submission(&self, form_id: &FormId) {
        let row = self.rows.entry(*form_id).or_insert_with(CounterRow::new);
        row.submissions.fetch_add(1, Ordering::Relaxed);
        row.touch();
    }

    /// Fold a client-reported fill-out duration into the running average.
    pub fn record_completion_time(&self, form_id: &FormId, seconds: u32) {
        let row = self.rows.entry(*form_id).or_insert_with(CounterRow::new);
        row.completion_seconds
            .fetch_add(u64::from(seconds), Ordering::Relaxed);
        row.completion_samples.fetch_add(1, Ordering::Relaxed);
        row.touch();
    }

    /// Accepted submissions so far; 0 when the row does not exist yet.
    pub fn submissions_total(&self, form_id: &FormId) -> u64 {
        self.rows
            .get(form_id)
            .map(|row| row.submissions.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// Snapshot the counters, creating the row on first read.
    pub fn snapshot(&self, form_id: &FormId) -> CountersSnapshot {
        let row = self.rows.entry(*form_id).or_insert_with(CounterRow::new);

        let views = row.views.load(Ordering::Relaxed);
        let submissions = row.submissions.load(Ordering::Relaxed);
        let samples = row.completion_samples.load(Ordering::Relaxed);
        let seconds = row.completion_seconds.load(Ordering::Relaxed);

        let conversion_rate = if views > 0 {
            submissions as f64 / views as f64 * 100.0
        } else {
            0.0
        };

        let average_completion_time = if samples > 0 {
            Some((seconds / samples) as u32)
        } else {
            None
        };

        let updated_at = *row.updated_at.read();

        CountersSnapshot {
            form_id: *form_id,
            views,
            submissions,
            conversion_rate,
            average_completion_time,
            updated_at,
        }
    }

    /// Drop a form's counters; part of form deletion cascade.
    pub fn remove(&self, form_id: &FormId) {
        self.rows.remove(form_id);
    }
}
