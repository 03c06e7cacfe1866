//! FormCraft analytics
//!
//! Running per-form counters (views, submissions, completion time) and
//! the statistics derived from them. Counter rows are created lazily on
//! first contact and incremented atomically, so concurrent submissions
//! to the same form never lose an update.

pub mod completion;
pub mod counters;

pub use completion::{field_completion, FieldCompletion};
pub use counters::{AnalyticsEngine, CountersSnapshot, FormId};
