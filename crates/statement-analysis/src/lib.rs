//! Statement analysis: derived metrics, the year-over-year operator, zone
//! classification, narrative formatting and the red-flag / positive-indicator
//! detector libraries.

pub mod assemble;
pub mod change;
pub mod format;
pub mod metrics;
pub mod positive;
pub mod red_flags;
pub mod registry;
pub mod thresholds;
pub mod zones;


pub use change::{pct_change, yoy_change, ChangeBase};
pub use format::{format_number, format_percent, render_finding};
pub use registry::{positive_detectors, red_flag_detectors, DetectorSet};
pub use thresholds::{CashFlowProxy, PositiveThresholds, RedFlagThresholds, RuleVariant, Thresholds};
pub use zones::{Band, Bound, ZoneBands};
