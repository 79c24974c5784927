//! Domain types for trend-line detection

pub mod line;
pub mod pivot;
pub mod summary;

pub use line::{Anchor, Line, LineKind};
pub use pivot::{Pivot, PivotSet, Side};
pub use summary::LineSummary;
