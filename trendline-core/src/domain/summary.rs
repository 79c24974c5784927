//! Per-kind line counters returned alongside the line list.

use serde::{Deserialize, Serialize};

use super::line::{Line, LineKind};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineSummary {
    pub resistance: usize,
    pub support: usize,
    pub channel_upper: usize,
    pub channel_lower: usize,
    pub triangle_upper: usize,
    pub triangle_lower: usize,
    pub target: usize,
}

impl LineSummary {
    pub fn from_lines(lines: &[Line]) -> Self {
        let mut summary = Self::default();
        for line in lines {
            summary.record(line.kind);
        }
        summary
    }

    pub fn record(&mut self, kind: LineKind) {
        *self.slot(kind) += 1;
    }

    pub fn count(&self, kind: LineKind) -> usize {
        match kind {
            LineKind::Resistance => self.resistance,
            LineKind::Support => self.support,
            LineKind::ChannelUpper => self.channel_upper,
            LineKind::ChannelLower => self.channel_lower,
            LineKind::TriangleUpper => self.triangle_upper,
            LineKind::TriangleLower => self.triangle_lower,
            LineKind::Target => self.target,
        }
    }

    pub fn channels(&self) -> usize {
        self.channel_upper + self.channel_lower
    }

    pub fn triangles(&self) -> usize {
        self.triangle_upper + self.triangle_lower
    }

    pub fn total(&self) -> usize {
        LineKind::ALL.into_iter().map(|k| self.count(k)).sum()
    }

    fn slot(&mut self, kind: LineKind) -> &mut usize {
        match kind {
            LineKind::Resistance => &mut self.resistance,
            LineKind::Support => &mut self.support,
            LineKind::ChannelUpper => &mut self.channel_upper,
            LineKind::ChannelLower => &mut self.channel_lower,
            LineKind::TriangleUpper => &mut self.triangle_upper,
            LineKind::TriangleLower => &mut self.triangle_lower,
            LineKind::Target => &mut self.target,
        }
    }
}
