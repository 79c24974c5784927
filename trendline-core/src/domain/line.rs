//! Line: the record shape shared by engine output and manually drawn lines.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of a line record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    Resistance,
    Support,
    ChannelUpper,
    ChannelLower,
    TriangleUpper,
    TriangleLower,
    Target,
}

impl LineKind {
    pub const ALL: [LineKind; 7] = [
        LineKind::Resistance,
        LineKind::Support,
        LineKind::ChannelUpper,
        LineKind::ChannelLower,
        LineKind::TriangleUpper,
        LineKind::TriangleLower,
        LineKind::Target,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LineKind::Resistance => "resistance",
            LineKind::Support => "support",
            LineKind::ChannelUpper => "channel_upper",
            LineKind::ChannelLower => "channel_lower",
            LineKind::TriangleUpper => "triangle_upper",
            LineKind::TriangleLower => "triangle_lower",
            LineKind::Target => "target",
        }
    }

    /// Default overlay color (hex) for lines that carry none of their own.
    pub fn default_color(self) -> &'static str {
        match self {
            LineKind::Resistance | LineKind::ChannelUpper | LineKind::TriangleUpper => "#1f77b4",
            LineKind::Support | LineKind::ChannelLower | LineKind::TriangleLower => "#ff7f0e",
            LineKind::Target => "#9467bd",
        }
    }
}

impl fmt::Display for LineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LineKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        LineKind::ALL
            .into_iter()
            .find(|k| k.as_str() == key)
            .ok_or_else(|| format!("unknown line type '{key}'"))
    }
}

/// A pivot that corroborates a line: `(bar index, price)`.
pub type Anchor = (usize, f64);

/// A straight line in index space: `price = slope * index + intercept`,
/// drawn over bars `i0..=i1`.
///
/// Serializes to `{"type", "slope", "intercept", "i0", "i1", "anchors", "color"?}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    #[serde(rename = "type")]
    pub kind: LineKind,
    pub slope: f64,
    pub intercept: f64,
    pub i0: usize,
    pub i1: usize,
    #[serde(default)]
    pub anchors: Vec<Anchor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Line {
    pub fn new(
        kind: LineKind,
        slope: f64,
        intercept: f64,
        i0: usize,
        i1: usize,
        anchors: Vec<Anchor>,
    ) -> Self {
        Self {
            kind,
            slope,
            intercept,
            i0,
            i1,
            anchors,
            color: None,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Predicted price at a bar index.
    pub fn price_at(&self, index: usize) -> f64 {
        self.slope * index as f64 + self.intercept
    }

    pub fn span(&self) -> usize {
        self.i1.saturating_sub(self.i0)
    }

    pub fn anchor_count(&self) -> usize {
        self.anchors.len()
    }

    /// Ranking score: length weighted by corroboration, `max(1, span) * max(1, anchors)`.
    pub fn score(&self) -> f64 {
        self.span().max(1) as f64 * self.anchors.len().max(1) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_weights_span_by_anchor_count() {
        let line = Line::new(LineKind::Support, 0.0, 1.0, 10, 40, vec![(10, 1.0), (25, 1.0), (40, 1.0)]);
        assert_eq!(line.score(), 90.0);
        let bare = Line::new(LineKind::Target, 0.0, 1.0, 10, 40, vec![]);
        assert_eq!(bare.score(), 30.0);
    }

    #[test]
    fn price_at_follows_equation() {
        let line = Line::new(LineKind::Resistance, 1.0, 90.0, 10, 40, vec![]);
        assert_eq!(line.price_at(10), 100.0);
        assert_eq!(line.price_at(40), 130.0);
    }

    #[test]
    fn record_shape_serializes_type_and_omits_missing_color() {
        let line = Line::new(LineKind::ChannelUpper, 0.5, 2.0, 1, 12, vec![]);
        let json = serde_json::to_value(&line).unwrap();
        assert_eq!(json["type"], "channel_upper");
        assert!(json.get("color").is_none());

        let manual = line.with_color("#c9ccd3");
        let json = serde_json::to_value(&manual).unwrap();
        assert_eq!(json["color"], "#c9ccd3");
    }

    #[test]
    fn anchors_serialize_as_pairs() {
        let line = Line::new(LineKind::Support, 0.0, 5.0, 0, 20, vec![(3, 5.0)]);
        let json = serde_json::to_string(&line).unwrap();
        assert!(json.contains("\"anchors\":[[3,5.0]]"), "{json}");
    }

    #[test]
    fn kind_parses_from_name() {
        assert_eq!("Triangle_Lower".parse::<LineKind>(), Ok(LineKind::TriangleLower));
        assert!("wedge".parse::<LineKind>().is_err());
    }
}
