//! Pivot: a confirmed local price extreme on one side of the series.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which price array a pivot (or a validation failure) refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    High,
    Low,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Side::High => Side::Low,
            Side::Low => Side::High,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Side::High => "high",
            Side::Low => "low",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(Side::High),
            "low" => Ok(Side::Low),
            other => Err(format!("unknown side '{other}' (expected high or low)")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pivot {
    pub index: usize,
    pub price: f64,
    pub side: Side,
}

/// All pivots of one side, sorted ascending by bar index.
///
/// Indices and prices are kept as parallel arrays so the search loop can walk
/// them without rebuilding tuples; membership checks use binary search on the
/// sorted index array.
#[derive(Debug, Clone, PartialEq)]
pub struct PivotSet {
    side: Side,
    indices: Vec<usize>,
    prices: Vec<f64>,
}

impl PivotSet {
    /// Build a pivot set from sorted unique indices into `series`.
    ///
    /// Indices outside `series` are dropped.
    pub fn from_indices(side: Side, indices: &[usize], series: &[f64]) -> Self {
        let mut kept = Vec::with_capacity(indices.len());
        let mut prices = Vec::with_capacity(indices.len());
        for &i in indices {
            if let Some(&p) = series.get(i) {
                kept.push(i);
                prices.push(p);
            }
        }
        debug_assert!(kept.windows(2).all(|w| w[0] < w[1]), "pivot indices must be strictly ascending");
        Self {
            side,
            indices: kept,
            prices,
        }
    }

    pub fn empty(side: Side) -> Self {
        Self {
            side,
            indices: Vec::new(),
            prices: Vec::new(),
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn prices(&self) -> &[f64] {
        &self.prices
    }

    pub fn get(&self, pos: usize) -> Option<Pivot> {
        Some(Pivot {
            index: *self.indices.get(pos)?,
            price: *self.prices.get(pos)?,
            side: self.side,
        })
    }

    /// Most recent pivot (largest bar index).
    pub fn last(&self) -> Option<Pivot> {
        self.len().checked_sub(1).and_then(|pos| self.get(pos))
    }

    pub fn contains(&self, index: usize) -> bool {
        self.indices.binary_search(&index).is_ok()
    }

    pub fn price_at(&self, index: usize) -> Option<f64> {
        self.indices
            .binary_search(&index)
            .ok()
            .map(|pos| self.prices[pos])
    }

    pub fn iter(&self) -> impl Iterator<Item = Pivot> + '_ {
        self.indices
            .iter()
            .zip(&self.prices)
            .map(move |(&index, &price)| Pivot {
                index,
                price,
                side: self.side,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_indices_pairs_prices() {
        let series = [10.0, 11.0, 12.0, 13.0];
        let set = PivotSet::from_indices(Side::High, &[1, 3], &series);
        assert_eq!(set.indices(), &[1, 3]);
        assert_eq!(set.prices(), &[11.0, 13.0]);
        assert_eq!(set.last().map(|p| p.index), Some(3));
    }

    #[test]
    fn out_of_range_indices_are_dropped() {
        let set = PivotSet::from_indices(Side::Low, &[0, 7], &[5.0, 6.0]);
        assert_eq!(set.len(), 1);
        assert!(set.contains(0));
        assert!(!set.contains(7));
    }

    #[test]
    fn price_lookup_uses_index_not_position() {
        let set = PivotSet::from_indices(Side::Low, &[2, 5], &[0.0, 0.0, 4.0, 0.0, 0.0, 9.0]);
        assert_eq!(set.price_at(5), Some(9.0));
        assert_eq!(set.price_at(3), None);
    }

    #[test]
    fn side_parses_case_insensitively() {
        assert_eq!("HIGH".parse::<Side>(), Ok(Side::High));
        assert_eq!(" low ".parse::<Side>(), Ok(Side::Low));
        assert!("mid".parse::<Side>().is_err());
        assert_eq!(Side::High.opposite(), Side::Low);
    }
}
