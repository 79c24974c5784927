//! Zigzag filter: indices where price moved at least `dev` (relative) from
//! the last recorded extreme.
//!
//! Single pass with a running extreme and a direction flag:
//! - neutral or up: a rise of `>= dev` over the running extreme records a pivot
//!   and sets the direction up
//! - neutral or down: a fall of `>= dev` records a pivot and sets the direction down
//! - otherwise the running extreme ratchets toward new highs (up), new lows
//!   (down), or follows price (neutral)
//!
//! Index 0 and the final index are always present.

use crate::fit::MIN_DENOMINATOR;

/// Sorted unique zigzag indices of `prices`.
pub fn zigzag(prices: &[f64], dev: f64) -> Vec<usize> {
    let n = prices.len();
    if n == 0 {
        return Vec::new();
    }

    let mut pivots = vec![0];
    let mut last = prices[0];
    let mut direction = Direction::Neutral;

    for (i, &val) in prices.iter().enumerate().skip(1) {
        let denom = if last.abs() < MIN_DENOMINATOR {
            MIN_DENOMINATOR
        } else {
            last
        };
        let change = (val - last) / denom;

        if direction != Direction::Down && change >= dev {
            direction = Direction::Up;
            pivots.push(i);
            last = val;
        } else if direction != Direction::Up && change <= -dev {
            direction = Direction::Down;
            pivots.push(i);
            last = val;
        } else {
            if direction != Direction::Down {
                last = last.max(val);
            }
            if direction != Direction::Up {
                last = last.min(val);
            }
        }
    }

    if pivots.last() != Some(&(n - 1)) {
        pivots.push(n - 1);
    }
    // Pushes are strictly increasing, so the vector is already sorted and unique.
    pivots
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Neutral,
    Up,
    Down,
}
