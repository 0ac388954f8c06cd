//! # Stored Coordinates
//!
//! A note's position is persisted as one integer per axis (`pos_x`, `pos_y`).
//!
//! ## Schemes
//!
//! - **Legacy**: raw pixel offset measured on a fixed 660×860 canvas.
//! - **Ratio**: `round(ratio * SCALE) + OFFSET`, where `ratio` is the click position as a
//!   fraction of the canvas side at click time.
//!
//! Anything `>= OFFSET` is read as ratio, anything below as legacy. There is no explicit tag
//! in storage, so a legacy pixel offset of a million or more would be misread as ratio. Canvas
//! sizes never come close, but [`StoredCoordinate`] keeps the distinction explicit once a
//! value has been read.
//!
//! ## Rendering
//!
//! Decoding always yields a pixel offset inside `[0, dimension]` for the *current* canvas, so
//! the same note lands on the same relative spot of the tree on every screen size.
use serde::{Deserialize, Serialize};

use crate::constants::{LEGACY_HEIGHT, LEGACY_WIDTH, OFFSET, SCALE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    pub fn reference_size(self) -> f64 {
        match self {
            Axis::X => LEGACY_WIDTH,
            Axis::Y => LEGACY_HEIGHT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoredCoordinate {
    /// Raw pixel offset against the legacy reference canvas.
    Legacy(i64),
    /// Quantized ratio steps, already stripped of [`OFFSET`].
    Ratio(i64),
}

impl StoredCoordinate {
    pub fn from_stored(value: i64) -> Self {
        if value >= OFFSET {
            StoredCoordinate::Ratio(value - OFFSET)
        } else {
            StoredCoordinate::Legacy(value)
        }
    }

    pub fn stored(self) -> i64 {
        match self {
            StoredCoordinate::Legacy(raw) => raw,
            StoredCoordinate::Ratio(steps) => steps + OFFSET,
        }
    }

    pub fn is_legacy(self) -> bool {
        matches!(self, StoredCoordinate::Legacy(_))
    }

    /// Fraction of the canvas side along `axis`, saturated to `[0, 1]`.
    pub fn ratio(self, axis: Axis) -> f64 {
        let ratio = match self {
            StoredCoordinate::Ratio(steps) => steps as f64 / SCALE as f64,
            StoredCoordinate::Legacy(raw) => {
                let reference = axis.reference_size();

                if reference > 0.0 {
                    raw as f64 / reference
                } else {
                    0.0
                }
            }
        };

        saturate(ratio)
    }
}

/// Turns a click offset into the integer persisted for that axis.
///
/// A degenerate `dimension` (zero, negative, NaN) yields `0`. Clicks on or past the canvas
/// edges saturate, so the result of a real click is always within `[OFFSET, OFFSET + SCALE]`.
pub fn encode(pixel: f64, dimension: f64) -> i64 {
    if !is_usable(dimension) {
        return 0;
    }

    let ratio = saturate(pixel / dimension);

    (ratio * SCALE as f64).round() as i64 + OFFSET
}

/// Pixel offset along `axis` for a canvas of `dimension` pixels.
///
/// Missing values and degenerate dimensions decode to `0`.
pub fn decode(stored: Option<i64>, dimension: f64, axis: Axis) -> f64 {
    let Some(stored) = stored else {
        return 0.0;
    };

    if !is_usable(dimension) {
        return 0.0;
    }

    StoredCoordinate::from_stored(stored).ratio(axis) * dimension
}

pub(crate) fn is_usable(dimension: f64) -> bool {
    dimension.is_finite() && dimension > 0.0
}

fn saturate(ratio: f64) -> f64 {
    if ratio.is_nan() {
        return 0.0;
    }

    ratio.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_boundaries() {
        for dimension in [1.0, 330.0, 660.0, 1920.0] {
            assert_eq!(encode(0.0, dimension), OFFSET);
            assert_eq!(encode(dimension, dimension), OFFSET + SCALE);
        }
    }

    #[test]
    fn test_clamping() {
        assert_eq!(encode(-50.0, 660.0), OFFSET);
        assert_eq!(encode(1000.0, 660.0), OFFSET + SCALE);
        assert_eq!(encode(f64::NAN, 660.0), OFFSET);
    }

    #[test]
    fn test_monotonic() {
        let mut previous = encode(-10.0, 660.0);

        for step in 0..=700 {
            let current = encode(step as f64, 660.0);
            assert!(current >= previous);
            previous = current;
        }
    }

    #[test]
    fn test_round_trip_same_dimension() {
        let stored = encode(330.0, 660.0);

        assert_eq!(stored, OFFSET + 5000);
        assert!(approx(decode(Some(stored), 660.0, Axis::X), 330.0));
    }

    #[test]
    fn test_round_trip_within_quantization() {
        let dimension = 777.0;
        let step = dimension / SCALE as f64;

        for pixel in [0.0, 0.3, 12.34, 388.5, 500.01, 776.9, 777.0] {
            let decoded = decode(Some(encode(pixel, dimension)), dimension, Axis::Y);
            assert!((decoded - pixel).abs() <= step / 2.0 + 1e-9, "{pixel} -> {decoded}");
        }
    }

    #[test]
    fn test_responsive_rescale() {
        let stored = encode(165.0, 660.0);

        assert!(approx(decode(Some(stored), 660.0, Axis::X), 165.0));
        assert!(approx(decode(Some(stored), 1320.0, Axis::X), 330.0));
    }

    #[test]
    fn test_legacy_fallback() {
        assert!(approx(decode(Some(200), 330.0, Axis::X), 100.0));
        assert!(approx(decode(Some(430), 430.0, Axis::Y), 215.0));
        assert!(approx(decode(Some(2000), 500.0, Axis::X), 500.0));
        assert!(approx(decode(Some(-20), 500.0, Axis::Y), 0.0));
    }

    #[test]
    fn test_degenerate_dimension() {
        assert_eq!(decode(Some(OFFSET + 5000), 0.0, Axis::X), 0.0);
        assert_eq!(decode(Some(OFFSET + 5000), -10.0, Axis::Y), 0.0);
        assert_eq!(decode(Some(OFFSET + 5000), f64::NAN, Axis::Y), 0.0);
        assert_eq!(encode(100.0, 0.0), 0);
        assert_eq!(encode(100.0, f64::INFINITY), 0);
    }

    #[test]
    fn test_missing_value() {
        assert_eq!(decode(None, 660.0, Axis::X), 0.0);
    }

    #[test]
    fn test_output_stays_on_canvas() {
        for stored in [i64::MIN, -1, 0, 659, 861, OFFSET - 1, OFFSET, OFFSET + SCALE, i64::MAX] {
            let decoded = decode(Some(stored), 400.0, Axis::Y);
            assert!((0.0..=400.0).contains(&decoded), "{stored} -> {decoded}");
        }
    }

    #[test]
    fn test_classification() {
        assert_eq!(StoredCoordinate::from_stored(200), StoredCoordinate::Legacy(200));
        assert_eq!(StoredCoordinate::from_stored(OFFSET - 1), StoredCoordinate::Legacy(OFFSET - 1));
        assert_eq!(StoredCoordinate::from_stored(OFFSET), StoredCoordinate::Ratio(0));
        assert_eq!(StoredCoordinate::from_stored(OFFSET + 2500).stored(), OFFSET + 2500);
        assert!(StoredCoordinate::from_stored(5).is_legacy());
        assert!(!StoredCoordinate::from_stored(OFFSET + 5).is_legacy());
    }

    #[test]
    fn test_reference_sizes() {
        assert_eq!(Axis::X.reference_size(), 660.0);
        assert_eq!(Axis::Y.reference_size(), 860.0);
        assert!(approx(StoredCoordinate::Legacy(430).ratio(Axis::Y), 0.5));
        assert!(approx(StoredCoordinate::Legacy(330).ratio(Axis::X), 0.5));
    }
}
