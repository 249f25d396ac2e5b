//! User ratings and their 5-star display.
//!
//! Stars are laid out highest threshold first, so the filled run always grows
//! from the right-hand (lowest threshold) end.
use anyhow::{anyhow, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

pub const STAR_COUNT: usize = 5;

/// Thresholds in visual order.
pub const STAR_THRESHOLDS: [u8; STAR_COUNT] = [10, 8, 6, 4, 2];

/// A rating in `[0, 10]` with 0.5 granularity, stored as half-points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rating {
    half_points: u8,
}

impl Rating {
    pub fn new(value: f64) -> Result<Self> {
        if !value.is_finite() || !(0.0..=10.0).contains(&value) {
            return Err(anyhow!("rating {} outside 0-10", value));
        }
        let doubled = value * 2.0;
        if doubled.fract() != 0.0 {
            return Err(anyhow!("rating {} is not a multiple of 0.5", value));
        }
        Ok(Self {
            half_points: doubled as u8,
        })
    }

    pub fn from_whole(points: u8) -> Result<Self> {
        Self::new(points as f64)
    }

    pub fn value(&self) -> f64 {
        self.half_points as f64 / 2.0
    }

    pub fn reaches(&self, threshold: u8) -> bool {
        self.half_points >= threshold.saturating_mul(2)
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

impl Serialize for Rating {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.half_points % 2 == 0 {
            serializer.serialize_u8(self.half_points / 2)
        } else {
            serializer.serialize_f64(self.value())
        }
    }
}

impl<'de> Deserialize<'de> for Rating {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        Rating::new(value).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Star {
    pub threshold: u8,
    pub filled: bool,
}

/// Maps a rating onto the five stars, in visual order.
pub fn stars(rating: Option<Rating>) -> [Star; STAR_COUNT] {
    STAR_THRESHOLDS.map(|threshold| Star {
        threshold,
        filled: rating.map(|r| r.reaches(threshold)).unwrap_or(false),
    })
}

pub fn filled_count(rating: Option<Rating>) -> usize {
    stars(rating).iter().filter(|s| s.filled).count()
}

/// Rating chosen by clicking the star `position` places from the filled end.
pub fn rating_for_click(position: usize) -> Result<Rating> {
    if position >= STAR_COUNT {
        return Err(anyhow!(
            "star position {} out of range (0-{})",
            position,
            STAR_COUNT - 1
        ));
    }
    Rating::from_whole(((position + 1) * 2) as u8)
}

/// Converts an index in visual (left to right) order to a click position.
pub fn position_from_visual(index: usize) -> Result<usize> {
    if index >= STAR_COUNT {
        return Err(anyhow!("star index {} out of range", index));
    }
    Ok(STAR_COUNT - 1 - index)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_thresholds(rating: Option<Rating>) -> Vec<u8> {
        stars(rating)
            .iter()
            .filter(|s| s.filled)
            .map(|s| s.threshold)
            .collect()
    }

    #[test]
    fn even_ratings_fill_a_prefix_from_the_low_end() {
        for r in [0u8, 2, 4, 6, 8, 10] {
            let rating = Rating::from_whole(r).unwrap();
            let stars = stars(Some(rating));
            assert_eq!(filled_count(Some(rating)), (r / 2) as usize);
            // once a star is filled, every star to its right is filled too
            let first_filled = stars.iter().position(|s| s.filled).unwrap_or(STAR_COUNT);
            assert!(stars[first_filled..].iter().all(|s| s.filled));
            assert!(stars[..first_filled].iter().all(|s| !s.filled));
        }
    }

    #[test]
    fn absent_rating_fills_nothing() {
        assert_eq!(filled_count(None), 0);
        assert_eq!(
            stars(None).map(|s| s.threshold),
            [10, 8, 6, 4, 2],
            "thresholds are in visual order"
        );
    }

    #[test]
    fn odd_and_half_ratings_round_down_to_the_last_reached_threshold() {
        assert_eq!(filled_thresholds(Some(Rating::new(7.0).unwrap())), vec![6, 4, 2]);
        assert_eq!(filled_thresholds(Some(Rating::new(1.5).unwrap())), Vec::<u8>::new());
        assert_eq!(filled_thresholds(Some(Rating::new(9.5).unwrap())), vec![8, 6, 4, 2]);
    }

    #[test]
    fn click_position_sets_rating_regardless_of_prior_value() {
        for p in 0..STAR_COUNT {
            let rating = rating_for_click(p).unwrap();
            assert_eq!(rating.value(), ((p + 1) * 2) as f64);
            assert_eq!(filled_count(Some(rating)), p + 1);
        }
        assert!(rating_for_click(5).is_err());
    }

    #[test]
    fn visual_index_maps_to_reverse_position() {
        assert_eq!(position_from_visual(0).unwrap(), 4);
        assert_eq!(position_from_visual(4).unwrap(), 0);
        assert!(position_from_visual(5).is_err());
    }

    #[test]
    fn rejects_out_of_range_and_off_step_values() {
        assert!(Rating::new(-0.5).is_err());
        assert!(Rating::new(10.5).is_err());
        assert!(Rating::new(3.3).is_err());
        assert!(Rating::new(f64::NAN).is_err());
        assert!(Rating::new(3.5).is_ok());
    }

    #[test]
    fn serializes_whole_ratings_as_integers() {
        let whole = serde_json::to_value(Rating::from_whole(8).unwrap()).unwrap();
        assert_eq!(whole, serde_json::json!(8));
        let half = serde_json::to_value(Rating::new(6.5).unwrap()).unwrap();
        assert_eq!(half, serde_json::json!(6.5));
        let parsed: Rating = serde_json::from_value(serde_json::json!(7.5)).unwrap();
        assert_eq!(parsed.value(), 7.5);
    }
}
