//! Derived journal statistics.
//!
//! Everything here is a pure function of the current trips and photos and is
//! recomputed from scratch on every call.

use std::collections::HashMap;

use crate::journal::model::{Photo, Trip, TripId};

pub use crate::locale::{format_photo_count, photo_count_label};

/// A trip together with how many photos are attached to it.
#[derive(Debug, Clone, PartialEq)]
pub struct TripStat {
    pub trip: Trip,
    pub photo_count: u64,
}

impl TripStat {
    /// Count with its agreeing noun, e.g. `"2 zdjęcia"`.
    pub fn count_text(&self) -> String {
        format_photo_count(self.photo_count)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatsSnapshot {
    pub total_trips: usize,
    pub total_photos: usize,
    /// Average photos per trip, one decimal place, or `"0"` with no trips.
    pub photos_per_trip: String,
    /// Trips ordered by photo count, most first; ties keep journal order.
    pub per_trip: Vec<TripStat>,
    /// Largest per-trip count, never below 1.
    pub max_photos: u64,
}

impl StatsSnapshot {
    /// Fraction of the largest bar this trip's bar should fill.
    pub fn bar_ratio(&self, stat: &TripStat) -> f64 {
        stat.photo_count as f64 / self.max_photos as f64
    }
}

pub fn compute_stats(trips: &[Trip], photos: &[Photo]) -> StatsSnapshot {
    let total_trips = trips.len();
    let total_photos = photos.len();

    let mut counts: HashMap<TripId, u64> = HashMap::new();
    for photo in photos {
        *counts.entry(photo.trip_id).or_insert(0) += 1;
    }

    let mut per_trip: Vec<TripStat> = trips
        .iter()
        .map(|trip| TripStat {
            trip: trip.clone(),
            photo_count: counts.get(&trip.id).copied().unwrap_or(0),
        })
        .collect();
    // sort_by is stable, so equal counts stay in journal order
    per_trip.sort_by(|a, b| b.photo_count.cmp(&a.photo_count));

    let max_photos = per_trip
        .iter()
        .map(|s| s.photo_count)
        .max()
        .unwrap_or(0)
        .max(1);

    StatsSnapshot {
        total_trips,
        total_photos,
        photos_per_trip: average_one_decimal(total_photos as u64, total_trips as u64),
        per_trip,
        max_photos,
    }
}

/// `numerator / denominator` as an `f64`, rounded to one decimal place the
/// way `Number.prototype.toFixed(1)` does: the exact binary value of the
/// quotient goes to the nearest tenth, ties to the larger. So 0.35 (stored
/// as 0.34999...) gives "0.3" while 0.25 (exact) gives "0.3".
fn average_one_decimal(numerator: u64, denominator: u64) -> String {
    if denominator == 0 {
        return "0".to_string();
    }
    let tenths = round_tenths(numerator as f64 / denominator as f64);
    format!("{}.{}", tenths / 10, tenths % 10)
}

/// Nearest integer to `10 * x` for a finite non-negative `x`, computed on
/// the mantissa/exponent so no second rounding happens.
fn round_tenths(x: f64) -> u128 {
    let bits = x.to_bits();
    let biased = ((bits >> 52) & 0x7ff) as i32;
    let fraction = (bits & ((1u64 << 52) - 1)) as u128;
    let (mantissa, exponent) = if biased == 0 {
        (fraction, -1074)
    } else {
        (fraction | (1u128 << 52), biased - 1075)
    };

    let scaled = mantissa * 10;
    if exponent >= 0 {
        return scaled << exponent;
    }
    let shift = (-exponent) as u32;
    if shift > 100 {
        // Far below 0.05
        return 0;
    }
    (scaled + (1u128 << (shift - 1))) >> shift
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::model::PhotoId;
    use chrono::{DateTime, Utc};

    fn date() -> DateTime<Utc> {
        "2024-05-01T10:00:00Z".parse().unwrap()
    }

    fn trip(id: u64, title: &str) -> Trip {
        Trip {
            id: TripId(id),
            title: title.to_string(),
            description: String::new(),
            date: date(),
        }
    }

    fn photos_for(trip_id: u64, count: usize, first_id: u64) -> Vec<Photo> {
        (0..count as u64)
            .map(|i| Photo {
                id: PhotoId(first_id + i),
                trip_id: TripId(trip_id),
                uri: format!("img{}.jpg", first_id + i),
                description: String::new(),
                date: date(),
                location: None,
            })
            .collect()
    }

    #[test]
    fn test_ranking_with_stable_ties() {
        let trips = vec![trip(1, "A"), trip(2, "B"), trip(3, "C")];
        let mut photos = photos_for(2, 3, 1);
        photos.extend(photos_for(3, 3, 4));

        let stats = compute_stats(&trips, &photos);
        let order: Vec<&str> = stats.per_trip.iter().map(|s| s.trip.title.as_str()).collect();
        assert_eq!(order, vec!["B", "C", "A"]);
        assert_eq!(stats.max_photos, 3);
        assert_eq!(stats.photos_per_trip, "2.0");
        assert_eq!(stats.total_trips, 3);
        assert_eq!(stats.total_photos, 6);

        // Repeated calls give identical output
        assert_eq!(compute_stats(&trips, &photos), stats);
    }

    #[test]
    fn test_empty_journal() {
        let stats = compute_stats(&[], &[]);
        assert_eq!(stats.total_trips, 0);
        assert_eq!(stats.total_photos, 0);
        assert_eq!(stats.photos_per_trip, "0");
        assert_eq!(stats.max_photos, 1);
        assert!(stats.per_trip.is_empty());
    }

    #[test]
    fn test_trips_without_photos_keep_max_at_one() {
        let trips = vec![trip(1, "A"), trip(2, "B")];
        let stats = compute_stats(&trips, &[]);
        assert_eq!(stats.max_photos, 1);
        assert_eq!(stats.photos_per_trip, "0.0");
        assert_eq!(stats.bar_ratio(&stats.per_trip[0]), 0.0);
    }

    #[test]
    fn test_average_rounding() {
        assert_eq!(average_one_decimal(1, 3), "0.3");
        assert_eq!(average_one_decimal(2, 3), "0.7");
        assert_eq!(average_one_decimal(1, 4), "0.3");
        assert_eq!(average_one_decimal(3, 4), "0.8");
        assert_eq!(average_one_decimal(7, 2), "3.5");
        assert_eq!(average_one_decimal(10, 1), "10.0");
        assert_eq!(average_one_decimal(5, 0), "0");
    }

    #[test]
    fn test_average_rounds_the_float_quotient() {
        // 0.35 and 0.15 are stored just below the half
        assert_eq!(average_one_decimal(7, 20), "0.3");
        assert_eq!(average_one_decimal(3, 20), "0.1");
        // 0.45 is stored just above it
        assert_eq!(average_one_decimal(9, 20), "0.5");
        assert_eq!(average_one_decimal(0, 3), "0.0");
        assert_eq!(average_one_decimal(1_000_003, 10), "100000.3");
    }

    #[test]
    fn test_bar_ratio_and_count_text() {
        let trips = vec![trip(1, "A"), trip(2, "B")];
        let mut photos = photos_for(1, 4, 1);
        photos.extend(photos_for(2, 1, 5));

        let stats = compute_stats(&trips, &photos);
        assert_eq!(stats.bar_ratio(&stats.per_trip[0]), 1.0);
        assert_eq!(stats.bar_ratio(&stats.per_trip[1]), 0.25);
        assert_eq!(stats.per_trip[0].count_text(), "4 zdjęcia");
        assert_eq!(stats.per_trip[1].count_text(), "1 zdjęcie");
    }
}
