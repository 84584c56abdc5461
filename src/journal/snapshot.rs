//! The persisted journal document.
//!
//! The whole journal is stored as one JSON object under a single key:
//! `{ trips: [...], photos: [...], nextTripId, nextPhotoId }`. Decoding is
//! forgiving so that a damaged or older document never makes the journal
//! unusable.

use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;
use tracing::warn;

use super::model::{Photo, Trip, TripId};

/// Complete in-memory state of a journal: both collections and both id
/// counters.
#[derive(Debug, Clone, PartialEq)]
pub struct JournalState {
    pub trips: Vec<Trip>,
    pub photos: Vec<Photo>,
    pub next_trip_id: u64,
    pub next_photo_id: u64,
}

impl Default for JournalState {
    fn default() -> Self {
        Self {
            trips: Vec::new(),
            photos: Vec::new(),
            next_trip_id: 1,
            next_photo_id: 1,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Envelope<'a> {
    trips: &'a [Trip],
    photos: &'a [Photo],
    next_trip_id: u64,
    next_photo_id: u64,
}

/// Serialize the state into the persisted document.
pub fn encode(state: &JournalState) -> Result<String, serde_json::Error> {
    serde_json::to_string(&Envelope {
        trips: &state.trips,
        photos: &state.photos,
        next_trip_id: state.next_trip_id,
        next_photo_id: state.next_photo_id,
    })
}

/// Parse a persisted document.
///
/// Returns `None` when the text is not a JSON object at all. Otherwise
/// non-array collections become empty, malformed records are dropped,
/// photos whose trip is not present are dropped with them, and absent or
/// non-positive counters become 1. A counter that would
/// hand out an id already present in the document is raised past it.
pub fn decode(raw: &str) -> Option<JournalState> {
    let value: Value = match serde_json::from_str(raw) {
        Ok(v) => v,
        Err(e) => {
            warn!("Persisted journal is not valid JSON: {}", e);
            return None;
        }
    };
    let Value::Object(map) = value else {
        warn!("Persisted journal is not a JSON object");
        return None;
    };

    let trips: Vec<Trip> = decode_records(map.get("trips"), "trip");
    let mut photos: Vec<Photo> = decode_records(map.get("photos"), "photo");

    // A photo must never outlive its trip, including one dropped above
    let trip_ids: HashSet<TripId> = trips.iter().map(|t| t.id).collect();
    let before = photos.len();
    photos.retain(|p| trip_ids.contains(&p.trip_id));
    if photos.len() < before {
        warn!("Dropping {} photos whose trip is missing", before - photos.len());
    }

    let max_trip_id = trips.iter().map(|t| t.id.0).max().unwrap_or(0);
    let max_photo_id = photos.iter().map(|p| p.id.0).max().unwrap_or(0);

    Some(JournalState {
        next_trip_id: decode_counter(map.get("nextTripId"), max_trip_id, "nextTripId"),
        next_photo_id: decode_counter(map.get("nextPhotoId"), max_photo_id, "nextPhotoId"),
        trips,
        photos,
    })
}

fn decode_records<T: serde::de::DeserializeOwned>(value: Option<&Value>, kind: &str) -> Vec<T> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| match serde_json::from_value::<T>(item.clone()) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Dropping malformed {} record: {}", kind, e);
                None
            }
        })
        .collect()
}

fn decode_counter(value: Option<&Value>, max_id: u64, name: &str) -> u64 {
    let counter = value.and_then(Value::as_u64).filter(|n| *n > 0).unwrap_or(1);
    if counter <= max_id {
        warn!("{} {} would reuse id {}, raising to {}", name, counter, max_id, max_id + 1);
        return max_id + 1;
    }
    counter
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::model::{GeoPoint, PhotoId};

    fn sample_state() -> JournalState {
        let date = "2024-05-01T10:00:00.250Z".parse().unwrap();
        JournalState {
            trips: vec![Trip {
                id: TripId(1),
                title: "Kraków".to_string(),
                description: "Weekend".to_string(),
                date,
            }],
            photos: vec![Photo {
                id: PhotoId(4),
                trip_id: TripId(1),
                uri: "file:///wawel.jpg".to_string(),
                description: String::new(),
                date,
                location: Some(GeoPoint::new(50.054, 19.935)),
            }],
            next_trip_id: 2,
            next_photo_id: 5,
        }
    }

    #[test]
    fn test_encode_decode_preserves_state() {
        let state = sample_state();
        let raw = encode(&state).unwrap();
        assert_eq!(decode(&raw), Some(state));
    }

    #[test]
    fn test_encoded_keys() {
        let raw = encode(&sample_state()).unwrap();
        let value: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["nextTripId"], 2);
        assert_eq!(value["nextPhotoId"], 5);
        assert_eq!(value["photos"][0]["tripId"], 1);
        assert_eq!(value["photos"][0]["location"]["latitude"], 50.054);
    }

    #[test]
    fn test_decode_rejects_non_objects() {
        assert_eq!(decode("not json"), None);
        assert_eq!(decode("null"), None);
        assert_eq!(decode("[1, 2]"), None);
    }

    #[test]
    fn test_decode_coerces_bad_fields() {
        let state = decode(r#"{"trips": "oops", "photos": 3, "nextTripId": 0, "nextPhotoId": -4}"#)
            .unwrap();
        assert_eq!(state, JournalState::default());

        let state = decode("{}").unwrap();
        assert_eq!(state, JournalState::default());
    }

    #[test]
    fn test_decode_drops_malformed_records_and_fills_defaults() {
        let raw = r#"{
            "trips": [
                {"id": 1, "title": "Gdańsk", "date": "2024-06-01T08:00:00.000Z"},
                {"title": "no id"}
            ],
            "photos": [
                {"id": 2, "tripId": 1, "uri": "a.jpg", "date": "2024-06-01T09:00:00.000Z", "location": null}
            ],
            "nextTripId": 2,
            "nextPhotoId": 3
        }"#;
        let state = decode(raw).unwrap();
        assert_eq!(state.trips.len(), 1);
        assert_eq!(state.trips[0].description, "");
        assert_eq!(state.photos[0].location, None);
        assert_eq!(state.next_trip_id, 2);
        assert_eq!(state.next_photo_id, 3);
    }

    #[test]
    fn test_decode_drops_photos_of_unreadable_trip() {
        let raw = r#"{
            "trips": [
                {"id": 1, "title": "Bieszczady", "date": "wczoraj"},
                {"id": 2, "title": "Mazury", "date": "2024-07-01T08:00:00Z"}
            ],
            "photos": [
                {"id": 1, "tripId": 1, "uri": "a.jpg", "date": "2024-07-01T09:00:00Z"},
                {"id": 2, "tripId": 2, "uri": "b.jpg", "date": "2024-07-01T09:00:00Z"},
                {"id": 3, "tripId": 7, "uri": "c.jpg", "date": "2024-07-01T09:00:00Z"}
            ],
            "nextTripId": 3,
            "nextPhotoId": 4
        }"#;
        let state = decode(raw).unwrap();
        assert_eq!(state.trips.len(), 1);
        assert_eq!(state.trips[0].id, TripId(2));
        let photo_ids: Vec<PhotoId> = state.photos.iter().map(|p| p.id).collect();
        assert_eq!(photo_ids, vec![PhotoId(2)]);
        assert!(state
            .photos
            .iter()
            .all(|p| state.trips.iter().any(|t| t.id == p.trip_id)));
        // Counters still skip the dropped ids
        assert_eq!(state.next_trip_id, 3);
        assert_eq!(state.next_photo_id, 4);
    }

    #[test]
    fn test_decode_raises_stale_counters() {
        let raw = r#"{
            "trips": [{"id": 9, "title": "Hel", "description": "", "date": "2024-06-01T08:00:00Z"}],
            "photos": [],
            "nextTripId": 3
        }"#;
        let state = decode(raw).unwrap();
        assert_eq!(state.next_trip_id, 10);
        assert_eq!(state.next_photo_id, 1);
    }
}
