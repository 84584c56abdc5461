//! The journal store: trips, photos and their persistence.
//!
//! In-memory state is always updated before the durable write starts, and a
//! failed write never rolls the in-memory change back. The caller learns
//! about the failure through [`JournalError::Persistence`] and may call
//! [`Journal::save`] again later.

pub mod model;
pub mod snapshot;

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::db::KeyValueStore;
use crate::error::{JournalError, JournalResult};
use crate::stats::{compute_stats, StatsSnapshot};

use model::{GeoPoint, NewPhoto, Photo, PhotoId, Trip, TripId};
use snapshot::JournalState;

/// Source of creation timestamps.
pub type Clock = Box<dyn Fn() -> DateTime<Utc> + Send + Sync>;

pub struct Journal {
    state: JournalState,
    store: Arc<dyn KeyValueStore>,
    key: String,
    clock: Clock,
}

impl Journal {
    /// Create an empty journal bound to `key` in `store`. Nothing is read;
    /// use [`Journal::open`] to start from persisted state.
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            state: JournalState::default(),
            store,
            key: key.into(),
            clock: Box::new(Utc::now),
        }
    }

    /// Replace the timestamp source.
    pub fn with_clock(mut self, clock: impl Fn() -> DateTime<Utc> + Send + Sync + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Create a journal and load whatever was persisted. Always yields a
    /// usable journal; an unreadable store leaves it empty.
    pub async fn open(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        let mut journal = Self::new(store, key);
        if let Err(e) = journal.load().await {
            warn!("Starting with an empty journal: {}", e);
        }
        journal
    }

    // ========================================================================
    // Reads
    // ========================================================================

    pub fn state(&self) -> &JournalState {
        &self.state
    }

    /// Trips in insertion order.
    pub fn trips(&self) -> &[Trip] {
        &self.state.trips
    }

    /// Photos in insertion order.
    pub fn photos(&self) -> &[Photo] {
        &self.state.photos
    }

    pub fn trip(&self, id: TripId) -> Option<&Trip> {
        self.state.trips.iter().find(|t| t.id == id)
    }

    pub fn photo(&self, id: PhotoId) -> Option<&Photo> {
        self.state.photos.iter().find(|p| p.id == id)
    }

    pub fn next_trip_id(&self) -> u64 {
        self.state.next_trip_id
    }

    pub fn next_photo_id(&self) -> u64 {
        self.state.next_photo_id
    }

    /// Number of photos attached to a trip.
    pub fn photo_count(&self, trip_id: TripId) -> usize {
        self.state.photos.iter().filter(|p| p.trip_id == trip_id).count()
    }

    /// Trips ordered by creation date. Trips with equal dates keep insertion
    /// order.
    pub fn list_trips_by_date(&self, descending: bool) -> Vec<&Trip> {
        let mut trips: Vec<&Trip> = self.state.trips.iter().collect();
        if descending {
            trips.sort_by(|a, b| b.date.cmp(&a.date));
        } else {
            trips.sort_by(|a, b| a.date.cmp(&b.date));
        }
        trips
    }

    /// Photos of one trip, newest first.
    pub fn list_photos_for_trip(&self, trip_id: TripId) -> Vec<&Photo> {
        let mut photos: Vec<&Photo> = self
            .state
            .photos
            .iter()
            .filter(|p| p.trip_id == trip_id)
            .collect();
        photos.sort_by(|a, b| b.date.cmp(&a.date));
        photos
    }

    pub fn stats(&self) -> StatsSnapshot {
        compute_stats(&self.state.trips, &self.state.photos)
    }

    // ========================================================================
    // Trip mutations
    // ========================================================================

    pub async fn add_trip(&mut self, title: &str, description: &str) -> JournalResult<Trip> {
        let title = required(title, "title")?;

        let trip = Trip {
            id: TripId(self.state.next_trip_id),
            title,
            description: description.trim().to_string(),
            date: (self.clock)(),
        };
        self.state.next_trip_id += 1;
        self.state.trips.push(trip.clone());
        debug!("Added trip {} {:?}", trip.id, trip.title);

        self.save().await?;
        Ok(trip)
    }

    /// Replace a trip's title and description. Id and date are kept.
    pub async fn update_trip(
        &mut self,
        id: TripId,
        title: &str,
        description: &str,
    ) -> JournalResult<Trip> {
        let index = self
            .state
            .trips
            .iter()
            .position(|t| t.id == id)
            .ok_or(JournalError::NotFound { kind: "trip", id: id.0 })?;
        let title = required(title, "title")?;

        let trip = &mut self.state.trips[index];
        trip.title = title;
        trip.description = description.trim().to_string();
        let updated = trip.clone();
        debug!("Updated trip {}", id);

        self.save().await?;
        Ok(updated)
    }

    /// Delete a trip and every photo attached to it. Deleting a trip that
    /// does not exist does nothing.
    pub async fn delete_trip(&mut self, id: TripId) -> JournalResult<()> {
        if self.trip(id).is_none() {
            debug!("Trip {} already gone", id);
            return Ok(());
        }

        // Both collections change before the write is awaited
        self.state.trips.retain(|t| t.id != id);
        let before = self.state.photos.len();
        self.state.photos.retain(|p| p.trip_id != id);
        debug!(
            "Deleted trip {} with {} photos",
            id,
            before - self.state.photos.len()
        );

        self.save().await
    }

    // ========================================================================
    // Photo mutations
    // ========================================================================

    pub async fn add_photo(
        &mut self,
        trip_id: TripId,
        uri: &str,
        description: &str,
        location: Option<GeoPoint>,
    ) -> JournalResult<Photo> {
        let draft = NewPhoto {
            uri: uri.to_string(),
            description: description.to_string(),
            location,
        };
        let added = self.add_photos(trip_id, vec![draft]).await?;
        added
            .into_iter()
            .next()
            .ok_or(JournalError::NotFound { kind: "trip", id: trip_id.0 })
    }

    /// Attach several photos to a trip with a single write. An empty batch
    /// changes nothing and does not write.
    pub async fn add_photos(
        &mut self,
        trip_id: TripId,
        drafts: Vec<NewPhoto>,
    ) -> JournalResult<Vec<Photo>> {
        if self.trip(trip_id).is_none() {
            return Err(JournalError::NotFound { kind: "trip", id: trip_id.0 });
        }
        if drafts.is_empty() {
            return Ok(Vec::new());
        }

        let date = (self.clock)();
        let mut added = Vec::with_capacity(drafts.len());
        for draft in drafts {
            let photo = Photo {
                id: PhotoId(self.state.next_photo_id),
                trip_id,
                uri: draft.uri,
                description: draft.description.trim().to_string(),
                date,
                location: draft.location,
            };
            self.state.next_photo_id += 1;
            self.state.photos.push(photo.clone());
            added.push(photo);
        }
        debug!("Added {} photos to trip {}", added.len(), trip_id);

        self.save().await?;
        Ok(added)
    }

    /// Delete one photo. Deleting a photo that does not exist does nothing.
    pub async fn delete_photo(&mut self, id: PhotoId) -> JournalResult<()> {
        let before = self.state.photos.len();
        self.state.photos.retain(|p| p.id != id);
        if self.state.photos.len() == before {
            debug!("Photo {} already gone", id);
            return Ok(());
        }
        debug!("Deleted photo {}", id);

        self.save().await
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    /// Write the full state under the journal key.
    pub async fn save(&self) -> JournalResult<()> {
        let raw = snapshot::encode(&self.state)?;
        if let Err(e) = self.store.set(&self.key, &raw).await {
            warn!("Failed to save journal: {}", e);
            return Err(e.into());
        }
        Ok(())
    }

    /// Replace in-memory state with the persisted document.
    ///
    /// Returns `Ok(true)` when a document was restored and `Ok(false)` when
    /// none existed or it could not be parsed. A failed read also resets the
    /// journal, then reports the error.
    pub async fn load(&mut self) -> JournalResult<bool> {
        let raw = match self.store.get(&self.key).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Failed to read journal: {}", e);
                self.state = JournalState::default();
                return Err(e.into());
            }
        };

        match raw.as_deref().and_then(snapshot::decode) {
            Some(state) => {
                info!(
                    "Loaded journal with {} trips and {} photos",
                    state.trips.len(),
                    state.photos.len()
                );
                self.state = state;
                Ok(true)
            }
            None => {
                self.state = JournalState::default();
                Ok(false)
            }
        }
    }

    /// Remove every trip and photo, reset both counters and erase the
    /// persisted record. Cannot be undone.
    pub async fn clear_all(&mut self) -> JournalResult<()> {
        self.state = JournalState::default();
        info!("Cleared all journal data");
        if let Err(e) = self.store.remove(&self.key).await {
            warn!("Failed to erase persisted journal: {}", e);
            return Err(e.into());
        }
        Ok(())
    }
}

fn required(text: &str, field: &'static str) -> JournalResult<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(JournalError::Validation { field });
    }
    Ok(trimmed.to_string())
}
