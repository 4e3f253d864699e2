use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::domain::{ImageId, UserId, UserState};

/// Per-image and per-concept counter store the service drives after scoring.
///
/// Implementations must make each call an atomic increment; ordering across
/// concurrent submissions is their concern, not the scorer's.
pub trait TagStatsRepository: Send + Sync {
    /// Increment the display counter of each ground-truth-invalid shown image.
    fn bump_image_displays(&self, images: &[ImageId]) -> Result<(), StatsError>;
    /// Increment the display counter of the attributed distractor concept.
    fn bump_concept_display(&self, concept: &str) -> Result<(), StatsError>;
    /// Record a wrong valid-image tag for each given image, at the user's
    /// newly computed weight.
    fn record_invalid_tags(&self, images: &[ImageId], weight: f64) -> Result<(), StatsError>;
}

/// Error enumeration for counter-store failures.
#[derive(Debug, thiserror::Error)]
pub enum StatsError {
    #[error("stats store unavailable: {0}")]
    Unavailable(String),
}

/// Read/write access to the per-user trust weight record.
///
/// Two concurrent submissions from one user can race on this record;
/// implementations must offer at least last-write-wins semantics.
pub trait UserWeightStore: Send + Sync {
    fn fetch(&self, user: &UserId) -> Result<Option<UserState>, WeightStoreError>;
    fn store(&self, user: &UserId, weight: f64) -> Result<(), WeightStoreError>;
}

/// Error enumeration for weight-store failures.
#[derive(Debug, thiserror::Error)]
pub enum WeightStoreError {
    #[error("weight store unavailable: {0}")]
    Unavailable(String),
}

/// In-memory counters backing the default binary and the test suites.
#[derive(Default, Clone)]
pub struct MemoryTagStats {
    image_displays: Arc<Mutex<HashMap<ImageId, u64>>>,
    concept_displays: Arc<Mutex<HashMap<String, u64>>>,
    invalid_tags: Arc<Mutex<Vec<(ImageId, f64)>>>,
}

impl MemoryTagStats {
    pub fn image_display_count(&self, id: &ImageId) -> u64 {
        let guard = self.image_displays.lock().expect("stats mutex poisoned");
        guard.get(id).copied().unwrap_or(0)
    }

    pub fn concept_display_count(&self, concept: &str) -> u64 {
        let guard = self.concept_displays.lock().expect("stats mutex poisoned");
        guard.get(concept).copied().unwrap_or(0)
    }

    pub fn invalid_tag_events(&self) -> Vec<(ImageId, f64)> {
        self.invalid_tags.lock().expect("stats mutex poisoned").clone()
    }
}

impl TagStatsRepository for MemoryTagStats {
    fn bump_image_displays(&self, images: &[ImageId]) -> Result<(), StatsError> {
        let mut guard = self.image_displays.lock().expect("stats mutex poisoned");
        for id in images {
            *guard.entry(id.clone()).or_insert(0) += 1;
        }
        Ok(())
    }

    fn bump_concept_display(&self, concept: &str) -> Result<(), StatsError> {
        let mut guard = self.concept_displays.lock().expect("stats mutex poisoned");
        *guard.entry(concept.to_string()).or_insert(0) += 1;
        Ok(())
    }

    fn record_invalid_tags(&self, images: &[ImageId], weight: f64) -> Result<(), StatsError> {
        let mut guard = self.invalid_tags.lock().expect("stats mutex poisoned");
        for id in images {
            guard.push((id.clone(), weight));
        }
        Ok(())
    }
}

/// In-memory weight records.
///
/// The optional fallback weight stands in for the session-provided weight
/// of users the store has never seen, which keeps the demo binary usable
/// without an identity layer.
#[derive(Default, Clone)]
pub struct MemoryUserDirectory {
    weights: Arc<Mutex<HashMap<UserId, f64>>>,
    fallback_weight: Option<f64>,
}

impl MemoryUserDirectory {
    pub fn with_fallback_weight(weight: f64) -> Self {
        Self {
            weights: Arc::default(),
            fallback_weight: Some(weight),
        }
    }

    pub fn insert(&self, user: UserId, weight: f64) {
        self.weights
            .lock()
            .expect("weight mutex poisoned")
            .insert(user, weight);
    }

    pub fn weight_of(&self, user: &UserId) -> Option<f64> {
        self.weights
            .lock()
            .expect("weight mutex poisoned")
            .get(user)
            .copied()
    }
}

impl UserWeightStore for MemoryUserDirectory {
    fn fetch(&self, user: &UserId) -> Result<Option<UserState>, WeightStoreError> {
        let guard = self.weights.lock().expect("weight mutex poisoned");
        let weight = guard.get(user).copied().or(self.fallback_weight);
        Ok(weight.map(|weight| UserState {
            id: user.clone(),
            weight,
        }))
    }

    fn store(&self, user: &UserId, weight: f64) -> Result<(), WeightStoreError> {
        self.weights
            .lock()
            .expect("weight mutex poisoned")
            .insert(user.clone(), weight);
        Ok(())
    }
}
