//! Breed (variety of a sapling) records.
//!
//! The backend names the display field `breedName`; screens use `name`.

use serde::{Deserialize, Serialize};

/// How stock of a breed is counted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BreedMode {
    /// Counted per plant.
    Individual,
    /// Counted per tray slot holding `items_per_slot` plants.
    Slot,
}

impl BreedMode {
    /// Wire label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Individual => "INDIVIDUAL",
            Self::Slot => "SLOT",
        }
    }
}

/// Breed as consumed by screens.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Breed {
    /// Backend identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Parent sapling.
    pub sapling_id: String,
    /// Owning nursery.
    pub nursery_id: String,
    /// Counting mode, when the backend reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<BreedMode>,
    /// Plants per slot for [`BreedMode::Slot`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items_per_slot: Option<u32>,
    /// Optional image location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Creation timestamp.
    pub created_at: String,
    /// Last update timestamp.
    pub updated_at: String,
}

/// Breed as returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BreedResponse {
    /// Backend identifier.
    pub id: String,
    /// Display name.
    pub breed_name: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
    /// Parent sapling.
    pub sapling_id: String,
    /// Owning nursery.
    pub nursery_id: String,
    /// Counting mode.
    #[serde(default)]
    pub mode: Option<BreedMode>,
    /// Plants per slot.
    #[serde(default)]
    pub items_per_slot: Option<u32>,
    /// Optional image location.
    #[serde(default)]
    pub image_url: Option<String>,
    /// Creation timestamp.
    pub created_at: String,
    /// Last update timestamp.
    pub updated_at: String,
}

impl From<BreedResponse> for Breed {
    fn from(breed: BreedResponse) -> Self {
        Self {
            id: breed.id,
            name: breed.breed_name,
            description: breed.description,
            sapling_id: breed.sapling_id,
            nursery_id: breed.nursery_id,
            mode: breed.mode,
            items_per_slot: breed.items_per_slot,
            image_url: breed.image_url,
            created_at: breed.created_at,
            updated_at: breed.updated_at,
        }
    }
}

/// Body for creating or replacing a breed; serialises `name` as `breedName`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BreedRequest {
    /// Display name.
    #[serde(rename = "breedName")]
    pub name: String,
    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Parent sapling.
    pub sapling_id: String,
    /// Owning nursery.
    pub nursery_id: String,
    /// Counting mode.
    pub mode: BreedMode,
    /// Plants per slot for [`BreedMode::Slot`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items_per_slot: Option<u32>,
    /// Optional image location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}
