//! Pet representation

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::UnknownStatus;

/// Availability of a pet in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PetStatus {
    /// Available for sale
    Available,
    /// Sale in progress
    Pending,
    /// Already sold
    Sold,
}

impl PetStatus {
    /// Every status the service accepts.
    pub const ALL: [PetStatus; 3] = [PetStatus::Available, PetStatus::Pending, PetStatus::Sold];

    /// Wire spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            PetStatus::Available => "available",
            PetStatus::Pending => "pending",
            PetStatus::Sold => "sold",
        }
    }
}

impl fmt::Display for PetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PetStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PetStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// Pet category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Category id
    pub id: i64,
    /// Category name
    pub name: String,
}

/// Pet tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Tag id
    pub id: i64,
    /// Tag name
    pub name: String,
}

/// A pet.
///
/// Empty `photoUrls`/`tags` and a missing `category` are left out of the
/// serialized payload, so `Pet::new(1, "Buddy", PetStatus::Available)` goes on
/// the wire as `{"id":1,"name":"Buddy","status":"available"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pet {
    /// Pet id
    pub id: i64,
    /// Pet name
    pub name: String,
    /// Optional category
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    /// Photo URLs, in order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub photo_urls: Vec<String>,
    /// Tags, in order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
    /// Availability
    pub status: PetStatus,
}

impl Pet {
    /// A pet with only the required fields.
    pub fn new(id: i64, name: impl Into<String>, status: PetStatus) -> Self {
        Self {
            id,
            name: name.into(),
            category: None,
            photo_urls: Vec::new(),
            tags: Vec::new(),
            status,
        }
    }

    /// Set the category.
    pub fn with_category(mut self, id: i64, name: impl Into<String>) -> Self {
        self.category = Some(Category {
            id,
            name: name.into(),
        });
        self
    }

    /// Append a photo URL.
    pub fn with_photo_url(mut self, url: impl Into<String>) -> Self {
        self.photo_urls.push(url.into());
        self
    }

    /// Append a tag.
    pub fn with_tag(mut self, id: i64, name: impl Into<String>) -> Self {
        self.tags.push(Tag {
            id,
            name: name.into(),
        });
        self
    }
}
