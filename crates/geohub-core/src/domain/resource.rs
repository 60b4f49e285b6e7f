//! Resource record domain types.
//!
//! These types describe hub catalog entries independent of the wire format
//! the hub uses to deliver them.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Resource Type
// ─────────────────────────────────────────────────────────────────────────────

/// Kind of geospatial asset a record describes.
///
/// Unknown hub types are preserved as [`ResourceType::Other`] so a new hub
/// category never makes a record malformed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ResourceType {
    /// Cartographic style (XML symbology).
    Style,
    /// Processing model.
    Model,
    /// `GeoPackage` data file.
    Geopackage,
    /// 3D model asset.
    Model3D,
    /// Layer definition file.
    LayerDefinition,
    /// Project / map file.
    Map,
    /// Any type the hub sends that this crate does not know about.
    Other(String),
}

impl ResourceType {
    /// Known types, in the order the hub documents them.
    pub const KNOWN: [Self; 6] = [
        Self::Style,
        Self::Model,
        Self::Geopackage,
        Self::Model3D,
        Self::LayerDefinition,
        Self::Map,
    ];

    /// Parse a hub type name, case-insensitively.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        Self::KNOWN
            .into_iter()
            .find(|known| known.as_str().eq_ignore_ascii_case(trimmed))
            .unwrap_or_else(|| Self::Other(trimmed.to_string()))
    }

    /// The hub's name for this type.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Style => "Style",
            Self::Model => "Model",
            Self::Geopackage => "Geopackage",
            Self::Model3D => "3DModel",
            Self::LayerDefinition => "LayerDefinition",
            Self::Map => "Map",
            Self::Other(name) => name,
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<String> for ResourceType {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<ResourceType> for String {
    fn from(value: ResourceType) -> Self {
        match value {
            ResourceType::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Resource Record
// ─────────────────────────────────────────────────────────────────────────────

/// One catalog entry describing a downloadable geospatial asset.
///
/// Records are created by a sync pass and only change when a later pass
/// refreshes the same `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRecord {
    /// Stable hub identifier (UUID string).
    pub id: String,
    /// Display name.
    pub name: String,
    /// Resource category.
    pub resource_type: ResourceType,
    /// Subtypes (e.g. "Fill", "Line" for styles). Usually zero or one entry.
    #[serde(default)]
    pub subtypes: Vec<String>,
    /// Uploader's display name.
    #[serde(default)]
    pub creator: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Upload timestamp.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Last modification timestamp.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    /// Number of downloads reported by the hub.
    #[serde(default)]
    pub download_count: u64,
    /// Preview image URL.
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    /// URL of the downloadable file.
    pub download_url: String,
    /// Size advertised by the hub. Not authoritative.
    #[serde(default)]
    pub file_size_hint: Option<u64>,
    /// Names of plugins or resources this one depends on.
    #[serde(default)]
    pub dependencies: Vec<String>,
}

impl ResourceRecord {
    /// Create a record with the required fields; the rest default to empty.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        resource_type: ResourceType,
        download_url: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            resource_type,
            subtypes: Vec::new(),
            creator: String::new(),
            description: String::new(),
            created_at: None,
            updated_at: None,
            download_count: 0,
            thumbnail_url: None,
            download_url: download_url.into(),
            file_size_hint: None,
            dependencies: Vec::new(),
        }
    }

    /// Set the creator.
    #[must_use]
    pub fn with_creator(mut self, creator: impl Into<String>) -> Self {
        self.creator = creator.into();
        self
    }

    /// Add a subtype.
    #[must_use]
    pub fn with_subtype(mut self, subtype: impl Into<String>) -> Self {
        self.subtypes.push(subtype.into());
        self
    }

    /// Set the thumbnail URL.
    #[must_use]
    pub fn with_thumbnail(mut self, url: impl Into<String>) -> Self {
        self.thumbnail_url = Some(url.into());
        self
    }

    /// Primary subtype, if any.
    #[must_use]
    pub fn subtype(&self) -> Option<&str> {
        self.subtypes.first().map(String::as_str)
    }

    /// Case-insensitive exact subtype match.
    #[must_use]
    pub fn has_subtype(&self, subtype: &str) -> bool {
        self.subtypes
            .iter()
            .any(|s| s.eq_ignore_ascii_case(subtype.trim()))
    }

    /// Local file name for the downloaded asset.
    ///
    /// Uses the last path segment of `download_url` (query and fragment
    /// stripped), falling back to the record id when the URL has no usable
    /// segment. Path separators and parent references never survive.
    #[must_use]
    pub fn file_name(&self) -> String {
        let without_query = self
            .download_url
            .split(['?', '#'])
            .next()
            .unwrap_or_default();
        let after_scheme = without_query
            .split_once("://")
            .map_or(without_query, |(_, rest)| rest);
        // The first segment is the host when a scheme was present.
        let path = after_scheme.split_once('/').map_or("", |(_, p)| p);
        let candidate = path
            .rsplit('/')
            .find(|segment| !segment.is_empty())
            .unwrap_or_default();
        let decoded = urlencoding::decode_binary(candidate.as_bytes());
        let decoded = String::from_utf8_lossy(&decoded);
        let cleaned: String = decoded
            .chars()
            .filter(|c| !matches!(c, '/' | '\\' | '\0'))
            .collect();

        if cleaned.is_empty() || cleaned == "." || cleaned == ".." {
            sanitize_id(&self.id)
        } else {
            cleaned
        }
    }
}

fn sanitize_id(id: &str) -> String {
    let cleaned: String = id
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_'))
        .collect();
    if cleaned.is_empty() {
        "resource".to_string()
    } else {
        cleaned
    }
}
