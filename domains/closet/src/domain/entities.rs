//! Domain entities for the Closet domain
//!
//! Clothing categories, catalog records, and the upload inputs they are
//! built from.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::LazyLock;
use uuid::Uuid;
use wardrobe_auth::Identity;

/// Trailing extension: a final dot followed by characters that are neither
/// `/` nor `.` (compiled once)
static EXTENSION_REGEX: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"\.[^/.]+$").expect("extension regex is valid"));

/// Content type used when neither the client nor the extension says otherwise
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Clothing category
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
    sqlx::Type,
)]
#[sqlx(type_name = "wardrobe_category")]
pub enum Category {
    #[default]
    Jeans,
    Shirts,
    Jackets,
    #[serde(rename = "T-Shirts")]
    #[sqlx(rename = "T-Shirts")]
    TShirts,
    #[serde(rename = "Traditional Wear")]
    #[sqlx(rename = "Traditional Wear")]
    TraditionalWear,
}

impl Category {
    /// Every category, in display order
    pub const ALL: [Category; 5] = [
        Category::Jeans,
        Category::Shirts,
        Category::Jackets,
        Category::TShirts,
        Category::TraditionalWear,
    ];

    /// Display string, also used as the storage path segment
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Jeans => "Jeans",
            Category::Shirts => "Shirts",
            Category::Jackets => "Jackets",
            Category::TShirts => "T-Shirts",
            Category::TraditionalWear => "Traditional Wear",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string names no known category
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown category '{0}'. Expected one of: Jeans, Shirts, Jackets, T-Shirts, Traditional Wear")]
pub struct ParseCategoryError(pub String);

impl std::str::FromStr for Category {
    type Err = ParseCategoryError;

    /// Matches display strings case-insensitively
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Category::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParseCategoryError(s.to_string()))
    }
}

/// A stored clothing photo as recorded in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ItemRecord {
    pub id: Uuid,
    #[sqlx(rename = "user_id")]
    pub owner: String,
    pub category: Category,
    #[sqlx(rename = "name")]
    pub display_name: String,
    #[sqlx(rename = "image_url")]
    pub media_url: String,
    pub storage_path: String,
    pub created_at: DateTime<Utc>,
}

/// Fields supplied when inserting a catalog record; the store assigns
/// `id` and `created_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDraft {
    pub owner: String,
    pub category: Category,
    pub display_name: String,
    pub media_url: String,
    pub storage_path: String,
}

impl ItemDraft {
    pub fn new(
        owner: &Identity,
        category: Category,
        filename: &str,
        media_url: String,
        storage_path: String,
    ) -> Self {
        Self {
            owner: owner.id().to_string(),
            category,
            display_name: display_name(filename),
            media_url,
            storage_path,
        }
    }

    /// Materialize a record with a fresh id and the current time
    pub fn into_record(self) -> ItemRecord {
        ItemRecord {
            id: Uuid::new_v4(),
            owner: self.owner,
            category: self.category,
            display_name: self.display_name,
            media_url: self.media_url,
            storage_path: self.storage_path,
            created_at: Utc::now(),
        }
    }
}

/// A user-selected photo awaiting upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    /// Keeps only the last path component of `filename`, since clients may
    /// send a full local path.
    pub fn new(filename: &str, content_type: Option<String>, bytes: Vec<u8>) -> Self {
        let base = filename
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or_default()
            .trim();
        let filename = match base {
            "" | "." | ".." => "upload".to_string(),
            name => name.to_string(),
        };

        Self {
            filename,
            content_type: content_type.filter(|ct| !ct.trim().is_empty()),
            bytes,
        }
    }

    /// Declared content type, else one guessed from the extension
    pub fn content_type(&self) -> String {
        if let Some(content_type) = &self.content_type {
            return content_type.clone();
        }

        let extension = self
            .filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            "jpg" | "jpeg" => "image/jpeg",
            "png" => "image/png",
            "webp" => "image/webp",
            "gif" => "image/gif",
            "heic" => "image/heic",
            "avif" => "image/avif",
            _ => DEFAULT_CONTENT_TYPE,
        }
        .to_string()
    }
}

/// Derive a display name by stripping the trailing extension.
///
/// Falls back to the full filename when nothing would remain
/// (e.g. `.hidden`).
pub fn display_name(filename: &str) -> String {
    let stripped = EXTENSION_REGEX.replace(filename, "");
    if stripped.is_empty() {
        filename.to_string()
    } else {
        stripped.into_owned()
    }
}

/// Storage path for an uploaded photo: `<owner>/<category>/<stamp>-<filename>`
pub fn storage_path(owner: &Identity, category: Category, stamp_ms: i64, filename: &str) -> String {
    format!("{}/{}/{}-{}", owner.id(), category, stamp_ms, filename)
}

/// Millisecond wall-clock stamps that never repeat within one instance.
///
/// Two calls in the same millisecond get consecutive values, so paths
/// built from them stay unique.
#[derive(Debug, Default)]
pub struct StampSequence {
    last: AtomicI64,
}

impl StampSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next stamp: the current time, bumped past the previous stamp if needed
    pub fn next(&self) -> i64 {
        let now = Utc::now().timestamp_millis();
        let mut last = self.last.load(Ordering::Relaxed);
        loop {
            let next = now.max(last + 1);
            match self
                .last
                .compare_exchange_weak(last, next, Ordering::AcqRel, Ordering::Relaxed)
            {
                Ok(_) => return next,
                Err(actual) => last = actual,
            }
        }
    }
}

/// Parse the millisecond stamp out of a storage path's last segment
pub fn stamp_of(path: &str) -> Option<i64> {
    let name = path.rsplit('/').next()?;
    let (stamp, rest) = name.split_once('-')?;
    if rest.is_empty() {
        return None;
    }
    stamp.parse().ok()
}
