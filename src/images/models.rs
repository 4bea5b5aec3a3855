use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The catalog entry an image illustrates. Each owner has at most one image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ImageOwner {
    Beer { id: i64 },
    Brewery { id: i64 },
}

impl ImageOwner {
    pub fn id(&self) -> i64 {
        match *self {
            ImageOwner::Beer { id } | ImageOwner::Brewery { id } => id,
        }
    }

    /// Serialized tag of the owner variant.
    pub fn kind(&self) -> &'static str {
        match self {
            ImageOwner::Beer { .. } => "beer",
            ImageOwner::Brewery { .. } => "brewery",
        }
    }

    /// Blob key directory of the owner's images.
    pub fn key_prefix(&self) -> String {
        match self {
            ImageOwner::Beer { id } => format!("beers/{}", id),
            ImageOwner::Brewery { id } => format!("breweries/{}", id),
        }
    }
}

impl fmt::Display for ImageOwner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageOwner::Beer { id } => write!(f, "beer {}", id),
            ImageOwner::Brewery { id } => write!(f, "brewery {}", id),
        }
    }
}

pub const ALLOWED_CONTENT_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif", "image/webp"];

/// File extension for an allowed content type.
pub fn extension_for(content_type: &str) -> &'static str {
    match content_type {
        "image/jpeg" => "jpg",
        "image/png" => "png",
        "image/gif" => "gif",
        "image/webp" => "webp",
        _ => "bin",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    #[serde(default)]
    pub id: i64,
    pub owner: ImageOwner,
    pub blob_key: String,
    pub uri: String,
    pub file_name: String,
    pub content_type: String,
    pub size: usize,
    pub created_at: DateTime<Utc>,
}

crate::entity!(Image, "Image", "images");

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageDto {
    pub id: i64,
    pub owner: ImageOwner,
    pub uri: String,
    pub file_name: String,
    pub content_type: String,
    pub size: usize,
    pub created_at: DateTime<Utc>,
}

impl From<Image> for ImageDto {
    fn from(image: Image) -> Self {
        Self {
            id: image.id,
            owner: image.owner,
            uri: image.uri,
            file_name: image.file_name,
            content_type: image.content_type,
            size: image.size,
            created_at: image.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageContentDto {
    pub file_name: String,
    pub content_type: String,
    #[serde(skip_serializing)]
    pub content: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_keys() {
        assert_eq!(ImageOwner::Beer { id: 4 }.key_prefix(), "beers/4");
        assert_eq!(ImageOwner::Brewery { id: 9 }.key_prefix(), "breweries/9");
        assert_eq!(ImageOwner::Brewery { id: 9 }.to_string(), "brewery 9");
    }

    #[test]
    fn test_owner_json_shape() {
        let owner: ImageOwner = serde_json::from_str(r#"{"kind":"brewery","id":2}"#).unwrap();
        assert_eq!(owner, ImageOwner::Brewery { id: 2 });
    }

    #[test]
    fn test_extensions() {
        assert_eq!(extension_for("image/jpeg"), "jpg");
        assert_eq!(extension_for("text/plain"), "bin");
    }
}
