use serde::{Deserialize, Serialize};

use crate::images::models::{ImageContentDto, ImageDto, ImageOwner};
use crate::mediator::Policy;
use crate::request;

/// Stores an image for a beer or brewery, replacing the previous one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadImage {
    pub owner: ImageOwner,
    pub file_name: String,
    pub content_type: String,
    #[serde(skip_serializing)]
    pub content: Vec<u8>,
}
request!(UploadImage => ImageDto, Command, Policy::Admin);

/// Returns whether there was an image to remove.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteImage {
    pub owner: ImageOwner,
}
request!(DeleteImage => bool, Command, Policy::Admin);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetImage {
    pub owner: ImageOwner,
}
request!(GetImage => ImageContentDto, Query, Policy::Anonymous);
