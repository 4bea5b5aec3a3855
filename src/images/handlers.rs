use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

use crate::beers::Beer;
use crate::blob::BlobStore;
use crate::breweries::Brewery;
use crate::error::AppError;
use crate::events::{DomainEvent, EventPublisher};
use crate::images::models::{extension_for, Image, ImageContentDto, ImageDto, ImageOwner};
use crate::images::requests::{DeleteImage, GetImage, UploadImage};
use crate::mediator::{RequestContext, RequestHandler};
use crate::store::{Key, Repository};

pub struct ImageHandlers {
    images: Arc<dyn Repository<Image>>,
    beers: Arc<dyn Repository<Beer>>,
    breweries: Arc<dyn Repository<Brewery>>,
    blobs: Arc<dyn BlobStore>,
    events: Arc<dyn EventPublisher>,
}

impl ImageHandlers {
    pub fn new(
        images: Arc<dyn Repository<Image>>,
        beers: Arc<dyn Repository<Beer>>,
        breweries: Arc<dyn Repository<Brewery>>,
        blobs: Arc<dyn BlobStore>,
        events: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            images,
            beers,
            breweries,
            blobs,
            events,
        }
    }

    async fn images_of(&self, owner: ImageOwner) -> Result<Vec<Image>, AppError> {
        self.images
            .find_by_key(
                &Key::new()
                    .eq("owner.kind", owner.kind().to_string())
                    .eq("owner.id", owner.id()),
            )
            .await
    }

    /// Sets the owner's `image_uri`. Returns false when the owner is gone.
    async fn set_owner_uri(&self, owner: ImageOwner, uri: Option<String>) -> Result<bool, AppError> {
        let now = Utc::now();
        let result = match owner {
            ImageOwner::Beer { id } => self
                .beers
                .modify(
                    id,
                    Box::new(move |beer: &mut Beer| {
                        beer.image_uri = uri;
                        beer.updated_at = now;
                        Ok(())
                    }),
                )
                .await
                .map(|_| ()),
            ImageOwner::Brewery { id } => self
                .breweries
                .modify(
                    id,
                    Box::new(move |brewery: &mut Brewery| {
                        brewery.image_uri = uri;
                        brewery.updated_at = now;
                        Ok(())
                    }),
                )
                .await
                .map(|_| ()),
        };

        match result {
            Ok(()) => Ok(true),
            Err(AppError::NotFound { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    fn owner_not_found(owner: ImageOwner) -> AppError {
        AppError::NotFound {
            entity: match owner {
                ImageOwner::Beer { .. } => "Beer",
                ImageOwner::Brewery { .. } => "Brewery",
            },
            id: owner.id(),
        }
    }

    async fn ensure_owner_exists(&self, owner: ImageOwner) -> Result<(), AppError> {
        let exists = match owner {
            ImageOwner::Beer { id } => self.beers.exists(id).await?,
            ImageOwner::Brewery { id } => self.breweries.exists(id).await?,
        };
        if exists {
            Ok(())
        } else {
            Err(Self::owner_not_found(owner))
        }
    }

    /// Best effort; the caller is already failing.
    async fn discard_blob(&self, key: &str) {
        if let Err(e) = self.blobs.delete(key).await {
            warn!("Failed to discard blob {}: {}", key, e);
        }
    }

    /// Removes blobs and records; returns how many images went.
    async fn remove(&self, images: Vec<Image>) -> Result<usize, AppError> {
        let mut removed = 0;
        for image in images {
            if !self.blobs.delete(&image.blob_key).await? {
                warn!("Blob {} of {} was already missing", image.blob_key, image.owner);
            }
            if self.images.delete(image.id).await? {
                removed += 1;
            }
        }
        Ok(removed)
    }
}

#[async_trait]
impl RequestHandler<UploadImage> for ImageHandlers {
    async fn handle(&self, _ctx: &RequestContext, request: &UploadImage) -> Result<ImageDto, AppError> {
        let owner = request.owner;
        self.ensure_owner_exists(owner).await?;
        let previous = self.images_of(owner).await?;

        // Unique key from timestamp and nanoseconds
        let now = Utc::now();
        let content_type = request.content_type.to_ascii_lowercase();
        let blob_key = format!(
            "{}/{}_{:x}.{}",
            owner.key_prefix(),
            now.timestamp(),
            now.timestamp_subsec_nanos(),
            extension_for(&content_type)
        );

        // The previous image stays in place until the new one is fully stored
        let uri = self.blobs.put(&blob_key, request.content.clone()).await?;
        let inserted = self
            .images
            .insert(Image {
                id: 0,
                owner,
                blob_key: blob_key.clone(),
                uri: uri.clone(),
                file_name: request.file_name.trim().to_string(),
                content_type,
                size: request.content.len(),
                created_at: now,
            })
            .await;
        let image = match inserted {
            Ok(image) => image,
            Err(e) => {
                self.discard_blob(&blob_key).await;
                return Err(e);
            }
        };

        let linked = self.set_owner_uri(owner, Some(uri.clone())).await;
        if !matches!(linked, Ok(true)) {
            self.images.delete(image.id).await?;
            self.discard_blob(&blob_key).await;
            return Err(match linked {
                Err(e) => e,
                Ok(_) => Self::owner_not_found(owner),
            });
        }

        let stale: Vec<Image> = previous
            .into_iter()
            .filter(|old| old.blob_key != blob_key)
            .collect();
        if self.remove(stale).await? > 0 {
            info!("Replaced image of {}", owner);
        }
        info!("Stored image {} for {} ({} bytes)", image.id, owner, image.size);

        self.events
            .publish(DomainEvent::ImageUploaded { owner, uri })
            .await?;

        Ok(image.into())
    }
}

#[async_trait]
impl RequestHandler<DeleteImage> for ImageHandlers {
    async fn handle(&self, _ctx: &RequestContext, request: &DeleteImage) -> Result<bool, AppError> {
        let owner = request.owner;
        let removed = self.remove(self.images_of(owner).await?).await?;
        if removed == 0 {
            return Ok(false);
        }

        if !self.set_owner_uri(owner, None).await? {
            info!("Removed image of deleted {}", owner);
        }

        self.events
            .publish(DomainEvent::ImageDeleted { owner })
            .await?;
        Ok(true)
    }
}

#[async_trait]
impl RequestHandler<GetImage> for ImageHandlers {
    async fn handle(
        &self,
        _ctx: &RequestContext,
        request: &GetImage,
    ) -> Result<ImageContentDto, AppError> {
        let not_found = AppError::NotFound {
            entity: "Image",
            id: request.owner.id(),
        };

        // Newest first; an upload briefly overlaps the image it replaces
        let Some(image) = self.images_of(request.owner).await?.pop() else {
            return Err(not_found);
        };
        let Some(content) = self.blobs.get(&image.blob_key).await? else {
            warn!("Image {} has no blob at {}", image.id, image.blob_key);
            return Err(not_found);
        };

        Ok(ImageContentDto {
            file_name: image.file_name,
            content_type: image.content_type,
            content,
        })
    }
}
