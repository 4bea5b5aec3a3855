pub mod handlers;
pub mod models;
pub mod requests;
pub mod rules;

use std::sync::Arc;

use crate::behaviors::ValidatorRegistry;
use crate::blob::BlobStore;
use crate::error::AppError;
use crate::events::EventPublisher;
use crate::mediator::Mediator;
use crate::Repositories;

pub use handlers::ImageHandlers;
pub use models::{Image, ImageContentDto, ImageDto, ImageOwner};
pub use requests::{DeleteImage, GetImage, UploadImage};

pub fn register(
    mediator: &Mediator,
    validators: &ValidatorRegistry,
    repos: &Repositories,
    blobs: Arc<dyn BlobStore>,
    events: Arc<dyn EventPublisher>,
    max_image_bytes: usize,
) -> Result<(), AppError> {
    let handlers = Arc::new(ImageHandlers::new(
        repos.images.clone(),
        repos.beers.clone(),
        repos.breweries.clone(),
        blobs,
        events,
    ));

    mediator.register::<UploadImage, _>(handlers.clone())?;
    mediator.register::<DeleteImage, _>(handlers.clone())?;
    mediator.register::<GetImage, _>(handlers)?;

    validators.register::<UploadImage, _>(rules::upload_image(max_image_bytes));
    validators.register::<DeleteImage, _>(rules::delete_image());
    validators.register::<GetImage, _>(rules::get_image());

    Ok(())
}
