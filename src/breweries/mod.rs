pub mod filtering;
pub mod handlers;
pub mod models;
pub mod requests;
pub mod rules;

use std::sync::Arc;

use crate::behaviors::ValidatorRegistry;
use crate::error::AppError;
use crate::events::EventPublisher;
use crate::mediator::Mediator;
use crate::Repositories;

pub use handlers::BreweryHandlers;
pub use models::{Address, Brewery, BreweryDto, BreweryInput};
pub use requests::{CreateBrewery, DeleteBrewery, GetBreweries, GetBreweryById, UpdateBrewery};

pub fn register(
    mediator: &Mediator,
    validators: &ValidatorRegistry,
    repos: &Repositories,
    events: Arc<dyn EventPublisher>,
) -> Result<(), AppError> {
    let handlers = Arc::new(BreweryHandlers::new(repos.breweries.clone(), events));

    mediator.register::<CreateBrewery, _>(handlers.clone())?;
    mediator.register::<UpdateBrewery, _>(handlers.clone())?;
    mediator.register::<DeleteBrewery, _>(handlers.clone())?;
    mediator.register::<GetBreweryById, _>(handlers.clone())?;
    mediator.register::<GetBreweries, _>(handlers)?;

    validators.register::<CreateBrewery, _>(rules::create_brewery());
    validators.register::<UpdateBrewery, _>(rules::update_brewery());
    validators.register::<GetBreweries, _>(rules::get_breweries());

    Ok(())
}
