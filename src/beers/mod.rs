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

pub use handlers::BeerHandlers;
pub use models::{Beer, BeerDto, BeerInput};
pub use requests::{CreateBeer, DeleteBeer, DeleteBreweryBeers, GetBeerById, GetBeers, UpdateBeer};

pub fn register(
    mediator: &Mediator,
    validators: &ValidatorRegistry,
    repos: &Repositories,
    events: Arc<dyn EventPublisher>,
) -> Result<(), AppError> {
    let handlers = Arc::new(BeerHandlers::new(
        repos.beers.clone(),
        repos.breweries.clone(),
        repos.styles.clone(),
        events,
    ));

    mediator.register::<CreateBeer, _>(handlers.clone())?;
    mediator.register::<UpdateBeer, _>(handlers.clone())?;
    mediator.register::<DeleteBeer, _>(handlers.clone())?;
    mediator.register::<DeleteBreweryBeers, _>(handlers.clone())?;
    mediator.register::<GetBeerById, _>(handlers.clone())?;
    mediator.register::<GetBeers, _>(handlers)?;

    validators.register::<CreateBeer, _>(rules::create_beer());
    validators.register::<UpdateBeer, _>(rules::update_beer());
    validators.register::<GetBeers, _>(rules::get_beers());

    Ok(())
}
