pub mod filtering;
pub mod handlers;
pub mod models;
pub mod requests;
pub mod rules;

use std::sync::Arc;

use crate::behaviors::ValidatorRegistry;
use crate::error::AppError;
use crate::mediator::Mediator;
use crate::Repositories;

pub use handlers::StyleHandlers;
pub use models::{BeerStyle, BeerStyleDto, BeerStyleInput};
pub use requests::{CreateBeerStyle, DeleteBeerStyle, GetBeerStyleById, GetBeerStyles, UpdateBeerStyle};

pub fn register(
    mediator: &Mediator,
    validators: &ValidatorRegistry,
    repos: &Repositories,
) -> Result<(), AppError> {
    let handlers = Arc::new(StyleHandlers::new(repos.styles.clone(), repos.beers.clone()));

    mediator.register::<CreateBeerStyle, _>(handlers.clone())?;
    mediator.register::<UpdateBeerStyle, _>(handlers.clone())?;
    mediator.register::<DeleteBeerStyle, _>(handlers.clone())?;
    mediator.register::<GetBeerStyleById, _>(handlers.clone())?;
    mediator.register::<GetBeerStyles, _>(handlers)?;

    validators.register::<CreateBeerStyle, _>(rules::create_beer_style());
    validators.register::<UpdateBeerStyle, _>(rules::update_beer_style());
    validators.register::<GetBeerStyles, _>(rules::get_beer_styles());

    Ok(())
}
