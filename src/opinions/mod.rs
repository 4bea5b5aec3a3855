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

pub use handlers::OpinionHandlers;
pub use models::{BeerRatingDto, Opinion, OpinionDto, OpinionInput};
pub use requests::{
    CreateOpinion, DeleteBeerOpinions, DeleteOpinion, DeleteUserOpinions, GetBeerRating,
    GetOpinionById, GetOpinions, UpdateOpinion,
};

pub fn register(
    mediator: &Mediator,
    validators: &ValidatorRegistry,
    repos: &Repositories,
    events: Arc<dyn EventPublisher>,
) -> Result<(), AppError> {
    let handlers = Arc::new(OpinionHandlers::new(
        repos.opinions.clone(),
        repos.beers.clone(),
        events,
    ));

    mediator.register::<CreateOpinion, _>(handlers.clone())?;
    mediator.register::<UpdateOpinion, _>(handlers.clone())?;
    mediator.register::<DeleteOpinion, _>(handlers.clone())?;
    mediator.register::<DeleteBeerOpinions, _>(handlers.clone())?;
    mediator.register::<DeleteUserOpinions, _>(handlers.clone())?;
    mediator.register::<GetOpinionById, _>(handlers.clone())?;
    mediator.register::<GetOpinions, _>(handlers.clone())?;
    mediator.register::<GetBeerRating, _>(handlers)?;

    validators.register::<CreateOpinion, _>(rules::create_opinion());
    validators.register::<UpdateOpinion, _>(rules::update_opinion());
    validators.register::<GetOpinions, _>(rules::get_opinions());

    Ok(())
}
