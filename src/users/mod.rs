pub mod auth;
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

pub use handlers::UserHandlers;
pub use models::{User, UserDto};
pub use requests::{
    AuthenticateUser, ChangePassword, CreateUser, DeleteUser, GetUserById, GetUsers, LockUser,
    SetUserRole, UpdateUser,
};

pub fn register(
    mediator: &Mediator,
    validators: &ValidatorRegistry,
    repos: &Repositories,
    events: Arc<dyn EventPublisher>,
) -> Result<(), AppError> {
    let handlers = Arc::new(UserHandlers::new(repos.users.clone(), events));

    mediator.register::<CreateUser, _>(handlers.clone())?;
    mediator.register::<UpdateUser, _>(handlers.clone())?;
    mediator.register::<ChangePassword, _>(handlers.clone())?;
    mediator.register::<SetUserRole, _>(handlers.clone())?;
    mediator.register::<LockUser, _>(handlers.clone())?;
    mediator.register::<DeleteUser, _>(handlers.clone())?;
    mediator.register::<AuthenticateUser, _>(handlers.clone())?;
    mediator.register::<GetUserById, _>(handlers.clone())?;
    mediator.register::<GetUsers, _>(handlers)?;

    validators.register::<CreateUser, _>(rules::create_user());
    validators.register::<UpdateUser, _>(rules::update_user());
    validators.register::<ChangePassword, _>(rules::change_password());
    validators.register::<AuthenticateUser, _>(rules::authenticate_user());
    validators.register::<GetUsers, _>(rules::get_users());

    Ok(())
}
