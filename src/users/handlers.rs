use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::AppError;
use crate::events::{DomainEvent, EventPublisher};
use crate::filtering::{ListFilter, PagedList};
use crate::mediator::{RequestContext, RequestHandler, Role};
use crate::store::{Key, Repository};
use crate::users::auth::{hash_in_background, verify_in_background};
use crate::users::filtering::UsersFilter;
use crate::users::models::{User, UserDto};
use crate::users::requests::{
    AuthenticateUser, ChangePassword, CreateUser, DeleteUser, GetUserById, GetUsers, LockUser,
    SetUserRole, UpdateUser,
};

pub struct UserHandlers {
    users: Arc<dyn Repository<User>>,
    events: Arc<dyn EventPublisher>,
}

fn clean(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

fn ensure_can_modify(ctx: &RequestContext, user_id: i64) -> Result<(), AppError> {
    if ctx.actor.can_modify(user_id) {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "{} may not modify user {}",
            ctx.actor, user_id
        )))
    }
}

impl UserHandlers {
    pub fn new(users: Arc<dyn Repository<User>>, events: Arc<dyn EventPublisher>) -> Self {
        Self { users, events }
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let found = self
            .users
            .find_by_key(&Key::new().eq("username", username.trim().to_lowercase()))
            .await?;
        Ok(found.into_iter().next())
    }

    async fn ensure_email_is_free(&self, email: &str, except_id: i64) -> Result<(), AppError> {
        let taken = self
            .users
            .find_by_key(&Key::new().eq("email", email.to_string()))
            .await?;
        if taken.iter().all(|u| u.id == except_id) {
            Ok(())
        } else {
            Err(AppError::Conflict("email is already registered".to_string()))
        }
    }
}

#[async_trait]
impl RequestHandler<CreateUser> for UserHandlers {
    async fn handle(&self, _ctx: &RequestContext, request: &CreateUser) -> Result<UserDto, AppError> {
        let username = request.username.trim().to_lowercase();
        let email = request.email.trim().to_lowercase();

        if self.find_by_username(&username).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "username '{}' is already taken",
                username
            )));
        }
        self.ensure_email_is_free(&email, 0).await?;

        let now = Utc::now();
        let user = User {
            id: 0,
            username,
            email,
            first_name: clean(&request.first_name),
            last_name: clean(&request.last_name),
            password_hash: hash_in_background(&request.password).await?,
            role: Role::User,
            is_locked: false,
            created_at: now,
            updated_at: now,
        };

        // A concurrent sign-up with the same name or email fails here
        let user = self.users.insert(user).await?;
        info!("Created user {} ({})", user.id, user.username);

        Ok(user.into())
    }
}

#[async_trait]
impl RequestHandler<UpdateUser> for UserHandlers {
    async fn handle(&self, ctx: &RequestContext, request: &UpdateUser) -> Result<UserDto, AppError> {
        ensure_can_modify(ctx, request.id)?;

        let email = request.email.trim().to_lowercase();
        self.ensure_email_is_free(&email, request.id).await?;

        let first_name = clean(&request.first_name);
        let last_name = clean(&request.last_name);
        let user = self
            .users
            .modify(
                request.id,
                Box::new(move |user: &mut User| {
                    user.email = email;
                    user.first_name = first_name;
                    user.last_name = last_name;
                    user.updated_at = Utc::now();
                    Ok(())
                }),
            )
            .await?;

        Ok(user.into())
    }
}

#[async_trait]
impl RequestHandler<ChangePassword> for UserHandlers {
    async fn handle(&self, ctx: &RequestContext, request: &ChangePassword) -> Result<(), AppError> {
        if ctx.actor.user_id() != Some(request.id) {
            return Err(AppError::Forbidden(
                "only the account owner may change its password".to_string(),
            ));
        }
        let user = self.users.get(request.id).await?;

        if !verify_in_background(&request.current_password, &user.password_hash).await? {
            return Err(AppError::validation("current_password", "is incorrect"));
        }

        let verified_hash = user.password_hash;
        let password_hash = hash_in_background(&request.new_password).await?;
        let user = self
            .users
            .modify(
                request.id,
                Box::new(move |user: &mut User| {
                    // Another password change won the race
                    if user.password_hash != verified_hash {
                        return Err(AppError::Conflict(
                            "password was changed concurrently".to_string(),
                        ));
                    }
                    user.password_hash = password_hash;
                    user.updated_at = Utc::now();
                    Ok(())
                }),
            )
            .await?;

        info!("User {} changed their password", user.id);
        Ok(())
    }
}

#[async_trait]
impl RequestHandler<SetUserRole> for UserHandlers {
    async fn handle(&self, ctx: &RequestContext, request: &SetUserRole) -> Result<UserDto, AppError> {
        let role = request.role;
        let user = self
            .users
            .modify(
                request.id,
                Box::new(move |user: &mut User| {
                    if user.role != role {
                        user.role = role;
                        user.updated_at = Utc::now();
                    }
                    Ok(())
                }),
            )
            .await?;
        info!("{} set role of user {} to {}", ctx.actor, user.id, user.role);

        Ok(user.into())
    }
}

#[async_trait]
impl RequestHandler<LockUser> for UserHandlers {
    async fn handle(&self, ctx: &RequestContext, request: &LockUser) -> Result<UserDto, AppError> {
        if request.locked && ctx.actor.user_id() == Some(request.id) {
            return Err(AppError::Conflict("you cannot lock your own account".to_string()));
        }
        let locked = request.locked;
        let user = self
            .users
            .modify(
                request.id,
                Box::new(move |user: &mut User| {
                    user.is_locked = locked;
                    user.updated_at = Utc::now();
                    Ok(())
                }),
            )
            .await?;

        Ok(user.into())
    }
}

#[async_trait]
impl RequestHandler<DeleteUser> for UserHandlers {
    async fn handle(&self, ctx: &RequestContext, request: &DeleteUser) -> Result<(), AppError> {
        ensure_can_modify(ctx, request.id)?;

        if !self.users.delete(request.id).await? {
            return Err(AppError::NotFound {
                entity: "User",
                id: request.id,
            });
        }
        info!("Deleted user {}", request.id);

        self.events
            .publish(DomainEvent::UserDeleted {
                user_id: request.id,
            })
            .await
    }
}

#[async_trait]
impl RequestHandler<AuthenticateUser> for UserHandlers {
    async fn handle(
        &self,
        _ctx: &RequestContext,
        request: &AuthenticateUser,
    ) -> Result<UserDto, AppError> {
        let Some(user) = self.find_by_username(&request.username).await? else {
            warn!("Login attempt for unknown user '{}'", request.username);
            return Err(AppError::Unauthorized);
        };

        if !verify_in_background(&request.password, &user.password_hash).await? {
            warn!("Invalid password for user {}", user.id);
            return Err(AppError::Unauthorized);
        }

        if user.is_locked {
            return Err(AppError::Forbidden("account is locked".to_string()));
        }

        Ok(user.into())
    }
}

#[async_trait]
impl RequestHandler<GetUserById> for UserHandlers {
    async fn handle(&self, _ctx: &RequestContext, request: &GetUserById) -> Result<UserDto, AppError> {
        Ok(self.users.get(request.id).await?.into())
    }
}

#[async_trait]
impl RequestHandler<GetUsers> for UserHandlers {
    async fn handle(
        &self,
        _ctx: &RequestContext,
        request: &GetUsers,
    ) -> Result<PagedList<UserDto>, AppError> {
        let compare = UsersFilter::resolve_sort(request.list.sort_by.as_deref())?;
        let users = self.users.find_where(&request.filter.predicates()).await?;

        Ok(PagedList::create(users, &request.list, compare).map(UserDto::from))
    }
}
