use serde::{Deserialize, Serialize};

use crate::filtering::{ListParams, PagedList};
use crate::mediator::{Policy, Role};
use crate::request;
use crate::users::filtering::UsersFilter;
use crate::users::models::UserDto;

/// Sign-up. New accounts always get the `user` role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}
request!(CreateUser => UserDto, Command, Policy::Anonymous);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateUser {
    pub id: i64,
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}
request!(UpdateUser => UserDto, Command, Policy::Authenticated);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangePassword {
    pub id: i64,
    #[serde(skip_serializing)]
    pub current_password: String,
    #[serde(skip_serializing)]
    pub new_password: String,
}
request!(ChangePassword => (), Command, Policy::Authenticated);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetUserRole {
    pub id: i64,
    pub role: Role,
}
request!(SetUserRole => UserDto, Command, Policy::Admin);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockUser {
    pub id: i64,
    pub locked: bool,
}
request!(LockUser => UserDto, Command, Policy::Admin);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteUser {
    pub id: i64,
}
request!(DeleteUser => (), Command, Policy::Authenticated);

/// Checks credentials and returns the matching user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticateUser {
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
}
request!(AuthenticateUser => UserDto, Query, Policy::Anonymous);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetUserById {
    pub id: i64,
}
request!(GetUserById => UserDto, Query, Policy::Authenticated);

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GetUsers {
    #[serde(default)]
    pub filter: UsersFilter,
    #[serde(default)]
    pub list: ListParams,
}
request!(GetUsers => PagedList<UserDto>, Query, Policy::Admin);
