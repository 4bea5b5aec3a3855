use serde::{Deserialize, Serialize};

use crate::filtering::{contains_ignore_case, Comparator, ListFilter, PredicateList};
use crate::mediator::Role;
use crate::users::models::User;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UsersFilter {
    pub username: Option<String>,
    pub email: Option<String>,
    pub role: Option<Role>,
}

impl ListFilter<User> for UsersFilter {
    const SORT_COLUMNS: &'static [&'static str] = &["id", "username", "email", "created_at"];

    fn predicates(&self) -> PredicateList<User> {
        PredicateList::new()
            .when(self.username.clone(), |u: &User, username: &String| {
                contains_ignore_case(&u.username, username)
            })
            .when(self.email.clone(), |u: &User, email: &String| {
                contains_ignore_case(&u.email, email)
            })
            .when(self.role, |u: &User, role: &Role| u.role == *role)
    }

    fn sort_column(name: &str) -> Option<Comparator<User>> {
        match name {
            "id" => Some(|a, b| a.id.cmp(&b.id)),
            "username" => Some(|a, b| a.username.cmp(&b.username)),
            "email" => Some(|a, b| a.email.cmp(&b.email)),
            "created_at" => Some(|a, b| a.created_at.cmp(&b.created_at)),
            _ => None,
        }
    }
}
