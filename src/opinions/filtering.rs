use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::filtering::{contains_ignore_case, Comparator, ListFilter, PredicateList};
use crate::opinions::models::Opinion;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpinionsFilter {
    pub beer_id: Option<i64>,
    pub user_id: Option<i64>,
    pub username: Option<String>,
    pub min_rating: Option<i32>,
    pub max_rating: Option<i32>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl ListFilter<Opinion> for OpinionsFilter {
    const SORT_COLUMNS: &'static [&'static str] = &["id", "rating", "username", "created_at"];

    fn predicates(&self) -> PredicateList<Opinion> {
        PredicateList::new()
            .when(self.beer_id, |o: &Opinion, id: &i64| o.beer_id == *id)
            .when(self.user_id, |o: &Opinion, id: &i64| o.user_id == *id)
            .when(self.username.clone(), |o: &Opinion, username: &String| {
                contains_ignore_case(&o.username, username)
            })
            .when(self.min_rating, |o: &Opinion, min: &i32| o.rating >= *min)
            .when(self.max_rating, |o: &Opinion, max: &i32| o.rating <= *max)
            .when(self.from, |o: &Opinion, from: &DateTime<Utc>| o.created_at >= *from)
            .when(self.to, |o: &Opinion, to: &DateTime<Utc>| o.created_at <= *to)
    }

    fn sort_column(name: &str) -> Option<Comparator<Opinion>> {
        match name {
            "id" => Some(|a, b| a.id.cmp(&b.id)),
            "rating" => Some(|a, b| a.rating.cmp(&b.rating)),
            "username" => Some(|a, b| a.username.cmp(&b.username)),
            "created_at" => Some(|a, b| a.created_at.cmp(&b.created_at)),
            _ => None,
        }
    }
}
