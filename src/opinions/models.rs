use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::beers::Beer;

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opinion {
    #[serde(default)]
    pub id: i64,
    pub beer_id: i64,
    pub user_id: i64,
    /// Copied from the author at creation time.
    pub username: String,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

crate::entity!(Opinion, "Opinion", "opinions");

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OpinionInput {
    pub rating: i32,
    #[serde(default)]
    pub comment: Option<String>,
}

impl OpinionInput {
    pub fn comment(&self) -> Option<String> {
        self.comment
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(String::from)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpinionDto {
    pub id: i64,
    pub beer_id: i64,
    pub beer_name: Option<String>,
    pub user_id: i64,
    pub username: String,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OpinionDto {
    pub fn from_parts(opinion: Opinion, beer: Option<&Beer>) -> Self {
        Self {
            id: opinion.id,
            beer_id: opinion.beer_id,
            beer_name: beer.map(|b| b.name.clone()),
            user_id: opinion.user_id,
            username: opinion.username,
            rating: opinion.rating,
            comment: opinion.comment,
            created_at: opinion.created_at,
            updated_at: opinion.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BeerRatingDto {
    pub beer_id: i64,
    pub opinions_count: usize,
    /// `None` when nobody has rated the beer yet.
    pub average_rating: Option<f64>,
}

impl BeerRatingDto {
    pub fn from_opinions(beer_id: i64, opinions: &[Opinion]) -> Self {
        let average_rating = if opinions.is_empty() {
            None
        } else {
            let sum: i64 = opinions.iter().map(|o| o.rating as i64).sum();
            let average = sum as f64 / opinions.len() as f64;
            Some((average * 100.0).round() / 100.0)
        };

        Self {
            beer_id,
            opinions_count: opinions.len(),
            average_rating,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rated(rating: i32) -> Opinion {
        let now = Utc::now();
        Opinion {
            id: 0,
            beer_id: 1,
            user_id: 1,
            username: "jan".to_string(),
            rating,
            comment: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_rating_of_unrated_beer() {
        let rating = BeerRatingDto::from_opinions(1, &[]);
        assert_eq!(rating.opinions_count, 0);
        assert_eq!(rating.average_rating, None);
    }

    #[test]
    fn test_average_is_rounded_to_two_places() {
        let rating = BeerRatingDto::from_opinions(1, &[rated(7), rated(8), rated(8)]);
        assert_eq!(rating.opinions_count, 3);
        assert_eq!(rating.average_rating, Some(7.67));
    }
}
