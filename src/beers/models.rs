use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::breweries::Brewery;
use crate::styles::BeerStyle;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Beer {
    #[serde(default)]
    pub id: i64,
    pub name: String,
    pub brewery_id: i64,
    pub beer_style_id: Option<i64>,
    /// Percent by volume.
    pub alcohol_by_volume: f64,
    /// Original extract in degrees Plato.
    pub extract: Option<f64>,
    pub ibu: Option<i32>,
    pub description: Option<String>,
    pub image_uri: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

crate::entity!(Beer, "Beer", "beers");

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BeerInput {
    pub name: String,
    pub brewery_id: i64,
    #[serde(default)]
    pub beer_style_id: Option<i64>,
    pub alcohol_by_volume: f64,
    #[serde(default)]
    pub extract: Option<f64>,
    #[serde(default)]
    pub ibu: Option<i32>,
    #[serde(default)]
    pub description: Option<String>,
}

impl Beer {
    pub fn from_input(input: &BeerInput) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            name: input.name.trim().to_string(),
            brewery_id: input.brewery_id,
            beer_style_id: input.beer_style_id,
            alcohol_by_volume: input.alcohol_by_volume,
            extract: input.extract,
            ibu: input.ibu,
            description: input
                .description
                .as_deref()
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(String::from),
            image_uri: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, input: &BeerInput) {
        let updated = Self::from_input(input);
        self.name = updated.name;
        self.brewery_id = updated.brewery_id;
        self.beer_style_id = updated.beer_style_id;
        self.alcohol_by_volume = updated.alcohol_by_volume;
        self.extract = updated.extract;
        self.ibu = updated.ibu;
        self.description = updated.description;
        self.updated_at = updated.updated_at;
    }
}

/// A beer with the names of its brewery and style resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BeerDto {
    pub id: i64,
    pub name: String,
    pub brewery_id: i64,
    pub brewery_name: Option<String>,
    pub beer_style_id: Option<i64>,
    pub beer_style_name: Option<String>,
    pub alcohol_by_volume: f64,
    pub extract: Option<f64>,
    pub ibu: Option<i32>,
    pub description: Option<String>,
    pub image_uri: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BeerDto {
    pub fn from_parts(beer: Beer, brewery: Option<&Brewery>, style: Option<&BeerStyle>) -> Self {
        Self {
            id: beer.id,
            name: beer.name,
            brewery_id: beer.brewery_id,
            brewery_name: brewery.map(|b| b.name.clone()),
            beer_style_id: beer.beer_style_id,
            beer_style_name: style.map(|s| s.name.clone()),
            alcohol_by_volume: beer.alcohol_by_volume,
            extract: beer.extract,
            ibu: beer.ibu,
            description: beer.description,
            image_uri: beer.image_uri,
            created_at: beer.created_at,
            updated_at: beer.updated_at,
        }
    }
}
