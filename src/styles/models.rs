use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeerStyle {
    #[serde(default)]
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub country_of_origin: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

crate::entity!(BeerStyle, "BeerStyle", "beer_styles");

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BeerStyleInput {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub country_of_origin: Option<String>,
}

impl BeerStyle {
    pub fn from_input(input: &BeerStyleInput) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            name: input.name.trim().to_string(),
            description: input.description.clone(),
            country_of_origin: input.country_of_origin.as_deref().map(str::trim).map(String::from),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, input: &BeerStyleInput) {
        let updated = Self::from_input(input);
        self.name = updated.name;
        self.description = updated.description;
        self.country_of_origin = updated.country_of_origin;
        self.updated_at = updated.updated_at;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BeerStyleDto {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub country_of_origin: Option<String>,
}

impl From<BeerStyle> for BeerStyleDto {
    fn from(style: BeerStyle) -> Self {
        Self {
            id: style.id,
            name: style.name,
            description: style.description,
            country_of_origin: style.country_of_origin,
        }
    }
}
