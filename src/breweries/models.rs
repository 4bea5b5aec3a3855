use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub number: String,
    #[serde(default)]
    pub flat_number: Option<String>,
    pub post_code: String,
    pub city: String,
    #[serde(default)]
    pub state: Option<String>,
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brewery {
    #[serde(default)]
    pub id: i64,
    pub name: String,
    pub address: Address,
    pub website: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub image_uri: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

crate::entity!(Brewery, "Brewery", "breweries");

/// Writable brewery fields shared by create and update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BreweryInput {
    pub name: String,
    pub address: Address,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

fn clean(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

impl Brewery {
    pub fn from_input(input: &BreweryInput) -> Self {
        let now = Utc::now();
        let address = &input.address;
        Self {
            id: 0,
            name: input.name.trim().to_string(),
            address: Address {
                street: address.street.trim().to_string(),
                number: address.number.trim().to_string(),
                flat_number: clean(&address.flat_number),
                post_code: address.post_code.trim().to_string(),
                city: address.city.trim().to_string(),
                state: clean(&address.state),
                country: address.country.trim().to_string(),
            },
            website: clean(&input.website),
            email: clean(&input.email).map(|e| e.to_lowercase()),
            phone: clean(&input.phone),
            image_uri: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replaces the writable fields, keeping id, image and creation time.
    pub fn apply(&mut self, input: &BreweryInput) {
        let updated = Self::from_input(input);
        self.name = updated.name;
        self.address = updated.address;
        self.website = updated.website;
        self.email = updated.email;
        self.phone = updated.phone;
        self.updated_at = updated.updated_at;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreweryDto {
    pub id: i64,
    pub name: String,
    pub street: String,
    pub number: String,
    pub flat_number: Option<String>,
    pub post_code: String,
    pub city: String,
    pub state: Option<String>,
    pub country: String,
    pub website: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub image_uri: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Brewery> for BreweryDto {
    fn from(brewery: Brewery) -> Self {
        let Address {
            street,
            number,
            flat_number,
            post_code,
            city,
            state,
            country,
        } = brewery.address;

        Self {
            id: brewery.id,
            name: brewery.name,
            street,
            number,
            flat_number,
            post_code,
            city,
            state,
            country,
            website: brewery.website,
            email: brewery.email,
            phone: brewery.phone,
            image_uri: brewery.image_uri,
            created_at: brewery.created_at,
            updated_at: brewery.updated_at,
        }
    }
}
