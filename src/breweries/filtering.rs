use serde::{Deserialize, Serialize};

use crate::breweries::models::Brewery;
use crate::filtering::{contains_ignore_case, Comparator, ListFilter, PredicateList};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BreweriesFilter {
    pub name: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
}

impl ListFilter<Brewery> for BreweriesFilter {
    const SORT_COLUMNS: &'static [&'static str] = &["id", "name", "city", "country", "created_at"];

    fn predicates(&self) -> PredicateList<Brewery> {
        PredicateList::new()
            .when(self.name.clone(), |b: &Brewery, name: &String| {
                contains_ignore_case(&b.name, name)
            })
            .when(self.city.clone(), |b: &Brewery, city: &String| {
                contains_ignore_case(&b.address.city, city)
            })
            .when(self.country.clone(), |b: &Brewery, country: &String| {
                b.address.country.eq_ignore_ascii_case(country)
            })
    }

    fn sort_column(name: &str) -> Option<Comparator<Brewery>> {
        match name {
            "id" => Some(|a, b| a.id.cmp(&b.id)),
            "name" => Some(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase())),
            "city" => Some(|a, b| a.address.city.cmp(&b.address.city)),
            "country" => Some(|a, b| a.address.country.cmp(&b.address.country)),
            "created_at" => Some(|a, b| a.created_at.cmp(&b.created_at)),
            _ => None,
        }
    }
}
