use serde::{Deserialize, Serialize};

use crate::filtering::{contains_ignore_case, Comparator, ListFilter, PredicateList};
use crate::styles::models::BeerStyle;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BeerStylesFilter {
    pub name: Option<String>,
    pub country_of_origin: Option<String>,
}

impl ListFilter<BeerStyle> for BeerStylesFilter {
    const SORT_COLUMNS: &'static [&'static str] = &["id", "name", "country_of_origin"];

    fn predicates(&self) -> PredicateList<BeerStyle> {
        PredicateList::new()
            .when(self.name.clone(), |s: &BeerStyle, name: &String| {
                contains_ignore_case(&s.name, name)
            })
            .when(self.country_of_origin.clone(), |s: &BeerStyle, country: &String| {
                s.country_of_origin
                    .as_deref()
                    .is_some_and(|c| c.eq_ignore_ascii_case(country))
            })
    }

    fn sort_column(name: &str) -> Option<Comparator<BeerStyle>> {
        match name {
            "id" => Some(|a, b| a.id.cmp(&b.id)),
            "name" => Some(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase())),
            "country_of_origin" => Some(|a, b| a.country_of_origin.cmp(&b.country_of_origin)),
            _ => None,
        }
    }
}
