use serde::{Deserialize, Serialize};

use crate::beers::models::Beer;
use crate::filtering::{cmp_f64, contains_ignore_case, Comparator, ListFilter, PredicateList};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BeersFilter {
    pub name: Option<String>,
    pub brewery_id: Option<i64>,
    pub beer_style_id: Option<i64>,
    pub min_alcohol_by_volume: Option<f64>,
    pub max_alcohol_by_volume: Option<f64>,
    pub min_extract: Option<f64>,
    pub max_extract: Option<f64>,
    pub min_ibu: Option<i32>,
    pub max_ibu: Option<i32>,
}

impl ListFilter<Beer> for BeersFilter {
    const SORT_COLUMNS: &'static [&'static str] = &[
        "id",
        "name",
        "alcohol_by_volume",
        "extract",
        "ibu",
        "created_at",
    ];

    /// Beers without extract or IBU never match a range on that column.
    fn predicates(&self) -> PredicateList<Beer> {
        PredicateList::new()
            .when(self.name.clone(), |b: &Beer, name: &String| {
                contains_ignore_case(&b.name, name)
            })
            .when(self.brewery_id, |b: &Beer, id: &i64| b.brewery_id == *id)
            .when(self.beer_style_id, |b: &Beer, id: &i64| {
                b.beer_style_id == Some(*id)
            })
            .when(self.min_alcohol_by_volume, |b: &Beer, min: &f64| {
                b.alcohol_by_volume >= *min
            })
            .when(self.max_alcohol_by_volume, |b: &Beer, max: &f64| {
                b.alcohol_by_volume <= *max
            })
            .when(self.min_extract, |b: &Beer, min: &f64| {
                b.extract.is_some_and(|e| e >= *min)
            })
            .when(self.max_extract, |b: &Beer, max: &f64| {
                b.extract.is_some_and(|e| e <= *max)
            })
            .when(self.min_ibu, |b: &Beer, min: &i32| b.ibu.is_some_and(|i| i >= *min))
            .when(self.max_ibu, |b: &Beer, max: &i32| b.ibu.is_some_and(|i| i <= *max))
    }

    fn sort_column(name: &str) -> Option<Comparator<Beer>> {
        match name {
            "id" => Some(|a, b| a.id.cmp(&b.id)),
            "name" => Some(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase())),
            "alcohol_by_volume" => Some(|a, b| cmp_f64(a.alcohol_by_volume, b.alcohol_by_volume)),
            "extract" => Some(|a, b| {
                cmp_f64(
                    a.extract.unwrap_or(f64::NEG_INFINITY),
                    b.extract.unwrap_or(f64::NEG_INFINITY),
                )
            }),
            "ibu" => Some(|a, b| a.ibu.cmp(&b.ibu)),
            "created_at" => Some(|a, b| a.created_at.cmp(&b.created_at)),
            _ => None,
        }
    }
}
