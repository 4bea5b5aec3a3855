use serde::{Deserialize, Serialize};

use crate::breweries::filtering::BreweriesFilter;
use crate::breweries::models::{BreweryDto, BreweryInput};
use crate::filtering::{ListParams, PagedList};
use crate::mediator::Policy;
use crate::request;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBrewery {
    #[serde(flatten)]
    pub input: BreweryInput,
}
request!(CreateBrewery => BreweryDto, Command, Policy::Admin);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateBrewery {
    pub id: i64,
    #[serde(flatten)]
    pub input: BreweryInput,
}
request!(UpdateBrewery => BreweryDto, Command, Policy::Admin);

/// Beers, opinions and images of the brewery go with it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteBrewery {
    pub id: i64,
}
request!(DeleteBrewery => (), Command, Policy::Admin);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetBreweryById {
    pub id: i64,
}
request!(GetBreweryById => BreweryDto, Query, Policy::Anonymous);

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GetBreweries {
    #[serde(default)]
    pub filter: BreweriesFilter,
    #[serde(default)]
    pub list: ListParams,
}
request!(GetBreweries => PagedList<BreweryDto>, Query, Policy::Anonymous);
