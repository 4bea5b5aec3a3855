use serde::{Deserialize, Serialize};

use crate::beers::filtering::BeersFilter;
use crate::beers::models::{BeerDto, BeerInput};
use crate::filtering::{ListParams, PagedList};
use crate::mediator::Policy;
use crate::request;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBeer {
    #[serde(flatten)]
    pub input: BeerInput,
}
request!(CreateBeer => BeerDto, Command, Policy::Admin);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateBeer {
    pub id: i64,
    #[serde(flatten)]
    pub input: BeerInput,
}
request!(UpdateBeer => BeerDto, Command, Policy::Admin);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteBeer {
    pub id: i64,
}
request!(DeleteBeer => (), Command, Policy::Admin);

/// Removes every beer of a deleted brewery and returns their ids.
///
/// Publishes nothing: the caller cascades to each returned beer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteBreweryBeers {
    pub brewery_id: i64,
}
request!(DeleteBreweryBeers => Vec<i64>, Command, Policy::System);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetBeerById {
    pub id: i64,
}
request!(GetBeerById => BeerDto, Query, Policy::Anonymous);

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GetBeers {
    #[serde(default)]
    pub filter: BeersFilter,
    #[serde(default)]
    pub list: ListParams,
}
request!(GetBeers => PagedList<BeerDto>, Query, Policy::Anonymous);
