use serde::{Deserialize, Serialize};

use crate::filtering::{ListParams, PagedList};
use crate::mediator::Policy;
use crate::request;
use crate::styles::filtering::BeerStylesFilter;
use crate::styles::models::{BeerStyleDto, BeerStyleInput};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBeerStyle {
    #[serde(flatten)]
    pub input: BeerStyleInput,
}
request!(CreateBeerStyle => BeerStyleDto, Command, Policy::Admin);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateBeerStyle {
    pub id: i64,
    #[serde(flatten)]
    pub input: BeerStyleInput,
}
request!(UpdateBeerStyle => BeerStyleDto, Command, Policy::Admin);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteBeerStyle {
    pub id: i64,
}
request!(DeleteBeerStyle => (), Command, Policy::Admin);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetBeerStyleById {
    pub id: i64,
}
request!(GetBeerStyleById => BeerStyleDto, Query, Policy::Anonymous);

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GetBeerStyles {
    #[serde(default)]
    pub filter: BeerStylesFilter,
    #[serde(default)]
    pub list: ListParams,
}
request!(GetBeerStyles => PagedList<BeerStyleDto>, Query, Policy::Anonymous);
