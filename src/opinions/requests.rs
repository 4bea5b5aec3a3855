use serde::{Deserialize, Serialize};

use crate::filtering::{ListParams, PagedList};
use crate::mediator::Policy;
use crate::opinions::filtering::OpinionsFilter;
use crate::opinions::models::{BeerRatingDto, OpinionDto, OpinionInput};
use crate::request;

/// Written on behalf of the signed-in user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOpinion {
    pub beer_id: i64,
    #[serde(flatten)]
    pub input: OpinionInput,
}
request!(CreateOpinion => OpinionDto, Command, Policy::Authenticated);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateOpinion {
    pub id: i64,
    #[serde(flatten)]
    pub input: OpinionInput,
}
request!(UpdateOpinion => OpinionDto, Command, Policy::Authenticated);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteOpinion {
    pub id: i64,
}
request!(DeleteOpinion => (), Command, Policy::Authenticated);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteBeerOpinions {
    pub beer_id: i64,
}
request!(DeleteBeerOpinions => usize, Command, Policy::System);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteUserOpinions {
    pub user_id: i64,
}
request!(DeleteUserOpinions => usize, Command, Policy::System);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetOpinionById {
    pub id: i64,
}
request!(GetOpinionById => OpinionDto, Query, Policy::Anonymous);

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GetOpinions {
    #[serde(default)]
    pub filter: OpinionsFilter,
    #[serde(default)]
    pub list: ListParams,
}
request!(GetOpinions => PagedList<OpinionDto>, Query, Policy::Anonymous);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetBeerRating {
    pub beer_id: i64,
}
request!(GetBeerRating => BeerRatingDto, Query, Policy::Anonymous);
