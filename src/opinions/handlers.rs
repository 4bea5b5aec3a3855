use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

use crate::beers::Beer;
use crate::error::AppError;
use crate::events::{DomainEvent, EventPublisher};
use crate::filtering::{ListFilter, PagedList};
use crate::mediator::{Actor, RequestContext, RequestHandler};
use crate::opinions::filtering::OpinionsFilter;
use crate::opinions::models::{BeerRatingDto, Opinion, OpinionDto};
use crate::opinions::requests::{
    CreateOpinion, DeleteBeerOpinions, DeleteOpinion, DeleteUserOpinions, GetBeerRating,
    GetOpinionById, GetOpinions, UpdateOpinion,
};
use crate::store::{Key, Repository};

pub struct OpinionHandlers {
    opinions: Arc<dyn Repository<Opinion>>,
    beers: Arc<dyn Repository<Beer>>,
    events: Arc<dyn EventPublisher>,
}

impl OpinionHandlers {
    pub fn new(
        opinions: Arc<dyn Repository<Opinion>>,
        beers: Arc<dyn Repository<Beer>>,
        events: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            opinions,
            beers,
            events,
        }
    }

    /// Loads an opinion the caller is allowed to change.
    async fn owned(&self, ctx: &RequestContext, id: i64) -> Result<Opinion, AppError> {
        let opinion = self.opinions.get(id).await?;
        if !ctx.actor.can_modify(opinion.user_id) {
            return Err(AppError::Forbidden(format!(
                "opinion {} belongs to another user",
                opinion.id
            )));
        }
        Ok(opinion)
    }

    async fn delete_matching(&self, key: Key) -> Result<usize, AppError> {
        Ok(self.opinions.delete_by_key(&key).await?.len())
    }

    async fn to_dto(&self, opinion: Opinion) -> Result<OpinionDto, AppError> {
        let beer = self.beers.find_by_id(opinion.beer_id).await?;
        Ok(OpinionDto::from_parts(opinion, beer.as_ref()))
    }
}

#[async_trait]
impl RequestHandler<CreateOpinion> for OpinionHandlers {
    async fn handle(
        &self,
        ctx: &RequestContext,
        request: &CreateOpinion,
    ) -> Result<OpinionDto, AppError> {
        let Actor::User { id: user_id, username, .. } = &ctx.actor else {
            return Err(AppError::Forbidden(
                "opinions can only be written by users".to_string(),
            ));
        };
        let user_id = *user_id;

        let beer = self.beers.get(request.beer_id).await?;

        let beer_id = beer.id;
        let existing = self
            .opinions
            .find_by_key(&Key::new().eq("beer_id", beer_id).eq("user_id", user_id))
            .await?;
        if !existing.is_empty() {
            return Err(AppError::Conflict(format!(
                "you have already rated '{}'",
                beer.name
            )));
        }

        let now = Utc::now();
        let opinion = self
            .opinions
            .insert(Opinion {
                id: 0,
                beer_id,
                user_id,
                username: username.clone(),
                rating: request.input.rating,
                comment: request.input.comment(),
                created_at: now,
                updated_at: now,
            })
            .await?;
        info!("User {} rated beer {} with {}", user_id, beer_id, opinion.rating);

        self.events
            .publish(DomainEvent::OpinionCreated {
                opinion_id: opinion.id,
                beer_id,
                rating: opinion.rating,
            })
            .await?;

        Ok(OpinionDto::from_parts(opinion, Some(&beer)))
    }
}

#[async_trait]
impl RequestHandler<UpdateOpinion> for OpinionHandlers {
    async fn handle(
        &self,
        ctx: &RequestContext,
        request: &UpdateOpinion,
    ) -> Result<OpinionDto, AppError> {
        let opinion = self.owned(ctx, request.id).await?;

        let rating = request.input.rating;
        let comment = request.input.comment();
        let opinion = self
            .opinions
            .modify(
                opinion.id,
                Box::new(move |opinion: &mut Opinion| {
                    opinion.rating = rating;
                    opinion.comment = comment;
                    opinion.updated_at = Utc::now();
                    Ok(())
                }),
            )
            .await?;

        self.to_dto(opinion).await
    }
}

#[async_trait]
impl RequestHandler<DeleteOpinion> for OpinionHandlers {
    async fn handle(&self, ctx: &RequestContext, request: &DeleteOpinion) -> Result<(), AppError> {
        let opinion = self.owned(ctx, request.id).await?;
        self.opinions.delete(opinion.id).await?;
        Ok(())
    }
}

#[async_trait]
impl RequestHandler<DeleteBeerOpinions> for OpinionHandlers {
    async fn handle(
        &self,
        _ctx: &RequestContext,
        request: &DeleteBeerOpinions,
    ) -> Result<usize, AppError> {
        self.delete_matching(Key::new().eq("beer_id", request.beer_id))
            .await
    }
}

#[async_trait]
impl RequestHandler<DeleteUserOpinions> for OpinionHandlers {
    async fn handle(
        &self,
        _ctx: &RequestContext,
        request: &DeleteUserOpinions,
    ) -> Result<usize, AppError> {
        self.delete_matching(Key::new().eq("user_id", request.user_id))
            .await
    }
}

#[async_trait]
impl RequestHandler<GetOpinionById> for OpinionHandlers {
    async fn handle(
        &self,
        _ctx: &RequestContext,
        request: &GetOpinionById,
    ) -> Result<OpinionDto, AppError> {
        let opinion = self.opinions.get(request.id).await?;
        self.to_dto(opinion).await
    }
}

#[async_trait]
impl RequestHandler<GetOpinions> for OpinionHandlers {
    async fn handle(
        &self,
        _ctx: &RequestContext,
        request: &GetOpinions,
    ) -> Result<PagedList<OpinionDto>, AppError> {
        let compare = OpinionsFilter::resolve_sort(request.list.sort_by.as_deref())?;
        let opinions = self.opinions.find_where(&request.filter.predicates()).await?;
        let page = PagedList::create(opinions, &request.list, compare);

        let mut beers: HashMap<i64, Option<Beer>> = HashMap::new();
        for opinion in &page.items {
            if !beers.contains_key(&opinion.beer_id) {
                let beer = self.beers.find_by_id(opinion.beer_id).await?;
                beers.insert(opinion.beer_id, beer);
            }
        }

        Ok(page.map(|opinion| {
            let beer = beers.get(&opinion.beer_id).and_then(Option::as_ref);
            OpinionDto::from_parts(opinion, beer)
        }))
    }
}

#[async_trait]
impl RequestHandler<GetBeerRating> for OpinionHandlers {
    async fn handle(
        &self,
        _ctx: &RequestContext,
        request: &GetBeerRating,
    ) -> Result<BeerRatingDto, AppError> {
        let beer = self.beers.get(request.beer_id).await?;

        let opinions = self
            .opinions
            .find_by_key(&Key::new().eq("beer_id", beer.id))
            .await?;

        Ok(BeerRatingDto::from_opinions(beer.id, &opinions))
    }
}
