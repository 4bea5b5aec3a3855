use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

use crate::breweries::filtering::BreweriesFilter;
use crate::breweries::models::{Brewery, BreweryDto};
use crate::breweries::requests::{
    CreateBrewery, DeleteBrewery, GetBreweries, GetBreweryById, UpdateBrewery,
};
use crate::error::AppError;
use crate::events::{DomainEvent, EventPublisher};
use crate::filtering::{ListFilter, PagedList};
use crate::mediator::{RequestContext, RequestHandler};
use crate::store::{Key, Repository};

pub struct BreweryHandlers {
    breweries: Arc<dyn Repository<Brewery>>,
    events: Arc<dyn EventPublisher>,
}

impl BreweryHandlers {
    pub fn new(breweries: Arc<dyn Repository<Brewery>>, events: Arc<dyn EventPublisher>) -> Self {
        Self { breweries, events }
    }

    async fn ensure_name_is_free(&self, name: &str, except_id: i64) -> Result<(), AppError> {
        let taken = self
            .breweries
            .find_by_key(&Key::new().eq_nocase("name", name.trim()))
            .await?;

        match taken.iter().find(|b| b.id != except_id) {
            Some(existing) => Err(AppError::Conflict(format!(
                "brewery '{}' already exists",
                existing.name
            ))),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl RequestHandler<CreateBrewery> for BreweryHandlers {
    async fn handle(
        &self,
        _ctx: &RequestContext,
        request: &CreateBrewery,
    ) -> Result<BreweryDto, AppError> {
        self.ensure_name_is_free(&request.input.name, 0).await?;

        let brewery = self.breweries.insert(Brewery::from_input(&request.input)).await?;
        info!("Created brewery {} ({})", brewery.id, brewery.name);

        Ok(brewery.into())
    }
}

#[async_trait]
impl RequestHandler<UpdateBrewery> for BreweryHandlers {
    async fn handle(
        &self,
        _ctx: &RequestContext,
        request: &UpdateBrewery,
    ) -> Result<BreweryDto, AppError> {
        self.ensure_name_is_free(&request.input.name, request.id).await?;

        let input = request.input.clone();
        let brewery = self
            .breweries
            .modify(
                request.id,
                Box::new(move |brewery: &mut Brewery| {
                    brewery.apply(&input);
                    Ok(())
                }),
            )
            .await?;

        Ok(brewery.into())
    }
}

#[async_trait]
impl RequestHandler<DeleteBrewery> for BreweryHandlers {
    async fn handle(&self, _ctx: &RequestContext, request: &DeleteBrewery) -> Result<(), AppError> {
        if !self.breweries.delete(request.id).await? {
            return Err(AppError::NotFound {
                entity: "Brewery",
                id: request.id,
            });
        }
        info!("Deleted brewery {}", request.id);

        self.events
            .publish(DomainEvent::BreweryDeleted {
                brewery_id: request.id,
            })
            .await
    }
}

#[async_trait]
impl RequestHandler<GetBreweryById> for BreweryHandlers {
    async fn handle(
        &self,
        _ctx: &RequestContext,
        request: &GetBreweryById,
    ) -> Result<BreweryDto, AppError> {
        Ok(self.breweries.get(request.id).await?.into())
    }
}

#[async_trait]
impl RequestHandler<GetBreweries> for BreweryHandlers {
    async fn handle(
        &self,
        _ctx: &RequestContext,
        request: &GetBreweries,
    ) -> Result<PagedList<BreweryDto>, AppError> {
        let compare = BreweriesFilter::resolve_sort(request.list.sort_by.as_deref())?;
        let breweries = self.breweries.find_where(&request.filter.predicates()).await?;

        Ok(PagedList::create(breweries, &request.list, compare).map(BreweryDto::from))
    }
}
