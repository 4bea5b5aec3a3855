use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

use crate::beers::filtering::BeersFilter;
use crate::beers::models::{Beer, BeerDto, BeerInput};
use crate::beers::requests::{
    CreateBeer, DeleteBeer, DeleteBreweryBeers, GetBeerById, GetBeers, UpdateBeer,
};
use crate::breweries::Brewery;
use crate::error::AppError;
use crate::events::{DomainEvent, EventPublisher};
use crate::filtering::{ListFilter, PagedList};
use crate::mediator::{RequestContext, RequestHandler};
use crate::store::{Key, Repository};
use crate::styles::BeerStyle;

pub struct BeerHandlers {
    beers: Arc<dyn Repository<Beer>>,
    breweries: Arc<dyn Repository<Brewery>>,
    styles: Arc<dyn Repository<BeerStyle>>,
    events: Arc<dyn EventPublisher>,
}

impl BeerHandlers {
    pub fn new(
        beers: Arc<dyn Repository<Beer>>,
        breweries: Arc<dyn Repository<Brewery>>,
        styles: Arc<dyn Repository<BeerStyle>>,
        events: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            beers,
            breweries,
            styles,
            events,
        }
    }

    /// Loads the referenced brewery and style, and rejects a name already
    /// used by another beer of the same brewery.
    async fn check_references(
        &self,
        input: &BeerInput,
        except_id: i64,
    ) -> Result<(Brewery, Option<BeerStyle>), AppError> {
        let brewery = self.breweries.get(input.brewery_id).await?;
        let style = match input.beer_style_id {
            Some(id) => Some(self.styles.get(id).await?),
            None => None,
        };

        let taken = self
            .beers
            .find_by_key(
                &Key::new()
                    .eq("brewery_id", brewery.id)
                    .eq_nocase("name", input.name.trim()),
            )
            .await?;
        if taken.iter().any(|b| b.id != except_id) {
            return Err(AppError::Conflict(format!(
                "brewery '{}' already has a beer named '{}'",
                brewery.name,
                input.name.trim()
            )));
        }

        Ok((brewery, style))
    }

    async fn to_dto(&self, beer: Beer) -> Result<BeerDto, AppError> {
        let brewery = self.breweries.find_by_id(beer.brewery_id).await?;
        let style = match beer.beer_style_id {
            Some(id) => self.styles.find_by_id(id).await?,
            None => None,
        };
        Ok(BeerDto::from_parts(beer, brewery.as_ref(), style.as_ref()))
    }
}

#[async_trait]
impl RequestHandler<CreateBeer> for BeerHandlers {
    async fn handle(&self, _ctx: &RequestContext, request: &CreateBeer) -> Result<BeerDto, AppError> {
        let (brewery, style) = self.check_references(&request.input, 0).await?;

        let beer = self.beers.insert(Beer::from_input(&request.input)).await?;
        info!("Created beer {} ({}) for brewery {}", beer.id, beer.name, brewery.id);

        self.events
            .publish(DomainEvent::BeerCreated {
                beer_id: beer.id,
                brewery_id: brewery.id,
            })
            .await?;

        Ok(BeerDto::from_parts(beer, Some(&brewery), style.as_ref()))
    }
}

#[async_trait]
impl RequestHandler<UpdateBeer> for BeerHandlers {
    async fn handle(&self, _ctx: &RequestContext, request: &UpdateBeer) -> Result<BeerDto, AppError> {
        let (brewery, style) = self.check_references(&request.input, request.id).await?;

        // Leaves fields owned by other commands, such as `image_uri`, as stored
        let input = request.input.clone();
        let beer = self
            .beers
            .modify(
                request.id,
                Box::new(move |beer: &mut Beer| {
                    beer.apply(&input);
                    Ok(())
                }),
            )
            .await?;

        Ok(BeerDto::from_parts(beer, Some(&brewery), style.as_ref()))
    }
}

#[async_trait]
impl RequestHandler<DeleteBeer> for BeerHandlers {
    async fn handle(&self, _ctx: &RequestContext, request: &DeleteBeer) -> Result<(), AppError> {
        if !self.beers.delete(request.id).await? {
            return Err(AppError::NotFound {
                entity: "Beer",
                id: request.id,
            });
        }
        info!("Deleted beer {}", request.id);

        self.events
            .publish(DomainEvent::BeerDeleted {
                beer_id: request.id,
            })
            .await
    }
}

#[async_trait]
impl RequestHandler<DeleteBreweryBeers> for BeerHandlers {
    async fn handle(
        &self,
        _ctx: &RequestContext,
        request: &DeleteBreweryBeers,
    ) -> Result<Vec<i64>, AppError> {
        let deleted = self
            .beers
            .delete_by_key(&Key::new().eq("brewery_id", request.brewery_id))
            .await?;

        info!(
            "Deleted {} beer(s) of brewery {}",
            deleted.len(),
            request.brewery_id
        );
        Ok(deleted)
    }
}

#[async_trait]
impl RequestHandler<GetBeerById> for BeerHandlers {
    async fn handle(&self, _ctx: &RequestContext, request: &GetBeerById) -> Result<BeerDto, AppError> {
        let beer = self.beers.get(request.id).await?;
        self.to_dto(beer).await
    }
}

#[async_trait]
impl RequestHandler<GetBeers> for BeerHandlers {
    async fn handle(
        &self,
        _ctx: &RequestContext,
        request: &GetBeers,
    ) -> Result<PagedList<BeerDto>, AppError> {
        let compare = BeersFilter::resolve_sort(request.list.sort_by.as_deref())?;
        let beers = self.beers.find_where(&request.filter.predicates()).await?;
        let page = PagedList::create(beers, &request.list, compare);

        // Resolve names only for the beers on this page
        let mut breweries: HashMap<i64, Option<Brewery>> = HashMap::new();
        let mut styles: HashMap<i64, Option<BeerStyle>> = HashMap::new();
        for beer in &page.items {
            if !breweries.contains_key(&beer.brewery_id) {
                let brewery = self.breweries.find_by_id(beer.brewery_id).await?;
                breweries.insert(beer.brewery_id, brewery);
            }
            if let Some(style_id) = beer.beer_style_id {
                if !styles.contains_key(&style_id) {
                    let style = self.styles.find_by_id(style_id).await?;
                    styles.insert(style_id, style);
                }
            }
        }

        Ok(page.map(|beer| {
            let brewery = breweries.get(&beer.brewery_id).and_then(Option::as_ref);
            let style = beer
                .beer_style_id
                .and_then(|id| styles.get(&id))
                .and_then(Option::as_ref);
            BeerDto::from_parts(beer, brewery, style)
        }))
    }
}
