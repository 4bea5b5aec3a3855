use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

use crate::beers::Beer;
use crate::error::AppError;
use crate::filtering::{ListFilter, PagedList};
use crate::mediator::{RequestContext, RequestHandler};
use crate::store::{Key, Repository};
use crate::styles::filtering::BeerStylesFilter;
use crate::styles::models::{BeerStyle, BeerStyleDto};
use crate::styles::requests::{
    CreateBeerStyle, DeleteBeerStyle, GetBeerStyleById, GetBeerStyles, UpdateBeerStyle,
};

pub struct StyleHandlers {
    styles: Arc<dyn Repository<BeerStyle>>,
    beers: Arc<dyn Repository<Beer>>,
}

impl StyleHandlers {
    pub fn new(styles: Arc<dyn Repository<BeerStyle>>, beers: Arc<dyn Repository<Beer>>) -> Self {
        Self { styles, beers }
    }

    async fn ensure_name_is_free(&self, name: &str, except_id: i64) -> Result<(), AppError> {
        let taken = self
            .styles
            .find_by_key(&Key::new().eq_nocase("name", name.trim()))
            .await?;

        if let Some(existing) = taken.iter().find(|s| s.id != except_id) {
            return Err(AppError::Conflict(format!(
                "beer style '{}' already exists",
                existing.name
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl RequestHandler<CreateBeerStyle> for StyleHandlers {
    async fn handle(
        &self,
        _ctx: &RequestContext,
        request: &CreateBeerStyle,
    ) -> Result<BeerStyleDto, AppError> {
        self.ensure_name_is_free(&request.input.name, 0).await?;

        let style = self.styles.insert(BeerStyle::from_input(&request.input)).await?;
        info!("Created beer style {} ({})", style.id, style.name);

        Ok(style.into())
    }
}

#[async_trait]
impl RequestHandler<UpdateBeerStyle> for StyleHandlers {
    async fn handle(
        &self,
        _ctx: &RequestContext,
        request: &UpdateBeerStyle,
    ) -> Result<BeerStyleDto, AppError> {
        self.ensure_name_is_free(&request.input.name, request.id).await?;

        let input = request.input.clone();
        let style = self
            .styles
            .modify(
                request.id,
                Box::new(move |style: &mut BeerStyle| {
                    style.apply(&input);
                    Ok(())
                }),
            )
            .await?;

        Ok(style.into())
    }
}

#[async_trait]
impl RequestHandler<DeleteBeerStyle> for StyleHandlers {
    async fn handle(&self, _ctx: &RequestContext, request: &DeleteBeerStyle) -> Result<(), AppError> {
        let style = self.styles.get(request.id).await?;

        let used_by = self
            .beers
            .find_by_key(&Key::new().eq("beer_style_id", style.id))
            .await?;
        if !used_by.is_empty() {
            return Err(AppError::Conflict(format!(
                "beer style '{}' is used by {} beer(s)",
                style.name,
                used_by.len()
            )));
        }

        self.styles.delete(style.id).await?;
        info!("Deleted beer style {}", style.id);
        Ok(())
    }
}

#[async_trait]
impl RequestHandler<GetBeerStyleById> for StyleHandlers {
    async fn handle(
        &self,
        _ctx: &RequestContext,
        request: &GetBeerStyleById,
    ) -> Result<BeerStyleDto, AppError> {
        Ok(self.styles.get(request.id).await?.into())
    }
}

#[async_trait]
impl RequestHandler<GetBeerStyles> for StyleHandlers {
    async fn handle(
        &self,
        _ctx: &RequestContext,
        request: &GetBeerStyles,
    ) -> Result<PagedList<BeerStyleDto>, AppError> {
        let compare = BeerStylesFilter::resolve_sort(request.list.sort_by.as_deref())?;
        let styles = self.styles.find_where(&request.filter.predicates()).await?;

        Ok(PagedList::create(styles, &request.list, compare).map(BeerStyleDto::from))
    }
}
