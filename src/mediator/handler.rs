use async_trait::async_trait;

use crate::error::AppError;
use crate::mediator::{context::RequestContext, request::Request};

#[async_trait]
pub trait RequestHandler<R>: Send + Sync
where
    R: Request,
{
    async fn handle(&self, ctx: &RequestContext, request: &R) -> Result<R::Response, AppError>;
}
