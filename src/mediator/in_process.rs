use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::any::{type_name, TypeId};
use std::sync::Arc;

use crate::error::AppError;
use crate::mediator::context::RequestContext;
use crate::mediator::handler::RequestHandler;
use crate::mediator::pipeline::{
    BoxResponse, HandlerFn, HandlerFuture, Next, Payload, PipelineBehavior, RequestInfo,
};
use crate::mediator::request::Request;

/// In-process mediator.
/// - one handler per request type, keyed by `TypeId`
/// - every request runs through the behaviors in registration order
///   (first registered is outermost)
pub struct Mediator {
    handlers: DashMap<TypeId, (&'static str, HandlerFn)>,
    behaviors: Vec<Arc<dyn PipelineBehavior>>,
}

impl Default for Mediator {
    fn default() -> Self {
        Self {
            handlers: DashMap::new(),
            behaviors: Vec::new(),
        }
    }
}

impl Mediator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_behavior<B>(mut self, behavior: B) -> Self
    where
        B: PipelineBehavior + 'static,
    {
        self.behaviors.push(Arc::new(behavior));
        self
    }

    pub fn register<R, H>(&self, handler: Arc<H>) -> Result<(), AppError>
    where
        R: Request,
        H: RequestHandler<R> + 'static,
    {
        let f = erase(move |payload, ctx| {
            let handler = handler.clone();

            Box::pin(async move {
                // The key and the closure share the same `R`
                let request = payload
                    .downcast_ref::<R>()
                    .ok_or(AppError::TypeMismatch { expected: R::NAME })?;
                let response = handler.handle(ctx, request).await?;
                Ok::<BoxResponse, AppError>(Box::new(response))
            })
        });

        match self.handlers.entry(TypeId::of::<R>()) {
            Entry::Occupied(_) => Err(AppError::AlreadyRegistered(R::NAME)),
            Entry::Vacant(slot) => {
                slot.insert((R::NAME, f));
                Ok(())
            }
        }
    }

    pub async fn send<R: Request>(
        &self,
        ctx: &RequestContext,
        request: R,
    ) -> Result<R::Response, AppError> {
        let Some(handler) = self
            .handlers
            .get(&TypeId::of::<R>())
            .map(|entry| entry.1.clone())
        else {
            return Err(AppError::HandlerNotFound(R::NAME));
        };

        let info = RequestInfo::of(&request);
        let out = Next::new(&self.behaviors, &handler).run(&info, ctx).await?;

        match out.downcast::<R::Response>() {
            Ok(response) => Ok(*response),
            Err(_) => Err(AppError::TypeMismatch {
                expected: type_name::<R::Response>(),
            }),
        }
    }

    /// Names of every request with a registered handler.
    pub fn registered_requests(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.handlers.iter().map(|e| e.value().0).collect();
        names.sort_unstable();
        names
    }
}

fn erase<F>(f: F) -> HandlerFn
where
    F: for<'a> Fn(&'a Payload, &'a RequestContext) -> HandlerFuture<'a> + Send + Sync + 'static,
{
    Arc::new(f)
}
