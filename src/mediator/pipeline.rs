use async_trait::async_trait;
use futures_util::future::BoxFuture;
use std::any::{Any, TypeId};
use std::sync::Arc;

use crate::error::AppError;
use crate::mediator::context::{Policy, RequestContext};
use crate::mediator::request::{Request, RequestKind};

pub type BoxResponse = Box<dyn Any + Send>;

pub(crate) type Payload = dyn Any + Send + Sync;

pub(crate) type HandlerFuture<'a> = BoxFuture<'a, Result<BoxResponse, AppError>>;

pub(crate) type HandlerFn =
    Arc<dyn for<'a> Fn(&'a Payload, &'a RequestContext) -> HandlerFuture<'a> + Send + Sync>;

/// Type-erased view of the request travelling through the pipeline.
pub struct RequestInfo<'a> {
    pub name: &'static str,
    pub kind: RequestKind,
    pub policy: Policy,
    pub type_id: TypeId,
    pub(crate) payload: &'a Payload,
    serialize: fn(&Payload) -> Option<serde_json::Value>,
}

impl<'a> RequestInfo<'a> {
    pub fn of<R: Request>(request: &'a R) -> Self {
        Self {
            name: R::NAME,
            kind: R::KIND,
            policy: R::POLICY,
            type_id: TypeId::of::<R>(),
            payload: request,
            serialize: serialize_payload::<R>,
        }
    }

    pub fn payload(&self) -> &'a Payload {
        self.payload
    }

    pub fn downcast_ref<R: Request>(&self) -> Option<&'a R> {
        self.payload.downcast_ref::<R>()
    }

    /// The request serialized for logs and the audit trail.
    pub fn to_json(&self) -> Option<serde_json::Value> {
        (self.serialize)(self.payload)
    }
}

fn serialize_payload<R: Request>(payload: &Payload) -> Option<serde_json::Value> {
    payload
        .downcast_ref::<R>()
        .and_then(|request| serde_json::to_value(request).ok())
}

/// Cross-cutting middleware around every handler invocation.
#[async_trait]
pub trait PipelineBehavior: Send + Sync {
    async fn handle(
        &self,
        request: &RequestInfo<'_>,
        ctx: &RequestContext,
        next: Next<'_>,
    ) -> Result<BoxResponse, AppError>;
}

/// The rest of the pipeline: remaining behaviors, then the handler.
pub struct Next<'a> {
    behaviors: &'a [Arc<dyn PipelineBehavior>],
    handler: &'a HandlerFn,
}

impl<'a> Next<'a> {
    pub(crate) fn new(behaviors: &'a [Arc<dyn PipelineBehavior>], handler: &'a HandlerFn) -> Self {
        Self { behaviors, handler }
    }

    pub async fn run(
        self,
        request: &RequestInfo<'_>,
        ctx: &RequestContext,
    ) -> Result<BoxResponse, AppError> {
        match self.behaviors.split_first() {
            Some((behavior, rest)) => {
                behavior
                    .handle(request, ctx, Next::new(rest, self.handler))
                    .await
            }
            None => (self.handler)(request.payload, ctx).await,
        }
    }
}
