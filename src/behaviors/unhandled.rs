use async_trait::async_trait;
use futures_util::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use tracing::error;

use crate::error::AppError;
use crate::mediator::{BoxResponse, Next, PipelineBehavior, RequestContext, RequestInfo};

/// Outermost behavior. Client errors pass through; anything else (including
/// panics) is logged with its details and replaced by an opaque
/// [`AppError::Internal`].
pub struct UnhandledErrorBehavior;

#[async_trait]
impl PipelineBehavior for UnhandledErrorBehavior {
    async fn handle(
        &self,
        request: &RequestInfo<'_>,
        ctx: &RequestContext,
        next: Next<'_>,
    ) -> Result<BoxResponse, AppError> {
        match AssertUnwindSafe(next.run(request, ctx)).catch_unwind().await {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(e)) if e.is_client_error() => Err(e),
            Ok(Err(e)) => {
                error!(
                    correlation_id = %ctx.correlation_id,
                    request = ?request.to_json(),
                    "Unhandled error in {}: {}",
                    request.name,
                    e
                );
                Err(AppError::Internal(format!(
                    "unexpected error while handling {} (correlation id {})",
                    request.name, ctx.correlation_id
                )))
            }
            Err(panic) => {
                error!(
                    correlation_id = %ctx.correlation_id,
                    request = ?request.to_json(),
                    "Handler for {} panicked: {}",
                    request.name,
                    panic_message(panic.as_ref())
                );
                Err(AppError::Internal(format!(
                    "unexpected error while handling {} (correlation id {})",
                    request.name, ctx.correlation_id
                )))
            }
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(s) = panic.downcast_ref::<&str>() {
        *s
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.as_str()
    } else {
        "unknown panic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mediator::{Mediator, Policy, RequestHandler};
    use crate::request;
    use serde::Serialize;
    use std::sync::Arc;

    #[derive(Debug, Serialize)]
    struct Brew {
        outcome: &'static str,
    }
    request!(Brew => u32, Command, Policy::Anonymous);

    struct BrewHandler;

    #[async_trait]
    impl RequestHandler<Brew> for BrewHandler {
        async fn handle(&self, _ctx: &RequestContext, request: &Brew) -> Result<u32, AppError> {
            match request.outcome {
                "panic" => panic!("kettle boiled over"),
                "database" => Err(AppError::Database(rusqlite::Error::QueryReturnedNoRows)),
                "missing" => Err(AppError::NotFound { entity: "Beer", id: 9 }),
                _ => Ok(42),
            }
        }
    }

    fn mediator() -> Mediator {
        let mediator = Mediator::new().with_behavior(UnhandledErrorBehavior);
        mediator.register::<Brew, _>(Arc::new(BrewHandler)).unwrap();
        mediator
    }

    async fn brew(outcome: &'static str) -> Result<u32, AppError> {
        mediator()
            .send(&RequestContext::anonymous(), Brew { outcome })
            .await
    }

    #[tokio::test]
    async fn test_success_passes_through() {
        assert_eq!(brew("ok").await.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_panic_becomes_internal_error() {
        let err = brew("panic").await.unwrap_err();

        let message = match err {
            AppError::Internal(message) => message,
            other => panic!("expected an internal error, got {:?}", other),
        };
        assert!(message.contains("Brew"));
        assert!(!message.contains("kettle"));
    }

    #[tokio::test]
    async fn test_infrastructure_errors_are_hidden() {
        let err = brew("database").await.unwrap_err();

        let message = match err {
            AppError::Internal(message) => message,
            other => panic!("expected an internal error, got {:?}", other),
        };
        assert!(!message.contains("no rows"));
    }

    #[tokio::test]
    async fn test_client_errors_pass_through() {
        let err = brew("missing").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { entity: "Beer", id: 9 }));
    }

    #[test]
    fn test_panic_messages() {
        assert_eq!(panic_message(&"static"), "static");
        assert_eq!(panic_message(&String::from("owned")), "owned");
        assert_eq!(panic_message(&7_u8), "unknown panic");
    }
}
