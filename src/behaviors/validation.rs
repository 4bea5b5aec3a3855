use async_trait::async_trait;
use dashmap::DashMap;
use std::any::TypeId;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::error::{AppError, ValidationFailure};
use crate::mediator::pipeline::Payload;
use crate::mediator::{BoxResponse, Next, PipelineBehavior, Request, RequestContext, RequestInfo};
use crate::validation::Validator;

trait ErasedValidator: Send + Sync {
    fn validate(&self, payload: &Payload) -> Vec<ValidationFailure>;
}

struct Typed<R, V> {
    validator: V,
    _request: PhantomData<fn(&R)>,
}

impl<R, V> ErasedValidator for Typed<R, V>
where
    R: Request,
    V: Validator<R>,
{
    fn validate(&self, payload: &Payload) -> Vec<ValidationFailure> {
        payload
            .downcast_ref::<R>()
            .map(|request| self.validator.validate(request))
            .unwrap_or_default()
    }
}

/// Validators per request type. A request type may have several.
#[derive(Default)]
pub struct ValidatorRegistry {
    validators: DashMap<TypeId, Vec<Arc<dyn ErasedValidator>>>,
}

impl ValidatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<R, V>(&self, validator: V)
    where
        R: Request,
        V: Validator<R> + 'static,
    {
        self.validators
            .entry(TypeId::of::<R>())
            .or_default()
            .push(Arc::new(Typed {
                validator,
                _request: PhantomData,
            }));
    }

    pub fn validate(&self, request: &RequestInfo<'_>) -> Vec<ValidationFailure> {
        let validators = match self.validators.get(&request.type_id) {
            Some(entry) => entry.value().clone(),
            None => return Vec::new(),
        };

        validators
            .iter()
            .flat_map(|v| v.validate(request.payload()))
            .collect()
    }
}

/// Runs every registered validator; any failure stops the request before
/// it reaches its handler.
pub struct ValidationBehavior {
    registry: Arc<ValidatorRegistry>,
}

impl ValidationBehavior {
    pub fn new(registry: Arc<ValidatorRegistry>) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl PipelineBehavior for ValidationBehavior {
    async fn handle(
        &self,
        request: &RequestInfo<'_>,
        ctx: &RequestContext,
        next: Next<'_>,
    ) -> Result<BoxResponse, AppError> {
        let failures = self.registry.validate(request);
        if !failures.is_empty() {
            return Err(AppError::Validation(failures));
        }

        next.run(request, ctx).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request;
    use crate::validation::{NumberRules, RuleSet, TextRules};
    use serde::Serialize;

    #[derive(Debug, Serialize)]
    struct Rate {
        beer_id: i64,
        rating: i32,
        comment: Option<String>,
    }
    request!(Rate => (), Command, crate::mediator::Policy::Anonymous);

    fn registry() -> ValidatorRegistry {
        let registry = ValidatorRegistry::new();
        registry.register::<Rate, _>(
            RuleSet::<Rate>::new()
                .number("beer_id", |r| Some(r.beer_id), NumberRules::new().greater_than(0))
                .number("rating", |r| Some(r.rating), NumberRules::new().between(1, 10)),
        );
        registry.register::<Rate, _>(RuleSet::<Rate>::new().text(
            "comment",
            |r| r.comment.as_deref(),
            TextRules::new().max_length(5),
        ));
        registry
    }

    #[test]
    fn test_runs_every_validator_of_the_request() {
        let rate = Rate {
            beer_id: 0,
            rating: 11,
            comment: Some("far too long".to_string()),
        };

        let failures = registry().validate(&RequestInfo::of(&rate));
        let fields: Vec<&str> = failures.iter().map(|f| f.field.as_str()).collect();
        assert_eq!(fields, vec!["beer_id", "rating", "comment"]);
    }

    #[test]
    fn test_unregistered_request_has_no_failures() {
        let rate = Rate {
            beer_id: 0,
            rating: 0,
            comment: None,
        };
        assert!(ValidatorRegistry::new().validate(&RequestInfo::of(&rate)).is_empty());
    }
}
