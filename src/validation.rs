//! Declarative validation rules.
//!
//! A [`RuleSet`] lists the rules of one request type field by field:
//!
//! ```
//! use beer_catalog::validation::{NumberRules, RuleSet, TextRules, Validator};
//!
//! struct Rate { comment: Option<String>, rating: i32 }
//!
//! let rules = RuleSet::<Rate>::new()
//!     .text("comment", |r| r.comment.as_deref(), TextRules::new().max_length(10))
//!     .number("rating", |r| Some(r.rating), NumberRules::new().between(1, 10));
//!
//! let failures = rules.validate(&Rate { comment: None, rating: 11 });
//! assert_eq!(failures.len(), 1);
//! assert_eq!(failures[0].field, "rating");
//! ```

use std::fmt::Display;

use crate::error::ValidationFailure;

pub trait Validator<T>: Send + Sync {
    fn validate(&self, item: &T) -> Vec<ValidationFailure>;
}

type Check<T> = Box<dyn Fn(&T, &mut Vec<ValidationFailure>) + Send + Sync>;

pub struct RuleSet<T> {
    checks: Vec<Check<T>>,
}

impl<T: 'static> RuleSet<T> {
    pub fn new() -> Self {
        Self { checks: Vec::new() }
    }

    pub fn text<F>(mut self, field: &'static str, get: F, rules: TextRules) -> Self
    where
        F: Fn(&T) -> Option<&str> + Send + Sync + 'static,
    {
        self.checks.push(Box::new(move |item: &T, failures: &mut Vec<ValidationFailure>| {
            rules.apply(field, get(item), failures)
        }));
        self
    }

    pub fn number<N, F>(mut self, field: &'static str, get: F, rules: NumberRules<N>) -> Self
    where
        N: PartialOrd + Display + Copy + Send + Sync + 'static,
        F: Fn(&T) -> Option<N> + Send + Sync + 'static,
    {
        self.checks.push(Box::new(move |item: &T, failures: &mut Vec<ValidationFailure>| {
            rules.apply(field, get(item), failures)
        }));
        self
    }

    /// Free-form rule; `message` is reported against `field` when
    /// `predicate` returns false.
    pub fn must<F>(mut self, field: &'static str, message: &'static str, predicate: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.checks.push(Box::new(move |item: &T, failures: &mut Vec<ValidationFailure>| {
            if !predicate(item) {
                failures.push(ValidationFailure::new(field, message));
            }
        }));
        self
    }
}

impl<T: 'static> Default for RuleSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> Validator<T> for RuleSet<T> {
    fn validate(&self, item: &T) -> Vec<ValidationFailure> {
        let mut failures = Vec::new();
        for check in &self.checks {
            check(item, &mut failures);
        }
        failures
    }
}

#[derive(Debug, Clone, Default)]
pub struct TextRules {
    required: bool,
    min_length: Option<usize>,
    max_length: Option<usize>,
    email: bool,
    url: bool,
    one_of: Option<&'static [&'static str]>,
    ignore_case: bool,
    allowed_chars: Option<fn(char) -> bool>,
}

impl TextRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Missing and blank values fail.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn min_length(mut self, len: usize) -> Self {
        self.min_length = Some(len);
        self
    }

    pub fn max_length(mut self, len: usize) -> Self {
        self.max_length = Some(len);
        self
    }

    pub fn email(mut self) -> Self {
        self.email = true;
        self
    }

    pub fn url(mut self) -> Self {
        self.url = true;
        self
    }

    pub fn one_of(mut self, values: &'static [&'static str]) -> Self {
        self.one_of = Some(values);
        self
    }

    pub fn one_of_ignore_case(mut self, values: &'static [&'static str]) -> Self {
        self.one_of = Some(values);
        self.ignore_case = true;
        self
    }

    pub fn chars(mut self, allowed: fn(char) -> bool) -> Self {
        self.allowed_chars = Some(allowed);
        self
    }

    fn apply(&self, field: &str, value: Option<&str>, failures: &mut Vec<ValidationFailure>) {
        let value = match value {
            Some(v) if !v.trim().is_empty() => v,
            Some(_) | None => {
                if self.required {
                    failures.push(ValidationFailure::new(field, "must not be empty"));
                }
                return;
            }
        };

        let len = value.chars().count();
        if let Some(min) = self.min_length {
            if len < min {
                failures.push(ValidationFailure::new(
                    field,
                    format!("must be at least {} characters long", min),
                ));
            }
        }
        if let Some(max) = self.max_length {
            if len > max {
                failures.push(ValidationFailure::new(
                    field,
                    format!("must be at most {} characters long", max),
                ));
            }
        }
        if self.email && !is_valid_email(value) {
            failures.push(ValidationFailure::new(field, "must be a valid email address"));
        }
        if self.url && !is_valid_url(value) {
            failures.push(ValidationFailure::new(field, "must be a valid http(s) url"));
        }
        if let Some(allowed) = self.allowed_chars {
            if !value.chars().all(allowed) {
                failures.push(ValidationFailure::new(field, "contains invalid characters"));
            }
        }
        if let Some(values) = self.one_of {
            let found = values.iter().any(|candidate| {
                if self.ignore_case {
                    candidate.eq_ignore_ascii_case(value)
                } else {
                    *candidate == value
                }
            });
            if !found {
                failures.push(ValidationFailure::new(
                    field,
                    format!("must be one of: {}", values.join(", ")),
                ));
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct NumberRules<N> {
    required: bool,
    lower: Option<(N, bool)>,
    upper: Option<(N, bool)>,
}

impl<N> Default for NumberRules<N> {
    fn default() -> Self {
        Self {
            required: false,
            lower: None,
            upper: None,
        }
    }
}

impl<N: PartialOrd + Display + Copy> NumberRules<N> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn greater_than(mut self, n: N) -> Self {
        self.lower = Some((n, false));
        self
    }

    pub fn greater_than_or_equal(mut self, n: N) -> Self {
        self.lower = Some((n, true));
        self
    }

    pub fn less_than(mut self, n: N) -> Self {
        self.upper = Some((n, false));
        self
    }

    pub fn less_than_or_equal(mut self, n: N) -> Self {
        self.upper = Some((n, true));
        self
    }

    /// Inclusive on both ends.
    pub fn between(self, min: N, max: N) -> Self {
        self.greater_than_or_equal(min).less_than_or_equal(max)
    }

    fn apply(&self, field: &str, value: Option<N>, failures: &mut Vec<ValidationFailure>) {
        let Some(value) = value else {
            if self.required {
                failures.push(ValidationFailure::new(field, "is required"));
            }
            return;
        };

        if let (Some((min, true)), Some((max, true))) = (self.lower, self.upper) {
            if !(value >= min && value <= max) {
                failures.push(ValidationFailure::new(
                    field,
                    format!("must be between {} and {}", min, max),
                ));
            }
            return;
        }

        match self.lower {
            Some((min, true)) if !(value >= min) => failures.push(ValidationFailure::new(
                field,
                format!("must be greater than or equal to {}", min),
            )),
            Some((min, false)) if !(value > min) => failures.push(ValidationFailure::new(
                field,
                format!("must be greater than {}", min),
            )),
            _ => {}
        }
        match self.upper {
            Some((max, true)) if !(value <= max) => failures.push(ValidationFailure::new(
                field,
                format!("must be less than or equal to {}", max),
            )),
            Some((max, false)) if !(value < max) => failures.push(ValidationFailure::new(
                field,
                format!("must be less than {}", max),
            )),
            _ => {}
        }
    }
}

pub fn is_valid_email(email: &str) -> bool {
    // Exactly one @, non-empty local part, domain of at least "x.x"
    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 {
        return false;
    }

    let local = parts[0];
    let domain = parts[1];

    if local.is_empty() || !domain.contains('.') || email.chars().any(char::is_whitespace) {
        return false;
    }

    let domain_parts: Vec<&str> = domain.split('.').collect();
    domain_parts.len() >= 2 && domain_parts.iter().all(|part| !part.is_empty())
}

pub fn is_valid_url(url: &str) -> bool {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"));

    match rest {
        Some(rest) => {
            let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
            !host.is_empty() && !host.contains(char::is_whitespace)
        }
        None => false,
    }
}
