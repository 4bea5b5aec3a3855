//! Pipeline behaviors wrapping every request, outermost first:
//! unhandled-error translation, logging, performance timing, authorization,
//! auditing, validation.

pub mod audit;
pub mod authorization;
pub mod logging;
pub mod performance;
pub mod unhandled;
pub mod validation;

pub use audit::AuditBehavior;
pub use authorization::AuthorizationBehavior;
pub use logging::LoggingBehavior;
pub use performance::PerformanceBehavior;
pub use unhandled::UnhandledErrorBehavior;
pub use validation::{ValidationBehavior, ValidatorRegistry};
