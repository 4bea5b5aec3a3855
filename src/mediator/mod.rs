pub mod context;
pub mod handler;
pub mod in_process;
pub mod pipeline;
pub mod request;

pub use context::{Actor, Policy, RequestContext, Role};
pub use handler::RequestHandler;
pub use in_process::Mediator;
pub use pipeline::{BoxResponse, Next, PipelineBehavior, RequestInfo};
pub use request::{Request, RequestKind};
