/// Middleware module
///
/// Custom middleware wrapped around route scopes.

mod visit_counter;

pub use visit_counter::{VisitCounter, VisitCounterMiddleware};
