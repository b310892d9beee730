// Services layer for business logic
// Services own validation and derivations, calling storage directly

pub mod event;
pub mod insight;

pub use event::{CreateEventInput, EventService, EventServiceError};
pub use insight::InsightService;
