//! Resource provider domain: lifecycle events, payloads and responses.

pub mod event;
pub mod resource;
pub mod response;
pub mod scope;
pub mod table_log;

pub use event::LifecycleEvent;
pub use resource::{InternalMetadata, MetadataStamp, PropertyBag, Resource};
pub use response::{ErrorDetail, ErrorResponse, ResponseBody, WebhookResponse};
pub use scope::ResourceScope;
pub use table_log::TableLog;
