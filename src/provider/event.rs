//! Lifecycle events the resource-management plane calls back on.

use axum::http::Method;
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use super::response::ErrorDetail;

/// Error code used by the sample validation rule.
pub const SAMPLE_ERROR_CODE: &str = "SampleErrorCode";

/// A provisioning lifecycle callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr)]
pub enum LifecycleEvent {
    /// Called before a resource creation is committed.
    #[strum(serialize = "OnResourceCreationValidate")]
    ResourceCreationValidate,
    /// Called to materialize the resource.
    #[strum(serialize = "OnResourceCreationBegin")]
    ResourceCreationBegin,
    /// Called after the resource creation finished.
    #[strum(serialize = "OnResourceCreationCompleted")]
    ResourceCreationCompleted,
    /// Called before a resource deletion is committed.
    #[strum(serialize = "OnResourceDeletionValidate")]
    ResourceDeletionValidate,
}

impl LifecycleEvent {
    /// Action name used in routes, logs and metric labels.
    pub fn action(self) -> &'static str {
        self.into()
    }

    /// HTTP verb the calling platform uses for this event.
    pub fn method(self) -> Method {
        match self {
            LifecycleEvent::ResourceCreationBegin => Method::PUT,
            _ => Method::POST,
        }
    }

    /// Route path the event is served on.
    pub fn path(self) -> String {
        format!("/Provider/{}", self.action())
    }

    /// Canned error returned when a validation hook rejects the request.
    pub fn validation_failure(self) -> Option<ErrorDetail> {
        let message = match self {
            LifecycleEvent::ResourceCreationValidate => {
                "SampleErrorMessage - Please don't create this resource. This is dangerous."
            }
            LifecycleEvent::ResourceDeletionValidate => {
                "SampleErrorMessage - Please don't delete this resource. This is important."
            }
            _ => return None,
        };
        Some(ErrorDetail::new(SAMPLE_ERROR_CODE, message))
    }
}
