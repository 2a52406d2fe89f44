use thiserror::Error;

use crate::message::Target;

/// Contract violations raised by routing, conversion and delivery.
///
/// These indicate programmer error (a message handed to the wrong target, a
/// broadcast directive used where a concrete platform is needed), never an
/// environmental failure. Missing webhook URLs and remote delivery failures
/// are logged, not returned.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NotifyError {
    /// The message variant cannot be converted for (or sent to) the target.
    #[error("unsupported message type '{kind}' for target {target}")]
    UnsupportedMessageType { target: Target, kind: &'static str },

    /// `Target::All` was passed where a single platform is required.
    #[error("target {0} cannot be routed to a single sender")]
    InvalidRoutingTarget(Target),

    /// Delivery was requested outside a tokio runtime.
    #[error("no async runtime available to deliver {0} webhook")]
    NoRuntime(Target),
}
