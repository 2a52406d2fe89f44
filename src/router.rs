use std::collections::HashSet;
use std::sync::Arc;

use tracing::warn;

use crate::error::NotifyError;
use crate::message::Target;
use crate::platform::WebhookSender;

/// Lookup from a target to the sender that owns it.
///
/// The sender list is fixed at construction. Each concrete target should be
/// claimed by exactly one sender; when it is not, the first registration wins
/// and a warning is logged.
#[derive(Clone)]
pub struct TargetRouter {
    senders: Vec<Arc<dyn WebhookSender>>,
}

impl TargetRouter {
    pub fn new(senders: Vec<Arc<dyn WebhookSender>>) -> Self {
        let mut seen = HashSet::new();
        for sender in &senders {
            let target = sender.target();
            if target == Target::All {
                warn!("Sender registered for target {} can never be routed to", target);
            } else if !seen.insert(target) {
                warn!(
                    "Duplicate sender registered for target {}, the first one will be used",
                    target
                );
            }
        }
        Self { senders }
    }

    /// The sender for a concrete target, or `None` when nothing is registered.
    /// `Target::All` must go through [`TargetRouter::all`] instead.
    pub fn route(&self, target: Target) -> Result<Option<Arc<dyn WebhookSender>>, NotifyError> {
        if target == Target::All {
            return Err(NotifyError::InvalidRoutingTarget(target));
        }
        Ok(self.senders.iter().find(|s| s.target() == target).cloned())
    }

    /// Every registered sender, in registration order
    pub fn all(&self) -> &[Arc<dyn WebhookSender>] {
        &self.senders
    }
}
