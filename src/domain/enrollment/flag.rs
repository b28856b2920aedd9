//! One-shot "has rendered" flag shared between a gate and its content

use std::sync::Arc;

use tokio::sync::watch;

/// Handle to an activation's exposure flag
///
/// The flag starts false and flips to true at most once. Hosts subscribe to
/// learn about the flip and schedule another render pass.
#[derive(Debug, Clone)]
pub struct EnrollmentHandle {
    flag: Arc<watch::Sender<bool>>,
}

impl EnrollmentHandle {
    /// Create a flag that has not rendered yet
    pub fn new() -> Self {
        let (flag, _) = watch::channel(false);
        Self {
            flag: Arc::new(flag),
        }
    }

    /// Mark the variation as rendered
    ///
    /// Returns true only for the call that performed the transition.
    pub fn mark_rendered(&self) -> bool {
        let changed = self.flag.send_if_modified(|rendered| {
            if *rendered {
                false
            } else {
                *rendered = true;
                true
            }
        });

        if changed {
            tracing::debug!("Variation marked as rendered");
        }

        changed
    }

    pub fn has_rendered(&self) -> bool {
        *self.flag.borrow()
    }

    /// Watch the flag for its transition
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.flag.subscribe()
    }
}

impl Default for EnrollmentHandle {
    fn default() -> Self {
        Self::new()
    }
}
