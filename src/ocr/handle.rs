//! Model Handle
//!
//! Lazy, initialize-once gate in front of a [`ModelHost`].
//!
//! State machine:
//!
//! ```text
//! Uninitialized ──ensure_loaded──▶ Loading ──ok──▶ Ready
//!                                     │
//!                                     └──err──▶ Failed ──ensure_loaded──▶ Loading
//! ```
//!
//! Only one load runs at a time. Callers arriving while a load is in flight
//! wait on the load lock and then observe its outcome; `Ready` is terminal.

use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::Mutex;

use super::host::ModelHost;
use super::types::Device;

/// Load state of the model
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Uninitialized,
    Loading,
    Ready { device: Device },
    Failed { message: String },
}

/// Shared handle to the OCR model
pub struct ModelHandle {
    host: Arc<dyn ModelHost>,
    state: RwLock<LoadState>,
    /// Held for the duration of a load attempt
    load_lock: Mutex<()>,
}

impl ModelHandle {
    pub fn new(host: Arc<dyn ModelHost>) -> Self {
        Self {
            host,
            state: RwLock::new(LoadState::Uninitialized),
            load_lock: Mutex::new(()),
        }
    }

    /// Get the underlying host
    pub fn host(&self) -> &Arc<dyn ModelHost> {
        &self.host
    }

    /// Snapshot of the current load state
    pub fn state(&self) -> LoadState {
        self.state.read().clone()
    }

    pub fn is_loaded(&self) -> bool {
        matches!(*self.state.read(), LoadState::Ready { .. })
    }

    /// Load the model if it is not loaded yet.
    ///
    /// Returns `true` once the model is ready. A failed attempt is logged and
    /// leaves the handle not loaded; the next call tries again.
    pub async fn ensure_loaded(&self) -> bool {
        if self.is_loaded() {
            return true;
        }

        let _guard = self.load_lock.lock().await;

        // Another caller may have finished loading while we waited
        if self.is_loaded() {
            return true;
        }

        *self.state.write() = LoadState::Loading;

        match self.host.load().await {
            Ok(device) => {
                tracing::info!(
                    model = %self.host.name(),
                    device = device.as_str(),
                    "Model loaded successfully"
                );
                *self.state.write() = LoadState::Ready { device };
                true
            }
            Err(e) => {
                tracing::error!(model = %self.host.name(), error = ?e, "Error loading model: {}", e);
                *self.state.write() = LoadState::Failed {
                    message: e.to_string(),
                };
                false
            }
        }
    }
}
