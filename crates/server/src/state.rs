use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

use buildhook_core::{Authenticator, Config, Pipeline, SanitizedConfig};

/// Raised when the server must stop because a deploy could not be started
/// under the terminate policy.
#[derive(Debug, Clone, Default)]
pub struct FatalSignal {
    tripped: Arc<AtomicBool>,
    notify: Arc<Notify>,
}

impl FatalSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trip(&self) {
        self.tripped.store(true, Ordering::SeqCst);
        self.notify.notify_waiters();
    }

    pub fn is_tripped(&self) -> bool {
        self.tripped.load(Ordering::SeqCst)
    }

    /// Resolves once [`FatalSignal::trip`] has been called.
    pub async fn wait(&self) {
        loop {
            let notified = self.notify.notified();
            if self.is_tripped() {
                return;
            }
            notified.await;
        }
    }
}

/// Shared application state
pub struct AppState {
    config: Config,
    authenticator: Arc<dyn Authenticator>,
    pipeline: Pipeline,
    fatal: FatalSignal,
}

impl AppState {
    pub fn new(
        config: Config,
        authenticator: Arc<dyn Authenticator>,
        pipeline: Pipeline,
        fatal: FatalSignal,
    ) -> Self {
        Self {
            config,
            authenticator,
            pipeline,
            fatal,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn authenticator(&self) -> &dyn Authenticator {
        self.authenticator.as_ref()
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    pub fn fatal(&self) -> &FatalSignal {
        &self.fatal
    }
}
