use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::EvictionJob;

/// Starts the background jobs that aren't request-driven listeners. Hookd
/// has exactly one such job today, but the builder shape mirrors a runner
/// meant to host several (spec.md §7 composition root).
pub struct JobRunner {
    eviction: Option<EvictionJob>,
    shutdown: Option<CancellationToken>,
}

impl JobRunner {
    pub fn new() -> Self {
        Self {
            eviction: None,
            shutdown: None,
        }
    }

    pub fn with_eviction(mut self, job: EvictionJob) -> Self {
        self.eviction = Some(job);
        self
    }

    pub fn with_shutdown_token(mut self, token: CancellationToken) -> Self {
        self.shutdown = Some(token);
        self
    }

    pub async fn start(self) {
        info!("starting background job runner");

        if let Some(job) = self.eviction {
            let job = match &self.shutdown {
                Some(token) => job.with_cancellation(token.clone()),
                None => job,
            };
            tokio::spawn(Arc::new(job).start());
        }

        info!("all background jobs started");
    }
}

impl Default for JobRunner {
    fn default() -> Self {
        Self::new()
    }
}
