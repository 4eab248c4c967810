use std::time::Duration;

use userbase_core::{HealthReport, StoreConnection};

const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(1);

/// Health reporter - liveness probe against the active store connection.
///
/// A failed or slow probe is reported as `down`; it never takes the
/// process down with it.
#[derive(Clone)]
pub struct HealthReporter<C>
where
    C: StoreConnection,
{
    connection: C,
    timeout: Duration,
}

impl<C> HealthReporter<C>
where
    C: StoreConnection,
{
    pub fn new(connection: C) -> Self {
        Self {
            connection,
            timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[tracing::instrument(name = "HealthReporter::check", skip_all)]
    pub async fn check(&self) -> HealthReport {
        match tokio::time::timeout(self.timeout, self.connection.ping()).await {
            Ok(Ok(())) => HealthReport::up("It's healthy"),
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Store ping failed");
                HealthReport::down(format!("db down: {e}"))
            }
            Err(_) => {
                tracing::warn!(timeout = ?self.timeout, "Store ping timed out");
                HealthReport::down(format!(
                    "db down: no answer within {}ms",
                    self.timeout.as_millis()
                ))
            }
        }
    }
}
