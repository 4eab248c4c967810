use axum::{Json, extract::State};
use serde::Serialize;
use userbase_application::HealthReporter;
use userbase_core::{HealthReport, StoreConnection};

#[derive(Serialize, Debug)]
pub struct HealthResponse {
    pub server: &'static str,
    pub database: HealthReport,
}

/// Always 200; a failing store shows up in the `database` section only.
#[tracing::instrument(name = "Health", skip_all)]
pub async fn health<C>(State(reporter): State<HealthReporter<C>>) -> Json<HealthResponse>
where
    C: StoreConnection + Clone + 'static,
{
    Json(HealthResponse {
        server: "ok",
        database: reporter.check().await,
    })
}
