use std::{
    future::{Future, IntoFuture},
    time::Duration,
};

use axum::{
    Router,
    http::{HeaderValue, Method, request},
    routing::{get, post},
};
use tokio::{net::TcpListener, sync::oneshot};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use userbase_adapters::{
    config::AllowedOrigins,
    http::routes::{
        IdentityState, get_user, health, list_users, login, oauth_callback, register_user,
    },
};
use userbase_application::{HealthReporter, RegistrationService};
use userbase_core::{IdentityProvider, StoreConnection, UserStore};

use crate::tracing::{make_span_with_request_id, on_request, on_response};

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const SHUTDOWN_GRACE_PERIOD: Duration = Duration::from_secs(5);

/// The user registration API: user, health and identity routes.
pub struct UserService {
    router: Router,
    request_timeout: Duration,
}

impl UserService {
    /// Create a new UserService over one store and one identity provider
    ///
    /// # Arguments
    /// * `user_store` - The active store; it also answers health pings and
    ///   receives OAuth2 profiles
    /// * `identity_provider` - External identity provider, possibly disabled
    /// * `health_timeout` - Upper bound on a single store ping
    ///
    /// # Note on Architecture
    /// Stores are cheap to clone (a pool, a client or an `Arc`), so each
    /// route group gets its own handle as state.
    pub fn new<U, P>(user_store: U, identity_provider: P, health_timeout: Duration) -> Self
    where
        U: UserStore + StoreConnection + Clone + 'static,
        P: IdentityProvider + Clone + 'static,
    {
        let router = Router::new()
            .route("/user", get(list_users::<U>).post(register_user::<U>))
            .route("/user/{id}", get(get_user::<U>))
            .with_state(RegistrationService::new(user_store.clone()))
            .route("/health", get(health::<U>))
            .with_state(HealthReporter::new(user_store.clone()).with_timeout(health_timeout))
            .route("/auth/login", post(login::<P, U>))
            .route(
                "/auth/oauth2/{provider}/callback",
                post(oauth_callback::<P, U>),
            )
            .with_state(IdentityState {
                provider: identity_provider,
                storer: user_store,
            });

        Self {
            router,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Deadline for a whole request; a request past it is answered with 408.
    pub fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    fn with_trace_layer(mut self) -> Self {
        self.router = self.router.layer(
            TraceLayer::new_for_http()
                .make_span_with(make_span_with_request_id)
                .on_request(on_request)
                .on_response(on_response),
        );
        self
    }

    /// Convert the UserService into a router that can be mounted on another
    /// router
    ///
    /// # Arguments
    /// * `allowed_origins` - Optional list of allowed CORS origins
    pub fn as_nested_router(mut self, allowed_origins: Option<AllowedOrigins>) -> Router {
        self.router = self.router.layer(TimeoutLayer::new(self.request_timeout));

        if let Some(allowed_origins) = allowed_origins.filter(|origins| !origins.is_empty()) {
            let cors = CorsLayer::new()
                .allow_methods([Method::GET, Method::POST])
                .allow_credentials(true)
                .allow_origin(AllowOrigin::predicate(
                    move |origin: &HeaderValue, _request_parts: &request::Parts| {
                        allowed_origins.contains(origin)
                    },
                ));

            self.router = self.router.layer(cors);
        }
        self.with_trace_layer().router
    }

    /// Run the service as a standalone server until `shutdown` resolves
    ///
    /// In-flight requests get a grace period to finish once `shutdown`
    /// resolves; whatever is still running after it is dropped.
    pub async fn run_standalone<F>(
        self,
        listener: TcpListener,
        allowed_origins: Option<AllowedOrigins>,
        shutdown: F,
    ) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let router = self.as_nested_router(allowed_origins);

        tracing::info!("User service listening on {}", listener.local_addr()?);

        let (draining_tx, draining_rx) = oneshot::channel::<()>();
        let server = axum::serve(listener, router).with_graceful_shutdown(async move {
            shutdown.await;
            tracing::info!("Shutting down, draining in-flight requests");
            let _ = draining_tx.send(());
        });
        let mut server = std::pin::pin!(server.into_future());

        tokio::select! {
            result = &mut server => return result,
            _ = draining_rx => {}
        }

        match tokio::time::timeout(SHUTDOWN_GRACE_PERIOD, server).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(
                    grace_period = ?SHUTDOWN_GRACE_PERIOD,
                    "In-flight requests did not finish in time"
                );
                Ok(())
            }
        }
    }
}

/// Resolves on Ctrl+C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Could not listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Could not listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C"),
        _ = terminate => tracing::info!("Received SIGTERM"),
    }
}
