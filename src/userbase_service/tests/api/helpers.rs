use std::time::Duration;

use reqwest::{Client, Response, redirect::Policy};
use userbase_adapters::{
    config::test,
    identity::{ConfiguredIdentityProvider, DisabledIdentityProvider, HttpIdentityProvider},
    persistence::HashMapUserStore,
};
use userbase_service::UserService;
use wiremock::MockServer;

const HEALTH_TIMEOUT: Duration = Duration::from_millis(500);

pub struct TestApp {
    pub address: String,
    pub http_client: Client,
    pub identity_server: MockServer,
    pub store: HashMapUserStore,
}

impl TestApp {
    /// A server over an empty memory store, with the identity provider
    /// mocked by `identity_server`.
    pub async fn new() -> Self {
        let identity_server = MockServer::start().await;
        let provider = ConfiguredIdentityProvider::Http(
            HttpIdentityProvider::build(identity_server.uri(), test::identity::TIMEOUT)
                .expect("Failed to build identity client"),
        );

        Self::spawn(provider, identity_server).await
    }

    /// A server started without any identity provider.
    pub async fn without_identity() -> Self {
        let identity_server = MockServer::start().await;
        let provider = ConfiguredIdentityProvider::Disabled(DisabledIdentityProvider);

        Self::spawn(provider, identity_server).await
    }

    async fn spawn(provider: ConfiguredIdentityProvider, identity_server: MockServer) -> Self {
        let store = HashMapUserStore::new();
        let service = UserService::new(store.clone(), provider, HEALTH_TIMEOUT);

        let listener = tokio::net::TcpListener::bind(test::APP_ADDRESS)
            .await
            .expect("Failed to bind test listener");
        let address = format!("http://{}", listener.local_addr().unwrap());

        tokio::spawn(service.run_standalone(listener, None, std::future::pending()));

        let http_client = Client::builder()
            .redirect(Policy::none())
            .build()
            .expect("Failed to build test client");

        Self {
            address,
            http_client,
            identity_server,
            store,
        }
    }

    pub async fn post_user<Body>(&self, body: &Body) -> Response
    where
        Body: serde::Serialize,
    {
        self.http_client
            .post(format!("{}/user", &self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_raw_user(&self, body: &'static str) -> Response {
        self.http_client
            .post(format!("{}/user", &self.address))
            .header("content-type", "application/json")
            .body(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get_users(&self) -> Response {
        self.http_client
            .get(format!("{}/user", &self.address))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get_user(&self, id: &str) -> Response {
        self.http_client
            .get(format!("{}/user/{}", &self.address, id))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get_health(&self) -> Response {
        self.http_client
            .get(format!("{}/health", &self.address))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_login<Body>(&self, body: &Body, cookie: Option<&str>) -> Response
    where
        Body: serde::Serialize,
    {
        let mut request = self
            .http_client
            .post(format!("{}/auth/login", &self.address))
            .json(body);
        if let Some(cookie) = cookie {
            request = request.header("cookie", cookie);
        }

        request.send().await.expect("Failed to execute request.")
    }

    pub async fn post_oauth_callback<Body>(&self, provider: &str, body: &Body) -> Response
    where
        Body: serde::Serialize,
    {
        self.http_client
            .post(format!(
                "{}/auth/oauth2/{}/callback",
                &self.address, provider
            ))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }
}
