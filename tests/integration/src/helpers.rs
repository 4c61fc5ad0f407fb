//! Test server lifecycle and request helpers

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Result;
use discover_api::{create_app, create_app_state, serve};
use discover_common::{AppConfig, JwtService};
use discover_core::UserKey;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

pub const TEST_JWT_SECRET: &str = "integration-test-secret";

/// A running API server backed by the in-memory database
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    pub upload_dir: TempDir,
    jwt: JwtService,
    handle: JoinHandle<()>,
}

impl TestServer {
    pub async fn start() -> Result<Self> {
        Self::start_with(|_| {}).await
    }

    /// Start with a tweaked configuration
    pub async fn start_with(configure: impl FnOnce(&mut AppConfig)) -> Result<Self> {
        let upload_dir = tempfile::tempdir()?;
        let upload_path = upload_dir
            .path()
            .to_str()
            .ok_or_else(|| anyhow::anyhow!("non UTF-8 temp dir"))?
            .to_string();

        let mut config = AppConfig::in_memory(TEST_JWT_SECRET, &upload_path);
        configure(&mut config);
        let jwt = JwtService::new(&config.jwt.secret, config.jwt.token_expiry);

        let state = create_app_state(config).await?;
        let app = create_app(state)?;

        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;
        let handle = tokio::spawn(async move {
            serve(listener, app).await.ok();
        });

        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self {
            addr,
            client,
            upload_dir,
            jwt,
            handle,
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Bearer token for `email`, as the identity provider would mint it
    pub fn token(&self, email: &str) -> Result<String> {
        let key = UserKey::parse(email)?;
        Ok(self.jwt.issue(&key)?.access_token)
    }

    pub fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let builder = self.client.request(method, self.url(path));
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> Result<Response> {
        Ok(self.request(Method::GET, path, token).send().await?)
    }

    pub async fn delete(&self, path: &str, token: Option<&str>) -> Result<Response> {
        Ok(self.request(Method::DELETE, path, token).send().await?)
    }

    pub async fn send_json<T: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: &T,
    ) -> Result<Response> {
        Ok(self.request(method, path, token).json(body).send().await?)
    }

    pub async fn post<T: Serialize + ?Sized>(
        &self,
        path: &str,
        token: Option<&str>,
        body: &T,
    ) -> Result<Response> {
        self.send_json(Method::POST, path, token, body).await
    }

    pub async fn put<T: Serialize + ?Sized>(
        &self,
        path: &str,
        token: Option<&str>,
        body: &T,
    ) -> Result<Response> {
        self.send_json(Method::PUT, path, token, body).await
    }

    pub async fn patch<T: Serialize + ?Sized>(
        &self,
        path: &str,
        token: Option<&str>,
        body: &T,
    ) -> Result<Response> {
        self.send_json(Method::PATCH, path, token, body).await
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Assert response status and parse the JSON body
pub async fn assert_json<T: DeserializeOwned>(
    response: Response,
    expected_status: StatusCode,
) -> Result<T> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(response.json().await?)
}

/// Assert response status without parsing the body
pub async fn assert_status(response: Response, expected_status: StatusCode) -> Result<()> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(())
}
