use crate::{
    config::ClientConfig, query::Query, ClientError, Credentials, ErrorResponse, LoginResponse,
    Result, DEFAULT_BASE_URL,
};
use std::collections::HashMap;

use futures::future::BoxFuture;
use serde_json::Value;
use tracing::{debug, warn};

/// Transport a [`Client`] dispatches its requests through.
///
/// Implementations only move bytes: status interpretation and JSON parsing
/// stay in the client. Network-level failures should surface as
/// [`ClientError::Transport`].
pub trait HttpClient: Send + Sync {
    fn request(&self, request: HttpRequest) -> BoxFuture<'_, Result<HttpResponse>>;
}

#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: HashMap<String, String>,
    pub body: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    GET,
    POST,
    PUT,
    DELETE,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::GET => "GET",
            HttpMethod::POST => "POST",
            HttpMethod::PUT => "PUT",
            HttpMethod::DELETE => "DELETE",
        }
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::GET => reqwest::Method::GET,
            HttpMethod::POST => reqwest::Method::POST,
            HttpMethod::PUT => reqwest::Method::PUT,
            HttpMethod::DELETE => reqwest::Method::DELETE,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

static HEADER_AUTHORIZATION: &str = "authorization";
static HEADER_CONTENT_TYPE: &str = "content-type";
static CONTENT_TYPE_JSON: &str = "application/json";
static CONTENT_TYPE_JSON_UTF8: &str = "application/json; charset=UTF-8";
static AUTH_SCHEME: &str = "Bearer";
static EMPTY_BODY: &str = "{}";

/// Default transport backed by an async `reqwest::Client`.
#[derive(Debug, Clone, Default)]
pub struct ReqwestClient {
    inner: reqwest::Client,
}

impl ReqwestClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reuse a preconfigured `reqwest::Client` (timeouts, proxies, TLS).
    pub fn with_client(inner: reqwest::Client) -> Self {
        Self { inner }
    }
}

impl HttpClient for ReqwestClient {
    fn request(&self, request: HttpRequest) -> BoxFuture<'_, Result<HttpResponse>> {
        Box::pin(async move {
            let mut builder = self
                .inner
                .request(request.method.into(), request.url.as_str());
            for (name, value) in &request.headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            if let Some(body) = request.body {
                builder = builder.body(body);
            }

            let response = builder
                .send()
                .await
                .map_err(|err| ClientError::Transport(err.to_string()))?;
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .map_err(|err| ClientError::Transport(err.to_string()))?;
            Ok(HttpResponse { status, body })
        })
    }
}

/// Wunderlist v1 API client.
///
/// Every call resolves to either the parsed JSON payload or exactly one
/// [`ClientError`]. The stored credential already carries the `Bearer`
/// scheme and is sent with every request once set.
pub struct Client<H = ReqwestClient> {
    base_url: String,
    api_key: Option<String>,
    http: H,
}

impl Client<ReqwestClient> {
    /// Client for `base_url`, validated like any configured URL.
    pub fn new(base_url: String) -> Result<Self> {
        Self::from_config(ClientConfig::default().with_base_url(base_url))
    }

    pub fn from_config(config: ClientConfig) -> Result<Self> {
        Self::with_http(config, ReqwestClient::new())
    }
}

impl Default for Client<ReqwestClient> {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            http: ReqwestClient::new(),
        }
    }
}

impl<H> Client<H> {
    pub fn with_api_key(mut self, api_key: &str) -> Self {
        self.set_api_key(api_key);
        self
    }

    /// Replace the stored credential with `Bearer <api_key>`.
    pub fn set_api_key(&mut self, api_key: &str) {
        self.api_key = Some(format!("{} {}", AUTH_SCHEME, api_key));
    }

    /// The value sent in the `authorization` header, if any.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn transport(&self) -> &H {
        &self.http
    }

    /// Compose the request a call would send, without sending it.
    pub fn build_request(&self, method: HttpMethod, path: &str, body: Option<String>) -> HttpRequest {
        let content_type = match method {
            HttpMethod::POST => CONTENT_TYPE_JSON_UTF8,
            _ => CONTENT_TYPE_JSON,
        };
        let mut headers = HashMap::new();
        headers.insert(HEADER_CONTENT_TYPE.to_string(), content_type.to_string());
        if let Some(api_key) = &self.api_key {
            headers.insert(HEADER_AUTHORIZATION.to_string(), api_key.clone());
        }

        let body = match method {
            HttpMethod::POST | HttpMethod::PUT => {
                Some(body.unwrap_or_else(|| EMPTY_BODY.to_string()))
            }
            HttpMethod::GET | HttpMethod::DELETE => None,
        };

        HttpRequest {
            method,
            url: format!("{}{}", self.base_url, path),
            headers,
            body,
        }
    }
}

impl<H: HttpClient> Client<H> {
    pub fn with_http(config: ClientConfig, http: H) -> Result<Self> {
        config.validate()?;
        let mut client = Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: None,
            http,
        };
        if let Some(api_key) = &config.api_key {
            client.set_api_key(api_key);
        }
        Ok(client)
    }

    /// Exchange credentials for an access token and keep it for later calls.
    pub async fn login(&mut self, credentials: &Credentials) -> Result<Value> {
        let body = serde_json::to_value(credentials)?;
        let login = self.post("/login", Some(body)).await?;
        match serde_json::from_value::<LoginResponse>(login.clone()) {
            Ok(response) => self.set_api_key(&response.token),
            Err(_) => warn!("login response carried no token, keeping previous credential"),
        }
        Ok(login)
    }

    // User endpoints
    pub async fn get_me(&self) -> Result<Value> {
        self.get("/me").await
    }

    pub async fn get_me_settings(&self) -> Result<Value> {
        self.get("/me/settings").await
    }

    pub async fn get_me_events(&self) -> Result<Value> {
        self.get("/me/events").await
    }

    pub async fn get_me_friends(&self) -> Result<Value> {
        self.get("/me/friends").await
    }

    pub async fn get_me_services(&self) -> Result<Value> {
        self.get("/me/services").await
    }

    pub async fn get_me_shares(&self) -> Result<Value> {
        self.get("/me/shares").await
    }

    pub async fn get_me_reminders(&self) -> Result<Value> {
        self.get("/me/reminders").await
    }

    // Task endpoints
    pub async fn get_me_tasks(&self) -> Result<Value> {
        self.get("/me/tasks").await
    }

    pub async fn get_me_tasks_in_list<I: AsRef<str>>(&self, list_id: I) -> Result<Value> {
        let path = format!("/me/tasks{}", Query::new().param("list_id", list_id.as_ref()));
        self.get(&path).await
    }

    pub async fn get_me_task<I: AsRef<str>>(&self, task_id: I) -> Result<Value> {
        self.get(&resource_path(task_id)).await
    }

    pub async fn create_me_task(&self, body: Option<Value>) -> Result<Value> {
        self.post("/me/tasks/", body).await
    }

    pub async fn update_me_task<I: AsRef<str>>(&self, task_id: I, body: Option<Value>) -> Result<Value> {
        self.put(&resource_path(task_id), body).await
    }

    pub async fn delete_me_task<I: AsRef<str>>(&self, task_id: I) -> Result<Value> {
        self.delete(&resource_path(task_id)).await
    }

    // List endpoints
    pub async fn get_me_lists(&self) -> Result<Value> {
        self.get("/me/lists").await
    }

    pub async fn create_me_list(&self, body: Option<Value>) -> Result<Value> {
        self.post("/me/lists/", body).await
    }

    pub async fn update_me_list<I: AsRef<str>>(&self, list_id: I, body: Option<Value>) -> Result<Value> {
        self.put(&resource_path(list_id), body).await
    }

    pub async fn delete_me_list<I: AsRef<str>>(&self, list_id: I) -> Result<Value> {
        self.delete(&resource_path(list_id)).await
    }

    async fn get(&self, path: &str) -> Result<Value> {
        self.send(HttpMethod::GET, path, None).await
    }

    async fn post(&self, path: &str, body: Option<Value>) -> Result<Value> {
        self.send(HttpMethod::POST, path, body.map(|b| b.to_string()))
            .await
    }

    async fn put(&self, path: &str, body: Option<Value>) -> Result<Value> {
        self.send(HttpMethod::PUT, path, body.map(|b| b.to_string()))
            .await
    }

    async fn delete(&self, path: &str) -> Result<Value> {
        self.send(HttpMethod::DELETE, path, None).await
    }

    async fn send(&self, method: HttpMethod, path: &str, body: Option<String>) -> Result<Value> {
        let request = self.build_request(method, path, body);
        debug!(
            method = method.as_str(),
            url = %request.url,
            authorized = self.api_key.is_some(),
            "dispatching request"
        );
        let response = self.http.request(request).await?;
        handle_response(response)
    }
}

fn resource_path<I: AsRef<str>>(id: I) -> String {
    format!("/{}", urlencoding::encode(id.as_ref()))
}

/// Map a transport response onto the client's single-outcome result.
fn handle_response(response: HttpResponse) -> Result<Value> {
    debug!(status = response.status, "received response");
    match response.status {
        404 => Err(ClientError::NotFound),
        422 => {
            let message = serde_json::from_str::<ErrorResponse>(&response.body)
                .map(|err| err.message)
                .unwrap_or(response.body);
            Err(ClientError::Unprocessable { message })
        }
        _ => {
            let data: Value = serde_json::from_str(&response.body)?;
            if data.get("errors").is_some() {
                Err(ClientError::Api(data))
            } else if data.is_object() || data.is_array() {
                Ok(data)
            } else {
                Err(ClientError::UnexpectedPayload(data))
            }
        }
    }
}
