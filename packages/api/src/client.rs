//! # HTTP client
//!
//! [`ApiClient`] turns a [`RequestDescriptor`] into a wire request, sends it
//! through a [`Transport`] and classifies what comes back:
//!
//! | Outcome | Result |
//! |---------|--------|
//! | no response | [`ClientError::Network`] |
//! | 2xx, JSON or empty body | the parsed body, as-is |
//! | 2xx, not JSON | [`ClientError::Parse`] |
//! | 401 | session cleared, [`ClientError::Unauthorized`] |
//! | other non-2xx | [`ClientError::Api`] with the body's `message` |
//!
//! A 401 also tells the user their session expired and carries a redirect to
//! the login page, unless they are already on an auth page or the landing
//! page. Both happen before the error is returned.

use std::rc::Rc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use store::{KeyValueStore, SessionStore};

use crate::auth::AccessGuard;
use crate::config::{ClientConfig, Timing};
use crate::error::{ClientError, GENERIC_ERROR_MESSAGE, SESSION_EXPIRED_MESSAGE};
use crate::navigation::{PageContext, RedirectIntent, Routes};
use crate::notify::{NoticeKind, Notifier};
use crate::transport::{ApiRequest, ApiResponse, Method, Transport};

/// One call against the API, relative to the configured base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    pub path: String,
    pub method: Method,
    pub body: Option<Value>,
    pub headers: Vec<(String, String)>,
}

impl RequestDescriptor {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method,
            body: None,
            headers: Vec::new(),
        }
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// REST client bound to one session.
#[derive(Clone)]
pub struct ApiClient<T, S> {
    base_url: String,
    transport: T,
    session: SessionStore<S>,
    notifier: Rc<dyn Notifier>,
    page: Rc<dyn PageContext>,
    routes: Routes,
    timing: Timing,
}

impl<T: Transport, S: KeyValueStore> ApiClient<T, S> {
    pub fn new(
        config: &ClientConfig,
        transport: T,
        storage: S,
        notifier: Rc<dyn Notifier>,
        page: Rc<dyn PageContext>,
    ) -> Self {
        Self {
            base_url: config.api.base_url.clone(),
            transport,
            session: SessionStore::new(storage, config.session.clone()),
            notifier,
            page,
            routes: config.routes.clone(),
            timing: config.timing.clone(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &SessionStore<S> {
        &self.session
    }

    pub fn notifier(&self) -> &dyn Notifier {
        self.notifier.as_ref()
    }

    pub fn page(&self) -> &dyn PageContext {
        self.page.as_ref()
    }

    pub fn routes(&self) -> &Routes {
        &self.routes
    }

    pub fn timing(&self) -> &Timing {
        &self.timing
    }

    /// Absolute URL for an API path.
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    pub async fn send(
        &self,
        path: &str,
        method: Method,
        body: Option<Value>,
    ) -> Result<Value, ClientError> {
        let mut descriptor = RequestDescriptor::new(method, path);
        descriptor.body = body;
        self.execute(descriptor).await
    }

    pub async fn get(&self, path: &str) -> Result<Value, ClientError> {
        self.send(path, Method::Get, None).await
    }

    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value, ClientError> {
        self.send(path, Method::Post, Some(to_body(body)?)).await
    }

    pub async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value, ClientError> {
        self.send(path, Method::Put, Some(to_body(body)?)).await
    }

    pub async fn patch<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value, ClientError> {
        self.send(path, Method::Patch, Some(to_body(body)?)).await
    }

    pub async fn delete(&self, path: &str) -> Result<Value, ClientError> {
        self.send(path, Method::Delete, None).await
    }

    /// Like [`ApiClient::execute`], decoding the body into `R`.
    pub async fn send_json<R: DeserializeOwned>(
        &self,
        descriptor: RequestDescriptor,
    ) -> Result<R, ClientError> {
        let (status, value) = self.dispatch(descriptor).await?;
        serde_json::from_value(value).map_err(|e| ClientError::Parse {
            status,
            detail: e.to_string(),
        })
    }

    pub async fn execute(&self, descriptor: RequestDescriptor) -> Result<Value, ClientError> {
        self.dispatch(descriptor).await.map(|(_, value)| value)
    }

    /// Send a request and classify the reply, keeping the status of a
    /// successful one.
    async fn dispatch(&self, descriptor: RequestDescriptor) -> Result<(u16, Value), ClientError> {
        let request = self.build_request(descriptor)?;
        tracing::debug!(method = %request.method, url = %request.url, "api request");

        let response = match self.transport.execute(request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("request did not reach the backend: {}", e);
                return Err(ClientError::Network {
                    detail: e.to_string(),
                });
            }
        };
        tracing::debug!(status = response.status, "api response");
        let status = response.status;
        self.classify(response).map(|value| (status, value))
    }

    fn build_request(&self, descriptor: RequestDescriptor) -> Result<ApiRequest, ClientError> {
        let mut headers = vec![("Content-Type".to_string(), "application/json".to_string())];
        if let Some(token) = self.session.token() {
            headers.push(("Authorization".to_string(), format!("Bearer {token}")));
        }
        // Caller headers replace defaults of the same name
        for (name, value) in descriptor.headers {
            headers.retain(|(existing, _)| !existing.eq_ignore_ascii_case(&name));
            headers.push((name, value));
        }

        let body = descriptor
            .body
            .map(|b| serde_json::to_string(&b))
            .transpose()
            .map_err(ClientError::Serialize)?;

        Ok(ApiRequest {
            method: descriptor.method,
            url: self.url(&descriptor.path),
            headers,
            body,
        })
    }

    fn classify(&self, response: ApiResponse) -> Result<Value, ClientError> {
        let status = response.status;
        let parsed = parse_body(&response.body);

        if response.is_success() {
            return parsed.map_err(|e| ClientError::Parse {
                status,
                detail: e.to_string(),
            });
        }

        let message = parsed.ok().as_ref().and_then(error_message);
        if status == 401 {
            let redirect = self.expire_session();
            return Err(ClientError::Unauthorized {
                message: message.unwrap_or_else(|| SESSION_EXPIRED_MESSAGE.to_string()),
                redirect,
            });
        }
        Err(ClientError::Api {
            status,
            message: message.unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string()),
        })
    }

    /// Drop the session after a 401 and decide whether to send the user to
    /// the login page.
    fn expire_session(&self) -> Option<RedirectIntent> {
        self.session.clear();
        tracing::info!("backend rejected the session token, session cleared");

        let location = self.page.location();
        if self.routes.is_auth_page(&location) || self.routes.is_landing_page(&location) {
            return None;
        }
        self.notifier
            .notify(SESSION_EXPIRED_MESSAGE, NoticeKind::Warning);
        Some(RedirectIntent::new(
            self.routes.login_url(&location),
            self.timing.session_expired_redirect(),
        ))
    }
}

impl<T, S: KeyValueStore + Clone> ApiClient<T, S> {
    /// Access checks bound to this client's session.
    pub fn guard(&self) -> AccessGuard<S> {
        AccessGuard::new(
            self.session.clone(),
            self.notifier.clone(),
            self.page.clone(),
            self.routes.clone(),
            self.timing.clone(),
        )
    }
}

fn to_body<B: Serialize + ?Sized>(body: &B) -> Result<Value, ClientError> {
    serde_json::to_value(body).map_err(ClientError::Serialize)
}

fn parse_body(body: &str) -> Result<Value, serde_json::Error> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(body)
}

fn error_message(body: &Value) -> Option<String> {
    ["message", "error"]
        .iter()
        .filter_map(|field| body.get(*field).and_then(Value::as_str))
        .find(|m| !m.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NETWORK_ERROR_MESSAGE;
    use crate::testing::Harness;
    use serde_json::json;
    use std::time::Duration;

    #[tokio::test]
    async fn test_builds_url_and_headers() {
        let h = Harness::at("/index.html").with_base("http://localhost:3000/api/v1/");
        h.transport.reply(200, json!({"success": true, "data": []}));

        let body = h.client.get("/restaurants?page=2").await.unwrap();
        assert_eq!(body["success"], json!(true));

        let requests = h.transport.requests();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.method, Method::Get);
        assert_eq!(request.url, "http://localhost:3000/api/v1/restaurants?page=2");
        assert_eq!(request.header("content-type"), Some("application/json"));
        assert_eq!(request.header("authorization"), None);
        assert_eq!(request.body, None);
    }

    #[tokio::test]
    async fn test_attaches_bearer_token_and_body() {
        let h = Harness::at("/pages/restaurant.html?id=3");
        h.sign_in("abc", json!({"id": 1, "email": "a@b.com"}));
        h.transport.reply(201, json!({"success": true, "data": {"id": 9}}));

        let review = json!({"rating": 5, "comment": "Great pho"});
        h.client.post("/restaurants/3/reviews", &review).await.unwrap();

        let request = &h.transport.requests()[0];
        assert_eq!(request.method, Method::Post);
        assert_eq!(request.header("Authorization"), Some("Bearer abc"));
        let sent: Value = serde_json::from_str(request.body.as_deref().unwrap()).unwrap();
        assert_eq!(sent, review);
    }

    #[tokio::test]
    async fn test_extra_headers_are_appended() {
        let h = Harness::at("/index.html");
        h.transport.reply(200, json!({}));
        let descriptor = RequestDescriptor::new(Method::Delete, "/reviews/4").with_header("X-Request-Id", "r-1");
        h.client.execute(descriptor).await.unwrap();
        assert_eq!(h.transport.requests()[0].header("x-request-id"), Some("r-1"));
    }

    #[tokio::test]
    async fn test_network_failure() {
        let h = Harness::at("/pages/profile.html");
        h.sign_in("abc", json!({"id": 1, "email": "a@b.com"}));
        h.transport.fail();

        let err = h.client.get("/auth/profile").await.unwrap_err();
        assert!(err.is_network());
        assert_eq!(err.to_string(), NETWORK_ERROR_MESSAGE);
        // Session untouched, nobody notified
        assert!(h.client.session().is_active());
        assert_eq!(h.storage.len(), 2);
        assert!(h.notices.is_empty());
    }

    #[tokio::test]
    async fn test_api_error_message() {
        let h = Harness::at("/pages/restaurant.html");
        h.transport
            .reply(422, json!({"success": false, "message": "Rating must be between 1 and 5"}));
        h.transport.reply(500, json!({"success": false}));
        h.transport.reply_raw(502, "<html>Bad Gateway</html>");

        let err = h.client.get("/x").await.unwrap_err();
        assert!(matches!(err, ClientError::Api { status: 422, .. }));
        assert_eq!(err.to_string(), "Rating must be between 1 and 5");

        let err = h.client.get("/x").await.unwrap_err();
        assert_eq!(err.to_string(), GENERIC_ERROR_MESSAGE);

        let err = h.client.get("/x").await.unwrap_err();
        assert!(matches!(err, ClientError::Api { status: 502, .. }));
        assert_eq!(err.to_string(), GENERIC_ERROR_MESSAGE);
    }

    #[tokio::test]
    async fn test_success_body_must_be_json() {
        let h = Harness::at("/index.html");
        h.transport.reply_raw(200, "not json");
        h.transport.reply_raw(204, "");

        let err = h.client.get("/x").await.unwrap_err();
        assert!(matches!(err, ClientError::Parse { status: 200, .. }));

        assert_eq!(h.client.delete("/x").await.unwrap(), Value::Null);
    }

    #[tokio::test]
    async fn test_unauthorized_clears_session_and_redirects() {
        let h = Harness::at("/pages/profile.html");
        h.sign_in("abc", json!({"id": 1, "email": "a@b.com"}));
        h.transport.reply(401, json!({"success": false, "message": "Token expired"}));

        let err = h.client.get("/auth/profile").await.unwrap_err();
        assert!(!h.client.session().is_active());
        assert_eq!(err.to_string(), "Token expired");
        assert_eq!(
            err.redirect(),
            Some(&RedirectIntent::new("login.html", Duration::from_millis(2000)))
        );
        assert_eq!(
            h.notices.take(),
            vec![(SESSION_EXPIRED_MESSAGE.to_string(), NoticeKind::Warning)]
        );
    }

    #[tokio::test]
    async fn test_unauthorized_from_root_page() {
        let h = Harness::at("/restaurants.html");
        h.sign_in("abc", json!({"id": 1, "email": "a@b.com"}));
        h.transport.reply_raw(401, "");

        let err = h.client.get("/favorites").await.unwrap_err();
        assert_eq!(err.to_string(), SESSION_EXPIRED_MESSAGE);
        assert_eq!(err.redirect().unwrap().to, "pages/login.html");
    }

    #[tokio::test]
    async fn test_unauthorized_on_auth_or_landing_page_is_quiet() {
        for page in ["/pages/login.html", "/pages/register.html", "/index.html", "/"] {
            let h = Harness::at(page);
            h.sign_in("abc", json!({"id": 1, "email": "a@b.com"}));
            h.transport.reply(401, json!({"message": "Invalid credentials"}));

            let err = h.client.post("/auth/login", &json!({})).await.unwrap_err();
            assert!(matches!(err, ClientError::Unauthorized { redirect: None, .. }));
            assert!(!err.already_notified());
            assert!(!h.client.session().is_active(), "session kept on {page}");
            assert!(h.notices.is_empty());
        }
    }

    #[tokio::test]
    async fn test_any_401_ends_the_session() {
        for path in ["/auth/profile", "/restaurants", "/admin/users/3"] {
            let h = Harness::at("/pages/admin.html");
            h.sign_in("abc", json!({"id": 1, "email": "a@b.com", "role": "admin"}));
            h.transport.reply(401, json!({}));
            let _ = h.client.delete(path).await;
            assert!(!h.client.session().is_active());
        }
    }

    #[tokio::test]
    async fn test_send_json_typed() {
        #[derive(serde::Deserialize)]
        struct Restaurant {
            name: String,
        }

        let h = Harness::at("/index.html");
        h.transport
            .reply(200, json!({"success": true, "data": {"name": "Pho 88"}}));
        let env: crate::Envelope<Restaurant> = h
            .client
            .send_json(RequestDescriptor::new(Method::Get, "/restaurants/1"))
            .await
            .unwrap();
        assert_eq!(env.data.unwrap().name, "Pho 88");
    }

    #[tokio::test]
    async fn test_send_json_decode_error_keeps_status() {
        #[derive(Debug, serde::Deserialize)]
        struct Created {
            #[allow(dead_code)]
            id: u64,
        }

        let h = Harness::at("/index.html");
        h.transport.reply(201, json!({"id": "not-a-number"}));
        let err = h
            .client
            .send_json::<Created>(RequestDescriptor::new(Method::Post, "/reviews"))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Parse { status: 201, .. }));
    }

    #[tokio::test]
    async fn test_caller_headers_replace_defaults() {
        let h = Harness::at("/index.html");
        h.sign_in("abc", json!({"id": 1, "email": "a@b.com"}));
        h.transport.reply(200, json!({}));

        let descriptor = RequestDescriptor::new(Method::Post, "/uploads")
            .with_header("content-type", "text/plain")
            .with_header("AUTHORIZATION", "Bearer other");
        h.client.execute(descriptor).await.unwrap();

        let requests = h.transport.requests();
        let request = &requests[0];
        let named = |name: &str| {
            request
                .headers
                .iter()
                .filter(|(n, _)| n.eq_ignore_ascii_case(name))
                .count()
        };
        assert_eq!(named("content-type"), 1);
        assert_eq!(named("authorization"), 1);
        assert_eq!(request.header("Content-Type"), Some("text/plain"));
        assert_eq!(request.header("Authorization"), Some("Bearer other"));
    }
}
