//! HTTP core shared by every resource call.
//!
//! # Design
//! - Reads go through the request coordinator with [`CachePolicy::Cached`], so
//!   concurrent identical reads share one network call and repeats inside the
//!   TTL are served from memory.
//! - Writes use [`CachePolicy::Bypass`] and, once they succeed, drop cached
//!   reads for the collections they touch.
//! - The loading counter only moves while a network call is actually running.
//! - A 401 clears the session and emits [`SessionEvent::Expired`], followed by
//!   [`SessionEvent::RedirectToLogin`] after [`LOGIN_REDIRECT_DELAY`].

use std::future::Future;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use nursery_api_models::{ApiEnvelope, ErrorBody};
use nursery_config::ClientConfig;
use nursery_requests::{
    CachePolicy, CancellationToken, CoordinatorStats, QueryParams, RequestCoordinator,
    generate_key,
};
use nursery_signals::Signals;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Method, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::error::{ApiError, ApiResult, NETWORK_ERROR};
use crate::session::{LOGIN_PATH, Session, SessionEvent, SessionStore};

/// Delay between [`SessionEvent::Expired`] and the login redirect.
pub const LOGIN_REDIRECT_DELAY: Duration = Duration::from_millis(100);

const SESSION_EVENT_CAPACITY: usize = 16;

/// Client for the nursery backend.
///
/// Cheap to clone; clones share the coordinator, signals and session.
#[derive(Debug, Clone)]
pub struct ApiClient {
    inner: Arc<Inner>,
    cancel: Option<CancellationToken>,
}

#[derive(Debug)]
struct Inner {
    http: reqwest::Client,
    config: ClientConfig,
    coordinator: RequestCoordinator,
    signals: Signals,
    store: Arc<dyn SessionStore>,
    session: RwLock<Option<Session>>,
    events: broadcast::Sender<SessionEvent>,
}

impl ApiClient {
    /// Build a client. A session already present in `store` is picked up;
    /// an unreadable store is logged and treated as signed out.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Client`] when the HTTP client cannot be built.
    pub fn new(
        config: ClientConfig,
        signals: Signals,
        store: Arc<dyn SessionStore>,
    ) -> ApiResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let http = reqwest::Client::builder()
            .timeout(config.api_timeout)
            .default_headers(headers)
            .build()
            .map_err(|err| ApiError::Client {
                message: err.to_string(),
            })?;

        let session = store.load().unwrap_or_else(|err| {
            warn!(error = %err, "ignoring unreadable session");
            None
        });
        let (events, _) = broadcast::channel(SESSION_EVENT_CAPACITY);

        Ok(Self {
            inner: Arc::new(Inner {
                http,
                coordinator: RequestCoordinator::with_ttl(config.request_cache_ttl),
                config,
                signals,
                store,
                session: RwLock::new(session),
                events,
            }),
            cancel: None,
        })
    }

    /// Handle whose calls stop waiting once `token` is cancelled.
    ///
    /// An abandoned call still completes for any other caller sharing it.
    #[must_use]
    pub fn with_cancellation(&self, token: CancellationToken) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            cancel: Some(token),
        }
    }

    /// Configuration in use.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Loading, toast and confirmation state shared with the caller.
    #[must_use]
    pub fn signals(&self) -> &Signals {
        &self.inner.signals
    }

    /// Snapshot of the coordinator's internal maps.
    #[must_use]
    pub fn coordinator_stats(&self) -> CoordinatorStats {
        self.inner.coordinator.stats()
    }

    /// Drop every cached read.
    pub fn clear_cache(&self) {
        self.inner.coordinator.clear();
    }

    /// Current session, if signed in.
    #[must_use]
    pub fn session(&self) -> Option<Session> {
        self.inner.current_session()
    }

    /// Subscribe to session lifecycle events.
    #[must_use]
    pub fn session_events(&self) -> broadcast::Receiver<SessionEvent> {
        self.inner.events.subscribe()
    }

    pub(crate) fn install_session(&self, session: Session) -> ApiResult<()> {
        self.inner
            .store
            .save(&session)
            .map_err(|err| ApiError::Session {
                message: err.to_string(),
            })?;
        let user_id = session.user.id.clone();
        *self
            .inner
            .session
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(session);
        self.inner.coordinator.clear();
        let _ = self.inner.events.send(SessionEvent::SignedIn { user_id });
        Ok(())
    }

    pub(crate) fn drop_session(&self) -> ApiResult<()> {
        self.inner.forget_session();
        self.inner.coordinator.clear();
        let _ = self.inner.events.send(SessionEvent::SignedOut);
        self.inner
            .store
            .clear()
            .map_err(|err| ApiError::Session {
                message: err.to_string(),
            })
    }

    /// Coordinated, cached GET returning the envelope's `data`.
    pub(crate) async fn get<T>(&self, path: &str, params: Option<QueryParams>) -> ApiResult<T>
    where
        T: DeserializeOwned + Clone + Send + Sync + 'static,
    {
        let key = generate_key(Method::GET.as_str(), path, params.as_ref(), None);
        let inner = Arc::clone(&self.inner);
        let path = path.to_string();
        let produce = move || async move {
            let request = inner.request(&Method::GET, &path, params.as_ref());
            inner.execute(request, decode_envelope::<T>).await
        };
        self.coordinate(key, produce, CachePolicy::Cached).await
    }

    /// Uncached write returning the envelope's `data`.
    ///
    /// `invalidates` lists collection paths (e.g. `/breeds`) whose cached
    /// reads are dropped after success.
    pub(crate) async fn send<B, T>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        invalidates: &'static [&'static str],
    ) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned + Clone + Send + Sync + 'static,
    {
        self.write(method, path, body, invalidates, decode_envelope::<T>)
            .await
    }

    /// Uncached write whose response body is ignored.
    pub(crate) async fn send_empty<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        invalidates: &'static [&'static str],
    ) -> ApiResult<()>
    where
        B: Serialize + ?Sized,
    {
        self.write(method, path, body, invalidates, |_| Ok(())).await
    }

    async fn write<B, T>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        invalidates: &'static [&'static str],
        decode: fn(&[u8]) -> ApiResult<T>,
    ) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: Clone + Send + Sync + 'static,
    {
        let body = body
            .map(serde_json::to_value)
            .transpose()
            .map_err(|err| ApiError::Encode {
                message: err.to_string(),
            })?;
        let key = generate_key(method.as_str(), path, None, body.as_ref());
        let inner = Arc::clone(&self.inner);
        let path = path.to_string();
        let produce = move || async move {
            let mut request = inner.request(&method, &path, None);
            if let Some(body) = &body {
                request = request.json(body);
            }
            let outcome = inner.execute(request, decode).await;
            if outcome.is_ok() {
                for collection in invalidates {
                    let dropped = inner
                        .coordinator
                        .invalidate_prefix(&format!("GET|{collection}"));
                    debug!(collection, dropped, "invalidated cached reads");
                }
            }
            outcome
        };
        self.coordinate(key, produce, CachePolicy::Bypass).await
    }

    async fn coordinate<T, F, Fut>(
        &self,
        key: nursery_requests::RequestKey,
        produce: F,
        policy: CachePolicy,
    ) -> ApiResult<T>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = ApiResult<T>> + Send + 'static,
    {
        match &self.cancel {
            Some(token) => {
                self.inner
                    .coordinator
                    .coordinate_until(key, produce, policy, token)
                    .await
            }
            None => self.inner.coordinator.coordinate(key, produce, policy).await,
        }
    }
}

impl Inner {
    fn current_session(&self) -> Option<Session> {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn forget_session(&self) {
        self.session
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
    }

    fn request(&self, method: &Method, path: &str, params: Option<&QueryParams>) -> RequestBuilder {
        let mut request = self
            .http
            .request(method.clone(), self.config.endpoint(path));
        if let Some(params) = params.filter(|params| !params.is_empty()) {
            request = request.query(&query_pairs(params));
        }
        if let Some(session) = self.current_session() {
            request = request.bearer_auth(session.token);
        }
        request
    }

    async fn execute<T>(
        &self,
        request: RequestBuilder,
        decode: fn(&[u8]) -> ApiResult<T>,
    ) -> ApiResult<T> {
        let _loading = self.signals.loading.guard();
        let response = request.send().await.map_err(|err| self.network_error(&err))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|err| self.network_error(&err))?;

        if !status.is_success() {
            let err = ApiError::from_status(status.as_u16(), &ErrorBody::parse(&body));
            debug!(status = status.as_u16(), error = %err, "request rejected");
            if matches!(err, ApiError::Unauthorized { .. }) {
                self.expire_session();
            }
            return Err(err);
        }
        decode(&body)
    }

    fn network_error(&self, err: &reqwest::Error) -> ApiError {
        warn!(error = %err, "request failed without a response");
        let message = if err.is_timeout() {
            format!(
                "timeout of {}ms exceeded",
                self.config.api_timeout.as_millis()
            )
        } else {
            NETWORK_ERROR.to_string()
        };
        ApiError::Network { message }
    }

    fn expire_session(&self) {
        self.forget_session();
        if let Err(err) = self.store.clear() {
            warn!(error = %err, "failed to clear expired session");
        }
        self.coordinator.invalidate_prefix("");
        let _ = self.events.send(SessionEvent::Expired);

        let events = self.events.clone();
        tokio::spawn(async move {
            tokio::time::sleep(LOGIN_REDIRECT_DELAY).await;
            let _ = events.send(SessionEvent::RedirectToLogin {
                path: LOGIN_PATH.to_string(),
            });
        });
    }
}

fn decode_envelope<T: DeserializeOwned>(body: &[u8]) -> ApiResult<T> {
    serde_json::from_slice::<ApiEnvelope<T>>(body)
        .map(|envelope| envelope.data)
        .map_err(|err| ApiError::Decode {
            message: err.to_string(),
        })
}

fn query_pairs(params: &QueryParams) -> Vec<(&str, String)> {
    params
        .iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(name, value)| {
            let rendered = match value {
                Value::String(text) => text.clone(),
                other => other.to_string(),
            };
            (name.as_str(), rendered)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn query_pairs_render_strings_bare_and_skip_nulls() {
        let mut params = QueryParams::new();
        params.insert("search".to_string(), json!("rose"));
        params.insert("page".to_string(), json!(2));
        params.insert("nurseryId".to_string(), Value::Null);
        assert_eq!(
            query_pairs(&params),
            vec![("page", "2".to_string()), ("search", "rose".to_string())]
        );
    }

    #[test]
    fn decode_envelope_unwraps_data() {
        let value: Vec<u32> =
            decode_envelope(br#"{"success":true,"message":"ok","data":[1,2]}"#).expect("decodes");
        assert_eq!(value, vec![1, 2]);
        assert!(matches!(
            decode_envelope::<Vec<u32>>(b"<html>"),
            Err(ApiError::Decode { .. })
        ));
    }
}
