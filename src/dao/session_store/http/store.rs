use std::sync::Arc;

use futures::{StreamExt, future::BoxFuture};
use reqwest::{Client, Method, StatusCode};

use super::{
    config::HttpStoreConfig,
    error::{HttpStoreError, HttpStoreResult},
};
use crate::{
    dao::{
        models::{SessionEntity, SessionListItemEntity},
        session_store::{MemberDelta, SessionSignal, SessionStore, SessionStream},
        storage::StorageResult,
    },
    dto::sse::{EVENT_MISSING, EVENT_SNAPSHOT},
};

/// Session store backend talking to a remote store node over HTTP.
///
/// Operations map one-to-one onto the node's routes; the subscription is the
/// node's SSE stream decoded back into [`SessionSignal`] values. No request
/// is ever retried here: a failure surfaces to the caller and the next
/// pushed snapshot (if any) reconciles state.
#[derive(Clone)]
pub struct HttpSessionStore {
    client: Client,
    base_url: Arc<str>,
}

impl HttpSessionStore {
    /// Build a store client for the node at `config.base_url`.
    pub fn connect(config: HttpStoreConfig) -> HttpStoreResult<Self> {
        let client = Client::builder()
            .build()
            .map_err(|source| HttpStoreError::ClientBuilder { source })?;

        Ok(Self {
            client,
            base_url: Arc::<str>::from(config.base_url.trim_end_matches('/')),
        })
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}/{}", self.base_url, path);
        self.client.request(method, url)
    }

    async fn send(&self, method: Method, path: String) -> HttpStoreResult<reqwest::Response> {
        let builder = self.request(method, &path);
        builder
            .send()
            .await
            .map_err(|source| HttpStoreError::RequestSend { path, source })
    }

    async fn get_record(&self, code: &str) -> HttpStoreResult<Option<SessionEntity>> {
        let path = format!("sessions/{code}");
        let response = self.send(Method::GET, path.clone()).await?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => response
                .json::<SessionEntity>()
                .await
                .map(Some)
                .map_err(|source| HttpStoreError::DecodeResponse { path, source }),
            status => Err(HttpStoreError::RequestStatus { path, status }),
        }
    }

    async fn put_record(&self, code: &str, record: SessionEntity) -> HttpStoreResult<()> {
        let path = format!("sessions/{code}");
        let response = self
            .request(Method::PUT, &path)
            .json(&record)
            .send()
            .await
            .map_err(|source| HttpStoreError::RequestSend {
                path: path.clone(),
                source,
            })?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(HttpStoreError::RequestStatus {
                path,
                status: response.status(),
            })
        }
    }

    async fn patch_members(&self, code: &str, delta: MemberDelta) -> HttpStoreResult<bool> {
        let path = format!("sessions/{code}/members");
        let response = self
            .request(Method::PATCH, &path)
            .json(&delta)
            .send()
            .await
            .map_err(|source| HttpStoreError::RequestSend {
                path: path.clone(),
                source,
            })?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(false),
            status if status.is_success() => Ok(true),
            status => Err(HttpStoreError::RequestStatus { path, status }),
        }
    }

    async fn delete_record(&self, code: &str) -> HttpStoreResult<bool> {
        let path = format!("sessions/{code}");
        let response = self.send(Method::DELETE, path.clone()).await?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(false),
            status if status.is_success() => Ok(true),
            status => Err(HttpStoreError::RequestStatus { path, status }),
        }
    }

    async fn list_records(&self) -> HttpStoreResult<Vec<SessionListItemEntity>> {
        let path = "sessions".to_string();
        let response = self.send(Method::GET, path.clone()).await?;

        if !response.status().is_success() {
            return Err(HttpStoreError::RequestStatus {
                path,
                status: response.status(),
            });
        }

        response
            .json::<Vec<SessionListItemEntity>>()
            .await
            .map_err(|source| HttpStoreError::DecodeResponse { path, source })
    }

    async fn open_watch(&self, code: &str) -> HttpStoreResult<SessionStream> {
        let path = format!("sessions/{code}/watch");
        let response = self.send(Method::GET, path.clone()).await?;

        if !response.status().is_success() {
            return Err(HttpStoreError::RequestStatus {
                path,
                status: response.status(),
            });
        }

        Ok(decode_sse_stream(response))
    }
}

/// Turn the raw SSE byte stream into session signals. The stream ends when
/// the connection drops; reconnecting is the subscriber's decision.
fn decode_sse_stream(response: reqwest::Response) -> SessionStream {
    Box::pin(async_stream::stream! {
        let mut bytes = response.bytes_stream();
        let mut buffer = String::new();
        let mut frame = SseFrame::default();

        while let Some(chunk) = bytes.next().await {
            let Ok(chunk) = chunk else {
                break;
            };
            buffer.push_str(&String::from_utf8_lossy(&chunk));

            while let Some(pos) = buffer.find('\n') {
                let line = buffer[..pos].trim_end_matches('\r').to_string();
                buffer.drain(..=pos);

                if let Some(signal) = frame.feed(&line) {
                    yield signal;
                }
            }
        }
    })
}

/// Accumulates SSE lines until a blank line terminates the frame.
#[derive(Debug, Default)]
struct SseFrame {
    event: Option<String>,
    data: String,
}

impl SseFrame {
    /// Feed one line; returns a decoded signal when the frame completes.
    fn feed(&mut self, line: &str) -> Option<SessionSignal> {
        if line.is_empty() {
            let signal = decode_frame(self.event.as_deref(), &self.data);
            self.event = None;
            self.data.clear();
            return signal;
        }

        if line.starts_with(':') {
            // Keep-alive comment.
            return None;
        }

        if let Some(rest) = line.strip_prefix("event:") {
            self.event = Some(rest.trim().to_string());
        } else if let Some(rest) = line.strip_prefix("data:") {
            if !self.data.is_empty() {
                self.data.push('\n');
            }
            self.data.push_str(rest.strip_prefix(' ').unwrap_or(rest));
        }

        None
    }
}

fn decode_frame(event: Option<&str>, data: &str) -> Option<SessionSignal> {
    match event {
        Some(EVENT_MISSING) => Some(SessionSignal::Missing),
        Some(EVENT_SNAPSHOT) => serde_json::from_str::<SessionEntity>(data)
            .ok()
            .map(SessionSignal::Snapshot),
        _ => None,
    }
}

impl SessionStore for HttpSessionStore {
    fn get(&self, code: String) -> BoxFuture<'static, StorageResult<Option<SessionEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.get_record(&code).await.map_err(Into::into) })
    }

    fn put(&self, code: String, record: SessionEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.put_record(&code, record).await.map_err(Into::into) })
    }

    fn merge_members(
        &self,
        code: String,
        delta: MemberDelta,
    ) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move { store.patch_members(&code, delta).await.map_err(Into::into) })
    }

    fn delete(&self, code: String) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move { store.delete_record(&code).await.map_err(Into::into) })
    }

    fn list(&self) -> BoxFuture<'static, StorageResult<Vec<SessionListItemEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.list_records().await.map_err(Into::into) })
    }

    fn subscribe(&self, code: String) -> BoxFuture<'static, StorageResult<SessionStream>> {
        let store = self.clone();
        Box::pin(async move { store.open_watch(&code).await.map_err(Into::into) })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            let path = "healthcheck".to_string();
            let response = store
                .send(Method::GET, path.clone())
                .await
                .map_err(Into::<crate::dao::storage::StorageError>::into)?;
            if response.status().is_success() {
                Ok(())
            } else {
                Err(HttpStoreError::RequestStatus {
                    path,
                    status: response.status(),
                }
                .into())
            }
        })
    }
}
