use std::sync::Arc;

use super::{build_request, parse_response, GeminiConfig};
use crate::{
    DataUri, GenerationError, GenerationReply, GenerationRequest, GenerationService,
    PendingGeneration,
};

type Notify = Arc<dyn Fn() + Send + Sync>;

/// Runs each request off the UI loop: a worker thread natively, a local
/// future on the web. The reply arrives through the pending channel.
#[derive(Clone)]
pub struct GeminiService {
    config: GeminiConfig,
    notify: Option<Notify>,
}
impl std::fmt::Debug for GeminiService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiService")
            .field("model", &self.config.model)
            .field("endpoint", &self.config.endpoint)
            .field("has_api_key", &self.config.api_key.is_some())
            .finish()
    }
}

impl GeminiService {
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            config,
            notify: None,
        }
    }

    /// Called once the reply has been sent, e.g. to wake the UI.
    pub fn with_notify(mut self, notify: impl Fn() + Send + Sync + 'static) -> Self {
        self.notify = Some(Arc::new(notify));
        self
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }
}

impl GenerationService for GeminiService {
    fn start(&self, request: GenerationRequest) -> PendingGeneration {
        let (reply, pending) = PendingGeneration::channel();
        let Some(api_key) = self.config.api_key.clone() else {
            respond(&reply, Err(GenerationError::MissingApiKey), &self.notify);
            return pending;
        };
        let body = match serde_json::to_vec(&build_request(&request)) {
            Ok(body) => body,
            Err(e) => {
                respond(&reply, Err(GenerationError::Malformed(e.to_string())), &self.notify);
                return pending;
            }
        };
        let url = self.config.url();
        log::debug!("POST {url} ({} bytes)", body.len());
        spawn_request(url, api_key, body, reply, self.notify.clone());
        pending
    }
}

fn respond(
    reply: &GenerationReply,
    result: Result<DataUri, GenerationError>,
    notify: &Option<Notify>,
) {
    // the session may already be gone, nobody is waiting then
    let _ = reply.send(result);
    if let Some(notify) = notify {
        notify();
    }
}

fn transport(error: reqwest::Error) -> GenerationError {
    GenerationError::Transport(error.to_string())
}

#[cfg(not(target_arch = "wasm32"))]
fn spawn_request(
    url: String,
    api_key: String,
    body: Vec<u8>,
    reply: GenerationReply,
    notify: Option<Notify>,
) {
    std::thread::spawn(move || {
        let result = send_blocking(&url, &api_key, body);
        respond(&reply, result, &notify);
    });
}

#[cfg(not(target_arch = "wasm32"))]
fn send_blocking(url: &str, api_key: &str, body: Vec<u8>) -> Result<DataUri, GenerationError> {
    let client = reqwest::blocking::Client::builder()
        .timeout(None::<std::time::Duration>)
        .build()
        .map_err(transport)?;
    let response = client
        .post(url)
        .header("x-goog-api-key", api_key)
        .header(reqwest::header::CONTENT_TYPE, "application/json")
        .body(body)
        .send()
        .map_err(transport)?;
    let status = response.status().as_u16();
    let text = response.text().map_err(transport)?;
    parse_response(status, &text)
}

#[cfg(target_arch = "wasm32")]
fn spawn_request(
    url: String,
    api_key: String,
    body: Vec<u8>,
    reply: GenerationReply,
    notify: Option<Notify>,
) {
    wasm_bindgen_futures::spawn_local(async move {
        let result = send(&url, &api_key, body).await;
        respond(&reply, result, &notify);
    });
}

#[cfg(target_arch = "wasm32")]
async fn send(url: &str, api_key: &str, body: Vec<u8>) -> Result<DataUri, GenerationError> {
    let response = reqwest::Client::new()
        .post(url)
        .header("x-goog-api-key", api_key)
        .header(reqwest::header::CONTENT_TYPE, "application/json")
        .body(body)
        .send()
        .await
        .map_err(transport)?;
    let status = response.status().as_u16();
    let text = response.text().await.map_err(transport)?;
    parse_response(status, &text)
}
