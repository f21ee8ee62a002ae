use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};

use crate::{DataUri, ImageFile};

/// Files handed to the service at click time. Replacing a slot afterwards
/// does not touch an in-flight request.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub model: ImageFile,
    pub garment: ImageFile,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error("API key is not configured. Set GEMINI_API_KEY and restart.")]
    MissingApiKey,
    #[error("Network request failed: {0}")]
    Transport(String),
    #[error("{message}")]
    Service { status: u16, message: String },
    #[error("The request was blocked: {0}")]
    Blocked(String),
    #[error("{}", no_image_message(.0))]
    NoImage(Option<String>),
    #[error("Unexpected response from the image service: {0}")]
    Malformed(String),
    #[error("An unknown error occurred.")]
    Unknown,
}

fn no_image_message(text: &Option<String>) -> String {
    match text {
        Some(text) => format!("The model did not return an image. It responded: {text}"),
        None => "The model did not return an image.".to_string(),
    }
}

impl GenerationError {
    /// Human readable message, `None` when the failure carries none.
    pub fn message(&self) -> Option<String> {
        match self {
            GenerationError::Unknown => None,
            other => Some(other.to_string()),
        }
    }
}

/// Single-shot, opaque image generation. No retry, cancel or timeout.
pub trait GenerationService {
    fn start(&self, request: GenerationRequest) -> PendingGeneration;
}

pub type GenerationReply = Sender<Result<DataUri, GenerationError>>;

#[derive(Debug)]
pub struct PendingGeneration {
    receiver: Receiver<Result<DataUri, GenerationError>>,
}
impl PendingGeneration {
    pub fn channel() -> (GenerationReply, Self) {
        let (sender, receiver) = channel();
        (sender, Self { receiver })
    }

    /// A resolved result, or `None` while in flight. A reply half dropped
    /// without sending resolves to [`GenerationError::Unknown`].
    pub fn check(&mut self) -> Option<Result<DataUri, GenerationError>> {
        match self.receiver.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(GenerationError::Unknown)),
        }
    }
}
