//! Gemini image model as the try-on generation service.
//!
//! The request carries the person photo, the garment photo and a text
//! instruction. The first inline image of the response becomes the result.

mod client;
mod config;
mod wire;

pub use client::GeminiService;
pub use config::{GeminiConfig, DEFAULT_ENDPOINT, DEFAULT_MODEL};
pub use wire::{build_request, parse_response, GenerateContentRequest, TRY_ON_PROMPT};
