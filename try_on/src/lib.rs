#![warn(clippy::all, rust_2018_idioms)]

mod data_uri;
pub use data_uri::{DataUri, DataUriError};

mod image_file;
pub use image_file::{ImageFile, ImageMime, UnsupportedImage};

mod slot;
pub use slot::{Slot, SlotRole, Slots};

mod generation;
pub use generation::{
    GenerationError, GenerationReply, GenerationRequest, GenerationService, PendingGeneration,
};

mod session;
pub use session::{
    ResultSaver, ResultView, Status, TryOnSession, ValidationError, RESULT_FILE_NAME,
    UNKNOWN_ERROR_MESSAGE,
};

pub mod gemini;
