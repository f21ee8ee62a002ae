use crate::{
    DataUri, GenerationError, GenerationRequest, GenerationService, ImageFile, PendingGeneration,
    Slot, SlotRole, Slots,
};

pub const RESULT_FILE_NAME: &str = "virtual-try-on-result.png";
pub const UNKNOWN_ERROR_MESSAGE: &str = "An unknown error occurred.";

const GENERATE_LABEL: &str = "Create Try-On";
const GENERATING_LABEL: &str = "Generating...";

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please upload both a model and a dress image.")]
    MissingImages,
    #[error("A try-on is already being generated.")]
    InFlight,
}

/// Request status. Loading never coexists with an error or a result.
#[derive(Debug, Default)]
pub enum Status {
    #[default]
    Idle,
    Loading(PendingGeneration),
    Error(String),
    Done(DataUri),
}

/// What the result pane shows, by precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultView<'a> {
    Loading,
    Image(&'a DataUri),
    Placeholder,
}

/// Client-local save of the generated image.
pub trait ResultSaver {
    fn save(&mut self, file_name: &str, payload: &DataUri);
}

/// All application state: the two slots and the request status.
#[derive(Debug)]
pub struct TryOnSession<P> {
    slots: Slots<P>,
    status: Status,
}
impl<P> Default for TryOnSession<P> {
    fn default() -> Self {
        Self {
            slots: Slots::default(),
            status: Status::Idle,
        }
    }
}

impl<P> TryOnSession<P> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the slot for `role`, in any status. The previous preview is
    /// released here.
    pub fn select(&mut self, role: SlotRole, file: ImageFile, preview: P) {
        log::info!("{} selected: {}", role.title(), file.name());
        if let Some(previous) = self.slots.set(role, Slot::new(file, preview)) {
            log::debug!(
                "Releasing previous {:?} preview: {}",
                role,
                previous.file().name()
            );
            drop(previous);
        }
    }

    pub fn slot(&self, role: SlotRole) -> Option<&Slot<P>> {
        self.slots.get(role)
    }

    pub fn preview(&self, role: SlotRole) -> Option<&P> {
        self.slots.get(role).map(Slot::preview)
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.status, Status::Loading(_))
    }

    pub fn can_generate(&self) -> bool {
        !self.is_loading() && self.slots.both().is_some()
    }

    pub fn button_label(&self) -> &'static str {
        if self.is_loading() {
            GENERATING_LABEL
        } else {
            GENERATE_LABEL
        }
    }

    /// Starts a generation with the currently selected files.
    ///
    /// With a missing slot the validation message becomes the error and the
    /// service is not called. Otherwise the previous result and error are
    /// cleared before the service is started.
    pub fn generate<S: GenerationService + ?Sized>(
        &mut self,
        service: &S,
    ) -> Result<(), ValidationError> {
        if self.is_loading() {
            log::warn!("Generation requested while another one is in flight");
            return Err(ValidationError::InFlight);
        }
        let Some((model, garment)) = self.slots.both() else {
            let error = ValidationError::MissingImages;
            self.status = Status::Error(error.to_string());
            return Err(error);
        };
        let request = GenerationRequest {
            model: model.clone(),
            garment: garment.clone(),
        };
        log::info!(
            "Generating try-on for {} wearing {}",
            request.model.name(),
            request.garment.name()
        );
        // clear the previous result and error before the call starts
        self.status = Status::Idle;
        let pending = service.start(request);
        self.status = Status::Loading(pending);
        Ok(())
    }

    /// Polls the in-flight request. Returns `true` while still loading.
    #[must_use]
    pub fn progress(&mut self) -> bool {
        self.status = match std::mem::take(&mut self.status) {
            Status::Loading(mut pending) => match pending.check() {
                None => Status::Loading(pending),
                Some(Ok(payload)) => {
                    log::info!("Try-on generated ({})", payload.mime());
                    Status::Done(payload)
                }
                Some(Err(error)) => {
                    log::warn!("Try-on generation failed: {error:?}");
                    Status::Error(failure_message(&error))
                }
            },
            other => other,
        };
        self.is_loading()
    }

    pub fn result_view(&self) -> ResultView<'_> {
        match &self.status {
            Status::Loading(_) => ResultView::Loading,
            Status::Done(payload) => ResultView::Image(payload),
            Status::Idle | Status::Error(_) => ResultView::Placeholder,
        }
    }

    pub fn result(&self) -> Option<&DataUri> {
        match &self.status {
            Status::Done(payload) => Some(payload),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.status {
            Status::Error(message) => Some(message.as_str()),
            _ => None,
        }
    }

    /// Saves the displayed result. No-op without one.
    pub fn download<S: ResultSaver + ?Sized>(&self, saver: &mut S) -> bool {
        if let Some(payload) = self.result() {
            saver.save(RESULT_FILE_NAME, payload);
            true
        } else {
            false
        }
    }
}

fn failure_message(error: &GenerationError) -> String {
    error
        .message()
        .unwrap_or_else(|| UNKNOWN_ERROR_MESSAGE.to_string())
}
