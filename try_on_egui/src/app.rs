use strum::VariantArray;
use try_on::gemini::{GeminiConfig, GeminiService};
use try_on::{DataUri, GenerationService, ImageFile, SlotRole, TryOnSession, RESULT_FILE_NAME};

use crate::download::DownloadSaver;
use crate::preview::Preview;
use crate::uploader::ImageUploader;
use crate::{icons, ACCENT, ERROR_COLOR};

/// Application shell: owns all state and drives the single generation call.
///
/// Nothing is persisted, a reload starts from empty slots.
pub struct TryOnApp<S = GeminiService> {
    session: TryOnSession<Preview>,
    uploaders: Vec<ImageUploader>,
    service: S,
    saver: DownloadSaver,
    /// Texture of the shown result, with the payload it was built from.
    result_image: Option<(DataUri, Preview)>,
    is_dark: bool,
}

impl TryOnApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let ctx = cc.egui_ctx.clone();
        let service =
            GeminiService::new(GeminiConfig::from_env()).with_notify(move || ctx.request_repaint());
        log::info!("Using {:?}", service);
        Self::with_service(service)
    }
}

impl<S: GenerationService> TryOnApp<S> {
    pub fn with_service(service: S) -> Self {
        Self {
            session: TryOnSession::new(),
            uploaders: SlotRole::VARIANTS
                .iter()
                .map(|role| ImageUploader::new(*role))
                .collect(),
            service,
            saver: DownloadSaver,
            result_image: None,
            is_dark: true,
        }
    }

    fn select(&mut self, ctx: &egui::Context, role: SlotRole, file: ImageFile) {
        let preview = Preview::load(ctx, &file);
        self.session.select(role, file, preview);
    }

    /// Dropped files go to the uploader under the pointer.
    fn file_dropped(&mut self, ctx: &egui::Context, file: egui::DroppedFile) {
        let pointer = ctx.input(|i| i.pointer.latest_pos());
        let Some(role) = pointer.and_then(|pos| {
            self.uploaders
                .iter()
                .find(|uploader| uploader.contains(pos))
                .map(ImageUploader::role)
        }) else {
            log::warn!("File dropped outside of an upload area: {}", file.name);
            return;
        };

        let egui::DroppedFile {
            path,
            name,
            mime: _,
            last_modified: _,
            bytes,
        } = file;
        let loaded = if let Some(bytes) = bytes {
            Some((name, bytes.to_vec()))
        } else if let Some(path) = path {
            read_path(path)
        } else {
            log::error!("File dropped: {name}, but unexpected data");
            None
        };
        let Some((file_name, bytes)) = loaded else {
            return;
        };
        match ImageFile::new(file_name, bytes) {
            Ok(file) => self.select(ctx, role, file),
            Err(e) => log::warn!("Ignoring dropped file: {e}"),
        }
    }

    /// Keeps the result texture in step with the session result. A new
    /// payload replaces the texture even if no frame saw the request load.
    fn sync_result_image(&mut self, ctx: &egui::Context) {
        match self.session.result() {
            Some(payload) => {
                let stale = self
                    .result_image
                    .as_ref()
                    .map_or(true, |(shown, _)| shown != payload);
                if stale {
                    let image = Preview::from_data_uri(ctx, RESULT_FILE_NAME, payload);
                    self.result_image = Some((payload.clone(), image));
                }
            }
            None => self.result_image = None,
        }
    }

    fn generate_clicked(&mut self) {
        if let Err(e) = self.session.generate(&self.service) {
            log::warn!("Try-on not started: {e}");
        }
    }

    fn show_header(&self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(12.0);
            ui.label(
                egui::RichText::new("حريم السلطان")
                    .size(40.0)
                    .strong()
                    .color(ACCENT),
            );
            ui.label(egui::RichText::new("Virtual Fashion Try-On").size(18.0));
            ui.add_space(16.0);
        });
    }

    fn show_action(&mut self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(16.0);
            let label = egui::RichText::new(format!(
                "{} {}",
                icons::SPARKLES,
                self.session.button_label()
            ))
            .size(20.0)
            .strong()
            .color(egui::Color32::from_rgb(15, 23, 42));
            let button = egui::Button::new(label)
                .fill(ACCENT)
                .rounding(26.0)
                .min_size(egui::vec2(240.0, 52.0));
            if ui.add_enabled(self.session.can_generate(), button).clicked() {
                self.generate_clicked();
            }
            if let Some(error) = self.session.error_message() {
                ui.add_space(12.0);
                ui.label(egui::RichText::new(error).color(ERROR_COLOR));
            }
            ui.add_space(16.0);
        });
    }
}

impl<S: GenerationService> eframe::App for TryOnApp<S> {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // keeps polling when the spinner is scrolled out of view
        if self.session.progress() {
            ctx.request_repaint_after(std::time::Duration::from_millis(250));
        }
        self.sync_result_image(ctx);

        for file in ctx.input_mut(|x| std::mem::take(&mut x.raw.dropped_files)) {
            self.file_dropped(ctx, file);
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            ctx.set_visuals(match self.is_dark {
                true => egui::Visuals::dark(),
                false => egui::Visuals::light(),
            });
            egui::menu::bar(ui, |ui| {
                egui::menu::menu_button(ui, "View", |ui| {
                    // Light/dark mode
                    {
                        let is_dark = &mut self.is_dark;
                        let label = match *is_dark {
                            true => "🌙->☀",
                            false => "☀->🌙",
                        };
                        if ui.button(label).clicked() {
                            ui.close_menu();
                            *is_dark = !*is_dark;
                        }
                    }
                });
            });

            egui::ScrollArea::vertical().show(ui, |ui| {
                self.show_header(ui);

                let mut selected = Vec::new();
                let mut download_clicked = false;
                ui.columns(2, |columns| {
                    for uploader in self.uploaders.iter_mut() {
                        let role = uploader.role();
                        let preview = self.session.preview(role);
                        if let Some(file) = uploader.show(&mut columns[0], preview) {
                            selected.push((role, file));
                        }
                        columns[0].add_space(16.0);
                    }
                    download_clicked = crate::result_display::show(
                        &mut columns[1],
                        self.session.result_view(),
                        self.result_image.as_ref().map(|(_, image)| image),
                    );
                });
                for (role, file) in selected {
                    self.select(ctx, role, file);
                }
                if download_clicked {
                    self.session.download(&mut self.saver);
                }

                self.show_action(ui);
            });
        });
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn read_path(path: std::path::PathBuf) -> Option<(String, Vec<u8>)> {
    let file_name = path
        .file_name()
        .map(|x| x.to_string_lossy())
        .unwrap_or(path.as_os_str().to_string_lossy())
        .to_string();
    match std::fs::read(&path) {
        Ok(bytes) => Some((file_name, bytes)),
        Err(e) => {
            log::warn!("Cannot read dropped file {}: {e}", path.display());
            None
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn read_path(path: std::path::PathBuf) -> Option<(String, Vec<u8>)> {
    log::warn!("Dropped file without contents: {}", path.display());
    None
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use try_on::{GenerationError, GenerationRequest, PendingGeneration};

    use super::*;

    /// Answers before the caller polls, like a request that completes while
    /// no frame is drawn.
    struct InstantService {
        results: RefCell<Vec<Result<DataUri, GenerationError>>>,
    }
    impl GenerationService for InstantService {
        fn start(&self, _request: GenerationRequest) -> PendingGeneration {
            let (reply, pending) = PendingGeneration::channel();
            reply.send(self.results.borrow_mut().remove(0)).unwrap();
            pending
        }
    }

    fn png(width: u32, height: u32) -> DataUri {
        let image = image::RgbaImage::from_pixel(width, height, image::Rgba([0, 120, 200, 255]));
        let mut bytes = Vec::new();
        image
            .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        DataUri::from_bytes("image/png", &bytes)
    }

    fn app(
        ctx: &egui::Context,
        results: Vec<Result<DataUri, GenerationError>>,
    ) -> TryOnApp<InstantService> {
        let mut app = TryOnApp::with_service(InstantService {
            results: RefCell::new(results),
        });
        app.select(ctx, SlotRole::Model, ImageFile::new("person.png", vec![0u8; 4]).unwrap());
        app.select(ctx, SlotRole::Garment, ImageFile::new("dress.png", vec![0u8; 4]).unwrap());
        app
    }

    /// One frame without drawing: poll, then sync the result texture.
    fn frame(app: &mut TryOnApp<InstantService>, ctx: &egui::Context) {
        assert!(!app.session.progress());
        app.sync_result_image(ctx);
    }

    fn shown_size(app: &TryOnApp<InstantService>) -> Option<[usize; 2]> {
        app.result_image
            .as_ref()
            .and_then(|(_, image)| image.texture())
            .map(|texture| texture.size())
    }

    #[test]
    fn result_texture_follows_latest_payload() {
        let ctx = egui::Context::default();
        let mut app = app(&ctx, vec![Ok(png(2, 2)), Ok(png(5, 3))]);

        app.generate_clicked();
        frame(&mut app, &ctx);
        assert_eq!(shown_size(&app), Some([2, 2]));

        // the second reply lands before any frame sees the loading state
        app.generate_clicked();
        frame(&mut app, &ctx);
        assert_eq!(shown_size(&app), Some([5, 3]));
        assert_eq!(
            app.result_image.as_ref().map(|(payload, _)| payload),
            app.session.result()
        );
    }

    #[test]
    fn failed_retry_clears_result_texture() {
        let ctx = egui::Context::default();
        let mut app = app(
            &ctx,
            vec![
                Ok(png(2, 2)),
                Err(GenerationError::Service {
                    status: 500,
                    message: "Internal error".into(),
                }),
            ],
        );

        app.generate_clicked();
        frame(&mut app, &ctx);
        assert!(app.result_image.is_some());

        app.generate_clicked();
        frame(&mut app, &ctx);
        assert!(app.result_image.is_none());
        assert_eq!(app.session.error_message(), Some("Internal error"));
    }
}
