// based on https://github.com/woelper/egui_pick_file/
use std::future::Future;
use std::sync::mpsc::{channel, Receiver, Sender};

use try_on::ImageMime;

#[derive(Debug)]
pub(crate) struct FilePicker {
    channel: (Sender<FileLoaded>, Receiver<FileLoaded>),
}
impl Default for FilePicker {
    fn default() -> Self {
        Self { channel: channel() }
    }
}

#[derive(Debug)]
pub(crate) struct FileLoaded {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl FilePicker {
    /// Opens the image dialog. The chosen file shows up in [`Self::take`].
    pub(crate) fn open(&self, ctx: &egui::Context, title: &str) {
        let sender = self.channel.0.clone();
        let extensions = ImageMime::all_extensions();
        let task = rfd::AsyncFileDialog::new()
            .set_title(title)
            .add_filter("Images (PNG, JPEG, WEBP)", extensions.as_slice())
            .pick_file();

        let ctx = ctx.clone();
        execute(async move {
            let file = task.await;
            if let Some(file) = file {
                let file_name = file.file_name();
                let bytes = file.read().await;
                let _ = sender.send(FileLoaded { file_name, bytes });
                ctx.request_repaint();
            }
        });
    }

    /// Most recent pick, older ones are dropped.
    pub(crate) fn take(&self) -> Option<FileLoaded> {
        let mut latest = None;
        while let Ok(msg) = self.channel.1.try_recv() {
            latest = Some(msg);
        }
        latest
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn execute<F: Future<Output = ()> + Send + 'static>(f: F) {
    std::thread::spawn(move || futures::executor::block_on(f));
}

#[cfg(target_arch = "wasm32")]
pub(crate) fn execute<F: Future<Output = ()> + 'static>(f: F) {
    wasm_bindgen_futures::spawn_local(f);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_keeps_last_pick() {
        let picker = FilePicker::default();
        assert!(picker.take().is_none());
        for name in ["first.png", "second.png"] {
            picker
                .channel
                .0
                .send(FileLoaded {
                    file_name: name.to_string(),
                    bytes: vec![],
                })
                .unwrap();
        }
        assert_eq!(picker.take().map(|x| x.file_name).as_deref(), Some("second.png"));
        assert!(picker.take().is_none());
    }
}
