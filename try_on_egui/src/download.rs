use try_on::{DataUri, ResultSaver};

/// Saves the generated image on the local machine: a save dialog natively,
/// a browser download on the web.
#[derive(Debug, Default)]
pub(crate) struct DownloadSaver;

#[cfg(not(target_arch = "wasm32"))]
impl ResultSaver for DownloadSaver {
    fn save(&mut self, file_name: &str, payload: &DataUri) {
        let bytes = match payload.decode() {
            Ok(bytes) => bytes,
            Err(e) => {
                log::error!("Cannot save {file_name}: {e}");
                return;
            }
        };
        let task = rfd::AsyncFileDialog::new()
            .set_title("Save try-on image")
            .set_file_name(file_name)
            .save_file();
        super::file_picker::execute(async move {
            if let Some(file) = task.await {
                match file.write(&bytes).await {
                    Ok(()) => log::info!("Saved {:?}", file.path()),
                    Err(e) => log::error!("Saving {:?} failed: {e}", file.path()),
                }
            }
        });
    }
}

#[cfg(target_arch = "wasm32")]
impl ResultSaver for DownloadSaver {
    fn save(&mut self, file_name: &str, payload: &DataUri) {
        if let Err(e) = click_download_link(file_name, &payload.to_string()) {
            log::error!("Download of {file_name} failed: {e:?}");
        }
    }
}

/// The payload is already resident, so a temporary `<a download>` is enough.
#[cfg(target_arch = "wasm32")]
fn click_download_link(file_name: &str, href: &str) -> Result<(), web_sys::wasm_bindgen::JsValue> {
    use web_sys::wasm_bindgen::{JsCast, JsValue};

    let document = web_sys::window()
        .and_then(|x| x.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let body = document
        .body()
        .ok_or_else(|| JsValue::from_str("no document body"))?;
    let anchor: web_sys::HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
    anchor.set_href(href);
    anchor.set_download(file_name);
    body.append_child(&anchor)?;
    anchor.click();
    body.remove_child(&anchor)?;
    Ok(())
}
