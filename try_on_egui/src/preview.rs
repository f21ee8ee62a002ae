use try_on::{DataUri, ImageFile};

/// Session-local preview of an image, backed by a GPU texture.
///
/// The texture is freed when this is dropped, so replacing a slot releases
/// the old preview.
pub struct Preview {
    file_name: String,
    texture: Option<egui::TextureHandle>,
}
impl std::fmt::Debug for Preview {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Preview")
            .field("file_name", &self.file_name)
            .field("loaded", &self.texture.is_some())
            .finish()
    }
}

impl Preview {
    pub(crate) fn load(ctx: &egui::Context, file: &ImageFile) -> Self {
        Self::from_bytes(ctx, file.name(), file.bytes())
    }

    pub(crate) fn from_data_uri(ctx: &egui::Context, name: &str, payload: &DataUri) -> Self {
        match payload.decode() {
            Ok(bytes) => Self::from_bytes(ctx, name, &bytes),
            Err(e) => {
                log::warn!("Cannot decode {name}: {e}");
                Self {
                    file_name: name.to_string(),
                    texture: None,
                }
            }
        }
    }

    fn from_bytes(ctx: &egui::Context, name: &str, bytes: &[u8]) -> Self {
        let texture = match decode(bytes) {
            Ok(image) => Some(ctx.load_texture(
                format!("preview: {name}"),
                image,
                egui::TextureOptions::LINEAR,
            )),
            Err(e) => {
                log::warn!("No preview for {name}: {e}");
                None
            }
        };
        Self {
            file_name: name.to_string(),
            texture,
        }
    }

    pub(crate) fn file_name(&self) -> &str {
        &self.file_name
    }

    pub(crate) fn texture(&self) -> Option<&egui::TextureHandle> {
        self.texture.as_ref()
    }

    /// Paints the texture aspect-fit and centered in `rect`.
    /// Returns `false` when there is nothing to paint.
    pub(crate) fn paint_fitted(&self, painter: &egui::Painter, rect: egui::Rect) -> bool {
        let Some(texture) = &self.texture else {
            return false;
        };
        let target = fit_inside(texture.size_vec2(), rect);
        let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
        painter.image(texture.id(), target, uv, egui::Color32::WHITE);
        true
    }
}

fn decode(bytes: &[u8]) -> Result<egui::ColorImage, image::ImageError> {
    let image = image::load_from_memory(bytes)?.to_rgba8();
    let size = [image.width() as _, image.height() as _];
    let pixels = image.as_flat_samples();
    Ok(egui::ColorImage::from_rgba_unmultiplied(
        size,
        pixels.as_slice(),
    ))
}

fn fit_inside(size: egui::Vec2, rect: egui::Rect) -> egui::Rect {
    if size.x <= 0.0 || size.y <= 0.0 {
        return rect;
    }
    let scale = (rect.width() / size.x).min(rect.height() / size.y);
    egui::Rect::from_center_size(rect.center(), size * scale)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let image = image::RgbaImage::from_pixel(width, height, image::Rgba([200, 10, 10, 255]));
        let mut bytes = Vec::new();
        image
            .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn decodes_png() {
        let image = decode(&png(3, 2)).unwrap();
        assert_eq!(image.size, [3, 2]);
        assert_eq!(image.pixels[0], egui::Color32::from_rgb(200, 10, 10));
    }

    #[test]
    fn rejects_garbage() {
        assert!(decode(b"definitely not an image").is_err());
    }

    #[test]
    fn fit_keeps_aspect_ratio() {
        let rect = egui::Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(200.0, 100.0));
        let fitted = fit_inside(egui::vec2(50.0, 50.0), rect);
        assert_eq!(fitted.size(), egui::vec2(100.0, 100.0));
        assert_eq!(fitted.center(), rect.center());

        let fitted = fit_inside(egui::vec2(400.0, 100.0), rect);
        assert_eq!(fitted.size(), egui::vec2(200.0, 50.0));
    }

    #[test]
    fn texture_released_with_preview() {
        let ctx = egui::Context::default();
        let file = ImageFile::new("model.png", png(4, 4)).unwrap();
        let preview = Preview::load(&ctx, &file);
        assert_eq!(preview.file_name(), "model.png");
        let id = preview.texture().map(|x| x.id()).unwrap();
        assert!(ctx.tex_manager().read().meta(id).is_some());
        drop(preview);
        assert!(ctx.tex_manager().read().meta(id).is_none());
    }

    #[test]
    fn undecodable_file_has_no_texture() {
        let ctx = egui::Context::default();
        let file = ImageFile::new("broken.jpg", b"nope".to_vec()).unwrap();
        assert!(Preview::load(&ctx, &file).texture().is_none());
    }

    #[test]
    fn result_from_data_uri() {
        let ctx = egui::Context::default();
        let payload = DataUri::from_bytes("image/png", &png(2, 2));
        let preview = Preview::from_data_uri(&ctx, "result", &payload);
        assert_eq!(
            preview.texture().map(|x| x.size()),
            Some([2, 2])
        );
    }
}
