use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::VariantArray)]
pub enum ImageMime {
    Png,
    Jpeg,
    Webp,
}
impl ImageMime {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageMime::Png => "image/png",
            ImageMime::Jpeg => "image/jpeg",
            ImageMime::Webp => "image/webp",
        }
    }

    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            ImageMime::Png => &["png"],
            ImageMime::Jpeg => &["jpg", "jpeg"],
            ImageMime::Webp => &["webp"],
        }
    }

    /// Every extension accepted by the file pickers.
    pub fn all_extensions() -> Vec<&'static str> {
        use strum::VariantArray;
        Self::VARIANTS
            .iter()
            .flat_map(|mime| mime.extensions().iter().copied())
            .collect()
    }

    pub fn from_file_name(name: &str) -> Option<Self> {
        use strum::VariantArray;
        let (_, extension) = name.rsplit_once('.')?;
        let extension = extension.to_ascii_lowercase();
        Self::VARIANTS
            .iter()
            .find(|mime| mime.extensions().contains(&extension.as_str()))
            .copied()
    }

    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        match image::guess_format(bytes).ok()? {
            image::ImageFormat::Png => Some(ImageMime::Png),
            image::ImageFormat::Jpeg => Some(ImageMime::Jpeg),
            image::ImageFormat::WebP => Some(ImageMime::Webp),
            _ => None,
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{file_name} is not a PNG, JPEG or WEBP image")]
pub struct UnsupportedImage {
    pub file_name: String,
}

/// Raw image handle selected by the user.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageFile {
    name: String,
    mime: ImageMime,
    bytes: Arc<[u8]>,
}
impl std::fmt::Debug for ImageFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageFile")
            .field("name", &self.name)
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl ImageFile {
    /// The type comes from the extension, falling back to the magic bytes.
    /// Contents are not decoded.
    pub fn new(
        name: impl Into<String>,
        bytes: impl Into<Arc<[u8]>>,
    ) -> Result<Self, UnsupportedImage> {
        let name = name.into();
        let bytes = bytes.into();
        let mime = ImageMime::from_file_name(&name)
            .or_else(|| ImageMime::sniff(&bytes))
            .ok_or_else(|| UnsupportedImage {
                file_name: name.clone(),
            })?;
        Ok(Self { name, mime, bytes })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mime(&self) -> ImageMime {
        self.mime
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}
