use base64::Engine as _;

const PREFIX: &str = "data:";
const BASE64_MARKER: &str = ";base64,";

/// Image bytes embedded as `data:<mime>;base64,<data>`.
///
/// Usable directly as a display source and as a download payload, no fetch needed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri {
    mime: String,
    data: String,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DataUriError {
    #[error("data URI must start with \"data:\"")]
    MissingPrefix,
    #[error("data URI is not base64 encoded")]
    NotBase64,
    #[error("data URI has no media type")]
    EmptyMime,
    #[error("invalid base64 payload: {0}")]
    Decode(String),
}

impl DataUri {
    pub fn from_bytes(mime: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            mime: mime.into(),
            data: base64::engine::general_purpose::STANDARD.encode(bytes),
        }
    }

    /// Wraps an already encoded base64 payload, e.g. an `inlineData` part.
    pub fn from_base64(mime: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            mime: mime.into(),
            data: data.into(),
        }
    }

    pub fn parse(s: &str) -> Result<Self, DataUriError> {
        let rest = s.strip_prefix(PREFIX).ok_or(DataUriError::MissingPrefix)?;
        let (mime, data) = rest
            .split_once(BASE64_MARKER)
            .ok_or(DataUriError::NotBase64)?;
        if mime.trim().is_empty() {
            return Err(DataUriError::EmptyMime);
        }
        Ok(Self::from_base64(mime, data))
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn base64(&self) -> &str {
        &self.data
    }

    pub fn decode(&self) -> Result<Vec<u8>, DataUriError> {
        base64::engine::general_purpose::STANDARD
            .decode(self.data.as_bytes())
            .map_err(|e| DataUriError::Decode(e.to_string()))
    }
}

impl std::fmt::Display for DataUri {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{PREFIX}{}{BASE64_MARKER}{}", self.mime, self.data)
    }
}

impl std::str::FromStr for DataUri {
    type Err = DataUriError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_png_payload() {
        let uri = DataUri::parse("data:image/png;base64,AAAA").unwrap();
        assert_eq!(uri.mime(), "image/png");
        assert_eq!(uri.base64(), "AAAA");
        assert_eq!(uri.decode().unwrap(), vec![0u8, 0, 0]);
        assert_eq!(uri.to_string(), "data:image/png;base64,AAAA");
    }

    #[test]
    fn encodes_bytes() {
        let uri = DataUri::from_bytes("image/jpeg", b"hi");
        assert_eq!(uri.to_string(), "data:image/jpeg;base64,aGk=");
    }

    #[test]
    fn rejects_malformed() {
        assert_eq!(
            DataUri::parse("image/png;base64,AAAA"),
            Err(DataUriError::MissingPrefix)
        );
        assert_eq!(
            DataUri::parse("data:image/png,AAAA"),
            Err(DataUriError::NotBase64)
        );
        assert_eq!(
            DataUri::parse("data:;base64,AAAA"),
            Err(DataUriError::EmptyMime)
        );
        assert!(matches!(
            DataUri::parse("data:image/png;base64,!!").unwrap().decode(),
            Err(DataUriError::Decode(_))
        ));
    }
}
