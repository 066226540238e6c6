use crate::error::ProtocolError;
use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use bytes::Bytes;

const JPEG_SOI: [u8; 2] = [0xFF, 0xD8];

/// One JPEG image pushed by the server camera.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraFrame(Bytes);

impl CameraFrame {
    pub fn from_jpeg(bytes: impl Into<Bytes>) -> Result<Self, ProtocolError> {
        let bytes = bytes.into();
        if !bytes.starts_with(&JPEG_SOI) {
            return Err(ProtocolError::InvalidFrame("missing JPEG start-of-image marker".into()));
        }
        Ok(Self(bytes))
    }

    pub fn from_base64(data: &str) -> Result<Self, ProtocolError> {
        let bytes = BASE64
            .decode(data.trim())
            .map_err(|e| ProtocolError::InvalidFrame(e.to_string()))?;
        Self::from_jpeg(bytes)
    }

    pub fn to_base64(&self) -> String {
        BASE64.encode(&self.0)
    }

    pub fn bytes(&self) -> &Bytes {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
