#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The source cannot be read back as pixels (remote URL without CORS
    /// access, or anything that is not a `data:` URI).
    #[error("image source cannot be read: {0}")]
    Unreadable(String),
    #[error("image decode failed: {0}")]
    Decode(String),
    #[error("image encode failed: {0}")]
    Encode(String),
    #[error("cannot encode QR code: {0}")]
    QrPayload(String),
    #[error("pixel region is empty")]
    EmptyRegion,
}
