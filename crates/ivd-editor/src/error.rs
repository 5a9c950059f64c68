use crate::assets::AssetError;
use ivd_core::{ObjectId, PropKey, SceneError};
use ivd_render::RenderError;

#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error("no object is selected")]
    NoActiveObject,
    #[error("{0} is not an image")]
    NotAnImage(ObjectId),
    #[error("{0} is not a QR code")]
    NotAQrCode(ObjectId),
    #[error("{0:?} does not apply to the selected object")]
    UnsupportedProperty(PropKey),
    #[error("finish or cancel cropping first")]
    CropInProgress,
    #[error("not in crop mode")]
    CropNotActive,
    #[error("crop region does not overlap the image")]
    EmptyCropRegion,
    #[error("page {index} out of range ({len} pages)")]
    PageOutOfRange { index: usize, len: usize },
    #[error("a document needs at least one page")]
    LastPage,
    #[error(transparent)]
    Scene(#[from] SceneError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Asset(#[from] AssetError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Warning,
    Error,
}

/// A user-facing message the host should surface (toast, status bar).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}
