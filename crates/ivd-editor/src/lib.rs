//! Editing engine for invitation designs: undoable commands, interactive
//! gestures, pages, snapping, cropping, QR codes and image assets on top
//! of a [`SceneAdapter`](ivd_core::SceneAdapter).

pub mod assets;
pub mod commands;
pub mod config;
pub mod crop;
pub mod editor;
pub mod error;
pub mod events;
pub mod interactive;
pub mod pages;
pub mod panel;
pub mod qr;
pub mod shortcuts;
pub mod snapping;

pub use assets::{
    AssetError, AssetUploader, DataUriLoader, ImageJob, ImageLoader, UploadSlot, UploadedImage,
    upload_asset, upload_image,
};
pub use commands::{Command, CommandStack};
pub use config::{EditorConfig, QrConfig};
pub use crop::{CropJob, CropSession};
pub use editor::Editor;
pub use error::{EditorError, Notice, NoticeLevel};
pub use events::CanvasEvent;
pub use pages::{Document, Page};
pub use panel::{PanelState, TextStyle};
pub use shortcuts::{ShortcutAction, ShortcutMap};
pub use snapping::{GuideKind, SnapResult, Snapper, compute_snap};
