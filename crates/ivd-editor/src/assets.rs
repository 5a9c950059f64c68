//! Image assets: uploading to storage, loading pixels back, and placing
//! uploaded images on the canvas.
//!
//! Uploads go through a two-step protocol: ask the backend for an upload
//! slot (a signed PUT URL plus the public URL the asset will be served
//! from), then PUT the bytes. The transport lives behind
//! [`AssetUploader`] so hosts can plug in `fetch` or an HTTP client.
//!
//! Adding and replacing images follow the same prepare / await / complete
//! split as cropping: an [`ImageJob`] records what the upload is for, and
//! completing a job whose target disappeared in the meantime is a no-op.

use crate::commands::{Command, ReplaceObject};
use crate::editor::Editor;
use crate::error::{EditorError, Notice};
use image::RgbaImage;
use ivd_core::{Bitmap, ObjectId, SceneAdapter, SceneObject};
use ivd_render::RenderError;
use ivd_render::raster::{decode_data_uri, image_dimensions, sniff_mime};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssetError {
    #[error("unsupported file type")]
    UnsupportedType,
    #[error("could not get an upload slot: {0}")]
    Slot(String),
    #[error("upload failed: {0}")]
    Upload(String),
}

/// Where to PUT the bytes and where they will be served from.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadSlot {
    pub upload_url: String,
    pub public_url: String,
}

#[allow(async_fn_in_trait)]
pub trait AssetUploader {
    async fn request_upload_slot(&self, mime: &str) -> Result<UploadSlot, AssetError>;

    async fn put(&self, upload_url: &str, mime: &str, bytes: &[u8]) -> Result<(), AssetError>;
}

/// Upload `bytes` and return their public URL.
pub async fn upload_asset<U: AssetUploader>(
    uploader: &U,
    mime: &str,
    bytes: &[u8],
) -> Result<String, AssetError> {
    let slot = uploader.request_upload_slot(mime).await?;
    uploader.put(&slot.upload_url, mime, bytes).await?;
    log::info!("uploaded {} bytes to {}", bytes.len(), slot.public_url);
    Ok(slot.public_url)
}

/// Reads an image source back as pixels.
#[allow(async_fn_in_trait)]
pub trait ImageLoader {
    async fn load(&self, src: &str) -> Result<RgbaImage, RenderError>;
}

/// Loads `data:` URIs only; anything else is unreadable.
#[derive(Debug, Clone, Copy, Default)]
pub struct DataUriLoader;

impl ImageLoader for DataUriLoader {
    async fn load(&self, src: &str) -> Result<RgbaImage, RenderError> {
        decode_data_uri(src)
    }
}

/// A finished upload ready to become an image object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedImage {
    pub src: String,
    pub pixel_width: u32,
    pub pixel_height: u32,
}

/// Check, measure and upload an image file.
pub async fn upload_image<U: AssetUploader>(
    uploader: &U,
    bytes: &[u8],
) -> Result<UploadedImage, EditorError> {
    let mime = sniff_mime(bytes).ok_or(AssetError::UnsupportedType)?;
    let (pixel_width, pixel_height) = image_dimensions(bytes)?;
    let src = upload_asset(uploader, mime, bytes).await?;
    Ok(UploadedImage {
        src,
        pixel_width,
        pixel_height,
    })
}

/// What a pending upload is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageJob {
    Add,
    Replace { target: ObjectId },
}

impl<S: SceneAdapter> Editor<S> {
    /// Start replacing the active image.
    pub fn prepare_image_replace(&self) -> Result<ImageJob, EditorError> {
        self.ensure_not_cropping()?;
        let object = self.active_object().ok_or(EditorError::NoActiveObject)?;
        if !object.is_image() {
            return Err(EditorError::NotAnImage(object.id));
        }
        Ok(ImageJob::Replace { target: object.id })
    }

    /// Place an upload. New images are centered and shrunk to fit half the
    /// canvas; replacements keep the layer, position, rotation and
    /// rendered width of the image they replace.
    pub fn complete_image_job(
        &mut self,
        job: ImageJob,
        upload: Result<UploadedImage, EditorError>,
    ) -> Result<Option<ObjectId>, EditorError> {
        if let ImageJob::Replace { target } = job
            && !self.scene.contains(target)
        {
            log::debug!("dropping image upload for removed {target}");
            return Ok(None);
        }
        if self.crop.is_some() {
            self.notify(Notice::warning("Finish cropping before placing the image"));
            return Err(EditorError::CropInProgress);
        }
        let upload = match upload {
            Ok(upload) => upload,
            Err(err) => {
                self.notify(Notice::error(format!("Image upload failed: {err}")));
                return Err(err);
            }
        };
        if upload.pixel_width == 0 || upload.pixel_height == 0 {
            self.notify(Notice::error("Image upload failed: image is empty"));
            return Err(RenderError::EmptyRegion.into());
        }
        let bitmap = Bitmap::new(upload.src, upload.pixel_width, upload.pixel_height);
        let (pw, ph) = (upload.pixel_width as f64, upload.pixel_height as f64);
        self.commit_interactive();

        match job {
            ImageJob::Add => {
                let canvas = self.scene.canvas();
                let scale = (canvas.width / 2.0 / pw).min(canvas.height / 2.0 / ph).min(1.0);
                let (cx, cy) = canvas.center();
                let mut object = SceneObject::image(bitmap, cx - pw * scale / 2.0, cy - ph * scale / 2.0);
                object.geometry.scale_x = scale;
                object.geometry.scale_y = scale;
                Ok(Some(self.add_object(object)))
            }
            ImageJob::Replace { target } => {
                let Some(old) = self.scene.object(target) else {
                    return Ok(None);
                };
                let g = old.geometry;
                let mut object = SceneObject::image(bitmap, g.left, g.top);
                let scale = g.width * g.scale_x / pw;
                object.geometry.scale_x = scale;
                object.geometry.scale_y = scale;
                object.geometry.angle = g.angle;
                object.paint = old.paint.clone();
                let new_id = object.id;
                let Some(cmd) = ReplaceObject::new(&self.scene, target, object) else {
                    return Ok(None);
                };
                self.execute(Command::Replace(cmd));
                Ok(Some(new_id))
            }
        }
    }

    /// Upload `bytes` and add them as a new image.
    pub async fn add_image<U: AssetUploader>(
        &mut self,
        uploader: &U,
        bytes: &[u8],
    ) -> Result<Option<ObjectId>, EditorError> {
        let upload = upload_image(uploader, bytes).await;
        self.complete_image_job(ImageJob::Add, upload)
    }

    /// Upload `bytes` and swap them into the active image.
    pub async fn replace_image<U: AssetUploader>(
        &mut self,
        uploader: &U,
        bytes: &[u8],
    ) -> Result<Option<ObjectId>, EditorError> {
        let job = self.prepare_image_replace()?;
        let upload = upload_image(uploader, bytes).await;
        self.complete_image_job(job, upload)
    }

    /// Add an already hosted image without uploading.
    pub fn add_image_object(
        &mut self,
        src: impl Into<String>,
        pixel_width: u32,
        pixel_height: u32,
    ) -> Result<ObjectId, EditorError> {
        let upload = UploadedImage {
            src: src.into(),
            pixel_width,
            pixel_height,
        };
        self.complete_image_job(ImageJob::Add, Ok(upload))?
            .ok_or(EditorError::NoActiveObject)
    }
}
