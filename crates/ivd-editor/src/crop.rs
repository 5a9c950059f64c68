//! Image crop mode.
//!
//! Entering crop mode overlays a translucent, editable region on the
//! selected image and freezes everything else. Applying reads the image
//! pixels back, copies the region offscreen and swaps the original for a
//! new image holding only the cropped pixels, as one replace command.
//!
//! Reading pixels is asynchronous in a browser host, so applying is split
//! in two: [`Editor::prepare_crop`] computes a [`CropJob`], the host loads
//! the pixels, and [`Editor::finish_crop`] completes. If crop mode was left
//! or the image vanished meanwhile, the result is dropped.
//!
//! Rotated and skewed images are cropped through their axis-aligned
//! bounding box, and the result is unrotated.

use crate::assets::ImageLoader;
use crate::commands::{Command, ReplaceObject};
use crate::editor::Editor;
use crate::error::{EditorError, Notice};
use image::RgbaImage;
use ivd_core::{
    Bitmap, Color, Geometry, ObjectId, ObjectKind, Rect, SceneAdapter, SceneObject,
};
use ivd_render::{PixelRect, RenderError, canvas_to_source, crop_pixels, encode_png_data_uri};

#[derive(Debug, Clone)]
pub struct CropSession {
    pub image: ObjectId,
    pub region: ObjectId,
    /// Interaction flags to restore on exit: (id, selectable, evented).
    frozen: Vec<(ObjectId, bool, bool)>,
}

/// Everything needed to finish a crop once the pixels are loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct CropJob {
    pub image: ObjectId,
    /// Source to load pixels from.
    pub src: String,
    pub source_rect: PixelRect,
    /// Where the cropped image lands on the canvas.
    pub canvas_rect: Rect,
}

impl<S: SceneAdapter> Editor<S> {
    pub fn is_cropping(&self) -> bool {
        self.crop.is_some()
    }

    pub fn crop_session(&self) -> Option<&CropSession> {
        self.crop.as_ref()
    }

    /// Enter crop mode on the active image. Returns the crop region id.
    pub fn enter_crop(&mut self) -> Result<ObjectId, EditorError> {
        self.ensure_not_cropping()?;
        self.commit_interactive();
        let Some(image) = self.active_object() else {
            self.notify(Notice::warning("Select an image to crop"));
            return Err(EditorError::NoActiveObject);
        };
        if !image.is_image() {
            let id = image.id;
            self.notify(Notice::warning("Only images can be cropped"));
            return Err(EditorError::NotAnImage(id));
        }
        let image_id = image.id;
        let bbox = image.bounding_box();

        let mut frozen = Vec::new();
        for object in self.scene.objects() {
            frozen.push((object.id, object.selectable, object.evented));
        }
        for &(id, _, _) in &frozen {
            if let Some(object) = self.scene.object_mut(id) {
                object.selectable = false;
                object.evented = false;
            }
        }

        let mut region = SceneObject::new(
            ObjectId::with_prefix("crop_region"),
            ObjectKind::Rect { corner_radius: 0.0 },
            Geometry::new(bbox.x0, bbox.y0, bbox.width(), bbox.height()),
        );
        region.paint.fill = Some(Color::rgba(255, 255, 255, 77));
        region.paint.stroke = Some(self.config.guide_color);
        region.paint.stroke_width = 1.0;
        region.exclude_from_export = true;
        let region_id = region.id;
        self.scene.add_object(region);
        self.scene.set_active(Some(region_id));
        self.scene.render();

        self.crop = Some(CropSession {
            image: image_id,
            region: region_id,
            frozen,
        });
        Ok(region_id)
    }

    /// Move or resize the crop region, in canvas coordinates.
    pub fn set_crop_region(&mut self, rect: Rect) -> Result<(), EditorError> {
        let session = self.crop.as_ref().ok_or(EditorError::CropNotActive)?;
        let region = session.region;
        if let Some(object) = self.scene.object_mut(region) {
            object.geometry = Geometry::new(rect.x0, rect.y0, rect.width(), rect.height());
            self.scene.object_modified(region);
            self.scene.render();
        }
        Ok(())
    }

    /// Leave crop mode without changes and reselect the image.
    pub fn cancel_crop(&mut self) -> Result<(), EditorError> {
        let session = self.crop.take().ok_or(EditorError::CropNotActive)?;
        let image = session.image;
        self.exit_crop(session);
        self.scene.set_active(Some(image));
        self.scene.render();
        Ok(())
    }

    fn exit_crop(&mut self, session: CropSession) {
        self.scene.remove_object(session.region);
        for (id, selectable, evented) in session.frozen {
            if let Some(object) = self.scene.object_mut(id) {
                object.selectable = selectable;
                object.evented = evented;
            }
        }
    }

    /// Compute what to crop. On failure crop mode is left and a notice is
    /// raised.
    pub fn prepare_crop(&mut self) -> Result<CropJob, EditorError> {
        let session = self.crop.as_ref().ok_or(EditorError::CropNotActive)?;
        let (image_id, region_id) = (session.image, session.region);

        let job = match (self.scene.object(image_id), self.scene.object(region_id)) {
            (Some(image), Some(region)) => Self::crop_job(image, region.bounding_box()),
            _ => None,
        };
        match job {
            Some(job) => Ok(job),
            None => {
                self.notify(Notice::warning("The crop region does not overlap the image"));
                let _ = self.cancel_crop();
                Err(EditorError::EmptyCropRegion)
            }
        }
    }

    fn crop_job(image: &SceneObject, region: Rect) -> Option<CropJob> {
        let bitmap = image.bitmap()?;
        let bbox = image.bounding_box();
        let area = bbox.intersect(region);
        if area.width() <= 0.0 || area.height() <= 0.0 || bitmap.pixel_width == 0 || bitmap.pixel_height == 0 {
            return None;
        }
        let scale = (
            bbox.width() / bitmap.pixel_width as f64,
            bbox.height() / bitmap.pixel_height as f64,
        );
        let source_rect = canvas_to_source(
            area,
            (bbox.x0, bbox.y0),
            scale,
            (bitmap.pixel_width, bitmap.pixel_height),
        )?;
        Some(CropJob {
            image: image.id,
            src: bitmap.src.clone(),
            source_rect,
            canvas_rect: area,
        })
    }

    /// Complete a crop with the loaded pixels. Returns the new image id, or
    /// `None` when the job went stale.
    pub fn finish_crop(
        &mut self,
        job: CropJob,
        pixels: Result<RgbaImage, RenderError>,
    ) -> Result<Option<ObjectId>, EditorError> {
        let live = self.crop.as_ref().is_some_and(|s| s.image == job.image)
            && self.scene.contains(job.image);
        if !live {
            log::debug!("dropping stale crop of {}", job.image);
            return Ok(None);
        }

        let replacement = pixels
            .and_then(|pixels| crop_pixels(&pixels, job.source_rect))
            .and_then(|cropped| {
                let src = encode_png_data_uri(&cropped)?;
                Ok(Bitmap::new(src, cropped.width(), cropped.height()))
            });
        let bitmap = match replacement {
            Ok(bitmap) => bitmap,
            Err(err) => {
                self.notify(Notice::error(format!("Could not crop the image: {err}")));
                let _ = self.cancel_crop();
                return Err(err.into());
            }
        };

        let area = job.canvas_rect;
        let mut cropped = SceneObject::image(bitmap, area.x0, area.y0);
        cropped.geometry.scale_x = area.width() / cropped.geometry.width;
        cropped.geometry.scale_y = area.height() / cropped.geometry.height;
        if let Some(original) = self.scene.object(job.image) {
            cropped.paint = original.paint.clone();
            cropped.locked = original.locked;
        }
        let new_id = cropped.id;

        if let Some(session) = self.crop.take() {
            self.exit_crop(session);
        }
        match ReplaceObject::new(&self.scene, job.image, cropped) {
            Some(cmd) => {
                self.execute(Command::Replace(cmd));
                Ok(Some(new_id))
            }
            None => Ok(None),
        }
    }

    /// Prepare, load through `loader`, finish.
    pub async fn apply_crop<L: ImageLoader>(&mut self, loader: &L) -> Result<Option<ObjectId>, EditorError> {
        let job = self.prepare_crop()?;
        let pixels = loader.load(&job.src).await;
        self.finish_crop(job, pixels)
    }
}
