pub mod error;
pub mod hit;
pub mod qr;
pub mod raster;

pub use error::RenderError;
pub use hit::{hit_test, hit_test_rect, hits};
pub use qr::{EncodedBitmap, QrStyle, encode_qr, render_qr};
pub use raster::{PixelRect, canvas_to_source, crop_pixels, decode_data_uri, encode_png_data_uri};
