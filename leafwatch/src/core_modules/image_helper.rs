// THEORY:
// Image I/O sits at the edge of the scoring core. Everything downstream works on a
// `Frame` of a fixed size, so this module is the only place that knows about files,
// codecs and resampling. Loading always produces a 256×256 RGB frame no matter what
// the source looked like; encoding turns that same normalized frame back into a
// JPEG for the remote vision models, which only ever see what the heuristics saw.

pub mod image_helper {
    use crate::core_modules::frame::frame::Frame;
    use crate::error::{LeafwatchError, Result};
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use image::ImageEncoder;
    use image::imageops::FilterType;
    use std::io::Cursor;
    use std::path::Path;
    use tracing::debug;

    /// Side length of every normalized frame.
    pub const NORMALIZED_SIZE: u32 = 256;
    const JPEG_QUALITY: u8 = 85;

    /// Opens `path`, converts it to RGB, and resizes it to `NORMALIZED_SIZE` square.
    pub fn load_frame(path: &Path) -> Result<Frame> {
        if !path.is_file() {
            return Err(LeafwatchError::ImageNotFound(path.to_path_buf()));
        }
        let decoded = image::open(path).map_err(|source| LeafwatchError::ImageDecode {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(
            path = %path.display(),
            width = decoded.width(),
            height = decoded.height(),
            "decoded image"
        );
        Ok(normalize(&decoded))
    }

    /// Converts any decoded image into a normalized frame.
    pub fn normalize(image: &image::DynamicImage) -> Frame {
        let rgb = image.to_rgb8();
        let resized = if rgb.width() == NORMALIZED_SIZE && rgb.height() == NORMALIZED_SIZE {
            rgb
        } else {
            image::imageops::resize(&rgb, NORMALIZED_SIZE, NORMALIZED_SIZE, FilterType::CatmullRom)
        };
        Frame::from_rgb_image(&resized)
    }

    /// Encodes the frame as JPEG bytes.
    pub fn encode_jpeg(frame: &Frame) -> Result<Vec<u8>> {
        let rgb = frame.to_rgb_image();
        let mut buffer = Cursor::new(Vec::new());
        let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buffer, JPEG_QUALITY);
        encoder
            .write_image(rgb.as_raw(), rgb.width(), rgb.height(), image::ExtendedColorType::Rgb8)
            .map_err(LeafwatchError::ImageEncode)?;
        Ok(buffer.into_inner())
    }

    /// Encodes the frame as base64 JPEG, the form both remote backends accept.
    pub fn encode_jpeg_base64(frame: &Frame) -> Result<String> {
        Ok(STANDARD.encode(encode_jpeg(frame)?))
    }
}
