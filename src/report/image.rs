use std::path::Path;

use lopdf::{dictionary, Stream};

use super::ReportError;

/// Decoded logo, ready to be embedded as an RGB image XObject
#[derive(Debug, Clone)]
pub struct LogoImage {
    pub width: u32,
    pub height: u32,
    rgb: Vec<u8>,
}

impl LogoImage {
    /// Decode a PNG or JPEG file. Transparent pixels are composited onto white.
    pub fn load(path: &Path) -> Result<Self, ReportError> {
        let decoded = image::open(path)?;
        Ok(Self::from_rgba(decoded.to_rgba8()))
    }

    pub fn from_memory(bytes: &[u8]) -> Result<Self, ReportError> {
        let decoded = image::load_from_memory(bytes)?;
        Ok(Self::from_rgba(decoded.to_rgba8()))
    }

    fn from_rgba(rgba: image::RgbaImage) -> Self {
        let (width, height) = rgba.dimensions();
        let mut rgb = Vec::with_capacity((width * height * 3) as usize);
        for pixel in rgba.pixels() {
            let [r, g, b, a] = pixel.0;
            let alpha = u16::from(a);
            for channel in [r, g, b] {
                let blended = (u16::from(channel) * alpha + 255 * (255 - alpha)) / 255;
                rgb.push(blended as u8);
            }
        }
        Self { width, height, rgb }
    }

    pub fn rgb(&self) -> &[u8] {
        &self.rgb
    }

    pub(crate) fn to_xobject(&self) -> Stream {
        Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => i64::from(self.width),
                "Height" => i64::from(self.height),
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8_i64,
            },
            self.rgb.clone(),
        )
    }
}
