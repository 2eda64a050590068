use image::codecs::png::PngEncoder;
use image::GrayImage;

use crate::error::RenderResult;
use crate::raster::Raster;

/// Encode a raster as an 8-bit grayscale PNG.
///
/// Width is the column count and height the row count. The encoder writes
/// no timestamp chunks, so equal rasters encode to equal bytes.
pub fn encode_png(raster: &Raster) -> RenderResult<Vec<u8>> {
    let image = GrayImage::from(raster);
    let mut out = Vec::new();
    image.write_with_encoder(PngEncoder::new(&mut out))?;
    Ok(out)
}
