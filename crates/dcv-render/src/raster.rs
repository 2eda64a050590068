use dcv_dataset::{tags, Dataset, ElementValue};
use dcv_types::Tag;
use tracing::debug;

use crate::error::{RenderError, RenderResult};

/// A row-major grid of 8-bit grayscale samples.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Raster {
    columns: u32,
    rows: u32,
    samples: Vec<u8>,
}

impl Raster {
    pub fn columns(&self) -> u32 {
        self.columns
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// All samples, row by row; exactly `columns * rows` bytes.
    pub fn samples(&self) -> &[u8] {
        &self.samples
    }

    /// The sample at column `x`, row `y`.
    pub fn sample(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.columns || y >= self.rows {
            return None;
        }
        let index = y as usize * self.columns as usize + x as usize;
        self.samples.get(index).copied()
    }
}

impl From<&Raster> for image::GrayImage {
    fn from(raster: &Raster) -> Self {
        // `samples` is exactly `columns * rows` long
        let width = raster.columns as usize;
        image::GrayImage::from_fn(raster.columns, raster.rows, |x, y| {
            image::Luma([raster.samples[y as usize * width + x as usize]])
        })
    }
}

/// Build a [`Raster`] from a dataset's pixel data and image attributes.
///
/// Checks run in a fixed order: pixel data present, Rows and Columns
/// present, dimensions positive, pixel format supported, enough pixel
/// bytes. Bytes beyond `rows * columns` are ignored.
pub fn extract_raster(dataset: &Dataset) -> RenderResult<Raster> {
    let pixels = pixel_bytes(dataset)?;

    let rows = dimension(dataset, tags::ROWS)?;
    let columns = dimension(dataset, tags::COLUMNS)?;
    let (rows, columns) = match (u32::try_from(rows), u32::try_from(columns)) {
        (Ok(r), Ok(c)) if r > 0 && c > 0 => (r, c),
        _ => return Err(RenderError::InvalidDimensions { rows, columns }),
    };

    check_pixel_format(dataset)?;

    let expected = (rows as usize)
        .checked_mul(columns as usize)
        .ok_or(RenderError::InvalidDimensions {
            rows: rows.into(),
            columns: columns.into(),
        })?;
    if pixels.len() < expected {
        return Err(RenderError::PixelDataTooShort {
            expected,
            actual: pixels.len(),
        });
    }

    debug!(rows, columns, bytes = pixels.len(), "raster extracted");
    Ok(Raster {
        columns,
        rows,
        samples: pixels[..expected].to_vec(),
    })
}

fn pixel_bytes(dataset: &Dataset) -> RenderResult<&[u8]> {
    let element = dataset
        .get(tags::PIXEL_DATA)
        .ok_or(RenderError::MissingPixelData)?;
    match &element.value {
        ElementValue::Bytes(bytes) if !bytes.is_empty() => Ok(bytes),
        ElementValue::Fragments(_) => Err(RenderError::UnsupportedPixelFormat(
            "encapsulated (compressed) pixel data".into(),
        )),
        _ => Err(RenderError::MissingPixelData),
    }
}

fn dimension(dataset: &Dataset, tag: Tag) -> RenderResult<i64> {
    dataset
        .get(tag)
        .and_then(|element| element.value.first_integer())
        .ok_or(RenderError::MissingDimensions(tag))
}

/// Absent attributes count as the 8-bit unsigned single-channel default.
fn check_pixel_format(dataset: &Dataset) -> RenderResult<()> {
    let integer = |tag| dataset.get(tag).and_then(|e| e.value.first_integer());
    let unsupported = |what: String| Err(RenderError::UnsupportedPixelFormat(what));

    if let Some(samples) = integer(tags::SAMPLES_PER_PIXEL).filter(|&n| n != 1) {
        return unsupported(format!("{samples} samples per pixel"));
    }
    if let Some(bits) = integer(tags::BITS_ALLOCATED).filter(|&n| n != 8) {
        return unsupported(format!("{bits} bits allocated"));
    }
    if integer(tags::PIXEL_REPRESENTATION).is_some_and(|n| n != 0) {
        return unsupported("signed pixel representation".into());
    }
    if let Some(photometric) = dataset
        .get(tags::PHOTOMETRIC_INTERPRETATION)
        .and_then(|e| e.value.first_text())
    {
        if !matches!(photometric, "MONOCHROME1" | "MONOCHROME2") {
            return unsupported(format!("photometric interpretation {photometric}"));
        }
    }
    Ok(())
}
