//! Minimal DICOM Part 10 encoder for tests.
//!
//! Produces explicit VR little endian files with a single grayscale frame.
//! Only the handful of attributes the vault reads are written.

pub const SECONDARY_CAPTURE_IMAGE_STORAGE: &str = "1.2.840.10008.5.1.4.1.1.7";
pub const EXPLICIT_VR_LITTLE_ENDIAN: &str = "1.2.840.10008.1.2.1";
pub const SAMPLE_INSTANCE_UID: &str = "1.2.826.0.1.3680043.2.1125.1";
pub const SAMPLE_IMPLEMENTATION_UID: &str = "1.2.826.0.1.3680043.2.1125.99";

/// Builder for a single-frame grayscale DICOM file.
#[derive(Clone, Debug)]
pub struct SampleFile {
    rows: Option<u16>,
    columns: Option<u16>,
    pixels: Option<Vec<u8>>,
    bits_allocated: u16,
    samples_per_pixel: u16,
    photometric: String,
    patient_name: String,
}

impl SampleFile {
    /// An 8-bit `MONOCHROME2` image with the given pixel bytes.
    pub fn grayscale(rows: u16, columns: u16, pixels: Vec<u8>) -> Self {
        Self {
            rows: Some(rows),
            columns: Some(columns),
            pixels: Some(pixels),
            bits_allocated: 8,
            samples_per_pixel: 1,
            photometric: "MONOCHROME2".into(),
            patient_name: "Doe^Jane".into(),
        }
    }

    pub fn patient_name(mut self, name: &str) -> Self {
        self.patient_name = name.into();
        self
    }

    pub fn bits_allocated(mut self, bits: u16) -> Self {
        self.bits_allocated = bits;
        self
    }

    pub fn samples_per_pixel(mut self, samples: u16) -> Self {
        self.samples_per_pixel = samples;
        self
    }

    pub fn photometric(mut self, photometric: &str) -> Self {
        self.photometric = photometric.into();
        self
    }

    pub fn without_rows(mut self) -> Self {
        self.rows = None;
        self
    }

    pub fn without_pixel_data(mut self) -> Self {
        self.pixels = None;
        self
    }

    /// Encode as a Part 10 file: preamble, `DICM`, file meta group, dataset.
    pub fn encode(&self) -> Vec<u8> {
        let mut meta = Vec::new();
        put(&mut meta, 0x0002, 0x0001, b"OB", &[0x00, 0x01]);
        put(&mut meta, 0x0002, 0x0002, b"UI", &uid(SECONDARY_CAPTURE_IMAGE_STORAGE));
        put(&mut meta, 0x0002, 0x0003, b"UI", &uid(SAMPLE_INSTANCE_UID));
        put(&mut meta, 0x0002, 0x0010, b"UI", &uid(EXPLICIT_VR_LITTLE_ENDIAN));
        put(&mut meta, 0x0002, 0x0012, b"UI", &uid(SAMPLE_IMPLEMENTATION_UID));

        let mut out = vec![0u8; 128];
        out.extend_from_slice(b"DICM");
        put(&mut out, 0x0002, 0x0000, b"UL", &(meta.len() as u32).to_le_bytes());
        out.extend_from_slice(&meta);

        put(&mut out, 0x0008, 0x0016, b"UI", &uid(SECONDARY_CAPTURE_IMAGE_STORAGE));
        put(&mut out, 0x0008, 0x0018, b"UI", &uid(SAMPLE_INSTANCE_UID));
        put(&mut out, 0x0010, 0x0010, b"PN", &text(&self.patient_name));
        put(&mut out, 0x0028, 0x0002, b"US", &self.samples_per_pixel.to_le_bytes());
        put(&mut out, 0x0028, 0x0004, b"CS", &text(&self.photometric));
        if let Some(rows) = self.rows {
            put(&mut out, 0x0028, 0x0010, b"US", &rows.to_le_bytes());
        }
        if let Some(columns) = self.columns {
            put(&mut out, 0x0028, 0x0011, b"US", &columns.to_le_bytes());
        }
        let bits = self.bits_allocated;
        put(&mut out, 0x0028, 0x0100, b"US", &bits.to_le_bytes());
        put(&mut out, 0x0028, 0x0101, b"US", &bits.to_le_bytes());
        put(&mut out, 0x0028, 0x0102, b"US", &bits.saturating_sub(1).to_le_bytes());
        put(&mut out, 0x0028, 0x0103, b"US", &0u16.to_le_bytes());
        if let Some(pixels) = &self.pixels {
            let mut value = pixels.clone();
            if value.len() % 2 == 1 {
                value.push(0);
            }
            put(&mut out, 0x7FE0, 0x0010, b"OB", &value);
        }
        out
    }
}

/// Append one explicit VR little endian element.
fn put(out: &mut Vec<u8>, group: u16, element: u16, vr: &[u8; 2], value: &[u8]) {
    out.extend_from_slice(&group.to_le_bytes());
    out.extend_from_slice(&element.to_le_bytes());
    out.extend_from_slice(vr);
    match vr {
        b"OB" | b"OW" | b"OF" | b"SQ" | b"UN" | b"UT" => {
            out.extend_from_slice(&[0, 0]);
            out.extend_from_slice(&(value.len() as u32).to_le_bytes());
        }
        _ => out.extend_from_slice(&(value.len() as u16).to_le_bytes()),
    }
    out.extend_from_slice(value);
}

fn uid(value: &str) -> Vec<u8> {
    pad(value, 0)
}

fn text(value: &str) -> Vec<u8> {
    pad(value, b' ')
}

fn pad(value: &str, filler: u8) -> Vec<u8> {
    let mut bytes = value.as_bytes().to_vec();
    if bytes.len() % 2 == 1 {
        bytes.push(filler);
    }
    bytes
}
