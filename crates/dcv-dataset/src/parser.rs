//! Turning stored bytes into a [`Dataset`].

use dcv_types::Tag;
use dicom_core::header::Header;
use dicom_core::value::PrimitiveValue;
use dicom_core::VR;
use dicom_object::mem::{InMemDicomObject, InMemElement};
use tracing::debug;

use crate::dataset::Dataset;
use crate::element::{Element, ElementValue};
use crate::error::{DatasetError, DatasetResult};
use crate::tags;

const PREAMBLE_LEN: usize = 128;
const MAGIC: &[u8; 4] = b"DICM";

/// Parses a complete stored file into a dataset.
///
/// Implementations are stateless; the vault calls `parse` once per request
/// and never caches the result.
pub trait DatasetParser: Send + Sync {
    fn parse(&self, bytes: &[u8]) -> DatasetResult<Dataset>;
}

/// DICOM Part 10 parser.
///
/// Accepts files with the 128-byte preamble and files that start directly
/// at the `DICM` magic code. The file meta information (transfer syntax,
/// SOP class and instance, implementation class) is exposed alongside the
/// main dataset under its group `0002` tags.
#[derive(Clone, Copy, Debug, Default)]
pub struct DicomParser;

impl DicomParser {
    pub fn new() -> Self {
        Self
    }
}

impl DatasetParser for DicomParser {
    fn parse(&self, bytes: &[u8]) -> DatasetResult<Dataset> {
        let start = magic_offset(bytes)?;
        let obj = dicom_object::from_reader(&bytes[start..])
            .map_err(|e| DatasetError::Parse(e.to_string()))?;

        let mut dataset = Dataset::new();
        let meta = obj.meta();
        for (tag, value) in [
            (tags::MEDIA_STORAGE_SOP_CLASS_UID, &meta.media_storage_sop_class_uid),
            (tags::MEDIA_STORAGE_SOP_INSTANCE_UID, &meta.media_storage_sop_instance_uid),
            (tags::TRANSFER_SYNTAX_UID, &meta.transfer_syntax),
            (tags::IMPLEMENTATION_CLASS_UID, &meta.implementation_class_uid),
        ] {
            let uid = trim_padding(value);
            if !uid.is_empty() {
                dataset.insert(Element::new(tag, "UI", ElementValue::Text(vec![uid.to_string()])));
            }
        }

        for elem in obj.into_inner() {
            dataset.insert(convert_element(&elem));
        }
        debug!(bytes = bytes.len(), elements = dataset.len(), "dataset parsed");
        Ok(dataset)
    }
}

fn magic_offset(bytes: &[u8]) -> DatasetResult<usize> {
    if bytes.len() >= PREAMBLE_LEN + MAGIC.len()
        && &bytes[PREAMBLE_LEN..PREAMBLE_LEN + MAGIC.len()] == MAGIC
    {
        Ok(PREAMBLE_LEN)
    } else if bytes.starts_with(MAGIC) {
        Ok(0)
    } else {
        Err(DatasetError::Parse("not a DICOM file: missing DICM magic code".into()))
    }
}

/// Strip the trailing space / NUL padding of even-length string values.
fn trim_padding(s: &str) -> &str {
    s.trim_end_matches(|c| c == ' ' || c == '\0')
}

fn convert_object(obj: &InMemDicomObject) -> Dataset {
    obj.iter().map(convert_element).collect()
}

fn convert_element(elem: &InMemElement) -> Element {
    let tag = elem.tag();
    let vr = elem.vr();
    let value = elem.value();

    let converted = if let Some(items) = value.items() {
        ElementValue::Sequence(items.iter().map(convert_object).collect())
    } else if let Some(fragments) = value.fragments() {
        ElementValue::Fragments(fragments.to_vec())
    } else if let Some(primitive) = value.primitive() {
        convert_primitive(vr, primitive)
    } else {
        ElementValue::Empty
    };

    Element::new(Tag::new(tag.group(), tag.element()), vr.to_string(), converted)
}

fn convert_primitive(vr: VR, value: &PrimitiveValue) -> ElementValue {
    if matches!(
        vr,
        VR::OB | VR::OW | VR::OF | VR::OD | VR::OL | VR::OV | VR::UN
    ) {
        return ElementValue::Bytes(value.to_bytes().into_owned());
    }

    match value {
        PrimitiveValue::Empty => ElementValue::Empty,
        PrimitiveValue::Str(s) => ElementValue::Text(vec![trim_padding(s).to_string()]),
        PrimitiveValue::Strs(values) => ElementValue::Text(
            values.iter().map(|s| trim_padding(s).to_string()).collect(),
        ),
        PrimitiveValue::U8(values) => ElementValue::Bytes(values.to_vec()),
        PrimitiveValue::U16(values) => ElementValue::Unsigned(values.iter().map(|&v| v.into()).collect()),
        PrimitiveValue::U32(values) => ElementValue::Unsigned(values.iter().map(|&v| v.into()).collect()),
        PrimitiveValue::U64(values) => ElementValue::Unsigned(values.to_vec()),
        PrimitiveValue::I16(values) => ElementValue::Signed(values.iter().map(|&v| v.into()).collect()),
        PrimitiveValue::I32(values) => ElementValue::Signed(values.iter().map(|&v| v.into()).collect()),
        PrimitiveValue::I64(values) => ElementValue::Signed(values.to_vec()),
        PrimitiveValue::F32(values) => ElementValue::Float(values.iter().map(|&v| v.into()).collect()),
        PrimitiveValue::F64(values) => ElementValue::Float(values.to_vec()),
        // tags, dates and times
        other => ElementValue::Text(vec![trim_padding(&other.to_str()).to_string()]),
    }
}
