use std::fmt::Display;

use dcv_types::Tag;

use crate::dataset::Dataset;

/// Byte payloads longer than this render as a length summary.
const MAX_HEX_RENDER: usize = 64;

/// The typed value of a dataset element.
///
/// Multi-valued attributes keep every value; single-valued ones hold a
/// one-element vector.
#[derive(Clone, Debug, PartialEq)]
pub enum ElementValue {
    /// Zero-length value.
    Empty,
    /// Character strings (AE, CS, DA, DS, IS, LO, PN, SH, UI, ...).
    Text(Vec<String>),
    /// Unsigned binary integers (US, UL, UV).
    Unsigned(Vec<u64>),
    /// Signed binary integers (SS, SL, SV).
    Signed(Vec<i64>),
    /// Binary floating point (FL, FD).
    Float(Vec<f64>),
    /// Raw bytes (OB, OW, UN, ...), little-endian for word-sized VRs.
    Bytes(Vec<u8>),
    /// Encapsulated pixel data fragments.
    Fragments(Vec<Vec<u8>>),
    /// Sequence items.
    Sequence(Vec<Dataset>),
}

fn join<T: Display>(values: &[T]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\\")
}

impl ElementValue {
    /// Render the value as display text.
    ///
    /// Multiple values are joined with `\`, the DICOM value separator. Short
    /// byte payloads render as space-separated hex; long ones, fragments and
    /// sequences render as a count. The output is deterministic for a given
    /// value.
    pub fn to_text(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Text(values) => values.join("\\"),
            Self::Unsigned(values) => join(values),
            Self::Signed(values) => join(values),
            Self::Float(values) => join(values),
            Self::Bytes(bytes) if bytes.len() <= MAX_HEX_RENDER => bytes
                .iter()
                .map(|b| format!("{b:02x}"))
                .collect::<Vec<_>>()
                .join(" "),
            Self::Bytes(bytes) => format!("<{} bytes>", bytes.len()),
            Self::Fragments(fragments) => format!("<{} fragments>", fragments.len()),
            Self::Sequence(items) => format!("<{} items>", items.len()),
        }
    }

    /// The first value as an integer, if this is an integer-typed value.
    pub fn first_integer(&self) -> Option<i64> {
        match self {
            Self::Unsigned(values) => values.first().and_then(|&v| i64::try_from(v).ok()),
            Self::Signed(values) => values.first().copied(),
            _ => None,
        }
    }

    /// The first string value, if this is a text value.
    pub fn first_text(&self) -> Option<&str> {
        match self {
            Self::Text(values) => values.first().map(String::as_str),
            _ => None,
        }
    }

    /// The byte payload, if this is a byte value.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }
}

/// A dataset element: tag, value representation, and value.
#[derive(Clone, Debug, PartialEq)]
pub struct Element {
    pub tag: Tag,
    /// Two-letter value representation code, e.g. `"US"`.
    pub vr: String,
    pub value: ElementValue,
}

impl Element {
    pub fn new(tag: Tag, vr: impl Into<String>, value: ElementValue) -> Self {
        Self {
            tag,
            vr: vr.into(),
            value,
        }
    }

    /// Shorthand for [`ElementValue::to_text`].
    pub fn to_text(&self) -> String {
        self.value.to_text()
    }
}
