//! Tag lookup by user-supplied reference text.

use dcv_types::Tag;

use crate::dataset::Dataset;
use crate::error::{DatasetError, DatasetResult};

/// Parse `"GGGG,EEEE"` into a [`Tag`].
///
/// Fails with [`DatasetError::InvalidTagFormat`] unless the text is exactly
/// two comma-separated hex fields that each fit in 16 bits.
pub fn parse_tag_reference(text: &str) -> DatasetResult<Tag> {
    text.parse::<Tag>()
        .map_err(|e| DatasetError::InvalidTagFormat(e.to_string()))
}

/// Look up `tag` and render its value as text.
pub fn resolve(dataset: &Dataset, tag: Tag) -> DatasetResult<String> {
    dataset
        .get(tag)
        .map(|element| element.to_text())
        .ok_or(DatasetError::TagNotFound(tag))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementValue;
    use crate::tags;

    fn sample() -> Dataset {
        Dataset::new()
            .with(tags::PATIENT_NAME, "PN", ElementValue::Text(vec!["Doe^Jane".into()]))
            .with(tags::ROWS, "US", ElementValue::Unsigned(vec![2]))
            .with(tags::PIXEL_DATA, "OB", ElementValue::Bytes(vec![0; 1024]))
    }

    #[test]
    fn parses_valid_references() {
        assert_eq!(parse_tag_reference("0010,0010").unwrap(), tags::PATIENT_NAME);
        assert_eq!(parse_tag_reference("7fe0,0010").unwrap(), tags::PIXEL_DATA);
    }

    #[test]
    fn malformed_references_are_invalid_format() {
        for text in ["abcd", "zzzz,0000", "0010", "1,2,3", "10000,0010", "", " 10,10"] {
            let err = parse_tag_reference(text).unwrap_err();
            assert!(
                matches!(err, DatasetError::InvalidTagFormat(_)),
                "{text:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn resolves_present_tags() {
        let ds = sample();
        assert_eq!(resolve(&ds, tags::PATIENT_NAME).unwrap(), "Doe^Jane");
        assert_eq!(resolve(&ds, tags::ROWS).unwrap(), "2");
        assert_eq!(resolve(&ds, tags::PIXEL_DATA).unwrap(), "<1024 bytes>");
    }

    #[test]
    fn absent_tag_is_not_found() {
        let err = resolve(&sample(), tags::COLUMNS).unwrap_err();
        assert_eq!(err, DatasetError::TagNotFound(tags::COLUMNS));
    }

    #[test]
    fn resolution_is_deterministic() {
        let ds = sample();
        assert_eq!(resolve(&ds, tags::ROWS).unwrap(), resolve(&ds, tags::ROWS).unwrap());
    }
}
