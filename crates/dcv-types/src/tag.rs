use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// A `(group, element)` pair identifying an attribute in a dataset.
///
/// The text form accepted by [`FromStr`] is `"GGGG,EEEE"`: two hexadecimal
/// fields separated by a single comma. Each field must fit in 16 bits; it
/// does not have to be zero-padded. No `0x` prefix, sign or surrounding
/// whitespace is accepted.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Tag {
    pub group: u16,
    pub element: u16,
}

impl Tag {
    pub const fn new(group: u16, element: u16) -> Self {
        Self { group, element }
    }
}

fn parse_field(input: &str, field: &str, name: &str) -> Result<u16, TypeError> {
    let invalid = |reason: String| TypeError::InvalidTag {
        input: input.to_string(),
        reason,
    };
    if field.is_empty() {
        return Err(invalid(format!("empty {name} number")));
    }
    // from_str_radix would accept a leading '+'
    if !field.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid(format!("invalid {name} number {field:?}")));
    }
    u16::from_str_radix(field, 16)
        .map_err(|_| invalid(format!("{name} number {field:?} does not fit in 16 bits")))
}

impl FromStr for Tag {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.split(',').collect();
        if fields.len() != 2 {
            return Err(TypeError::InvalidTag {
                input: s.to_string(),
                reason: format!("expected 2 comma-separated fields, got {}", fields.len()),
            });
        }
        let group = parse_field(s, fields[0], "group")?;
        let element = parse_field(s, fields[1], "element")?;
        Ok(Self { group, element })
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tag({:04X},{:04X})", self.group, self.element)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:04X},{:04X})", self.group, self.element)
    }
}

impl From<(u16, u16)> for Tag {
    fn from((group, element): (u16, u16)) -> Self {
        Self { group, element }
    }
}
