use std::fmt;

/// A JSON path into the document payload, such as `$.address.city`.
///
/// Segments are stored already converted to the payload's field casing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonPath {
    segments: Vec<String>,
}

impl JsonPath {
    pub fn new(segments: Vec<String>) -> JsonPath {
        JsonPath { segments }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }
}

fn is_plain(segment: &str) -> bool {
    !segment.is_empty()
        && !segment.starts_with(|c: char| c.is_ascii_digit())
        && segment.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl fmt::Display for JsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("$")?;
        for segment in &self.segments {
            if is_plain(segment) {
                write!(f, ".{segment}")?;
            } else {
                write!(f, ".\"{}\"", segment.replace('"', "\\\""))?;
            }
        }
        Ok(())
    }
}
