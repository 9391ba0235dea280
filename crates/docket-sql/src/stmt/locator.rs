use super::{Cast, JsonPath};

/// Where a member's value lives in the row, and how it is converted before
/// being compared.
#[derive(Debug, Clone, PartialEq)]
pub struct Locator {
    pub source: Source,
    pub conversion: Conversion,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    /// A table column, such as `id`.
    Column(&'static str),

    /// A value extracted from the `data` payload.
    Json(JsonPath),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Conversion {
    None,
    Cast(Cast),

    /// Booleans are compared as the JSON literals `true` / `false`.
    BoolText,
}

impl Locator {
    pub fn column(name: &'static str) -> Locator {
        Locator {
            source: Source::Column(name),
            conversion: Conversion::None,
        }
    }

    pub fn json(path: JsonPath) -> Locator {
        Locator {
            source: Source::Json(path),
            conversion: Conversion::None,
        }
    }

    pub fn with_cast(self, cast: Cast) -> Locator {
        Locator {
            conversion: Conversion::Cast(cast),
            ..self
        }
    }

    pub fn with_conversion(self, conversion: Conversion) -> Locator {
        Locator { conversion, ..self }
    }

    /// The same location without any conversion, for null checks and text
    /// pattern matching.
    pub fn raw(&self) -> Locator {
        Locator {
            source: self.source.clone(),
            conversion: Conversion::None,
        }
    }

    pub fn is_column(&self) -> bool {
        matches!(self.source, Source::Column(_))
    }
}
