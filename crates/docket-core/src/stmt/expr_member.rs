use super::{Expr, Type};

/// A property access chain rooted at the queried document.
///
/// Segments hold the Rust field names; the member resolver converts them
/// through the store's casing when it builds a JSON path.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprMember {
    pub segments: Vec<Segment>,

    /// Type of the value at the end of the chain, nullability stripped.
    pub ty: Type,

    pub nullable: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    Field(String),
    Index(usize),
}

impl ExprMember {
    pub fn new(segments: Vec<Segment>, ty: Type, nullable: bool) -> ExprMember {
        ExprMember {
            segments,
            ty,
            nullable,
        }
    }

    pub fn field(name: impl Into<String>, ty: Type) -> ExprMember {
        ExprMember::new(vec![Segment::Field(name.into())], ty, false)
    }

    /// Appends a segment, producing the path to a nested property.
    pub fn push(&self, segment: Segment, ty: Type, nullable: bool) -> ExprMember {
        let mut segments = self.segments.clone();
        segments.push(segment);
        ExprMember::new(segments, ty, nullable)
    }

    /// Returns the single field name when the chain is exactly one field long.
    pub fn as_top_level_field(&self) -> Option<&str> {
        match &self.segments[..] {
            [Segment::Field(name)] => Some(name),
            _ => None,
        }
    }
}

impl From<ExprMember> for Expr {
    fn from(value: ExprMember) -> Self {
        Self::Member(value)
    }
}
