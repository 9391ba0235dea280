/// A SQL type a JSON-extracted value is converted to before comparison.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Cast {
    Int,
    BigInt,
    Float,
    Decimal,
    Uuid,
    DateTime,
}
