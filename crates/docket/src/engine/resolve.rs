use crate::db::{EnumStorage, Options};

use docket_core::{
    schema::{column, DocumentMapping},
    stmt::{ExprMember, Segment, Type, Value},
    Error, Result,
};
use docket_sql::stmt::{Cast, Conversion, JsonPath, Locator};

/// A document member resolved against its mapping.
///
/// The raw locator reads the stored value as-is and backs null checks. The
/// typed locator applies the conversion comparisons need, and
/// [`Member::to_param`] turns a host value into the matching parameter.
#[derive(Debug, Clone)]
pub struct Member {
    raw: Locator,
    typed: Locator,
    scalar: Scalar,
    path: Option<JsonPath>,

    /// Set for array members.
    element: Option<Scalar>,
}

/// How one stored scalar compares.
#[derive(Debug, Clone)]
pub(crate) struct Scalar {
    ty: Type,
    storage: Storage,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Storage {
    /// The `id` column.
    Identity,

    /// JSON `true` / `false`, compared as text.
    Bool,

    EnumAsInteger,
    EnumAsString,
    Plain,
}

impl Member {
    pub(crate) fn resolve(
        member: &ExprMember,
        mapping: &DocumentMapping,
        options: &Options,
    ) -> Result<Member> {
        let mut names = Vec::with_capacity(member.segments.len());

        for segment in &member.segments {
            match segment {
                Segment::Field(name) => names.push(name.as_str()),
                Segment::Index(index) => {
                    return Err(Error::unsupported_expression(format!(
                        "indexed member access `[{index}]`"
                    )))
                }
            }
        }

        if names.is_empty() {
            return Err(Error::unsupported_expression("member access with an empty path"));
        }

        if names[..] == [mapping.id_member.as_str()] {
            let id = Locator::column(column::ID);
            return Ok(Member {
                raw: id.clone(),
                typed: id,
                scalar: Scalar {
                    ty: member.ty.clone(),
                    storage: Storage::Identity,
                },
                path: None,
                element: None,
            });
        }

        let path = JsonPath::new(
            names
                .iter()
                .map(|name| options.casing.apply(name))
                .collect(),
        );
        let scalar = Scalar::new(&member.ty, options.enum_storage);
        let element = match &member.ty {
            Type::List(item) => Some(Scalar::new(item, options.enum_storage)),
            _ => None,
        };
        let raw = Locator::json(path.clone());

        Ok(Member {
            typed: raw.clone().with_conversion(scalar.conversion()),
            raw,
            scalar,
            path: Some(path),
            element,
        })
    }

    /// The stored value without conversion.
    pub fn raw(&self) -> &Locator {
        &self.raw
    }

    /// The stored value converted for comparison against parameters.
    pub fn typed(&self) -> &Locator {
        &self.typed
    }

    pub fn ty(&self) -> &Type {
        &self.scalar.ty
    }

    /// The JSON path, `None` for the identity member.
    pub fn path(&self) -> Option<&JsonPath> {
        self.path.as_ref()
    }

    pub fn is_identity(&self) -> bool {
        self.scalar.storage == Storage::Identity
    }

    /// Converts a host value into the parameter compared against
    /// [`Member::typed`].
    pub fn to_param(&self, value: Value) -> Result<Value> {
        self.scalar.to_param(value)
    }

    pub(crate) fn element(&self) -> Option<&Scalar> {
        self.element.as_ref()
    }
}

impl Scalar {
    fn new(ty: &Type, enum_storage: EnumStorage) -> Scalar {
        let storage = match (ty, enum_storage) {
            (Type::Bool, _) => Storage::Bool,
            (Type::Enum, EnumStorage::AsInteger) => Storage::EnumAsInteger,
            (Type::Enum, EnumStorage::AsString) => Storage::EnumAsString,
            _ => Storage::Plain,
        };

        Scalar {
            ty: ty.clone(),
            storage,
        }
    }

    pub(crate) fn conversion(&self) -> Conversion {
        match self.storage {
            Storage::Identity | Storage::EnumAsString => Conversion::None,
            Storage::Bool => Conversion::BoolText,
            Storage::EnumAsInteger => Conversion::Cast(Cast::BigInt),
            Storage::Plain => match self.ty {
                Type::I32 => Conversion::Cast(Cast::Int),
                Type::I64 => Conversion::Cast(Cast::BigInt),
                Type::F64 => Conversion::Cast(Cast::Float),
                Type::Decimal => Conversion::Cast(Cast::Decimal),
                Type::Uuid => Conversion::Cast(Cast::Uuid),
                Type::DateTime => Conversion::Cast(Cast::DateTime),
                _ => Conversion::None,
            },
        }
    }

    pub(crate) fn to_param(&self, value: Value) -> Result<Value> {
        match (self.storage, value) {
            (_, Value::Null) => Ok(Value::Null),
            (Storage::Bool, Value::Bool(value)) => {
                Ok(Value::String(if value { "true" } else { "false" }.into()))
            }
            (Storage::Bool, value) => Err(Error::type_conversion(value, "bool")),
            (Storage::EnumAsInteger, Value::Enum(value)) => Ok(Value::I64(value.discriminant)),
            (Storage::EnumAsString, Value::Enum(value)) => {
                Ok(Value::String(value.name.into_owned()))
            }
            (_, value) => self.ty.cast(value),
        }
    }
}
