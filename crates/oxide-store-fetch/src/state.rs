//! The object side of a fetch: identity in, field values out.

use core::fmt;

use oxide_store_core::SqlValue;

use crate::error::Result;

/// Identity of a referenced object.
#[derive(Debug, Clone, PartialEq)]
pub enum IdentityValue {
    /// Single surrogate value.
    Surrogate(SqlValue),
    /// Primary-key column values in key order.
    Compound(Vec<SqlValue>),
}

impl IdentityValue {
    /// Builds an identity from the identity columns of a row; `None` when
    /// every column is NULL.
    #[must_use]
    pub fn from_columns(values: Vec<SqlValue>, surrogate: bool) -> Option<Self> {
        if values.iter().all(SqlValue::is_null) {
            return None;
        }
        match (surrogate, values.len()) {
            (true, 1) => values.into_iter().next().map(Self::Surrogate),
            _ => Some(Self::Compound(values)),
        }
    }
}

impl fmt::Display for IdentityValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Surrogate(value) => write!(f, "{value}"),
            Self::Compound(values) => {
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{value}")?;
                }
                Ok(())
            }
        }
    }
}

/// A lazily resolvable reference to another object.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectReference {
    pub class: String,
    pub identity: IdentityValue,
}

/// A related object read from the same row as its owner.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedObject {
    pub reference: ObjectReference,
    /// Discriminator value, when the target table has one.
    pub discriminator: Option<SqlValue>,
    /// Scalar members of the related object by member number.
    pub fields: Vec<(usize, SqlValue)>,
}

/// A value handed to [`ObjectState::replace_field`].
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Scalar(SqlValue),
    Reference(ObjectReference),
    Object(LoadedObject),
}

/// The managed object a fetch reads into.
///
/// Implementations are called in a fixed order per fetch: the version
/// first, then requested fields in member order, then store-only
/// references, then deferred members.
pub trait ObjectState: Send {
    /// Identity column values in identity order.
    fn identity_values(&self) -> Vec<SqlValue>;

    /// Version already known for the object.
    fn cached_version(&self) -> Option<&SqlValue>;

    fn set_version(&mut self, version: SqlValue);

    /// Replaces a member with a value read from the datastore.
    fn replace_field(&mut self, member: usize, value: FieldValue);

    /// Caches the identity of a related object without loading it;
    /// `None` clears the member.
    fn store_reference(&mut self, member: usize, reference: Option<ObjectReference>);

    /// Loads a member that is not read from the fetch row.
    ///
    /// # Errors
    ///
    /// Implementation specific; aborts the fetch.
    fn load_deferred(&mut self, member: usize) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_from_columns() {
        assert_eq!(
            IdentityValue::from_columns(vec![SqlValue::Int(4)], true),
            Some(IdentityValue::Surrogate(SqlValue::Int(4)))
        );
        assert_eq!(IdentityValue::from_columns(vec![SqlValue::Null], true), None);
        let compound =
            IdentityValue::from_columns(vec![SqlValue::Int(1), SqlValue::Null], false).unwrap();
        assert_eq!(compound.to_string(), "1, null");
    }
}
