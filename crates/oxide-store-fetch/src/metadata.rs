//! Class and member metadata consumed by fetch compilation.
//!
//! Each class maps to one table. A subclass table holds only the members
//! the subclass declares and repeats the identity columns of its root
//! class under the same names, so tables of one inheritance chain join on
//! identity.

use std::collections::BTreeMap;

use crate::error::{FetchError, Result};

/// How objects of a class hierarchy are identified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityStrategy {
    /// A datastore-managed surrogate column.
    Surrogate {
        /// Column name.
        column: String,
        /// Logical type of the column.
        logical_type: String,
    },
    /// Primary-key members, in key declaration order.
    Application {
        /// Member numbers.
        members: Vec<usize>,
    },
}

/// Optimistic version column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionMapping {
    pub column: String,
    pub logical_type: String,
    /// Member holding the version, when it is a class field rather than a
    /// surrogate column.
    pub member: Option<usize>,
}

/// Multitenancy discriminator column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenancyMapping {
    pub column: String,
    /// Tenants visible to every caller, when known up front. Otherwise the
    /// tenant is bound per execution.
    pub allowed: Option<Vec<String>>,
}

/// Soft-delete flag column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoftDeleteMapping {
    pub column: String,
}

/// The table backing one class, with its surrogate columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableMapping {
    pub name: String,
    pub version: Option<VersionMapping>,
    pub tenancy: Option<TenancyMapping>,
    pub soft_delete: Option<SoftDeleteMapping>,
    /// Column naming the concrete class of a row.
    pub discriminator: Option<String>,
}

impl TableMapping {
    /// A table without surrogate columns.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
            tenancy: None,
            soft_delete: None,
            discriminator: None,
        }
    }

    #[must_use]
    pub fn with_version(mut self, version: VersionMapping) -> Self {
        self.version = Some(version);
        self
    }

    #[must_use]
    pub fn with_tenancy(mut self, tenancy: TenancyMapping) -> Self {
        self.tenancy = Some(tenancy);
        self
    }

    #[must_use]
    pub fn with_soft_delete(mut self, column: impl Into<String>) -> Self {
        self.soft_delete = Some(SoftDeleteMapping {
            column: column.into(),
        });
        self
    }

    #[must_use]
    pub fn with_discriminator(mut self, column: impl Into<String>) -> Self {
        self.discriminator = Some(column.into());
        self
    }
}

/// Storage of a map-valued member in a join table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapStorage {
    pub join_table: String,
    pub owner_column: String,
    pub key_column: String,
    pub value_column: Option<String>,
}

/// What a member holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberKind {
    /// A single column value.
    Scalar,
    /// A reference to another object through foreign-key columns.
    Relation {
        /// Target class name.
        target: String,
    },
    /// A map kept in a join table; loaded after the row.
    Map(MapStorage),
}

/// One persistent member of a class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberMapping {
    /// Absolute member number within the class hierarchy.
    pub number: usize,
    pub name: String,
    /// Columns in the declaring class's table. Relations list their
    /// foreign-key columns in the target's identity order.
    pub columns: Vec<String>,
    pub logical_type: String,
    pub kind: MemberKind,
    /// Configured recursion depth; `Some(0)` reads only the foreign key.
    pub recursion_depth: Option<u32>,
}

impl MemberMapping {
    /// A single-column scalar member.
    #[must_use]
    pub fn scalar(
        number: usize,
        name: impl Into<String>,
        column: impl Into<String>,
        logical_type: &str,
    ) -> Self {
        Self {
            number,
            name: name.into(),
            columns: vec![column.into()],
            logical_type: logical_type.to_string(),
            kind: MemberKind::Scalar,
            recursion_depth: None,
        }
    }

    /// A relation member stored in `columns`.
    #[must_use]
    pub fn relation(
        number: usize,
        name: impl Into<String>,
        columns: Vec<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            number,
            name: name.into(),
            columns,
            logical_type: String::from("object"),
            kind: MemberKind::Relation {
                target: target.into(),
            },
            recursion_depth: None,
        }
    }

    /// A map member stored in a join table.
    #[must_use]
    pub fn map(number: usize, name: impl Into<String>, storage: MapStorage) -> Self {
        Self {
            number,
            name: name.into(),
            columns: Vec::new(),
            logical_type: String::from("map"),
            kind: MemberKind::Map(storage),
            recursion_depth: None,
        }
    }

    /// Limits how deep this member is loaded.
    #[must_use]
    pub const fn with_recursion_depth(mut self, depth: u32) -> Self {
        self.recursion_depth = Some(depth);
        self
    }

    /// Target class of a relation.
    #[must_use]
    pub fn target(&self) -> Option<&str> {
        match &self.kind {
            MemberKind::Relation { target } => Some(target),
            _ => None,
        }
    }
}

/// Metadata of one class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassMapping {
    pub name: String,
    pub table: TableMapping,
    pub superclass: Option<String>,
    pub is_abstract: bool,
    /// Identity; `None` inherits the superclass identity.
    pub identity: Option<IdentityStrategy>,
    /// Members declared by this class.
    pub members: Vec<MemberMapping>,
}

impl ClassMapping {
    /// A concrete root class.
    #[must_use]
    pub fn new(name: impl Into<String>, table: TableMapping, identity: IdentityStrategy) -> Self {
        Self {
            name: name.into(),
            table,
            superclass: None,
            is_abstract: false,
            identity: Some(identity),
            members: Vec::new(),
        }
    }

    /// A concrete subclass of `superclass`.
    #[must_use]
    pub fn subclass(
        name: impl Into<String>,
        table: TableMapping,
        superclass: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            table,
            superclass: Some(superclass.into()),
            is_abstract: false,
            identity: None,
            members: Vec::new(),
        }
    }

    #[must_use]
    pub const fn abstract_class(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    #[must_use]
    pub fn member(mut self, member: MemberMapping) -> Self {
        self.members.push(member);
        self
    }

    /// Returns a member declared by this class.
    #[must_use]
    pub fn declared(&self, number: usize) -> Option<&MemberMapping> {
        self.members.iter().find(|m| m.number == number)
    }
}

/// All known classes, by name.
#[derive(Debug, Clone, Default)]
pub struct MetadataCatalog {
    classes: BTreeMap<String, ClassMapping>,
}

impl MetadataCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a class, replacing any previous registration.
    pub fn add(&mut self, class: ClassMapping) {
        self.classes.insert(class.name.clone(), class);
    }

    /// Looks up a class.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Metadata`] for an unknown class.
    pub fn class(&self, name: &str) -> Result<&ClassMapping> {
        self.classes
            .get(name)
            .ok_or_else(|| FetchError::Metadata(format!("unknown class '{name}'")))
    }

    /// The class followed by its superclasses, root last.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Metadata`] for unknown classes and cycles.
    pub fn chain(&self, name: &str) -> Result<Vec<&ClassMapping>> {
        let mut chain = vec![self.class(name)?];
        while let Some(parent) = chain.last().and_then(|c| c.superclass.as_deref()) {
            if chain.iter().any(|c| c.name == parent) {
                return Err(FetchError::Metadata(format!(
                    "inheritance cycle through '{parent}'"
                )));
            }
            chain.push(self.class(parent)?);
        }
        Ok(chain)
    }

    /// Identity of a class, inherited from the nearest ancestor declaring
    /// one.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Metadata`] when no class in the chain declares
    /// an identity.
    pub fn identity(&self, name: &str) -> Result<&IdentityStrategy> {
        self.chain(name)?
            .into_iter()
            .find_map(|c| c.identity.as_ref())
            .ok_or_else(|| FetchError::Metadata(format!("class '{name}' has no identity")))
    }

    /// Returns whether any registered class extends `name`.
    #[must_use]
    pub fn has_subclasses(&self, name: &str) -> bool {
        self.classes
            .values()
            .any(|c| c.superclass.as_deref() == Some(name))
    }

    /// Finds a member anywhere in the chain of `name`, with the index of
    /// its declaring class in [`Self::chain`].
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Metadata`] for unknown classes or members.
    pub fn member(&self, name: &str, number: usize) -> Result<(usize, &MemberMapping)> {
        self.chain(name)?
            .into_iter()
            .enumerate()
            .find_map(|(depth, class)| class.declared(number).map(|m| (depth, m)))
            .ok_or_else(|| FetchError::Metadata(format!("class '{name}' has no member {number}")))
    }

    /// Identity columns of a class as `(member, column index, column,
    /// logical type)`. Surrogate identities report no member.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Metadata`] when the identity or one of its
    /// members cannot be resolved.
    pub fn identity_columns(&self, name: &str) -> Result<Vec<IdentityColumn>> {
        match self.identity(name)? {
            IdentityStrategy::Surrogate {
                column,
                logical_type,
            } => Ok(vec![IdentityColumn {
                member: None,
                position: 0,
                column: column.clone(),
                logical_type: logical_type.clone(),
            }]),
            IdentityStrategy::Application { members } => {
                let mut columns = Vec::new();
                for number in members {
                    let (_, member) = self.member(name, *number)?;
                    if member.columns.is_empty() {
                        return Err(FetchError::Metadata(format!(
                            "primary-key member '{}' of '{name}' has no columns",
                            member.name
                        )));
                    }
                    for (position, column) in member.columns.iter().enumerate() {
                        columns.push(IdentityColumn {
                            member: Some(*number),
                            position,
                            column: column.clone(),
                            logical_type: member.logical_type.clone(),
                        });
                    }
                }
                Ok(columns)
            }
        }
    }
}

/// One identity column of a class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityColumn {
    /// Primary-key member, for application identity.
    pub member: Option<usize>,
    /// Index of the column within its member.
    pub position: usize,
    pub column: String,
    pub logical_type: String,
}
