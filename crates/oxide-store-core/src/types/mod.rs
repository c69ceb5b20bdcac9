//! Type Mapping Table.
//!
//! Each logical type (`i64`, `string`, `timestamp`, ...) maps to an
//! ordered list of SQL type candidates of which exactly one is the
//! default used for DDL. The table starts from a static per-vendor
//! registration and can be augmented once a live driver reports the
//! types it knows about. Learning never changes an existing default.

mod code;
mod normalize;
mod registry;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

pub use code::SqlTypeCode;
pub use normalize::normalize_driver_type;

use crate::dialect::{Vendor, Version};
use crate::error::{CoreError, Result};

/// Logical types understood by the registration.
pub const LOGICAL_TYPES: &[&str] = &[
    "bool",
    "i8",
    "i16",
    "i32",
    "i64",
    "f32",
    "f64",
    "decimal",
    "string",
    "char",
    "text",
    "bytes",
    "date",
    "time",
    "timestamp",
    "uuid",
    "json",
];

/// A concrete SQL type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlTypeInfo {
    /// Type name as written in DDL, without parameters.
    pub type_name: String,
    /// Generic type code.
    pub code: SqlTypeCode,
    /// Maximum precision (or length) the type accepts.
    pub max_precision: Option<u32>,
    /// Whether the type takes a `(length)` parameter.
    pub accepts_length: bool,
    /// Whether the type takes a `(precision, scale)` parameter pair.
    pub accepts_scale: bool,
    /// Length used when a column declares none.
    pub default_length: Option<u32>,
}

impl SqlTypeInfo {
    /// A type without parameters.
    #[must_use]
    pub fn fixed(type_name: impl Into<String>, code: SqlTypeCode) -> Self {
        Self {
            type_name: type_name.into(),
            code,
            max_precision: None,
            accepts_length: false,
            accepts_scale: false,
            default_length: None,
        }
    }

    /// A type with a length parameter.
    #[must_use]
    pub fn sized(type_name: impl Into<String>, code: SqlTypeCode, default_length: u32) -> Self {
        Self {
            accepts_length: true,
            default_length: Some(default_length),
            ..Self::fixed(type_name, code)
        }
    }

    /// A type with precision and scale.
    #[must_use]
    pub fn scaled(type_name: impl Into<String>, code: SqlTypeCode, max_precision: u32) -> Self {
        Self {
            max_precision: Some(max_precision),
            accepts_length: true,
            accepts_scale: true,
            default_length: Some(max_precision.min(19)),
            ..Self::fixed(type_name, code)
        }
    }

    /// Returns whether `name` designates this type (case-insensitive,
    /// parameters ignored).
    #[must_use]
    pub fn matches_name(&self, name: &str) -> bool {
        let name = name.trim();
        let base = name.split('(').next().unwrap_or(name).trim();
        self.type_name.eq_ignore_ascii_case(name) || self.type_name.eq_ignore_ascii_case(base)
    }

    /// Renders the type for a column with optional length and scale.
    #[must_use]
    pub fn render(&self, length: Option<u32>, scale: Option<u32>) -> String {
        if !self.accepts_length {
            return self.type_name.clone();
        }
        let length = match (length.or(self.default_length), self.max_precision) {
            (Some(len), Some(max)) => Some(len.min(max)),
            (len, _) => len,
        };
        match (length, self.accepts_scale) {
            (Some(len), true) => format!("{}({len},{})", self.type_name, scale.unwrap_or(0)),
            (Some(len), false) => format!("{}({len})", self.type_name),
            (None, _) => self.type_name.clone(),
        }
    }
}

/// One candidate SQL type for a logical type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeCandidate {
    /// The SQL type.
    pub info: SqlTypeInfo,
    /// Whether this is the default candidate.
    pub default: bool,
    /// Whether the candidate was learned from a driver.
    pub from_driver: bool,
}

/// All candidates of one logical type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeMappingEntry {
    /// Logical type name.
    pub logical_type: String,
    /// Ordered candidates; exactly one is the default.
    pub candidates: Vec<TypeCandidate>,
}

impl TypeMappingEntry {
    /// Returns the default candidate.
    #[must_use]
    pub fn default_candidate(&self) -> Option<&SqlTypeInfo> {
        self.candidates
            .iter()
            .find(|c| c.default)
            .map(|c| &c.info)
    }
}

/// A type as reported by a driver's type metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverTypeInfo {
    /// Type name reported by the driver.
    pub type_name: String,
    /// Numeric type code reported by the driver.
    pub code: i32,
    /// Maximum precision reported by the driver.
    pub precision: Option<u32>,
    /// Whether the type takes parameters, as reported (`"(M)"`, `"(M,D)"`).
    pub create_params: Option<String>,
}

/// Logical to SQL type mappings of one dialect profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeMappingTable {
    vendor: Vendor,
    entries: BTreeMap<String, TypeMappingEntry>,
    driver_types: BTreeMap<String, SqlTypeInfo>,
    version: u32,
}

impl TypeMappingTable {
    /// Builds the static registration of a vendor.
    #[must_use]
    pub fn for_vendor(vendor: Vendor, version: Version) -> Self {
        let entries = registry::registration(vendor, version)
            .into_iter()
            .map(|entry| (entry.logical_type.clone(), entry))
            .collect();
        Self {
            vendor,
            entries,
            driver_types: BTreeMap::new(),
            version: 0,
        }
    }

    /// Number of times the table was augmented from a driver.
    #[must_use]
    pub const fn version(&self) -> u32 {
        self.version
    }

    /// Entries in logical-type name order.
    pub fn entries(&self) -> impl Iterator<Item = &TypeMappingEntry> {
        self.entries.values()
    }

    /// Returns the entry of a logical type.
    #[must_use]
    pub fn entry(&self, logical_type: &str) -> Option<&TypeMappingEntry> {
        self.entries.get(logical_type)
    }

    /// Returns the default SQL type of a logical type.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnknownLogicalType`] if nothing is registered.
    pub fn resolve_default(&self, logical_type: &str) -> Result<&SqlTypeInfo> {
        self.entries
            .get(logical_type)
            .and_then(TypeMappingEntry::default_candidate)
            .ok_or_else(|| CoreError::UnknownLogicalType(logical_type.to_string()))
    }

    /// Returns the candidate of a logical type matching an explicit SQL
    /// type name.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnknownLogicalType`] if the logical type is not
    /// registered, [`CoreError::NoTypeCandidate`] if no candidate matches.
    pub fn resolve(&self, logical_type: &str, sql_type: &str) -> Result<&SqlTypeInfo> {
        let entry = self
            .entries
            .get(logical_type)
            .ok_or_else(|| CoreError::UnknownLogicalType(logical_type.to_string()))?;
        entry
            .candidates
            .iter()
            .map(|c| &c.info)
            .find(|info| info.matches_name(sql_type))
            .ok_or_else(|| CoreError::NoTypeCandidate {
                logical_type: logical_type.to_string(),
                sql_type: sql_type.to_string(),
            })
    }

    /// Resolves an explicit SQL type when given, the default otherwise.
    ///
    /// # Errors
    ///
    /// See [`Self::resolve`] and [`Self::resolve_default`].
    pub fn resolve_for_column(
        &self,
        logical_type: &str,
        sql_type: Option<&str>,
    ) -> Result<&SqlTypeInfo> {
        match sql_type {
            Some(name) => self.resolve(logical_type, name),
            None => self.resolve_default(logical_type),
        }
    }

    /// Reverse lookup: logical types with a candidate named `sql_type`,
    /// defaults first.
    #[must_use]
    pub fn logical_types_for(&self, sql_type: &str) -> Vec<&str> {
        let mut found: Vec<(bool, &str)> = self
            .entries
            .values()
            .filter_map(|entry| {
                entry
                    .candidates
                    .iter()
                    .find(|c| c.info.matches_name(sql_type))
                    .map(|c| (!c.default, entry.logical_type.as_str()))
            })
            .collect();
        found.sort_unstable();
        found.into_iter().map(|(_, logical)| logical).collect()
    }

    /// Returns a driver-reported type by name, after normalization.
    #[must_use]
    pub fn driver_type(&self, type_name: &str) -> Option<&SqlTypeInfo> {
        self.driver_types.get(&type_name.to_ascii_uppercase())
    }

    /// Augments the table with types reported by a live driver.
    ///
    /// Each reported type is normalized, recorded, and offered as a
    /// non-default candidate to every logical type whose default shares
    /// its type code. Returns the number of candidates added. The table
    /// version moves only when a candidate or driver type was recorded.
    pub fn learn_from_driver(&mut self, reported: Vec<DriverTypeInfo>) -> usize {
        let mut added = 0;
        let mut changed = false;
        for raw in reported {
            let info = normalize_driver_type(self.vendor, &raw);
            for entry in self.entries.values_mut() {
                let Some(default_code) = entry.default_candidate().map(|d| d.code) else {
                    continue;
                };
                let known = entry
                    .candidates
                    .iter()
                    .any(|c| c.info.matches_name(&info.type_name));
                if default_code == info.code && !known {
                    entry.candidates.push(TypeCandidate {
                        info: info.clone(),
                        default: false,
                        from_driver: true,
                    });
                    added += 1;
                }
            }
            let key = info.type_name.to_ascii_uppercase();
            if self.driver_types.get(&key) != Some(&info) {
                self.driver_types.insert(key, info);
                changed = true;
            }
        }
        if added > 0 || changed {
            self.version += 1;
        }
        debug!(vendor = %self.vendor, added, version = self.version, "learned driver types");
        added
    }
}
