//! Identity (auto-increment) column syntax.

use super::vendor::Vendor;

/// Storage width of an integer identity column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum IntegerWidth {
    /// 8- or 16-bit.
    Small,
    /// 32-bit.
    Regular,
    /// 64-bit.
    Big,
}

impl IntegerWidth {
    /// Derives the width from a logical type name.
    #[must_use]
    pub fn from_logical(logical_type: &str) -> Self {
        match logical_type {
            "i8" | "i16" => Self::Small,
            "i64" => Self::Big,
            _ => Self::Regular,
        }
    }
}

/// Where the identity keyword goes in a column definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityPlacement {
    /// The keyword replaces the column type, chosen by width.
    ReplaceType {
        /// Keyword for 8/16-bit columns.
        small: &'static str,
        /// Keyword for 32-bit columns.
        regular: &'static str,
        /// Keyword for 64-bit columns.
        big: &'static str,
    },
    /// The keyword follows the column type.
    AfterType(&'static str),
    /// The column becomes `INTEGER PRIMARY KEY AUTOINCREMENT`.
    InlinePrimaryKey,
}

/// How the last generated identity value is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LastValueForm {
    /// A fixed statement.
    Fixed(&'static str),
    /// Reads the sequence behind a serial column of a table.
    SerialSequence,
    /// The vendor offers no such statement.
    Unavailable,
}

/// Vendor identity syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentitySyntax {
    /// Keyword placement.
    pub placement: IdentityPlacement,
    /// Last-value statement.
    pub last_value: LastValueForm,
}

const GENERATED: IdentityPlacement =
    IdentityPlacement::AfterType("GENERATED BY DEFAULT AS IDENTITY");

impl IdentitySyntax {
    /// Returns the identity syntax of a vendor.
    #[must_use]
    pub const fn for_vendor(vendor: Vendor) -> Self {
        let (placement, last_value) = match vendor {
            Vendor::PostgreSql => (
                IdentityPlacement::ReplaceType {
                    small: "SMALLSERIAL",
                    regular: "SERIAL",
                    big: "BIGSERIAL",
                },
                LastValueForm::SerialSequence,
            ),
            Vendor::MySql => (
                IdentityPlacement::AfterType("AUTO_INCREMENT"),
                LastValueForm::Fixed("SELECT LAST_INSERT_ID()"),
            ),
            Vendor::Sqlite => (
                IdentityPlacement::InlinePrimaryKey,
                LastValueForm::Fixed("SELECT last_insert_rowid()"),
            ),
            Vendor::SqlServer => (
                IdentityPlacement::AfterType("IDENTITY"),
                LastValueForm::Fixed("SELECT @@IDENTITY"),
            ),
            Vendor::Oracle => (GENERATED, LastValueForm::Unavailable),
            Vendor::Derby | Vendor::Db2 => (
                GENERATED,
                LastValueForm::Fixed("VALUES IDENTITY_VAL_LOCAL()"),
            ),
            Vendor::H2 => (GENERATED, LastValueForm::Fixed("CALL IDENTITY()")),
            Vendor::Generic => (GENERATED, LastValueForm::Unavailable),
        };
        Self {
            placement,
            last_value,
        }
    }

    /// Returns the keyword for a column of the given width, or `None`
    /// when the column is rendered inline as a primary key.
    #[must_use]
    pub const fn keyword(&self, width: IntegerWidth) -> Option<&'static str> {
        match self.placement {
            IdentityPlacement::ReplaceType {
                small,
                regular,
                big,
            } => Some(match width {
                IntegerWidth::Small => small,
                IntegerWidth::Regular => regular,
                IntegerWidth::Big => big,
            }),
            IdentityPlacement::AfterType(keyword) => Some(keyword),
            IdentityPlacement::InlinePrimaryKey => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width_dependent_keyword() {
        let pg = IdentitySyntax::for_vendor(Vendor::PostgreSql);
        assert_eq!(pg.keyword(IntegerWidth::from_logical("i64")), Some("BIGSERIAL"));
        assert_eq!(pg.keyword(IntegerWidth::from_logical("i32")), Some("SERIAL"));
        assert_eq!(pg.keyword(IntegerWidth::from_logical("i16")), Some("SMALLSERIAL"));
    }

    #[test]
    fn test_width_independent_keyword() {
        let mysql = IdentitySyntax::for_vendor(Vendor::MySql);
        assert_eq!(mysql.keyword(IntegerWidth::Small), Some("AUTO_INCREMENT"));
        assert_eq!(mysql.keyword(IntegerWidth::Big), Some("AUTO_INCREMENT"));
        assert_eq!(IdentitySyntax::for_vendor(Vendor::Sqlite).keyword(IntegerWidth::Big), None);
    }
}
