//! Compilation context handed to SQL methods.

use crate::dialect::DialectProfile;

/// The clause an expression is being compiled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClauseKind {
    /// SELECT list.
    Projection,
    /// WHERE clause.
    Where,
    /// HAVING clause.
    Having,
    /// ORDER BY clause.
    OrderBy,
    /// JOIN condition.
    Join,
}

/// Dialect and clause an expression is compiled against.
#[derive(Debug, Clone, Copy)]
pub struct CompileContext<'a> {
    /// Dialect profile.
    pub profile: &'a DialectProfile,
    /// Clause being compiled.
    pub clause: ClauseKind,
}

impl<'a> CompileContext<'a> {
    /// Creates a context.
    #[must_use]
    pub const fn new(profile: &'a DialectProfile, clause: ClauseKind) -> Self {
        Self { profile, clause }
    }

    /// Returns the same context for another clause.
    #[must_use]
    pub const fn with_clause(self, clause: ClauseKind) -> Self {
        Self {
            profile: self.profile,
            clause,
        }
    }

    /// Whether aggregates may be rendered directly in this clause.
    #[must_use]
    pub const fn allows_aggregates(&self) -> bool {
        matches!(self.clause, ClauseKind::Projection | ClauseKind::Having)
    }
}
