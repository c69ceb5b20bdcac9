//! Method and operation resolution.
//!
//! A method is looked up by `(receiver category, name)`, an operation by
//! name. Vendor tables are consulted before the shared tables. The
//! receiver-less (wildcard) bucket is only searched for receiver-less
//! calls; a typed receiver never falls back to it.

use core::fmt;

use super::vendor::Vendor;
use crate::error::{CoreError, Result};
use crate::expr::{
    base_methods, base_operations, vendor_methods, vendor_operations, CompileContext,
    ExprCategory, SqlExpression,
};

/// Strategy generating SQL for a method call.
pub trait SqlMethod: fmt::Debug + Sync {
    /// Builds the expression for `receiver.method(args)`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidMethodCall`] for an unusable receiver or
    /// argument list.
    fn invoke(
        &self,
        ctx: &CompileContext<'_>,
        receiver: Option<SqlExpression>,
        args: Vec<SqlExpression>,
    ) -> Result<SqlExpression>;
}

/// Strategy generating SQL for an abstract operation.
pub trait SqlOperation: fmt::Debug + Sync {
    /// Builds the expression for the operation over `args`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidMethodCall`] for a wrong argument count.
    fn apply(&self, ctx: &CompileContext<'_>, args: Vec<SqlExpression>) -> Result<SqlExpression>;
}

/// A registered method.
#[derive(Debug, Clone, Copy)]
pub struct MethodEntry {
    /// Receiver category; `None` for the wildcard bucket.
    pub receiver: Option<ExprCategory>,
    /// Method name.
    pub name: &'static str,
    /// SQL generation strategy.
    pub method: &'static dyn SqlMethod,
}

impl MethodEntry {
    /// Creates an entry.
    #[must_use]
    pub const fn new(
        receiver: Option<ExprCategory>,
        name: &'static str,
        method: &'static dyn SqlMethod,
    ) -> Self {
        Self {
            receiver,
            name,
            method,
        }
    }
}

/// A registered operation.
#[derive(Debug, Clone, Copy)]
pub struct OperationEntry {
    /// Operation name.
    pub name: &'static str,
    /// SQL generation strategy.
    pub operation: &'static dyn SqlOperation,
}

impl OperationEntry {
    /// Creates an entry.
    #[must_use]
    pub const fn new(name: &'static str, operation: &'static dyn SqlOperation) -> Self {
        Self { name, operation }
    }
}

/// Method and operation tables of one vendor.
#[derive(Debug, Clone)]
pub struct MethodRegistry {
    vendor: Vendor,
    vendor_methods: &'static [MethodEntry],
    base_methods: &'static [MethodEntry],
    vendor_operations: &'static [OperationEntry],
    base_operations: &'static [OperationEntry],
}

fn find_method(
    table: &'static [MethodEntry],
    receiver: Option<ExprCategory>,
    name: &str,
) -> Option<&'static dyn SqlMethod> {
    table
        .iter()
        .find(|entry| entry.receiver == receiver && entry.name == name)
        .map(|entry| entry.method)
}

impl MethodRegistry {
    /// Builds the registry of a vendor.
    #[must_use]
    pub const fn for_vendor(vendor: Vendor) -> Self {
        Self {
            vendor,
            vendor_methods: vendor_methods(vendor),
            base_methods: base_methods(),
            vendor_operations: vendor_operations(vendor),
            base_operations: base_operations(),
        }
    }

    /// Vendor the registry was built for.
    #[must_use]
    pub const fn vendor(&self) -> Vendor {
        self.vendor
    }

    /// Resolves a method, vendor table first.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnknownMethod`] if neither table has it.
    pub fn resolve_method(
        &self,
        receiver: Option<ExprCategory>,
        name: &str,
    ) -> Result<&'static dyn SqlMethod> {
        find_method(self.vendor_methods, receiver, name)
            .or_else(|| find_method(self.base_methods, receiver, name))
            .ok_or_else(|| CoreError::UnknownMethod {
                receiver: receiver.map_or_else(|| String::from("*"), |c| c.to_string()),
                method: name.to_string(),
            })
    }

    /// Resolves an operation, vendor table first.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnknownMethod`] if neither table has it.
    pub fn resolve_operation(&self, name: &str) -> Result<&'static dyn SqlOperation> {
        self.vendor_operations
            .iter()
            .chain(self.base_operations)
            .find(|entry| entry.name == name)
            .map(|entry| entry.operation)
            .ok_or_else(|| CoreError::UnknownMethod {
                receiver: String::from("operation"),
                method: name.to_string(),
            })
    }

    /// Returns whether a method is registered for the receiver.
    #[must_use]
    pub fn has_method(&self, receiver: Option<ExprCategory>, name: &str) -> bool {
        self.resolve_method(receiver, name).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_receiver_does_not_fall_back_to_wildcard() {
        let registry = MethodRegistry::for_vendor(Vendor::PostgreSql);
        assert!(registry.has_method(None, "count"));
        assert!(!registry.has_method(Some(ExprCategory::Numeric), "count"));
        assert!(!registry.has_method(None, "toUpperCase"));
        assert!(registry.has_method(Some(ExprCategory::String), "toUpperCase"));
    }

    #[test]
    fn test_unknown_method() {
        let registry = MethodRegistry::for_vendor(Vendor::Generic);
        assert_eq!(
            registry
                .resolve_method(Some(ExprCategory::Temporal), "toUpperCase")
                .unwrap_err(),
            CoreError::UnknownMethod {
                receiver: String::from("temporal"),
                method: String::from("toUpperCase"),
            }
        );
        assert!(registry.resolve_operation("concat").is_ok());
        assert!(registry.resolve_operation("xor").is_err());
    }
}
