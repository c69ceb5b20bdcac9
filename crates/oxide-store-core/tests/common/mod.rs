#![allow(dead_code)]

use oxide_store_core::dialect::{DialectProfile, Vendor, Version};
use oxide_store_core::key::Key;
use oxide_store_core::schema::{Column, Table};

pub fn profile(vendor: Vendor) -> DialectProfile {
    DialectProfile::new(vendor, vendor.default_version())
}

pub fn profile_at(vendor: Vendor, major: u32, minor: u32) -> DialectProfile {
    DialectProfile::new(vendor, Version::new(major, minor, 0))
}

pub fn column(profile: &DialectProfile, table: &str, name: &str, logical: &str) -> Column {
    let info = profile
        .types()
        .resolve_default(logical)
        .unwrap_or_else(|e| panic!("no default type for {logical}: {e}"))
        .clone();
    Column::new(table, name, logical, info)
}

/// `CUSTOMER (ID identity, EMAIL unique, NAME)`.
pub fn customer_table(profile: &DialectProfile) -> Table {
    let mut table = Table::new("CUSTOMER");
    let id = column(profile, "CUSTOMER", "ID", "i64").identity();
    let email = column(profile, "CUSTOMER", "EMAIL", "string")
        .with_length(Some(120), None)
        .not_null();
    let name = column(profile, "CUSTOMER", "NAME", "string");
    for c in [id.clone(), email.clone(), name] {
        table.add_column(c).unwrap();
    }
    let mut pk = Key::primary("CUSTOMER");
    pk.add_column(id).unwrap();
    table.primary_key = Some(pk);
    let mut unique = Key::candidate("CUSTOMER");
    unique.add_column(email).unwrap();
    table.candidate_keys.push(unique);
    table
}
