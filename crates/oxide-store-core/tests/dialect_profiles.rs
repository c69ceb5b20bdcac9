//! Dialect profile behaviour across vendors and versions.

mod common;
use common::*;

use oxide_store_core::dialect::{
    Capability, DialectProfile, IdentifierKind, SequenceOptions, Vendor, Version,
};
use oxide_store_core::{CoreError, ProfileConfig};

#[test]
fn pagination_across_vendors() {
    let cases = [
        (Vendor::PostgreSql, "LIMIT 5 OFFSET 10"),
        (Vendor::MySql, "LIMIT 10,5"),
        (Vendor::Sqlite, "LIMIT 5 OFFSET 10"),
        (Vendor::SqlServer, "OFFSET 10 ROWS FETCH NEXT 5 ROWS ONLY"),
        (Vendor::Oracle, "OFFSET 10 ROWS FETCH NEXT 5 ROWS ONLY"),
        (Vendor::Derby, "OFFSET 10 ROWS FETCH NEXT 5 ROWS ONLY"),
        (Vendor::H2, "OFFSET 10 ROWS FETCH NEXT 5 ROWS ONLY"),
        (Vendor::Db2, "OFFSET 10 ROWS FETCH NEXT 5 ROWS ONLY"),
    ];
    for (vendor, expected) in cases {
        assert_eq!(
            profile(vendor).pagination_clause(10, 5, true),
            expected,
            "{vendor}"
        );
    }
}

#[test]
fn empty_range_renders_nothing() {
    for vendor in Vendor::ALL {
        assert_eq!(profile(vendor).pagination_clause(0, 0, false), "", "{vendor}");
        assert_eq!(profile(vendor).pagination_clause(-3, -1, true), "", "{vendor}");
    }
}

#[test]
fn offset_fetch_gated_by_version() {
    assert!(!profile_at(Vendor::Oracle, 11, 2).supports(Capability::OffsetFetch));
    assert_eq!(profile_at(Vendor::Oracle, 11, 2).pagination_clause(10, 5, true), "");
    assert!(profile_at(Vendor::Oracle, 12, 1).supports(Capability::OffsetFetch));
    assert!(!profile_at(Vendor::Derby, 10, 4).supports(Capability::OffsetFetch));
    assert!(profile_at(Vendor::Derby, 10, 5).supports(Capability::OffsetFetch));
}

#[test]
fn sequence_ddl_by_vendor() {
    let mut options = SequenceOptions::named("INVOICE_SEQ");
    options.start = Some(1);
    options.increment = Some(1);

    assert_eq!(
        profile(Vendor::Oracle).create_sequence(&options).unwrap(),
        "CREATE SEQUENCE INVOICE_SEQ START WITH 1 INCREMENT BY 1 NOMINVALUE NOMAXVALUE NOCACHE"
    );
    assert_eq!(
        profile(Vendor::SqlServer)
            .sequence_next_value("INVOICE_SEQ")
            .unwrap(),
        "SELECT NEXT VALUE FOR INVOICE_SEQ"
    );
    assert!(matches!(
        profile(Vendor::Sqlite).create_sequence(&options),
        Err(CoreError::Unsupported { vendor: "sqlite", .. })
    ));
}

#[test]
fn missing_sequence_name_is_reported_first() {
    for vendor in Vendor::ALL {
        assert_eq!(
            profile(vendor).create_sequence(&SequenceOptions::default()),
            Err(CoreError::MissingSequenceName),
            "{vendor}"
        );
    }
}

#[test]
fn reserved_words_are_quoted() {
    let pg = profile(Vendor::PostgreSql);
    assert!(pg.is_reserved_keyword("select"));
    assert!(pg.is_reserved_keyword("SELECT"));
    assert_eq!(pg.format_identifier("GROUP", IdentifierKind::Column), "\"group\"");
    assert_eq!(pg.format_identifier("Amount", IdentifierKind::Column), "amount");
}

#[test]
fn truncated_names_fit_the_limit() {
    let pg = profile(Vendor::PostgreSql);
    let name = "A".repeat(80);
    let formatted = pg.truncate_identifier(&name, IdentifierKind::Index);
    assert_eq!(formatted.chars().count(), 63);
}

#[test]
fn config_overrides_apply_after_gating() {
    let config = ProfileConfig {
        vendor: String::from("sqlserver"),
        version: Some(String::from("10.50.6000")),
        enable: vec![String::from("offset_fetch")],
        disable: Vec::new(),
    };
    let forced = DialectProfile::from_config(&config).unwrap();
    assert_eq!(forced.version(), Version::new(10, 50, 6000));
    assert_eq!(
        forced.pagination_clause(0, 5, false),
        "ORDER BY (SELECT NULL) OFFSET 0 ROWS FETCH NEXT 5 ROWS ONLY"
    );

    let unknown = ProfileConfig::new("informix");
    assert!(matches!(
        DialectProfile::from_config(&unknown),
        Err(CoreError::UnknownVendor(_))
    ));
}
