//! Fetch compilation without a datastore.

mod common;
use common::*;

use std::sync::Arc;

use oxide_store_core::dialect::{DialectProfile, Vendor};
use oxide_store_core::statement::MappingKey;
use oxide_store_fetch::{
    ClassMapping, FetchError, FetchRequest, FetchRequestCache, IdentityStrategy, LockMode,
    MemberMapping, TableMapping, TenancyMapping,
};

fn profile(vendor: Vendor) -> DialectProfile {
    DialectProfile::new(vendor, vendor.default_version())
}

#[test]
fn locked_variant_per_vendor() {
    let catalog = catalog();
    let cases = [
        (
            Vendor::PostgreSql,
            "SELECT A0.code FROM orders A0 WHERE A0.id = ? FOR UPDATE",
        ),
        (
            Vendor::SqlServer,
            "SELECT A0.CODE FROM ORDERS A0 WITH (UPDLOCK, ROWLOCK) WHERE A0.ID = ?",
        ),
        (Vendor::Sqlite, "SELECT A0.CODE FROM ORDERS A0 WHERE A0.ID = ?"),
    ];
    for (vendor, expected) in cases {
        let request =
            FetchRequest::compile(&catalog, &profile(vendor), "Order", &[ORDER_CODE], &[])
                .unwrap();
        assert_eq!(request.sql(LockMode::Pessimistic), Some(expected), "{vendor}");
    }
}

#[test]
fn placeholders_match_parameter_layout() {
    let catalog = catalog();
    let selections: [(&str, &[usize], &[usize]); 4] = [
        ("Customer", &[CUSTOMER_NAME, CUSTOMER_EMAIL], &[]),
        ("Order", &[ORDER_CODE, ORDER_CUSTOMER], &[]),
        ("LineItem", &[LINE_SKU], &[]),
        ("Employee", &[EMPLOYEE_SALARY], &[]),
    ];
    for vendor in [Vendor::Oracle, Vendor::MySql, Vendor::Db2] {
        let profile = profile(vendor);
        for (class, fetch, store) in selections {
            let request = FetchRequest::compile(&catalog, &profile, class, fetch, store).unwrap();
            let compiled = request.statement().unwrap();
            for lock in [LockMode::None, LockMode::Pessimistic] {
                assert_eq!(
                    compiled.text(lock).placeholder_count(),
                    compiled.mapping().index.param_width(),
                    "{vendor} {class}"
                );
            }
        }
    }
}

#[test]
fn compound_key_parameters_follow_key_order() {
    let catalog = catalog();
    let request = FetchRequest::compile(
        &catalog,
        &profile(Vendor::H2),
        "LineItem",
        &[LINE_QTY],
        &[],
    )
    .unwrap();
    let index = &request.statement().unwrap().mapping().index;
    assert_eq!(
        index.mapping(MappingKey::Member(LINE_ORDER_ID)).unwrap().param_occurrences,
        vec![vec![1]]
    );
    assert_eq!(
        index.mapping(MappingKey::Member(LINE_NO)).unwrap().param_occurrences,
        vec![vec![2]]
    );
    assert_eq!(index.param_width(), 2);
}

#[test]
fn subclass_members_join_the_version_table() {
    let catalog = catalog();
    let request = FetchRequest::compile(
        &catalog,
        &profile(Vendor::Sqlite),
        "Employee",
        &[EMPLOYEE_SALARY],
        &[],
    )
    .unwrap();
    assert_eq!(request.table(), "EMPLOYEE");
    assert_eq!(
        request.sql(LockMode::None),
        Some(
            "SELECT A1.VERSION, A0.SALARY FROM EMPLOYEE A0 \
             INNER JOIN PERSON A1 ON A0.ID = A1.ID WHERE A0.ID = ?"
        )
    );
}

#[test]
fn static_tenants_render_as_literals() {
    let mut catalog = catalog();
    catalog.add(
        ClassMapping::new(
            "Invoice",
            TableMapping::new("INVOICE").with_tenancy(TenancyMapping {
                column: String::from("TENANT_ID"),
                allowed: Some(vec![String::from("acme"), String::from("globex")]),
            }),
            IdentityStrategy::Surrogate {
                column: String::from("ID"),
                logical_type: String::from("i64"),
            },
        )
        .member(MemberMapping::scalar(0, "total", "TOTAL", "decimal")),
    );
    let request =
        FetchRequest::compile(&catalog, &profile(Vendor::Sqlite), "Invoice", &[0], &[]).unwrap();
    let compiled = request.statement().unwrap();
    assert_eq!(
        compiled.text(LockMode::None).sql,
        "SELECT A0.TOTAL FROM INVOICE A0 WHERE A0.ID = ? AND A0.TENANT_ID IN ('acme', 'globex')"
    );
    assert!(compiled.mapping().index.mapping(MappingKey::Tenant).is_none());
}

#[test]
fn unknown_member_is_a_metadata_error() {
    let catalog = catalog();
    let err = FetchRequest::compile(&catalog, &profile(Vendor::Sqlite), "Order", &[42], &[])
        .unwrap_err();
    assert!(matches!(err, FetchError::Metadata(_)));
}

#[test]
fn foreign_key_width_must_match_target_identity() {
    let mut catalog = catalog();
    catalog.add(
        ClassMapping::new(
            "Shipment",
            TableMapping::new("SHIPMENT"),
            IdentityStrategy::Surrogate {
                column: String::from("ID"),
                logical_type: String::from("i64"),
            },
        )
        .member(MemberMapping::relation(
            0,
            "line",
            vec![String::from("ORDER_ID")],
            "LineItem",
        )),
    );
    let err = FetchRequest::compile(&catalog, &profile(Vendor::Sqlite), "Shipment", &[0], &[])
        .unwrap_err();
    assert!(matches!(err, FetchError::Metadata(ref m) if m.contains("identity columns")));
}

#[test]
fn store_only_scalar_is_ignored() {
    let catalog = catalog();
    let request = FetchRequest::compile(
        &catalog,
        &profile(Vendor::Sqlite),
        "Order",
        &[ORDER_CODE],
        &[ORDER_AMOUNT],
    )
    .unwrap();
    assert_eq!(
        request.sql(LockMode::None),
        Some("SELECT A0.CODE FROM ORDERS A0 WHERE A0.ID = ?")
    );
}

#[test]
fn fk_only_depth_skips_the_join() {
    let mut catalog = catalog();
    catalog.add(
        ClassMapping::new(
            "Invoice",
            TableMapping::new("INVOICE"),
            IdentityStrategy::Surrogate {
                column: String::from("ID"),
                logical_type: String::from("i64"),
            },
        )
        .member(
            MemberMapping::relation(0, "order", vec![String::from("ORDER_ID")], "Order")
                .with_recursion_depth(0),
        ),
    );
    let request =
        FetchRequest::compile(&catalog, &profile(Vendor::Sqlite), "Invoice", &[0], &[]).unwrap();
    assert_eq!(
        request.sql(LockMode::None),
        Some("SELECT A0.ORDER_ID FROM INVOICE A0 WHERE A0.ID = ?")
    );
}

#[test]
fn cache_reuses_compiled_requests() {
    let catalog = catalog();
    let profile = profile(Vendor::Sqlite);
    let cache = FetchRequestCache::new();
    let first = cache
        .get_or_compile(&catalog, &profile, "Order", &[ORDER_CODE, ORDER_AMOUNT], &[])
        .unwrap();
    let second = cache
        .get_or_compile(&catalog, &profile, "Order", &[ORDER_AMOUNT, ORDER_CODE], &[])
        .unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(cache.len(), 1);

    cache
        .get_or_compile(&catalog, &profile, "Order", &[ORDER_CODE], &[ORDER_CUSTOMER])
        .unwrap();
    assert_eq!(cache.len(), 2);

    cache.clear();
    assert!(cache.is_empty());
}

#[test]
fn cache_is_shared_across_threads() {
    let catalog = Arc::new(catalog());
    let profile = Arc::new(profile(Vendor::PostgreSql));
    let cache = Arc::new(FetchRequestCache::new());
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let (catalog, profile, cache) =
                (Arc::clone(&catalog), Arc::clone(&profile), Arc::clone(&cache));
            std::thread::spawn(move || {
                cache
                    .get_or_compile(&catalog, &profile, "Customer", &[CUSTOMER_NAME], &[])
                    .unwrap()
            })
        })
        .collect();
    let requests: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(cache.len(), 1);
    assert!(requests.windows(2).all(|pair| Arc::ptr_eq(&pair[0], &pair[1])));
}
