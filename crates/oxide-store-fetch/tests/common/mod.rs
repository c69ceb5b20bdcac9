#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use oxide_store_core::dialect::{DialectProfile, Vendor};
use oxide_store_core::SqlValue;
use oxide_store_fetch::{
    ClassMapping, ConnectionProvider, DatastoreConnection, DatastoreError, FetchError,
    FieldValue, IdentityStrategy, MapStorage, MemberMapping, MetadataCatalog, ObjectReference,
    ObjectState, TableMapping, TenancyMapping, VersionMapping,
};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

pub const CUSTOMER_NAME: usize = 0;
pub const CUSTOMER_EMAIL: usize = 1;
pub const CUSTOMER_TAGS: usize = 2;

pub const ORDER_CODE: usize = 0;
pub const ORDER_AMOUNT: usize = 1;
pub const ORDER_CUSTOMER: usize = 2;

pub const LINE_ORDER_ID: usize = 0;
pub const LINE_NO: usize = 1;
pub const LINE_SKU: usize = 2;
pub const LINE_QTY: usize = 3;

pub const PERSON_NAME: usize = 0;
pub const EMPLOYEE_SALARY: usize = 1;

pub const DESK_OWNER: usize = 0;

pub const INVOICE_REVISION: usize = 0;
pub const INVOICE_ISSUED: usize = 1;
pub const INVOICE_REF: usize = 2;
pub const INVOICE_REF_VALUE: &str = "67e55044-10b1-426f-9247-bb680e5fe0c8";

const SCHEMA: &[&str] = &[
    "CREATE TABLE CUSTOMER (ID INTEGER PRIMARY KEY, NAME TEXT, EMAIL TEXT, \
     VERSION INTEGER NOT NULL, TENANT_ID TEXT NOT NULL, DELETED INTEGER NOT NULL DEFAULT 0)",
    "CREATE TABLE ORDERS (ID INTEGER PRIMARY KEY, CUSTOMER_ID INTEGER, CODE TEXT, AMOUNT REAL)",
    "CREATE TABLE LINE_ITEM (ORDER_ID INTEGER NOT NULL, LINE_NO INTEGER NOT NULL, SKU TEXT, \
     QTY INTEGER, PRIMARY KEY (ORDER_ID, LINE_NO))",
    "CREATE TABLE PERSON (ID INTEGER PRIMARY KEY, NAME TEXT, VERSION INTEGER NOT NULL)",
    "CREATE TABLE EMPLOYEE (ID INTEGER PRIMARY KEY, SALARY REAL)",
    "CREATE TABLE DESK (ID INTEGER PRIMARY KEY, OWNER_ID INTEGER)",
    "CREATE TABLE INVOICE (ID INTEGER PRIMARY KEY, REVISION INTEGER NOT NULL, ISSUED TEXT, REF TEXT)",
    "INSERT INTO CUSTOMER VALUES (1, 'Ada', 'ada@example.com', 3, 'acme', 0)",
    "INSERT INTO CUSTOMER VALUES (2, 'Bob', 'bob@example.com', 1, 'acme', 1)",
    "INSERT INTO CUSTOMER VALUES (3, 'Cy', NULL, 1, 'globex', 0)",
    "INSERT INTO ORDERS VALUES (10, 1, 'A-10', 99.5)",
    "INSERT INTO ORDERS VALUES (11, NULL, 'A-11', 5.0)",
    "INSERT INTO LINE_ITEM VALUES (10, 1, 'SKU-1', 2)",
    "INSERT INTO LINE_ITEM VALUES (10, 2, 'SKU-2', 5)",
    "INSERT INTO PERSON VALUES (1, 'Eve', 4)",
    "INSERT INTO EMPLOYEE VALUES (1, 5000.0)",
    "INSERT INTO DESK VALUES (7, 1)",
    "INSERT INTO DESK VALUES (8, NULL)",
    "INSERT INTO INVOICE VALUES (5, 2, '2024-03-01', '67e55044-10b1-426f-9247-bb680e5fe0c8')",
];

/// In-memory database with the test schema and rows.
pub async fn pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(":memory:")
        .await
        .unwrap();
    for statement in SCHEMA {
        sqlx::query(statement).execute(&pool).await.unwrap();
    }
    pool
}

pub fn sqlite() -> DialectProfile {
    DialectProfile::new(Vendor::Sqlite, Vendor::Sqlite.default_version())
}

fn surrogate() -> IdentityStrategy {
    IdentityStrategy::Surrogate {
        column: String::from("ID"),
        logical_type: String::from("i64"),
    }
}

fn version() -> VersionMapping {
    VersionMapping {
        column: String::from("VERSION"),
        logical_type: String::from("i64"),
        member: None,
    }
}

/// Customer, Order, LineItem, Person/Employee, Desk and Invoice.
pub fn catalog() -> MetadataCatalog {
    let mut catalog = MetadataCatalog::new();
    catalog.add(
        ClassMapping::new(
            "Customer",
            TableMapping::new("CUSTOMER")
                .with_version(version())
                .with_tenancy(TenancyMapping {
                    column: String::from("TENANT_ID"),
                    allowed: None,
                })
                .with_soft_delete("DELETED"),
            surrogate(),
        )
        .member(MemberMapping::scalar(CUSTOMER_NAME, "name", "NAME", "string"))
        .member(MemberMapping::scalar(CUSTOMER_EMAIL, "email", "EMAIL", "string"))
        .member(MemberMapping::map(
            CUSTOMER_TAGS,
            "tags",
            MapStorage {
                join_table: String::from("CUSTOMER_TAGS"),
                owner_column: String::from("CUSTOMER_ID"),
                key_column: String::from("TAG"),
                value_column: None,
            },
        )),
    );
    catalog.add(
        ClassMapping::new("Order", TableMapping::new("ORDERS"), surrogate())
            .member(MemberMapping::scalar(ORDER_CODE, "code", "CODE", "string"))
            .member(MemberMapping::scalar(ORDER_AMOUNT, "amount", "AMOUNT", "f64"))
            .member(MemberMapping::relation(
                ORDER_CUSTOMER,
                "customer",
                vec![String::from("CUSTOMER_ID")],
                "Customer",
            )),
    );
    catalog.add(
        ClassMapping::new(
            "LineItem",
            TableMapping::new("LINE_ITEM"),
            IdentityStrategy::Application {
                members: vec![LINE_ORDER_ID, LINE_NO],
            },
        )
        .member(MemberMapping::scalar(LINE_ORDER_ID, "orderId", "ORDER_ID", "i64"))
        .member(MemberMapping::scalar(LINE_NO, "lineNo", "LINE_NO", "i32"))
        .member(MemberMapping::scalar(LINE_SKU, "sku", "SKU", "string"))
        .member(MemberMapping::scalar(LINE_QTY, "qty", "QTY", "i32")),
    );
    catalog.add(
        ClassMapping::new(
            "Person",
            TableMapping::new("PERSON").with_version(version()),
            surrogate(),
        )
        .abstract_class()
        .member(MemberMapping::scalar(PERSON_NAME, "name", "NAME", "string")),
    );
    catalog.add(
        ClassMapping::subclass("Employee", TableMapping::new("EMPLOYEE"), "Person").member(
            MemberMapping::scalar(EMPLOYEE_SALARY, "salary", "SALARY", "f64"),
        ),
    );
    catalog.add(
        ClassMapping::new("Desk", TableMapping::new("DESK"), surrogate()).member(
            MemberMapping::relation(DESK_OWNER, "owner", vec![String::from("OWNER_ID")], "Person"),
        ),
    );
    catalog.add(
        ClassMapping::new(
            "Invoice",
            TableMapping::new("INVOICE").with_version(VersionMapping {
                column: String::from("REVISION"),
                logical_type: String::from("i64"),
                member: Some(INVOICE_REVISION),
            }),
            surrogate(),
        )
        .member(MemberMapping::scalar(INVOICE_REVISION, "revision", "REVISION", "i64"))
        .member(MemberMapping::scalar(INVOICE_ISSUED, "issued", "ISSUED", "date"))
        .member(MemberMapping::scalar(INVOICE_REF, "reference", "REF", "uuid")),
    );
    catalog
}

/// Records every callback in order.
#[derive(Debug, Default)]
pub struct RecordingState {
    pub identity: Vec<SqlValue>,
    pub version: Option<SqlValue>,
    pub fields: BTreeMap<usize, FieldValue>,
    pub references: BTreeMap<usize, Option<ObjectReference>>,
    pub events: Vec<String>,
}

impl RecordingState {
    pub fn new(identity: Vec<SqlValue>) -> Self {
        Self {
            identity,
            ..Self::default()
        }
    }

    pub fn with_id(id: i64) -> Self {
        Self::new(vec![SqlValue::Int(id)])
    }
}

impl ObjectState for RecordingState {
    fn identity_values(&self) -> Vec<SqlValue> {
        self.identity.clone()
    }

    fn cached_version(&self) -> Option<&SqlValue> {
        self.version.as_ref()
    }

    fn set_version(&mut self, version: SqlValue) {
        self.events.push(String::from("version"));
        self.version = Some(version);
    }

    fn replace_field(&mut self, member: usize, value: FieldValue) {
        self.events.push(format!("field {member}"));
        self.fields.insert(member, value);
    }

    fn store_reference(&mut self, member: usize, reference: Option<ObjectReference>) {
        self.events.push(format!("store {member}"));
        self.references.insert(member, reference);
    }

    fn load_deferred(&mut self, member: usize) -> Result<(), FetchError> {
        self.events.push(format!("deferred {member}"));
        Ok(())
    }
}

/// Counts connections handed out and returned.
pub struct CountingProvider<P> {
    pub inner: P,
    pub acquired: AtomicUsize,
    pub released: AtomicUsize,
}

impl<P> CountingProvider<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            acquired: AtomicUsize::new(0),
            released: AtomicUsize::new(0),
        }
    }

    pub fn acquired(&self) -> usize {
        self.acquired.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<P: ConnectionProvider> ConnectionProvider for CountingProvider<P> {
    async fn acquire(&self) -> Result<Box<dyn DatastoreConnection>, DatastoreError> {
        self.acquired.fetch_add(1, Ordering::SeqCst);
        self.inner.acquire().await
    }

    async fn release(&self, connection: Box<dyn DatastoreConnection>) {
        self.released.fetch_add(1, Ordering::SeqCst);
        self.inner.release(connection).await;
    }
}

/// Connections whose every query fails with `error`.
pub struct FailingProvider {
    pub error: DatastoreError,
}

struct FailingConnection {
    error: DatastoreError,
}

#[async_trait]
impl DatastoreConnection for FailingConnection {
    async fn query_first(
        &mut self,
        _sql: &str,
        _params: &[SqlValue],
        _result_types: &[String],
    ) -> Result<Option<Vec<SqlValue>>, DatastoreError> {
        Err(self.error.clone())
    }
}

#[async_trait]
impl ConnectionProvider for FailingProvider {
    async fn acquire(&self) -> Result<Box<dyn DatastoreConnection>, DatastoreError> {
        Ok(Box::new(FailingConnection {
            error: self.error.clone(),
        }))
    }

    async fn release(&self, _connection: Box<dyn DatastoreConnection>) {}
}
