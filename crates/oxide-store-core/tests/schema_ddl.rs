//! Table DDL across vendors.

mod common;
use common::*;

use oxide_store_core::dialect::Vendor;
use oxide_store_core::{SchemaConfig, SchemaWriter};

#[test]
fn customer_table_per_vendor() {
    let mssql = profile(Vendor::SqlServer);
    let statements = SchemaWriter::new(&mssql)
        .create_table(&customer_table(&mssql))
        .unwrap();
    assert_eq!(
        statements,
        vec![String::from(
            "CREATE TABLE CUSTOMER (\n    ID BIGINT IDENTITY NOT NULL,\n    EMAIL NVARCHAR(120) NOT NULL,\n    NAME NVARCHAR(255),\n    CONSTRAINT CUSTOMER_PK PRIMARY KEY (ID),\n    CONSTRAINT CUSTOMER_U1 UNIQUE (EMAIL)\n)"
        )]
    );

    let h2 = profile(Vendor::H2);
    let statements = SchemaWriter::new(&h2)
        .create_table(&customer_table(&h2))
        .unwrap();
    assert!(statements[0].contains("ID BIGINT GENERATED BY DEFAULT AS IDENTITY NOT NULL"));
}

#[test]
fn schema_file_to_ddl() {
    let json = r#"{
        "tables": [
            {
                "name": "LINE_ITEM",
                "columns": [
                    {"name": "ORDER_ID", "type": "i64", "nullable": false},
                    {"name": "LINE_NO", "type": "i32", "nullable": false},
                    {"name": "SKU", "type": "string", "length": 40}
                ],
                "primary_key": {"columns": ["ORDER_ID", "LINE_NO"]},
                "foreign_keys": [{
                    "columns": ["ORDER_ID"],
                    "references": "ORDERS",
                    "referenced_columns": ["ID"],
                    "on_delete": "cascade"
                }]
            }
        ]
    }"#;
    let config: SchemaConfig = serde_json::from_str(json).unwrap();
    let db2 = profile(Vendor::Db2);
    let tables = config.to_tables(&db2).unwrap();
    let statements = SchemaWriter::new(&db2).create_table(&tables[0]).unwrap();
    assert_eq!(
        statements,
        vec![
            String::from(
                "CREATE TABLE LINE_ITEM (\n    ORDER_ID BIGINT NOT NULL,\n    LINE_NO INTEGER NOT NULL,\n    SKU VARCHAR(40),\n    CONSTRAINT LINE_ITEM_PK PRIMARY KEY (ORDER_ID, LINE_NO)\n)"
            ),
            String::from(
                "ALTER TABLE LINE_ITEM ADD CONSTRAINT LINE_ITEM_FK1 FOREIGN KEY (ORDER_ID) REFERENCES ORDERS (ID) ON DELETE CASCADE"
            ),
        ]
    );
}
