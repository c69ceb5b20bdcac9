//! # oxide-store-fetch
//!
//! Single-object fetches compiled once per class and member selection and
//! executed per object.
//!
//! A [`FetchRequest`] picks the table to select from, joins superclass
//! tables and related rows as needed, and restricts the row by identity,
//! tenant and soft-delete flag. Executing it acquires a connection from a
//! [`ConnectionProvider`], chooses the locked or unlocked statement from a
//! [`LockManager`], and copies the row into an [`ObjectState`].
//!
//! ```rust
//! use oxide_store_core::dialect::{DialectProfile, Vendor, Version};
//! use oxide_store_fetch::{
//!     ClassMapping, FetchRequest, IdentityStrategy, LockMode, MemberMapping,
//!     MetadataCatalog, TableMapping,
//! };
//!
//! let mut catalog = MetadataCatalog::new();
//! catalog.add(
//!     ClassMapping::new(
//!         "Customer",
//!         TableMapping::new("CUSTOMER"),
//!         IdentityStrategy::Surrogate {
//!             column: String::from("ID"),
//!             logical_type: String::from("i64"),
//!         },
//!     )
//!     .member(MemberMapping::scalar(0, "name", "NAME", "string")),
//! );
//!
//! let profile = DialectProfile::new(Vendor::PostgreSql, Version::new(16, 0, 0));
//! let request = FetchRequest::compile(&catalog, &profile, "Customer", &[0], &[]).unwrap();
//! assert_eq!(
//!     request.sql(LockMode::None),
//!     Some("SELECT A0.name FROM customer A0 WHERE A0.id = ?")
//! );
//! ```

pub mod cache;
pub mod datastore;
pub mod error;
pub mod metadata;
pub mod request;
pub mod sqlite;
pub mod state;

pub use cache::{FetchKey, FetchRequestCache};
pub use datastore::{ConnectionProvider, DatastoreConnection, LockManager, LockMode, NoLocks};
pub use error::{DatastoreError, FetchError, Result, VendorError};
pub use metadata::{
    ClassMapping, IdentityColumn, IdentityStrategy, MapStorage, MemberKind, MemberMapping,
    MetadataCatalog, SoftDeleteMapping, TableMapping, TenancyMapping, VersionMapping,
};
pub use request::{CompiledFetch, FetchContext, FetchOutcome, FetchRequest};
pub use sqlite::{SqliteConnection, SqliteProvider};
pub use state::{FieldValue, IdentityValue, LoadedObject, ObjectReference, ObjectState};
