//! docfields - declarative record types with field-level validation
//!
//! A record type declares named, typed fields. Instances coerce values on
//! assignment, validate on demand into a per-instance error collector, and
//! flatten to ordered JSON data for persistence.
//!
//! ```ignore
//! use docfields::document::Document;
//! use docfields::fields::{IntegerField, StringField};
//! use docfields::schema::Schema;
//!
//! let user = Schema::document("User")
//!     .field(StringField::new("email").required().pattern("@")?)
//!     .field(IntegerField::new("age").min_value(0))
//!     .build();
//!
//! let mut doc = Document::new(&user)?;
//! doc.set("age", -1)?;
//! assert!(!doc.valid());
//! ```

pub mod document;
pub mod fields;
pub mod observability;
pub mod persist;
pub mod schema;
