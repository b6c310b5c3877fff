//! Record instances and the values they hold
//!
//! - `Document`: one instance of a record type, with its own error collector
//! - `Value`: dynamically typed field value
//! - `Embedded`/`EmbeddedList`: handles to documents nested in a field
//! - `ObjectId`: BSON document identifier

mod embedded;
mod errors;
mod record;
mod value;

pub use embedded::{Embedded, EmbeddedList};
pub use errors::{humanize, Errors};
pub use bson::oid::ObjectId;
pub use record::{Data, Document, ValidationContext};
pub use value::Value;
