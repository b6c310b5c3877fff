//! Record types
//!
//! A record type (`Schema`) is an ordered registry of declared fields. It is
//! built once through `Schema::document`/`Schema::embedded` and shared by
//! every instance.
//!
//! Declaration mistakes surface as `SchemaError` at the point of first
//! misuse; bad data never does.

mod errors;
mod types;

pub use errors::{SchemaError, SchemaErrorCode, SchemaResult};
pub use types::{Schema, SchemaBuilder, SchemaKind};
