//! Decodes fixed-layout account data into readable records.
//!
//! The crate is split into three layers: [`codec`] reads primitives at an offset, [`schema`]
//! composes record shapes and their offset tables, and [`record`] walks a shape over a buffer.
//! [`layouts`] declares the concrete `JobRequest` layout and [`render`] turns decoded records into
//! text.

pub mod codec;
pub mod enums;
pub mod error;
pub mod layouts;
pub mod record;
pub mod render;
pub mod schema;

mod core;
mod interfaces;
mod utils;

// re-export the public interface
pub use crate::core::decode;
pub use error::Error;
pub use interfaces::{DecodeArgs, DecodeArgsBuilder, DecodeResult, InputEncoding};
pub use record::{decode_record, DecodedRecord, DecodedValue};
pub use schema::{RecordShape, SchemaError};
