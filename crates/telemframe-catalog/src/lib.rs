//! Runtime descriptor catalogue.
//!
//! Maps type tags to framing descriptors when the message type is only
//! known at runtime: stream inspection, ad-hoc decoding, or links that
//! carry types defined outside this crate family. Definitions can be
//! loaded from a JSON file.

pub mod config;
pub mod definition;
pub mod error;
pub mod registry;

pub use config::CatalogConfig;
pub use definition::{Definition, OrderDef, RangeDef, RangeName};
pub use error::{CatalogError, Result};
pub use registry::{Catalog, Entry};
