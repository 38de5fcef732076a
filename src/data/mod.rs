//! Data-source values and lookup.
//!
//! Every namespace root is a plain JSON value: mappings, sequences and
//! scalars. Lookups walk that value with explicit kind checks instead of
//! any dynamic attribute access.

mod path;
mod registry;

pub use path::{resolve, value_kind, ResolutionError, ResolutionFailure};
pub use registry::{SourceNotFound, SourceRegistry};

/// A data value: scalar (string, number, boolean), null, mapping or sequence.
pub use serde_json::Value;
