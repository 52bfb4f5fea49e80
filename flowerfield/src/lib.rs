#![doc = include_str!("../README.md")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

extern crate alloc;

mod tracing_macros;
pub(crate) use tracing_macros::{debug, trace};

mod error;
pub use error::*;

mod types;
pub use types::*;

mod field;
pub use field::{Field, Target, Validator};

mod kind;
pub use kind::*;

mod instance;
pub use instance::*;

mod registry;
pub use registry::{Registry, global};

mod resolve;

mod map;
pub use map::Mapped;

mod serialize;

pub use flowerfield_value::{VNumber, VObject, Value, ValueType, value};

/// Declares a category root in the [global](global()) registry.
pub fn declare_category(name: impl Into<String>) -> Result<KindId, SchemeError> {
    global().write().declare_category(name)
}

/// Declares a kind under `category` in the [global](global()) registry.
pub fn declare_kind(category: KindId, builder: KindBuilder) -> Result<KindId, SchemeError> {
    global().write().declare_kind(category, builder)
}

/// [`Registry::resolve_and_map`] against the [global](global()) registry.
///
/// The global read lock is held for the whole call, validators included;
/// see [`Validator`] for what they must not do.
pub fn resolve_and_map(target: KindId, record: &Value) -> Result<Instance, SchemeError> {
    global().read().resolve_and_map(target, record)
}

/// Looks a kind or category up by name in the [global](global()) registry.
pub fn lookup(name: &str) -> Option<KindId> {
    global().read().lookup(name)
}
