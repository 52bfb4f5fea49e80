//! `flowerfield-value` provides the generic record tree that flowerfield maps
//! onto typed structures and serializes back into.
//!
//! # Features
//!
//! - **Six value types**: Null, Bool, Number, String, Array, Object
//! - **Ordered objects**: keys keep their insertion order, so records
//!   serialize back in the order their fields were declared
//! - **`value!` macro**: build records with JSON-looking literals
//! - **serde integration** (`serde` feature) and JSON text helpers
//!   (`json` feature, on by default)
//!
//! # Example
//!
//! ```
//! use flowerfield_value::{value, ValueType};
//!
//! let v = value!({ "color": "#fff", "petals": 5, "tags": ["red", null] });
//! let obj = v.as_object().unwrap();
//! assert_eq!(obj.get("petals").map(|p| p.value_type()), Some(ValueType::Integer));
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod macros;

mod value;
pub use value::*;

mod number;
pub use number::*;

mod object;
pub use object::*;

mod format;

#[cfg(feature = "serde")]
mod serde_impl;

#[cfg(feature = "json")]
mod json;
#[cfg(feature = "json")]
pub use json::{from_reader, from_str, to_string, to_string_pretty, to_writer};
