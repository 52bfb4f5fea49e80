//! Turning instances back into plain records.

use flowerfield_value::{VObject, Value};

#[cfg(feature = "json")]
use crate::SchemeError;
use crate::{FieldValue, Instance};

impl Instance {
    /// Serializes this instance into a plain record.
    ///
    /// Each field is written under its alias if it has one, else its name,
    /// in declaration order. Fields bound to [`FieldValue::None`] are left
    /// out, or written as `null` when `leave_none` is set. Nested instances
    /// and lists are serialized with the same `leave_none`.
    ///
    /// ```
    /// use flowerfield::{Field, Kind, Registry};
    /// use flowerfield_value::{ValueType, value};
    ///
    /// let mut reg = Registry::new();
    /// let garden = reg.declare_category("Garden")?;
    /// reg.declare_kind(
    ///     garden,
    ///     Kind::builder("Flower")
    ///         .field(Field::new("color", ValueType::String))
    ///         .field(Field::optional("type", ValueType::String).alias("kind")),
    /// )?;
    ///
    /// let rose = reg.resolve_and_map(garden, &value!({ "color": "red" }))?;
    /// assert_eq!(rose.to_record(false), value!({ "color": "red" }));
    /// assert_eq!(rose.to_record(true), value!({ "color": "red", "kind": null }));
    /// # Ok::<(), flowerfield::SchemeError>(())
    /// ```
    pub fn to_record(&self, leave_none: bool) -> Value {
        Value::Object(self.to_object(leave_none))
    }

    /// Like [`Instance::to_record`], without the [`Value`] wrapper.
    pub fn to_object(&self, leave_none: bool) -> VObject {
        let mut out = VObject::with_capacity(self.len());
        for (key, value) in self.iter() {
            if value.is_none() && !leave_none {
                continue;
            }
            out.insert(key, serialize_field(value, leave_none));
        }
        out
    }

    /// Serializes to compact JSON text.
    #[cfg(feature = "json")]
    pub fn to_json_string(&self, leave_none: bool) -> Result<String, SchemeError> {
        Ok(flowerfield_value::to_string(&self.to_record(leave_none))?)
    }

    /// Writes compact JSON to `writer`.
    #[cfg(feature = "json")]
    pub fn to_json_writer<W: std::io::Write>(
        &self,
        writer: W,
        leave_none: bool,
    ) -> Result<(), SchemeError> {
        Ok(flowerfield_value::to_writer(writer, &self.to_record(leave_none))?)
    }
}

fn serialize_field(value: &FieldValue, leave_none: bool) -> Value {
    match value {
        FieldValue::None => Value::Null,
        FieldValue::Value(v) => v.clone(),
        FieldValue::Instance(instance) => instance.to_record(leave_none),
        FieldValue::List(items) => Value::Array(
            items
                .iter()
                .map(|item| serialize_field(item, leave_none))
                .collect(),
        ),
    }
}

impl From<&Instance> for Value {
    fn from(instance: &Instance) -> Self {
        instance.to_record(false)
    }
}
