//! Turning records into instances, one field at a time.

use alloc::sync::Arc;

use flowerfield_value::{VObject, Value, ValueType};

use crate::{Field, FieldValue, Instance, Kind, KindId, Registry, SchemeError, trace};

/// What [`Registry::map_data`] produced: one instance for an object, one
/// per element for an array.
#[derive(Debug, Clone, PartialEq)]
pub enum Mapped {
    /// The input was a single record.
    One(Instance),
    /// The input was an array of records.
    Many(Vec<Instance>),
}

impl Mapped {
    /// The single instance, if the input was an object.
    pub fn into_one(self) -> Option<Instance> {
        match self {
            Mapped::One(instance) => Some(instance),
            Mapped::Many(_) => None,
        }
    }

    /// Every instance, in input order.
    pub fn into_vec(self) -> Vec<Instance> {
        match self {
            Mapped::One(instance) => vec![instance],
            Mapped::Many(instances) => instances,
        }
    }
}

impl Registry {
    /// Resolves which kind under `target` the record encodes and builds an
    /// instance of it.
    ///
    /// Fields are bound in declaration order and the first failure aborts
    /// the whole call. Nested objects are resolved and mapped the same way,
    /// against the targets of the field that holds them.
    pub fn resolve_and_map(&self, target: KindId, record: &Value) -> Result<Instance, SchemeError> {
        let object = self.expect_record(target, record)?;
        let id = self.resolve(target, object)?;
        self.instantiate(id, object)
    }

    /// Maps every record in `records` independently, preserving order.
    pub fn map_list(&self, target: KindId, records: &[Value]) -> Result<Vec<Instance>, SchemeError> {
        records
            .iter()
            .map(|record| self.resolve_and_map(target, record))
            .collect()
    }

    /// Maps an object to one instance, or an array to one instance per
    /// element.
    pub fn map_data(&self, target: KindId, data: &Value) -> Result<Mapped, SchemeError> {
        match data {
            Value::Array(records) => self.map_list(target, records).map(Mapped::Many),
            record => self.resolve_and_map(target, record).map(Mapped::One),
        }
    }

    /// Parses `json` and hands it to [`Registry::map_data`].
    #[cfg(feature = "json")]
    pub fn map_json(&self, target: KindId, json: &str) -> Result<Mapped, SchemeError> {
        let data = flowerfield_value::from_str(json)?;
        self.map_data(target, &data)
    }

    /// Reads one JSON document from `reader` and hands it to
    /// [`Registry::map_data`].
    #[cfg(feature = "json")]
    pub fn map_reader<R: std::io::Read>(
        &self,
        target: KindId,
        reader: R,
    ) -> Result<Mapped, SchemeError> {
        let data = flowerfield_value::from_reader(reader)?;
        self.map_data(target, &data)
    }

    fn expect_record<'v>(&self, target: KindId, value: &'v Value) -> Result<&'v VObject, SchemeError> {
        let root = self.kind(target)?;
        value.as_object().ok_or_else(|| SchemeError::NotARecord {
            scheme: root.qualified_name().to_owned(),
            found: value.value_type(),
        })
    }

    fn instantiate(&self, id: KindId, record: &VObject) -> Result<Instance, SchemeError> {
        let kind = self.kind(id)?;
        let mut slots = Vec::with_capacity(kind.fields().len());
        for field in kind.fields() {
            let bound = match field.input_keys().find_map(|key| record.get(key)) {
                Some(raw) => self.bind_field(kind, field, raw)?,
                None => FieldValue::None,
            };
            slots.push(bound);
        }
        Ok(Instance::new(Arc::clone(kind), slots))
    }

    /// Runs one raw value through `field`: type check, structural mapping,
    /// then the validator.
    pub(crate) fn bind_field(
        &self,
        kind: &Kind,
        field: &Field,
        raw: &Value,
    ) -> Result<FieldValue, SchemeError> {
        let value = if field.is_list() {
            self.bind_list(kind, field, raw)?
        } else {
            self.bind_one(kind, field, raw)?
        };

        let Some(validator) = field.validator_fn() else {
            return Ok(value);
        };
        if value.is_none() {
            return Ok(value);
        }
        validator
            .apply(value)
            .map_err(|message| SchemeError::ValidationFailed {
                kind: kind.qualified_name().to_owned(),
                field: field.name().to_owned(),
                message,
            })
    }

    // `null` is read as "no value" for every field, the same as an absent
    // key, so records written with `leave_none` map back.
    fn bind_one(&self, kind: &Kind, field: &Field, raw: &Value) -> Result<FieldValue, SchemeError> {
        let ty = raw.value_type();
        if ty == ValueType::Null {
            return Ok(FieldValue::None);
        }
        if field.accepted().accepts(ty) {
            return Ok(FieldValue::Value(raw.clone()));
        }
        if let Value::Object(object) = raw
            && field.is_structural()
        {
            return self.map_nested(kind, field, object).map(FieldValue::from);
        }
        Err(self.mismatch(kind, field, ty))
    }

    fn bind_list(&self, kind: &Kind, field: &Field, raw: &Value) -> Result<FieldValue, SchemeError> {
        match raw {
            Value::Array(items) => self.unpack_list(kind, field, items).map(FieldValue::List),
            Value::Null => Ok(FieldValue::None),
            other => Err(self.mismatch(kind, field, other.value_type())),
        }
    }

    fn unpack_list(
        &self,
        kind: &Kind,
        field: &Field,
        items: &[Value],
    ) -> Result<Vec<FieldValue>, SchemeError> {
        items
            .iter()
            .map(|item| self.bind_element(kind, field, item))
            .collect()
    }

    fn bind_element(&self, kind: &Kind, field: &Field, item: &Value) -> Result<FieldValue, SchemeError> {
        let ty = item.value_type();
        if field.accepted().accepts(ty) {
            return Ok(match item {
                Value::Null => FieldValue::None,
                other => FieldValue::Value(other.clone()),
            });
        }
        match item {
            Value::Object(object) if field.is_structural() => {
                self.map_nested(kind, field, object).map(FieldValue::from)
            }
            Value::Array(inner) => self.unpack_list(kind, field, inner).map(FieldValue::List),
            _ => Err(self.mismatch(kind, field, ty)),
        }
    }

    fn map_nested(&self, owner: &Kind, field: &Field, object: &VObject) -> Result<Instance, SchemeError> {
        let targets = self.reference_targets(owner, field)?;
        let id = self.resolve_among(targets, object)?;
        trace!(
            owner = %owner.qualified_name(),
            field = %field.name(),
            "mapping nested record"
        );
        self.instantiate(id, object)
    }

    fn mismatch(&self, kind: &Kind, field: &Field, found: ValueType) -> SchemeError {
        SchemeError::TypeMismatch {
            kind: kind.qualified_name().to_owned(),
            field: field.name().to_owned(),
            expected: self.describe_expected(field),
            found,
        }
    }
}
