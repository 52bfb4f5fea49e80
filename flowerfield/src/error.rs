use core::fmt;

use flowerfield_value::ValueType;

/// Suggestion for an input key that might have been misspelled.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSuggestion {
    /// The key from the input record
    pub unknown: String,
    /// The declared key it most resembles
    pub suggestion: String,
    /// Similarity score (0.0 to 1.0, higher is more similar)
    pub similarity: f64,
}

/// Errors raised while declaring kinds or mapping records onto them.
///
/// Declaration-time variants are configuration errors (see
/// [`SchemeError::is_configuration`]); the rest are reported per call and the
/// caller may retry with different input.
#[derive(Debug)]
pub enum SchemeError {
    /// No candidate kind shares a single key with the input record.
    NoMatchingScheme {
        /// The category or kind(s) that were searched
        scheme: String,
        /// The keys of the input record
        input_keys: Vec<String>,
        /// "Did you mean?" suggestions for the input keys
        suggestions: Vec<FieldSuggestion>,
    },

    /// A field was present with a value of a type it does not accept.
    TypeMismatch {
        /// Qualified name of the kind being mapped
        kind: String,
        /// Declared name of the field
        field: String,
        /// Human-readable description of what the field accepts
        expected: String,
        /// The type that was found instead
        found: ValueType,
    },

    /// A field's validator rejected its value.
    ValidationFailed {
        /// Qualified name of the kind being mapped
        kind: String,
        /// Declared name of the field
        field: String,
        /// The validator's message
        message: String,
    },

    /// Two kinds with the same name were declared under one category, or two
    /// categories share a name.
    DuplicateKind {
        /// The category, or `None` when the duplicate is itself a category
        category: Option<String>,
        /// The repeated name
        kind: String,
    },

    /// A kind declares the same key (field name or alias) twice.
    DuplicateField {
        /// Name of the kind being declared
        kind: String,
        /// The repeated key
        key: String,
    },

    /// A structural reference names no declared kind, or more than one.
    UnresolvedReference {
        /// Qualified name of the kind owning the field
        kind: String,
        /// Declared name of the field
        field: String,
        /// The name that failed to resolve
        name: String,
        /// Qualified names of every kind the name could mean (empty if none)
        candidates: Vec<String>,
    },

    /// A [`KindId`](crate::KindId) that this registry never issued.
    UnknownKind {
        /// The id's arena index
        index: usize,
    },

    /// A kind was declared under something that is not a category root.
    NotACategory {
        /// Qualified name of the offending target
        name: String,
    },

    /// The value handed to the mapper was not an object.
    NotARecord {
        /// The category or kind that was requested
        scheme: String,
        /// What was found instead
        found: ValueType,
    },

    /// [`Instance::set`](crate::Instance::set) was called with a key the kind
    /// does not declare.
    UnknownField {
        /// Qualified name of the kind
        kind: String,
        /// The key that was looked up
        key: String,
    },

    /// JSON text could not be parsed.
    #[cfg(feature = "json")]
    Json(serde_json::Error),
}

impl SchemeError {
    /// Returns `true` for declaration-time errors, which indicate a broken
    /// registry rather than bad input.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            SchemeError::DuplicateKind { .. }
                | SchemeError::DuplicateField { .. }
                | SchemeError::UnresolvedReference { .. }
                | SchemeError::NotACategory { .. }
                | SchemeError::UnknownKind { .. }
        )
    }

    /// Stable identifier for this kind of error.
    pub fn code(&self) -> &'static str {
        match self {
            SchemeError::NoMatchingScheme { .. } => "flowerfield::no_matching_scheme",
            SchemeError::TypeMismatch { .. } => "flowerfield::type_mismatch",
            SchemeError::ValidationFailed { .. } => "flowerfield::validation_failed",
            SchemeError::DuplicateKind { .. } => "flowerfield::duplicate_kind",
            SchemeError::DuplicateField { .. } => "flowerfield::duplicate_field",
            SchemeError::UnresolvedReference { .. } => "flowerfield::unresolved_reference",
            SchemeError::UnknownKind { .. } => "flowerfield::unknown_kind",
            SchemeError::NotACategory { .. } => "flowerfield::not_a_category",
            SchemeError::NotARecord { .. } => "flowerfield::not_a_record",
            SchemeError::UnknownField { .. } => "flowerfield::unknown_field",
            #[cfg(feature = "json")]
            SchemeError::Json(_) => "flowerfield::json",
        }
    }
}

impl fmt::Display for SchemeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemeError::NoMatchingScheme {
                scheme,
                input_keys,
                suggestions,
            } => {
                write!(f, "no kind of `{scheme}` matches the keys {input_keys:?}")?;
                for suggestion in suggestions {
                    write!(
                        f,
                        "\n  did you mean '{}' instead of '{}'?",
                        suggestion.suggestion, suggestion.unknown
                    )?;
                }
                Ok(())
            }
            SchemeError::TypeMismatch {
                kind,
                field,
                expected,
                found,
            } => write!(
                f,
                "field `{field}` of `{kind}` expects {expected}, found {found}"
            ),
            SchemeError::ValidationFailed {
                kind,
                field,
                message,
            } => write!(
                f,
                "field `{field}` of `{kind}` did not pass validation: {message}"
            ),
            SchemeError::DuplicateKind {
                category: Some(category),
                kind,
            } => write!(
                f,
                "kind `{kind}` is already declared in category `{category}`"
            ),
            SchemeError::DuplicateKind {
                category: None,
                kind,
            } => write!(f, "category `{kind}` is already declared"),
            SchemeError::DuplicateField { kind, key } => {
                write!(f, "kind `{kind}` declares the key `{key}` more than once")
            }
            SchemeError::UnresolvedReference {
                kind,
                field,
                name,
                candidates,
            } => {
                write!(f, "field `{field}` of `{kind}` references `{name}`, ")?;
                if candidates.is_empty() {
                    write!(f, "which is not a declared kind")
                } else {
                    write!(f, "which is ambiguous between {candidates:?}")
                }
            }
            SchemeError::UnknownKind { index } => {
                write!(f, "kind #{index} was not issued by this registry")
            }
            SchemeError::NotACategory { name } => {
                write!(f, "`{name}` is not a category root")
            }
            SchemeError::NotARecord { scheme, found } => {
                write!(f, "cannot map a {found} onto `{scheme}`: expected an object")
            }
            SchemeError::UnknownField { kind, key } => {
                write!(f, "`{kind}` has no field `{key}`")
            }
            #[cfg(feature = "json")]
            SchemeError::Json(err) => write!(f, "invalid JSON: {err}"),
        }
    }
}

impl core::error::Error for SchemeError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            #[cfg(feature = "json")]
            SchemeError::Json(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(feature = "json")]
impl From<serde_json::Error> for SchemeError {
    fn from(err: serde_json::Error) -> Self {
        SchemeError::Json(err)
    }
}

#[cfg(feature = "miette")]
impl miette::Diagnostic for SchemeError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(SchemeError::code(self)))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            SchemeError::NoMatchingScheme { suggestions, .. } if !suggestions.is_empty() => {
                let names: Vec<_> = suggestions.iter().map(|s| s.suggestion.as_str()).collect();
                Some(Box::new(format!("known keys include {names:?}")))
            }
            SchemeError::UnresolvedReference { candidates, .. } if !candidates.is_empty() => Some(
                Box::new("qualify the name as `Category::Kind` to pick one"),
            ),
            _ => None,
        }
    }
}
