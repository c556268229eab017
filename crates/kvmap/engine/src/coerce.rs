//! Value coercion
//!
//! The rule set is closed: a value is accepted as-is when its runtime type
//! is the declared type, and a string is parsed when the declared type is a
//! date. Everything else is not applicable.

use crate::error::SkipReason;
use kvmap_types::{ChronoDateParser, DateFormat, DateParser, TypeTag, Value};
use std::fmt;
use std::sync::Arc;

/// Outcome of coercing one value
#[derive(Debug, Clone, PartialEq)]
pub enum Coercion {
    Applicable(Value),
    NotApplicable(SkipReason),
}

impl Coercion {
    pub fn is_applicable(&self) -> bool {
        matches!(self, Coercion::Applicable(_))
    }
}

/// Coerces source values into declared field types.
#[derive(Clone)]
pub struct Coercer {
    parser: Arc<dyn DateParser>,
    date_format: DateFormat,
}

impl Coercer {
    pub fn new(date_format: DateFormat) -> Self {
        Self::with_parser(Arc::new(ChronoDateParser), date_format)
    }

    pub fn with_parser(parser: Arc<dyn DateParser>, date_format: DateFormat) -> Self {
        Self {
            parser,
            date_format,
        }
    }

    pub fn date_format(&self) -> &DateFormat {
        &self.date_format
    }

    pub fn coerce(&self, field: &str, declared: &TypeTag, value: &Value) -> Coercion {
        let found = value.type_tag();

        // Unknown declarations never accept a value, not even another Unknown
        if *declared != TypeTag::Unknown && found.as_ref() == Some(declared) {
            return Coercion::Applicable(value.clone());
        }

        if let (TypeTag::Date, Value::String(input)) = (declared, value) {
            return match self.parser.parse(input, &self.date_format) {
                Ok(date) => Coercion::Applicable(Value::Date(date)),
                Err(source) => Coercion::NotApplicable(SkipReason::DateParseFailure {
                    field: field.to_string(),
                    source,
                }),
            };
        }

        Coercion::NotApplicable(SkipReason::TypeMismatch {
            field: field.to_string(),
            expected: declared.clone(),
            found,
        })
    }
}

impl Default for Coercer {
    fn default() -> Self {
        Self::new(DateFormat::default())
    }
}

impl fmt::Debug for Coercer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Coercer")
            .field("date_format", &self.date_format)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use kvmap_types::DateParseError;
    use serde_json::json;

    fn jan_15() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap()
    }

    #[test]
    fn identity_match_passes_through() {
        let coercer = Coercer::default();
        assert_eq!(
            coercer.coerce("a", &TypeTag::Integer, &Value::Integer(5)),
            Coercion::Applicable(Value::Integer(5))
        );
        assert_eq!(
            coercer.coerce("d", &TypeTag::Date, &Value::Date(jan_15())),
            Coercion::Applicable(Value::Date(jan_15()))
        );
    }

    #[test]
    fn mismatches_are_not_applicable() {
        let coercer = Coercer::default();
        assert_eq!(
            coercer.coerce("a", &TypeTag::Integer, &Value::from("not a number")),
            Coercion::NotApplicable(SkipReason::TypeMismatch {
                field: "a".into(),
                expected: TypeTag::Integer,
                found: Some(TypeTag::String),
            })
        );
        // No numeric widening
        assert!(!coercer
            .coerce("f", &TypeTag::FloatingPoint, &Value::Integer(1))
            .is_applicable());
        assert!(!coercer
            .coerce("a", &TypeTag::Integer, &Value::Null)
            .is_applicable());
    }

    #[test]
    fn unknown_never_matches() {
        let coercer = Coercer::default();
        let composite = Value::Composite(json!({"nested": true}));
        assert!(!coercer
            .coerce("blob", &TypeTag::Unknown, &composite)
            .is_applicable());
        assert!(!coercer
            .coerce("blob", &TypeTag::String, &composite)
            .is_applicable());
    }

    #[test]
    fn string_to_date() {
        let coercer = Coercer::default();
        assert_eq!(
            coercer.coerce("b", &TypeTag::Date, &Value::from("2024-01-15T00:00:00Z")),
            Coercion::Applicable(Value::Date(jan_15()))
        );

        let invalid = coercer.coerce("b", &TypeTag::Date, &Value::from("soon"));
        assert!(matches!(
            invalid,
            Coercion::NotApplicable(SkipReason::DateParseFailure { ref field, .. }) if field == "b"
        ));
    }

    #[test]
    fn date_format_is_honoured() {
        let coercer = Coercer::new(DateFormat::DotNet);
        assert_eq!(
            coercer.coerce("b", &TypeTag::Date, &Value::from("/Date(1705276800000)/")),
            Coercion::Applicable(Value::Date(jan_15()))
        );
        assert!(!coercer
            .coerce("b", &TypeTag::Date, &Value::from("2024-01-15T00:00:00Z"))
            .is_applicable());
    }

    #[test]
    fn strings_only_become_dates() {
        let coercer = Coercer::default();
        assert!(!coercer
            .coerce("s", &TypeTag::String, &Value::Date(jan_15()))
            .is_applicable());
    }

    struct FixedParser;

    impl DateParser for FixedParser {
        fn parse(
            &self,
            input: &str,
            _format: &DateFormat,
        ) -> Result<DateTime<Utc>, DateParseError> {
            if input == "launch" {
                Ok(Utc.with_ymd_and_hms(1969, 7, 16, 13, 32, 0).unwrap())
            } else {
                Err(DateParseError::Empty)
            }
        }
    }

    #[test]
    fn custom_parser_is_used() {
        let coercer = Coercer::with_parser(Arc::new(FixedParser), DateFormat::Iso8601);
        assert!(coercer
            .coerce("b", &TypeTag::Date, &Value::from("launch"))
            .is_applicable());
        assert!(!coercer
            .coerce("b", &TypeTag::Date, &Value::from("2024-01-15"))
            .is_applicable());
    }
}
