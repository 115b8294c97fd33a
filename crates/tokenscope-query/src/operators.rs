//! Condition evaluation

use serde_json::Value;
use std::cmp::Ordering;
use tokenscope_registry::resolve_property;
use tokenscope_selector::{Condition, Operator};

/// How `>` and `<` turn text into numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NumericCoercion {
    /// Strip a known CSS unit suffix before parsing, so `"16px" > 12` holds
    #[default]
    UnitAware,
    /// Plain numeric parsing; unit-suffixed text never compares
    Strict,
}

/// Longest suffixes first so `rem` is not read as `em`
const UNIT_SUFFIXES: [&str; 10] = ["rem", "deg", "px", "em", "ms", "vh", "vw", "pt", "%", "s"];

/// Evaluate one condition against a record
///
/// A missing property fails every operator except `!=`.
pub fn evaluate(record: &Value, condition: &Condition, coercion: NumericCoercion) -> bool {
    let actual = resolve_property(record, &condition.property);
    let expected = condition.value.as_str();

    match condition.operator {
        Operator::Eq => strict_eq(actual, expected),
        Operator::NotEq => !strict_eq(actual, expected),
        Operator::Contains => match actual {
            Some(Value::String(s)) => s.contains(expected),
            Some(Value::Array(items)) => items.iter().any(|item| item.as_str() == Some(expected)),
            _ => false,
        },
        Operator::StartsWith => actual
            .and_then(Value::as_str)
            .is_some_and(|s| s.starts_with(expected)),
        Operator::EndsWith => actual
            .and_then(Value::as_str)
            .is_some_and(|s| s.ends_with(expected)),
        Operator::Gt => compare(actual, expected, coercion) == Some(Ordering::Greater),
        Operator::Lt => compare(actual, expected, coercion) == Some(Ordering::Less),
    }
}

/// All conditions hold
pub fn evaluate_all(record: &Value, conditions: &[Condition], coercion: NumericCoercion) -> bool {
    conditions
        .iter()
        .all(|condition| evaluate(record, condition, coercion))
}

/// Condition literals are always text, so only JSON strings can equal them
fn strict_eq(actual: Option<&Value>, expected: &str) -> bool {
    actual.and_then(Value::as_str) == Some(expected)
}

fn compare(actual: Option<&Value>, expected: &str, coercion: NumericCoercion) -> Option<Ordering> {
    let lhs = to_number(actual?, coercion)?;
    let rhs = parse_number(expected, coercion)?;
    lhs.partial_cmp(&rhs)
}

fn to_number(value: &Value, coercion: NumericCoercion) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_number(s, coercion),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Null => Some(0.0),
        Value::Array(_) | Value::Object(_) => None,
    }
}

pub(crate) fn parse_number(text: &str, coercion: NumericCoercion) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return Some(0.0);
    }

    let digits = match coercion {
        NumericCoercion::Strict => text,
        NumericCoercion::UnitAware => strip_unit(text),
    };

    digits
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
}

fn strip_unit(text: &str) -> &str {
    let lowered = text.to_ascii_lowercase();
    UNIT_SUFFIXES
        .iter()
        .find(|unit| lowered.ends_with(*unit))
        .map(|unit| &text[..text.len() - unit.len()])
        .unwrap_or(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cond(property: &str, operator: Operator, value: &str) -> Condition {
        Condition::new(property, operator, value)
    }

    #[test]
    fn test_strict_equality_is_text_only() {
        let record = json!({"name": "Button", "order": 3, "required": true});
        assert!(evaluate(&record, &cond("name", Operator::Eq, "Button"), NumericCoercion::Strict));
        assert!(!evaluate(&record, &cond("name", Operator::Eq, "button"), NumericCoercion::Strict));
        assert!(!evaluate(&record, &cond("order", Operator::Eq, "3"), NumericCoercion::Strict));
        assert!(!evaluate(&record, &cond("required", Operator::Eq, "true"), NumericCoercion::Strict));
    }

    #[test]
    fn test_not_equal_holds_for_missing_property() {
        let record = json!({"name": "Icon"});
        assert!(evaluate(&record, &cond("type", Operator::NotEq, "Button"), NumericCoercion::Strict));
        assert!(!evaluate(&record, &cond("name", Operator::NotEq, "Icon"), NumericCoercion::Strict));
    }

    #[test]
    fn test_contains_prefix_suffix() {
        let record = json!({"description": "Primary action button", "variants": ["solid", "ghost"]});
        let strict = NumericCoercion::Strict;
        assert!(evaluate(&record, &cond("description", Operator::Contains, "action"), strict));
        assert!(evaluate(&record, &cond("variants", Operator::Contains, "ghost"), strict));
        assert!(!evaluate(&record, &cond("variants", Operator::Contains, "gho"), strict));
        assert!(evaluate(&record, &cond("description", Operator::StartsWith, "Primary"), strict));
        assert!(evaluate(&record, &cond("description", Operator::EndsWith, "button"), strict));
        assert!(!evaluate(&record, &cond("missing", Operator::Contains, "x"), strict));
    }

    #[test]
    fn test_numeric_comparison() {
        let record = json!({"value": 16, "weight": "700"});
        let strict = NumericCoercion::Strict;
        assert!(evaluate(&record, &cond("value", Operator::Gt, "12"), strict));
        assert!(evaluate(&record, &cond("value", Operator::Lt, "20.5"), strict));
        assert!(!evaluate(&record, &cond("value", Operator::Gt, "16"), strict));
        assert!(evaluate(&record, &cond("weight", Operator::Gt, "400"), strict));
        assert!(!evaluate(&record, &cond("weight", Operator::Gt, "heavy"), strict));
    }

    #[test]
    fn test_unit_suffix_strict_never_compares() {
        let record = json!({"value": "16px"});
        assert!(!evaluate(&record, &cond("value", Operator::Gt, "12"), NumericCoercion::Strict));
        assert!(!evaluate(&record, &cond("value", Operator::Lt, "20"), NumericCoercion::Strict));
    }

    #[test]
    fn test_unit_suffix_unit_aware() {
        let record = json!({"value": "16px", "radius": "0.5rem", "duration": "150ms"});
        let aware = NumericCoercion::UnitAware;
        assert!(evaluate(&record, &cond("value", Operator::Gt, "12"), aware));
        assert!(evaluate(&record, &cond("value", Operator::Lt, "20px"), aware));
        assert!(evaluate(&record, &cond("radius", Operator::Lt, "1"), aware));
        assert!(evaluate(&record, &cond("duration", Operator::Gt, "100ms"), aware));
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("", NumericCoercion::Strict), Some(0.0));
        assert_eq!(parse_number(" 4 ", NumericCoercion::Strict), Some(4.0));
        assert_eq!(parse_number("50%", NumericCoercion::UnitAware), Some(50.0));
        assert_eq!(parse_number("1.5EM", NumericCoercion::UnitAware), Some(1.5));
        assert_eq!(parse_number("NaN", NumericCoercion::Strict), None);
        assert_eq!(parse_number("#fff", NumericCoercion::UnitAware), None);
    }

    #[test]
    fn test_all_conditions_conjoin() {
        let record = json!({"name": "IconButton", "type": "Icon"});
        let conditions = vec![
            cond("type", Operator::NotEq, "Button"),
            cond("name", Operator::StartsWith, "Icon"),
        ];
        assert!(evaluate_all(&record, &conditions, NumericCoercion::default()));
        assert!(evaluate_all(&record, &[], NumericCoercion::default()));
    }
}
