//! Built-in factors and factories.
//!
//! Base factors are tagged with their JSON Type Definition names so that a
//! [`TypeDescriptor`](crate::TypeDescriptor) built from them is JTD-aligned.
//! `number` and `int` are kept for schemas that do not care about widths.
//!
//! | tag | accepts |
//! |---|---|
//! | `boolean` | `true` / `false` |
//! | `string` | any string |
//! | `number` | any number |
//! | `int` | numbers with no fractional part |
//! | `timestamp` | RFC 3339 date-time strings |
//! | `float32`, `float64` | numbers within the float's range |
//! | `int8` .. `uint32` | integers within the width's range |
//!
//! Factories: [`range`], [`length`], [`pattern`] and [`one_of`].

use std::sync::OnceLock;

use regex::Regex;
use serde_json::{Number, Value};
use stillwater::Validation;

use super::{check, Check, Factor, FactorError, Factory, FactoryArgs};
use crate::error::Rejection;
use crate::registry::Validator;
use crate::validation::{value_type_name, Outcome};

const RFC3339: &str = r"^\d{4}-(0[1-9]|1[0-2])-(0[1-9]|[12]\d|3[01])[Tt]([01]\d|2[0-3]):[0-5]\d:([0-5]\d|60)(\.\d+)?([Zz]|[+-]([01]\d|2[0-3]):[0-5]\d)$";

/// Accepts booleans.
pub fn boolean() -> Factor {
    Factor::new("boolean", check_boolean)
}

/// Accepts strings.
pub fn string() -> Factor {
    Factor::new("string", check_string)
}

/// Accepts any number.
pub fn number() -> Factor {
    Factor::new("number", check_number)
}

/// Accepts numbers with no fractional part.
pub fn int() -> Factor {
    Factor::new("int", check_int)
}

/// Accepts RFC 3339 timestamps such as `1985-04-12T23:20:50.52Z`.
pub fn timestamp() -> Factor {
    Factor::new("timestamp", check_timestamp)
}

/// Accepts numbers representable as a finite `f32`.
pub fn float32() -> Factor {
    Factor::new("float32", check_float32)
}

/// Accepts any number.
pub fn float64() -> Factor {
    Factor::new("float64", check_float64)
}

/// Accepts integers in `-128..=127`.
pub fn int8() -> Factor {
    Factor::new("int8", check_int8)
}

/// Accepts integers in `0..=255`.
pub fn uint8() -> Factor {
    Factor::new("uint8", check_uint8)
}

/// Accepts integers in `-32768..=32767`.
pub fn int16() -> Factor {
    Factor::new("int16", check_int16)
}

/// Accepts integers in `0..=65535`.
pub fn uint16() -> Factor {
    Factor::new("uint16", check_uint16)
}

/// Accepts integers in the `i32` range.
pub fn int32() -> Factor {
    Factor::new("int32", check_int32)
}

/// Accepts integers in the `u32` range.
pub fn uint32() -> Factor {
    Factor::new("uint32", check_uint32)
}

/// Inclusive numeric range: `range(min, max)`.
///
/// Tagged `number`. Fails to build if `min > max`.
pub fn range() -> Factory {
    Factory::new("number", build_range)
}

/// Inclusive string length range in characters: `length(min, max)`.
///
/// Tagged `string`. Fails to build if `min > max`.
pub fn length() -> Factory {
    Factory::new("string", build_length)
}

/// Strings matching a regular expression: `pattern(regex)`.
///
/// Tagged `string`.
pub fn pattern() -> Factory {
    Factory::new("string", build_pattern)
}

/// Strings equal to one of the arguments: `one_of(a, b, ...)`.
///
/// Tagged `string`. Needs at least one argument.
pub fn one_of() -> Factory {
    Factory::new("string", build_one_of)
}

/// The entries of [`FactorRegistry::standard`](crate::FactorRegistry::standard).
///
/// Base checks are registered untagged so that each one's tag is its name.
pub(crate) fn standard_entries() -> Vec<(&'static str, Validator)> {
    vec![
        ("boolean", Validator::check(check_boolean)),
        ("string", Validator::check(check_string)),
        ("number", Validator::check(check_number)),
        ("int", Validator::check(check_int)),
        ("timestamp", Validator::check(check_timestamp)),
        ("float32", Validator::check(check_float32)),
        ("float64", Validator::check(check_float64)),
        ("int8", Validator::check(check_int8)),
        ("uint8", Validator::check(check_uint8)),
        ("int16", Validator::check(check_int16)),
        ("uint16", Validator::check(check_uint16)),
        ("int32", Validator::check(check_int32)),
        ("uint32", Validator::check(check_uint32)),
        ("range", Validator::factory(build_range).tagged("number")),
        ("length", Validator::factory(build_length).tagged("string")),
        ("pattern", Validator::factory(build_pattern).tagged("string")),
        ("one_of", Validator::factory(build_one_of).tagged("string")),
    ]
}

fn check_boolean(value: &Value) -> Outcome<Value> {
    match value {
        Value::Bool(_) => Validation::Success(value.clone()),
        other => Validation::Failure(type_mismatch("boolean", other)),
    }
}

fn check_string(value: &Value) -> Outcome<Value> {
    match value {
        Value::String(_) => Validation::Success(value.clone()),
        other => Validation::Failure(type_mismatch("string", other)),
    }
}

fn check_number(value: &Value) -> Outcome<Value> {
    match value {
        Value::Number(_) => Validation::Success(value.clone()),
        other => Validation::Failure(type_mismatch("number", other)),
    }
}

fn check_float64(value: &Value) -> Outcome<Value> {
    match value {
        Value::Number(_) => Validation::Success(value.clone()),
        other => Validation::Failure(type_mismatch("float64", other)),
    }
}

fn check_float32(value: &Value) -> Outcome<Value> {
    match value {
        Value::Number(n) => match n.as_f64() {
            Some(f) if f.abs() <= f64::from(f32::MAX) => Validation::Success(value.clone()),
            _ => Validation::Failure(out_of_range("float32", n)),
        },
        other => Validation::Failure(type_mismatch("float32", other)),
    }
}

fn check_int(value: &Value) -> Outcome<Value> {
    match value {
        Value::Number(n) if integral(n).is_some() => Validation::Success(value.clone()),
        Value::Number(n) => Validation::Failure(
            Rejection::invalid()
                .with_code("invalid_type")
                .with_expected("int")
                .with_got(n.to_string()),
        ),
        other => Validation::Failure(type_mismatch("int", other)),
    }
}

fn check_int8(value: &Value) -> Outcome<Value> {
    check_width(value, "int8", i8::MIN.into(), i8::MAX.into())
}

fn check_uint8(value: &Value) -> Outcome<Value> {
    check_width(value, "uint8", u8::MIN.into(), u8::MAX.into())
}

fn check_int16(value: &Value) -> Outcome<Value> {
    check_width(value, "int16", i16::MIN.into(), i16::MAX.into())
}

fn check_uint16(value: &Value) -> Outcome<Value> {
    check_width(value, "uint16", u16::MIN.into(), u16::MAX.into())
}

fn check_int32(value: &Value) -> Outcome<Value> {
    check_width(value, "int32", i32::MIN.into(), i32::MAX.into())
}

fn check_uint32(value: &Value) -> Outcome<Value> {
    check_width(value, "uint32", u32::MIN.into(), u32::MAX.into())
}

/// Checks that a value is an integer within `min..=max`.
fn check_width(value: &Value, tag: &str, min: i64, max: i64) -> Outcome<Value> {
    let n = match value {
        Value::Number(n) => n,
        other => return Validation::Failure(type_mismatch(tag, other)),
    };

    match integral(n) {
        Some(i) if i >= i128::from(min) && i <= i128::from(max) => {
            Validation::Success(value.clone())
        }
        Some(_) => Validation::Failure(out_of_range(tag, n)),
        None => Validation::Failure(
            Rejection::invalid()
                .with_code("invalid_type")
                .with_expected(tag)
                .with_got(n.to_string()),
        ),
    }
}

fn check_timestamp(value: &Value) -> Outcome<Value> {
    let s = match value.as_str() {
        Some(s) => s,
        None => return Validation::Failure(type_mismatch("timestamp", value)),
    };

    match timestamp_regex() {
        Some(re) if re.is_match(s) => Validation::Success(value.clone()),
        _ => Validation::Failure(
            Rejection::invalid()
                .with_code("invalid_format")
                .with_expected("RFC 3339 timestamp")
                .with_got(s),
        ),
    }
}

/// The compiled RFC 3339 pattern, or `None` if it failed to compile.
fn timestamp_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();

    RE.get_or_init(|| match Regex::new(RFC3339) {
        Ok(re) => Some(re),
        Err(e) => {
            tracing::error!(error = %e, "timestamp pattern failed to compile");
            None
        }
    })
    .as_ref()
}

fn build_range(args: &FactoryArgs<'_>) -> Result<Check, FactorError> {
    args.expect_len(2)?;
    let min = args.number(0)?;
    let max = args.number(1)?;
    if min > max {
        return Err(args.invalid(1, format!("maximum {} is below minimum {}", max, min)));
    }

    Ok(check(move |value| match value {
        Value::Number(n) => match n.as_f64() {
            Some(f) if f >= min && f <= max => Validation::Success(value.clone()),
            _ => Validation::Failure(
                Rejection::invalid()
                    .with_code("out_of_range")
                    .with_expected(format!("number in {}..={}", min, max))
                    .with_got(n.to_string()),
            ),
        },
        other => Validation::Failure(type_mismatch("number", other)),
    }))
}

fn build_length(args: &FactoryArgs<'_>) -> Result<Check, FactorError> {
    args.expect_len(2)?;
    let min = args.unsigned(0)?;
    let max = args.unsigned(1)?;
    if min > max {
        return Err(args.invalid(1, format!("maximum {} is below minimum {}", max, min)));
    }

    Ok(check(move |value| match value.as_str() {
        Some(s) => {
            let len = s.chars().count() as u64;
            if len >= min && len <= max {
                Validation::Success(value.clone())
            } else {
                Validation::Failure(
                    Rejection::invalid()
                        .with_code("length")
                        .with_expected(format!("length in {}..={}", min, max))
                        .with_got(len.to_string()),
                )
            }
        }
        None => Validation::Failure(type_mismatch("string", value)),
    }))
}

fn build_pattern(args: &FactoryArgs<'_>) -> Result<Check, FactorError> {
    args.expect_len(1)?;
    let source = args.string(0)?;
    let regex = Regex::new(source).map_err(|e| FactorError::Pattern {
        pattern: source.to_string(),
        source: e,
    })?;

    Ok(check(move |value| match value.as_str() {
        Some(s) if regex.is_match(s) => Validation::Success(value.clone()),
        Some(s) => Validation::Failure(
            Rejection::invalid()
                .with_code("pattern")
                .with_expected(format!("match for /{}/", regex.as_str()))
                .with_got(s),
        ),
        None => Validation::Failure(type_mismatch("string", value)),
    }))
}

fn build_one_of(args: &FactoryArgs<'_>) -> Result<Check, FactorError> {
    if args.is_empty() {
        return Err(FactorError::MissingArgument {
            factory: "one_of".to_string(),
            index: 0,
        });
    }
    let allowed = args.strings()?;

    Ok(check(move |value| match value.as_str() {
        Some(s) if allowed.iter().any(|a| a == s) => Validation::Success(value.clone()),
        Some(s) => Validation::Failure(
            Rejection::invalid()
                .with_code("not_allowed")
                .with_expected(format!("one of {}", allowed.join(", ")))
                .with_got(s),
        ),
        None => Validation::Failure(type_mismatch("string", value)),
    }))
}

/// The integer a number holds, if it has no fractional part.
fn integral(n: &Number) -> Option<i128> {
    if let Some(i) = n.as_i64() {
        return Some(i.into());
    }
    if let Some(u) = n.as_u64() {
        return Some(u.into());
    }
    n.as_f64()
        .filter(|f| f.is_finite() && f.fract() == 0.0)
        // Saturates past the i128 range, which still lies outside every width.
        .map(|f| f as i128)
}

fn type_mismatch(expected: &str, got: &Value) -> Rejection {
    Rejection::invalid()
        .with_code("invalid_type")
        .with_expected(expected)
        .with_got(value_type_name(got))
}

fn out_of_range(tag: &str, n: &Number) -> Rejection {
    Rejection::invalid()
        .with_code("out_of_range")
        .with_expected(format!("{} range", tag))
        .with_got(n.to_string())
}
