//! JSON wire encoding for scanned items.
//!
//! Two hooks cooperate here. `ItemValue`'s `Serialize` impl applies the numeric
//! rule (integral decimals become integer literals, everything else a float)
//! and rejects values that have no JSON form. `CompatFormatter` fixes the byte
//! layout: `", "` / `": "` separators, ASCII-only strings with `\uXXXX`
//! escapes, and shortest round-trip floats that switch to exponent notation
//! outside the `1e-4 .. 1e16` window.

use std::io;

use bigdecimal::{BigDecimal, Zero};
use serde::ser::{Error as _, Serialize, Serializer};
use serde_json::ser::Formatter;
use serde_json::value::RawValue;

use crate::item::{Item, ItemValue};

#[derive(Debug, Clone, PartialEq)]
pub enum EncodedNumber {
    /// Integer literal text, any magnitude.
    Integer(String),
    Float(f64),
}

/// Maps an exact decimal onto the JSON number it is written as.
///
/// Integrality is decided on the exact value; only fractional values pass
/// through `f64`.
pub fn encode_decimal(value: &BigDecimal) -> Result<EncodedNumber, String> {
    if value.is_zero() {
        return Ok(EncodedNumber::Integer("0".to_string()));
    }

    let (digits, scale) = value.normalized().as_bigint_and_exponent();
    if scale <= 0 {
        let zeros = usize::try_from(scale.unsigned_abs())
            .map_err(|_| format!("integer {value} is too large to write"))?;
        return Ok(EncodedNumber::Integer(format!(
            "{digits}{}",
            "0".repeat(zeros)
        )));
    }

    // `f64::from_str` rounds correctly from the full digit string.
    format!("{digits}e-{scale}")
        .parse::<f64>()
        .map(EncodedNumber::Float)
        .map_err(|error| format!("cannot represent {value} as a float: {error}"))
}

impl Serialize for ItemValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::String(value) => serializer.serialize_str(value),
            Self::Number(value) => match encode_decimal(value).map_err(S::Error::custom)? {
                EncodedNumber::Integer(literal) => RawValue::from_string(literal)
                    .map_err(S::Error::custom)?
                    .serialize(serializer),
                EncodedNumber::Float(number) => serializer.serialize_f64(number),
            },
            Self::Bool(value) => serializer.serialize_bool(*value),
            Self::Null => serializer.serialize_unit(),
            Self::List(values) => serializer.collect_seq(values),
            Self::Map(fields) => serializer.collect_map(fields),
            Self::Binary(_) | Self::StringSet(_) | Self::NumberSet(_) | Self::BinarySet(_) => {
                Err(S::Error::custom(format!(
                    "Object of type {} is not JSON serializable",
                    self.type_name()
                )))
            }
        }
    }
}

/// Serializes a scan result set into the response body.
pub fn encode_items(items: &[Item]) -> Result<String, serde_json::Error> {
    to_json_string(items)
}

pub fn to_json_string<T>(value: &T) -> Result<String, serde_json::Error>
where
    T: Serialize + ?Sized,
{
    let mut buffer = Vec::with_capacity(128);
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, CompatFormatter);
    value.serialize(&mut serializer)?;
    String::from_utf8(buffer).map_err(serde_json::Error::custom)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CompatFormatter;

impl Formatter for CompatFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }

    fn write_f32<W>(&mut self, writer: &mut W, value: f32) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(float_repr(f64::from(value)).as_bytes())
    }

    fn write_f64<W>(&mut self, writer: &mut W, value: f64) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(float_repr(value).as_bytes())
    }

    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let mut start = 0;
        for (index, ch) in fragment.char_indices() {
            if is_printable_ascii(ch) {
                continue;
            }
            if start < index {
                writer.write_all(fragment[start..index].as_bytes())?;
            }
            let mut units = [0u16; 2];
            for unit in ch.encode_utf16(&mut units) {
                write!(writer, "\\u{unit:04x}")?;
            }
            start = index + ch.len_utf8();
        }
        if start < fragment.len() {
            writer.write_all(fragment[start..].as_bytes())?;
        }
        Ok(())
    }
}

fn is_printable_ascii(ch: char) -> bool {
    (' '..='~').contains(&ch)
}

/// Shortest round-trip text for a float, in the layout the response body uses.
///
/// Fixed notation when the decimal point sits in `-3..=16` digits, exponent
/// notation otherwise (`1.5e-05`, `1e+16`). Fixed notation always carries a
/// fractional part.
pub fn float_repr(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        let text = if value > 0.0 { "Infinity" } else { "-Infinity" };
        return text.to_string();
    }

    let scientific = format!("{:e}", value.abs());
    let (mantissa, exponent) = scientific
        .split_once('e')
        .unwrap_or((scientific.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
    let decimal_point = exponent + 1;

    let mut out = String::with_capacity(digits.len() + 8);
    if value.is_sign_negative() {
        out.push('-');
    }

    if decimal_point <= -4 || decimal_point > 16 {
        let (lead, rest) = digits.split_at(1);
        out.push_str(lead);
        if !rest.is_empty() {
            out.push('.');
            out.push_str(rest);
        }
        let shown = decimal_point - 1;
        let sign = if shown < 0 { '-' } else { '+' };
        out.push_str(&format!("e{sign}{:02}", shown.abs()));
    } else if decimal_point <= 0 {
        out.push_str("0.");
        out.push_str(&"0".repeat(decimal_point.unsigned_abs() as usize));
        out.push_str(&digits);
    } else {
        let point = decimal_point as usize;
        if point < digits.len() {
            out.push_str(&digits[..point]);
            out.push('.');
            out.push_str(&digits[point..]);
        } else {
            out.push_str(&digits);
            out.push_str(&"0".repeat(point - digits.len()));
            out.push_str(".0");
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn decimal(raw: &str) -> BigDecimal {
        raw.parse().expect("test decimal should parse")
    }

    fn integer(literal: &str) -> Result<EncodedNumber, String> {
        Ok(EncodedNumber::Integer(literal.to_string()))
    }

    #[test]
    fn integral_decimals_encode_as_integers() {
        assert_eq!(encode_decimal(&decimal("3")), integer("3"));
        assert_eq!(encode_decimal(&decimal("3.00")), integer("3"));
        assert_eq!(encode_decimal(&decimal("-40")), integer("-40"));
        assert_eq!(encode_decimal(&decimal("-0.0")), integer("0"));
        assert_eq!(
            encode_decimal(&decimal("1E+30")),
            integer("1000000000000000000000000000000")
        );
        assert_eq!(
            encode_decimal(&decimal("123456789012345678901234567890")),
            integer("123456789012345678901234567890")
        );
    }

    #[test]
    fn fractional_decimals_encode_as_floats() {
        assert_eq!(
            encode_decimal(&decimal("19.99")),
            Ok(EncodedNumber::Float(19.99))
        );
        assert_eq!(
            encode_decimal(&decimal("2.50")),
            Ok(EncodedNumber::Float(2.5))
        );
        assert_eq!(
            encode_decimal(&decimal("-0.001")),
            Ok(EncodedNumber::Float(-0.001))
        );
        assert_eq!(
            encode_decimal(&decimal("1E-30")),
            Ok(EncodedNumber::Float(1e-30))
        );
    }

    #[test]
    fn tiny_fraction_past_float_precision_stays_a_float() {
        let value = decimal("1.00000000000000000000000000001");
        assert_eq!(encode_decimal(&value), Ok(EncodedNumber::Float(1.0)));

        let body = to_json_string(&ItemValue::Number(value)).expect("number should encode");
        assert_eq!(body, "1.0");
    }

    #[test]
    fn numeric_rule_applies_at_every_depth() {
        let nested = ItemValue::Map(Item::from([(
            "tiers".to_string(),
            ItemValue::List(vec![
                ItemValue::Number(decimal("10")),
                ItemValue::Number(decimal("10.5")),
            ]),
        )]));

        let body = to_json_string(&nested).expect("nested map should encode");
        assert_eq!(body, r#"{"tiers": [10, 10.5]}"#);
    }

    #[test]
    fn rejects_sets_and_binary_values() {
        let set = ItemValue::StringSet(vec!["red".to_string()]);
        let error = to_json_string(&set).expect_err("sets have no json form");
        assert_eq!(error.to_string(), "Object of type set is not JSON serializable");

        let nested_binary = ItemValue::List(vec![ItemValue::Binary(vec![0xde, 0xad])]);
        let error = to_json_string(&nested_binary).expect_err("binary has no json form");
        assert_eq!(
            error.to_string(),
            "Object of type Binary is not JSON serializable"
        );
    }

    #[test]
    fn uses_spaced_separators() {
        let body = to_json_string(&json!({"a": [1, 2], "b": null})).expect("value should encode");
        assert_eq!(body, r#"{"a": [1, 2], "b": null}"#);
        assert_eq!(to_json_string(&json!([])).expect("empty array"), "[]");
        assert_eq!(to_json_string(&json!({})).expect("empty object"), "{}");
    }

    #[test]
    fn escapes_everything_outside_printable_ascii() {
        let body = to_json_string("caf\u{e9} \u{1f600}\n\u{7f}\"").expect("string should encode");
        assert_eq!(body, r#""caf\u00e9 \ud83d\ude00\n\u007f\"""#);
    }

    #[test]
    fn float_repr_switches_notation_at_window_edges() {
        assert_eq!(float_repr(19.99), "19.99");
        assert_eq!(float_repr(1.0), "1.0");
        assert_eq!(float_repr(-0.5), "-0.5");
        assert_eq!(float_repr(0.0001), "0.0001");
        assert_eq!(float_repr(0.000015), "1.5e-05");
        assert_eq!(float_repr(1234567890123456.0), "1234567890123456.0");
        assert_eq!(float_repr(12345678901234567.5), "1.2345678901234568e+16");
        assert_eq!(float_repr(1e22), "1e+22");
    }
}
