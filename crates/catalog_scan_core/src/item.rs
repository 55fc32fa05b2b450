use std::collections::BTreeMap;

use std::str::FromStr;

use bigdecimal::BigDecimal;

/// A single table row. Field order is by name.
pub type Item = BTreeMap<String, ItemValue>;

/// Attribute value as held by the backing table.
///
/// Numbers stay exact decimals until serialization; sets and binary values are
/// carried as-is and rejected by the JSON encoder.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemValue {
    String(String),
    Number(BigDecimal),
    Bool(bool),
    Null,
    Binary(Vec<u8>),
    List(Vec<ItemValue>),
    Map(Item),
    StringSet(Vec<String>),
    NumberSet(Vec<BigDecimal>),
    BinarySet(Vec<Vec<u8>>),
}

impl ItemValue {
    /// Name of the value type as reported in serialization failures.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::String(_) => "str",
            Self::Number(_) => "Decimal",
            Self::Bool(_) => "bool",
            Self::Null => "NoneType",
            Self::Binary(_) => "Binary",
            Self::List(_) => "list",
            Self::Map(_) => "dict",
            Self::StringSet(_) | Self::NumberSet(_) | Self::BinarySet(_) => "set",
        }
    }
}

impl From<&str> for ItemValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for ItemValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

/// Parses a table number attribute into an exact decimal.
///
/// Accepts plain (`19.99`) and exponent (`1E+2`) forms of any precision.
pub fn parse_number(raw: &str) -> Result<BigDecimal, String> {
    BigDecimal::from_str(raw.trim())
        .map_err(|error| format!("invalid number attribute '{raw}': {error}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_and_exponent_numbers() {
        assert_eq!(
            parse_number("19.99").expect("plain number should parse"),
            BigDecimal::from_str("1999e-2").expect("reference should parse")
        );
        assert_eq!(
            parse_number("1E+2").expect("exponent number should parse"),
            BigDecimal::from(100_i64)
        );
        assert_eq!(
            parse_number("-2.5e-1").expect("negative exponent should parse"),
            BigDecimal::from_str("-0.25").expect("reference should parse")
        );
    }

    #[test]
    fn keeps_digits_beyond_twenty_eight() {
        let value =
            parse_number("1.00000000000000000000000000001").expect("long number should parse");
        assert_ne!(value, BigDecimal::from(1_i64));

        let (digits, scale) = parse_number("1E-130")
            .expect("tiny number should parse")
            .as_bigint_and_exponent();
        assert_eq!((digits.to_string(), scale), ("1".to_string(), 130));
    }

    #[test]
    fn rejects_non_numeric_text() {
        let error = parse_number("abc").expect_err("text should not parse");
        assert!(error.starts_with("invalid number attribute 'abc'"));
    }

    #[test]
    fn sets_report_set_type_name() {
        assert_eq!(ItemValue::StringSet(vec!["a".into()]).type_name(), "set");
        assert_eq!(ItemValue::NumberSet(Vec::new()).type_name(), "set");
        assert_eq!(ItemValue::Binary(vec![1]).type_name(), "Binary");
    }
}
