//! Lenient field deserializers used on incoming record bodies, and the
//! number rendering used on the way out.
//!
//! Clients may send numbers as strings, strings as numbers and dates in a
//! handful of formats. Anything that cannot be cast is a deserialization
//! error; `null` and `""` mean "absent".

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serializer};
use serde_json::Value;

// Largest integer an f64 holds exactly
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
    Bool(bool),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DateInput {
    Millis(i64),
    FractionalMillis(f64),
    Text(String),
}

/// Number, numeric string, boolean (`true` is 1), empty string or null
pub fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match Option::<NumberOrText>::deserialize(deserializer)? {
        None => return Ok(None),
        Some(NumberOrText::Number(n)) => n,
        Some(NumberOrText::Bool(b)) => f64::from(u8::from(b)),
        Some(NumberOrText::Text(text)) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            trimmed
                .parse::<f64>()
                .map_err(|_| de::Error::custom(format!("cannot cast {:?} to a number", text)))?
        }
    };

    if !value.is_finite() {
        return Err(de::Error::custom("number must be finite"));
    }
    Ok(Some(value))
}

/// String, number, boolean or null
pub fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(deserializer)?.map(|scalar| match scalar {
        Scalar::Text(text) => text,
        Scalar::Integer(n) => n.to_string(),
        Scalar::Float(n) => n.to_string(),
        Scalar::Bool(b) => b.to_string(),
    }))
}

/// RFC 3339 timestamp, `YYYY-MM-DD`, epoch milliseconds (integral or not),
/// empty string or null
pub fn lenient_date<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<DateInput>::deserialize(deserializer)? {
        None => Ok(None),
        Some(DateInput::Millis(ms)) => from_millis(ms).map(Some),
        // sub-millisecond precision is truncated
        Some(DateInput::FractionalMillis(ms)) if ms.is_finite() => from_millis(ms.trunc() as i64).map(Some),
        Some(DateInput::FractionalMillis(ms)) => Err(de::Error::custom(format!("timestamp {} out of range", ms))),
        Some(DateInput::Text(text)) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            parse_date(trimmed)
                .map(Some)
                .ok_or_else(|| de::Error::custom(format!("cannot cast {:?} to a date", text)))
        }
    }
}

/// JSON value for `n`, written without a fractional part when it has none
/// (`8` rather than `8.0`)
pub fn number_value(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        // -0.0 renders as 0
        Value::from(n as i64)
    } else {
        Value::from(n)
    }
}

/// Serializer for optional numeric record fields, see [`number_value`]
pub fn serialize_number<S>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(n) => serializer.serialize_some(&number_value(*n)),
        None => serializer.serialize_none(),
    }
}

fn from_millis<E: de::Error>(ms: i64) -> Result<DateTime<Utc>, E> {
    Utc.timestamp_millis_opt(ms)
        .single()
        .ok_or_else(|| E::custom(format!("timestamp {} out of range", ms)))
}

fn parse_date(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    let midnight = NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()?
        .and_hms_opt(0, 0, 0)?;
    Some(Utc.from_utc_datetime(&midnight))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Sample {
        #[serde(default, deserialize_with = "lenient_f64")]
        number: Option<f64>,
        #[serde(default, deserialize_with = "lenient_string")]
        text: Option<String>,
        #[serde(default, deserialize_with = "lenient_date")]
        date: Option<DateTime<Utc>>,
    }

    fn sample(value: serde_json::Value) -> Result<Sample, serde_json::Error> {
        serde_json::from_value(value)
    }

    #[test]
    fn test_number_accepts_numbers_and_numeric_strings() {
        assert_eq!(sample(json!({"number": 12})).unwrap().number, Some(12.0));
        assert_eq!(sample(json!({"number": -5.25})).unwrap().number, Some(-5.25));
        assert_eq!(sample(json!({"number": " 7.5 "})).unwrap().number, Some(7.5));
    }

    #[test]
    fn test_number_treats_null_and_empty_as_absent() {
        assert_eq!(sample(json!({"number": null})).unwrap().number, None);
        assert_eq!(sample(json!({"number": ""})).unwrap().number, None);
        assert_eq!(sample(json!({})).unwrap().number, None);
    }

    #[test]
    fn test_number_rejects_garbage() {
        assert!(sample(json!({"number": "abc"})).is_err());
        assert!(sample(json!({"number": "NaN"})).is_err());
        assert!(sample(json!({"number": [1]})).is_err());
    }

    #[test]
    fn test_string_renders_scalars() {
        assert_eq!(sample(json!({"text": "main st"})).unwrap().text.as_deref(), Some("main st"));
        assert_eq!(sample(json!({"text": 12})).unwrap().text.as_deref(), Some("12"));
        assert_eq!(sample(json!({"text": 1.5})).unwrap().text.as_deref(), Some("1.5"));
        assert_eq!(sample(json!({"text": true})).unwrap().text.as_deref(), Some("true"));
        assert!(sample(json!({"text": {"nested": 1}})).is_err());
    }

    #[test]
    fn test_number_value_rendering() {
        assert_eq!(number_value(8.0).to_string(), "8");
        assert_eq!(number_value(-5.0).to_string(), "-5");
        assert_eq!(number_value(-0.0).to_string(), "0");
        assert_eq!(number_value(2.5).to_string(), "2.5");
        assert_eq!(number_value(1e300).to_string(), "1e300");
    }

    #[test]
    fn test_date_formats() {
        let rfc = sample(json!({"date": "2024-05-01T10:30:00+02:00"})).unwrap().date.unwrap();
        assert_eq!(rfc.to_rfc3339(), "2024-05-01T08:30:00+00:00");

        let day = sample(json!({"date": "2024-05-01"})).unwrap().date.unwrap();
        assert_eq!(day.to_rfc3339(), "2024-05-01T00:00:00+00:00");

        let millis = sample(json!({"date": 0})).unwrap().date.unwrap();
        assert_eq!(millis.timestamp(), 0);

        assert!(sample(json!({"date": "yesterday"})).is_err());
        assert_eq!(sample(json!({"date": null})).unwrap().date, None);
    }

    #[test]
    fn test_number_casts_booleans() {
        assert_eq!(sample(json!({"number": true})).unwrap().number, Some(1.0));
        assert_eq!(sample(json!({"number": false})).unwrap().number, Some(0.0));
    }

    #[test]
    fn test_date_accepts_fractional_millis() {
        let date = sample(json!({"date": 1718360000000.0})).unwrap().date.unwrap();
        assert_eq!(date.timestamp_millis(), 1_718_360_000_000);

        let date = sample(json!({"date": 1500.75})).unwrap().date.unwrap();
        assert_eq!(date.timestamp_millis(), 1500);

        assert!(sample(json!({"date": 1e300})).is_err());
    }
}
