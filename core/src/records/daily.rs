use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One validated day of reporting for a single location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub cumulative_positive: u64,
    /// Day-over-day delta. Reporting corrections can make this negative.
    pub new_positive: i64,
}

impl DailyRecord {
    pub fn new(date: NaiveDate, cumulative_positive: u64, new_positive: i64) -> Self {
        Self {
            date,
            cumulative_positive,
            new_positive,
        }
    }
}

/// Daily record as delivered by the upstream API, before validation.
///
/// Fields are kept loose so one odd value costs a single record instead of
/// the whole response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDailyRecord {
    #[serde(default)]
    pub date: Option<Value>,
    #[serde(default)]
    pub positive: Option<Value>,
    #[serde(default)]
    pub positive_increase: Option<Value>,
}

/// Why a [`RawDailyRecord`] could not become a [`DailyRecord`].
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum RecordDefect {
    #[error("missing field `{0}`")]
    MissingField(&'static str),
    #[error("unparsable date {0}")]
    InvalidDate(String),
    #[error("field `{field}` is not a valid count: {value}")]
    InvalidCount { field: &'static str, value: String },
}

impl RawDailyRecord {
    pub fn validate(&self) -> Result<DailyRecord, RecordDefect> {
        let date = self
            .date
            .as_ref()
            .ok_or(RecordDefect::MissingField("date"))
            .and_then(parse_date)?;
        let positive = self
            .positive
            .as_ref()
            .ok_or(RecordDefect::MissingField("positive"))?;
        let increase = self
            .positive_increase
            .as_ref()
            .ok_or(RecordDefect::MissingField("positiveIncrease"))?;

        let cumulative_positive = as_whole(positive)
            .and_then(|value| u64::try_from(value).ok())
            .ok_or_else(|| RecordDefect::InvalidCount {
                field: "positive",
                value: positive.to_string(),
            })?;
        let new_positive = as_whole(increase).ok_or_else(|| RecordDefect::InvalidCount {
            field: "positiveIncrease",
            value: increase.to_string(),
        })?;

        Ok(DailyRecord::new(date, cumulative_positive, new_positive))
    }
}

/// Accepts `20200301`, `"20200301"`, `"2020-03-01"` and full timestamps whose
/// first ten characters are a calendar date.
fn parse_date(value: &Value) -> Result<NaiveDate, RecordDefect> {
    let invalid = || RecordDefect::InvalidDate(value.to_string());
    match value {
        Value::Number(number) => {
            let packed = number.as_u64().ok_or_else(invalid)?;
            from_packed(packed).ok_or_else(invalid)
        }
        Value::String(text) => {
            let text = text.trim();
            if let Ok(packed) = text.parse::<u64>() {
                return from_packed(packed).ok_or_else(invalid);
            }
            text.get(..10)
                .and_then(|day| NaiveDate::parse_from_str(day, "%Y-%m-%d").ok())
                .ok_or_else(invalid)
        }
        _ => Err(invalid()),
    }
}

fn from_packed(packed: u64) -> Option<NaiveDate> {
    let year = i32::try_from(packed / 10_000).ok()?;
    let month = u32::try_from(packed / 100 % 100).ok()?;
    let day = u32::try_from(packed % 100).ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

fn as_whole(value: &Value) -> Option<i64> {
    if let Some(whole) = value.as_i64() {
        return Some(whole);
    }
    match value.as_f64() {
        Some(float) if float.fract() == 0.0 && float.abs() < i64::MAX as f64 => {
            Some(float as i64)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn raw_record_deserializes_upstream_shape() {
        let raw: RawDailyRecord = serde_json::from_value(json!({
            "date": 20200301,
            "state": "CA",
            "positive": 53,
            "positiveIncrease": 8,
            "dateChecked": "2020-03-01T21:00:00Z"
        }))
        .unwrap();

        let record = raw.validate().unwrap();
        assert_eq!(record, DailyRecord::new(day(2020, 3, 1), 53, 8));
    }

    #[test]
    fn validate_accepts_textual_dates() {
        for date in ["2020-03-04", "20200304", "2020-03-04T16:00:00Z"] {
            let raw = RawDailyRecord {
                date: Some(json!(date)),
                positive: Some(json!(1)),
                positive_increase: Some(json!(0)),
            };
            assert_eq!(raw.validate().unwrap().date, day(2020, 3, 4));
        }
    }

    #[test]
    fn validate_passes_negative_increase_through() {
        let raw = RawDailyRecord {
            date: Some(json!(20200310)),
            positive: Some(json!(90.0)),
            positive_increase: Some(json!(-4)),
        };
        let record = raw.validate().unwrap();
        assert_eq!(record.cumulative_positive, 90);
        assert_eq!(record.new_positive, -4);
    }

    #[test]
    fn validate_reports_missing_and_bad_fields() {
        let missing = RawDailyRecord {
            date: Some(json!(20200301)),
            positive: None,
            positive_increase: Some(json!(1)),
        };
        assert_eq!(
            missing.validate(),
            Err(RecordDefect::MissingField("positive"))
        );

        let bad_date = RawDailyRecord {
            date: Some(json!(20201340)),
            positive: Some(json!(1)),
            positive_increase: Some(json!(1)),
        };
        assert!(matches!(
            bad_date.validate(),
            Err(RecordDefect::InvalidDate(_))
        ));

        let negative_total = RawDailyRecord {
            date: Some(json!(20200301)),
            positive: Some(json!(-1)),
            positive_increase: Some(json!(1)),
        };
        assert!(matches!(
            negative_total.validate(),
            Err(RecordDefect::InvalidCount { field: "positive", .. })
        ));
    }
}
