use chrono::NaiveDate;

use serde::Deserialize;
use serde::Serialize;

use std::sync::Arc;

/// The struct used for storing a single observation on the disk. A tracker is
/// nothing more than the set of records carrying its name; upsert keeps at
/// most one record per `(name, day)` pair.
#[derive(PartialEq, PartialOrd, Debug, Serialize, Deserialize, Clone)]
pub struct RecordEntity {
    pub name: Arc<str>,
    #[serde(with = "day_ser")]
    pub day: NaiveDate,
    pub value: f64,
}

impl RecordEntity {
    pub fn new(name: impl Into<Arc<str>>, day: NaiveDate, value: f64) -> Self {
        Self {
            name: name.into(),
            day,
            value,
        }
    }
}

mod day_ser {
    use chrono::NaiveDate;
    use serde::{self, Deserialize, Deserializer, Serializer};

    const DAY_FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S>(day: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&day.format(DAY_FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NaiveDate::parse_from_str(&s, DAY_FORMAT).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::RecordEntity;

    #[test]
    fn test_day_is_stored_as_plain_date() {
        let record = RecordEntity::new(
            "weight",
            NaiveDate::from_ymd_opt(2024, 4, 5).unwrap(),
            81.4,
        );
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"2024-04-05\""), "{json}");
        assert_eq!(serde_json::from_str::<RecordEntity>(&json).unwrap(), record);
    }
}
