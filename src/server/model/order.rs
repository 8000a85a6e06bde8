use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// A single column value of an `orders` row.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ColumnValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    /// exact decimal digits, kept as text so no precision is lost
    Decimal(String),
    Text(String),
    Date(NaiveDate),
    Timestamp(DateTime<Utc>),
    Json(serde_json::Value),
}

impl Serialize for ColumnValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            ColumnValue::Null => serializer.serialize_none(),
            ColumnValue::Bool(b) => serializer.serialize_bool(*b),
            ColumnValue::Int(i) => serializer.serialize_i64(*i),
            ColumnValue::Float(f) if f.is_finite() => serializer.serialize_f64(*f),
            ColumnValue::Float(_) => serializer.serialize_none(),
            ColumnValue::Decimal(s) | ColumnValue::Text(s) => serializer.serialize_str(s),
            ColumnValue::Date(d) => serializer.collect_str(&d.format("%Y-%m-%d")),
            ColumnValue::Timestamp(ts) => {
                serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            ColumnValue::Json(v) => v.serialize(serializer),
        }
    }
}

/// One row of the `orders` table, columns kept in the order the database reports them.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Record {
    columns: Vec<(String, ColumnValue)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, value: ColumnValue) {
        self.columns.push((name.into(), value));
    }

    #[cfg(test)]
    pub fn get(&self, name: &str) -> Option<&ColumnValue> {
        self.columns
            .iter()
            .find(|(column, _)| column == name)
            .map(|(_, value)| value)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.columns.len()
    }
}

impl<K: Into<String>> FromIterator<(K, ColumnValue)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, ColumnValue)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (name, value) in iter {
            record.push(name, value);
        }
        record
    }
}

impl Serialize for Record {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (name, value) in &self.columns {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
