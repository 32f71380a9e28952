//! Records, searchable field specifications and per-record scoring.
//!
//! A [`Record`] is anything that can hand out named string fields. A
//! [`FieldSpec`] names one such field and attaches a weight, a display
//! category for suggestions, and whether the field holds a place name.
//!
//! [`RecordMatch`] captures the best-scoring field of one record against a
//! prepared query.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::normalize::prepare;
use crate::options::SearchOptions;
use crate::ranking::{MatchType, PreparedQuery, Strategy, match_field};

/// Read access to a record's named text fields.
///
/// Missing fields and non-text values are reported as `None`; the engine
/// treats them the same as an empty string.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use collegematch::Record;
///
/// let mut row = HashMap::new();
/// row.insert("name".to_owned(), "AIIMS".to_owned());
/// assert_eq!(row.field("name"), Some("AIIMS"));
/// assert_eq!(row.field("city"), None);
/// ```
pub trait Record {
    /// The value of field `name`, if present.
    fn field(&self, name: &str) -> Option<&str>;
}

impl<T: Record + ?Sized> Record for &T {
    fn field(&self, name: &str) -> Option<&str> {
        (**self).field(name)
    }
}

impl Record for HashMap<String, String> {
    fn field(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

impl Record for BTreeMap<String, String> {
    fn field(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

/// JSON objects expose their string-valued members. Numbers, arrays and
/// nested objects are not searchable text and read as missing.
impl Record for serde_json::Map<String, serde_json::Value> {
    fn field(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(serde_json::Value::as_str)
    }
}

/// A college record as found in the bundled dataset shape.
///
/// Every field is optional; absent fields never match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct College {
    /// Institution name.
    #[serde(default)]
    pub name: Option<String>,
    /// City or town.
    #[serde(default)]
    pub city: Option<String>,
    /// State or union territory.
    #[serde(default)]
    pub state: Option<String>,
    /// District.
    #[serde(default)]
    pub district: Option<String>,
    /// Institution type, such as "Medical" or "Dental".
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    /// Ownership, such as "Government" or "Private".
    #[serde(default, alias = "management_type")]
    pub management_type: Option<String>,
}

impl Record for College {
    fn field(&self, name: &str) -> Option<&str> {
        let value = match name {
            "name" => &self.name,
            "city" => &self.city,
            "state" => &self.state,
            "district" => &self.district,
            "type" => &self.kind,
            "management_type" | "managementType" => &self.management_type,
            _ => return None,
        };
        value.as_deref()
    }
}

fn default_weight() -> f64 {
    1.0
}

/// One searchable field.
///
/// # Examples
///
/// ```
/// use collegematch::FieldSpec;
///
/// let city = FieldSpec::new("city", 2.0).category("city").location(true);
/// assert_eq!(city.name, "city");
/// assert!(city.location);
///
/// // Category defaults to the field name.
/// assert_eq!(FieldSpec::new("state", 2.0).category, "state");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Name passed to [`Record::field`].
    pub name: String,
    /// Multiplier applied to the base score of matches in this field.
    #[serde(default = "default_weight")]
    pub weight: f64,
    /// Suggestion category reported for values of this field. Empty means
    /// "same as `name`".
    #[serde(default)]
    pub category: String,
    /// Whether location-alias matching applies to this field.
    #[serde(default)]
    pub location: bool,
}

impl FieldSpec {
    /// A non-location field whose category is its name.
    pub fn new(name: impl Into<String>, weight: f64) -> Self {
        let name = name.into();
        Self {
            category: name.clone(),
            name,
            weight,
            location: false,
        }
    }

    /// Set the suggestion category.
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Mark the field as holding a place name.
    pub fn location(mut self, location: bool) -> Self {
        self.location = location;
        self
    }

    /// The category, falling back to the field name when unset.
    pub fn category_or_name(&self) -> &str {
        if self.category.is_empty() { &self.name } else { &self.category }
    }
}

/// The best field match of one record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecordMatch {
    /// Weighted score of the winning field.
    pub score: f64,
    /// Strategy that matched the winning field.
    pub match_type: MatchType,
    /// Index of the winning field in the field list.
    pub field_index: usize,
}

/// Score every field of `record` and keep the best.
///
/// Each present, non-empty field is normalized (into `buf`) and run through
/// the strategy cascade. The field score is the base score times the field
/// weight. When two fields tie, the one listed first wins, since later
/// fields only replace the best on a strictly greater score.
///
/// Returns `None` when no field matched.
pub(crate) fn best_field_match<R: Record + ?Sized>(
    record: &R,
    fields: &[FieldSpec],
    q: &PreparedQuery<'_>,
    order: &[Strategy],
    options: &SearchOptions,
    fold: bool,
    buf: &mut String,
) -> Option<RecordMatch> {
    let mut best: Option<RecordMatch> = None;

    for (field_index, spec) in fields.iter().enumerate() {
        let Some(raw) = record.field(&spec.name) else {
            continue;
        };
        prepare(raw, fold, buf);
        if buf.is_empty() {
            continue;
        }

        let Some(m) = match_field(order, q, buf, spec.location, options) else {
            continue;
        };
        let score = m.base * spec.weight;
        if best.is_none_or(|b| score > b.score) {
            best = Some(RecordMatch {
                score,
                match_type: m.match_type,
                field_index,
            });
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;

    fn college(name: &str, city: &str, state: &str) -> College {
        College {
            name: Some(name.to_owned()),
            city: Some(city.to_owned()),
            state: Some(state.to_owned()),
            ..College::default()
        }
    }

    fn best(record: &impl Record, query: &str) -> Option<RecordMatch> {
        let config = EngineConfig::default();
        let options = SearchOptions::default();
        let q = PreparedQuery::new(query, &options, &config).unwrap();
        let mut buf = String::new();
        best_field_match(
            record,
            &config.fields,
            &q,
            &config.strategy_order,
            &options,
            config.fold_diacritics,
            &mut buf,
        )
    }

    // --- Record impls ---

    #[test]
    fn college_fields_by_name() {
        let c = College {
            kind: Some("Medical".to_owned()),
            management_type: Some("Government".to_owned()),
            ..college("AIIMS", "New Delhi", "Delhi")
        };
        assert_eq!(c.field("type"), Some("Medical"));
        assert_eq!(c.field("management_type"), Some("Government"));
        assert_eq!(c.field("district"), None);
        assert_eq!(c.field("unknown"), None);
    }

    #[test]
    fn college_deserializes_dataset_shape() {
        let c: College = serde_json::from_str(
            r#"{"name": "JIPMER", "city": "Puducherry", "type": "Medical", "managementType": "Central"}"#,
        )
        .unwrap();
        assert_eq!(c.kind.as_deref(), Some("Medical"));
        assert_eq!(c.management_type.as_deref(), Some("Central"));
        assert_eq!(c.state, None);
    }

    #[test]
    fn json_object_reads_strings_only() {
        let value: serde_json::Value = serde_json::json!({"name": "IIT", "rank": 3});
        let obj = value.as_object().unwrap();
        assert_eq!(obj.field("name"), Some("IIT"));
        assert_eq!(obj.field("rank"), None);
    }

    #[test]
    fn reference_forwards() {
        let c = college("AIIMS", "Delhi", "Delhi");
        let r = &c;
        assert_eq!(Record::field(&r, "name"), Some("AIIMS"));
    }

    // --- FieldSpec ---

    #[test]
    fn field_spec_deserialize_defaults() {
        let spec: FieldSpec = serde_json::from_str(r#"{"name": "district"}"#).unwrap();
        assert_eq!(spec.weight, 1.0);
        assert!(!spec.location);
        assert_eq!(spec.category_or_name(), "district");
    }

    // --- best_field_match ---

    #[test]
    fn weight_decides_between_fields() {
        // Name word-start: 70 x 3 = 210. State exact: 100 x 2 = 200.
        let m = best(&college("Delhi Technological University", "Rohini", "Delhi"), "delhi").unwrap();
        assert_eq!(m.score, 210.0);
        assert_eq!(m.match_type, MatchType::WordStart);
        assert_eq!(m.field_index, 0);
    }

    #[test]
    fn first_field_wins_ties() {
        // City and state both exact at weight 2.
        let m = best(&college("Institute of Nursing", "Pune", "Pune"), "pune").unwrap();
        assert_eq!(m.field_index, 1);
        assert_eq!(m.score, 200.0);
    }

    #[test]
    fn missing_and_blank_fields_are_skipped() {
        let c = College {
            name: Some("   ".to_owned()),
            ..College::default()
        };
        assert_eq!(best(&c, "anything"), None);
    }

    #[test]
    fn no_match_returns_none() {
        assert_eq!(best(&college("Zeta", "Qwerty", "Xyzzy"), "mbbs"), None);
    }
}
