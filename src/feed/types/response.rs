use bon::Builder;
use serde::{Deserialize, Deserializer, Serialize};
use serde_with::As;

use crate::serde_helpers::StringFromAny;
use crate::types::Value;

/// Current score and clock state of a match, as carried in the `MLU` object of
/// a wrapped event payload.
///
/// The scalar fields are passed through untyped; the feed is not consistent about
/// numbers versus numeric strings.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder)]
pub struct MatchLiveUpdate {
    /// Current period time
    #[serde(rename = "CPT")]
    pub cpt: Value,
    #[serde(rename = "CR")]
    pub cr: Value,
    /// Period/state identifier
    #[serde(rename = "PSID")]
    pub psid: Value,
    #[serde(rename = "TSID")]
    pub tsid: Value,
    /// Home score
    #[serde(rename = "SCH")]
    pub sch: Value,
    /// Away score
    #[serde(rename = "SCA")]
    pub sca: Value,
    #[serde(rename = "T", default)]
    #[builder(default)]
    pub t: Vec<Value>,
    #[serde(rename = "EID", default = "unknown", deserialize_with = "identifier")]
    #[builder(default = unknown(), into)]
    pub eid: String,
    #[serde(rename = "EN", default = "unknown", deserialize_with = "identifier")]
    #[builder(default = unknown(), into)]
    pub en: String,
}

fn unknown() -> String {
    "?".to_owned()
}

/// A string or number; `null` reads as [`unknown`].
fn identifier<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = As::<Option<StringFromAny>>::deserialize(deserializer)?;

    Ok(value.unwrap_or_else(unknown))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn missing_identifiers_default_to_question_mark() {
        let update: MatchLiveUpdate = serde_json::from_value(
            json!({"CPT": 1, "CR": 2, "PSID": 3, "TSID": 4, "SCH": 0, "SCA": 0}),
        )
        .unwrap();

        assert!(update.t.is_empty());
        assert_eq!(update.eid, "?");
        assert_eq!(update.en, "?");
    }

    #[test]
    fn null_identifiers_read_as_question_mark() {
        let update: MatchLiveUpdate = serde_json::from_value(json!({
            "CPT": "12:00", "CR": 1, "PSID": 2, "TSID": 3, "SCH": 0, "SCA": 0,
            "EID": null, "EN": null
        }))
        .unwrap();

        assert_eq!(update.eid, "?");
        assert_eq!(update.en, "?");
        assert_eq!(update.cpt, json!("12:00"));
    }

    #[test]
    fn numeric_identifiers_become_strings() {
        let update: MatchLiveUpdate = serde_json::from_value(json!({
            "CPT": "45:00", "CR": 1, "PSID": 2, "TSID": 3, "SCH": 1, "SCA": 2,
            "T": [{"x": 1}], "EID": 31234567, "EN": "Home v Away"
        }))
        .unwrap();

        assert_eq!(update.cpt, json!("45:00"));
        assert_eq!(update.t.len(), 1);
        assert_eq!(update.eid, "31234567");
        assert_eq!(update.en, "Home v Away");
    }

    #[test]
    fn builder_defaults_match_decoder() {
        let update = MatchLiveUpdate::builder()
            .cpt(json!(1))
            .cr(json!(2))
            .psid(json!(3))
            .tsid(json!(4))
            .sch(json!(0))
            .sca(json!(0))
            .build();

        assert_eq!(update.eid, "?");
        assert!(update.t.is_empty());
    }
}
