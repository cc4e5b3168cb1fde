//! Decoding of `42` event bodies.
//!
//! Live updates arrive double-encoded: the event payload holds a string under
//! `ActiveMQMessage` which is itself JSON, and the object it decodes to carries
//! the `MLU` record.
//!
//! ```text
//! ["message", {"ActiveMQMessage": "{\"MLU\":{\"CPT\":1,...}}"}]
//! ```

use serde::Deserialize as _;
use serde_json::Value;

use super::error::DecodeError;
use super::types::response::MatchLiveUpdate;

/// Payload key holding the wrapped message.
pub const WRAPPED_MESSAGE_KEY: &str = "ActiveMQMessage";
const MATCH_LIVE_UPDATE_KEY: &str = "MLU";

/// A decoded event body.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    /// Event name, first element of the body array
    pub event: String,
    /// The projected live update, if the payload carried one
    pub update: Option<MatchLiveUpdate>,
}

/// Decodes the body of a `42` frame.
///
/// Payloads without a wrapped message, or whose wrapped message has no `MLU`
/// object, decode to an [`Envelope`] without an update.
///
/// # Errors
///
/// Returns [`DecodeError::Json`] if the body, the wrapped message or the `MLU`
/// record is malformed, and [`DecodeError::Shape`] if the body is not an
/// `[event, payload, ...]` array.
pub fn decode(body: &str) -> Result<Envelope, DecodeError> {
    let value: Value = serde_json::from_str(body)?;

    let Value::Array(mut items) = value else {
        return Err(DecodeError::Shape("event body is not an array".to_owned()));
    };
    if items.len() < 2 {
        return Err(DecodeError::Shape(format!(
            "expected [event, payload], got {} element(s)",
            items.len()
        )));
    }

    let payload = items.swap_remove(1);
    let Value::String(event) = items.swap_remove(0) else {
        return Err(DecodeError::Shape("event name is not a string".to_owned()));
    };

    let update = match payload.get(WRAPPED_MESSAGE_KEY) {
        Some(Value::String(wrapped)) => {
            let inner: Value = serde_json::from_str(wrapped)?;
            project(&inner)?
        }
        Some(inner @ Value::Object(_)) => project(inner)?,
        Some(_) | None => None,
    };

    Ok(Envelope { event, update })
}

fn project(inner: &Value) -> Result<Option<MatchLiveUpdate>, DecodeError> {
    match inner.get(MATCH_LIVE_UPDATE_KEY) {
        Some(mlu) => Ok(Some(MatchLiveUpdate::deserialize(mlu)?)),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn wrapped(inner: &Value) -> String {
        json!(["message", { WRAPPED_MESSAGE_KEY: inner.to_string() }]).to_string()
    }

    #[test]
    fn projects_double_encoded_update() {
        let body = wrapped(&json!({
            "MLU": {"CPT": 1, "CR": 2, "PSID": 3, "TSID": 4, "SCH": 0, "SCA": 0}
        }));

        let envelope = decode(&body).unwrap();
        let update = envelope.update.unwrap();

        assert_eq!(envelope.event, "message");
        assert_eq!(update.cpt, json!(1));
        assert_eq!(update.tsid, json!(4));
        assert!(update.t.is_empty());
        assert_eq!(update.eid, "?");
        assert_eq!(update.en, "?");
    }

    #[test]
    fn null_identifiers_still_project_an_update() {
        let body = wrapped(&json!({
            "MLU": {"CPT": 1, "CR": 2, "PSID": 3, "TSID": 4, "SCH": 1, "SCA": 0, "EID": null, "EN": null}
        }));

        let update = decode(&body).unwrap().update.unwrap();

        assert_eq!(update.sch, json!(1));
        assert_eq!(update.eid, "?");
        assert_eq!(update.en, "?");
    }

    #[test]
    fn payload_without_wrapped_message_has_no_update() {
        let envelope = decode(r#"["heartbeat",{"ts":1}]"#).unwrap();

        assert_eq!(envelope.event, "heartbeat");
        assert_eq!(envelope.update, None);
    }

    #[test]
    fn wrapped_message_without_mlu_has_no_update() {
        let envelope = decode(&wrapped(&json!({"Other": {}}))).unwrap();

        assert_eq!(envelope.update, None);
    }

    #[test]
    fn already_decoded_wrapped_message_is_accepted() {
        let body = json!(["message", { WRAPPED_MESSAGE_KEY: {
            "MLU": {"CPT": 1, "CR": 2, "PSID": 3, "TSID": 4, "SCH": 2, "SCA": 1, "EID": "e", "EN": "n"}
        }}])
        .to_string();

        let update = decode(&body).unwrap().update.unwrap();
        assert_eq!(update.sch, json!(2));
        assert_eq!(update.eid, "e");
    }

    #[test]
    fn malformed_json_is_decode_error() {
        assert!(matches!(decode("[\"message\","), Err(DecodeError::Json(_))));
        assert!(matches!(
            decode(r#"["message",{"ActiveMQMessage":"{not json"}]"#),
            Err(DecodeError::Json(_))
        ));
    }

    #[test]
    fn incomplete_mlu_is_decode_error() {
        let body = wrapped(&json!({"MLU": {"CPT": 1}}));

        assert!(matches!(decode(&body), Err(DecodeError::Json(_))));
    }

    #[test]
    fn wrong_shapes_are_decode_errors() {
        assert!(matches!(decode("{}"), Err(DecodeError::Shape(_))));
        assert!(matches!(decode(r#"["only"]"#), Err(DecodeError::Shape(_))));
        assert!(matches!(decode("[1, {}]"), Err(DecodeError::Shape(_))));
    }
}
