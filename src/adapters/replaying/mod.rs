//! Replaying adapters that serve recorded interactions.

pub mod clock;
pub mod task_api;

use std::sync::Mutex;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::api::ApiError;
use crate::cassette::replayer::CassetteReplayer;

pub use clock::ReplayingClock;
pub use task_api::ReplayingTaskApi;

/// Take the output of the next recorded interaction for `port`/`method`.
///
/// # Panics
///
/// Panics when the cassette has no interaction left for the pair.
pub(crate) fn next_output(replayer: &Mutex<CassetteReplayer>, port: &str, method: &str) -> Value {
    let mut replayer = replayer.lock().expect("replayer lock poisoned");
    replayer.next_interaction(port, method).output
}

/// Decode an output written by `recording::record_result`.
///
/// `{"Err": "text"}` is accepted as shorthand for an unknown-kind error,
/// which keeps hand-written cassettes short. An `Ok` value that does not
/// deserialize as `T` fails with a parse error, as the same body would over
/// the wire.
///
/// # Panics
///
/// Panics when the output is neither `{"Ok": ..}` nor `{"Err": ..}`.
pub(crate) fn replay_result<T: DeserializeOwned>(output: Value) -> Result<T, ApiError> {
    if let Some(ok) = output.get("Ok") {
        return serde_json::from_value(ok.clone())
            .map_err(|e| ApiError::parse(format!("unexpected response shape: {e}")));
    }
    match output.get("Err") {
        Some(Value::String(message)) => Err(ApiError::unknown(message.clone())),
        Some(err) => Err(serde_json::from_value(err.clone())
            .unwrap_or_else(|e| panic!("cassette Err value is not an ApiError: {e}"))),
        None => panic!("cassette output must be {{\"Ok\": ..}} or {{\"Err\": ..}}, got {output}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiErrorKind;
    use serde_json::json;

    #[test]
    fn decodes_ok() {
        let value: u32 = replay_result(json!({"Ok": 4})).unwrap();
        assert_eq!(value, 4);
    }

    #[test]
    fn decodes_structured_err() {
        let err = replay_result::<u32>(json!({"Err": {"kind": "transport", "message": "down"}}))
            .unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::Transport);
        assert_eq!(err.message, "down");
    }

    #[test]
    fn misshapen_ok_is_a_parse_error() {
        let err = replay_result::<u32>(json!({"Ok": "four"})).unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::Parse);
    }

    #[test]
    fn decodes_shorthand_err() {
        let err = replay_result::<u32>(json!({"Err": "boom"})).unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::Unknown);
        assert_eq!(err.to_string(), "boom");
    }

    #[test]
    #[should_panic(expected = "must be")]
    fn rejects_untagged_output() {
        let _ = replay_result::<u32>(json!(4));
    }
}
