//! The `{code, message, data}` wrapper returned by every endpoint.

use crate::FetchError;
use serde::de::{self, DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Status code carried inside an envelope.
///
/// The API is inconsistent about sending it as a number or a string, so
/// both `200` and `"200"` decode to the same value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct EnvelopeCode(pub u16);

impl EnvelopeCode {
    pub const OK: EnvelopeCode = EnvelopeCode(200);

    pub fn is_success(&self) -> bool {
        *self == Self::OK
    }
}

impl fmt::Display for EnvelopeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for EnvelopeCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u16),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Ok(EnvelopeCode(n)),
            Raw::Text(s) => s
                .trim()
                .parse()
                .map(EnvelopeCode)
                .map_err(|_| de::Error::custom(format!("invalid envelope code: {s:?}"))),
        }
    }
}

/// A decoded response envelope with an undecoded `data` payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub code: EnvelopeCode,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

impl Envelope {
    pub fn is_success(&self) -> bool {
        self.code.is_success()
    }

    /// Turn a non-success envelope into [`FetchError::Api`].
    pub fn error_for_code(self) -> Result<Self, FetchError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(FetchError::Api {
                code: self.code.0,
                message: self.message,
            })
        }
    }

    /// Check the code, then decode `data`.
    ///
    /// A missing `data` field decodes as JSON `null`, so `T = Option<_>`
    /// or `()` accept envelopes without a payload.
    pub fn into_data<T: DeserializeOwned>(self) -> Result<T, FetchError> {
        let envelope = self.error_for_code()?;
        serde_json::from_value(envelope.data).map_err(|e| FetchError::ParseError(e.to_string()))
    }
}
