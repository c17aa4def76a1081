//! Result types returned to the caller.
//!
//! A result parsed from the endpoint's response remembers the JSON it came
//! from and serializes back to exactly that value, nested unknown keys and
//! explicit `null`s included. Editing the typed fields of a parsed result
//! does not change how it serializes.

use crate::error::UploadError;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// Outcome of an upload, as reported by the remote endpoint.
///
/// Only `success` is required. Fields the endpoint sends beyond the known
/// ones are kept in `extra`.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadResult {
    pub success: bool,
    pub folder_id: Option<String>,
    pub folder_url: Option<String>,
    pub uploads: Option<Vec<StoredFile>>,
    pub message: Option<String>,
    pub error: Option<String>,

    /// Set on the fallback receipt built when the response was not JSON.
    /// Never sent by the endpoint.
    pub synthesized: bool,

    pub extra: Map<String, Value>,

    /// Body this result was parsed from; `None` when built locally.
    pub(crate) raw: Option<Value>,
}

/// Wire shape of [`UploadResult`].
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResultFields {
    success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    folder_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    folder_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    uploads: Option<Vec<StoredFile>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl<'de> Deserialize<'de> for UploadResult {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        let fields: ResultFields = serde_json::from_value(raw.clone()).map_err(D::Error::custom)?;
        Ok(Self {
            success: fields.success,
            folder_id: fields.folder_id,
            folder_url: fields.folder_url,
            uploads: fields.uploads,
            message: fields.message,
            error: fields.error,
            synthesized: false,
            extra: fields.extra,
            raw: Some(raw),
        })
    }
}

impl Serialize for UploadResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if let Some(ref raw) = self.raw {
            return raw.serialize(serializer);
        }
        ResultFields {
            success: self.success,
            folder_id: self.folder_id.clone(),
            folder_url: self.folder_url.clone(),
            uploads: self.uploads.clone(),
            message: self.message.clone(),
            error: self.error.clone(),
            extra: self.extra.clone(),
        }
        .serialize(serializer)
    }
}

/// One stored file in an [`UploadResult`].
///
/// The endpoint decides what an entry carries, so every field is optional
/// on the way in; unknown keys land in `extra`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredFile {
    #[serde(default)]
    pub document_type: String,
    #[serde(default)]
    pub file_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UploadResult {
    /// Turn `success: false` into [`UploadError::RemoteFailure`].
    ///
    /// The message is taken from `error`, then `message`, in that order.
    pub fn into_result(self) -> Result<Self, UploadError> {
        if self.success {
            return Ok(self);
        }
        let message = self
            .error
            .clone()
            .or_else(|| self.message.clone())
            .unwrap_or_else(|| "no reason given".to_string());
        Err(UploadError::RemoteFailure { message })
    }

    /// Number of stored files listed in the result.
    pub fn upload_count(&self) -> usize {
        self.uploads.as_ref().map_or(0, Vec::len)
    }
}
