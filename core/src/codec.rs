//! codec.rs
//! Binary object codec: turns an application object into bytes and back.
//!
//! The pipeline never looks inside the serialized bytes; it only needs the
//! object's signature and schema version, which travel in the file header.

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

/// Capability required from anything persisted through the store.
pub trait LocalData: Serialize + DeserializeOwned + Send + Sync {
    /// Type/schema tag embedded in the object and duplicated in the header.
    fn signature(&self) -> String;

    /// Producer-defined schema version.
    fn version(&self) -> i32 {
        0
    }
}

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("{codec} encode failed: {msg}")]
    Encode { codec: &'static str, msg: String },

    #[error("{codec} decode failed: {msg}")]
    Decode { codec: &'static str, msg: String },

    #[error("{codec} decode left {remaining} trailing bytes")]
    TrailingBytes { codec: &'static str, remaining: usize },
}

/// Object serializer injected into the store.
pub trait ObjectCodec: Send + Sync {
    fn name(&self) -> &'static str;
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, CodecError>;
    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, CodecError>;
}

/// Compact binary encoding (bincode 2, standard config). Default codec.
#[derive(Clone, Copy, Debug, Default)]
pub struct BincodeCodec;

impl ObjectCodec for BincodeCodec {
    fn name(&self) -> &'static str {
        "bincode"
    }

    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, CodecError> {
        bincode::serde::encode_to_vec(value, bincode::config::standard())
            .map_err(|e| CodecError::Encode { codec: "bincode", msg: e.to_string() })
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, CodecError> {
        let (value, used): (T, usize) =
            bincode::serde::decode_from_slice(bytes, bincode::config::standard())
                .map_err(|e| CodecError::Decode { codec: "bincode", msg: e.to_string() })?;
        if used != bytes.len() {
            return Err(CodecError::TrailingBytes { codec: "bincode", remaining: bytes.len() - used });
        }
        Ok(value)
    }
}

/// Human-readable JSON encoding.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonCodec;

impl ObjectCodec for JsonCodec {
    fn name(&self) -> &'static str {
        "json"
    }

    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, CodecError> {
        serde_json::to_vec(value).map_err(|e| CodecError::Encode { codec: "json", msg: e.to_string() })
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, CodecError> {
        serde_json::from_slice(bytes).map_err(|e| CodecError::Decode { codec: "json", msg: e.to_string() })
    }
}
