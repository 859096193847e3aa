//  Copyright 2024 groupcache-rs Authors
//
//  Licensed under the Apache License, Version 2.0 (the "License");
//  you may not use this file except in compliance with the License.
//  You may obtain a copy of the License at
//
//  http://www.apache.org/licenses/LICENSE-2.0
//
//  Unless required by applicable law or agreed to in writing, software
//  distributed under the License is distributed on an "AS IS" BASIS,
//  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//  See the License for the specific language governing permissions and
//  limitations under the License.

//! Two historical wire framings, picked at compile time by the
//! `struct-framing` feature. Mixing framings within one cluster is
//! unsupported, so the choice is baked into the binary rather than
//! negotiated per request.

/// The response `Content-Type` for the active framing.
pub const CONTENT_TYPE: &str = if cfg!(feature = "struct-framing") {
    "application/x-groupcache-record"
} else {
    "application/octet-stream"
};

#[cfg(feature = "struct-framing")]
#[derive(serde::Serialize, serde::Deserialize)]
struct ValueRecord {
    value: Vec<u8>,
}

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[cfg(feature = "struct-framing")]
    #[error("malformed record body: {0}")]
    Bincode(#[from] bincode::Error),
}

/// Frames a value for the wire body.
pub fn encode(bytes: Vec<u8>) -> Vec<u8> {
    #[cfg(feature = "struct-framing")]
    {
        bincode::serialize(&ValueRecord { value: bytes }).expect("record serialization is infallible")
    }
    #[cfg(not(feature = "struct-framing"))]
    {
        bytes
    }
}

/// Unframes a wire body back into the value bytes it carries.
pub fn decode(body: Vec<u8>) -> Result<Vec<u8>, DecodeError> {
    #[cfg(feature = "struct-framing")]
    {
        let record: ValueRecord = bincode::deserialize(&body)?;
        Ok(record.value)
    }
    #[cfg(not(feature = "struct-framing"))]
    {
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_the_active_framing() {
        let original = b"hello groupcache".to_vec();
        let framed = encode(original.clone());
        let decoded = decode(framed).unwrap();
        assert_eq!(decoded, original);
    }
}
