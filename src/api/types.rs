use serde::{Deserialize, Serialize};

/// JSON body for `POST /chat`.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub message: String,
}

/// JSON reply from `POST /chat`.
///
/// The schema is assumed, not negotiated: `image` defaults to `None` when the
/// field is missing or null, and unknown fields are ignored.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ChatReply {
    pub response: String,
    #[serde(default)]
    pub image: Option<String>,
}

/// JSON reply from `POST /upload`.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct UploadReply {
    pub message: String,
}
