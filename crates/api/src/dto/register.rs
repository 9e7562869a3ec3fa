use serde::Deserialize;

/// Body of `POST /register`. Both fields are optional: an empty body
/// registers a single hook.
#[derive(Debug, Deserialize, Default)]
pub struct RegisterRequest {
    #[serde(default)]
    pub count: Option<u32>,
}
