use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Body captures beyond this size are truncated, never rejected.
pub const MAX_HTTP_BODY_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionKind {
    Dns,
    Http,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpData {
    pub method: String,
    pub path: String,
    pub headers: BTreeMap<String, String>,
    pub body: String,
    /// Set when the captured body exceeded [`MAX_HTTP_BODY_BYTES`] and was
    /// clipped; downstream consumers should not treat `body` as complete.
    #[serde(default)]
    pub truncated: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum InteractionData {
    Dns { qname: String, qtype: String },
    Http(HttpData),
}

impl InteractionData {
    pub fn kind(&self) -> InteractionKind {
        match self {
            InteractionData::Dns { .. } => InteractionKind::Dns,
            InteractionData::Http(_) => InteractionKind::Http,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interaction {
    pub id: String,
    /// The owning hook. Not part of the wire format: a poll response is
    /// already scoped to a single hook, so this stays server-side.
    #[serde(skip)]
    pub hook_id: String,
    pub timestamp: DateTime<Utc>,
    pub source_ip: String,
    #[serde(flatten)]
    pub data: InteractionData,
}

impl Interaction {
    #[allow(clippy::too_many_arguments)]
    pub fn new_dns(
        id: impl Into<String>,
        hook_id: impl Into<String>,
        source_ip: impl Into<String>,
        timestamp: DateTime<Utc>,
        qname: impl Into<String>,
        qtype: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            hook_id: hook_id.into(),
            timestamp,
            source_ip: source_ip.into(),
            data: InteractionData::Dns {
                qname: qname.into(),
                qtype: qtype.into(),
            },
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn new_http(
        id: impl Into<String>,
        hook_id: impl Into<String>,
        source_ip: impl Into<String>,
        timestamp: DateTime<Utc>,
        method: impl Into<String>,
        path: impl Into<String>,
        headers: BTreeMap<String, String>,
        mut body: Vec<u8>,
    ) -> Self {
        let truncated = body.len() > MAX_HTTP_BODY_BYTES;
        body.truncate(MAX_HTTP_BODY_BYTES);
        Self {
            id: id.into(),
            hook_id: hook_id.into(),
            timestamp,
            source_ip: source_ip.into(),
            data: InteractionData::Http(HttpData {
                method: method.into(),
                path: path.into(),
                headers,
                body: String::from_utf8_lossy(&body).into_owned(),
                truncated,
            }),
        }
    }

    pub fn kind(&self) -> InteractionKind {
        self.data.kind()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_body_beyond_cap_is_truncated_not_rejected() {
        let body = vec![b'a'; MAX_HTTP_BODY_BYTES + 10];
        let interaction = Interaction::new_http(
            "i1",
            "h1",
            "127.0.0.1",
            Utc::now(),
            "POST",
            "/x",
            BTreeMap::new(),
            body,
        );
        match interaction.data {
            InteractionData::Http(data) => {
                assert!(data.truncated);
                assert_eq!(data.body.len(), MAX_HTTP_BODY_BYTES);
            }
            _ => panic!("expected http data"),
        }
    }

    #[test]
    fn wire_format_matches_spec_shape() {
        let interaction = Interaction::new_dns(
            "i1",
            "h1",
            "10.0.0.1",
            Utc::now(),
            "abc.hookd.test.local",
            "A",
        );
        let json = serde_json::to_value(&interaction).unwrap();
        assert_eq!(json["type"], "dns");
        assert_eq!(json["data"]["qname"], "abc.hookd.test.local");
        assert_eq!(json["data"]["qtype"], "A");
    }
}
