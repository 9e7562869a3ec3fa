use serde::{Deserialize, Serialize};

/// A single DNS-01 challenge record within a zone. Deletion and
/// deduplication are by full value equality across all four fields.
/// `TXT` is the only type ever constructed today; the field exists so the
/// shape matches the zone's record model rather than assuming TXT forever.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcmeRecord {
    pub record_type: String,
    pub name: String,
    pub data: String,
    pub ttl: u32,
}

impl AcmeRecord {
    pub fn new(name: impl Into<String>, data: impl Into<String>, ttl: u32) -> Self {
        Self {
            record_type: "TXT".to_string(),
            name: name.into(),
            data: data.into(),
            ttl,
        }
    }
}
