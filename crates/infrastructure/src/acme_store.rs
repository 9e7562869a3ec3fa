use std::collections::HashMap;

use hookd_domain::AcmeRecord;
use parking_lot::Mutex;

/// Mutex-protected map from zone name to an ordered list of TXT records
/// (spec.md §4.4). Shared, via `Arc`, between the DNS responder (reader)
/// and the HTTPS bootstrap's DNS-01 solver (writer) as a plain capability —
/// not a singleton.
#[derive(Default)]
pub struct AcmeRecordStore {
    inner: Mutex<HashMap<String, Vec<AcmeRecord>>>,
}

impl AcmeRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&self, zone: &str, records: Vec<AcmeRecord>) {
        self.inner.lock().entry(zone.to_string()).or_default().extend(records);
    }

    pub fn delete(&self, zone: &str, records: &[AcmeRecord]) {
        if let Some(existing) = self.inner.lock().get_mut(zone) {
            existing.retain(|r| !records.contains(r));
        }
    }

    pub fn get(&self, zone: &str) -> Vec<AcmeRecord> {
        self.inner.lock().get(zone).cloned().unwrap_or_default()
    }

    pub fn set(&self, zone: &str, records: Vec<AcmeRecord>) {
        self.inner.lock().insert(zone.to_string(), records);
    }
}
