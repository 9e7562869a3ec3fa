use std::collections::BTreeMap;

use hookd_domain::Interaction;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct PollResponse {
    pub interactions: Vec<Interaction>,
}

/// One entry of a batch-poll response: either the hook's pending
/// interactions, or an error if the id was never registered.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum PollResultEntry {
    Found { interactions: Vec<Interaction> },
    NotFound { error: String },
}

#[derive(Debug, Serialize)]
pub struct PollBatchResponse {
    pub results: BTreeMap<String, PollResultEntry>,
}
