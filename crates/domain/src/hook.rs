use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered capture endpoint. `dns`/`http`/`https` are pure functions of
/// `(id, domain)` and are never stored — they're computed on serialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hook {
    pub id: String,
    pub domain: String,
    pub created_at: DateTime<Utc>,
}

impl Hook {
    pub fn new(id: impl Into<String>, domain: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            domain: domain.into(),
            created_at,
        }
    }

    pub fn dns(&self) -> String {
        format!("{}.{}", self.id, self.domain)
    }

    pub fn http(&self) -> String {
        format!("http://{}.{}", self.id, self.domain)
    }

    pub fn https(&self) -> String {
        format!("https://{}.{}", self.id, self.domain)
    }
}

/// Wire representation of a [`Hook`] — `dns`/`http`/`https` are rendered at
/// serialization time rather than stored on the domain type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HookView {
    pub id: String,
    pub dns: String,
    pub http: String,
    pub https: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Hook> for HookView {
    fn from(hook: &Hook) -> Self {
        Self {
            id: hook.id.clone(),
            dns: hook.dns(),
            http: hook.http(),
            https: hook.https(),
            created_at: hook.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_endpoints_are_pure_functions_of_id_and_domain() {
        let hook = Hook::new("abc123", "hookd.test.local", Utc::now());
        assert_eq!(hook.dns(), "abc123.hookd.test.local");
        assert_eq!(hook.http(), "http://abc123.hookd.test.local");
        assert_eq!(hook.https(), "https://abc123.hookd.test.local");
    }

    #[test]
    fn view_carries_the_same_derived_fields() {
        let hook = Hook::new("xyz", "example.com", Utc::now());
        let view = HookView::from(&hook);
        assert_eq!(view.id, "xyz");
        assert_eq!(view.dns, hook.dns());
        assert_eq!(view.http, hook.http());
        assert_eq!(view.https, hook.https());
    }
}
