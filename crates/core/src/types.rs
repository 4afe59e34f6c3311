use std::fmt;

use serde::{Deserialize, Serialize};

/// Organization identifiers are PostgreSQL BIGINTs.
pub type OrgId = i64;

/// Identity of an alert rule. Only used to give log lines context.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RuleKey {
    pub org_id: OrgId,
    pub uid: String,
}

impl RuleKey {
    pub fn new(org_id: OrgId, uid: impl Into<String>) -> Self {
        Self {
            org_id,
            uid: uid.into(),
        }
    }
}

impl fmt::Display for RuleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "org_id={} rule_uid={}", self.org_id, self.uid)
    }
}
