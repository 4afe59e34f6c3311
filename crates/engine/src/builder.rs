//! Builds the autogenerated routing subtree.
//!
//! The subtree always has the same three-level shape:
//!
//! 1. a root matching `__autogenerated__="true"` that does not continue, so
//!    an autogenerated alert never falls through to user routes;
//! 2. one branch per receiver matching `__receiver__=<name>`, with
//!    `continue` set so every branch is considered;
//! 3. under a branch, one leaf per distinct non-default settings object
//!    matching `__settings_hash__=<fingerprint>`, carrying the overrides.

use std::collections::{BTreeMap, HashMap};

use autoroute_core::labels::{
    AUTOGENERATED_ROUTE_LABEL, AUTOGENERATED_ROUTE_RECEIVER_NAME_LABEL,
    AUTOGENERATED_ROUTE_SETTINGS_HASH_LABEL, DEFAULT_RECEIVER_GROUP_BY,
};
use autoroute_core::{aggregate_fingerprint, Fingerprint, Matcher, NotificationSettings, RouteNode};

use crate::error::EngineError;

/// A generated routing subtree and the signature of its content.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AutogeneratedRoute {
    /// `None` when no rule needs custom routing; there is nothing to merge.
    pub route: Option<RouteNode>,
    /// Aggregate of every settings fingerprint in the tree. Zero when empty.
    pub fingerprint: Fingerprint,
}

impl AutogeneratedRoute {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.route.is_none()
    }
}

/// Build the subtree for a set of unique settings keyed by fingerprint.
///
/// Iteration follows ascending fingerprint order, which fixes both the order
/// of receiver branches (first appearance) and the order of leaves. The same
/// input therefore always yields the same tree and the same aggregate.
pub fn build_route(
    default_receiver: &str,
    settings: &BTreeMap<Fingerprint, NotificationSettings>,
) -> Result<AutogeneratedRoute, EngineError> {
    if settings.is_empty() {
        return Ok(AutogeneratedRoute::empty());
    }

    let root_matcher =
        Matcher::equal(AUTOGENERATED_ROUTE_LABEL, "true").map_err(|source| {
            EngineError::Matcher {
                stage: "root",
                source,
            }
        })?;
    let mut root = RouteNode {
        receiver: default_receiver.to_string(),
        object_matchers: vec![root_matcher],
        continue_matching: false,
        ..Default::default()
    };

    // receiver name -> index into root.routes
    let mut branches: HashMap<&str, usize> = HashMap::new();

    for (fingerprint, s) in settings {
        let existing = branches.get(s.receiver.as_str()).copied();
        let index = match existing {
            Some(index) => index,
            None => {
                root.routes.push(receiver_branch(&s.receiver)?);
                let index = root.routes.len() - 1;
                branches.insert(&s.receiver, index);
                index
            }
        };

        if s.is_all_default() {
            continue;
        }
        root.routes[index].routes.push(settings_leaf(*fingerprint, s)?);
    }

    let fingerprints: Vec<Fingerprint> = settings.keys().copied().collect();
    Ok(AutogeneratedRoute {
        route: Some(root),
        fingerprint: aggregate_fingerprint(&fingerprints),
    })
}

fn receiver_branch(receiver: &str) -> Result<RouteNode, EngineError> {
    let matcher = Matcher::equal(AUTOGENERATED_ROUTE_RECEIVER_NAME_LABEL, receiver).map_err(
        |source| EngineError::Matcher {
            stage: "receiver",
            source,
        },
    )?;
    Ok(RouteNode {
        receiver: receiver.to_string(),
        object_matchers: vec![matcher],
        continue_matching: true,
        group_by: DEFAULT_RECEIVER_GROUP_BY.iter().map(|l| l.to_string()).collect(),
        ..Default::default()
    })
}

fn settings_leaf(
    fingerprint: Fingerprint,
    s: &NotificationSettings,
) -> Result<RouteNode, EngineError> {
    let matcher = Matcher::equal(AUTOGENERATED_ROUTE_SETTINGS_HASH_LABEL, fingerprint.to_string())
        .map_err(|source| EngineError::Matcher {
            stage: "settings hash",
            source,
        })?;
    Ok(RouteNode {
        receiver: s.receiver.clone(),
        object_matchers: vec![matcher],
        continue_matching: false,
        group_by: s.group_by.clone(),
        mute_time_intervals: s.mute_time_intervals.clone(),
        group_wait: s.group_wait,
        group_interval: s.group_interval,
        repeat_interval: s.repeat_interval,
        ..Default::default()
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
