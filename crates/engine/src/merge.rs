//! Splicing the generated subtree into a user-owned configuration.

use autoroute_core::labels::AUTOGENERATED_ROUTE_LABEL;
use autoroute_core::{RouteNode, RoutingConfig};

use crate::builder::AutogeneratedRoute;
use crate::error::EngineError;

impl AutogeneratedRoute {
    /// Add this subtree to the root route of `config`.
    ///
    /// Fails without touching `config` when it has no root route. An empty
    /// subtree is a successful no-op.
    pub fn add_to_config(self, config: &mut RoutingConfig) -> Result<(), EngineError> {
        merge_route(self, config.route.as_mut())
    }
}

/// Prepend the generated root to `root`'s children.
///
/// The generated root takes the receiver of the existing root (an empty
/// receiver is passed through as-is) so the subtree falls back to the same
/// receiver as the rest of the configuration. It goes first so that it is
/// evaluated before any user-defined route.
pub fn merge_route(
    generated: AutogeneratedRoute,
    root: Option<&mut RouteNode>,
) -> Result<(), EngineError> {
    let root = root.ok_or(EngineError::MissingRootRoute)?;
    let Some(mut subtree) = generated.route else {
        return Ok(());
    };

    subtree.receiver = root.receiver.clone();
    root.routes.insert(0, subtree);
    Ok(())
}

/// Remove previously merged autogenerated subtrees from the root route.
///
/// Returns how many were removed. User routes keep their relative order.
pub fn remove_autogenerated(config: &mut RoutingConfig) -> usize {
    let Some(root) = config.route.as_mut() else {
        return 0;
    };
    let before = root.routes.len();
    root.routes
        .retain(|r| !r.has_equal_matcher(AUTOGENERATED_ROUTE_LABEL, "true"));
    before - root.routes.len()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
