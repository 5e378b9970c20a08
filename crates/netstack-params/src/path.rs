//! Parameter path naming.

use std::fmt;

use netstack_core::DeploymentId;

/// A namespaced parameter path of the form `/<deploymentId>/<name>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct ParameterPath(String);

impl ParameterPath {
    /// Well-known name under which the Router stack publishes the hub id.
    pub const CORE_ROUTER_ID: &str = "coreRouterId";

    /// Well-known name under which the Router stack publishes the edge
    /// transit route table id.
    pub const EDGE_ROUTE_TABLE_ID: &str = "edgeRouteTableId";

    /// Build a path under the given deployment's namespace.
    #[must_use]
    pub fn new(deployment_id: &DeploymentId, name: &str) -> Self {
        Self(format!("/{deployment_id}/{name}"))
    }

    /// Path of the published hub identifier for a deployment.
    #[must_use]
    pub fn core_router_id(deployment_id: &DeploymentId) -> Self {
        Self::new(deployment_id, Self::CORE_ROUTER_ID)
    }

    /// Path of the published edge transit route table identifier.
    #[must_use]
    pub fn edge_route_table_id(deployment_id: &DeploymentId) -> Self {
        Self::new(deployment_id, Self::EDGE_ROUTE_TABLE_ID)
    }

    /// Get the path as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse a path string of the form `/<deploymentId>/<name>`.
    ///
    /// # Errors
    /// Returns [`crate::ParameterError::InvalidPath`] if the string is not a
    /// two-segment absolute path.
    pub fn parse(raw: impl Into<String>) -> Result<Self, crate::ParameterError> {
        let raw = raw.into();
        let valid = raw
            .strip_prefix('/')
            .is_some_and(|rest| matches!(rest.split('/').collect::<Vec<_>>().as_slice(), [a, b] if !a.is_empty() && !b.is_empty()));
        if valid {
            Ok(Self(raw))
        } else {
            Err(crate::ParameterError::InvalidPath(raw))
        }
    }

    /// Rehydrate a path from its stored string form (snapshot loading).
    #[must_use]
    pub(crate) fn from_raw(raw: String) -> Self {
        Self(raw)
    }
}

impl fmt::Display for ParameterPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deployment(id: &str) -> DeploymentId {
        DeploymentId::new(id).unwrap()
    }

    #[test]
    fn test_should_namespace_path_by_deployment() {
        let path = ParameterPath::new(&deployment("test"), "coreRouterId");
        assert_eq!(path.as_str(), "/test/coreRouterId");
    }

    #[test]
    fn test_should_build_well_known_paths() {
        let d = deployment("prod");
        assert_eq!(
            ParameterPath::core_router_id(&d).as_str(),
            "/prod/coreRouterId"
        );
        assert_eq!(
            ParameterPath::edge_route_table_id(&d).as_str(),
            "/prod/edgeRouteTableId"
        );
    }
}
