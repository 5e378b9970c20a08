//! Common domain type definitions shared across crates.

use std::fmt;

/// Deployment identifier namespacing a set of stacks and their parameters.
///
/// All parameter paths published by a deployment live under `/<id>/...`, and
/// every provisioned resource carries the id as a `DeploymentId` tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct DeploymentId(String);

impl DeploymentId {
    /// Create a new deployment id.
    ///
    /// # Errors
    /// Returns an error if the id is empty or contains characters other than
    /// lowercase ASCII alphanumerics and hyphens.
    pub fn new(id: impl Into<String>) -> Result<Self, crate::NetStackError> {
        let id = id.into();
        if id.is_empty()
            || !id
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(crate::NetStackError::InvalidDeploymentId(id));
        }
        Ok(Self(id))
    }

    /// Get the deployment id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeploymentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// AWS Region identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct AwsRegion(String);

impl AwsRegion {
    /// Default region.
    pub const DEFAULT: &str = "us-east-1";

    /// Create a new region.
    #[must_use]
    pub fn new(region: impl Into<String>) -> Self {
        Self(region.into())
    }

    /// Get the region as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for AwsRegion {
    fn default() -> Self {
        Self(Self::DEFAULT.to_owned())
    }
}

impl fmt::Display for AwsRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Availability zone identifier (e.g. `us-east-1a`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct AvailabilityZone(String);

impl AvailabilityZone {
    /// Create a new availability zone.
    #[must_use]
    pub fn new(az: impl Into<String>) -> Self {
        Self(az.into())
    }

    /// Get the zone as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AvailabilityZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// IPv4 CIDR block in `a.b.c.d/len` notation.
///
/// Stacks pass CIDRs through unvalidated; malformed blocks are rejected by
/// the control plane at apply time, not here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Cidr(String);

impl Cidr {
    /// Default route destination matching all traffic.
    pub const ANY: &str = "0.0.0.0/0";

    /// Create a new CIDR block.
    #[must_use]
    pub fn new(cidr: impl Into<String>) -> Self {
        Self(cidr.into())
    }

    /// The `0.0.0.0/0` default-route destination.
    #[must_use]
    pub fn any() -> Self {
        Self(Self::ANY.to_owned())
    }

    /// Get the CIDR as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cidr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A key/value tag applied to a provisioned resource.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Tag {
    /// Tag key.
    pub key: String,
    /// Tag value.
    pub value: String,
}

impl Tag {
    /// Create a new tag.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Ordered collection of tags.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TagSet(Vec<Tag>);

impl TagSet {
    /// Create an empty tag set.
    #[must_use]
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Add a tag, replacing any existing tag with the same key.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let tag = Tag::new(key, value);
        if let Some(existing) = self.0.iter_mut().find(|t| t.key == tag.key) {
            existing.value = tag.value;
        } else {
            self.0.push(tag);
        }
        self
    }

    /// Look up a tag value by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|t| t.key == key)
            .map(|t| t.value.as_str())
    }

    /// Iterate over the tags in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Tag> {
        self.0.iter()
    }

    /// Number of tags.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a TagSet {
    type Item = &'a Tag;
    type IntoIter = std::slice::Iter<'a, Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_create_valid_deployment_id() {
        let id = DeploymentId::new("prod-us-1").unwrap();
        assert_eq!(id.as_str(), "prod-us-1");
    }

    #[test]
    fn test_should_reject_invalid_deployment_id() {
        assert!(DeploymentId::new("").is_err());
        assert!(DeploymentId::new("Prod").is_err());
        assert!(DeploymentId::new("has space").is_err());
        assert!(DeploymentId::new("slash/id").is_err());
    }

    #[test]
    fn test_should_use_default_region() {
        let region = AwsRegion::default();
        assert_eq!(region.as_str(), "us-east-1");
    }

    #[test]
    fn test_should_format_any_cidr() {
        assert_eq!(Cidr::any().as_str(), "0.0.0.0/0");
    }

    #[test]
    fn test_should_replace_tag_with_same_key() {
        let tags = TagSet::new()
            .with("Name", "first")
            .with("Network", "core")
            .with("Name", "second");
        assert_eq!(tags.len(), 2);
        assert_eq!(tags.get("Name"), Some("second"));
    }
}
