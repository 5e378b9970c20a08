//! Typed physical resource identifiers.
//!
//! Every provisioned resource is addressed by an opaque string identifier
//! with a kind-specific prefix (`vpc-…`, `tgw-…`, `subnet-…`). Wrapping them
//! in newtypes keeps a subnet id from ever being handed to a field expecting
//! a gateway id, which is exactly the class of wiring mistake string-typed
//! templates cannot catch.

use std::fmt;

use rand::Rng;

/// A raw identifier string did not carry the expected kind prefix.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid resource id {raw:?}: expected {expected}-<hex> format")]
pub struct InvalidResourceId {
    /// The prefix the target type requires.
    pub expected: &'static str,
    /// The rejected raw string.
    pub raw: String,
}

/// Common behavior of typed physical identifiers.
pub trait PhysicalId: Sized + Clone + fmt::Display {
    /// Kind-specific identifier prefix (without the trailing hyphen).
    const PREFIX: &'static str;

    /// Parse a raw identifier string, checking the kind prefix.
    ///
    /// # Errors
    /// Returns [`InvalidResourceId`] if the string is not
    /// `<prefix>-<lowercase hex>`.
    fn parse(raw: impl Into<String>) -> Result<Self, InvalidResourceId>;

    /// Get the identifier as a string slice.
    fn as_str(&self) -> &str;
}

/// Random 17-hex-digit suffix matching AWS identifier convention.
fn random_suffix() -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    let mut rng = rand::rng();
    (0..17).map(|_| HEX[rng.random_range(0..16)] as char).collect()
}

macro_rules! resource_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Generate a fresh identifier with a random suffix.
            #[must_use]
            pub fn generate() -> Self {
                Self(format!(concat!($prefix, "-{}"), random_suffix()))
            }
        }

        impl PhysicalId for $name {
            const PREFIX: &'static str = $prefix;

            fn parse(raw: impl Into<String>) -> Result<Self, InvalidResourceId> {
                let raw = raw.into();
                let valid = raw
                    .strip_prefix(concat!($prefix, "-"))
                    .is_some_and(|rest| {
                        !rest.is_empty()
                            && rest.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
                    });
                if valid {
                    Ok(Self(raw))
                } else {
                    Err(InvalidResourceId {
                        expected: $prefix,
                        raw,
                    })
                }
            }

            fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

resource_id!(
    /// Transit gateway (regional routing hub) identifier.
    TransitGatewayId,
    "tgw"
);
resource_id!(
    /// Transit gateway route table identifier.
    TransitRouteTableId,
    "tgw-rtb"
);
resource_id!(
    /// Transit gateway VPC attachment identifier.
    AttachmentId,
    "tgw-attach"
);
resource_id!(
    /// VPC identifier.
    VpcId,
    "vpc"
);
resource_id!(
    /// Subnet identifier.
    SubnetId,
    "subnet"
);
resource_id!(
    /// VPC route table identifier.
    RouteTableId,
    "rtb"
);
resource_id!(
    /// Internet gateway identifier.
    InternetGatewayId,
    "igw"
);
resource_id!(
    /// NAT gateway identifier.
    NatGatewayId,
    "nat"
);
resource_id!(
    /// Elastic IP allocation identifier.
    AllocationId,
    "eipalloc"
);
resource_id!(
    /// VPC flow log identifier.
    FlowLogId,
    "fl"
);
