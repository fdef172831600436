use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Registers well-known network blocks so that raw addresses can be reported as named servers.
#[derive(Clone, Debug, Default, PartialEq, Eq, CustomResource, Deserialize, Serialize, JsonSchema)]
#[kube(
    group = "spdx.softwarecomposition.kubescape.io",
    version = "v1beta1",
    kind = "KnownServer",
    derive = "PartialEq"
)]
#[serde(rename_all = "camelCase")]
pub struct KnownServerSpec {
    #[serde(default)]
    pub entries: Vec<KnownServerEntry>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct KnownServerEntry {
    /// A CIDR, or a bare address standing for a single host.
    pub ip_block: String,

    /// A human-readable name for the block.
    pub name: String,

    /// The logical server the block belongs to.
    #[serde(default)]
    pub server: String,
}
