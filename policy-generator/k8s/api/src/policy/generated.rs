use super::network_policy::NetworkPolicy;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use serde::{Deserialize, Serialize};

pub const API_VERSION: &str = "spdx.softwarecomposition.kubescape.io/v1beta1";
pub const KIND: &str = "GeneratedNetworkPolicy";

/// A network policy compiled from a workload's observed connections, along with the provenance of
/// every external address it allows.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedNetworkPolicy {
    pub api_version: String,
    pub kind: String,
    pub metadata: ObjectMeta,
    pub spec: NetworkPolicy,

    #[serde(default)]
    pub policies_ref: Vec<PolicyRef>,
}

/// Explains how an observed address came to be represented in a policy.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyRef {
    /// The block that appears in the policy: a host network or a known server's CIDR.
    pub ip_block: String,

    #[serde(rename = "originalIP")]
    pub original_ip: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dns: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,
}
