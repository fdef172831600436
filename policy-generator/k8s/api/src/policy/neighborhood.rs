use crate::labels::Selector;
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Annotation set by the sensor to indicate how far it got in observing the workload.
pub const STATUS_ANNOTATION: &str = "kubescape.io/status";

/// The sensor has finished its learning period.
pub const STATUS_READY: &str = "ready";

/// The sensor observed the workload to completion (e.g. a finished job).
pub const STATUS_COMPLETED: &str = "completed";

/// Label carrying the kind of the workload (Deployment, StatefulSet, ...).
pub const WORKLOAD_KIND_LABEL: &str = "kubescape.io/workload-kind";

/// Label that changes with every revision of the workload's pod template.
pub const TEMPLATE_HASH_LABEL: &str = "kubescape.io/instance-template-hash";

/// The network connections observed for a single workload.
#[derive(Clone, Debug, Default, PartialEq, Eq, CustomResource, Deserialize, Serialize, JsonSchema)]
#[kube(
    group = "spdx.softwarecomposition.kubescape.io",
    version = "v1beta1",
    kind = "NetworkNeighborhood",
    namespaced,
    derive = "PartialEq"
)]
#[serde(rename_all = "camelCase")]
pub struct NetworkNeighborhoodSpec {
    /// Selects the pods of the workload.
    #[serde(flatten)]
    pub selector: Selector,

    #[serde(default)]
    pub containers: Vec<NetworkNeighborhoodContainer>,

    #[serde(default)]
    pub init_containers: Vec<NetworkNeighborhoodContainer>,

    #[serde(default)]
    pub ephemeral_containers: Vec<NetworkNeighborhoodContainer>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NetworkNeighborhoodContainer {
    pub name: String,

    #[serde(default)]
    pub ingress: Vec<NetworkNeighbor>,

    #[serde(default)]
    pub egress: Vec<NetworkNeighbor>,
}

/// A peer that a container was observed talking to (egress) or being reached by (ingress).
///
/// In-cluster peers are described by selectors; everything else by IP address. The DNS name, when
/// present, is what the sensor saw resolve to `ip_address`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NetworkNeighbor {
    #[serde(default)]
    pub identifier: String,

    #[serde(default, rename = "type")]
    pub communication_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dns: Option<String>,

    /// Every name the sensor saw resolve to `ip_address`. Provenance only records `dns`; this
    /// list is carried so that neighborhoods round-trip without losing sensor data.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dns_names: Vec<String>,

    #[serde(default)]
    pub ports: Vec<NetworkPort>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pod_selector: Option<Selector>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace_selector: Option<Selector>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NetworkPort {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub protocol: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<i32>,
}

// === impl NetworkNeighborhood ===

impl NetworkNeighborhood {
    /// Iterates over regular, init, and ephemeral containers, in that order.
    pub fn all_containers(&self) -> impl Iterator<Item = &NetworkNeighborhoodContainer> {
        self.spec
            .containers
            .iter()
            .chain(self.spec.init_containers.iter())
            .chain(self.spec.ephemeral_containers.iter())
    }

    /// Returns true once the sensor has marked this neighborhood as ready or completed.
    pub fn is_available(&self) -> bool {
        self.metadata
            .annotations
            .as_ref()
            .and_then(|annotations| annotations.get(STATUS_ANNOTATION))
            .map(|status| status == STATUS_READY || status == STATUS_COMPLETED)
            .unwrap_or(false)
    }
}

// === impl NetworkNeighbor ===

impl NetworkNeighbor {
    /// The observed IP address, if one was recorded.
    pub fn ip_address(&self) -> Option<&str> {
        self.ip_address.as_deref().filter(|ip| !ip.is_empty())
    }

    /// The observed DNS name, if one was recorded.
    pub fn dns(&self) -> Option<&str> {
        self.dns.as_deref().filter(|dns| !dns.is_empty())
    }
}
