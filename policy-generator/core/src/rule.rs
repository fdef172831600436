use policy_generator_k8s_api::policy::{
    NetworkNeighbor, NetworkNeighborhoodContainer, NetworkPolicyEgressRule,
    NetworkPolicyIngressRule, NetworkPolicyPeer, NetworkPolicyPort, PolicyType,
};

/// Which side of a connection the workload was on.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Ingress,
    Egress,
}

/// A rule without its direction: the peers traffic was exchanged with, and on which ports.
///
/// Rules become `from` or `to` entries only when the policy is assembled, so that both directions
/// share the same translation and merging code.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rule {
    pub peers: Vec<NetworkPolicyPeer>,
    pub ports: Vec<NetworkPolicyPort>,
}

// === impl Direction ===

impl Direction {
    pub fn neighbors(self, container: &NetworkNeighborhoodContainer) -> &[NetworkNeighbor] {
        match self {
            Self::Ingress => &container.ingress,
            Self::Egress => &container.egress,
        }
    }

    pub fn policy_type(self) -> PolicyType {
        match self {
            Self::Ingress => PolicyType::Ingress,
            Self::Egress => PolicyType::Egress,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ingress => "ingress".fmt(f),
            Self::Egress => "egress".fmt(f),
        }
    }
}

// === impl Rule ===

impl Rule {
    /// Rules naming in-cluster peers by selector are never merged with others.
    pub fn has_selector(&self) -> bool {
        self.peers.iter().any(NetworkPolicyPeer::has_selector)
    }
}

impl From<Rule> for NetworkPolicyIngressRule {
    fn from(Rule { peers, ports }: Rule) -> Self {
        Self { ports, from: peers }
    }
}

impl From<Rule> for NetworkPolicyEgressRule {
    fn from(Rule { peers, ports }: Rule) -> Self {
        Self { ports, to: peers }
    }
}
