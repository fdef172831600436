pub mod generated;
pub mod known_server;
pub mod neighborhood;
pub mod network;
pub mod network_policy;

pub use self::{
    generated::{GeneratedNetworkPolicy, PolicyRef},
    known_server::{KnownServer, KnownServerEntry, KnownServerSpec},
    neighborhood::{
        NetworkNeighbor, NetworkNeighborhood, NetworkNeighborhoodContainer,
        NetworkNeighborhoodSpec, NetworkPort,
    },
    network::{Cidr, CidrParseError},
    network_policy::{
        IpBlock, NetworkPolicy, NetworkPolicyEgressRule, NetworkPolicyIngressRule,
        NetworkPolicyPeer, NetworkPolicyPort, NetworkPolicySpec, PolicyType,
    },
};
