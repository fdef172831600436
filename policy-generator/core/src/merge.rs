use crate::rule::Rule;
use policy_generator_k8s_api::policy::{NetworkPolicyPeer, NetworkPolicyPort};
use std::collections::BTreeMap;

/// Identifies a port for merging. Ordered by port, then protocol.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct PortKey {
    port: i32,
    protocol: String,
}

/// Merges rules that only name address blocks so that there is one rule per port and protocol.
///
/// Merged rules come first, ordered by port then protocol, each with a single port and its
/// address blocks sorted by CIDR. Rules with a pod or namespace selector follow unchanged in
/// their original order. A selector-free rule without ports contributes nothing.
pub fn merge_by_ports(rules: Vec<Rule>) -> Vec<Rule> {
    let mut merged = BTreeMap::<PortKey, Vec<NetworkPolicyPeer>>::new();
    let mut unmerged = Vec::new();

    for rule in rules {
        if rule.has_selector() {
            unmerged.push(rule);
            continue;
        }

        for port in &rule.ports {
            let peers = merged.entry(PortKey::from(port)).or_default();
            peers.extend(rule.peers.iter().filter(|p| p.ip_block.is_some()).cloned());
        }
    }

    merged
        .into_iter()
        .map(|(key, mut peers)| {
            sort_ip_blocks(&mut peers);
            Rule {
                ports: vec![key.into()],
                peers,
            }
        })
        .chain(unmerged)
        .collect()
}

/// Sorts address-block peers by CIDR, leaving any other peer in its slot.
fn sort_ip_blocks(peers: &mut [NetworkPolicyPeer]) {
    let slots = peers
        .iter()
        .enumerate()
        .filter(|(_, peer)| peer.ip_block.is_some())
        .map(|(i, _)| i)
        .collect::<Vec<_>>();

    let mut blocks = slots
        .iter()
        .map(|&i| std::mem::take(&mut peers[i]))
        .collect::<Vec<_>>();
    blocks.sort_by(|a, b| a.cidr().cmp(&b.cidr()));

    for (i, peer) in slots.into_iter().zip(blocks) {
        peers[i] = peer;
    }
}

// === impl PortKey ===

impl PortKey {
    const DEFAULT_PROTOCOL: &'static str = "TCP";
}

impl From<&NetworkPolicyPort> for PortKey {
    fn from(port: &NetworkPolicyPort) -> Self {
        Self {
            port: port.port.unwrap_or(0),
            protocol: port
                .protocol
                .clone()
                .unwrap_or_else(|| Self::DEFAULT_PROTOCOL.to_string()),
        }
    }
}

impl From<PortKey> for NetworkPolicyPort {
    fn from(PortKey { port, protocol }: PortKey) -> Self {
        Self {
            protocol: Some(protocol),
            // An unset port stays unset; zero only orders it.
            port: (port != 0).then_some(port),
        }
    }
}
