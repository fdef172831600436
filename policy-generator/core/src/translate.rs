use crate::{
    known_servers::{KnownNetwork, KnownServers},
    labels,
    rule::Rule,
};
use policy_generator_k8s_api::policy::{
    NetworkNeighbor, NetworkPolicyPeer, NetworkPolicyPort, NetworkPort, PolicyRef,
};
use std::{cmp::Reverse, net::IpAddr};

/// Translates a single observed neighbor into a rule and the provenance of any addresses in it.
///
/// Selectors are emitted as a single peer (pods matching the pod selector in namespaces matching
/// the namespace selector). An address is emitted as the known networks containing it, or as a
/// host network when none do. Every observed port is attached to the rule.
pub fn translate<K>(neighbor: &NetworkNeighbor, known_servers: &K) -> (Rule, Vec<PolicyRef>)
where
    K: KnownServers + ?Sized,
{
    let mut peers = Vec::new();
    let mut refs = Vec::new();

    if let Some(selector) = neighbor.pod_selector.as_ref() {
        let mut selector = selector.clone();
        labels::remove_ignored_labels(&mut selector);
        peers.push(NetworkPolicyPeer {
            pod_selector: Some(selector),
            ..Default::default()
        });
    }

    if let Some(selector) = neighbor.namespace_selector.as_ref() {
        match peers.first_mut() {
            Some(peer) => peer.namespace_selector = Some(selector.clone()),
            None => peers.push(NetworkPolicyPeer {
                namespace_selector: Some(selector.clone()),
                ..Default::default()
            }),
        }
    }

    if let Some(ip) = neighbor.ip_address() {
        translate_address(ip, neighbor.dns(), known_servers, &mut peers, &mut refs);
    }

    let ports = neighbor.ports.iter().map(canonical_port).collect();

    (Rule { peers, ports }, refs)
}

fn translate_address<K>(
    ip: &str,
    dns: Option<&str>,
    known_servers: &K,
    peers: &mut Vec<NetworkPolicyPeer>,
    refs: &mut Vec<PolicyRef>,
) where
    K: KnownServers + ?Sized,
{
    let addr = match ip.parse::<IpAddr>() {
        Ok(addr) => Some(addr),
        Err(error) => {
            tracing::debug!(%ip, %error, "Neighbor address is not an IP; using it as a host block");
            None
        }
    };

    let mut known = addr
        .map(|addr| known_servers.lookup(addr))
        .unwrap_or_default();

    if known.is_empty() {
        let cidr = host_block(ip, addr);
        if let Some(dns) = dns {
            refs.push(PolicyRef {
                ip_block: cidr.clone(),
                original_ip: ip.to_string(),
                dns: Some(dns.to_string()),
                name: Some(dns.to_string()),
                server: None,
            });
        }
        peers.push(NetworkPolicyPeer::ip_block(cidr));
        return;
    }

    // Overlapping registrations are reported most specific first.
    known.sort_by_key(|k| Reverse(k.net.prefix_len()));
    for KnownNetwork { net, name, server } in known {
        let cidr = net.to_string();
        refs.push(PolicyRef {
            ip_block: cidr.clone(),
            original_ip: ip.to_string(),
            dns: dns.map(str::to_string),
            name: Some(name).filter(|n| !n.is_empty()),
            server: Some(server).filter(|s| !s.is_empty()),
        });
        peers.push(NetworkPolicyPeer::ip_block(cidr));
    }
}

fn host_block(ip: &str, addr: Option<IpAddr>) -> String {
    match addr {
        Some(IpAddr::V6(addr)) => format!("{addr}/128"),
        Some(IpAddr::V4(addr)) => format!("{addr}/32"),
        None => format!("{ip}/32"),
    }
}

fn canonical_port(port: &NetworkPort) -> NetworkPolicyPort {
    let protocol = port.protocol.trim().to_uppercase();
    NetworkPolicyPort {
        protocol: Some(protocol).filter(|p| !p.is_empty()),
        port: port.port,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maplit::btreemap;
    use policy_generator_k8s_api::Selector;
    use pretty_assertions::assert_eq;
    use std::iter::FromIterator;

    fn tcp(port: i32) -> NetworkPort {
        NetworkPort {
            name: format!("TCP-{port}"),
            protocol: "TCP".to_string(),
            port: Some(port),
        }
    }

    fn known(net: &str, name: &str, server: &str) -> KnownNetwork {
        KnownNetwork {
            net: net.parse().unwrap(),
            name: name.to_string(),
            server: server.to_string(),
        }
    }

    fn no_known_servers() -> Vec<KnownNetwork> {
        vec![]
    }

    #[test]
    fn known_server_enrichment() {
        let neighbor = NetworkNeighbor {
            ip_address: Some("172.17.0.2".to_string()),
            ports: vec![tcp(80)],
            ..Default::default()
        };
        let (rule, refs) = translate(&neighbor, &vec![known("172.17.0.0/16", "test", "")]);

        assert_eq!(rule.peers, vec![NetworkPolicyPeer::ip_block("172.17.0.0/16")]);
        assert_eq!(
            refs,
            vec![PolicyRef {
                ip_block: "172.17.0.0/16".to_string(),
                original_ip: "172.17.0.2".to_string(),
                name: Some("test".to_string()),
                ..Default::default()
            }]
        );
    }

    #[test]
    fn every_overlapping_known_server_is_reported() {
        let neighbor = NetworkNeighbor {
            ip_address: Some("172.17.0.2".to_string()),
            dns: Some("registry.example.com.".to_string()),
            ports: vec![tcp(443)],
            ..Default::default()
        };
        let servers = vec![
            known("172.17.0.0/16", "wide", "corp"),
            known("172.17.0.0/24", "narrow", "registry"),
        ];
        let (rule, refs) = translate(&neighbor, &servers);

        assert_eq!(
            rule.peers,
            vec![
                NetworkPolicyPeer::ip_block("172.17.0.0/24"),
                NetworkPolicyPeer::ip_block("172.17.0.0/16"),
            ]
        );
        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0].name.as_deref(), Some("narrow"));
        assert_eq!(refs[0].server.as_deref(), Some("registry"));
        assert_eq!(refs[1].name.as_deref(), Some("wide"));
        assert!(refs
            .iter()
            .all(|r| r.dns.as_deref() == Some("registry.example.com.")));
    }

    #[test]
    fn unregistered_ip_falls_back_to_host() {
        let neighbor = NetworkNeighbor {
            ip_address: Some("154.53.46.32".to_string()),
            ports: vec![tcp(80)],
            ..Default::default()
        };
        let (rule, refs) = translate(&neighbor, &no_known_servers());

        assert_eq!(rule.peers, vec![NetworkPolicyPeer::ip_block("154.53.46.32/32")]);
        assert!(refs.is_empty());
    }

    #[test]
    fn unregistered_ip_with_dns() {
        let neighbor = NetworkNeighbor {
            ip_address: Some("154.53.46.32".to_string()),
            dns: Some("example.com.".to_string()),
            ..Default::default()
        };
        let (_, refs) = translate(&neighbor, &no_known_servers());

        assert_eq!(
            refs,
            vec![PolicyRef {
                ip_block: "154.53.46.32/32".to_string(),
                original_ip: "154.53.46.32".to_string(),
                dns: Some("example.com.".to_string()),
                name: Some("example.com.".to_string()),
                server: None,
            }]
        );
    }

    #[test]
    fn ipv6_host_block() {
        let neighbor = NetworkNeighbor {
            ip_address: Some("2001:db8::1".to_string()),
            ..Default::default()
        };
        let (rule, _) = translate(&neighbor, &no_known_servers());
        assert_eq!(rule.peers, vec![NetworkPolicyPeer::ip_block("2001:db8::1/128")]);
    }

    #[test]
    fn unparseable_ip_is_not_looked_up() {
        let neighbor = NetworkNeighbor {
            ip_address: Some("not-an-ip".to_string()),
            ..Default::default()
        };
        let servers = vec![known("0.0.0.0/0", "everything", "")];
        let (rule, refs) = translate(&neighbor, &servers);
        assert_eq!(rule.peers, vec![NetworkPolicyPeer::ip_block("not-an-ip/32")]);
        assert!(refs.is_empty());
    }

    #[test]
    fn selectors_share_a_peer() {
        let neighbor = NetworkNeighbor {
            pod_selector: Some(Selector::from_iter(vec![
                ("app", "db"),
                ("pod-template-hash", "5d8f"),
            ])),
            namespace_selector: Some(Selector::from_iter(Some((
                "kubernetes.io/metadata.name",
                "data",
            )))),
            ports: vec![NetworkPort {
                name: "UDP-53".to_string(),
                protocol: "udp".to_string(),
                port: Some(53),
            }],
            ..Default::default()
        };
        let (rule, refs) = translate(&neighbor, &no_known_servers());

        assert!(refs.is_empty());
        assert_eq!(rule.peers.len(), 1);
        let peer = &rule.peers[0];
        assert_eq!(
            peer.pod_selector,
            Some(Selector::from_map(btreemap! { "app".to_string() => "db".to_string() }))
        );
        assert!(peer.namespace_selector.is_some());
        assert_eq!(
            rule.ports,
            vec![NetworkPolicyPort {
                protocol: Some("UDP".to_string()),
                port: Some(53),
            }]
        );
    }

    #[test]
    fn namespace_selector_alone() {
        let neighbor = NetworkNeighbor {
            namespace_selector: Some(Selector::from_iter(Some(("team", "a")))),
            ..Default::default()
        };
        let (rule, _) = translate(&neighbor, &no_known_servers());
        assert_eq!(
            rule.peers,
            vec![NetworkPolicyPeer {
                namespace_selector: Some(Selector::from_iter(Some(("team", "a")))),
                ..Default::default()
            }]
        );
    }

    #[test]
    fn ports_only() {
        let neighbor = NetworkNeighbor {
            ports: vec![tcp(8080)],
            ..Default::default()
        };
        let (rule, refs) = translate(&neighbor, &no_known_servers());
        assert!(rule.peers.is_empty());
        assert!(refs.is_empty());
        assert_eq!(rule.ports.len(), 1);
    }
}
