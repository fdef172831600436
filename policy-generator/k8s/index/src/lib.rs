//! Known-server index
//!
//! Watches `KnownServer` resources and answers which of their registered networks contain an
//! address. Each resource's entries are replaced wholesale when it is applied, so the index always
//! reflects the latest version of every resource.
//!
//! Lookups return matches ordered by resource name and then by entry order within the resource,
//! so results do not depend on the order in which resources were observed.

#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]


use policy_generator_core::{KnownNetwork, KnownServers};
use policy_generator_k8s_api::{
    policy::{Cidr, CidrParseError, KnownServer, KnownServerEntry},
    ResourceExt,
};
use std::{collections::BTreeMap, net::IpAddr};

#[derive(Debug, Default)]
pub struct Index {
    /// Networks registered by each resource, keyed by resource name.
    by_resource: BTreeMap<String, Vec<KnownNetwork>>,
}

// === impl Index ===

impl kubert::index::IndexClusterResource<KnownServer> for Index {
    fn apply(&mut self, resource: KnownServer) {
        let name = resource.name_unchecked();
        let networks = resource
            .spec
            .entries
            .iter()
            .filter_map(|entry| match known_network(entry) {
                Ok(network) => Some(network),
                Err(error) => {
                    tracing::warn!(
                        resource = %name,
                        entry = %entry.name,
                        %error,
                        "Ignoring known server entry"
                    );
                    None
                }
            })
            .collect::<Vec<_>>();

        tracing::debug!(resource = %name, networks = networks.len(), "Indexed known server");
        self.by_resource.insert(name, networks);
    }

    fn delete(&mut self, name: String) {
        if self.by_resource.remove(&name).is_some() {
            tracing::debug!(resource = %name, "Removed known server");
        }
    }

    // Since apply replaces a resource's networks wholesale, there's no need
    // to handle resets specially.
}

impl KnownServers for Index {
    fn lookup(&self, addr: IpAddr) -> Vec<KnownNetwork> {
        self.by_resource
            .values()
            .flat_map(|networks| networks.lookup(addr))
            .collect()
    }
}

/// Parses an entry's block. Host bits are cleared so that a sloppy registration like
/// `10.0.0.1/8` still names the network that it covers.
fn known_network(entry: &KnownServerEntry) -> Result<KnownNetwork, CidrParseError> {
    let cidr = entry.ip_block.parse::<Cidr>()?;
    Ok(KnownNetwork {
        net: ipnet::IpNet::from(cidr).trunc(),
        name: entry.name.clone(),
        server: entry.server.clone(),
    })
}
