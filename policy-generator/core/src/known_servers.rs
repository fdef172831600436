use ipnet::IpNet;
use std::net::IpAddr;

/// A registered network block with a human name and the logical server it belongs to.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct KnownNetwork {
    pub net: IpNet,
    pub name: String,
    pub server: String,
}

/// Looks up the known networks that contain an address.
///
/// Registrations may overlap, so every containing network is returned. An empty result means the
/// address is not known. Lookups take `&self`, so one registry may serve concurrent
/// compilations.
pub trait KnownServers {
    fn lookup(&self, addr: IpAddr) -> Vec<KnownNetwork>;
}

// === impl KnownServers ===

impl KnownServers for [KnownNetwork] {
    fn lookup(&self, addr: IpAddr) -> Vec<KnownNetwork> {
        self.iter()
            .filter(|known| known.net.contains(&addr))
            .cloned()
            .collect()
    }
}

impl KnownServers for Vec<KnownNetwork> {
    #[inline]
    fn lookup(&self, addr: IpAddr) -> Vec<KnownNetwork> {
        self.as_slice().lookup(addr)
    }
}

impl<K: KnownServers + ?Sized> KnownServers for &K {
    #[inline]
    fn lookup(&self, addr: IpAddr) -> Vec<KnownNetwork> {
        (**self).lookup(addr)
    }
}
