use crate::k8s::policy::{KnownServer, NetworkNeighborhood};
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::path::Path;

/// A file may hold a single resource, a bare sequence of them, or a `List` as printed by
/// `kubectl get -o yaml`.
#[derive(serde::Deserialize)]
#[serde(untagged)]
enum Resources<T> {
    List { items: Vec<T> },
    Many(Vec<T>),
    One(Box<T>),
}

/// Reads a `NetworkNeighborhood` from a YAML or JSON file.
pub(crate) fn neighborhood(path: &Path) -> Result<NetworkNeighborhood> {
    let contents = read(path)?;
    parse(&contents).with_context(|| format!("parsing {}", path.display()))
}

/// Reads every `KnownServer` from a YAML or JSON file.
pub(crate) fn known_servers(path: &Path) -> Result<Vec<KnownServer>> {
    let contents = read(path)?;
    let resources = parse::<Resources<KnownServer>>(&contents)
        .with_context(|| format!("parsing {}", path.display()))?;
    Ok(match resources {
        Resources::List { items } | Resources::Many(items) => items,
        Resources::One(server) => vec![*server],
    })
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

/// JSON is valid YAML, so one parser serves both.
fn parse<T: DeserializeOwned>(contents: &str) -> Result<T> {
    Ok(serde_yaml::from_str(contents)?)
}
