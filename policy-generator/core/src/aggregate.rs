use crate::{
    known_servers::KnownServers,
    rule::{Direction, Rule},
    translate::translate,
};
use ahash::AHashSet as HashSet;
use policy_generator_k8s_api::policy::{NetworkNeighborhood, PolicyRef};
use std::hash::Hash;

/// An insertion-ordered list that drops values equal to one already held.
#[derive(Clone, Debug)]
pub(crate) struct Deduped<T> {
    items: Vec<T>,
    seen: HashSet<T>,
}

// === impl Deduped ===

impl<T: Clone + Eq + Hash> Deduped<T> {
    /// Appends `item` unless an equal value was pushed before. Returns true if it was appended.
    pub(crate) fn push(&mut self, item: T) -> bool {
        if self.seen.contains(&item) {
            return false;
        }
        self.seen.insert(item.clone());
        self.items.push(item);
        true
    }

    pub(crate) fn into_vec(self) -> Vec<T> {
        self.items
    }
}

impl<T> Default for Deduped<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            seen: HashSet::new(),
        }
    }
}

/// Translates every neighbor observed in `direction`, across regular, init, and ephemeral
/// containers in that order, returning the distinct rules and the distinct provenance records of
/// that direction, each in first-seen order.
pub(crate) fn aggregate<K>(
    neighborhood: &NetworkNeighborhood,
    direction: Direction,
    known_servers: &K,
) -> (Vec<Rule>, Vec<PolicyRef>)
where
    K: KnownServers + ?Sized,
{
    let mut rules = Deduped::default();
    let mut refs = Deduped::default();

    for neighbor in neighborhood
        .all_containers()
        .flat_map(|container| direction.neighbors(container))
    {
        let (rule, neighbor_refs) = translate(neighbor, known_servers);
        if !rules.push(rule) {
            tracing::trace!(%direction, identifier = %neighbor.identifier, "Duplicate rule");
        }
        for policy_ref in neighbor_refs {
            refs.push(policy_ref);
        }
    }

    (rules.into_vec(), refs.into_vec())
}
