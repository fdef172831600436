use crate::{
    aggregate::aggregate,
    config::Config,
    known_servers::KnownServers,
    merge::merge_by_ports,
    rule::{Direction, Rule},
};
use chrono::{offset::Utc, DateTime};
use policy_generator_k8s_api::{
    policy::{
        generated,
        neighborhood::{TEMPLATE_HASH_LABEL, WORKLOAD_KIND_LABEL},
        network_policy, GeneratedNetworkPolicy, NetworkNeighborhood, NetworkPolicy,
        NetworkPolicySpec,
    },
    ObjectMeta, ResourceExt, Time,
};
use std::collections::BTreeMap;

/// Annotates generated NetworkPolicies with the tool that produced them.
pub const GENERATED_BY_ANNOTATION: &str = "generated-by";
pub const GENERATED_BY: &str = "policy-generator";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("network neighborhood {namespace}/{name} is neither ready nor completed")]
    NotReady { namespace: String, name: String },

    #[error("network neighborhood {namespace}/{name} has no kubescape.io/workload-kind label")]
    MissingWorkloadKind { namespace: String, name: String },
}

/// Compiles a workload's observed connections into a network policy.
///
/// The neighborhood is only read. The result depends on nothing but the arguments, so compiling
/// the same neighborhood with the same timestamp always yields the same policy.
pub fn generate<K>(
    config: &Config,
    neighborhood: &NetworkNeighborhood,
    known_servers: &K,
    timestamp: DateTime<Utc>,
) -> Result<GeneratedNetworkPolicy, Error>
where
    K: KnownServers + ?Sized,
{
    let namespace = neighborhood.namespace().unwrap_or_default();
    let name = neighborhood.name_any();

    if !neighborhood.is_available() {
        return Err(Error::NotReady { namespace, name });
    }

    let mut labels = neighborhood.labels().clone();
    if !labels.contains_key(WORKLOAD_KIND_LABEL) {
        return Err(Error::MissingWorkloadKind { namespace, name });
    }
    labels.remove(TEMPLATE_HASH_LABEL);

    let (ingress, ingress_refs) = rules(neighborhood, Direction::Ingress, known_servers);
    let (egress, egress_refs) = rules(neighborhood, Direction::Egress, known_servers);
    // Provenance is deduplicated per direction; ingress records precede egress records.
    let refs = ingress_refs.into_iter().chain(egress_refs).collect::<Vec<_>>();

    tracing::debug!(
        %namespace,
        %name,
        ingress = ingress.len(),
        egress = egress.len(),
        refs = refs.len(),
        "Generated network policy"
    );

    let spec = NetworkPolicySpec {
        pod_selector: neighborhood.spec.selector.clone(),
        policy_types: config
            .policy_types
            .policy_types(!ingress.is_empty(), !egress.is_empty()),
        ingress: ingress.into_iter().map(Into::into).collect(),
        egress: egress.into_iter().map(Into::into).collect(),
    };

    let policy = NetworkPolicy {
        api_version: network_policy::API_VERSION.to_string(),
        kind: network_policy::KIND.to_string(),
        metadata: ObjectMeta {
            name: Some(name.clone()),
            namespace: Some(namespace.clone()),
            annotations: Some(BTreeMap::from([(
                GENERATED_BY_ANNOTATION.to_string(),
                GENERATED_BY.to_string(),
            )])),
            labels: Some(labels.clone()),
            ..Default::default()
        },
        spec,
    };

    Ok(GeneratedNetworkPolicy {
        api_version: generated::API_VERSION.to_string(),
        kind: generated::KIND.to_string(),
        metadata: ObjectMeta {
            name: Some(name),
            namespace: Some(namespace),
            labels: Some(labels),
            creation_timestamp: Some(Time(timestamp)),
            ..Default::default()
        },
        spec: policy,
        policies_ref: refs,
    })
}

fn rules<K>(
    neighborhood: &NetworkNeighborhood,
    direction: Direction,
    known_servers: &K,
) -> (Vec<Rule>, Vec<generated::PolicyRef>)
where
    K: KnownServers + ?Sized,
{
    let (rules, refs) = aggregate(neighborhood, direction, known_servers);
    (merge_by_ports(rules), refs)
}
