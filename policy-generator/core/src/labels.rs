use ahash::AHashSet as HashSet;
use once_cell::sync::Lazy;
use policy_generator_k8s_api::Selector;

/// Labels that vary between replicas or revisions of the same workload. A selector that names
/// one of these would stop matching as soon as the workload is rolled, so they are stripped from
/// peer selectors.
static IGNORED: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "app.kubernetes.io/instance",
        "app.kubernetes.io/version",
        "apps.kubernetes.io/pod-index",
        "batch.kubernetes.io/controller-uid",
        "batch.kubernetes.io/job-name",
        "controller-revision-hash",
        "controller-uid",
        "helm.sh/chart",
        "job-name",
        "pod-template-generation",
        "pod-template-hash",
        "scheduler.alpha.kubernetes.io/critical-pod",
        "statefulset.kubernetes.io/pod-name",
    ]
    .into_iter()
    .collect()
});

/// Well-known labels that identify a workload rather than an instance of it. Listed for reference:
/// they are treated exactly like any label that appears in neither table.
static KEPT: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "app",
        "app.kubernetes.io/component",
        "app.kubernetes.io/created-by",
        "app.kubernetes.io/managed-by",
        "app.kubernetes.io/name",
        "app.kubernetes.io/part-of",
    ]
    .into_iter()
    .collect()
});

pub fn is_ignored_label(key: &str) -> bool {
    IGNORED.contains(key)
}

/// Returns true if the label is one we explicitly chose to keep.
pub fn is_kept_label(key: &str) -> bool {
    KEPT.contains(key)
}

/// Strips ignored labels from a selector's match-labels. Match-expressions are left as observed.
pub fn remove_ignored_labels(selector: &mut Selector) {
    selector.retain_labels(|key| !is_ignored_label(key));
}
