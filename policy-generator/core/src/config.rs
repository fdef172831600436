use anyhow::{anyhow, Error, Result};
use policy_generator_k8s_api::policy::PolicyType;

/// Tunes how policies are assembled.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Config {
    pub policy_types: PolicyTypesMode,
}

/// Controls which directions a generated policy declares in `policyTypes`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum PolicyTypesMode {
    /// Declares both directions, so that traffic nobody observed is denied either way.
    #[default]
    Always,

    /// Declares only the directions with at least one rule.
    Observed,
}

// === impl PolicyTypesMode ===

impl PolicyTypesMode {
    pub fn policy_types(self, has_ingress: bool, has_egress: bool) -> Vec<PolicyType> {
        match self {
            Self::Always => vec![PolicyType::Ingress, PolicyType::Egress],
            Self::Observed => {
                let mut types = Vec::with_capacity(2);
                if has_ingress {
                    types.push(PolicyType::Ingress);
                }
                if has_egress {
                    types.push(PolicyType::Egress);
                }
                types
            }
        }
    }
}

impl std::str::FromStr for PolicyTypesMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "always" => Ok(Self::Always),
            "observed" => Ok(Self::Observed),
            s => Err(anyhow!("invalid policy types mode: {:?}", s)),
        }
    }
}

impl std::fmt::Display for PolicyTypesMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Always => "always".fmt(f),
            Self::Observed => "observed".fmt(f),
        }
    }
}
