use crate::{
    core::{generate, Config, PolicyTypesMode},
    index::Index,
    k8s::ResourceExt,
    load,
};
use anyhow::{anyhow, bail, Context, Error, Result};
use chrono::{offset::Utc, DateTime};
use clap::Parser;
use kubert::index::IndexClusterResource;
use std::{io::Write, path::PathBuf};

#[derive(Debug, Parser)]
#[clap(
    name = "policy-generator",
    about = "Compiles a workload's observed network neighborhood into a network policy"
)]
pub struct Args {
    #[clap(
        long,
        default_value = "policy_generator=info,warn",
        env = "POLICY_GENERATOR_LOG"
    )]
    log_level: kubert::LogFilter,

    #[clap(long, default_value = "plain")]
    log_format: kubert::LogFormat,

    /// A NetworkNeighborhood resource, as YAML or JSON.
    #[clap(long)]
    neighborhood: PathBuf,

    /// KnownServer resources used to name observed addresses. May be repeated.
    #[clap(long = "known-servers")]
    known_servers: Vec<PathBuf>,

    #[clap(long, default_value = "yaml")]
    output: OutputFormat,

    /// Which directions the policy restricts: `always` declares both, `observed` only those
    /// with at least one rule.
    #[clap(long, default_value = "always")]
    policy_types: PolicyTypesMode,

    /// Creation timestamp of the generated policy, in RFC 3339. Defaults to the current time.
    #[clap(long)]
    timestamp: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    #[default]
    Yaml,
}

// === impl Args ===

impl Args {
    #[inline]
    pub fn parse_and_run() -> Result<()> {
        Self::parse().run()
    }

    pub fn run(self) -> Result<()> {
        let Self {
            log_level,
            log_format,
            neighborhood,
            known_servers,
            output,
            policy_types,
            timestamp,
        } = self;

        log_format
            .try_init(log_level)
            .map_err(|error| anyhow!("failed to initialize logging: {error}"))?;

        let mut index = Index::default();
        for path in &known_servers {
            for resource in load::known_servers(path)? {
                tracing::debug!(
                    path = %path.display(),
                    name = %resource.name_any(),
                    "Loaded known server"
                );
                index.apply(resource);
            }
        }

        let nn = load::neighborhood(&neighborhood)?;
        let config = Config { policy_types };
        let timestamp = timestamp.unwrap_or_else(Utc::now);
        let generated = generate(&config, &nn, &index, timestamp)?;

        tracing::info!(
            namespace = %nn.namespace().unwrap_or_default(),
            name = %nn.name_any(),
            ingress = generated.spec.spec.ingress.len(),
            egress = generated.spec.spec.egress.len(),
            refs = generated.policies_ref.len(),
            "Generated network policy"
        );

        let stdout = std::io::stdout();
        let mut stdout = stdout.lock();
        match output {
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut stdout, &generated)?;
                writeln!(stdout)?;
            }
            OutputFormat::Yaml => serde_yaml::to_writer(&mut stdout, &generated)?,
        }
        stdout.flush().context("writing policy")
    }
}

// === impl OutputFormat ===

impl std::str::FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "json" => Ok(Self::Json),
            "yaml" => Ok(Self::Yaml),
            s => bail!("invalid output format: {:?}", s),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json => "json".fmt(f),
            Self::Yaml => "yaml".fmt(f),
        }
    }
}
