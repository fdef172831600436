//! Network policy generation
//!
//! Compiles the connections a workload was observed making (its "network neighborhood") into the
//! smallest NetworkPolicy that allows them, along with a record of why each external address is
//! in the policy.
//!
//! ```text
//! [ NetworkNeighborhood ] -> translate -> dedup -> merge by port -> [ GeneratedNetworkPolicy ]
//!                               ^
//!                        [ KnownServers ]
//! ```
//!
//! - Each observed neighbor is translated into a rule. In-cluster peers keep their selectors,
//!   minus labels that change between revisions of a workload. Addresses are widened to any known
//!   server networks that contain them, or else kept as host networks.
//! - Identical rules and provenance records observed by several containers are emitted once.
//! - Rules that only name address blocks are merged so that each port and protocol appears in a
//!   single rule.

#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

mod aggregate;
mod config;
mod generate;
pub mod known_servers;
pub mod labels;
mod merge;
mod rule;
mod translate;


pub use self::{
    config::{Config, PolicyTypesMode},
    generate::{generate, Error, GENERATED_BY, GENERATED_BY_ANNOTATION},
    known_servers::{KnownNetwork, KnownServers},
    merge::merge_by_ports,
    rule::{Direction, Rule},
    translate::translate,
};
