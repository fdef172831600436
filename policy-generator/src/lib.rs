//! Compiles a recorded network neighborhood into a network policy from the command line.

#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

mod args;
mod load;

pub use self::args::{Args, OutputFormat};
pub use policy_generator_core as core;
pub use policy_generator_k8s_api as k8s;
pub use policy_generator_k8s_index as index;
