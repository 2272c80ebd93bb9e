//! Code shared between the dashboard clients and the test backend

#![warn(unused_crate_dependencies)]

pub mod acta;
pub mod const_config;
pub mod errors;
pub mod id;
mod macros;
pub mod req_args;
pub mod token;
pub mod user;

#[cfg(not(target_arch = "wasm32"))]
pub mod telemetry;

