//! subsumption_core - Pure no_std arbitration engine for subsumption controllers
//!
//! This crate contains the platform-agnostic machinery every behavior depends
//! on. It can be tested on host without any feature flags or hardware.
//!
//! # Design Principles
//!
//! - **Zero cfg**: No `#[cfg(feature = ...)]` directives allowed
//! - **Pure no_std**: No std library dependencies, no allocation
//! - **Trait abstractions**: Time and text output injected by the caller
//!
//! # Modules
//!
//! - [`bus`]: Publisher/subscriber chain primitives
//! - [`command`]: Line accumulation, parsing and per-letter dispatch
//! - [`arbitration`]: The per-tick arbitration token and claim identity
//! - [`behavior`]: Behavior trait, common sub-commands and the behavior arena
//! - [`scheduler`]: Fixed-interval tick driver
//! - [`controller`]: Router + scheduler + arena bundled for a control loop
//! - [`parameters`]: Name/value parameter store for tunables
//! - [`traits`]: Platform-agnostic trait abstractions (TimeSource)

#![no_std]

pub mod arbitration;
pub mod behavior;
pub mod bus;
pub mod command;
pub mod controller;
pub mod parameters;
pub mod scheduler;
pub mod traits;
