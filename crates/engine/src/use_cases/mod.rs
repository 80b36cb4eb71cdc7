//! Use cases - protocol and decision orchestration.
//!
//! `negotiation` owns the wire-level state machine; `agent` is the decider
//! it consults on every force.

pub mod agent;
pub mod negotiation;
