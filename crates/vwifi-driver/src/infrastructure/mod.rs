//! Infrastructure layer: adapters around the control plane.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `vwifi_core`, but MUST NOT be imported by them outside of tests.
//!
//! - **`upper_stack`** – `UpperStack` implementations: an event channel for
//!   the binary and a recording double for tests.
//! - **`storage`** – TOML configuration file.

pub mod storage;
pub mod upper_stack;
