//! Application layer: the control plane of one simulated interface.
//!
//! # Modules
//!
//! - **`control_plane`** – [`WirelessInterface`](control_plane::WirelessInterface),
//!   the scan / connect / disconnect admission API plus bring-up and teardown.
//! - **`context`** – the shared per-interface state and its lock.
//! - **`lock`** – a mutex whose waits can be interrupted.
//! - **`executor`** – the bounded queue that defers work off the admission path.
//! - **`tasks`** – the deferred scan, connect, and disconnect bodies.
//! - **`announcer`** – registers the synthetic access point with the upper stack.
//! - **`upper_stack`** – the completion callback trait.
//!
//! Nothing here depends on `infrastructure`; adapters are injected as
//! `Arc<dyn UpperStack>`.

pub mod announcer;
pub mod context;
pub mod control_plane;
pub mod executor;
pub mod lock;
pub mod tasks;
pub mod upper_stack;
