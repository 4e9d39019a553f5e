//! Lookout, a lightweight desktop activity sensor.
//!
//! Watches which application/window has focus and how long the user has
//! been idle, and emits a change event stream as JSON records. Sensing is
//! gated behind a permission negotiation phase; see [`permissions`] and
//! [`agent`].

pub mod agent;
pub mod error;
pub mod event;
pub mod permissions;
pub mod platform;
pub mod sampler;
