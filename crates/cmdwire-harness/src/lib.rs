//! Test harness for the cmdwire send path.
//!
//! Spy implementations of [`cmdwire_core::CommandSink`] and
//! [`cmdwire_core::ExclusionGuard`] that append every call to one shared
//! [`CallLog`], so tests can assert the exact interleaving of acquire, write,
//! flush and release. Sinks can be told to fail any chosen call through a
//! [`FaultPlan`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod calls;
pub mod sink;
pub mod spy_guard;

pub use calls::{Call, CallLog, expected_sink_calls};
pub use sink::{FaultPlan, RecordingSink};
pub use spy_guard::SpyGuard;
