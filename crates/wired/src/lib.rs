//! Auto-wiring container for tests
//!
//! This crate wires an object graph for a unit or integration test. The
//! components under test are registered as stubs, everything else they
//! depend on is replaced by a mock built by a pluggable mock policy. Wiring
//! happens through setters following a naming convention, so the test never
//! spells out which instance goes where.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::rc::Rc;
//! use wired::{container, Manifest, MockCatalog, Slot, Wireable};
//!
//! trait Clock {
//!     fn now(&self) -> u64;
//! }
//!
//! struct FrozenClock;
//! impl Clock for FrozenClock {
//!     fn now(&self) -> u64 {
//!         42
//!     }
//! }
//!
//! #[derive(Default)]
//! struct Reminder {
//!     clock: Slot<dyn Clock>,
//! }
//!
//! impl Wireable for Reminder {
//!     fn manifest(m: &mut Manifest<Self>) {
//!         m.dependency::<dyn Clock>("clock", |it| &it.clock);
//!     }
//! }
//!
//! # fn main() -> wired::WireResult<()> {
//! let mut fixture = container(MockCatalog::new().with_mock::<dyn Clock>(|| Rc::new(FrozenClock)))?;
//! let reminder = fixture.wire_default::<Reminder>()?;
//! fixture.wire_mock::<dyn Clock>()?;
//! fixture.verify_implementation_wiring()?;
//!
//! assert_eq!(reminder.clock.get().map(|clock| clock.now()), Some(42));
//! # Ok(())
//! # }
//! ```
//!
//! See [`usage`] module for the wiring rules in detail.

pub mod config;
pub mod container;
mod diagnostics;
mod engine;
pub mod error;
pub mod logging;
pub mod manifest;
pub mod registration;
pub mod registry;
pub mod resolver;
pub mod role;
pub mod slot;
pub mod usage;
mod verify;

pub use config::{Config, MockCatalog, WiredSettings};
pub use container::{Container, Target};
pub use error::{WireError, WireResult};
pub use manifest::{Blueprint, Manifest, Wireable};
pub use registration::{
    discovered_mock_count, discovered_mocks, list_discovered_mocks, MockRegistration,
};
pub use registry::{InstanceView, MockHandle, Origin};
pub use role::Role;
pub use slot::Slot;

/// Create a container driven by `config`.
pub fn container(config: impl Config + 'static) -> WireResult<Container> {
    Container::new(config)
}

/// Convenience macro for wiring several mocks at once
///
/// All mocks are created before the first one is wired.
#[macro_export]
macro_rules! wire_mocks {
    ($container:expr, $($role:ty),+ $(,)?) => {
        $container.wire_mocks([$($crate::Role::of::<$role>()),+])
    };
}
