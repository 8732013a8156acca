//! # Wiring Guide
//!
//! ## Describing Components
//!
//! A component implements [`Wireable`](crate::Wireable) and lists what the
//! container may use in its manifest:
//!
//! - `implements::<dyn Contract>(|it| it)` - a contract the type fulfils
//! - `inherits_from::<Base>()` - contracts of `Base` are inherited, not
//!   characteristic
//! - `setter::<R>(name, f)` - a method taking one dependency of role `R`
//! - `field::<R>(name, accessor)` - a dependency checked by verification
//! - `dependency::<R>(name, accessor)` - a field plus its `set_<name>`
//!   setter, the common case
//! - `marker::<M>()` - a marker found by `get_annotated::<M>()`
//!
//! Dependencies live in a [`Slot`](crate::Slot), so setters only need
//! `&self`.
//!
//! ## Roles
//!
//! A stub is reachable by its own type and by each of its characteristic
//! contracts. A contract is characteristic unless an ancestor already
//! implements it or its simple name ends with one of the configured helper
//! suffixes (`Listener` by default). Wiring a second stub for the same
//! contract moves the role to the newer stub.
//!
//! A mock is reachable only by the role it was requested for and is never
//! wired itself.
//!
//! ## Setters
//!
//! Only setters whose name starts with the configured prefix (`set` by
//! default) are used. Every such setter whose parameter role is bound is
//! called, regardless of whether its field is already filled.
//!
//! ```rust
//! use std::rc::Rc;
//! use wired::{wire_mocks, Container, Manifest, MockCatalog, Slot, Wireable};
//!
//! trait Repository {}
//! trait Notifier {}
//! struct InMemory;
//! impl Repository for InMemory {}
//! struct Silent;
//! impl Notifier for Silent {}
//!
//! #[derive(Default)]
//! struct Orders {
//!     repository: Slot<dyn Repository>,
//!     notifier: Slot<dyn Notifier>,
//! }
//!
//! impl Wireable for Orders {
//!     fn manifest(m: &mut Manifest<Self>) {
//!         m.dependency::<dyn Repository>("repository", |it| &it.repository)
//!             .dependency::<dyn Notifier>("notifier", |it| &it.notifier);
//!     }
//! }
//!
//! # fn main() -> wired::WireResult<()> {
//! let catalog = MockCatalog::new()
//!     .with_mock::<dyn Repository>(|| Rc::new(InMemory))
//!     .with_mock::<dyn Notifier>(|| Rc::new(Silent));
//! let mut container = Container::new(catalog)?;
//!
//! wire_mocks!(container, dyn Repository, dyn Notifier)?;
//! let orders = container.wire_default::<Orders>()?;
//!
//! assert!(orders.repository.is_filled() && orders.notifier.is_filled());
//! container.verify_implementation_wiring()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Verification
//!
//! `verify_implementation_wiring` fails when
//!
//! 1. a stub has an empty dependency field, or
//! 2. a mock was never handed to any setter.
//!
//! Whatever the mock policy wires in [`Config::init`](crate::Config::init)
//! is exempt from the second check unless `exempt_init` is switched off.
//!
//! ## Settings
//!
//! ```toml
//! setter_prefix = "set"
//! helper_suffixes = ["Listener"]
//! exempt_init = true
//! ```
//!
//! Load them with [`WiredSettings::load`](crate::WiredSettings::load) and
//! hand them to [`MockCatalog::with_settings`](crate::MockCatalog::with_settings).
//!
//! ## Shipping Mocks
//!
//! Test support crates can submit mock factories with `inventory::submit!`
//! and a [`MockRegistration`](crate::MockRegistration);
//! [`MockCatalog::discover`](crate::MockCatalog::discover) picks them up.
