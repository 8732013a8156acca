//! The wiring container
//!
//! A [`Container`] is created per test. Components under test are wired as
//! stubs, everything they depend on but is not under test is wired as a
//! mock built by the [`Config`]. Each registration immediately connects the
//! new instance with everything already in the container, in both
//! directions, so the order of `wire_*` calls does not matter.
//!
//! ```rust
//! use std::rc::Rc;
//! use wired::{Container, Manifest, MockCatalog, Slot, Wireable};
//!
//! trait Mailer {}
//! struct NullMailer;
//! impl Mailer for NullMailer {}
//!
//! #[derive(Default)]
//! struct Signup {
//!     mailer: Slot<dyn Mailer>,
//! }
//!
//! impl Wireable for Signup {
//!     fn manifest(m: &mut Manifest<Self>) {
//!         m.dependency::<dyn Mailer>("mailer", |it| &it.mailer);
//!     }
//! }
//!
//! # fn main() -> wired::WireResult<()> {
//! let mut container =
//!     Container::new(MockCatalog::new().with_mock::<dyn Mailer>(|| Rc::new(NullMailer)))?;
//! let signup = container.wire_default::<Signup>()?;
//! container.wire_mock::<dyn Mailer>()?;
//!
//! assert!(signup.mailer.is_filled());
//! container.verify_implementation_wiring()?;
//! # Ok(())
//! # }
//! ```

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use tracing::{debug, info};

use crate::config::{Config, MockCatalog, WiredSettings};
use crate::error::{WireError, WireResult};
use crate::manifest::{Blueprint, Wireable};
use crate::registry::{Origin, Registry};
use crate::resolver;
use crate::role::Role;

type StubFactory = Box<dyn FnOnce(&mut Container) -> WireResult<()>>;

enum TargetKind {
    Stub(Role, StubFactory),
    Mock(Role),
}

/// Something to wire when the caller only has a list of types at hand.
///
/// Concrete components become stubs, contracts become mocks.
pub struct Target {
    kind: TargetKind,
}

impl Target {
    /// A default-constructed implementation of `T`
    pub fn stub<T: Wireable + Default>() -> Self {
        Self {
            kind: TargetKind::Stub(
                Role::of::<T>(),
                Box::new(|container: &mut Container| {
                    container.wire_default::<T>().map(|_| ())
                }),
            ),
        }
    }

    /// A mock standing in for `R`
    pub fn mock<R: ?Sized + 'static>() -> Self {
        Self {
            kind: TargetKind::Mock(Role::of::<R>()),
        }
    }

    pub fn role(&self) -> Role {
        match &self.kind {
            TargetKind::Stub(role, _) | TargetKind::Mock(role) => *role,
        }
    }

    pub fn is_mock(&self) -> bool {
        matches!(self.kind, TargetKind::Mock(_))
    }
}

impl fmt::Debug for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.is_mock() { "mock" } else { "stub" };
        write!(f, "Target({} {})", kind, self.role())
    }
}

/// Per-test registry of stubs and mocks, wired by setter convention.
pub struct Container {
    registry: Registry,
    config: Rc<dyn Config>,
    settings: WiredSettings,
}

impl Container {
    /// Create a container and let `config` populate it.
    ///
    /// With [`WiredSettings::exempt_init`] set, every role bound during
    /// initialisation counts as used for [`verify_implementation_wiring`].
    ///
    /// [`verify_implementation_wiring`]: Container::verify_implementation_wiring
    pub fn new(config: impl Config + 'static) -> WireResult<Self> {
        let config: Rc<dyn Config> = Rc::new(config);
        let settings = config.settings();
        let mut container = Self {
            registry: Registry::new(),
            config: Rc::clone(&config),
            settings,
        };

        config.init(&mut container)?;
        if container.settings.exempt_init {
            container.registry.exempt_bound_roles();
        }

        info!("Created wiring container with {} instances", container.len());
        Ok(container)
    }

    /// A container with an empty [`MockCatalog`]: stubs only.
    pub fn with_defaults() -> Self {
        Self {
            registry: Registry::new(),
            config: Rc::new(MockCatalog::new()),
            settings: WiredSettings::default(),
        }
    }

    pub fn settings(&self) -> &WiredSettings {
        &self.settings
    }

    /// Register `instance` as a real implementation and wire it.
    pub fn wire_stub<T: Wireable>(&mut self, instance: T) -> WireResult<Rc<T>> {
        self.wire_stub_rc(Rc::new(instance))
    }

    /// Like [`wire_stub`](Container::wire_stub) for an instance the caller
    /// already shares.
    pub fn wire_stub_rc<T: Wireable>(&mut self, instance: Rc<T>) -> WireResult<Rc<T>> {
        let blueprint = Blueprint::of::<T>();
        let characteristic =
            resolver::characteristic_interfaces(&blueprint, &self.settings.helper_suffixes);
        debug!(
            "Wiring stub {} as {:?}",
            blueprint.role(),
            characteristic
                .iter()
                .map(|role| role.simple_name())
                .collect::<Vec<_>>()
        );

        let id = self
            .registry
            .register_stub(Rc::clone(&instance), blueprint, characteristic)?;
        self.registry
            .wire_instances_with_implementation(id, &self.settings)?;
        Ok(instance)
    }

    /// Build the stub with `factory`, then wire it.
    pub fn wire_stub_with<T: Wireable>(
        &mut self,
        factory: impl FnOnce() -> anyhow::Result<T>,
    ) -> WireResult<Rc<T>> {
        let instance = factory().map_err(|source| WireError::Instantiation {
            type_name: std::any::type_name::<T>().to_string(),
            source,
        })?;
        self.wire_stub(instance)
    }

    /// Wire a default-constructed `T`.
    pub fn wire_default<T: Wireable + Default>(&mut self) -> WireResult<Rc<T>> {
        self.wire_stub(T::default())
    }

    /// Wire a mock for role `R`, creating it through the [`Config`] unless
    /// one exists already.
    pub fn wire_mock<R: ?Sized + 'static>(&mut self) -> WireResult<Rc<R>> {
        let role = Role::of::<R>();
        self.ensure_mock_exists(role)?;
        self.registry
            .wire_instances_with_mock(role, &self.settings)?;
        self.mock_of::<R>(role)
    }

    /// Create all mocks first, then wire each of them.
    pub fn wire_mocks(&mut self, roles: impl IntoIterator<Item = Role>) -> WireResult<()> {
        let roles: Vec<Role> = roles.into_iter().collect();
        for role in &roles {
            self.ensure_mock_exists(*role)?;
        }
        for role in roles {
            self.registry
                .wire_instances_with_mock(role, &self.settings)?;
        }
        Ok(())
    }

    pub fn wire(&mut self, target: Target) -> WireResult<()> {
        match target.kind {
            TargetKind::Stub(_, factory) => factory(self),
            TargetKind::Mock(role) => self.wire_mocks([role]),
        }
    }

    /// Wire every mock in `targets`, then every stub in order. All mocks
    /// are created before the first of them is wired.
    pub fn wire_all(&mut self, targets: impl IntoIterator<Item = Target>) -> WireResult<()> {
        let (mocks, stubs): (Vec<Target>, Vec<Target>) =
            targets.into_iter().partition(Target::is_mock);
        self.wire_mocks(mocks.iter().map(Target::role))?;
        for stub in stubs {
            self.wire(stub)?;
        }
        Ok(())
    }

    fn ensure_mock_exists(&mut self, role: Role) -> WireResult<()> {
        if let Some(entry) = self.registry.store.instance(role) {
            if entry.origin == Origin::Mock {
                return Ok(());
            }
        }
        self.registry.check_mock_role(role)?;

        let mock = self
            .config
            .mock(&role)
            .ok_or_else(|| WireError::MockUnavailable {
                role: role.type_name().to_string(),
            })?;
        if mock.role() != role {
            return Err(WireError::MockTypeMismatch {
                role: role.type_name().to_string(),
            });
        }
        self.registry.register_mock(mock)?;
        Ok(())
    }

    fn mock_of<R: ?Sized + 'static>(&self, role: Role) -> WireResult<Rc<R>> {
        self.registry
            .store
            .instance(role)
            .and_then(|entry| entry.handle(role))
            .and_then(|handle| handle.downcast_ref::<Rc<R>>())
            .cloned()
            .ok_or_else(|| WireError::MockTypeMismatch {
                role: role.type_name().to_string(),
            })
    }

    /// The instance currently filling role `R`.
    pub fn get<R: ?Sized + 'static>(&self) -> WireResult<Rc<R>> {
        let role = Role::of::<R>();
        let entry = self.registry.store.require(role)?;
        entry
            .handle(role)
            .and_then(|handle| handle.downcast_ref::<Rc<R>>())
            .cloned()
            .ok_or_else(|| WireError::MissingWiring {
                role: role.type_name().to_string(),
            })
    }

    pub fn try_get<R: ?Sized + 'static>(&self) -> Option<Rc<R>> {
        self.get::<R>().ok()
    }

    /// Every stub carrying marker `M`, in registration order.
    pub fn get_annotated<M: ?Sized + 'static>(&self) -> Vec<Rc<dyn Any>> {
        self.registry
            .store
            .entries
            .iter()
            .filter(|entry| {
                entry
                    .blueprint
                    .as_ref()
                    .is_some_and(|blueprint| blueprint.has_marker::<M>())
            })
            .filter_map(|entry| entry.object.clone())
            .collect()
    }

    /// Check that all real implementations have their dependencies and that
    /// every mock is used by at least one of them.
    pub fn verify_implementation_wiring(&self) -> WireResult<()> {
        let config = self.config.as_ref();
        self.registry
            .verify_implementations_supplied_with_dependencies(config)?;
        self.registry.verify_mocks_are_required(config)?;
        info!("Verified wiring of {} instances", self.len());
        Ok(())
    }

    /// Number of registered stubs and mocks
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Is some instance filling role `R`?
    pub fn contains<R: ?Sized + 'static>(&self) -> bool {
        self.registry.store.is_bound(Role::of::<R>())
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.registry.render(f)
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("instances", &self.len())
            .field("settings", &self.settings)
            .finish()
    }
}
