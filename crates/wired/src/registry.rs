//! Instance registry
//!
//! Entries live in an arena owned by the container and are addressed by
//! [`EntryId`]. Two tables index the arena: the instance store maps an
//! implementation key to its entry, the role table maps every role to the
//! implementation key filling it. A stub is always keyed by its own type
//! before it is exposed under its contracts; a mock is keyed by the role it
//! stands in for.

use std::any::Any;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use tracing::{debug, warn};

use crate::error::{WireError, WireResult};
use crate::manifest::{Blueprint, Wireable};
use crate::role::Role;

/// Index of an entry in the registry arena
pub type EntryId = usize;

/// How an instance entered the container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// A real implementation under test
    Stub,
    /// A test double produced by the mock policy
    Mock,
}

/// A mock produced by the mock policy for a single role.
pub struct MockHandle {
    role: Role,
    value: Box<dyn Any>,
    address: *const (),
}

impl MockHandle {
    pub fn new<R: ?Sized + 'static>(mock: Rc<R>) -> Self {
        Self {
            role: Role::of::<R>(),
            address: Rc::as_ptr(&mock).cast::<()>(),
            value: Box::new(mock),
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }
}

impl std::fmt::Debug for MockHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockHandle").field("role", &self.role).finish()
    }
}

pub(crate) struct Entry {
    pub(crate) key: Role,
    pub(crate) origin: Origin,
    /// Stub object, `None` for mocks
    pub(crate) object: Option<Rc<dyn Any>>,
    /// One `Rc<R>` per role this entry was registered under
    pub(crate) handles: Vec<(Role, Box<dyn Any>)>,
    pub(crate) characteristic: Vec<Role>,
    pub(crate) address: *const (),
    pub(crate) blueprint: Option<Blueprint>,
}

impl Entry {
    pub(crate) fn handle(&self, role: Role) -> Option<&dyn Any> {
        self.handles
            .iter()
            .find(|(r, _)| *r == role)
            .map(|(_, handle)| handle.as_ref())
    }

    /// Name of the implementation, `mock of X` for mocks
    pub(crate) fn display_name(&self) -> String {
        match self.origin {
            Origin::Stub => self.key.simple_name().to_string(),
            Origin::Mock => format!("mock of {}", self.key.simple_name()),
        }
    }
}

/// Read-only view of a stored instance, handed to the mock policy.
pub struct InstanceView<'a> {
    entry: &'a Entry,
}

impl<'a> InstanceView<'a> {
    pub(crate) fn new(entry: &'a Entry) -> Self {
        Self { entry }
    }

    /// The implementation key of the instance
    pub fn role(&self) -> Role {
        self.entry.key
    }

    pub fn origin(&self) -> Origin {
        self.entry.origin
    }

    /// The `Rc<R>` stored for the instance's own key, as `&dyn Any`
    pub fn value(&self) -> Option<&'a dyn Any> {
        self.entry.handle(self.entry.key)
    }
}

/// The arena and the two tables indexing it.
#[derive(Default)]
pub(crate) struct Store {
    pub(crate) entries: Vec<Entry>,
    instances: HashMap<Role, EntryId>,
    implementations: HashMap<Role, Role>,
}

impl Store {
    /// role -> implementation -> entry
    pub(crate) fn lookup(&self, role: Role) -> Option<&Entry> {
        let implementation = self.implementations.get(&role)?;
        let id = self.instances.get(implementation)?;
        self.entries.get(*id)
    }

    pub(crate) fn require(&self, role: Role) -> WireResult<&Entry> {
        self.lookup(role).ok_or_else(|| WireError::MissingWiring {
            role: role.type_name().to_string(),
        })
    }

    /// The `Rc<R>` currently filling `role`, boxed as `dyn Any`
    pub(crate) fn handle(&self, role: Role) -> Option<&dyn Any> {
        self.lookup(role).and_then(|entry| entry.handle(role))
    }

    pub(crate) fn instance(&self, key: Role) -> Option<&Entry> {
        self.instances.get(&key).and_then(|id| self.entries.get(*id))
    }

    pub(crate) fn is_bound(&self, role: Role) -> bool {
        self.implementations.contains_key(&role)
    }

    pub(crate) fn bound_roles(&self) -> impl Iterator<Item = Role> + '_ {
        self.implementations.keys().copied()
    }

    /// Entry whose instance lives at `address`
    pub(crate) fn find_by_address(&self, address: *const ()) -> Option<&Entry> {
        self.entries.iter().find(|entry| entry.address == address)
    }
}

/// Instance store, role table and injected-set of one container.
#[derive(Default)]
pub(crate) struct Registry {
    pub(crate) store: Store,
    /// Roles that have been handed to at least one setter
    pub(crate) injected: HashSet<Role>,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Record a stub under its own type and each of its characteristic
    /// contracts.
    pub(crate) fn register_stub<T: Wireable>(
        &mut self,
        instance: Rc<T>,
        blueprint: Blueprint,
        characteristic: Vec<Role>,
    ) -> WireResult<EntryId> {
        let key = Role::of::<T>();
        if self.store.implementations.contains_key(&key) {
            return Err(WireError::DuplicateRegistration {
                type_name: key.type_name().to_string(),
            });
        }

        let address = Rc::as_ptr(&instance).cast::<()>();
        let object: Rc<dyn Any> = instance.clone();
        let own: Box<dyn Any> = Box::new(instance);
        let mut handles = vec![(key, own)];
        for role in &characteristic {
            if let Some(handle) = blueprint.upcast(*role, &object) {
                handles.push((*role, handle));
            }
        }

        let id = self.store.entries.len();
        self.store.instances.insert(key, id);
        self.store.implementations.insert(key, key);
        for role in &characteristic {
            if let Some(previous) = self.store.implementations.insert(*role, key) {
                if previous != key {
                    warn!(
                        "Role {} moves from {} to {}",
                        role.simple_name(),
                        previous.simple_name(),
                        key.simple_name()
                    );
                }
            }
        }
        self.store.entries.push(Entry {
            key,
            origin: Origin::Stub,
            object: Some(object),
            handles,
            characteristic,
            address,
            blueprint: Some(blueprint),
        });

        debug!("Registered stub: {}", key.type_name());
        Ok(id)
    }

    /// Fails if a mock for `role` would shadow a real implementation.
    pub(crate) fn check_mock_role(&self, role: Role) -> WireResult<()> {
        let conflict = match self.store.implementations.get(&role) {
            Some(bound) if *bound != role => Some(*bound),
            _ => self
                .store
                .instance(role)
                .filter(|entry| entry.origin == Origin::Stub)
                .map(|entry| entry.key),
        };
        match conflict {
            Some(bound) => Err(WireError::RoleConflict {
                role: role.type_name().to_string(),
                bound_to: bound.type_name().to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Record a mock under its role only.
    pub(crate) fn register_mock(&mut self, mock: MockHandle) -> WireResult<EntryId> {
        let role = mock.role;
        self.check_mock_role(role)?;

        let id = self.store.entries.len();
        self.store.instances.insert(role, id);
        self.store.implementations.insert(role, role);
        self.store.entries.push(Entry {
            key: role,
            origin: Origin::Mock,
            object: None,
            handles: vec![(role, mock.value)],
            characteristic: Vec::new(),
            address: mock.address,
            blueprint: None,
        });

        debug!("Registered mock: {}", role.type_name());
        Ok(id)
    }

    /// Pretend every currently bound role has been injected.
    pub(crate) fn exempt_bound_roles(&mut self) {
        let roles: Vec<Role> = self.store.bound_roles().collect();
        self.injected.extend(roles);
    }

    pub(crate) fn was_injected(&self, role: Role) -> bool {
        self.injected.contains(&role)
    }

    pub(crate) fn len(&self) -> usize {
        self.store.entries.len()
    }
}
