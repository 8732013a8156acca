//! The wiring engine
//!
//! Runs once per registration. A new stub first pulls in whatever it can
//! consume from the container (push into the new instance), then is offered
//! to every stub that can consume it (pull from the rest of the graph).
//! Mocks are leaves: they are only offered, never wired themselves.
//!
//! Wiring is incremental. An instance registered before one of its
//! dependencies only receives it if the dependency's own registration offers
//! it back, which it always does for setters matching one of its roles.

use std::any::Any;
use std::collections::HashSet;

use tracing::debug;

use crate::config::WiredSettings;
use crate::error::{WireError, WireResult};
use crate::manifest::SetterSpec;
use crate::registry::{Entry, EntryId, Origin, Registry};
use crate::role::Role;

impl Registry {
    /// Wire a freshly registered stub with everything known so far, and
    /// everything known so far with the stub.
    pub(crate) fn wire_instances_with_implementation(
        &mut self,
        id: EntryId,
        settings: &WiredSettings,
    ) -> WireResult<()> {
        let Registry { store, injected } = self;
        let entry = &store.entries[id];
        if let (Some(object), Some(blueprint)) = (&entry.object, &entry.blueprint) {
            for setter in &blueprint.setters {
                if !settings.is_setter(&setter.name) {
                    continue;
                }
                if let Some(dependency) = store.handle(setter.role) {
                    invoke(entry, &**object, setter, dependency, injected)?;
                }
            }
        }

        let mut offered = entry.characteristic.clone();
        offered.push(entry.key);
        for role in offered {
            self.wire_instances_with_type(role, settings)?;
        }
        Ok(())
    }

    /// Offer a freshly registered mock to every stub.
    pub(crate) fn wire_instances_with_mock(
        &mut self,
        role: Role,
        settings: &WiredSettings,
    ) -> WireResult<()> {
        self.wire_instances_with_type(role, settings)
    }

    /// Hand the instance now filling `role` to every setter for `role` on a
    /// stub. Mock entries are skipped as receivers.
    fn wire_instances_with_type(&mut self, role: Role, settings: &WiredSettings) -> WireResult<()> {
        let Registry { store, injected } = self;
        let source = store.require(role)?;
        let Some(dependency) = source.handle(role) else {
            return Err(WireError::MissingWiring {
                role: role.type_name().to_string(),
            });
        };

        for entry in store.entries.iter().filter(|e| e.origin == Origin::Stub) {
            let (Some(object), Some(blueprint)) = (&entry.object, &entry.blueprint) else {
                continue;
            };
            for setter in &blueprint.setters {
                if setter.role == role && settings.is_setter(&setter.name) {
                    invoke(entry, &**object, setter, dependency, injected)?;
                }
            }
        }
        Ok(())
    }
}

fn invoke(
    owner: &Entry,
    object: &dyn Any,
    setter: &SetterSpec,
    dependency: &dyn Any,
    injected: &mut HashSet<Role>,
) -> WireResult<()> {
    (setter.invoke)(object, dependency).map_err(|source| WireError::Invocation {
        owner: owner.key.type_name().to_string(),
        setter: setter.name.clone(),
        source,
    })?;
    injected.insert(setter.role);
    debug!(
        "Injected {} into {}::{}",
        setter.role.simple_name(),
        owner.key.simple_name(),
        setter.name
    );
    Ok(())
}
