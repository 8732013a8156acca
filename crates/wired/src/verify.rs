//! Verification of a wired object graph
//!
//! Two checks run after setup:
//!
//! - completeness: every real implementation has all its dependency fields
//!   filled, so a test honestly reflects the graph under test and does not
//!   break when a previously unused dependency starts being used
//! - necessity: every mock was handed to at least one setter, so stale test
//!   setup surfaces after a refactoring removed a dependency

use crate::config::Config;
use crate::error::{WireError, WireResult};
use crate::registry::{InstanceView, Origin, Registry};

impl Registry {
    /// Are we all there?
    pub(crate) fn verify_implementations_supplied_with_dependencies(
        &self,
        config: &dyn Config,
    ) -> WireResult<()> {
        for entry in &self.store.entries {
            if entry.origin != Origin::Stub || config.is_mock(&InstanceView::new(entry)) {
                continue;
            }
            let (Some(object), Some(blueprint)) = (&entry.object, &entry.blueprint) else {
                continue;
            };
            for field in &blueprint.fields {
                let value = (field.inspect)(&**object).map_err(|message| WireError::FieldAccess {
                    owner: entry.key.type_name().to_string(),
                    field: field.name.to_string(),
                    message,
                })?;
                if value.is_none() {
                    return Err(WireError::MissingDependency {
                        owner: entry.key.simple_name().to_string(),
                        field: field.name.to_string(),
                        field_type: field.role.simple_name().to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Someone without an invitation?
    pub(crate) fn verify_mocks_are_required(&self, config: &dyn Config) -> WireResult<()> {
        for entry in &self.store.entries {
            if config.is_mock(&InstanceView::new(entry)) && !self.was_injected(entry.key) {
                return Err(WireError::UnusedMock {
                    role: entry.key.simple_name().to_string(),
                });
            }
        }
        Ok(())
    }
}
