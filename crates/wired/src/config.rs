//! Mock policy and container settings
//!
//! The container does not know how to build test doubles. A [`Config`]
//! supplies them, tells the verification which instances are doubles, and
//! may pre-populate the container once at construction.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::container::Container;
use crate::error::WireResult;
use crate::registration;
use crate::registry::{InstanceView, MockHandle, Origin};
use crate::role::Role;

/// Tunables of the wiring conventions
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WiredSettings {
    /// Only setters whose name starts with this prefix are used for wiring
    pub setter_prefix: String,
    /// Contracts whose simple name ends with one of these are never roles
    pub helper_suffixes: Vec<String>,
    /// Treat everything bound during `Config::init` as used
    pub exempt_init: bool,
}

impl Default for WiredSettings {
    fn default() -> Self {
        Self {
            setter_prefix: "set".to_string(),
            helper_suffixes: vec!["Listener".to_string()],
            exempt_init: true,
        }
    }
}

impl WiredSettings {
    /// Parse settings from TOML; missing keys keep their defaults.
    pub fn from_toml_str(content: &str) -> WireResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load settings from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> WireResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        debug!("Loading wiring settings from {}", path.as_ref().display());
        Self::from_toml_str(&content)
    }

    pub fn is_setter(&self, name: &str) -> bool {
        name.starts_with(&self.setter_prefix)
    }
}

/// The caller-supplied policy adapting the container to a mocking approach.
pub trait Config {
    /// Called once when the container is created. Whatever is wired here is
    /// not required to be used by the test.
    fn init(&self, container: &mut Container) -> WireResult<()> {
        let _ = container;
        Ok(())
    }

    /// Make a mock for `role`, or `None` if this policy cannot.
    fn mock(&self, role: &Role) -> Option<MockHandle>;

    /// Is this instance a test double?
    fn is_mock(&self, instance: &InstanceView<'_>) -> bool {
        instance.origin() == Origin::Mock
    }

    fn settings(&self) -> WiredSettings {
        WiredSettings::default()
    }
}

type MockFactory = Box<dyn Fn() -> MockHandle>;
type InitHook = Box<dyn Fn(&mut Container) -> WireResult<()>>;

/// A [`Config`] backed by a table of mock factories, one per role.
///
/// ```rust
/// use std::rc::Rc;
/// use wired::MockCatalog;
///
/// trait Mailer {}
/// struct NullMailer;
/// impl Mailer for NullMailer {}
///
/// let config = MockCatalog::new().with_mock::<dyn Mailer>(|| Rc::new(NullMailer));
/// assert!(config.contains(&wired::Role::of::<dyn Mailer>()));
/// ```
#[derive(Default)]
pub struct MockCatalog {
    factories: HashMap<Role, MockFactory>,
    init: Option<InitHook>,
    settings: WiredSettings,
}

impl MockCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register how to build a mock for role `R`.
    pub fn with_mock<R: ?Sized + 'static>(mut self, factory: impl Fn() -> Rc<R> + 'static) -> Self {
        self.factories
            .insert(Role::of::<R>(), Box::new(move || MockHandle::new(factory())));
        self
    }

    /// Run `hook` when the container is created.
    pub fn on_init<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut Container) -> WireResult<()> + 'static,
    {
        self.init = Some(Box::new(hook));
        self
    }

    pub fn with_settings(mut self, settings: WiredSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Add every mock factory submitted through `inventory`. Factories
    /// registered explicitly take precedence.
    pub fn discover(mut self) -> Self {
        for registration in registration::discovered_mocks() {
            let role = (registration.role)();
            if self.factories.contains_key(&role) {
                continue;
            }
            debug!("Discovered mock factory '{}' for {}", registration.name, role);
            let factory = registration.factory;
            self.factories.insert(role, Box::new(factory));
        }
        self
    }

    pub fn contains(&self, role: &Role) -> bool {
        self.factories.contains_key(role)
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl Config for MockCatalog {
    fn init(&self, container: &mut Container) -> WireResult<()> {
        match &self.init {
            Some(hook) => hook(container),
            None => Ok(()),
        }
    }

    fn mock(&self, role: &Role) -> Option<MockHandle> {
        self.factories.get(role).map(|factory| factory())
    }

    fn settings(&self) -> WiredSettings {
        self.settings.clone()
    }
}

impl fmt::Debug for MockCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut roles: Vec<&str> = self.factories.keys().map(|r| r.simple_name()).collect();
        roles.sort_unstable();
        f.debug_struct("MockCatalog")
            .field("mocks", &roles)
            .field("init", &self.init.is_some())
            .field("settings", &self.settings)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    trait Mailer {}
    struct NullMailer;
    impl Mailer for NullMailer {}

    #[test]
    fn test_default_settings() {
        let settings = WiredSettings::default();
        assert!(settings.is_setter("set_mailer"));
        assert!(!settings.is_setter("mailer"));
        assert_eq!(settings.helper_suffixes, vec!["Listener".to_string()]);
        assert!(settings.exempt_init);
    }

    #[test]
    fn test_settings_from_partial_toml() {
        let settings = WiredSettings::from_toml_str("setter_prefix = \"with\"").unwrap();
        assert_eq!(settings.setter_prefix, "with");
        assert_eq!(settings.helper_suffixes, vec!["Listener".to_string()]);
    }

    #[test]
    fn test_settings_reject_bad_toml() {
        let result = WiredSettings::from_toml_str("helper_suffixes = 3");
        assert!(matches!(result, Err(crate::WireError::Settings(_))));
    }

    #[test]
    fn test_settings_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "helper_suffixes = [\"Listener\", \"Observer\"]").unwrap();
        writeln!(file, "exempt_init = false").unwrap();

        let settings = WiredSettings::load(file.path()).unwrap();
        assert_eq!(settings.helper_suffixes.len(), 2);
        assert!(!settings.exempt_init);
        assert_eq!(settings.setter_prefix, "set");
    }

    #[test]
    fn test_catalog_builds_mocks_per_role() {
        let catalog = MockCatalog::new().with_mock::<dyn Mailer>(|| Rc::new(NullMailer));
        let role = Role::of::<dyn Mailer>();

        let mock = catalog.mock(&role).unwrap();
        assert_eq!(mock.role(), role);
        assert!(catalog.mock(&Role::of::<String>()).is_none());
        assert_eq!(catalog.len(), 1);
    }
}
