//! Component manifests
//!
//! Instead of discovering setters and fields at runtime, every component
//! wired by the container describes itself through [`Wireable::manifest`]:
//! the contracts it implements (with the upcast from `Rc<Self>`), the
//! ancestor it inherits contracts from, its setters, its dependency fields
//! and its marker annotations.
//!
//! ```rust
//! use std::rc::Rc;
//! use wired::{Manifest, Slot, Wireable};
//!
//! trait Clock {
//!     fn now(&self) -> u64;
//! }
//!
//! trait Scheduler {}
//!
//! #[derive(Default)]
//! struct CronScheduler {
//!     clock: Slot<dyn Clock>,
//! }
//!
//! impl Scheduler for CronScheduler {}
//!
//! impl Wireable for CronScheduler {
//!     fn manifest(m: &mut Manifest<Self>) {
//!         m.implements::<dyn Scheduler>(|it| it)
//!             .dependency::<dyn Clock>("clock", |it| &it.clock);
//!     }
//! }
//! ```

use std::any::{type_name, Any, TypeId};
use std::marker::PhantomData;
use std::rc::Rc;

use anyhow::anyhow;

use crate::role::Role;
use crate::slot::Slot;

/// A component the container can wire.
pub trait Wireable: 'static {
    /// Describe the contracts, setters and fields of this type.
    fn manifest(manifest: &mut Manifest<Self>)
    where
        Self: Sized;
}

type Upcast = Box<dyn Fn(&Rc<dyn Any>) -> Option<Box<dyn Any>>>;
type Invoke = Box<dyn Fn(&dyn Any, &dyn Any) -> anyhow::Result<()>>;
type Inspect = Box<dyn Fn(&dyn Any) -> Result<Option<*const ()>, String>>;

/// A contract implemented by a component, with the upcast producing the
/// `Rc<dyn Contract>` handle for it.
pub(crate) struct Provision {
    pub(crate) role: Role,
    pub(crate) upcast: Upcast,
}

/// A setter: a method taking exactly one dependency and returning nothing.
pub(crate) struct SetterSpec {
    pub(crate) name: String,
    pub(crate) role: Role,
    pub(crate) invoke: Invoke,
}

/// A dependency field inspected by verification and diagnostics.
pub(crate) struct FieldSpec {
    pub(crate) name: &'static str,
    pub(crate) role: Role,
    pub(crate) inspect: Inspect,
}

/// Builder handed to [`Wireable::manifest`].
pub struct Manifest<T> {
    interfaces: Vec<Provision>,
    inherited: Vec<Role>,
    setters: Vec<SetterSpec>,
    fields: Vec<FieldSpec>,
    markers: Vec<TypeId>,
    _owner: PhantomData<fn(&T)>,
}

impl<T: Wireable> Manifest<T> {
    fn new() -> Self {
        Self {
            interfaces: Vec::new(),
            inherited: Vec::new(),
            setters: Vec::new(),
            fields: Vec::new(),
            markers: Vec::new(),
            _owner: PhantomData,
        }
    }

    /// Declare a contract directly implemented by `T`.
    ///
    /// The cast is usually `|it| it`, letting the compiler coerce
    /// `Rc<T>` into `Rc<dyn Contract>`.
    pub fn implements<R: ?Sized + 'static>(&mut self, cast: fn(Rc<T>) -> Rc<R>) -> &mut Self {
        let upcast: Upcast = Box::new(move |object: &Rc<dyn Any>| {
            let this = Rc::clone(object).downcast::<T>().ok()?;
            Some(Box::new(cast(this)) as Box<dyn Any>)
        });
        self.interfaces.push(Provision {
            role: Role::of::<R>(),
            upcast,
        });
        self
    }

    /// Declare `B` as the ancestor of `T`. Every contract `B` implements, or
    /// inherits itself, counts as inherited and is not a characteristic
    /// contract of `T`.
    pub fn inherits_from<B: Wireable>(&mut self) -> &mut Self {
        let base = Manifest::<B>::collect();
        self.inherited
            .extend(base.interfaces.iter().map(|provision| provision.role));
        self.inherited.extend(base.inherited);
        self
    }

    /// Declare a setter accepting a dependency of role `R`.
    pub fn setter<R: ?Sized + 'static>(
        &mut self,
        name: impl Into<String>,
        set: impl Fn(&T, Rc<R>) + 'static,
    ) -> &mut Self {
        self.try_setter::<R>(name, move |this, dependency| {
            set(this, dependency);
            Ok(())
        })
    }

    /// Declare a setter that may fail; a failure aborts wiring.
    pub fn try_setter<R: ?Sized + 'static>(
        &mut self,
        name: impl Into<String>,
        set: impl Fn(&T, Rc<R>) -> anyhow::Result<()> + 'static,
    ) -> &mut Self {
        let invoke: Invoke = Box::new(move |object: &dyn Any, argument: &dyn Any| {
            let this = object
                .downcast_ref::<T>()
                .ok_or_else(|| anyhow!("receiver is not a `{}`", type_name::<T>()))?;
            let dependency = argument
                .downcast_ref::<Rc<R>>()
                .ok_or_else(|| anyhow!("argument is not a `{}`", type_name::<R>()))?;
            set(this, Rc::clone(dependency))
        });
        self.setters.push(SetterSpec {
            name: name.into(),
            role: Role::of::<R>(),
            invoke,
        });
        self
    }

    /// Declare a dependency field checked by verification.
    pub fn field<R: ?Sized + 'static>(
        &mut self,
        name: &'static str,
        access: fn(&T) -> &Slot<R>,
    ) -> &mut Self {
        let inspect: Inspect = Box::new(move |object: &dyn Any| {
            let this = object
                .downcast_ref::<T>()
                .ok_or_else(|| format!("receiver is not a `{}`", type_name::<T>()))?;
            access(this).address().map_err(|e| e.to_string())
        });
        self.fields.push(FieldSpec {
            name,
            role: Role::of::<R>(),
            inspect,
        });
        self
    }

    /// Declare a field together with its `set_<name>` setter.
    pub fn dependency<R: ?Sized + 'static>(
        &mut self,
        name: &'static str,
        access: fn(&T) -> &Slot<R>,
    ) -> &mut Self {
        self.field(name, access);
        self.try_setter::<R>(format!("set_{name}"), move |this, dependency| {
            access(this).fill(dependency)?;
            Ok(())
        })
    }

    /// Attach a marker annotation, queried by `Container::get_annotated`.
    pub fn marker<M: ?Sized + 'static>(&mut self) -> &mut Self {
        self.markers.push(TypeId::of::<M>());
        self
    }

    fn collect() -> Self {
        let mut manifest = Self::new();
        T::manifest(&mut manifest);
        manifest
    }
}

/// The type-erased description of a component, kept by the registry.
pub struct Blueprint {
    pub(crate) role: Role,
    pub(crate) interfaces: Vec<Provision>,
    pub(crate) inherited: Vec<Role>,
    pub(crate) setters: Vec<SetterSpec>,
    pub(crate) fields: Vec<FieldSpec>,
    pub(crate) markers: Vec<TypeId>,
}

impl Blueprint {
    pub fn of<T: Wireable>() -> Self {
        let manifest = Manifest::<T>::collect();
        Self {
            role: Role::of::<T>(),
            interfaces: manifest.interfaces,
            inherited: manifest.inherited,
            setters: manifest.setters,
            fields: manifest.fields,
            markers: manifest.markers,
        }
    }

    /// The implementation type itself
    pub fn role(&self) -> Role {
        self.role
    }

    /// Contracts declared directly, in declaration order
    pub fn declared_interfaces(&self) -> Vec<Role> {
        self.interfaces.iter().map(|p| p.role).collect()
    }

    /// Contracts contributed by ancestors
    pub fn inherited_interfaces(&self) -> &[Role] {
        &self.inherited
    }

    pub fn setter_names(&self) -> Vec<&str> {
        self.setters.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn field_names(&self) -> Vec<&'static str> {
        self.fields.iter().map(|f| f.name).collect()
    }

    pub fn has_marker<M: ?Sized + 'static>(&self) -> bool {
        self.markers.contains(&TypeId::of::<M>())
    }

    pub(crate) fn upcast(&self, role: Role, object: &Rc<dyn Any>) -> Option<Box<dyn Any>> {
        self.interfaces
            .iter()
            .find(|p| p.role == role)
            .and_then(|p| (p.upcast)(object))
    }
}

impl std::fmt::Debug for Blueprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Blueprint")
            .field("role", &self.role)
            .field("interfaces", &self.declared_interfaces())
            .field("inherited", &self.inherited)
            .field("setters", &self.setter_names())
            .field("fields", &self.field_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    trait Engine {}
    trait Horn {}
    struct Audited;

    #[derive(Default)]
    struct Vehicle;

    impl Horn for Vehicle {}

    impl Wireable for Vehicle {
        fn manifest(m: &mut Manifest<Self>) {
            m.implements::<dyn Horn>(|it| it);
        }
    }

    #[derive(Default)]
    struct Car {
        engine: Slot<dyn Engine>,
    }

    impl Horn for Car {}

    impl Wireable for Car {
        fn manifest(m: &mut Manifest<Self>) {
            m.inherits_from::<Vehicle>()
                .implements::<dyn Horn>(|it| it)
                .dependency::<dyn Engine>("engine", |it| &it.engine)
                .marker::<Audited>();
        }
    }

    #[test]
    fn test_blueprint_collects_manifest() {
        let blueprint = Blueprint::of::<Car>();
        assert_eq!(blueprint.role(), Role::of::<Car>());
        assert_eq!(blueprint.declared_interfaces(), vec![Role::of::<dyn Horn>()]);
        assert_eq!(blueprint.inherited_interfaces(), &[Role::of::<dyn Horn>()]);
        assert_eq!(blueprint.setter_names(), vec!["set_engine"]);
        assert_eq!(blueprint.field_names(), vec!["engine"]);
        assert!(blueprint.has_marker::<Audited>());
        assert!(!blueprint.has_marker::<String>());
    }

    #[test]
    fn test_upcast_produces_contract_handle() {
        let blueprint = Blueprint::of::<Car>();
        let car: Rc<dyn Any> = Rc::new(Car::default());
        let handle = blueprint.upcast(Role::of::<dyn Horn>(), &car).unwrap();
        assert!(handle.downcast_ref::<Rc<dyn Horn>>().is_some());
        assert!(blueprint.upcast(Role::of::<dyn Engine>(), &car).is_none());
    }
}
