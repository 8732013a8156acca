//! Human readable dump of the container state
//!
//! Every entry is listed as `- role => implementation`. Stubs additionally
//! list each dependency field whose type is a known role, with the
//! implementation currently filling it or `null`.

use std::fmt::{self, Write};

use crate::registry::{Origin, Registry};

impl Registry {
    pub(crate) fn render(&self, out: &mut impl Write) -> fmt::Result {
        for entry in &self.store.entries {
            writeln!(out, "- {} => {}", entry.key.simple_name(), entry.display_name())?;
            if entry.origin != Origin::Stub {
                continue;
            }
            let (Some(object), Some(blueprint)) = (&entry.object, &entry.blueprint) else {
                continue;
            };
            for field in &blueprint.fields {
                if !self.store.is_bound(field.role) {
                    continue;
                }
                let value = match (field.inspect)(&**object) {
                    Ok(Some(address)) => self
                        .store
                        .find_by_address(address)
                        .map(|owner| owner.display_name())
                        .unwrap_or_else(|| "unregistered".to_string()),
                    Ok(None) => "null".to_string(),
                    Err(_) => "<borrowed>".to_string(),
                };
                writeln!(
                    out,
                    "\t{} {} = {}",
                    field.role.simple_name(),
                    field.name,
                    value
                )?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::manifest::{Blueprint, Manifest, Wireable};
    use crate::registry::MockHandle;
    use crate::slot::Slot;

    trait Lamp {}
    trait Switch {}
    struct FakeLamp;
    impl Lamp for FakeLamp {}
    struct LooseSwitch;
    impl Switch for LooseSwitch {}

    #[derive(Default)]
    struct Room {
        lamp: Slot<dyn Lamp>,
        switch: Slot<dyn Switch>,
    }

    impl Wireable for Room {
        fn manifest(m: &mut Manifest<Self>) {
            m.dependency::<dyn Lamp>("lamp", |it| &it.lamp)
                .dependency::<dyn Switch>("switch", |it| &it.switch);
        }
    }

    #[test]
    fn test_render_lists_roles_and_fields() {
        let mut registry = Registry::new();
        let room = Rc::new(Room::default());
        registry
            .register_stub(room.clone(), Blueprint::of::<Room>(), Vec::new())
            .unwrap();

        let lamp: Rc<dyn Lamp> = Rc::new(FakeLamp);
        registry.register_mock(MockHandle::new(lamp.clone())).unwrap();
        room.lamp.fill(lamp).unwrap();

        let mut out = String::new();
        registry.render(&mut out).unwrap();

        assert_eq!(out, "- Room => Room\n\tLamp lamp = mock of Lamp\n- Lamp => mock of Lamp\n");
    }

    #[test]
    fn test_render_shows_null_and_unregistered_values() {
        let mut registry = Registry::new();
        let room = Rc::new(Room::default());
        registry
            .register_stub(room.clone(), Blueprint::of::<Room>(), Vec::new())
            .unwrap();
        registry
            .register_mock(MockHandle::new::<dyn Lamp>(Rc::new(FakeLamp)))
            .unwrap();
        registry
            .register_mock(MockHandle::new::<dyn Switch>(Rc::new(LooseSwitch)))
            .unwrap();
        room.switch.fill(Rc::new(LooseSwitch)).unwrap();

        let mut out = String::new();
        registry.render(&mut out).unwrap();

        assert!(out.contains("\tLamp lamp = null\n"));
        assert!(out.contains("\tSwitch switch = unregistered\n"));
    }
}
