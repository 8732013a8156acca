//! End-to-End Test Suite: Test Fixtures Built With the Wiring Container
//!
//! These tests play the part of a downstream test suite. Mocks for shared
//! contracts are shipped once through inventory, conventions come from a
//! settings file, and each test wires only the components it exercises.

use std::cell::{Cell, RefCell};
use std::io::Write;
use std::rc::Rc;

use tempfile::NamedTempFile;
use wired::{
    list_discovered_mocks, Container, Manifest, MockCatalog, MockHandle, MockRegistration, Role,
    Slot, WireError, Wireable, WiredSettings,
};

trait Inventory {
    fn reserve(&self, sku: &str, quantity: u32) -> bool;
}
trait Billing {
    fn charge(&self, cents: u64) -> anyhow::Result<String>;
}
trait AuditObserver {
    fn record(&self, line: &str);
}

/// Inventory that never runs out
struct Unlimited;
impl Inventory for Unlimited {
    fn reserve(&self, _sku: &str, _quantity: u32) -> bool {
        true
    }
}

/// Billing that always succeeds with a fixed receipt
struct FreeBilling;
impl Billing for FreeBilling {
    fn charge(&self, cents: u64) -> anyhow::Result<String> {
        Ok(format!("receipt-{cents}"))
    }
}

inventory::submit! {
    MockRegistration::new(
        "e2e-unlimited-inventory",
        || Role::of::<dyn Inventory>(),
        || MockHandle::new::<dyn Inventory>(Rc::new(Unlimited)),
    )
}

inventory::submit! {
    MockRegistration::new(
        "e2e-free-billing",
        || Role::of::<dyn Billing>(),
        || MockHandle::new::<dyn Billing>(Rc::new(FreeBilling)),
    )
}

#[derive(Default)]
struct AuditTrail {
    lines: RefCell<Vec<String>>,
}
impl AuditObserver for AuditTrail {
    fn record(&self, line: &str) {
        self.lines.borrow_mut().push(line.to_string());
    }
}
impl Wireable for AuditTrail {
    fn manifest(m: &mut Manifest<Self>) {
        m.implements::<dyn AuditObserver>(|it| it);
    }
}

/// Checkout service under test
#[derive(Default)]
struct Checkout {
    inventory: Slot<dyn Inventory>,
    billing: Slot<dyn Billing>,
    audit: Slot<AuditTrail>,
    orders: Cell<u32>,
}

impl Checkout {
    fn place(&self, sku: &str, quantity: u32, cents: u64) -> anyhow::Result<String> {
        let inventory = self
            .inventory
            .get()
            .ok_or_else(|| anyhow::anyhow!("inventory not wired"))?;
        let billing = self
            .billing
            .get()
            .ok_or_else(|| anyhow::anyhow!("billing not wired"))?;
        if !inventory.reserve(sku, quantity) {
            anyhow::bail!("{sku} sold out");
        }
        let receipt = billing.charge(cents * u64::from(quantity))?;
        if let Some(audit) = self.audit.get() {
            audit.record(&receipt);
        }
        self.orders.set(self.orders.get() + 1);
        Ok(receipt)
    }
}

impl Wireable for Checkout {
    fn manifest(m: &mut Manifest<Self>) {
        m.dependency::<dyn Inventory>("inventory", |it| &it.inventory)
            .dependency::<dyn Billing>("billing", |it| &it.billing)
            .dependency::<AuditTrail>("audit", |it| &it.audit);
    }
}

fn settings_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create settings file");
    write!(file, "{content}").expect("Failed to write settings file");
    file
}

fn fixture(settings: WiredSettings) -> Container {
    let catalog = MockCatalog::new().discover().with_settings(settings);
    Container::new(catalog).expect("Failed to create container")
}

/// Complete workflow: load conventions, wire a checkout against shipped
/// mocks and a real audit trail, verify, then exercise the service.
#[test]
fn test_complete_checkout_fixture() {
    let file = settings_file("helper_suffixes = [\"Listener\", \"Observer\"]\n");
    let settings = WiredSettings::load(file.path()).expect("Failed to load settings");
    let mut container = fixture(settings);

    let checkout = container.wire_default::<Checkout>().unwrap();
    let audit = container.wire_default::<AuditTrail>().unwrap();
    wired::wire_mocks!(container, dyn Inventory, dyn Billing).unwrap();
    container.verify_implementation_wiring().unwrap();

    assert_eq!(checkout.place("tea", 3, 250).unwrap(), "receipt-750");
    assert_eq!(checkout.orders.get(), 1);
    assert_eq!(*audit.lines.borrow(), vec!["receipt-750".to_string()]);

    // The observer contract is plumbing under these settings.
    assert!(!container.contains::<dyn AuditObserver>());
    assert!(container.contains::<AuditTrail>());
}

/// A fixture that forgets a dependency is caught before the test runs.
#[test]
fn test_incomplete_fixture_is_rejected() {
    let mut container = fixture(WiredSettings::default());
    container.wire_default::<Checkout>().unwrap();
    container.wire_mock::<dyn Inventory>().unwrap();
    container.wire_mock::<dyn Billing>().unwrap();

    let err = container.verify_implementation_wiring().unwrap_err();
    match err {
        WireError::MissingDependency {
            owner,
            field,
            field_type,
        } => {
            assert_eq!(owner, "Checkout");
            assert_eq!(field, "audit");
            assert_eq!(field_type, "AuditTrail");
        }
        other => panic!("unexpected error: {other}"),
    }
}

/// A fixture that keeps a mock after the dependency went away is stale.
#[test]
fn test_stale_fixture_is_rejected() {
    let mut container = fixture(WiredSettings::default());
    container.wire_mock::<dyn Billing>().unwrap();
    container.wire_default::<AuditTrail>().unwrap();

    let err = container.verify_implementation_wiring().unwrap_err();
    assert!(matches!(err, WireError::UnusedMock { ref role } if role == "Billing"));
}

/// Shipped mocks are visible to every test binary linking them.
#[test]
fn test_shipped_mocks_are_discovered() {
    let names = list_discovered_mocks();
    assert!(names.contains(&"e2e-free-billing"));
    assert!(names.contains(&"e2e-unlimited-inventory"));

    let catalog = MockCatalog::new().discover();
    assert!(catalog.contains(&Role::of::<dyn Billing>()));
    assert!(catalog.contains(&Role::of::<dyn Inventory>()));
}

/// The container dump reflects who was wired where.
#[test]
fn test_fixture_dump() {
    let mut container = fixture(WiredSettings::default());
    container.wire_default::<Checkout>().unwrap();
    container.wire_mock::<dyn Billing>().unwrap();

    let dump = container.to_string();
    assert!(dump.contains("- Checkout => Checkout\n"));
    assert!(dump.contains("\tBilling billing = mock of Billing\n"));
    assert!(dump.contains("- Billing => mock of Billing\n"));
    assert!(!dump.contains("inventory ="));
}
