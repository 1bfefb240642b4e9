//! Activation Tests - Registry Lookup and Class Factories
//!
//! These tests exercise factory-mediated construction:
//! - Registry lookup by class identity, in both factory modes
//! - The factory net-reference law
//! - Aggregation refusal, object quotas and server locks
//! - The out-parameter status-code protocol

mod common;

use std::sync::atomic::Ordering;

use common::*;
use com_runtime::activation::{protocol, IClassFactory};
use com_runtime::types::{clsid, iid, ComError, Guid, HResult};
use com_runtime::{ComRuntime, FactoryMode, ICalculator, ISimpleCalculator, RuntimeConfig};

/// Test: lookup of an unregistered class fails and leaves the output empty
#[test]
fn test_unknown_class_lookup() {
    init_logging();

    let runtime = standard_runtime(FactoryMode::PerLookup);
    let missing = Guid::generate();

    let mut out = None;
    assert_eq!(
        protocol::get_class_object(runtime.registry(), &missing, &iid::ICLASSFACTORY, Some(&mut out)),
        HResult::CLASS_E_CLASSNOTAVAILABLE
    );
    assert!(out.is_none());

    assert_eq!(
        runtime.create_instance::<dyn ICalculator>(&missing).unwrap_err(),
        ComError::ClassNotAvailable(missing)
    );
}

/// Test: a factory hands out exactly one net reference per instance
#[test]
fn test_factory_net_reference() {
    init_logging();

    let runtime = standard_runtime(FactoryMode::PerLookup);
    let factory = runtime.class_factory(&clsid::CALCULATOR).unwrap();
    assert_eq!(factory.ref_count(), 1);

    let instance = factory.create_instance(None, &iid::ICALCULATOR).unwrap();
    assert_eq!(instance.ref_count(), 1);
    assert_eq!(factory.ref_count(), 1);

    // The factory keeps no reference to its products
    assert_eq!(factory.release(), 0);
    let calc = instance.into_interface::<dyn ICalculator>().unwrap();
    let mut result = 0;
    assert_eq!(calc.subtract(100, 50, Some(&mut result)), HResult::S_OK);
    assert_eq!(result, 50);
    assert_eq!(calc.release(), 0);
}

/// Test: the full out-parameter flow used by a C-style client
#[test]
fn test_status_code_flow() {
    init_logging();

    let runtime = standard_runtime(FactoryMode::PerLookup);

    let mut class_object = None;
    assert_eq!(
        protocol::get_class_object(
            runtime.registry(),
            &clsid::CALCULATOR,
            &iid::ICLASSFACTORY,
            Some(&mut class_object)
        ),
        HResult::S_OK
    );
    let factory = class_object
        .and_then(|ptr| ptr.into_interface::<dyn IClassFactory>().ok())
        .unwrap();

    let mut instance = None;
    assert_eq!(
        protocol::create_instance(&*factory, None, &iid::ICALCULATOR, Some(&mut instance)),
        HResult::S_OK
    );
    drop(factory);

    let calc = instance
        .and_then(|ptr| ptr.into_interface::<dyn ICalculator>().ok())
        .unwrap();
    let mut result = 0;
    assert_eq!(calc.multiply(100, 50, Some(&mut result)), HResult::S_OK);
    assert_eq!(result, 5000);
    assert_eq!(protocol::can_unload_now(runtime.module()), HResult::S_FALSE);

    drop(calc);
    assert_eq!(protocol::can_unload_now(runtime.module()), HResult::S_OK);
}

/// Test: creation failures report their codes and leave nothing alive
#[test]
fn test_creation_failures() {
    init_logging();

    let runtime = standard_runtime(FactoryMode::PerLookup);
    let factory = runtime.class_factory(&clsid::CALCULATOR).unwrap();
    let outer = runtime
        .create_instance::<dyn ISimpleCalculator>(&clsid::SIMPLE_CALCULATOR)
        .unwrap()
        .to_unknown();

    let mut out = None;
    assert_eq!(
        protocol::create_instance(&*factory, Some(&outer), &iid::ICALCULATOR, Some(&mut out)),
        HResult::CLASS_E_NOAGGREGATION
    );
    assert_eq!(
        protocol::create_instance(&*factory, None, &iid::ISIMPLECALCULATOR, Some(&mut out)),
        HResult::E_NOINTERFACE
    );
    assert_eq!(
        protocol::create_instance(&*factory, None, &iid::ICALCULATOR, None),
        HResult::E_POINTER
    );
    assert!(out.is_none());

    // Only the aggregation candidate is alive
    assert_eq!(runtime.module().live_objects(), 1);
}

/// Test: the object quota maps to E_OUTOFMEMORY and frees on release
#[test]
fn test_object_quota() {
    init_logging();

    let runtime = ComRuntime::builder()
        .max_live_objects(3)
        .standard_components()
        .build();

    let held: Vec<_> = (0..3)
        .map(|_| runtime.create_instance::<dyn ICalculator>(&clsid::CALCULATOR).unwrap())
        .collect();

    let factory = runtime.class_factory(&clsid::CALCULATOR).unwrap();
    let mut out = None;
    assert_eq!(
        protocol::create_instance(&*factory, None, &iid::ICALCULATOR, Some(&mut out)),
        HResult::E_OUTOFMEMORY
    );
    assert!(out.is_none());

    drop(held);
    assert_eq!(
        protocol::create_instance(&*factory, None, &iid::ICALCULATOR, Some(&mut out)),
        HResult::S_OK
    );
    assert!(out.is_some());
}

/// Test: server locks keep the module resident independently of objects
#[test]
fn test_lock_server_residency() {
    init_logging();

    let runtime = standard_runtime(FactoryMode::PerLookup);
    let factory = runtime.class_factory(&clsid::CALCULATOR).unwrap();

    assert_eq!(factory.lock_server(true), HResult::S_OK);
    assert_eq!(factory.lock_server(true), HResult::S_OK);
    assert_eq!(runtime.module().lock_count(), 2);
    assert!(!runtime.can_unload_now());

    assert_eq!(factory.lock_server(false), HResult::S_OK);
    assert_eq!(factory.lock_server(false), HResult::S_OK);
    assert!(runtime.can_unload_now());

    // Unbalanced unlock is tolerated
    assert_eq!(factory.lock_server(false), HResult::S_OK);
    assert_eq!(runtime.module().lock_count(), 0);
}

/// Test: shared mode hands out views of one cached class object
#[test]
fn test_shared_factory_mode() {
    init_logging();

    let runtime = standard_runtime(FactoryMode::Shared);
    let a = runtime.class_factory(&clsid::CALCULATOR).unwrap();
    let b = runtime.class_factory(&clsid::CALCULATOR).unwrap();
    assert!(a.is_same_object(&b));

    let per_lookup = standard_runtime(FactoryMode::PerLookup);
    let c = per_lookup.class_factory(&clsid::CALCULATOR).unwrap();
    let d = per_lookup.class_factory(&clsid::CALCULATOR).unwrap();
    assert!(!c.is_same_object(&d));
    assert_eq!(c.ref_count(), 1);
}

/// Test: a custom class registered at runtime is created, used and destroyed
#[test]
fn test_custom_registration() {
    init_logging();

    let runtime = ComRuntime::new(RuntimeConfig::default());
    let drops = register_drop_counter(&runtime);
    assert_eq!(runtime.registry().classes(), vec![CLSID_DROP_COUNTER]);

    let calc = runtime
        .create_instance::<dyn ISimpleCalculator>(&CLSID_DROP_COUNTER)
        .unwrap();
    let mut result = 0;
    assert_eq!(calc.add(2, 40, Some(&mut result)), HResult::S_OK);
    assert_eq!(result, 42);
    assert_eq!(calc.class_name(), "DropCounter");

    assert!(runtime.registry().unregister_class(&CLSID_DROP_COUNTER));
    // Existing instances outlive their registration
    assert_eq!(calc.add(1, 1, Some(&mut result)), HResult::S_OK);
    drop(calc);
    assert_eq!(drops.load(Ordering::SeqCst), 1);
    assert_eq!(
        runtime
            .create_instance::<dyn ISimpleCalculator>(&CLSID_DROP_COUNTER)
            .unwrap_err(),
        ComError::ClassNotAvailable(CLSID_DROP_COUNTER)
    );
}

/// Test: a call into an occupied output slot is refused and keeps the slot
#[test]
fn test_occupied_output_slot() {
    init_logging();

    let runtime = standard_runtime(FactoryMode::PerLookup);
    let drops = register_drop_counter(&runtime);
    let calc = runtime
        .create_instance::<dyn ICalculator>(&clsid::CALCULATOR)
        .unwrap();

    // The slot holds the only reference to another object
    let mut out = Some(
        runtime
            .create_instance::<dyn ISimpleCalculator>(&CLSID_DROP_COUNTER)
            .unwrap()
            .to_unknown(),
    );

    assert_eq!(
        protocol::query_interface(&calc, &Guid::generate(), Some(&mut out)),
        HResult::E_INVALIDARG
    );
    assert_eq!(
        protocol::get_class_object(runtime.registry(), &clsid::CALCULATOR, &iid::ICLASSFACTORY, Some(&mut out)),
        HResult::E_INVALIDARG
    );
    let factory = runtime.class_factory(&clsid::CALCULATOR).unwrap();
    assert_eq!(
        protocol::create_instance(&*factory, None, &iid::ICALCULATOR, Some(&mut out)),
        HResult::E_INVALIDARG
    );

    assert_eq!(calc.ref_count(), 1);
    assert_eq!(drops.load(Ordering::SeqCst), 0);
    assert_eq!(out.as_ref().map(|held| held.ref_count()), Some(1));
    assert_eq!(runtime.module().live_objects(), 2);

    // Emptying the slot releases the held reference
    out = None;
    assert!(out.is_none());
    assert_eq!(drops.load(Ordering::SeqCst), 1);
}
