//! Stress Tests - Concurrent Counting and Activation
//!
//! These tests exercise race conditions in the runtime by:
//! - Acquiring and releasing one object from many tasks at once
//! - Activating instances concurrently against an object quota
//! - Racing lookups of a shared class object
//! - Checking that exactly one destruction happens per object

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use futures::future::join_all;
use parking_lot::Mutex;
use tokio::sync::Barrier;

use common::*;
use com_runtime::types::{clsid, iid, ComError, HResult};
use com_runtime::{ComRuntime, FactoryMode, ICalculator, ISimpleCalculator};

/// Test: concurrent acquire/release of one object never destroys it early
#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_concurrent_acquire_release() {
    init_logging();

    const NUM_TASKS: usize = 32;
    const ITERATIONS: usize = 1_000;

    let runtime = standard_runtime(FactoryMode::PerLookup);
    let drops = register_drop_counter(&runtime);
    let calc = runtime
        .create_instance::<dyn ISimpleCalculator>(&CLSID_DROP_COUNTER)
        .unwrap();
    let barrier = Arc::new(Barrier::new(NUM_TASKS));

    let start = Instant::now();
    let handles: Vec<_> = (0..NUM_TASKS)
        .map(|task_id| {
            let local = calc.clone();
            let barrier = barrier.clone();
            tokio::spawn(async move {
                barrier.wait().await;
                for i in 0..ITERATIONS {
                    let (view, refs) = local.acquire();
                    assert!(refs >= 2);
                    let base = view.to_unknown();
                    let mut sum = 0;
                    assert_eq!(view.add(task_id as i32, i as i32, Some(&mut sum)), HResult::S_OK);
                    assert_eq!(sum, (task_id + i) as i32);
                    drop(base);
                    view.release();
                }
                local.release();
            })
        })
        .collect();

    for result in join_all(handles).await {
        result.unwrap();
    }
    println!("{} acquire/release cycles in {:?}", NUM_TASKS * ITERATIONS, start.elapsed());

    assert_eq!(calc.ref_count(), 1);
    assert_eq!(drops.load(Ordering::SeqCst), 0);
    assert_eq!(calc.release(), 0);
    assert_eq!(drops.load(Ordering::SeqCst), 1);
}

/// Test: the thread that observes zero is the only one that destroys
#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_last_release_races() {
    init_logging();

    const NUM_OBJECTS: usize = 200;
    const VIEWS_PER_OBJECT: usize = 8;

    let runtime = standard_runtime(FactoryMode::PerLookup);
    let drops = register_drop_counter(&runtime);
    let zero_observed = Arc::new(AtomicUsize::new(0));

    for _ in 0..NUM_OBJECTS {
        let calc = runtime
            .create_instance::<dyn ISimpleCalculator>(&CLSID_DROP_COUNTER)
            .unwrap();
        let views: Vec<_> = (0..VIEWS_PER_OBJECT).map(|_| calc.clone()).collect();
        drop(calc);

        let barrier = Arc::new(Barrier::new(VIEWS_PER_OBJECT));
        let handles: Vec<_> = views
            .into_iter()
            .map(|view| {
                let barrier = barrier.clone();
                let zero_observed = zero_observed.clone();
                tokio::spawn(async move {
                    barrier.wait().await;
                    if view.release() == 0 {
                        zero_observed.fetch_add(1, Ordering::SeqCst);
                    }
                })
            })
            .collect();
        for result in join_all(handles).await {
            result.unwrap();
        }
    }

    assert_eq!(zero_observed.load(Ordering::SeqCst), NUM_OBJECTS);
    assert_eq!(drops.load(Ordering::SeqCst), NUM_OBJECTS);
    assert!(runtime.can_unload_now());
}

/// Test: concurrent activation never exceeds the object quota
#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_concurrent_activation_quota() {
    init_logging();

    const NUM_TASKS: usize = 64;
    const QUOTA: usize = 10;

    let runtime = Arc::new(
        ComRuntime::builder()
            .max_live_objects(QUOTA)
            .standard_components()
            .build(),
    );
    let created = Arc::new(Mutex::new(Vec::new()));
    let refused = Arc::new(AtomicUsize::new(0));
    let barrier = Arc::new(Barrier::new(NUM_TASKS));

    let handles: Vec<_> = (0..NUM_TASKS)
        .map(|_| {
            let runtime = runtime.clone();
            let created = created.clone();
            let refused = refused.clone();
            let barrier = barrier.clone();
            tokio::spawn(async move {
                barrier.wait().await;
                match runtime.create_instance::<dyn ICalculator>(&clsid::CALCULATOR) {
                    Ok(calc) => created.lock().push(calc),
                    Err(ComError::OutOfMemory) => {
                        refused.fetch_add(1, Ordering::SeqCst);
                    }
                    Err(e) => panic!("unexpected activation error: {}", e),
                }
            })
        })
        .collect();

    for result in join_all(handles).await {
        result.unwrap();
    }

    let created = std::mem::take(&mut *created.lock());
    assert_eq!(created.len(), QUOTA);
    assert_eq!(refused.load(Ordering::SeqCst), NUM_TASKS - QUOTA);
    assert_eq!(runtime.module().live_objects(), QUOTA);

    drop(created);
    assert!(runtime.can_unload_now());
}

/// Test: racing lookups of a shared class object all get the same one
#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_shared_factory_lookup_race() {
    init_logging();

    const NUM_TASKS: usize = 32;

    let runtime = Arc::new(standard_runtime(FactoryMode::Shared));
    let barrier = Arc::new(Barrier::new(NUM_TASKS));

    let handles: Vec<_> = (0..NUM_TASKS)
        .map(|_| {
            let runtime = runtime.clone();
            let barrier = barrier.clone();
            tokio::spawn(async move {
                barrier.wait().await;
                runtime.class_factory(&clsid::CALCULATOR).unwrap()
            })
        })
        .collect();

    let factories: Vec<_> = join_all(handles)
        .await
        .into_iter()
        .map(|result| result.unwrap())
        .collect();

    let first = &factories[0];
    for factory in &factories {
        assert!(factory.is_same_object(first));
    }
    // One reference per task plus the registry's cached one
    assert_eq!(first.ref_count() as usize, NUM_TASKS + 1);

    let calc = first.create::<dyn ICalculator>().unwrap();
    let mut result = 0;
    assert_eq!(calc.divide(100, 50, Some(&mut result)), HResult::S_OK);
    assert_eq!(result, 2);
}

/// Test: negotiation from many threads on a factory-created object
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_negotiation() {
    init_logging();

    const NUM_TASKS: usize = 16;
    const ITERATIONS: usize = 500;

    let runtime = standard_runtime(FactoryMode::PerLookup);
    let calc = runtime
        .create_instance::<dyn ICalculator>(&clsid::CALCULATOR)
        .unwrap();
    let failures = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..NUM_TASKS)
        .map(|_| {
            let local = calc.clone();
            let failures = failures.clone();
            tokio::spawn(async move {
                for _ in 0..ITERATIONS {
                    if local.query(&iid::ISIMPLECALCULATOR).is_ok() {
                        failures.fetch_add(1, Ordering::SeqCst);
                    }
                    let unknown = local.query(&iid::IUNKNOWN).unwrap();
                    let typed = unknown.cast::<dyn ICalculator>().unwrap();
                    assert!(typed.is_same_object(&local));
                }
            })
        })
        .collect();

    for result in join_all(handles).await {
        result.unwrap();
    }

    assert_eq!(failures.load(Ordering::SeqCst), 0);
    assert_eq!(calc.ref_count(), 1);
}
