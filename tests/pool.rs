//! Thread-pool scheduling scenarios against the public surface.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use eventloom::{
    attach_async, GroupConfig, HandlerList, JobError, PoolConfig, Runtime, SharedLock,
    DEFAULT_PRIORITY,
};

#[test]
fn five_jobs_on_two_workers_complete_under_one_lock() {
    let runtime =
        Runtime::with_config(PoolConfig::new(1).with_group(0, GroupConfig::new(2, DEFAULT_PRIORITY)))
            .unwrap();

    let lock = SharedLock::new();
    let counter = Arc::new(AtomicUsize::new(0));
    let workers_seen = Arc::new(Mutex::new(HashSet::new()));

    let handles: Vec<_> = (0..5)
        .map(|_| {
            let lock = lock.clone();
            let counter = Arc::clone(&counter);
            let workers_seen = Arc::clone(&workers_seen);
            runtime.submit(move || {
                let _guard = lock.lock();
                let current = counter.load(Ordering::SeqCst);
                thread::sleep(Duration::from_millis(1));
                counter.store(current + 1, Ordering::SeqCst);
                workers_seen.lock().insert(thread::current().id());
            })
        })
        .collect();

    for handle in handles {
        handle.wait().unwrap();
    }

    assert_eq!(
        counter.load(Ordering::SeqCst),
        5,
        "read-modify-write under the shared lock must not lose updates"
    );
    let distinct = workers_seen.lock().len();
    assert!(
        (1..=2).contains(&distinct),
        "5 jobs must be served by the group's own 2 workers, saw {distinct}"
    );
}

#[test]
fn task_types_route_to_their_own_lanes() {
    let runtime = Runtime::with_config(
        PoolConfig::new(2)
            .with_group(0, GroupConfig::new(1, DEFAULT_PRIORITY))
            .with_group(1, GroupConfig::new(1, 20)),
    )
    .unwrap();

    let lane_thread = Arc::new(Mutex::new(String::new()));
    let lane_thread2 = Arc::clone(&lane_thread);
    let job = runtime
        .submit_with(1, 20, move || {
            let name = thread::current().name().unwrap_or("").to_string();
            *lane_thread2.lock() = name;
        })
        .unwrap();
    job.wait().unwrap();

    assert!(
        lane_thread.lock().starts_with("eventloom-t1-"),
        "task type 1 must run on its own lane's workers"
    );
}

#[test]
fn async_handler_call_is_non_blocking() {
    let runtime = Runtime::new();
    let list: HandlerList<u32> = HandlerList::new();

    let finished = Arc::new(AtomicUsize::new(0));
    let finished2 = Arc::clone(&finished);
    let handler = attach_async(&runtime, &list, move |_: &u32| {
        thread::sleep(Duration::from_millis(400));
        finished2.fetch_add(1, Ordering::SeqCst);
    });

    let started = Instant::now();
    list.call(&1);
    let submission_took = started.elapsed();
    assert!(
        submission_took < Duration::from_millis(200),
        "submission must not wait for the 400ms body (took {submission_took:?})"
    );

    handler.drain();
    assert_eq!(finished.load(Ordering::SeqCst), 1);
}

#[test]
fn waiters_see_panics_only_for_their_own_job() {
    let runtime = Runtime::new();

    let bad = runtime.submit(|| panic!("this job fails"));
    let good = runtime.submit(|| {});

    assert!(matches!(bad.wait(), Err(JobError::Panicked { .. })));
    assert_eq!(good.wait(), Ok(()), "other jobs are unaffected by the fault");

    // The pool keeps serving after a fault.
    let after = runtime.submit(|| {});
    after.wait().unwrap();
}

#[test]
fn switching_configs_redirects_new_submissions() {
    let runtime = Runtime::new();
    let two_lane = runtime
        .add_config(
            PoolConfig::new(2)
                .with_group(0, GroupConfig::DEFAULT)
                .with_group(1, GroupConfig::DEFAULT),
        )
        .unwrap();

    assert!(runtime.submit_with(1, 50, || {}).is_err());

    runtime.set_config(two_lane).unwrap();
    let job = runtime.submit_with(1, 50, || {}).unwrap();
    job.wait().unwrap();
}

#[test]
fn many_concurrent_submitters_all_complete() {
    let runtime =
        Runtime::with_config(PoolConfig::new(1).with_group(0, GroupConfig::new(4, DEFAULT_PRIORITY)))
            .unwrap();
    let total = Arc::new(AtomicUsize::new(0));

    let submitters: Vec<_> = (0..8)
        .map(|_| {
            let runtime = Arc::clone(&runtime);
            let total = Arc::clone(&total);
            thread::spawn(move || {
                let handles: Vec<_> = (0..50)
                    .map(|_| {
                        let total = Arc::clone(&total);
                        runtime.submit(move || {
                            total.fetch_add(1, Ordering::SeqCst);
                        })
                    })
                    .collect();
                for handle in handles {
                    handle.wait().unwrap();
                }
            })
        })
        .collect();

    for submitter in submitters {
        submitter.join().unwrap();
    }
    assert_eq!(total.load(Ordering::SeqCst), 400);
}
