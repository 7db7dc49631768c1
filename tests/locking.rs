// Tests for concurrent access to the job file.
use jobsheet::context::{AppContext, TestContext};
use jobsheet::storage::LocalStorage;
use jobsheet::store::JobStore;
use std::sync::{Arc, Barrier};
use std::thread;

#[test]
fn test_concurrent_job_adds() {
    let ctx = Arc::new(TestContext::new());

    let thread_count = 10;
    let barrier = Arc::new(Barrier::new(thread_count));
    let mut handles = vec![];

    for i in 0..thread_count {
        let b = barrier.clone();
        let ctx = ctx.clone();
        let handle = thread::spawn(move || {
            b.wait();

            let text = format!("Confirmed/IKEA NY Customer Number{} 191769007{:02}", i, i);
            // Load -> create -> save under one lock
            let res = JobStore::modify(ctx.as_ref(), 50, |store| {
                store.create_job_from_text(&text)?;
                store.save_current();
                Ok(())
            });
            assert!(res.is_ok(), "Job add failed in thread {}: {:?}", i, res);
        });
        handles.push(handle);
    }

    for h in handles {
        h.join().unwrap();
    }

    let snapshot = LocalStorage::load_jobs(ctx.as_ref()).unwrap();
    assert_eq!(
        snapshot.jobs.len(),
        thread_count,
        "History should contain exactly {} jobs",
        thread_count
    );

    let mut phones: Vec<String> = snapshot
        .jobs
        .iter()
        .map(|j| j.parsed.customer.phone.clone())
        .collect();
    phones.sort();
    phones.dedup();
    assert_eq!(phones.len(), thread_count);

    let path = ctx.get_jobs_path().unwrap();
    assert!(!path.with_extension("tmp").exists());
}

#[test]
fn test_concurrent_adds_respect_history_limit() {
    let ctx = Arc::new(TestContext::new());
    let limit = 4;

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let ctx = ctx.clone();
            thread::spawn(move || {
                let text = format!("IKEA CT Person Number{} 203555010{}", i, i);
                JobStore::modify(ctx.as_ref(), limit, |store| {
                    store.create_job_from_text(&text)?;
                    store.save_current();
                    Ok(())
                })
                .unwrap();
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }

    let store = JobStore::load(ctx.as_ref(), limit).unwrap();
    assert_eq!(store.jobs().len(), limit);
}
