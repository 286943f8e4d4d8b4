//! Concurrent store access tests
//!
//! Each thread builds its own MarkbookContext on the same data directory,
//! the way separate `mb` processes would. The file locks around users.json
//! and each marks.csv must serialize the read-modify-write cycles so that no
//! registration or submission is lost or torn.
//!
//! Run with: cargo test --test concurrent_access_test -- --nocapture

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Instant;

use chrono::NaiveDate;
use tempfile::TempDir;

use markbook_core::ports::AccountStore;
use markbook_core::{Error, MarkbookContext};

/// Number of concurrent threads for stress tests.
/// A handful of CLI processes is the realistic worst case.
const THREAD_COUNT: usize = 6;

/// Number of iterations per thread
const ITERATIONS_PER_THREAD: usize = 5;

fn dob() -> NaiveDate {
    NaiveDate::from_ymd_opt(2000, 1, 1).unwrap()
}

/// Test: every thread registers its own users at the same time.
///
/// Without the registry lock, two threads can read the same users.json,
/// each add one profile, and the later rename drops the other's profile.
#[test]
fn test_concurrent_registrations_are_not_lost() {
    let temp_dir = TempDir::new().unwrap();
    let data_dir = Arc::new(temp_dir.path().to_path_buf());
    let barrier = Arc::new(Barrier::new(THREAD_COUNT));
    let error_count = Arc::new(AtomicUsize::new(0));

    let mut handles = vec![];

    for thread_id in 0..THREAD_COUNT {
        let barrier = Arc::clone(&barrier);
        let data_dir = Arc::clone(&data_dir);
        let error_count = Arc::clone(&error_count);

        handles.push(thread::spawn(move || {
            let ctx = MarkbookContext::new(&data_dir).unwrap();
            barrier.wait();

            let start = Instant::now();
            for i in 0..ITERATIONS_PER_THREAD {
                let email = format!("t{}_i{}@x.com", thread_id, i);
                if let Err(e) = ctx
                    .account_service
                    .register_user("User", "0", dob(), &email, "pw")
                {
                    eprintln!("Thread {}: register {} failed: {}", thread_id, email, e);
                    error_count.fetch_add(1, Ordering::SeqCst);
                }
            }
            println!(
                "Thread {}: Completed {} registrations in {:?}",
                thread_id,
                ITERATIONS_PER_THREAD,
                start.elapsed()
            );
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(error_count.load(Ordering::SeqCst), 0);

    let ctx = MarkbookContext::new(&data_dir).unwrap();
    let book = ctx.accounts.load().unwrap();
    assert_eq!(
        book.len(),
        THREAD_COUNT * ITERATIONS_PER_THREAD,
        "Registrations were lost"
    );
    for thread_id in 0..THREAD_COUNT {
        for i in 0..ITERATIONS_PER_THREAD {
            let email = format!("t{}_i{}@x.com", thread_id, i);
            assert!(ctx.account_service.authenticate(&email, "pw").is_ok());
        }
    }
}

/// Test: all threads race to register the same email.
///
/// Exactly one wins; everyone else sees DuplicateUser and the stored
/// profile belongs to the winner.
#[test]
fn test_same_email_race_has_one_winner() {
    let temp_dir = TempDir::new().unwrap();
    let data_dir = Arc::new(temp_dir.path().to_path_buf());
    let barrier = Arc::new(Barrier::new(THREAD_COUNT));
    let success_count = Arc::new(AtomicUsize::new(0));
    let duplicate_count = Arc::new(AtomicUsize::new(0));

    let mut handles = vec![];

    for thread_id in 0..THREAD_COUNT {
        let barrier = Arc::clone(&barrier);
        let data_dir = Arc::clone(&data_dir);
        let success_count = Arc::clone(&success_count);
        let duplicate_count = Arc::clone(&duplicate_count);

        handles.push(thread::spawn(move || {
            let ctx = MarkbookContext::new(&data_dir).unwrap();
            barrier.wait();

            let password = format!("pw{}", thread_id);
            match ctx
                .account_service
                .register_user("Racer", "0", dob(), "same@x.com", &password)
            {
                Ok(()) => {
                    success_count.fetch_add(1, Ordering::SeqCst);
                }
                Err(Error::DuplicateUser(_)) => {
                    duplicate_count.fetch_add(1, Ordering::SeqCst);
                }
                Err(e) => panic!("Thread {}: unexpected error: {}", thread_id, e),
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(success_count.load(Ordering::SeqCst), 1);
    assert_eq!(duplicate_count.load(Ordering::SeqCst), THREAD_COUNT - 1);

    let ctx = MarkbookContext::new(&data_dir).unwrap();
    let book = ctx.accounts.load().unwrap();
    assert_eq!(book.len(), 1);

    let winners = (0..THREAD_COUNT)
        .filter(|id| {
            ctx.account_service
                .authenticate("same@x.com", &format!("pw{}", id))
                .is_ok()
        })
        .count();
    assert_eq!(winners, 1);
}

/// Test: interleaved submissions and reads on one user's marks.
///
/// Readers must always see either an empty table or a complete one where
/// every subject carries the same submitted value, never a torn file.
#[test]
fn test_concurrent_submissions_never_tear() {
    let temp_dir = TempDir::new().unwrap();
    let data_dir = Arc::new(temp_dir.path().to_path_buf());
    {
        let ctx = MarkbookContext::new(&data_dir).unwrap();
        ctx.account_service
            .register_user("Ann", "0", dob(), "a@x.com", "pw")
            .unwrap();
    }

    let barrier = Arc::new(Barrier::new(THREAD_COUNT));
    let error_count = Arc::new(AtomicUsize::new(0));
    let mut handles = vec![];

    for thread_id in 0..THREAD_COUNT {
        let barrier = Arc::clone(&barrier);
        let data_dir = Arc::clone(&data_dir);
        let error_count = Arc::clone(&error_count);

        handles.push(thread::spawn(move || {
            let ctx = MarkbookContext::new(&data_dir).unwrap();
            barrier.wait();

            for i in 0..ITERATIONS_PER_THREAD {
                if thread_id % 2 == 0 {
                    let value = (thread_id * 10 + i) as i64;
                    if let Err(e) = ctx.marks_service.submit_marks("a@x.com", &[value; 7]) {
                        eprintln!("Thread {}: submit failed: {}", thread_id, e);
                        error_count.fetch_add(1, Ordering::SeqCst);
                    }
                } else {
                    match ctx.marks_service.get_report_data("a@x.com") {
                        Ok(table) if table.is_empty() => {}
                        Ok(table) => {
                            let first = table.rows()[0].marks;
                            assert_eq!(table.len(), 7);
                            assert!(table.rows().iter().all(|row| row.marks == first));
                        }
                        Err(e) => {
                            eprintln!("Thread {}: read failed: {}", thread_id, e);
                            error_count.fetch_add(1, Ordering::SeqCst);
                        }
                    }
                }
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(error_count.load(Ordering::SeqCst), 0);

    let ctx = MarkbookContext::new(&data_dir).unwrap();
    let table = ctx.marks_service.get_report_data("a@x.com").unwrap();
    assert_eq!(table.len(), 7);
}

/// Test: users submitting at the same time only touch their own tables.
#[test]
fn test_concurrent_users_keep_separate_tables() {
    let temp_dir = TempDir::new().unwrap();
    let data_dir = Arc::new(temp_dir.path().to_path_buf());
    {
        let ctx = MarkbookContext::new(&data_dir).unwrap();
        for thread_id in 0..THREAD_COUNT {
            ctx.account_service
                .register_user("U", "0", dob(), &format!("u{}@x.com", thread_id), "pw")
                .unwrap();
        }
    }

    let barrier = Arc::new(Barrier::new(THREAD_COUNT));
    let mut handles = vec![];

    for thread_id in 0..THREAD_COUNT {
        let barrier = Arc::clone(&barrier);
        let data_dir = Arc::clone(&data_dir);

        handles.push(thread::spawn(move || {
            let ctx = MarkbookContext::new(&data_dir).unwrap();
            barrier.wait();
            let email = format!("u{}@x.com", thread_id);
            for _ in 0..ITERATIONS_PER_THREAD {
                ctx.marks_service
                    .submit_marks(&email, &[thread_id as i64; 7])
                    .unwrap();
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    let ctx = MarkbookContext::new(&data_dir).unwrap();
    for thread_id in 0..THREAD_COUNT {
        let table = ctx
            .marks_service
            .get_report_data(&format!("u{}@x.com", thread_id))
            .unwrap();
        assert_eq!(table.total(), thread_id as u32 * 7);
    }
}
