use listset::{
    CoarseLock, ConcurrentOrderedSet, FineGrainedLock, KeyRng, ReaderWriterLock, SyncPolicy,
};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicBool, Ordering::{Acquire, Release}};
use std::thread;

const THREADS: usize = 8;
const STEPS: usize = 4096 * 4;

#[derive(Debug, Clone, Copy)]
enum Log {
    Member { key: i64, result: bool },
    Insert { key: i64, result: bool },
    Delete { key: i64, result: bool },
}

/// Runs a random mix over a small key range and returns each thread's log.
fn logged_run<P: SyncPolicy>(set: &ConcurrentOrderedSet<P>, key_range: u32) -> Vec<Vec<Log>> {
    thread::scope(|s| {
        let handles: Vec<_> = (0..THREADS)
            .map(|rank| {
                s.spawn(move || {
                    let mut rng = KeyRng::new(rank as u64 + 17);
                    let mut logs = Vec::with_capacity(STEPS);
                    for _ in 0..STEPS {
                        let key = i64::from(rng.next_u32() % key_range);
                        let log = match rng.next_u32() % 3 {
                            0 => Log::Member { key, result: set.member(key) },
                            1 => Log::Insert { key, result: set.insert(key) },
                            _ => Log::Delete { key, result: set.delete(key) },
                        };
                        logs.push(log);
                    }
                    logs
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    })
}

/// Successful inserts minus successful deletes must equal final membership,
/// key by key, and a key seen by `member` must have been inserted.
fn assert_logs_consistent(logs: &[Vec<Log>], mut final_keys: Vec<i64>) {
    let mut balance = BTreeMap::<i64, i64>::new();
    let mut inserted = BTreeSet::new();
    let mut seen = BTreeSet::new();

    for log in logs.iter().flatten() {
        match *log {
            Log::Insert { key, result: true } => {
                *balance.entry(key).or_default() += 1;
                inserted.insert(key);
            }
            Log::Delete { key, result: true } => *balance.entry(key).or_default() -= 1,
            Log::Member { key, result: true } => {
                seen.insert(key);
            }
            _ => {}
        }
    }

    assert!(seen.is_subset(&inserted));

    let expected: Vec<i64> = balance
        .iter()
        .filter(|(_, &b)| {
            assert!(b == 0 || b == 1, "per-key balance out of range: {b}");
            b == 1
        })
        .map(|(&k, _)| k)
        .collect();

    // no duplicates, ascending
    assert!(final_keys.windows(2).all(|w| w[0] < w[1]));
    final_keys.sort_unstable();
    assert_eq!(final_keys, expected);
}

fn log_concurrent<P: SyncPolicy>() {
    let mut set = ConcurrentOrderedSet::<P>::new();
    let logs = logged_run(&set, 64);
    assert_logs_consistent(&logs, set.keys());
}

#[test]
fn log_concurrent_coarse() {
    log_concurrent::<CoarseLock>();
}

#[test]
fn log_concurrent_fine_grained() {
    log_concurrent::<FineGrainedLock>();
}

#[test]
fn log_concurrent_rw_lock() {
    log_concurrent::<ReaderWriterLock>();
}

/// Many threads hammering three keys: every acquisition order collides, and
/// the run must still finish.
#[test]
fn fine_grained_hot_keys_complete() {
    let mut set = ConcurrentOrderedSet::<FineGrainedLock>::new();
    let logs = logged_run(&set, 3);
    assert_eq!(logs.iter().map(Vec::len).sum::<usize>(), THREADS * STEPS);
    assert_logs_consistent(&logs, set.keys());
}

#[test]
fn fine_grained_disjoint_ranges_of_100() {
    let mut set = ConcurrentOrderedSet::<FineGrainedLock>::new();
    thread::scope(|s| {
        for t in 0..4 {
            let set = &set;
            s.spawn(move || {
                // interleave ranges so threads meet in the middle of the list
                for k in (0..100).map(|i| i * 4 + t) {
                    assert!(set.insert(k));
                }
            });
        }
    });
    assert_eq!(set.keys(), (0..400).collect::<Vec<_>>());
}

#[test]
fn concurrent_duplicate_insert_single_winner() {
    for _ in 0..200 {
        let mut set = ConcurrentOrderedSet::<FineGrainedLock>::new();
        for k in [10, 50, 90] {
            set.insert(k);
        }
        let wins: usize = thread::scope(|s| {
            let a = s.spawn(|| usize::from(set.insert(42)));
            let b = s.spawn(|| usize::from(set.insert(42)));
            a.join().unwrap() + b.join().unwrap()
        });
        assert_eq!(wins, 1);
        assert_eq!(set.keys(), vec![10, 42, 50, 90]);
    }
}

/// Odd keys churn while a reader checks the untouched even keys are always
/// found.
fn stable_keys_stay_visible<P: SyncPolicy>() {
    let set = ConcurrentOrderedSet::<P>::new();
    for k in (0..200).step_by(2) {
        assert!(set.insert(k));
    }

    let done = AtomicBool::new(false);
    thread::scope(|s| {
        let writers: Vec<_> = (0..4)
            .map(|rank| {
                let set = &set;
                s.spawn(move || {
                    let mut rng = KeyRng::new(rank + 5);
                    for _ in 0..STEPS {
                        let key = 2 * i64::from(rng.next_u32() % 100) + 1;
                        if rng.next_u32() % 2 == 0 {
                            set.insert(key);
                        } else {
                            set.delete(key);
                        }
                    }
                })
            })
            .collect();

        s.spawn(|| {
            while !done.load(Acquire) {
                for k in (0..200).step_by(2) {
                    assert!(set.member(k), "stable key {k} went missing");
                }
            }
        });

        for w in writers {
            w.join().unwrap();
        }
        done.store(true, Release);
    });
}

#[test]
fn stable_keys_stay_visible_coarse() {
    stable_keys_stay_visible::<CoarseLock>();
}

#[test]
fn stable_keys_stay_visible_fine_grained() {
    stable_keys_stay_visible::<FineGrainedLock>();
}

#[test]
fn stable_keys_stay_visible_rw_lock() {
    stable_keys_stay_visible::<ReaderWriterLock>();
}
