use listset::{
    CoarseLock, ConcurrentOrderedSet, FineGrainedLock, NodeArena, ReaderWriterLock, SortedList,
};

fn assert_send<T: Send>() {}
fn assert_sync<T: Sync>() {}

#[test]
fn policies_are_send_and_sync() {
    assert_send::<CoarseLock>();
    assert_sync::<CoarseLock>();
    assert_send::<FineGrainedLock>();
    assert_sync::<FineGrainedLock>();
    assert_send::<ReaderWriterLock>();
    assert_sync::<ReaderWriterLock>();
}

#[test]
fn set_can_be_shared_across_threads() {
    assert_sync::<ConcurrentOrderedSet<CoarseLock>>();
    assert_sync::<ConcurrentOrderedSet<FineGrainedLock>>();
    assert_sync::<ConcurrentOrderedSet<ReaderWriterLock>>();
    assert_sync::<NodeArena>();
}

#[test]
fn core_list_is_send() {
    // Moved between threads behind a lock, never shared bare.
    assert_send::<SortedList>();
}
