//! Multi-threaded use of a shared store.
//!
//! The store handle is shared across threads; each thread works through its
//! own sessions and the busy timeout serializes competing writers.

mod common;

use common::{count_rows, TestFixture};
use compras::{NewHistoryEntry, NewPurchaseRequest, RequestFilter, Store};
use std::thread;
use std::time::Duration;

fn assert_send_sync<T: Send + Sync>() {}
fn assert_send<T: Send>() {}

#[test]
fn test_handles_are_thread_safe() {
    assert_send_sync::<Store>();
    assert_send::<compras::Session>();
}

#[test]
fn test_concurrent_writers_all_commit() {
    let fixture = TestFixture::new();
    let store = fixture.open();

    let handles: Vec<_> = (0..4)
        .map(|worker| {
            let store = store.clone();
            thread::spawn(move || {
                for n in 0..10 {
                    store
                        .with_session(|s| {
                            let request = s.create_request(&NewPurchaseRequest::new(
                                format!("worker-{worker}"),
                                format!("item-{n}"),
                            ))?;
                            s.add_history(&NewHistoryEntry::new(request.id, "criado"))?;
                            Ok(())
                        })
                        .expect("write failed");
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("worker panicked");
    }

    assert_eq!(count_rows(&store, "solicitacoes"), 40);
    assert_eq!(count_rows(&store, "historico"), 40);

    let session = store.session().unwrap();
    let filter = RequestFilter {
        requester: Some("worker-2".into()),
        ..RequestFilter::default()
    };
    assert_eq!(session.list_requests(&filter).unwrap().len(), 10);
}

#[test]
fn test_session_can_move_between_threads() {
    let fixture = TestFixture::new();
    let store = fixture.open();

    let mut session = store.session().unwrap();
    let request = session
        .create_request(&NewPurchaseRequest::new("ana", "scanner"))
        .unwrap();

    let committed = thread::spawn(move || {
        session.commit().unwrap();
        session.get_request(request.id).unwrap()
    })
    .join()
    .unwrap();

    assert!(committed.is_some());
    assert_eq!(count_rows(&store, "solicitacoes"), 1);
}

#[test]
fn test_waiting_writer_proceeds_once_holder_commits() {
    let fixture = TestFixture::new();
    let store = fixture.open();

    let mut holder = store.session().unwrap();
    holder
        .create_request(&NewPurchaseRequest::new("ana", "roteador"))
        .unwrap();

    let waiter_store = store.clone();
    let waiter = thread::spawn(move || {
        let mut session = waiter_store.session().unwrap();
        // Blocks on the busy timeout until the holder commits.
        session
            .create_request(&NewPurchaseRequest::new("bruno", "switch"))
            .unwrap();
        assert!(session.has_pending_changes());
        session.commit().unwrap();
    });

    thread::sleep(Duration::from_millis(200));
    assert!(holder.has_pending_changes());
    holder.commit().unwrap();
    waiter.join().expect("waiting writer panicked");

    assert_eq!(count_rows(&store, "solicitacoes"), 2);
}
