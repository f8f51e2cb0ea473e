//! Concurrency tests for the NotificationCenter.
//!
//! These verify that concurrent add/remove/post traffic neither deadlocks
//! nor leaves the two registry indices out of step.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use herald_center::{Dispatch, NotificationCenter};
use herald_types::{Notification, ObserverId, Target};

#[derive(Clone, Default)]
struct Counter(Arc<AtomicUsize>);

impl Dispatch<String, String, u8> for Counter {
    fn dispatch(&self, _: &Target<String, u8>, _: Notification<'_, String, String>) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

type Center = NotificationCenter<String, String, u8>;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_add_remove_no_deadlock() {
    let center: Arc<Center> = Arc::new(NotificationCenter::new(Counter::default()));
    let observers: Vec<ObserverId> = (0..10).map(|_| ObserverId::new()).collect();

    let mut handles = Vec::new();
    for i in 0..100 {
        let center = center.clone();
        let observer = observers[i % 10];
        let event = format!("event_{}", i % 5);

        handles.push(tokio::spawn(async move {
            center
                .add_observer(observer, (i % 3) as u8, Some(event.clone()), None)
                .expect("add should succeed");
            center
                .remove_observer(observer, Some(&event), None)
                .expect("remove should succeed");
        }));
    }

    for handle in handles {
        handle.await.expect("task should not panic");
    }

    center.check_consistency().expect("indices should agree");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_post_with_remove_observer() {
    let counter = Counter::default();
    let center: Arc<Center> = Arc::new(NotificationCenter::new(counter.clone()));
    let observers: Vec<ObserverId> = (0..20).map(|_| ObserverId::new()).collect();

    for &observer in &observers {
        center
            .add_observer(observer, 1, Some("live".to_string()), None)
            .expect("add should succeed");
        center
            .add_observer(observer, 2, Some("side".to_string()), Some("scope".to_string()))
            .expect("add should succeed");
    }

    let mut handles = Vec::new();
    for _ in 0..50 {
        let center = center.clone();
        handles.push(tokio::spawn(async move {
            center.post(&"live".to_string(), None);
        }));
    }
    for &observer in &observers {
        let center = center.clone();
        handles.push(tokio::spawn(async move {
            center.remove_observer_entirely(observer);
        }));
    }

    for handle in handles {
        handle.await.expect("concurrent post + removal should not panic");
    }

    assert!(center.is_empty(), "every observer was removed");
    assert!(center.all_event_names().is_empty());
    center.check_consistency().expect("indices should agree");
    assert!(counter.0.load(Ordering::SeqCst) <= 50 * 20);
}

#[tokio::test]
async fn test_post_to_empty_event_is_noop() {
    let counter = Counter::default();
    let center: Center = NotificationCenter::new(counter.clone());

    assert_eq!(center.post(&"empty".to_string(), None), 0);
    assert_eq!(counter.0.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_remove_unknown_observer_is_noop() {
    let center: Center = NotificationCenter::new(Counter::default());

    assert_eq!(center.remove_observer_entirely(ObserverId::new()), 0);
    assert_eq!(
        center
            .remove_observer(ObserverId::new(), Some(&"nothing".to_string()), None)
            .expect("remove should succeed"),
        0
    );
    assert!(center.is_empty());
}
