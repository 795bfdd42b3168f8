mod common;
use crate::common::{init_tracing, with_timeout};

use std::sync::{Arc, Mutex};

use parallel_rc::output::mediate;

fn recorder() -> (Arc<Mutex<Vec<u32>>>, impl FnMut(u32) -> u32 + Send + 'static) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let f = {
        let seen = Arc::clone(&seen);
        move |n: u32| {
            seen.lock().unwrap().push(n);
            n * 10
        }
    };
    (seen, f)
}

#[tokio::test]
async fn unpaused_calls_run_immediately() {
    init_tracing();
    let (seen, f) = recorder();
    let (mediated, _controls) = mediate(f);

    let result = mediated.call(4);

    assert_eq!(*seen.lock().unwrap(), vec![4]);
    assert_eq!(with_timeout(result).await.unwrap(), 40);
}

#[tokio::test]
async fn paused_calls_queue_until_resume_and_drain_in_order() {
    init_tracing();
    let (seen, f) = recorder();
    let (mediated, controls) = mediate(f);

    controls.pause();
    let first = mediated.call(1);
    let second = mediated.call(2);
    let third = mediated.call(3);

    assert!(seen.lock().unwrap().is_empty());
    assert_eq!(controls.queued(), 3);

    controls.resume();

    assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3]);
    assert!(!controls.is_paused());
    assert_eq!(with_timeout(first).await.unwrap(), 10);
    assert_eq!(with_timeout(second).await.unwrap(), 20);
    assert_eq!(with_timeout(third).await.unwrap(), 30);
}

#[tokio::test]
async fn next_drains_only_the_requested_count() {
    init_tracing();
    let (seen, f) = recorder();
    let (mediated, controls) = mediate(f);

    controls.pause();
    for n in 1..=4 {
        let _ = mediated.call(n);
    }

    assert_eq!(controls.next(1), 1);
    assert_eq!(*seen.lock().unwrap(), vec![1]);
    assert!(controls.is_paused());

    assert_eq!(controls.next(2), 2);
    assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3]);

    assert_eq!(controls.flush(), 1);
    assert_eq!(controls.next(5), 0);
    assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3, 4]);

    // Still paused after draining.
    let _ = mediated.call(5);
    assert_eq!(controls.queued(), 1);
}

#[tokio::test]
async fn queued_completion_resolves_only_after_it_ran() {
    init_tracing();
    let (_seen, f) = recorder();
    let (mediated, controls) = mediate(f);

    controls.pause();
    let mut pending = mediated.call(7);
    assert!(pending.try_recv().is_err());

    controls.resume();
    assert_eq!(with_timeout(pending).await.unwrap(), 70);
}

#[tokio::test]
async fn settled_waits_for_everything_queued_before_it() {
    init_tracing();
    let (seen, f) = recorder();
    let (mediated, controls) = mediate(f);

    assert!(with_timeout(mediated.settled()).await.is_ok());

    controls.pause();
    let _ = mediated.call(1);
    let settled = mediated.settled();
    let _ = mediated.call(2);

    let resumer = {
        let controls = controls.clone();
        tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
            controls.resume();
        })
    };

    with_timeout(settled).await.unwrap();
    assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
    resumer.await.unwrap();
}

#[tokio::test]
async fn calls_after_resume_follow_the_drained_backlog() {
    init_tracing();
    let (seen, f) = recorder();
    let (mediated, controls) = mediate(f);

    controls.pause();
    let _ = mediated.call(1);
    controls.resume();
    let _ = mediated.call(2);
    controls.pause();
    let _ = mediated.call(3);
    controls.resume();

    assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3]);
}
