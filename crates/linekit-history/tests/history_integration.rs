//! History engine integration tests

use linekit_history::{CommitOutcome, HistoryEngine};
use proptest::prelude::*;

#[derive(Debug, Clone, PartialEq)]
struct Doc {
    title: String,
    points: Vec<(i32, i32)>,
}

fn doc(title: &str, n: i32) -> Doc {
    Doc {
        title: title.to_string(),
        points: (0..n).map(|i| (i, i * 2)).collect(),
    }
}

#[tokio::test]
async fn test_idempotent_commit() {
    let history = HistoryEngine::new(doc("zero", 0)).unwrap();

    history.commit(doc("a", 1)).await.unwrap();
    let (len, depth) = (history.len(), history.depth());

    let outcome = history.commit(doc("a", 1)).await.unwrap();
    assert_eq!(outcome, CommitOutcome::Unchanged { depth });
    assert_eq!(history.len(), len);
    assert_eq!(history.depth(), depth);
}

#[tokio::test]
async fn test_undo_redo_round_trip() {
    let history = HistoryEngine::new(doc("zero", 0)).unwrap();
    for i in 1..=5 {
        history.commit(doc("step", i)).await.unwrap();
    }
    let final_state = history.current();

    for _ in 0..5 {
        assert!(history.undo());
    }
    assert_eq!(history.current(), doc("zero", 0));

    for _ in 0..5 {
        assert!(history.redo());
    }
    assert_eq!(history.current(), final_state);
}

#[tokio::test]
async fn test_branch_truncation() {
    let history = HistoryEngine::new(doc("zero", 0)).unwrap();
    history.commit(doc("A", 1)).await.unwrap();
    history.commit(doc("B", 2)).await.unwrap();
    history.undo();
    history.commit(doc("C", 3)).await.unwrap();

    assert!(!history.can_redo());
    assert_eq!(history.len(), 3);
    assert_eq!(history.current(), doc("C", 3));

    // B is gone: walking back never reaches it
    history.undo();
    assert_eq!(history.current(), doc("A", 1));
    history.undo();
    assert_eq!(history.current(), doc("zero", 0));
}

#[tokio::test]
async fn test_bounds_are_clamped() {
    let history = HistoryEngine::new(doc("zero", 0)).unwrap();
    assert!(!history.undo());
    assert_eq!(history.depth(), 0);

    history.commit(doc("a", 1)).await.unwrap();
    assert!(!history.redo());
    assert_eq!(history.depth(), 1);
}

#[tokio::test]
async fn test_current_is_a_copy() {
    let history = HistoryEngine::new(doc("zero", 0)).unwrap();
    history.commit(doc("a", 2)).await.unwrap();

    let mut copy = history.current();
    copy.points.clear();
    copy.title.push_str(" edited");

    assert_eq!(history.current(), doc("a", 2));
}

#[tokio::test]
async fn test_watch_tracks_depth_changes() {
    let history = HistoryEngine::new(doc("zero", 0)).unwrap();
    let mut rx = history.watch();
    assert_eq!(rx.borrow().depth, 0);

    history.commit(doc("a", 1)).await.unwrap();
    assert!(rx.has_changed().unwrap());
    {
        let latest = rx.borrow_and_update();
        assert_eq!(latest.depth, 1);
        assert_eq!(latest.value, doc("a", 1));
        assert!(latest.can_undo());
        assert!(!latest.can_redo());
    }

    history.undo();
    let latest = rx.borrow_and_update().clone();
    assert_eq!(latest.value, doc("zero", 0));
    assert!(latest.can_redo());
}

#[tokio::test]
async fn test_watch_receiver_in_task() {
    let history = HistoryEngine::new(0u32).unwrap();
    let mut rx = history.watch();

    let observer = tokio::spawn(async move {
        let mut seen = Vec::new();
        while rx.changed().await.is_ok() {
            let depth = rx.borrow_and_update().depth;
            seen.push(depth);
            if depth == 2 {
                break;
            }
        }
        seen
    });

    history.commit(1).await.unwrap();
    tokio::task::yield_now().await;
    history.commit(2).await.unwrap();

    let seen = observer.await.unwrap();
    assert_eq!(seen.last(), Some(&2));
}

proptest! {
    #[test]
    fn undo_all_then_redo_all_restores(values in proptest::collection::vec(0u32..1000, 1..20)) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        runtime.block_on(async {
            let history = HistoryEngine::new(u32::MAX).unwrap();
            let mut committed = 0;
            for value in &values {
                if history.commit(*value).await.unwrap().is_committed() {
                    committed += 1;
                }
            }

            let before = history.snapshot();
            prop_assert_eq!(before.len, committed + 1);

            for _ in 0..committed {
                prop_assert!(history.undo());
            }
            prop_assert!(!history.can_undo());
            for _ in 0..committed {
                prop_assert!(history.redo());
            }
            prop_assert_eq!(history.snapshot(), before);
            Ok(())
        })?;
    }
}
