//! Bulk transform: pairwise consistency, atomicity, and failure behavior.

use memory_scramble::{Board, Card, Coordinate, InvalidCard};
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::time::{sleep, timeout};

const PERFECT: &str = "3x3\nX\nX\nY\nY\nZ\nZ\nW\nW\nQ";

fn perfect() -> Board {
    Board::parse(PERFECT).expect("valid board text")
}

fn c(row: usize, col: usize) -> Coordinate {
    Coordinate::new(row, col)
}

fn cell(view: &str, row: usize, col: usize) -> String {
    view.lines()
        .nth(1 + row * 3 + col)
        .expect("cell line present")
        .to_string()
}

async fn append_bang(board: &Board) {
    board
        .transform(|card| async move { Card::new(format!("{card}!")) })
        .await
        .expect("mapping produces valid cards");
}

#[tokio::test]
async fn transform_preserves_matches() {
    let board = perfect();
    append_bang(&board).await;

    board.flip(c(0, 0), "a").await.unwrap();
    board.flip(c(0, 1), "a").await.unwrap();

    // The rewritten pair still matches: both stay controlled.
    let view = board.view("a");
    assert_eq!(cell(&view, 0, 0), "my X!");
    assert_eq!(cell(&view, 0, 1), "my X!");

    board.flip(c(2, 2), "a").await.unwrap();
    let view = board.view("a");
    assert_eq!(cell(&view, 0, 0), "none");
    assert_eq!(cell(&view, 0, 1), "none");
}

#[tokio::test]
async fn transform_preserves_face_and_control() {
    let board = perfect();
    board.flip(c(0, 0), "a").await.unwrap();
    append_bang(&board).await;

    let view = board.view("a");
    assert_eq!(cell(&view, 0, 0), "my X!");
    assert_eq!(cell(&view, 1, 1), "down");
}

#[tokio::test]
async fn transform_skips_removed_cells() {
    let board = perfect();
    board.flip(c(0, 0), "a").await.unwrap();
    board.flip(c(0, 1), "a").await.unwrap();
    board.flip(c(2, 2), "a").await.unwrap(); // X pair removed

    append_bang(&board).await;
    let view = board.view("a");
    assert_eq!(cell(&view, 0, 0), "none");
    assert_eq!(cell(&view, 0, 1), "none");
    assert_eq!(cell(&view, 2, 2), "my Q!");
}

#[tokio::test]
async fn non_injective_mapping_makes_everything_match() {
    let board = perfect();
    board
        .transform(|_| async move { Ok::<_, Infallible>(Card::new("SAME").unwrap()) })
        .await
        .unwrap();

    board.flip(c(0, 0), "a").await.unwrap();
    board.flip(c(2, 2), "a").await.unwrap(); // previously unmatched Q

    let view = board.view("a");
    assert_eq!(cell(&view, 0, 0), "my SAME");
    assert_eq!(cell(&view, 2, 2), "my SAME");
}

#[tokio::test]
async fn failing_mapping_leaves_the_board_untouched() {
    let board = perfect();
    board.flip(c(0, 0), "a").await.unwrap();

    let result = board
        .transform(|card| async move {
            if card.as_str() == "Z" {
                // Whitespace is rejected at card construction.
                Card::new("bad card")
            } else {
                Card::new(format!("{card}!"))
            }
        })
        .await;

    let err: InvalidCard = result.expect_err("the mapping rejected Z");
    assert!(err.to_string().contains("invalid card content"));
    let view = board.view("a");
    assert_eq!(cell(&view, 0, 0), "my X", "no partial substitution");
    assert_eq!(cell(&view, 1, 1), "down");
}

#[tokio::test]
async fn transform_publishes_one_change() {
    let board = Arc::new(perfect());
    let observer = {
        let board = board.clone();
        tokio::spawn(async move { board.wait_for_change("watcher").await })
    };
    sleep(Duration::from_millis(50)).await;

    append_bang(&board).await;

    let view = timeout(Duration::from_secs(5), observer)
        .await
        .expect("observer wakes on the rewrite")
        .unwrap();
    assert_eq!(cell(&view, 2, 2), "down");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn flips_proceed_while_the_mapping_is_computed() {
    let board = Arc::new(perfect());
    let gate = Arc::new(Semaphore::new(0));

    let transform = {
        let board = board.clone();
        let gate = gate.clone();
        tokio::spawn(async move {
            board
                .transform(move |card| {
                    let gate = gate.clone();
                    async move {
                        let _permit = gate.acquire().await.unwrap();
                        Card::new(format!("{card}?"))
                    }
                })
                .await
                .expect("mapping produces valid cards");
        })
    };
    sleep(Duration::from_millis(50)).await;
    assert!(!transform.is_finished(), "mapping is gated");

    // The monitor is free while the mapping runs: flips go through.
    timeout(Duration::from_secs(5), board.flip(c(0, 0), "bob"))
        .await
        .expect("flip must not block behind the transform")
        .unwrap();

    gate.add_permits(16);
    timeout(Duration::from_secs(5), transform)
        .await
        .expect("transform finishes once the gate opens")
        .unwrap();

    // bob's claim survived the substitution.
    assert_eq!(cell(&board.view("bob"), 0, 0), "my X?");
}
