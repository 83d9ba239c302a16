//! Board file loading against real files on disk.

use memory_scramble::{load_board, Board, ParseError};
use std::io::Write;
use tempfile::NamedTempFile;

fn board_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(contents.as_bytes()).expect("write board");
    file
}

#[test]
fn loads_a_board_file() {
    let file = board_file("3x3\nX\nX\nY\nY\nZ\nZ\nW\nW\nQ\n");
    let parsed = load_board(file.path()).expect("valid file");
    assert_eq!((*parsed.rows(), *parsed.cols()), (3, 3));
    assert_eq!(parsed.cards().len(), 9);
    assert_eq!(parsed.cards()[8].as_str(), "Q");
}

#[test]
fn loads_a_crlf_board_file() {
    let file = board_file("2x1\r\nfoo\r\nbar\r\n");
    let parsed = load_board(file.path()).expect("CRLF endings are fine");
    assert_eq!(parsed.cards()[0].as_str(), "foo");
    assert_eq!(parsed.cards()[1].as_str(), "bar");
}

#[test]
fn missing_file_reports_the_path() {
    let result = load_board(std::path::Path::new("no/such/board.txt"));
    match result {
        Err(ParseError::Unreadable { path, .. }) => {
            assert!(path.ends_with("board.txt"));
        }
        other => panic!("expected Unreadable, got {other:?}"),
    }
}

#[test]
fn malformed_dimension_line_in_file() {
    let file = board_file("three by three\nX\n");
    assert!(matches!(
        load_board(file.path()),
        Err(ParseError::MalformedDimensions { .. })
    ));
}

#[test]
fn wrong_card_count_in_file() {
    let file = board_file("2x3\nA\nB\nC\n");
    assert!(matches!(
        load_board(file.path()),
        Err(ParseError::WrongCardCount { found: 3, .. })
    ));
}

#[test]
fn illegal_content_in_file() {
    let file = board_file("1x2\nok\nvery bad\n");
    assert!(matches!(
        load_board(file.path()),
        Err(ParseError::IllegalContent { line_number: 3, .. })
    ));
}

#[tokio::test]
async fn board_from_file_is_playable() {
    let file = board_file("1x2\npair\npair\n");
    let board = Board::from_file(file.path()).expect("valid file");
    board
        .flip(memory_scramble::Coordinate::new(0, 0), "a")
        .await
        .unwrap();
    assert_eq!(board.view("a"), "1x2\nmy pair\ndown");
}
