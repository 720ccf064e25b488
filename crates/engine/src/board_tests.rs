// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn wait_returns_immediately_when_already_done() {
    let board = CompletionBoard::new();
    board.complete("a", true);
    board.wait_for(&["a".to_string()]).await;
    assert_eq!(board.outcome("a"), Some(true));
}

#[tokio::test]
async fn wait_blocks_until_completion() {
    let board = Arc::new(CompletionBoard::new());

    let waiter = {
        let board = board.clone();
        tokio::spawn(async move {
            board
                .wait_for(&["a".to_string(), "b".to_string()])
                .await;
        })
    };

    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(!waiter.is_finished(), "waiter must still be parked");

    board.complete("a", true);
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(!waiter.is_finished(), "one of two is not enough");

    board.complete("b", false);
    tokio::time::timeout(Duration::from_secs(1), waiter)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(board.outcome("b"), Some(false));
}

#[tokio::test]
async fn many_waiters_all_wake() {
    let board = Arc::new(CompletionBoard::new());
    let waiters: Vec<_> = (0..4)
        .map(|_| {
            let board = board.clone();
            tokio::spawn(async move { board.wait_for(&["x".to_string()]).await })
        })
        .collect();

    tokio::time::sleep(Duration::from_millis(10)).await;
    board.complete("x", true);
    for waiter in waiters {
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .unwrap()
            .unwrap();
    }
}

#[tokio::test]
async fn empty_wait_list_is_immediate() {
    let board = CompletionBoard::new();
    board.wait_for(&[]).await;
}
