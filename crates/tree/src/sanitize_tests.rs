// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn plain_text_splits_into_lines() {
    assert_eq!(
        sanitize_output("one\ntwo\n"),
        vec!["one".to_string(), "two".to_string()]
    );
}

#[test]
fn trailing_blank_lines_are_dropped() {
    assert_eq!(sanitize_output("one\n\n\n"), vec!["one".to_string()]);
}

#[test]
fn carriage_return_overwrites_from_column_zero() {
    assert_eq!(sanitize_output("12345\rab\n"), vec!["ab345".to_string()]);
}

#[test]
fn progress_style_output_collapses_to_final_form() {
    let input = "downloading   1%\rdownloading  50%\rdownloading 100%\n";
    assert_eq!(
        sanitize_output(input),
        vec!["downloading 100%".to_string()]
    );
}

#[test]
fn erase_to_end_of_line_clears_leftovers() {
    assert_eq!(sanitize_output("12345\rab\x1b[K\n"), vec!["ab".to_string()]);
}

#[test]
fn cursor_up_rewrites_an_earlier_line() {
    let input = "one\ntwo\x1b[1A\rONE\x1b[K\n";
    assert_eq!(
        sanitize_output(input),
        vec!["ONE".to_string(), "two".to_string()]
    );
}

#[test]
fn cursor_up_and_erase_below_collapses_a_frame() {
    // A two-line frame redrawn the way Display does it.
    let input = "a\nb\n\x1b[2A\x1b[JA\nB\n";
    assert_eq!(
        sanitize_output(input),
        vec!["A".to_string(), "B".to_string()]
    );
}

#[test]
fn color_sgr_is_preserved() {
    assert_eq!(
        sanitize_output("\x1b[32mok\x1b[0m\n"),
        vec!["\x1b[32mok\x1b[0m".to_string()]
    );
}

#[test]
fn non_sgr_sequences_are_stripped() {
    // Cursor save/restore and a window-title OSC disappear entirely.
    assert_eq!(
        sanitize_output("\x1b7hi\x1b8\x1b]0;title\x07\n"),
        vec!["hi".to_string()]
    );
}

#[test]
fn tabs_become_spaces_and_other_controls_drop() {
    assert_eq!(
        sanitize_output("a\tb\x07\n"),
        vec!["a b".to_string()]
    );
}

#[test]
fn empty_input_is_no_lines() {
    assert_eq!(sanitize_output(""), Vec::<String>::new());
}

#[test]
fn multiline_color_keeps_reset_on_its_line() {
    let lines = sanitize_output("\x1b[31merr\x1b[0m\nplain\n");
    assert_eq!(lines[0], "\x1b[31merr\x1b[0m");
    assert_eq!(lines[1], "plain");
}
