//! Shared state container tests.

use super::*;
use crate::mode::Mode;
use std::collections::HashSet;
use std::sync::{Arc, Barrier};
use std::thread;

#[derive(Debug)]
struct InsertMode;

impl Mode for InsertMode {
    fn name(&self) -> &str {
        "insert"
    }
}

fn state_with(code: &str, dot: usize) -> State {
    let state = State::new();
    state.set_code_and_dot(code, dot);
    state
}

#[test]
fn empty_state_reads_zero_values() {
    let state = State::new();
    assert!(state.mode().is_none());
    assert_eq!(state.code(), "");
    assert_eq!(state.code_and_dot(), (String::new(), 0));
    assert_eq!(state.code_before_dot(), "");
    assert_eq!(state.code_after_dot(), "");
    assert!(state.pending().is_none());
    assert!(state.notes().is_empty());
    assert_eq!(state.last_key(), Key::default());
    assert_eq!(state.next_action(), HandlerAction::NoAction);
}

#[test]
fn with_raw_serves_the_given_state() {
    let state = State::with_raw(RawState {
        code: "cd ~".to_string(),
        dot: 3,
        notes: vec!["restored".to_string()],
        next_action: HandlerAction::ReturnLine,
        ..RawState::default()
    });
    assert_eq!(state.code_before_dot(), "cd ");
    assert_eq!(state.next_action(), HandlerAction::ReturnLine);
    assert_eq!(state.pop_for_redraw().notes, vec!["restored"]);
}

#[test]
fn split_accessors_rejoin_to_code_for_every_boundary() {
    let code = "git commit -m 'héllo wörld'";
    for dot in (0..=code.len()).filter(|&dot| code.is_char_boundary(dot)) {
        let state = state_with(code, dot);
        let before = state.code_before_dot();
        let after = state.code_after_dot();
        assert_eq!(format!("{before}{after}"), code, "dot: {dot}");
        assert_eq!(before.len(), dot, "dot: {dot}");
        assert_eq!(state.code_and_dot(), (code.to_string(), dot));
    }
}

#[test]
fn ls_example_splits_and_pops_as_documented() {
    let state = state_with("ls -l", 2);
    assert_eq!(state.code_before_dot(), "ls");
    assert_eq!(state.code_after_dot(), " -l");

    let insert: ModeHandle = Arc::new(InsertMode);
    state.set_mode(Some(insert));
    state.add_note("loaded history");

    let snapshot = state.pop_for_redraw();
    assert_eq!(snapshot.code, "ls -l");
    assert_eq!(snapshot.dot, 2);
    assert_eq!(
        snapshot.mode.as_ref().map(|mode| mode.name()),
        Some("insert")
    );
    assert_eq!(snapshot.notes, vec!["loaded history".to_string()]);

    assert!(state.notes().is_empty());
    assert_eq!(state.code_and_dot(), ("ls -l".to_string(), 2));
    assert_eq!(state.mode().as_ref().map(|mode| mode.name()), Some("insert"));
}

#[test]
fn set_mode_none_clears_the_mode() {
    let state = state_with("vi", 2);
    state.set_mode(Some(Arc::new(InsertMode)));
    assert_eq!(state.mode().as_ref().map(|mode| mode.name()), Some("insert"));

    state.set_mode(None);
    assert!(state.mode().is_none());
    assert!(state.pop_for_redraw().mode.is_none());
    assert_eq!(state.code_and_dot(), ("vi".to_string(), 2));
}

#[test]
fn pop_for_redraw_returns_notes_in_order_once() {
    let state = State::new();
    state.add_note("first");
    state.add_note("second");
    state.add_note("first");

    let popped = state.pop_for_redraw();
    assert_eq!(popped.notes, vec!["first", "second", "first"]);
    assert!(state.notes().is_empty());

    let again = state.pop_for_redraw();
    assert!(again.notes.is_empty(), "notes must not be observed twice");

    state.add_note("third");
    assert_eq!(state.pop_for_redraw().notes, vec!["third"]);
}

#[test]
fn pop_for_redraw_snapshot_is_detached_from_live_state() {
    let state = state_with("echo", 4);
    state.set_pending(Some(PendingCode::new(0, 4, "printf").expect("pending")));
    let snapshot = state.pop_for_redraw();

    state.set_code_and_dot("echo hi", 7);
    state.set_pending(None);
    state.add_note("later");

    assert_eq!(snapshot.code, "echo");
    assert_eq!(snapshot.dot, 4);
    assert_eq!(
        snapshot.pending.as_ref().map(PendingCode::text),
        Some("printf")
    );
    assert!(snapshot.notes.is_empty());
}

#[test]
fn concurrent_notes_are_popped_exactly_once() {
    let state = Arc::new(State::new());
    let barrier = Arc::new(Barrier::new(2));

    let handles: Vec<_> = ["a", "b"]
        .into_iter()
        .map(|note| {
            let state = Arc::clone(&state);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                state.add_note(note);
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("note writer join");
    }

    let mut notes = state.pop_for_redraw().notes;
    notes.sort();
    assert_eq!(notes, vec!["a", "b"]);
    assert!(state.pop_for_redraw().notes.is_empty());
}

#[test]
fn reset_restores_zero_values() {
    let state = state_with("rm -rf build", 5);
    state.set_mode(Some(Arc::new(InsertMode)));
    state.set_pending(Some(PendingCode::new(3, 6, "-r").expect("pending")));
    state.add_note("careful");
    state.set_last_key(Key::ctrl('c'));
    state.set_next_action(HandlerAction::ReturnLine);

    state.reset();

    assert!(state.mode().is_none());
    assert_eq!(state.code(), "");
    assert_eq!(state.code_and_dot(), (String::new(), 0));
    assert!(state.pending().is_none());
    assert!(state.notes().is_empty());
    assert_eq!(state.last_key(), Key::default());
    assert_eq!(state.next_action(), HandlerAction::NoAction);
}

#[test]
fn finalize_builds_terminal_snapshot_without_touching_live_state() {
    let state = state_with("make test", 2);
    state.set_mode(Some(Arc::new(InsertMode)));
    state.set_pending(Some(PendingCode::new(5, 9, "check").expect("pending")));
    state.set_last_key(Key::char('k'));
    state.set_next_action(HandlerAction::ReturnLine);
    state.add_note("before finalize");

    let finalized = state.finalize();
    assert!(finalized.is_finalized());
    assert_eq!(finalized.code, "make test");
    assert_eq!(finalized.dot, finalized.code.len());
    assert!(finalized.pending.is_none());
    assert_eq!(finalized.notes, vec!["before finalize"]);
    assert_eq!(finalized.last_key, Key::default());
    assert_eq!(finalized.next_action, HandlerAction::NoAction);

    assert_eq!(state.code_and_dot(), ("make test".to_string(), 2));
    assert!(state.pending().is_some());
    assert_eq!(state.last_key(), Key::char('k'));
    assert_eq!(state.mode().as_ref().map(|mode| mode.name()), Some("insert"));
    assert_eq!(state.pop_for_redraw().notes, vec!["before finalize"]);
}

#[test]
fn try_accessors_report_broken_cursor() {
    let state = state_with("ls", 9);
    assert_eq!(
        state.try_code_before_dot().expect_err("dot past end"),
        StateError::DotOutOfRange { dot: 9, len: 2 }
    );

    state.set_code_and_dot("日本", 1);
    assert_eq!(
        state.try_code_after_dot().expect_err("dot mid char"),
        StateError::DotNotCharBoundary { dot: 1 }
    );

    state.set_dot(3);
    assert_eq!(state.try_code_before_dot().expect("valid dot"), "日");
    assert_eq!(state.try_code_after_dot().expect("valid dot"), "本");
}

#[test]
#[should_panic(expected = "cursor invariant violated")]
fn code_before_dot_panics_when_dot_is_past_end() {
    let state = state_with("ls", 3);
    let _ = state.code_before_dot();
}

#[test]
#[should_panic(expected = "cursor invariant violated")]
fn code_after_dot_panics_when_dot_splits_a_char() {
    let state = state_with("é", 1);
    let _ = state.code_after_dot();
}

#[test]
fn split_panic_leaves_state_usable() {
    let state = Arc::new(state_with("ls", 5));
    let reader = Arc::clone(&state);
    let result = thread::spawn(move || reader.code_before_dot()).join();
    assert!(result.is_err(), "split past end should panic the caller");

    state.set_dot(1);
    assert_eq!(state.code_before_dot(), "l");
}

#[test]
fn update_applies_multi_field_edit_atomically() {
    let state = state_with("ct", 1);
    let dot = state.update(|raw| {
        raw.code.insert(raw.dot, 'a');
        raw.dot += 'a'.len_utf8();
        raw.dot
    });
    assert_eq!(dot, 2);
    assert_eq!(state.code_and_dot(), ("cat".to_string(), 2));
    assert_eq!(state.inspect(|raw| raw.code.len()), 3);
}

#[test]
fn poisoned_lock_keeps_serving_state() {
    let state = Arc::new(state_with("ls", 2));
    let poisoner = Arc::clone(&state);
    let _ = thread::spawn(move || {
        poisoner.update(|raw| {
            raw.code.push_str(" -a");
            panic!("handler bug while holding the lock");
        })
    })
    .join();

    assert_eq!(state.code(), "ls -a");
    state.add_note("still writable");
    assert_eq!(state.pop_for_redraw().notes, vec!["still writable"]);
}

#[test]
fn concurrent_pops_never_duplicate_or_lose_notes() {
    const WRITERS: usize = 4;
    const NOTES_PER_WRITER: usize = 250;

    let state = Arc::new(State::new());
    let barrier = Arc::new(Barrier::new(WRITERS + 1));

    let writers: Vec<_> = (0..WRITERS)
        .map(|writer| {
            let state = Arc::clone(&state);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for n in 0..NOTES_PER_WRITER {
                    state.add_note(format!("{writer}:{n}"));
                }
            })
        })
        .collect();

    let renderer = {
        let state = Arc::clone(&state);
        let barrier = Arc::clone(&barrier);
        thread::spawn(move || {
            barrier.wait();
            let mut seen = Vec::new();
            for _ in 0..200 {
                seen.extend(state.pop_for_redraw().notes);
                thread::yield_now();
            }
            seen
        })
    };

    for writer in writers {
        writer.join().expect("writer join");
    }
    let mut seen = renderer.join().expect("renderer join");
    seen.extend(state.pop_for_redraw().notes);

    assert_eq!(seen.len(), WRITERS * NOTES_PER_WRITER);
    let unique: HashSet<&String> = seen.iter().collect();
    assert_eq!(unique.len(), seen.len(), "a note was observed twice");

    for writer in 0..WRITERS {
        let order: Vec<usize> = seen
            .iter()
            .filter_map(|note| note.strip_prefix(&format!("{writer}:")))
            .map(|n| n.parse().expect("note index"))
            .collect();
        let mut sorted = order.clone();
        sorted.sort_unstable();
        assert_eq!(order, sorted, "writer {writer} notes out of order");
    }
}

#[test]
fn readers_never_observe_torn_code_and_dot() {
    let state = Arc::new(state_with("", 0));
    let barrier = Arc::new(Barrier::new(2));

    let writer = {
        let state = Arc::clone(&state);
        let barrier = Arc::clone(&barrier);
        thread::spawn(move || {
            barrier.wait();
            let mut code = String::new();
            for _ in 0..500 {
                code.push('x');
                state.set_code_and_dot(code.clone(), code.len());
            }
        })
    };

    barrier.wait();
    for _ in 0..500 {
        let (code, dot) = state.code_and_dot();
        assert_eq!(dot, code.len(), "code and dot from different writes");
        let snapshot = state.pop_for_redraw();
        assert_eq!(snapshot.dot, snapshot.code.len());
    }
    writer.join().expect("writer join");
}
