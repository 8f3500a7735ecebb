// Keyswap Remap Scenarios
//
// Drive the engine through a simulated keyboard and check what applications
// observe, without touching a real input device.

use keyswap_core::{
    HookDecision, Key, KeyAction, KeyEvent, RemapTables, RemapTarget, Shortcut, SimulatedKeyboard,
};

fn sc(keys: &[Key]) -> Shortcut {
    Shortcut::from_keys(keys.iter().copied()).unwrap()
}

fn global(source: &[Key], target: &[Key]) -> RemapTables {
    let mut tables = RemapTables::new();
    tables.insert_global_shortcut(sc(source), RemapTarget::Shortcut(sc(target)));
    tables
}

fn ctrl_a_to_alt_v() -> SimulatedKeyboard {
    SimulatedKeyboard::with_tables(global(&[Key::CTRL, Key::A], &[Key::ALT, Key::V]))
}

#[test]
fn ctrl_a_becomes_alt_v() {
    let mut keyboard = ctrl_a_to_alt_v();

    assert_eq!(keyboard.press(Key::LEFT_CTRL), HookDecision::PassThrough);
    assert_eq!(keyboard.press(Key::A), HookDecision::Handled);
    assert!(!keyboard.is_down(Key::LEFT_CTRL));
    assert!(!keyboard.is_down(Key::A));
    assert!(keyboard.is_down(Key::LEFT_ALT));
    assert!(keyboard.is_down(Key::V));

    assert_eq!(keyboard.release(Key::A), HookDecision::Handled);
    keyboard.release(Key::LEFT_CTRL);
    assert!(keyboard.observed_keys().is_empty());
    assert!(keyboard.physical().is_empty());
}

#[test]
fn superset_does_not_fire() {
    let mut keyboard = ctrl_a_to_alt_v();

    keyboard.press(Key::LEFT_CTRL);
    keyboard.press(Key::LEFT_SHIFT);
    assert_eq!(keyboard.press(Key::A), HookDecision::PassThrough);
    assert_eq!(
        keyboard.observed_keys(),
        vec![Key::LEFT_CTRL, Key::A, Key::LEFT_SHIFT]
    );
    assert!(!keyboard.is_down(Key::LEFT_ALT));
    assert!(!keyboard.is_down(Key::V));
}

#[test]
fn subset_does_not_fire() {
    let mut keyboard = SimulatedKeyboard::with_tables(global(
        &[Key::CTRL, Key::SHIFT, Key::A],
        &[Key::ALT, Key::V],
    ));

    keyboard.press(Key::LEFT_CTRL);
    assert_eq!(keyboard.press(Key::A), HookDecision::PassThrough);
    assert!(keyboard.is_down(Key::A));
    assert!(!keyboard.is_down(Key::V));
}

#[test]
fn side_specific_source_ignores_other_side() {
    let mut keyboard =
        SimulatedKeyboard::with_tables(global(&[Key::LEFT_CTRL, Key::A], &[Key::ALT, Key::V]));

    keyboard.press(Key::RIGHT_CTRL);
    assert_eq!(keyboard.press(Key::A), HookDecision::PassThrough);
    keyboard.release(Key::A);
    keyboard.release(Key::RIGHT_CTRL);

    keyboard.press(Key::LEFT_CTRL);
    assert_eq!(keyboard.press(Key::A), HookDecision::Handled);
}

#[test]
fn single_key_remap() {
    let mut tables = RemapTables::new();
    tables.insert_single_key(Key::A, RemapTarget::Key(Key::B));
    let mut keyboard = SimulatedKeyboard::with_tables(tables);

    assert_eq!(keyboard.press(Key::A), HookDecision::Handled);
    assert!(!keyboard.is_down(Key::A));
    assert!(keyboard.is_down(Key::B));

    assert_eq!(keyboard.repeat(Key::A), HookDecision::Handled);
    assert!(keyboard.is_down(Key::B));

    assert_eq!(keyboard.release(Key::A), HookDecision::Handled);
    assert!(keyboard.observed_keys().is_empty());
}

#[test]
fn three_key_source_needs_all_three_keys() {
    let source = [Key::LEFT_CTRL, Key::LEFT_SHIFT, Key::A];
    let tables = global(&[Key::CTRL, Key::SHIFT, Key::A], &[Key::F1]);

    for (i, first) in source.iter().enumerate() {
        for second in &source[i + 1..] {
            for (a, b) in [(*first, *second), (*second, *first)] {
                let mut keyboard = SimulatedKeyboard::with_tables(tables.clone());
                keyboard.press(a);
                keyboard.press(b);
                assert!(!keyboard.is_down(Key::F1), "{} + {} fired", a, b);
                assert_eq!(keyboard.observed_keys(), keyboard.physical().pressed_keys().into_vec());
            }
        }
    }

    let mut keyboard = SimulatedKeyboard::with_tables(tables);
    for key in source {
        keyboard.press(key);
    }
    assert_eq!(keyboard.observed_keys(), vec![Key::F1]);
}

#[test]
fn single_key_to_shortcut() {
    let mut tables = RemapTables::new();
    tables.insert_single_key(
        Key::CAPSLOCK,
        RemapTarget::Shortcut(sc(&[Key::LEFT_CTRL, Key::C])),
    );
    let mut keyboard = SimulatedKeyboard::with_tables(tables);

    keyboard.press(Key::CAPSLOCK);
    assert_eq!(keyboard.observed_keys(), vec![Key::LEFT_CTRL, Key::C]);
    keyboard.release(Key::CAPSLOCK);
    assert!(keyboard.observed_keys().is_empty());
}

#[test]
fn single_key_output_leaves_held_modifier_down() {
    let mut tables = RemapTables::new();
    tables.insert_single_key(
        Key::CAPSLOCK,
        RemapTarget::Shortcut(sc(&[Key::CTRL, Key::C])),
    );
    let mut keyboard = SimulatedKeyboard::with_tables(tables);

    keyboard.press(Key::LEFT_CTRL);
    keyboard.take_delivered();
    assert_eq!(keyboard.press(Key::CAPSLOCK), HookDecision::Handled);
    assert_eq!(keyboard.take_delivered(), vec![KeyEvent::synthetic(Key::C, KeyAction::Down)]);
    assert_eq!(keyboard.observed_keys(), vec![Key::LEFT_CTRL, Key::C]);

    keyboard.release(Key::CAPSLOCK);
    assert_eq!(keyboard.observed_keys(), vec![Key::LEFT_CTRL]);
    keyboard.release(Key::LEFT_CTRL);
    assert!(keyboard.observed_keys().is_empty());
}

#[test]
fn single_key_target_already_held() {
    let mut tables = RemapTables::new();
    tables.insert_single_key(Key::A, RemapTarget::Key(Key::B));
    let mut keyboard = SimulatedKeyboard::with_tables(tables);

    assert_eq!(keyboard.press(Key::B), HookDecision::PassThrough);
    keyboard.take_delivered();
    keyboard.tap(Key::A);
    assert!(keyboard.take_delivered().is_empty());
    assert_eq!(keyboard.observed_keys(), vec![Key::B]);

    keyboard.release(Key::B);
    assert!(keyboard.observed_keys().is_empty());
}

#[test]
fn repeated_down_of_single_key_source() {
    let mut tables = RemapTables::new();
    tables.insert_single_key(Key::A, RemapTarget::Key(Key::B));
    let mut keyboard = SimulatedKeyboard::with_tables(tables);

    keyboard.press(Key::A);
    keyboard.take_delivered();
    assert_eq!(keyboard.press(Key::A), HookDecision::Handled);
    assert_eq!(
        keyboard.take_delivered(),
        vec![KeyEvent::synthetic(Key::B, KeyAction::Repeat)]
    );

    keyboard.release(Key::A);
    assert!(keyboard.observed_keys().is_empty());
    keyboard.take_delivered();

    // Nothing is left that could answer for A
    assert_eq!(keyboard.repeat(Key::A), HookDecision::PassThrough);
    assert_eq!(
        keyboard.take_delivered(),
        vec![KeyEvent::new(Key::A, KeyAction::Repeat)]
    );
    assert!(!keyboard.is_down(Key::B));
}

#[test]
fn disabled_key_is_swallowed() {
    let mut tables = RemapTables::new();
    tables.insert_single_key(Key::INSERT, RemapTarget::Disabled);
    let mut keyboard = SimulatedKeyboard::with_tables(tables);

    assert_eq!(keyboard.press(Key::INSERT), HookDecision::Handled);
    assert_eq!(keyboard.release(Key::INSERT), HookDecision::Handled);
    assert!(keyboard.take_delivered().is_empty());
}

#[test]
fn partial_release_restores_held_modifier() {
    let mut keyboard =
        SimulatedKeyboard::with_tables(global(&[Key::META, Key::A], &[Key::ALT, Key::V]));

    keyboard.press(Key::LEFT_META);
    keyboard.press(Key::A);
    assert_eq!(keyboard.observed_keys(), vec![Key::V, Key::LEFT_ALT]);

    keyboard.release(Key::A);
    assert_eq!(keyboard.observed_keys(), vec![Key::LEFT_META]);

    assert_eq!(keyboard.press(Key::C), HookDecision::PassThrough);
    assert_eq!(keyboard.observed_keys(), vec![Key::C, Key::LEFT_META]);
    assert!(!keyboard.is_down(Key::LEFT_ALT));
    assert!(!keyboard.is_down(Key::V));
}

#[test]
fn releasing_modifier_first_swallows_action_key() {
    let mut keyboard = ctrl_a_to_alt_v();

    keyboard.press(Key::LEFT_CTRL);
    keyboard.press(Key::A);
    assert_eq!(keyboard.release(Key::LEFT_CTRL), HookDecision::Handled);
    assert!(keyboard.observed_keys().is_empty());

    assert_eq!(keyboard.repeat(Key::A), HookDecision::Handled);
    assert_eq!(keyboard.release(Key::A), HookDecision::Handled);
    assert!(keyboard.observed_keys().is_empty());
}

#[test]
fn held_shortcut_repeats_destination() {
    let mut keyboard = ctrl_a_to_alt_v();

    keyboard.press(Key::LEFT_CTRL);
    keyboard.press(Key::A);
    keyboard.take_delivered();

    assert_eq!(keyboard.repeat(Key::A), HookDecision::Handled);
    let delivered = keyboard.take_delivered();
    assert_eq!(delivered.len(), 1);
    assert_eq!(delivered[0].key, Key::V);
    assert_eq!(delivered[0].action, KeyAction::Repeat);
    assert!(delivered[0].is_synthetic());
}

#[test]
fn other_key_ends_active_shortcut() {
    let mut keyboard = ctrl_a_to_alt_v();

    keyboard.press(Key::LEFT_CTRL);
    keyboard.press(Key::A);
    assert_eq!(keyboard.press(Key::B), HookDecision::PassThrough);
    assert!(keyboard.engine().dispatcher().active_shortcut().is_none());
    assert_eq!(keyboard.observed_keys(), vec![Key::LEFT_CTRL, Key::B]);

    keyboard.release(Key::B);
    assert_eq!(keyboard.release(Key::A), HookDecision::Handled);
    keyboard.release(Key::LEFT_CTRL);
    assert!(keyboard.observed_keys().is_empty());
}

#[test]
fn destination_keeps_shared_modifier_held() {
    let mut keyboard = SimulatedKeyboard::with_tables(global(
        &[Key::CTRL, Key::A],
        &[Key::CTRL, Key::SHIFT, Key::Z],
    ));

    keyboard.press(Key::RIGHT_CTRL);
    keyboard.press(Key::A);
    assert_eq!(
        keyboard.observed_keys(),
        vec![Key::LEFT_SHIFT, Key::Z, Key::RIGHT_CTRL]
    );
    keyboard.release(Key::A);
    assert_eq!(keyboard.observed_keys(), vec![Key::RIGHT_CTRL]);
}

#[test]
fn app_specific_shortcut_wins_in_its_application() {
    let mut tables = RemapTables::new();
    tables.insert_global_shortcut(sc(&[Key::CTRL, Key::T]), RemapTarget::Key(Key::F5));
    tables.insert_app_shortcut(
        "Firefox",
        sc(&[Key::CTRL, Key::T]),
        RemapTarget::Shortcut(sc(&[Key::CTRL, Key::N])),
    );

    let mut keyboard = SimulatedKeyboard::with_tables(tables.clone()).with_foreground("firefox");
    keyboard.press(Key::LEFT_CTRL);
    keyboard.press(Key::T);
    assert_eq!(keyboard.observed_keys(), vec![Key::LEFT_CTRL, Key::N]);

    let mut keyboard = SimulatedKeyboard::with_tables(tables).with_foreground("terminal");
    keyboard.press(Key::LEFT_CTRL);
    keyboard.press(Key::T);
    assert_eq!(keyboard.observed_keys(), vec![Key::F5]);
}

#[test]
fn first_registered_overlap_wins() {
    let mut tables = global(&[Key::CTRL, Key::A], &[Key::ALT, Key::V]);
    tables.insert_global_shortcut(sc(&[Key::LEFT_CTRL, Key::A]), RemapTarget::Key(Key::F1));
    let mut keyboard = SimulatedKeyboard::with_tables(tables);

    keyboard.press(Key::LEFT_CTRL);
    keyboard.press(Key::A);
    assert!(keyboard.is_down(Key::V));
    assert!(!keyboard.is_down(Key::F1));
}

#[test]
fn synthetic_events_are_passed_through() {
    let mut keyboard = ctrl_a_to_alt_v();
    keyboard.press(Key::LEFT_CTRL);
    let spoof = KeyEvent::synthetic(Key::A, KeyAction::Down);
    assert_eq!(keyboard.send(spoof), HookDecision::PassThrough);
    assert!(keyboard.is_down(Key::A));
    assert!(!keyboard.is_down(Key::V));
}

#[test]
fn republished_tables_take_effect_on_next_event() {
    let mut keyboard = SimulatedKeyboard::new();
    assert_eq!(keyboard.press(Key::A), HookDecision::PassThrough);
    keyboard.release(Key::A);

    let mut tables = RemapTables::new();
    tables.insert_single_key(Key::A, RemapTarget::Key(Key::B));
    keyboard.engine().publish(tables);

    assert_eq!(keyboard.press(Key::A), HookDecision::Handled);
    assert!(keyboard.is_down(Key::B));
}
