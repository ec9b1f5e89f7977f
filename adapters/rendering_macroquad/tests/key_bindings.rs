use macroquad::input::KeyCode;
use shamble_core::InputCommand;
use shamble_rendering_macroquad::command_for_key;

#[test]
fn arrows_and_wasd_share_directions() {
    let pairs = [
        (KeyCode::Left, KeyCode::A, InputCommand::Left),
        (KeyCode::Up, KeyCode::W, InputCommand::Up),
        (KeyCode::Right, KeyCode::D, InputCommand::Right),
        (KeyCode::Down, KeyCode::S, InputCommand::Down),
    ];

    for (arrow, letter, command) in pairs {
        assert_eq!(command_for_key(arrow), Some(command));
        assert_eq!(command_for_key(letter), Some(command));
    }
}

#[test]
fn space_skips_the_turn() {
    assert_eq!(command_for_key(KeyCode::Space), Some(InputCommand::Skip));
}

#[test]
fn unbound_keys_are_ignored() {
    assert_eq!(command_for_key(KeyCode::Enter), None);
    assert_eq!(command_for_key(KeyCode::T), None);
}
