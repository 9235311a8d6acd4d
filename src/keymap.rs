use rdev::Key as RdevKey;

use crate::settings::Key;

pub fn map_rdev_to_key(key: RdevKey) -> Option<Key> {
    let mapped = match key {
        RdevKey::F1 => Key::F1,
        RdevKey::F2 => Key::F2,
        RdevKey::F3 => Key::F3,
        RdevKey::F4 => Key::F4,
        RdevKey::F5 => Key::F5,
        RdevKey::F6 => Key::F6,
        RdevKey::F7 => Key::F7,
        RdevKey::F8 => Key::F8,
        RdevKey::F9 => Key::F9,
        RdevKey::F10 => Key::F10,
        RdevKey::F11 => Key::F11,
        RdevKey::F12 => Key::F12,
        RdevKey::Space => Key::Space,
        RdevKey::Return | RdevKey::KpReturn => Key::Enter,
        RdevKey::Escape => Key::Escape,
        RdevKey::KeyA => Key::Char('A'),
        RdevKey::KeyB => Key::Char('B'),
        RdevKey::KeyC => Key::Char('C'),
        RdevKey::KeyD => Key::Char('D'),
        RdevKey::KeyE => Key::Char('E'),
        RdevKey::KeyF => Key::Char('F'),
        RdevKey::KeyG => Key::Char('G'),
        RdevKey::KeyH => Key::Char('H'),
        RdevKey::KeyI => Key::Char('I'),
        RdevKey::KeyJ => Key::Char('J'),
        RdevKey::KeyK => Key::Char('K'),
        RdevKey::KeyL => Key::Char('L'),
        RdevKey::KeyM => Key::Char('M'),
        RdevKey::KeyN => Key::Char('N'),
        RdevKey::KeyO => Key::Char('O'),
        RdevKey::KeyP => Key::Char('P'),
        RdevKey::KeyQ => Key::Char('Q'),
        RdevKey::KeyR => Key::Char('R'),
        RdevKey::KeyS => Key::Char('S'),
        RdevKey::KeyT => Key::Char('T'),
        RdevKey::KeyU => Key::Char('U'),
        RdevKey::KeyV => Key::Char('V'),
        RdevKey::KeyW => Key::Char('W'),
        RdevKey::KeyX => Key::Char('X'),
        RdevKey::KeyY => Key::Char('Y'),
        RdevKey::KeyZ => Key::Char('Z'),
        RdevKey::Num0 => Key::Char('0'),
        RdevKey::Num1 => Key::Char('1'),
        RdevKey::Num2 => Key::Char('2'),
        RdevKey::Num3 => Key::Char('3'),
        RdevKey::Num4 => Key::Char('4'),
        RdevKey::Num5 => Key::Char('5'),
        RdevKey::Num6 => Key::Char('6'),
        RdevKey::Num7 => Key::Char('7'),
        RdevKey::Num8 => Key::Char('8'),
        RdevKey::Num9 => Key::Char('9'),
        _ => return None,
    };
    Some(mapped)
}

/// Config files may spell letters in either case.
pub fn same_key(a: &Key, b: &Key) -> bool {
    match (a, b) {
        (Key::Char(x), Key::Char(y)) => x.eq_ignore_ascii_case(y),
        _ => a == b,
    }
}
