//! Keyboard translation with DAS (Delayed Auto Shift) and ARR (Auto Repeat Rate)
//!
//! Terminals rarely report key releases, so a held key is considered
//! released once no repeat event has arrived for a short while.

use crate::settings::{KeyList, Settings};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, ModifierKeyCode};
use std::time::{Duration, Instant};
use tetris_engine::Command;
use tracing::warn;

/// Time after which we consider a key "released" if no repeat received
const KEY_TIMEOUT: Duration = Duration::from_millis(100);

/// What a key press asks the driver to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Game(Command),
    ToggleGhost,
    Quit,
}

/// Keys that auto-repeat while held
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Repeating {
    Left,
    Right,
    Down,
}

impl Repeating {
    fn command(self) -> Command {
        match self {
            Repeating::Left => Command::MoveLeft,
            Repeating::Right => Command::MoveRight,
            Repeating::Down => Command::SoftDrop,
        }
    }

    fn slot(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy)]
struct HeldKey {
    pressed_at: Instant,
    last_seen: Instant,
    /// Last auto-repeat, `None` until DAS has elapsed
    last_repeat: Option<Instant>,
}

impl HeldKey {
    fn new(now: Instant) -> Self {
        Self {
            pressed_at: now,
            last_seen: now,
            last_repeat: None,
        }
    }

    /// Whether the key fires a repeat at `now`
    fn tick(&mut self, now: Instant, das: Duration, arr: Duration) -> bool {
        if now.saturating_duration_since(self.pressed_at) < das {
            return false;
        }
        match self.last_repeat {
            Some(last) if now.saturating_duration_since(last) < arr => false,
            _ => {
                self.last_repeat = Some(now);
                true
            }
        }
    }
}

/// Key codes per input, parsed from the settings file
#[derive(Debug, Clone)]
pub struct KeyMap {
    move_left: Vec<KeyCode>,
    move_right: Vec<KeyCode>,
    soft_drop: Vec<KeyCode>,
    hard_drop: Vec<KeyCode>,
    rotate_cw: Vec<KeyCode>,
    rotate_ccw: Vec<KeyCode>,
    hold: Vec<KeyCode>,
    toggle_ghost: Vec<KeyCode>,
    reset: Vec<KeyCode>,
    quit: Vec<KeyCode>,
}

impl KeyMap {
    pub fn from_settings(settings: &Settings) -> Self {
        let keys = &settings.keys;
        Self {
            move_left: parse_keys(&keys.move_left),
            move_right: parse_keys(&keys.move_right),
            soft_drop: parse_keys(&keys.soft_drop),
            hard_drop: parse_keys(&keys.hard_drop),
            rotate_cw: parse_keys(&keys.rotate_cw),
            rotate_ccw: parse_keys(&keys.rotate_ccw),
            hold: parse_keys(&keys.hold),
            toggle_ghost: parse_keys(&keys.toggle_ghost),
            reset: parse_keys(&keys.reset),
            quit: parse_keys(&keys.quit),
        }
    }

    fn repeating(&self, code: KeyCode) -> Option<Repeating> {
        if self.move_left.contains(&code) {
            Some(Repeating::Left)
        } else if self.move_right.contains(&code) {
            Some(Repeating::Right)
        } else if self.soft_drop.contains(&code) {
            Some(Repeating::Down)
        } else {
            None
        }
    }

    fn single(&self, code: KeyCode) -> Option<Input> {
        let bindings = [
            (&self.hard_drop, Input::Game(Command::HardDrop)),
            (&self.rotate_cw, Input::Game(Command::RotateClockwise)),
            (&self.rotate_ccw, Input::Game(Command::RotateCounterClockwise)),
            (&self.hold, Input::Game(Command::Hold)),
            (&self.reset, Input::Game(Command::Reset)),
            (&self.toggle_ghost, Input::ToggleGhost),
            (&self.quit, Input::Quit),
        ];
        bindings
            .into_iter()
            .find(|(codes, _)| codes.contains(&code))
            .map(|(_, input)| input)
    }
}

/// Parse a key name such as "Left", "Space" or "x"
fn parse_key(name: &str) -> Option<KeyCode> {
    let lower = name.to_lowercase();
    let code = match lower.as_str() {
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "space" => KeyCode::Char(' '),
        "enter" => KeyCode::Enter,
        "tab" => KeyCode::Tab,
        "esc" | "escape" => KeyCode::Esc,
        "shift" => KeyCode::Modifier(ModifierKeyCode::LeftShift),
        "ctrl" | "control" => KeyCode::Modifier(ModifierKeyCode::LeftControl),
        "alt" => KeyCode::Modifier(ModifierKeyCode::LeftAlt),
        other => {
            let mut chars = other.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => KeyCode::Char(c),
                _ => match other.strip_prefix('f').and_then(|n| n.parse().ok()) {
                    Some(n) => KeyCode::F(n),
                    None => return None,
                },
            }
        }
    };
    Some(code)
}

fn parse_keys(keys: &KeyList) -> Vec<KeyCode> {
    keys.iter()
        .filter_map(|name| {
            let code = parse_key(name);
            if code.is_none() {
                warn!("unknown key name {:?} in settings", name);
            }
            code
        })
        .collect()
}

/// Lowercase letters so bindings ignore shift state
fn normalize_key(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    }
}

/// Turns key events into inputs, auto-repeating movement keys
pub struct InputHandler {
    keys: KeyMap,
    /// Indexed by `Repeating::slot`
    held: [Option<HeldKey>; 3],
    das: Duration,
    arr: Duration,
}

impl InputHandler {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            keys: KeyMap::from_settings(settings),
            held: [None; 3],
            das: Duration::from_millis(settings.gameplay.das_ms),
            arr: Duration::from_millis(settings.gameplay.arr_ms),
        }
    }

    /// Handle a press (or terminal key repeat). A fresh press of a
    /// repeating key fires once immediately.
    pub fn key_down(&mut self, key: KeyEvent, now: Instant) -> Option<Input> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(Input::Quit);
        }

        let code = normalize_key(key.code);
        let Some(repeating) = self.keys.repeating(code) else {
            return self.keys.single(code);
        };

        // Opposite directions cancel
        match repeating {
            Repeating::Left => self.held[Repeating::Right.slot()] = None,
            Repeating::Right => self.held[Repeating::Left.slot()] = None,
            Repeating::Down => {}
        }

        let slot = &mut self.held[repeating.slot()];
        if let Some(held) = slot {
            held.last_seen = now;
            return None;
        }
        *slot = Some(HeldKey::new(now));
        Some(Input::Game(repeating.command()))
    }

    /// Handle a release, when the terminal reports one
    pub fn key_up(&mut self, key: KeyEvent) {
        if let Some(repeating) = self.keys.repeating(normalize_key(key.code)) {
            self.held[repeating.slot()] = None;
        }
    }

    /// Auto-repeat commands due at `now`. Call every frame.
    pub fn update(&mut self, now: Instant) -> Vec<Command> {
        let mut commands = Vec::new();
        let (das, arr) = (self.das, self.arr);

        for repeating in [Repeating::Left, Repeating::Right, Repeating::Down] {
            let slot = &mut self.held[repeating.slot()];
            let timed_out = slot
                .as_ref()
                .is_some_and(|held| now.saturating_duration_since(held.last_seen) > KEY_TIMEOUT);
            if timed_out {
                *slot = None;
            } else if let Some(held) = slot {
                if held.tick(now, das, arr) {
                    commands.push(repeating.command());
                }
            }
        }

        commands
    }

    /// Soft drop key currently held
    pub fn is_soft_dropping(&self) -> bool {
        self.held[Repeating::Down.slot()].is_some()
    }

    /// Forget all held keys
    pub fn clear(&mut self) {
        self.held = [None; 3];
    }
}
