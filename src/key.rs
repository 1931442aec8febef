//! Type-safe key bindings shared by the data-table components.
//!
//! A [`Binding`] couples one or more key presses with the help text shown
//! for them. Component keymaps (for example
//! [`PaginatorKeyMap`](crate::paginator::PaginatorKeyMap)) implement the
//! [`KeyMap`] trait so hosts can render contextual help.
//!
//! # Examples
//!
//! ```rust
//! use datatable_widgets::key;
//!
//! let next = key::new_binding(vec![
//!     key::with_keys_str(&["right", "l"]),
//!     key::with_help("→/l", "next page"),
//! ]);
//! assert_eq!(next.help.key, "→/l");
//! ```

use bubbletea_rs::KeyMsg;
use crossterm::event::{KeyCode, KeyModifiers};

/// A single key press: a key code plus its modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    /// The key code.
    pub code: KeyCode,
    /// Modifier keys held with it.
    pub mods: KeyModifiers,
}

impl From<KeyCode> for KeyPress {
    fn from(code: KeyCode) -> Self {
        Self {
            code,
            mods: KeyModifiers::NONE,
        }
    }
}

impl From<(KeyCode, KeyModifiers)> for KeyPress {
    fn from((code, mods): (KeyCode, KeyModifiers)) -> Self {
        Self { code, mods }
    }
}

/// Help text for a binding: the key label and what it does.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Help {
    /// The key label, e.g. `"←/h"`.
    pub key: String,
    /// The action description, e.g. `"prev page"`.
    pub desc: String,
}

/// A key binding with associated help text.
///
/// Disabled bindings never match and are skipped by help views.
#[derive(Debug, Clone, Default)]
pub struct Binding {
    /// Key presses that trigger this binding.
    pub keys: Vec<KeyPress>,
    /// Help text for this binding.
    pub help: Help,
    /// Whether the binding is currently disabled.
    pub disabled: bool,
}

impl Binding {
    /// Creates a binding from plain key codes with no modifiers.
    pub fn new(keys: Vec<KeyCode>) -> Self {
        Self {
            keys: keys.into_iter().map(KeyPress::from).collect(),
            help: Help::default(),
            disabled: false,
        }
    }

    /// Sets the help text (builder pattern).
    pub fn with_help(mut self, key: impl Into<String>, desc: impl Into<String>) -> Self {
        self.help = Help {
            key: key.into(),
            desc: desc.into(),
        };
        self
    }

    /// Returns true if the given key message triggers this binding.
    pub fn matches(&self, msg: &KeyMsg) -> bool {
        !self.disabled
            && self
                .keys
                .iter()
                .any(|k| k.code == msg.key && k.mods == msg.modifiers)
    }
}

/// An option applied by [`new_binding`].
pub enum BindingOpt {
    /// Adds key presses.
    Keys(Vec<KeyPress>),
    /// Sets help text.
    Help(Help),
    /// Disables the binding.
    Disabled,
}

/// Creates a binding from a list of options.
///
/// # Examples
///
/// ```rust
/// use datatable_widgets::key;
///
/// let b = key::new_binding(vec![
///     key::with_keys_str(&["pgup", "h"]),
///     key::with_help("pgup/h", "prev page"),
/// ]);
/// assert_eq!(b.keys.len(), 2);
/// ```
pub fn new_binding(opts: Vec<BindingOpt>) -> Binding {
    let mut binding = Binding::default();
    for opt in opts {
        match opt {
            BindingOpt::Keys(mut keys) => binding.keys.append(&mut keys),
            BindingOpt::Help(help) => binding.help = help,
            BindingOpt::Disabled => binding.disabled = true,
        }
    }
    binding
}

/// Binding option: key presses parsed from string names.
///
/// Recognizes single characters plus `up`, `down`, `left`, `right`,
/// `pgup`, `pgdown`, `home`, `end`, `enter`, `esc`, `tab`, `space`,
/// and `ctrl+<char>` combinations. Unknown names are ignored.
pub fn with_keys_str(keys: &[&str]) -> BindingOpt {
    BindingOpt::Keys(keys.iter().filter_map(|s| parse_key(s)).collect())
}

/// Binding option: help text.
pub fn with_help(key: &str, desc: &str) -> BindingOpt {
    BindingOpt::Help(Help {
        key: key.to_string(),
        desc: desc.to_string(),
    })
}

/// Binding option: start disabled.
pub fn with_disabled() -> BindingOpt {
    BindingOpt::Disabled
}

fn parse_key(s: &str) -> Option<KeyPress> {
    if let Some(rest) = s.strip_prefix("ctrl+") {
        let mut chars = rest.chars();
        let ch = chars.next()?;
        if chars.next().is_some() {
            return None;
        }
        return Some(KeyPress {
            code: KeyCode::Char(ch),
            mods: KeyModifiers::CONTROL,
        });
    }
    let code = match s {
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "pgup" => KeyCode::PageUp,
        "pgdown" => KeyCode::PageDown,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "enter" => KeyCode::Enter,
        "esc" => KeyCode::Esc,
        "tab" => KeyCode::Tab,
        "space" => KeyCode::Char(' '),
        s => {
            let mut chars = s.chars();
            let ch = chars.next()?;
            if chars.next().is_some() {
                return None;
            }
            KeyCode::Char(ch)
        }
    };
    Some(KeyPress {
        code,
        mods: KeyModifiers::NONE,
    })
}

/// Trait for component keymaps that surface help information.
pub trait KeyMap {
    /// Bindings for the compact help view.
    fn short_help(&self) -> Vec<&Binding>;
    /// Binding columns for the expanded help view.
    fn full_help(&self) -> Vec<Vec<&Binding>>;
}
