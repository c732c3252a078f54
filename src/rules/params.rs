//! src/rules/params.rs
//!
//! Parameter tables for the shipped rule definitions
//!
//! Everything that varies between setups lives here as data: the hyper
//! chord, the ortholinear board's identity, the app-launcher roster, the
//! docs-browser pattern, and the window-manager backend. The rule
//! construction routines in `rules` consume these tables and never
//! hard-code a variant.

use crate::core::types::ModifierFlag;

/// The hyper chord emulated from caps_lock: all four right-hand
/// modifiers, a combination nothing else uses.
pub const HYPER: [ModifierFlag; 4] = [
    ModifierFlag::RightShift,
    ModifierFlag::RightCommand,
    ModifierFlag::RightOption,
    ModifierFlag::RightControl,
];

/// Left-hand equivalent used by macOS diagnostic shortcuts.
pub const SYS_HYPER: [ModifierFlag; 4] = [
    ModifierFlag::LeftCommand,
    ModifierFlag::LeftOption,
    ModifierFlag::LeftShift,
    ModifierFlag::LeftControl,
];

/// App-launcher roster: key under the launcher chord → application name.
pub const LAUNCHER_ROSTER: &[(&str, &str)] = &[
    ("q", "Spotify"),
    ("w", "Finder"),
    ("e", "WezTerm"),
    ("r", "Linear"),
    ("t", "Front"),
    ("a", "Microsoft Teams (work or school)"),
    ("s", "Logseq"),
    ("d", "Dash"),
    ("f", "Figma"),
    ("x", "TypingMind"),
    ("c", "Arc"),
    ("v", "Neovide"),
];

/// Direction argument for window-move commands.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Direction {
    Left,
    Down,
    Up,
    Right,
}

/// External window-manager backend.
///
/// The run-command rule tables are backend-independent; they ask the
/// backend for command strings. Each variant carries the program path so
/// non-default install locations stay a one-field change.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum WmBackend {
    Aerospace { program: String },
    Yabai { program: String },
}

impl WmBackend {
    /// AeroSpace at its Homebrew location.
    pub fn aerospace() -> Self {
        WmBackend::Aerospace {
            program: "/opt/homebrew/bin/aerospace".to_string(),
        }
    }

    /// yabai at its Homebrew location.
    pub fn yabai() -> Self {
        WmBackend::Yabai {
            program: "/opt/homebrew/bin/yabai".to_string(),
        }
    }

    /// Replaces the program path, keeping the backend kind.
    pub fn with_program(self, program: impl Into<String>) -> Self {
        match self {
            WmBackend::Aerospace { .. } => WmBackend::Aerospace {
                program: program.into(),
            },
            WmBackend::Yabai { .. } => WmBackend::Yabai {
                program: program.into(),
            },
        }
    }

    fn program(&self) -> &str {
        match self {
            WmBackend::Aerospace { program } | WmBackend::Yabai { program } => program,
        }
    }

    /// Toggle fullscreen on the focused window.
    pub fn fullscreen(&self) -> String {
        match self {
            WmBackend::Aerospace { program } => format!("{} fullscreen", program),
            WmBackend::Yabai { program } => {
                format!("{} -m window --toggle zoom-fullscreen", program)
            }
        }
    }

    /// Force tiling, then fullscreen the focused window.
    pub fn maximize(&self) -> String {
        match self {
            WmBackend::Aerospace { program } => {
                format!("{} layout tiling | {} fullscreen", program, program)
            }
            WmBackend::Yabai { .. } => self.fullscreen(),
        }
    }

    /// Focus a workspace; `target` is a workspace number, `prev`, or `next`.
    pub fn focus_workspace(&self, target: &str) -> String {
        match self {
            WmBackend::Aerospace { program } => format!("{} workspace {}", program, target),
            WmBackend::Yabai { program } => format!("{} -m space --focus {}", program, target),
        }
    }

    /// Move the focused window within its workspace.
    pub fn move_window(&self, direction: Direction) -> String {
        match self {
            WmBackend::Aerospace { program } => {
                let dir = match direction {
                    Direction::Left => "left",
                    Direction::Down => "down",
                    Direction::Up => "up",
                    Direction::Right => "right",
                };
                format!("{} layout tiling | {} move {}", program, program, dir)
            }
            WmBackend::Yabai { program } => {
                let dir = match direction {
                    Direction::Left => "west",
                    Direction::Down => "south",
                    Direction::Up => "north",
                    Direction::Right => "east",
                };
                format!("{} -m window --swap {}", program, dir)
            }
        }
    }

    /// Move the focused window to another workspace and follow it.
    pub fn move_to_workspace(&self, target: &str) -> String {
        match self {
            WmBackend::Aerospace { program } => format!(
                "{} move-node-to-workspace {} | {} workspace {}",
                program, target, program, target
            ),
            WmBackend::Yabai { program } => format!(
                "{} -m window --space {} && {} -m space --focus {}",
                program, target, program, target
            ),
        }
    }

    /// Grow or shrink the focused window by `delta` pixels.
    pub fn resize(&self, delta: i32) -> String {
        match self {
            WmBackend::Aerospace { program } => format!("{} resize smart {:+}", program, delta),
            WmBackend::Yabai { program } => {
                format!("{} -m window --resize right:{}:0", program, delta)
            }
        }
    }

    /// Flatten the layout back to an even split.
    pub fn reset_layout(&self) -> String {
        match self {
            WmBackend::Aerospace { program } => format!(
                "{} flatten-workspace-tree | {} balance-sizes",
                program, program
            ),
            WmBackend::Yabai { program } => format!("{} -m space --balance", program),
        }
    }

    /// Float the focused window.
    pub fn float(&self) -> String {
        match self {
            WmBackend::Aerospace { program } => format!("{} layout floating", program),
            WmBackend::Yabai { program } => format!("{} -m window --toggle float", program),
        }
    }
}

/// Everything `build_profile` needs to produce one configuration.
///
/// The defaults reproduce the author setup: a ZSA Voyager as the ortho
/// board (its firmware already carries the navigation layers, so those
/// rules are scoped away from it) and AeroSpace as the window manager.
#[derive(Clone, Debug)]
pub struct ProfileParams {
    /// Daemon profile receiving the compiled rules
    pub profile_name: String,
    /// Vendor/product identity of the ortho board
    pub ortho_board: (u32, u32),
    /// Window-manager backend for run-command rules
    pub wm: WmBackend,
    /// Bundle-identifier pattern of the docs browser with its own paging rule
    pub docs_app_pattern: String,
    /// App-launcher roster shared by both launcher variants
    pub launchers: Vec<(&'static str, &'static str)>,
    /// Roster keys deliberately absent from the ortho launcher variant
    /// (acknowledged in coverage analysis rather than flagged)
    pub ortho_launcher_omits: Vec<&'static str>,
}

impl Default for ProfileParams {
    fn default() -> Self {
        Self {
            profile_name: "Default".to_string(),
            ortho_board: (12951, 6519),
            wm: WmBackend::aerospace(),
            docs_app_pattern: "^com\\.kapeli\\.dash-setapp$".to_string(),
            launchers: LAUNCHER_ROSTER.to_vec(),
            // Dash stays reachable on the ortho board through its own
            // docs-paging rule, so the launcher omission is deliberate
            ortho_launcher_omits: vec!["d"],
        }
    }
}
