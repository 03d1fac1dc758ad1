//! Keybinding registry. Maps actions to key events with config overrides.
//!
//! Bindings are data, not match arms, so config.toml can remap them and the
//! help overlay can list what is actually bound.
use crossterm::event::{KeyCode, KeyModifiers};
use std::collections::HashMap;

// ============================================================================
// Action Enum
// ============================================================================

/// All user-facing actions that can be triggered by keybindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Quit,
    NavUp,
    NavDown,
    NavLeft,
    NavRight,
    NextPage,
    PrevPage,
    FirstPage,
    LastPage,
    Reload,
    EnterSearch,
    ClearSearch,
    CommitSearch,
    CancelSearch,
    OpenInBrowser,
    OpenPoster,
    CycleTheme,
    ShowHelp,
}

impl Action {
    /// Human-readable description for the help screen.
    pub fn describe(self) -> &'static str {
        match self {
            Self::Quit => "Quit application",
            Self::NavUp => "Select card above",
            Self::NavDown => "Select card below",
            Self::NavLeft => "Select previous card",
            Self::NavRight => "Select next card",
            Self::NextPage => "Next page",
            Self::PrevPage => "Previous page",
            Self::FirstPage => "First page",
            Self::LastPage => "Last page",
            Self::Reload => "Reload current page",
            Self::EnterSearch => "Search movies",
            Self::ClearSearch => "Clear search, back to popular",
            Self::CommitSearch => "Run search",
            Self::CancelSearch => "Stop editing search",
            Self::OpenInBrowser => "Open movie page in browser",
            Self::OpenPoster => "Open poster image in browser",
            Self::CycleTheme => "Cycle theme",
            Self::ShowHelp => "Show help",
        }
    }
}

// ============================================================================
// Context Enum
// ============================================================================

/// Dispatch context. Determines which bindings are active.
///
/// There is no fallback between contexts: while the search box has focus,
/// plain characters must reach the input, not grid actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Context {
    Grid,
    Search,
}

// ============================================================================
// Key Specification
// ============================================================================

/// A key event: code + modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeySpec {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeySpec {
    pub const fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub const fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub const fn char(c: char) -> Self {
        Self::plain(KeyCode::Char(c))
    }

    pub const fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }
}

/// Parse a key string from config into a KeySpec.
///
/// Supported formats:
/// - Single char: "q", "n", "/"
/// - Named keys: "Enter", "Esc", "Tab", "Up", "Down", "Left", "Right",
///   "PageUp", "PageDown", "Home", "End", "Backspace", "Space"
/// - Modifier combos: "Ctrl+n"
/// - Function keys: "F1" through "F12"
fn parse_key_string(s: &str) -> Option<KeySpec> {
    let s = s.trim();

    if let Some(rest) = s.strip_prefix("Ctrl+") {
        let mut chars = rest.trim().chars();
        let c = chars.next()?;
        return chars.next().is_none().then_some(KeySpec::ctrl(c));
    }

    let named = match s.to_lowercase().as_str() {
        "enter" | "return" => Some(KeyCode::Enter),
        "esc" | "escape" => Some(KeyCode::Esc),
        "tab" => Some(KeyCode::Tab),
        "up" => Some(KeyCode::Up),
        "down" => Some(KeyCode::Down),
        "left" => Some(KeyCode::Left),
        "right" => Some(KeyCode::Right),
        "pageup" => Some(KeyCode::PageUp),
        "pagedown" => Some(KeyCode::PageDown),
        "home" => Some(KeyCode::Home),
        "end" => Some(KeyCode::End),
        "backspace" => Some(KeyCode::Backspace),
        "space" => Some(KeyCode::Char(' ')),
        _ => None,
    };
    if let Some(code) = named {
        return Some(KeySpec::plain(code));
    }

    if let Some(n) = s
        .strip_prefix(['F', 'f'])
        .and_then(|rest| rest.parse::<u8>().ok())
    {
        return (1..=12).contains(&n).then_some(KeySpec::plain(KeyCode::F(n)));
    }

    let mut chars = s.chars();
    let c = chars.next()?;
    chars.next().is_none().then_some(KeySpec::char(c))
}

/// Format a KeySpec as a human-readable string for the help screen.
fn format_key(key: &KeySpec) -> String {
    let modifier = if key.modifiers.contains(KeyModifiers::CONTROL) {
        "Ctrl+"
    } else {
        ""
    };

    let key_name = match key.code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::Up => "Up".to_string(),
        KeyCode::Down => "Down".to_string(),
        KeyCode::Left => "Left".to_string(),
        KeyCode::Right => "Right".to_string(),
        KeyCode::PageUp => "PageUp".to_string(),
        KeyCode::PageDown => "PageDown".to_string(),
        KeyCode::Home => "Home".to_string(),
        KeyCode::End => "End".to_string(),
        KeyCode::Backspace => "Backspace".to_string(),
        KeyCode::F(n) => format!("F{}", n),
        _ => "?".to_string(),
    };

    format!("{}{}", modifier, key_name)
}

/// Parse an action name string (from config) into an Action enum.
fn parse_action_name(name: &str) -> Option<Action> {
    match name.to_lowercase().as_str() {
        "quit" => Some(Action::Quit),
        "nav_up" | "up" => Some(Action::NavUp),
        "nav_down" | "down" => Some(Action::NavDown),
        "nav_left" | "left" => Some(Action::NavLeft),
        "nav_right" | "right" => Some(Action::NavRight),
        "next_page" | "nextpage" => Some(Action::NextPage),
        "prev_page" | "prevpage" => Some(Action::PrevPage),
        "first_page" | "firstpage" => Some(Action::FirstPage),
        "last_page" | "lastpage" => Some(Action::LastPage),
        "reload" | "refresh" => Some(Action::Reload),
        "enter_search" | "search" => Some(Action::EnterSearch),
        "clear_search" | "clearsearch" => Some(Action::ClearSearch),
        "commit_search" | "commitsearch" => Some(Action::CommitSearch),
        "cancel_search" | "cancelsearch" => Some(Action::CancelSearch),
        "open_in_browser" | "open" => Some(Action::OpenInBrowser),
        "open_poster" | "poster" => Some(Action::OpenPoster),
        "cycle_theme" | "theme" => Some(Action::CycleTheme),
        "show_help" | "help" => Some(Action::ShowHelp),
        _ => None,
    }
}

// ============================================================================
// Keybinding Registry
// ============================================================================

/// Registry of keybindings, supporting default bindings and config overrides.
pub struct KeybindingRegistry {
    /// Primary lookup: (Context, KeySpec) -> Action
    lookup: HashMap<(Context, KeySpec), Action>,
    /// All bindings in registration order, for the help screen
    bindings: Vec<(Context, KeySpec, Action)>,
}

impl KeybindingRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            lookup: HashMap::new(),
            bindings: Vec::new(),
        };
        registry.register_defaults();
        registry
    }

    fn bind(&mut self, context: Context, key: KeySpec, action: Action) {
        self.lookup.insert((context, key), action);
        self.bindings.push((context, key, action));
    }

    fn register_defaults(&mut self) {
        use Action::*;

        let grid = [
            (KeySpec::char('q'), Quit),
            (KeySpec::char('k'), NavUp),
            (KeySpec::plain(KeyCode::Up), NavUp),
            (KeySpec::char('j'), NavDown),
            (KeySpec::plain(KeyCode::Down), NavDown),
            (KeySpec::char('h'), NavLeft),
            (KeySpec::plain(KeyCode::Left), NavLeft),
            (KeySpec::char('l'), NavRight),
            (KeySpec::plain(KeyCode::Right), NavRight),
            (KeySpec::char('n'), NextPage),
            (KeySpec::plain(KeyCode::PageDown), NextPage),
            (KeySpec::char('p'), PrevPage),
            (KeySpec::plain(KeyCode::PageUp), PrevPage),
            (KeySpec::char('g'), FirstPage),
            (KeySpec::char('G'), LastPage),
            (KeySpec::char('r'), Reload),
            (KeySpec::char('/'), EnterSearch),
            (KeySpec::plain(KeyCode::Esc), ClearSearch),
            (KeySpec::char('o'), OpenInBrowser),
            (KeySpec::plain(KeyCode::Enter), OpenInBrowser),
            (KeySpec::char('v'), OpenPoster),
            (KeySpec::char('t'), CycleTheme),
            (KeySpec::char('?'), ShowHelp),
        ];
        for (key, action) in grid {
            self.bind(Context::Grid, key, action);
        }

        self.bind(Context::Search, KeySpec::plain(KeyCode::Enter), CommitSearch);
        self.bind(Context::Search, KeySpec::plain(KeyCode::Esc), CancelSearch);
    }

    /// Apply user overrides from config keybindings map.
    ///
    /// Keys in the map are action names (e.g., "quit", "next_page").
    /// Values are key strings (e.g., "q", "Ctrl+n", "F5").
    /// The new key replaces every existing binding of the action.
    ///
    /// Returns a list of warnings for unrecognized action names or unparseable keys.
    pub fn apply_overrides(&mut self, overrides: &HashMap<String, String>) -> Vec<String> {
        let mut warnings = Vec::new();

        for (action_name, key_str) in overrides {
            let Some(action) = parse_action_name(action_name) else {
                warnings.push(format!("Unknown action '{}', ignoring", action_name));
                continue;
            };

            let Some(key) = parse_key_string(key_str) else {
                warnings.push(format!(
                    "Cannot parse key '{}' for action '{}', ignoring",
                    key_str, action_name
                ));
                continue;
            };

            let mut contexts: Vec<Context> = Vec::new();
            for (ctx, _, a) in &self.bindings {
                if *a == action && !contexts.contains(ctx) {
                    contexts.push(*ctx);
                }
            }

            self.lookup.retain(|_, a| *a != action);
            self.bindings.retain(|(_, _, a)| *a != action);

            for ctx in contexts {
                self.bind(ctx, key, action);
            }

            tracing::info!(action = %action_name, key = %key_str, "Applied keybinding override");
        }

        warnings
    }

    /// Look up the action for a key in the given context.
    pub fn action_for_key(
        &self,
        code: KeyCode,
        modifiers: KeyModifiers,
        context: Context,
    ) -> Option<Action> {
        // Shifted characters arrive with SHIFT set; the char already encodes it.
        let modifiers = match code {
            KeyCode::Char(_) => modifiers.difference(KeyModifiers::SHIFT),
            _ => modifiers,
        };
        self.lookup
            .get(&(context, KeySpec::new(code, modifiers)))
            .copied()
    }

    /// Get all bindings for the help screen as (context, key string, description).
    pub fn all_bindings(&self) -> Vec<(Context, String, &'static str)> {
        self.bindings
            .iter()
            .map(|(ctx, key, action)| (*ctx, format_key(key), action.describe()))
            .collect()
    }
}

impl Default for KeybindingRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_grid_bindings() {
        let reg = KeybindingRegistry::new();
        let lookup = |c| reg.action_for_key(c, KeyModifiers::NONE, Context::Grid);
        assert_eq!(lookup(KeyCode::Char('q')), Some(Action::Quit));
        assert_eq!(lookup(KeyCode::Char('n')), Some(Action::NextPage));
        assert_eq!(lookup(KeyCode::PageUp), Some(Action::PrevPage));
        assert_eq!(lookup(KeyCode::Char('/')), Some(Action::EnterSearch));
        assert_eq!(lookup(KeyCode::Char('v')), Some(Action::OpenPoster));
        assert_eq!(lookup(KeyCode::Char('x')), None);
    }

    #[test]
    fn test_search_context_does_not_fall_back() {
        let reg = KeybindingRegistry::new();
        assert_eq!(
            reg.action_for_key(KeyCode::Char('q'), KeyModifiers::NONE, Context::Search),
            None
        );
        assert_eq!(
            reg.action_for_key(KeyCode::Enter, KeyModifiers::NONE, Context::Search),
            Some(Action::CommitSearch)
        );
    }

    #[test]
    fn test_shifted_char_matches() {
        let reg = KeybindingRegistry::new();
        assert_eq!(
            reg.action_for_key(KeyCode::Char('G'), KeyModifiers::SHIFT, Context::Grid),
            Some(Action::LastPage)
        );
    }

    #[test]
    fn test_parse_key_string() {
        assert_eq!(parse_key_string("q"), Some(KeySpec::char('q')));
        assert_eq!(parse_key_string("Ctrl+n"), Some(KeySpec::ctrl('n')));
        assert_eq!(
            parse_key_string("pagedown"),
            Some(KeySpec::plain(KeyCode::PageDown))
        );
        assert_eq!(parse_key_string("F5"), Some(KeySpec::plain(KeyCode::F(5))));
        assert_eq!(parse_key_string("F13"), None);
        assert_eq!(parse_key_string("Ctrl+"), None);
        assert_eq!(parse_key_string("nope"), None);
        assert_eq!(parse_key_string("é"), Some(KeySpec::char('é')));
    }

    #[test]
    fn test_override_replaces_all_keys_for_action() {
        let mut reg = KeybindingRegistry::new();
        let overrides = HashMap::from([("next_page".to_string(), "Ctrl+n".to_string())]);

        let warnings = reg.apply_overrides(&overrides);
        assert!(warnings.is_empty());

        assert_eq!(
            reg.action_for_key(KeyCode::Char('n'), KeyModifiers::CONTROL, Context::Grid),
            Some(Action::NextPage)
        );
        assert_eq!(
            reg.action_for_key(KeyCode::Char('n'), KeyModifiers::NONE, Context::Grid),
            None
        );
        assert_eq!(
            reg.action_for_key(KeyCode::PageDown, KeyModifiers::NONE, Context::Grid),
            None
        );
    }

    #[test]
    fn test_override_warnings() {
        let mut reg = KeybindingRegistry::new();
        let overrides = HashMap::from([
            ("launch_rockets".to_string(), "x".to_string()),
            ("quit".to_string(), "Hyper+q".to_string()),
        ]);
        let warnings = reg.apply_overrides(&overrides);
        assert_eq!(warnings.len(), 2);
        assert_eq!(
            reg.action_for_key(KeyCode::Char('q'), KeyModifiers::NONE, Context::Grid),
            Some(Action::Quit)
        );
    }

    #[test]
    fn test_all_bindings_describe_every_grid_action() {
        let reg = KeybindingRegistry::new();
        let bindings = reg.all_bindings();
        assert!(bindings
            .iter()
            .any(|(ctx, key, desc)| *ctx == Context::Grid && key == "?" && *desc == "Show help"));
        assert!(bindings
            .iter()
            .any(|(ctx, key, _)| *ctx == Context::Search && key == "Esc"));
    }
}
