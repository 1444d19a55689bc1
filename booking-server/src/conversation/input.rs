//! Free-text input classification

/// Commands that restart the conversation from any state
const RESET_COMMANDS: [&str; 2] = ["olá", "menu"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// "olá" / "menu", case-insensitive
    Reset,
    /// A menu index; `0` means back/exit
    Choice(usize),
    /// Anything else, trimmed
    Text(String),
}

impl Input {
    pub fn parse(raw: &str) -> Self {
        let text = raw.trim();
        let lowered = text.to_lowercase();
        if RESET_COMMANDS.contains(&lowered.as_str()) {
            return Self::Reset;
        }
        if !text.is_empty()
            && text.chars().all(|c| c.is_ascii_digit())
            && let Ok(n) = text.parse::<usize>()
        {
            return Self::Choice(n);
        }
        Self::Text(text.to_string())
    }

    /// `Some(i)` for a 1-based choice within `len` entries, as a 0-based index
    pub fn index_within(&self, len: usize) -> Option<usize> {
        match self {
            Self::Choice(n) if *n >= 1 && *n <= len => Some(n - 1),
            _ => None,
        }
    }

    pub fn is_back(&self) -> bool {
        matches!(self, Self::Choice(0))
    }
}
