//! Named emphasis styles for terminal output.
//!
//! Each style maps to a fixed pair of ANSI codes. Nothing here is mutable;
//! whether codes are emitted at all is decided once per run through
//! [`Styler`].

const RESET: &str = "\x1b[0m";

/// Presentational emphasis applied to parts of the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emphasis {
    /// Load balancer header (bold blue)
    Header,
    /// Pool line (green)
    Pool,
    /// Member pictograph (bold)
    Marker,
    /// Informational leaves such as "No pools" (blue)
    Info,
    /// Provisioning status that is not ACTIVE (bold yellow)
    Warning,
    /// Operating status that is not ONLINE (red)
    Critical,
    /// Inline fetch errors (red)
    Error,
}

impl Emphasis {
    /// Opening and closing escape sequences for this style.
    pub fn codes(self) -> (&'static str, &'static str) {
        match self {
            Emphasis::Header => ("\x1b[1m\x1b[94m", RESET),
            Emphasis::Pool => ("\x1b[92m", RESET),
            Emphasis::Marker => ("\x1b[1m", RESET),
            Emphasis::Info => ("\x1b[94m", RESET),
            Emphasis::Warning => ("\x1b[93m\x1b[1m", RESET),
            Emphasis::Critical | Emphasis::Error => ("\x1b[91m", RESET),
        }
    }
}

/// Applies [`Emphasis`] styles, or passes text through untouched when
/// color output is disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Styler {
    enabled: bool,
}

impl Styler {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Styler that always emits ANSI codes
    pub fn ansi() -> Self {
        Self::new(true)
    }

    /// Styler that never emits ANSI codes
    pub fn plain() -> Self {
        Self::new(false)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn paint(&self, emphasis: Emphasis, text: &str) -> String {
        if !self.enabled {
            return text.to_string();
        }
        let (open, close) = emphasis.codes();
        format!("{}{}{}", open, text, close)
    }
}

impl Default for Styler {
    fn default() -> Self {
        Self::ansi()
    }
}
