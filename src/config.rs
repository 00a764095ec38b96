use crate::parse_env;

/// switches of the semantic analysis, read from the environment and overridden by cli flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SemantConfig {
    /// program has to define class Main with method main()
    pub require_main: bool,
    /// print progress of the analysis
    pub debug: bool,
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

impl SemantConfig {
    pub fn from_env() -> Self {
        Self {
            require_main: parse_flag(&parse_env("COOL_REQUIRE_MAIN", "0")),
            debug: parse_flag(&parse_env("COOL_SEMANT_DEBUG", "0")),
        }
    }

    pub fn with_require_main(mut self, require_main: bool) -> Self {
        self.require_main = require_main;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}
