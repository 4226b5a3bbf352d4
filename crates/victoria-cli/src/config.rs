use victoria_diagnostics::JokePolicy;

pub const DEFAULT_MAX_CALL_DEPTH: usize = 1000;

/// Knobs for one interpreter run.
#[derive(Debug, Clone)]
pub struct InterpreterConfig {
    /// Nested user-function calls allowed before E0040.
    pub max_call_depth: usize,
    pub jokes: JokePolicy,
    pub color: bool,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            jokes: JokePolicy::default(),
            color: true,
        }
    }
}

impl InterpreterConfig {
    /// Deterministic settings for tests: no jokes, no color.
    pub fn quiet() -> Self {
        Self {
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            jokes: JokePolicy::Off,
            color: false,
        }
    }

    /// Defaults overridden by `VICTORIA_MAX_CALL_DEPTH`, `VICTORIA_JOKES`
    /// and `NO_COLOR`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(raw) = lookup("VICTORIA_MAX_CALL_DEPTH") {
            match raw.trim().parse::<usize>() {
                Ok(depth) if depth > 0 => config.max_call_depth = depth,
                _ => tracing::warn!(value = %raw, "ignoring invalid VICTORIA_MAX_CALL_DEPTH"),
            }
        }
        if let Some(raw) = lookup("VICTORIA_JOKES") {
            if matches!(raw.trim().to_ascii_lowercase().as_str(), "off" | "0" | "false") {
                config.jokes = JokePolicy::Off;
            }
        }
        if lookup("NO_COLOR").is_some() {
            config.color = false;
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_with(vars: &[(&str, &str)]) -> InterpreterConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        InterpreterConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = config_with(&[]);
        assert_eq!(config.max_call_depth, 1000);
        assert!(config.color);
        assert!(!matches!(config.jokes, JokePolicy::Off));
    }

    #[test]
    fn environment_overrides() {
        let config = config_with(&[
            ("VICTORIA_MAX_CALL_DEPTH", "250"),
            ("VICTORIA_JOKES", "off"),
            ("NO_COLOR", ""),
        ]);
        assert_eq!(config.max_call_depth, 250);
        assert!(matches!(config.jokes, JokePolicy::Off));
        assert!(!config.color);
    }

    #[test]
    fn invalid_depth_is_ignored() {
        assert_eq!(config_with(&[("VICTORIA_MAX_CALL_DEPTH", "0")]).max_call_depth, 1000);
        assert_eq!(config_with(&[("VICTORIA_MAX_CALL_DEPTH", "lots")]).max_call_depth, 1000);
    }
}
