//! Output platform conventions

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Linux,
    MacOs,
}

impl Target {
    /// Platform the compiler itself was built for
    pub fn host() -> Self {
        if cfg!(target_os = "macos") {
            Target::MacOs
        } else {
            Target::Linux
        }
    }

    /// Assembly-level name of a C symbol
    pub fn symbol(self, name: &str) -> String {
        match self {
            Target::Linux => name.to_string(),
            Target::MacOs => format!("_{name}"),
        }
    }

    /// Section marking the stack non-executable, where the linker expects one
    pub fn stack_note_section(self) -> Option<&'static str> {
        match self {
            Target::Linux => Some(".note.GNU-stack,\"\",@progbits"),
            Target::MacOs => None,
        }
    }
}

impl Default for Target {
    fn default() -> Self {
        Self::host()
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Linux => write!(f, "linux"),
            Target::MacOs => write!(f, "macos"),
        }
    }
}

impl FromStr for Target {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "linux" => Ok(Target::Linux),
            "macos" | "darwin" => Ok(Target::MacOs),
            other => Err(format!("unknown target '{other}' (expected linux or macos)")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_prefix() {
        assert_eq!(Target::Linux.symbol("main"), "main");
        assert_eq!(Target::MacOs.symbol("main"), "_main");
    }

    #[test]
    fn test_stack_note() {
        assert_eq!(Target::Linux.stack_note_section(), Some(".note.GNU-stack,\"\",@progbits"));
        assert_eq!(Target::MacOs.stack_note_section(), None);
    }

    #[test]
    fn test_parse() {
        assert_eq!("Linux".parse::<Target>(), Ok(Target::Linux));
        assert_eq!("darwin".parse::<Target>(), Ok(Target::MacOs));
        assert!("windows".parse::<Target>().is_err());
    }
}
