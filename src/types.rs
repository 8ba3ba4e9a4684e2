use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// Rendering mode handed to the compiler.
///
/// - `Compact`: minified, single-line output (default).
/// - `Expanded`: human-readable, indented output, mostly for debugging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputStyle {
    Compact,
    Expanded,
}

impl Default for OutputStyle {
    fn default() -> Self {
        OutputStyle::Compact
    }
}

impl FromStr for OutputStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "compact" | "compressed" => Ok(OutputStyle::Compact),
            "expanded" => Ok(OutputStyle::Expanded),
            other => Err(format!(
                "invalid style: {other} (expected \"compact\" or \"expanded\")"
            )),
        }
    }
}

impl fmt::Display for OutputStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputStyle::Compact => f.write_str("compact"),
            OutputStyle::Expanded => f.write_str("expanded"),
        }
    }
}

/// How deep the staleness check looks into each registered folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanMode {
    /// Immediate children only. Nested folders are never inspected.
    Shallow,
    /// Walk nested folders as well.
    Recursive,
}

impl Default for ScanMode {
    fn default() -> Self {
        ScanMode::Shallow
    }
}

/// Result of a `build` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildOutcome {
    /// The output (and possibly its sourcemap) was rewritten.
    Built,
    /// Nothing was stale; the output file was left untouched.
    UpToDate,
}
