//! Lowering configuration.

use std::fmt;
use std::str::FromStr;

use vela_diagnostic::DiagnosticConfig;

/// Name of the runtime namespace object unless configured otherwise.
pub const DEFAULT_RUNTIME: &str = "_vela";

/// `Module.Class.Method` to invoke after the program is loaded.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EntryPoint {
    pub module: String,
    pub class: String,
    pub method: String,
}

impl fmt::Display for EntryPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.module, self.class, self.method)
    }
}

/// Parse error for [`EntryPoint`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("entry point `{0}` is not of the form `Module.Class.Method`")]
pub struct EntryPointParseError(pub String);

impl FromStr for EntryPoint {
    type Err = EntryPointParseError;

    /// The module part may itself contain dots; the last two segments are
    /// the class and the method.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || EntryPointParseError(s.to_string());
        let (rest, method) = s.rsplit_once('.').ok_or_else(err)?;
        let (module, class) = rest.rsplit_once('.').ok_or_else(err)?;
        if module.is_empty() || class.is_empty() || method.is_empty() {
            return Err(err());
        }
        Ok(EntryPoint {
            module: module.to_string(),
            class: class.to_string(),
            method: method.to_string(),
        })
    }
}

/// Immutable options threaded through every lowering entry point.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodegenOptions {
    /// Identifier of the runtime namespace (`_vela` by default).
    pub runtime: String,
    /// Explicit entry point. When absent, a unique static `Main()` in a
    /// module's default class is used if there is one.
    pub entry_point: Option<EntryPoint>,
    /// Emit JSDoc `@param`/`@returns` comments on members.
    pub annotate_types: bool,
    pub diagnostics: DiagnosticConfig,
}

impl Default for CodegenOptions {
    fn default() -> Self {
        CodegenOptions {
            runtime: DEFAULT_RUNTIME.to_string(),
            entry_point: None,
            annotate_types: false,
            diagnostics: DiagnosticConfig::default(),
        }
    }
}

impl CodegenOptions {
    #[must_use]
    pub fn with_entry_point(mut self, entry: EntryPoint) -> Self {
        self.entry_point = Some(entry);
        self
    }

    #[must_use]
    pub fn with_type_annotations(mut self, on: bool) -> Self {
        self.annotate_types = on;
        self
    }

    #[must_use]
    pub fn with_runtime(mut self, runtime: impl Into<String>) -> Self {
        self.runtime = runtime.into();
        self
    }
}

#[cfg(test)]
mod tests;
