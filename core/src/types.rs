//! Data model for parsed schema files and load results.
//!
//! These types are produced by the parser and consumed by the dependency
//! resolver, the prefix rewriter, and the execution engine. They are
//! serde-derived so parse results and execution reports can round-trip
//! through JSON.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Default number of commands submitted per pipelined batch.
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// A single store command: an ordered, non-empty token sequence.
///
/// The first token is the command verb. Verbs are matched
/// case-insensitively; every token is a literal value needing no further
/// parsing downstream.
///
/// # Examples
///
/// ```
/// use redis_schema_core::Command;
///
/// let cmd = Command::new(vec!["set".into(), "user:1".into(), "alice".into()]).unwrap();
/// assert_eq!(cmd.verb(), "SET");
/// assert_eq!(cmd.tokens().len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    tokens: Vec<String>,
}

impl Command {
    /// Creates a command from tokens. Returns `None` for an empty token list.
    pub fn new(tokens: Vec<String>) -> Option<Self> {
        if tokens.is_empty() {
            None
        } else {
            Some(Self { tokens })
        }
    }

    /// The command verb (first token), normalized to upper case.
    pub fn verb(&self) -> String {
        self.tokens[0].to_uppercase()
    }

    /// All tokens, verb included.
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// The tokens after the verb.
    pub fn args(&self) -> &[String] {
        &self.tokens[1..]
    }

    /// Consumes the command, returning its tokens.
    pub fn into_tokens(self) -> Vec<String> {
        self.tokens
    }

    /// Renders the command as a single line, quoting tokens that contain
    /// whitespace.
    ///
    /// # Examples
    ///
    /// ```
    /// use redis_schema_core::Command;
    ///
    /// let cmd = Command::new(vec!["SET".into(), "k".into(), "two words".into()]).unwrap();
    /// assert_eq!(cmd.display_line(), "SET k \"two words\"");
    /// ```
    pub fn display_line(&self) -> String {
        self.tokens
            .iter()
            .map(|t| {
                if t.chars().any(char::is_whitespace) {
                    format!("\"{t}\"")
                } else {
                    t.clone()
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Metadata declared at the top of a schema file.
///
/// All fields have defaults, so a file with no metadata markers parses to
/// `version: 1`, empty description, no dependencies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    /// Schema format version (>= 1).
    pub version: u32,
    /// Free-text description.
    pub description: String,
    /// Base names of schema files this file depends on, in declaration order.
    pub dependencies: Vec<String>,
}

impl Default for Metadata {
    fn default() -> Self {
        Self {
            version: 1,
            description: String::new(),
            dependencies: Vec::new(),
        }
    }
}

/// A named server-side script extracted out of the command stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptBlock {
    /// Script name as declared after the `SCRIPT:` tag.
    pub name: String,
    /// Verbatim script source between the block markers.
    pub body: String,
    /// Identifier of the file the block came from.
    pub source: String,
}

/// A parsed schema file: metadata, commands, and script blocks.
///
/// Created once per load by [`parse`](crate::parse) and immutable
/// thereafter. The `name` (base name of the source) keys dependency
/// resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaFile {
    /// Base name (source file stem) used in `dependencies:` declarations.
    pub name: String,
    /// Full source identifier (path or label) for diagnostics.
    pub source: String,
    /// Declared metadata with defaults applied.
    pub metadata: Metadata,
    /// Commands in declaration order.
    pub commands: Vec<Command>,
    /// Script blocks in declaration order.
    pub scripts: Vec<ScriptBlock>,
}

impl SchemaFile {
    /// Derives the base name from a source identifier: the final path
    /// segment with any extension removed.
    ///
    /// # Examples
    ///
    /// ```
    /// use redis_schema_core::SchemaFile;
    ///
    /// assert_eq!(SchemaFile::base_name("schemas/users.schema"), "users");
    /// assert_eq!(SchemaFile::base_name("orders"), "orders");
    /// ```
    pub fn base_name(source: &str) -> String {
        let segment = source
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(source);
        match segment.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem.to_string(),
            _ => segment.to_string(),
        }
    }
}

/// One failed command inside an execution result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandFailure {
    /// Zero-based position of the command in the file's parsed sequence.
    pub index: usize,
    /// The command as a display line.
    pub command: String,
    /// Error text reported by the collaborator.
    pub error: String,
}

/// Outcome of executing one file's command list.
///
/// Distinguishes "nothing was attempted" (dry run reports only
/// `commands_planned`), "atomically rejected" (transaction mode,
/// `commands_executed` stays 0), and "partially applied" (pipeline mode
/// with some failed batches).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Whether every submitted command succeeded.
    pub succeeded: bool,
    /// Commands actually executed against the store.
    pub commands_executed: usize,
    /// Commands that would run (dry-run reporting).
    pub commands_planned: usize,
    /// Total failed commands.
    pub error_count: usize,
    /// One entry per failed command, in submission order.
    pub errors: Vec<CommandFailure>,
}

impl ExecutionResult {
    /// A successful empty result (zero commands).
    pub fn empty() -> Self {
        Self {
            succeeded: true,
            ..Default::default()
        }
    }
}

/// Caller-supplied configuration for one load invocation.
///
/// Read-only for the duration of a load. `variables` feed the template
/// substitutor at parse time; `prefix` feeds the key rewriter at execute
/// time.
///
/// # Examples
///
/// ```
/// use redis_schema_core::LoadConfig;
///
/// let config = LoadConfig::default();
/// assert_eq!(config.batch_size, 100);
/// assert!(!config.use_transactions);
/// assert!(config.prefix.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadConfig {
    /// Namespace prefix applied to every key-bearing token.
    pub prefix: Option<String>,
    /// Template variables substituted into `${NAME}` markers.
    pub variables: BTreeMap<String, String>,
    /// Commands per pipelined batch.
    pub batch_size: usize,
    /// Submit each file as one atomic transaction instead of pipelining.
    pub use_transactions: bool,
    /// Report what would run without touching the store.
    pub dry_run: bool,
    /// Treat a `SCRIPT:` block with no terminator as a parse failure
    /// instead of falling back to ordinary command text.
    pub strict_scripts: bool,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            prefix: None,
            variables: BTreeMap::new(),
            batch_size: DEFAULT_BATCH_SIZE,
            use_transactions: false,
            dry_run: false,
            strict_scripts: false,
        }
    }
}

impl LoadConfig {
    /// The prefix as a `&str`, empty when unset.
    pub fn prefix_str(&self) -> &str {
        self.prefix.as_deref().unwrap_or("")
    }
}
