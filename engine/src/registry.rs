//! Execution-time registry of extracted script blocks.
//!
//! The loader registers every file's scripts in dependency order. Names
//! are not globally unique across files: a later registration under the
//! same name overwrites the earlier one. That is declared behavior, logged
//! at `warn` level, not an error.

use std::collections::HashMap;

use sha2::{Digest, Sha256};

use redis_schema_core::ScriptBlock;

/// A registered script with its body digest.
#[derive(Debug, Clone)]
pub struct ScriptEntry {
    /// The extracted block.
    pub script: ScriptBlock,
    /// Lowercase hex SHA-256 of the body, for digest-based invocation.
    pub digest: String,
}

/// Insertion-ordered name → script map.
///
/// # Examples
///
/// ```
/// use redis_schema_core::ScriptBlock;
/// use redis_schema_engine::ScriptRegistry;
///
/// let mut registry = ScriptRegistry::new();
/// registry.register(ScriptBlock {
///     name: "touch".into(),
///     body: "return 1".into(),
///     source: "base.schema".into(),
/// });
///
/// let entry = registry.get("touch").unwrap();
/// assert_eq!(entry.script.source, "base.schema");
/// assert_eq!(entry.digest.len(), 64);
/// ```
#[derive(Debug, Default)]
pub struct ScriptRegistry {
    entries: Vec<ScriptEntry>,
    by_name: HashMap<String, usize>,
}

impl ScriptRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a script, overwriting any existing entry with the same
    /// name. The overwritten entry keeps its original position.
    pub fn register(&mut self, script: ScriptBlock) {
        let digest = body_digest(&script.body);
        match self.by_name.get(&script.name) {
            Some(&slot) => {
                tracing::warn!(
                    name = script.name.as_str(),
                    previous = self.entries[slot].script.source.as_str(),
                    replacement = script.source.as_str(),
                    "script name collision, overwriting earlier registration"
                );
                self.entries[slot] = ScriptEntry { script, digest };
            }
            None => {
                self.by_name.insert(script.name.clone(), self.entries.len());
                self.entries.push(ScriptEntry { script, digest });
            }
        }
    }

    /// Registers every script in `scripts`, in order.
    pub fn register_all(&mut self, scripts: impl IntoIterator<Item = ScriptBlock>) {
        for script in scripts {
            self.register(script);
        }
    }

    /// Looks up a script by name.
    pub fn get(&self, name: &str) -> Option<&ScriptEntry> {
        self.by_name.get(name).map(|&slot| &self.entries[slot])
    }

    /// Looks up a script by its body digest (lowercase hex SHA-256).
    pub fn find_by_digest(&self, digest: &str) -> Option<&ScriptEntry> {
        self.entries.iter().find(|e| e.digest == digest)
    }

    /// Entries in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &ScriptEntry> {
        self.entries.iter()
    }

    /// Number of registered scripts.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when no scripts are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn body_digest(body: &str) -> String {
    let digest = Sha256::digest(body.as_bytes());
    digest.iter().map(|b| format!("{b:02x}")).collect()
}
