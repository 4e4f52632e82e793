//! Core pipeline for loading Redis schema files.
//!
//! This crate turns raw schema text into an ordered, prefix-correct,
//! dependency-sorted command sequence:
//!
//! - [`substitute`] — replaces `${NAME}` template markers with configured
//!   values.
//! - [`find_script`] / [`find_all_scripts`] — extract `SCRIPT:` /
//!   `END_SCRIPT` delimited server-side script blocks.
//! - [`parse`] — produces a [`SchemaFile`] (metadata, commands, scripts)
//!   from schema text.
//! - [`order`] — topologically sorts parsed files by their declared
//!   dependencies, rejecting cycles and missing references.
//! - [`apply_prefix`] — rewrites key-bearing tokens with a namespace
//!   prefix according to per-verb-family rules ([`KeyFamily`]).
//!
//! Execution of the resulting command lists lives in the engine crate;
//! this crate is pure.
//!
//! # Schema file format
//!
//! UTF-8 text. Metadata markers `version: <int>`, `description: <text>`,
//! and `dependencies: <comma-separated names>` (anywhere in the file,
//! typically on `#` comment lines); `#` comments run to end of line;
//! commands terminate with `;` and may span lines; tokens are
//! whitespace-separated with double-quoted spans; `${NAME}` markers are
//! template variables.
//!
//! # Example
//!
//! ```
//! use redis_schema_core::{LoadConfig, apply_prefix, order, parse};
//!
//! let config = LoadConfig::default();
//! let users = parse("SET users:count 0;", "users.schema", &config);
//! let orders = parse("# dependencies: users\nLPUSH orders:log init;", "orders.schema", &config);
//!
//! let sorted = order(vec![orders, users]).unwrap();
//! assert_eq!(sorted[0].name, "users");
//!
//! let cmd = apply_prefix(&sorted[0].commands[0], "app:");
//! assert_eq!(cmd.tokens(), ["SET", "app:users:count", "0"]);
//! ```

mod error;
mod parser;
mod prefix;
mod resolve;
mod script;
mod template;
mod types;

pub use error::{Result, SchemaError};
pub use parser::{extract_metadata, parse};
pub use prefix::{KeyFamily, apply_prefix};
pub use resolve::order;
pub use script::{SCRIPT_END, SCRIPT_TAG, find_all_scripts, find_script};
pub use template::substitute;
pub use types::{
    Command, CommandFailure, DEFAULT_BATCH_SIZE, ExecutionResult, LoadConfig, Metadata,
    SchemaFile, ScriptBlock,
};
