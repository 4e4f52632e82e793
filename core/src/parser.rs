//! Schema file parsing.
//!
//! Turns raw schema text into a [`SchemaFile`]: metadata markers are
//! scanned first, template variables are substituted, comments stripped,
//! script blocks skipped, and the remaining text accumulated into
//! `;`-terminated commands tokenized with double-quote awareness.
//!
//! Parsing never aborts a load: any internal error degrades the file to
//! default metadata and an empty command list, logged at `warn` level.
//! Callers are expected to notice an implausibly empty result.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::SchemaError;
use crate::script::{SCRIPT_TAG, find_all_scripts, find_script};
use crate::template::substitute;
use crate::types::{Command, LoadConfig, Metadata, SchemaFile};

/// Compiled metadata marker patterns (see the schema file format notes in
/// the crate docs). Independent scans; the first match of each wins.
struct MetadataPatterns {
    version: Regex,
    description: Regex,
    dependencies: Regex,
}

static PATTERNS: LazyLock<MetadataPatterns> = LazyLock::new(|| MetadataPatterns {
    version: Regex::new(r"(?m)version:\s*(\d+)").expect("static regex must compile"),
    description: Regex::new(r"(?m)description:\s*(.*)").expect("static regex must compile"),
    dependencies: Regex::new(r"(?m)dependencies:\s*(.*)").expect("static regex must compile"),
});

/// Parses schema text into a [`SchemaFile`].
///
/// `source_name` identifies the file for diagnostics; the schema's base
/// name (dependency key) is derived from it. `config` supplies the
/// template variables and the strict-script-block setting; the rest of the
/// configuration is not consulted here.
///
/// Parse failures are contained: the returned file carries default
/// metadata and no commands, and the failure is logged. Script blocks are
/// collected by the independent batch scan either way.
///
/// # Examples
///
/// ```
/// use redis_schema_core::{LoadConfig, parse};
///
/// let text = "# version: 2\nSET key1 \"value1\";\n";
/// let file = parse(text, "demo.schema", &LoadConfig::default());
/// assert_eq!(file.name, "demo");
/// assert_eq!(file.metadata.version, 2);
/// assert_eq!(file.commands.len(), 1);
/// ```
pub fn parse(content: &str, source_name: &str, config: &LoadConfig) -> SchemaFile {
    let name = SchemaFile::base_name(source_name);
    let metadata = extract_metadata(content);
    let substituted = substitute(content, &config.variables);
    let scripts = find_all_scripts(&substituted, source_name);

    match parse_commands(&substituted, source_name, config) {
        Ok(commands) => SchemaFile {
            name,
            source: source_name.to_string(),
            metadata,
            commands,
            scripts,
        },
        Err(err) => {
            tracing::warn!(source = source_name, error = %err, "schema parse failed, file degraded to empty");
            SchemaFile {
                name,
                source: source_name.to_string(),
                metadata: Metadata::default(),
                commands: Vec::new(),
                scripts,
            }
        }
    }
}

fn parse_commands(
    content: &str,
    source_name: &str,
    config: &LoadConfig,
) -> Result<Vec<Command>, SchemaError> {
    let lines: Vec<&str> = content.lines().collect();

    let mut commands = Vec::new();
    let mut buffer = String::new();
    let mut i = 0;
    while i < lines.len() {
        let line = lines[i];

        if line.trim().starts_with(SCRIPT_TAG) {
            match find_script(&lines, i, source_name) {
                Some((_, end)) => {
                    i = end + 1;
                    continue;
                }
                None if config.strict_scripts => {
                    return Err(SchemaError::Parse {
                        source_name: source_name.to_string(),
                        message: format!("malformed script block at line {}", i + 1),
                    });
                }
                // Malformed block, lenient mode: the line re-enters the
                // command stream as ordinary text.
                None => {}
            }
        }

        let stripped = strip_comment(line);
        let stripped = stripped.trim();
        if !stripped.is_empty() {
            if !buffer.is_empty() {
                buffer.push(' ');
            }
            buffer.push_str(stripped);

            if buffer.ends_with(';') {
                let statement = buffer[..buffer.len() - 1].to_string();
                let tokens = tokenize(&statement, source_name)?;
                if let Some(cmd) = Command::new(tokens) {
                    commands.push(cmd);
                }
                buffer.clear();
            }
        }
        i += 1;
    }

    if !buffer.is_empty() {
        tracing::warn!(
            source = source_name,
            text = buffer.as_str(),
            "trailing text without ';' terminator discarded"
        );
    }

    Ok(commands)
}

/// Scans raw content for the metadata markers, applying defaults for
/// anything absent or malformed. Runs before template substitution and
/// before comment stripping, so markers typically live on comment lines.
pub fn extract_metadata(content: &str) -> Metadata {
    let version = PATTERNS
        .version
        .captures(content)
        .and_then(|c| c[1].parse::<u32>().ok())
        .filter(|v| *v >= 1)
        .unwrap_or(1);

    let description = PATTERNS
        .description
        .captures(content)
        .map(|c| c[1].trim().to_string())
        .unwrap_or_default();

    let dependencies = PATTERNS
        .dependencies
        .captures(content)
        .map(|c| {
            c[1].split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default();

    Metadata {
        version,
        description,
        dependencies,
    }
}

/// Removes everything from the first unescaped `#` to end of line.
/// `\#` is unescaped to a literal `#` and does not start a comment.
fn strip_comment(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut prev_backslash = false;
    for ch in line.chars() {
        if ch == '#' {
            if prev_backslash {
                out.pop();
                out.push('#');
                prev_backslash = false;
                continue;
            }
            break;
        }
        prev_backslash = ch == '\\';
        out.push(ch);
    }
    out
}

/// Splits a statement into tokens: whitespace-separated outside
/// double-quoted spans. A quote toggles quote state unless preceded by a
/// backslash (which escapes it into a literal quote); surrounding quotes
/// are stripped from the token.
fn tokenize(statement: &str, source_name: &str) -> Result<Vec<String>, SchemaError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut prev_backslash = false;

    for ch in statement.chars() {
        match ch {
            '"' => {
                if prev_backslash {
                    current.pop();
                    current.push('"');
                } else {
                    in_quotes = !in_quotes;
                }
            }
            c if c.is_whitespace() && !in_quotes => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
        prev_backslash = ch == '\\' && !prev_backslash;
    }

    if in_quotes {
        return Err(SchemaError::Parse {
            source_name: source_name.to_string(),
            message: format!("unterminated quote in statement: {statement}"),
        });
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    Ok(tokens)
}
