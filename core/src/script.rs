//! Embedded script block extraction.
//!
//! Schema files may carry named server-side scripts delimited by
//! `SCRIPT: <name>` and `END_SCRIPT` lines. Extraction is independent of
//! command parsing: the parser only uses it to skip block extents, while
//! [`find_all_scripts`] collects every block in a file for the script
//! registry.

use crate::types::ScriptBlock;

/// Opening tag of a script block, followed by the script name.
pub const SCRIPT_TAG: &str = "SCRIPT:";
/// Terminator line of a script block (exact match after trimming).
pub const SCRIPT_END: &str = "END_SCRIPT";

/// Attempts to extract a script block starting at `lines[start]`.
///
/// The start line must begin (after trimming) with [`SCRIPT_TAG`] and
/// declare a non-empty name. The block ends at the first subsequent line
/// that trims to exactly [`SCRIPT_END`]; the body is the verbatim
/// newline-joined text strictly between the two markers. Returns the block
/// together with the terminator's line index, or `None` when the start
/// line is not a valid opener or no terminator exists before end of input.
///
/// # Examples
///
/// ```
/// use redis_schema_core::find_script;
///
/// let lines = vec!["SCRIPT: incr_all", "return 1", "END_SCRIPT"];
/// let (block, end) = find_script(&lines, 0, "demo.schema").unwrap();
/// assert_eq!(block.name, "incr_all");
/// assert_eq!(block.body, "return 1");
/// assert_eq!(end, 2);
/// ```
pub fn find_script(
    lines: &[&str],
    start: usize,
    source: &str,
) -> Option<(ScriptBlock, usize)> {
    let opener = lines.get(start)?.trim();
    let name = opener.strip_prefix(SCRIPT_TAG)?.trim();
    if name.is_empty() {
        return None;
    }

    for (offset, line) in lines[start + 1..].iter().enumerate() {
        if line.trim() == SCRIPT_END {
            let end = start + 1 + offset;
            let body = lines[start + 1..end].join("\n");
            return Some((
                ScriptBlock {
                    name: name.to_string(),
                    body,
                    source: source.to_string(),
                },
                end,
            ));
        }
    }

    // No terminator before end of input: not a script block.
    None
}

/// Collects every script block in `content`, in declaration order.
///
/// Scans the lines once; each valid block's extent is skipped, so blocks
/// never overlap or nest. Invalid openers (empty name, missing terminator)
/// are passed over without consuming any lines.
pub fn find_all_scripts(content: &str, source: &str) -> Vec<ScriptBlock> {
    let lines: Vec<&str> = content.lines().collect();
    let mut scripts = Vec::new();
    let mut i = 0;
    while i < lines.len() {
        if lines[i].trim().starts_with(SCRIPT_TAG) {
            if let Some((block, end)) = find_script(&lines, i, source) {
                scripts.push(block);
                i = end + 1;
                continue;
            }
        }
        i += 1;
    }
    scripts
}
