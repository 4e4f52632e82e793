//! Namespace prefixing of key-bearing command tokens.
//!
//! Every rewrite decision lives here: a verb is classified into a
//! [`KeyFamily`] by the const tables below, and [`apply_prefix`] rewrites
//! the key-bearing tokens the family dictates. Adding support for a new
//! verb means adding it to the right table; the rewrite logic itself never
//! changes.

use crate::types::Command;

/// Verbs whose remaining tokens are all keys.
const MULTI_KEY_ALL: &[&str] = &[
    "MGET", "DEL", "UNLINK", "EXISTS", "TOUCH", "WATCH", "SUNION", "SINTER", "SDIFF", "PFCOUNT",
    "PFMERGE",
];

/// Verbs taking alternating key/value pairs.
const MULTI_KEY_PAIRED: &[&str] = &["MSET", "MSETNX"];

/// Verbs whose first two arguments are both keys.
const DUAL_KEY: &[&str] = &["RENAME", "RENAMENX", "COPY", "SMOVE", "RPOPLPUSH", "LMOVE"];

/// Cursor-based verbs carrying a `MATCH <pattern>` argument.
const PATTERN_BEARING: &[&str] = &["SCAN"];

/// Script invocations: script identity, numeric key count, then that many
/// keys.
const SCRIPT_INVOCATION: &[&str] = &["EVAL", "EVALSHA"];

/// The default data-command family: the first argument is always a key.
const SINGLE_KEY: &[&str] = &[
    // Strings
    "SET", "GET", "GETSET", "GETDEL", "GETEX", "SETNX", "SETEX", "PSETEX", "APPEND", "STRLEN",
    "GETRANGE", "SETRANGE", "INCR", "DECR", "INCRBY", "DECRBY", "INCRBYFLOAT", "SETBIT", "GETBIT",
    "BITCOUNT", "BITPOS",
    // Keyspace
    "EXPIRE", "PEXPIRE", "EXPIREAT", "PEXPIREAT", "TTL", "PTTL", "PERSIST", "TYPE", "DUMP",
    "RESTORE", "SORT",
    // Hashes
    "HSET", "HSETNX", "HGET", "HMSET", "HMGET", "HDEL", "HGETALL", "HKEYS", "HVALS", "HLEN",
    "HEXISTS", "HINCRBY", "HINCRBYFLOAT", "HRANDFIELD", "HSCAN", "HSTRLEN",
    // Lists
    "LPUSH", "RPUSH", "LPUSHX", "RPUSHX", "LPOP", "RPOP", "LRANGE", "LLEN", "LINDEX", "LSET",
    "LREM", "LTRIM", "LINSERT", "LPOS",
    // Sets
    "SADD", "SREM", "SMEMBERS", "SISMEMBER", "SMISMEMBER", "SCARD", "SPOP", "SRANDMEMBER",
    "SSCAN",
    // Sorted sets
    "ZADD", "ZREM", "ZSCORE", "ZMSCORE", "ZRANGE", "ZREVRANGE", "ZRANGEBYSCORE",
    "ZREVRANGEBYSCORE", "ZRANGEBYLEX", "ZCARD", "ZCOUNT", "ZINCRBY", "ZRANK", "ZREVRANK",
    "ZREMRANGEBYRANK", "ZREMRANGEBYSCORE", "ZPOPMIN", "ZPOPMAX", "ZRANDMEMBER", "ZSCAN",
    // Streams
    "XADD", "XLEN", "XRANGE", "XREVRANGE", "XTRIM", "XDEL",
    // HyperLogLog / geo
    "PFADD", "GEOADD", "GEOPOS", "GEODIST", "GEOSEARCH",
];

/// Per-command-family key placement, driving the prefix rewrite.
///
/// The tagged union is total over the recognized verb tables plus the
/// explicit [`Keyless`](KeyFamily::Keyless) default for everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyFamily {
    /// First argument is the key (the large majority of data commands).
    SingleKey,
    /// Every argument is a key.
    MultiKeyAll,
    /// Arguments alternate key, value, key, value.
    MultiKeyPaired,
    /// The first two arguments are keys.
    DualKey,
    /// A `MATCH` marker is followed by a key pattern.
    PatternBearing,
    /// Script identity, key count, then that many keys.
    ScriptInvocation,
    /// No key-bearing tokens, or an unrecognized verb.
    Keyless,
}

impl KeyFamily {
    /// Classifies a verb (matched case-insensitively).
    ///
    /// # Examples
    ///
    /// ```
    /// use redis_schema_core::KeyFamily;
    ///
    /// assert_eq!(KeyFamily::of("mset"), KeyFamily::MultiKeyPaired);
    /// assert_eq!(KeyFamily::of("GET"), KeyFamily::SingleKey);
    /// assert_eq!(KeyFamily::of("FLUSHDB"), KeyFamily::Keyless);
    /// ```
    pub fn of(verb: &str) -> Self {
        let verb = verb.to_uppercase();
        let verb = verb.as_str();
        if SINGLE_KEY.contains(&verb) {
            KeyFamily::SingleKey
        } else if MULTI_KEY_ALL.contains(&verb) {
            KeyFamily::MultiKeyAll
        } else if MULTI_KEY_PAIRED.contains(&verb) {
            KeyFamily::MultiKeyPaired
        } else if DUAL_KEY.contains(&verb) {
            KeyFamily::DualKey
        } else if PATTERN_BEARING.contains(&verb) {
            KeyFamily::PatternBearing
        } else if SCRIPT_INVOCATION.contains(&verb) {
            KeyFamily::ScriptInvocation
        } else {
            KeyFamily::Keyless
        }
    }

    /// Classifies a command by its verb.
    pub fn of_command(command: &Command) -> Self {
        Self::of(&command.verb())
    }
}

/// Returns `true` when a pattern token contains a glob metacharacter.
/// Prefixing such a token would break its match semantics.
fn is_glob_pattern(token: &str) -> bool {
    token.contains(['*', '?', '['])
}

/// Rewrites a command's key-bearing tokens with a namespace prefix.
///
/// Identity when `prefix` is empty. Unrecognized verbs are returned
/// unmodified.
///
/// # Examples
///
/// ```
/// use redis_schema_core::{Command, apply_prefix};
///
/// let cmd = Command::new(vec!["MSET".into(), "k1".into(), "v1".into(), "k2".into(), "v2".into()])
///     .unwrap();
/// let rewritten = apply_prefix(&cmd, "p:");
/// assert_eq!(rewritten.tokens(), ["MSET", "p:k1", "v1", "p:k2", "v2"]);
/// ```
pub fn apply_prefix(command: &Command, prefix: &str) -> Command {
    if prefix.is_empty() {
        return command.clone();
    }

    let mut tokens = command.tokens().to_vec();
    match KeyFamily::of_command(command) {
        KeyFamily::SingleKey => {
            if let Some(key) = tokens.get_mut(1) {
                *key = format!("{prefix}{key}");
            }
        }
        KeyFamily::MultiKeyAll => {
            for key in tokens.iter_mut().skip(1) {
                *key = format!("{prefix}{key}");
            }
        }
        KeyFamily::MultiKeyPaired => {
            // Arguments alternate key, value; keys sit at even offsets
            // past the verb.
            for key in tokens.iter_mut().skip(1).step_by(2) {
                *key = format!("{prefix}{key}");
            }
        }
        KeyFamily::DualKey => {
            for key in tokens.iter_mut().skip(1).take(2) {
                *key = format!("{prefix}{key}");
            }
        }
        KeyFamily::PatternBearing => {
            let match_pos = tokens
                .iter()
                .skip(1)
                .position(|t| t.eq_ignore_ascii_case("MATCH"))
                .map(|p| p + 1);
            if let Some(pos) = match_pos {
                if let Some(pattern) = tokens.get_mut(pos + 1) {
                    if !is_glob_pattern(pattern) {
                        *pattern = format!("{prefix}{pattern}");
                    }
                }
            }
        }
        KeyFamily::ScriptInvocation => {
            // tokens[1] is the script identity, tokens[2] the key count.
            let count = tokens
                .get(2)
                .and_then(|t| t.parse::<usize>().ok())
                .unwrap_or(0);
            for key in tokens.iter_mut().skip(3).take(count) {
                *key = format!("{prefix}{key}");
            }
        }
        KeyFamily::Keyless => {}
    }

    Command::new(tokens).unwrap_or_else(|| command.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cmd(tokens: &[&str]) -> Command {
        Command::new(tokens.iter().map(|t| t.to_string()).collect()).unwrap()
    }

    fn rewritten(tokens: &[&str], prefix: &str) -> Vec<String> {
        apply_prefix(&cmd(tokens), prefix).into_tokens()
    }

    #[test]
    fn test_empty_prefix_is_identity() {
        let original = cmd(&["SET", "k", "v"]);
        assert_eq!(apply_prefix(&original, ""), original);
    }

    #[test]
    fn test_single_key() {
        assert_eq!(rewritten(&["SET", "k", "v"], "p:"), ["SET", "p:k", "v"]);
        assert_eq!(
            rewritten(&["hset", "h", "f", "v"], "p:"),
            ["hset", "p:h", "f", "v"]
        );
    }

    #[test]
    fn test_multi_key_all() {
        assert_eq!(
            rewritten(&["MGET", "a", "b", "c"], "p:"),
            ["MGET", "p:a", "p:b", "p:c"]
        );
        assert_eq!(rewritten(&["DEL", "x"], "p:"), ["DEL", "p:x"]);
    }

    #[test]
    fn test_multi_key_paired() {
        assert_eq!(
            rewritten(&["MSET", "k1", "v1", "k2", "v2"], "p:"),
            ["MSET", "p:k1", "v1", "p:k2", "v2"]
        );
    }

    #[test]
    fn test_dual_key() {
        assert_eq!(
            rewritten(&["RENAME", "old", "new"], "p:"),
            ["RENAME", "p:old", "p:new"]
        );
        assert_eq!(
            rewritten(&["SMOVE", "src", "dst", "member"], "p:"),
            ["SMOVE", "p:src", "p:dst", "member"]
        );
    }

    #[test]
    fn test_scan_match_literal_prefixed() {
        assert_eq!(
            rewritten(&["SCAN", "0", "MATCH", "user:1", "COUNT", "10"], "p:"),
            ["SCAN", "0", "MATCH", "p:user:1", "COUNT", "10"]
        );
    }

    #[test]
    fn test_scan_glob_pattern_untouched() {
        assert_eq!(
            rewritten(&["SCAN", "0", "MATCH", "user:*"], "p:"),
            ["SCAN", "0", "MATCH", "user:*"]
        );
        assert_eq!(
            rewritten(&["SCAN", "0", "MATCH", "u?er"], "p:"),
            ["SCAN", "0", "MATCH", "u?er"]
        );
    }

    #[test]
    fn test_scan_without_match_untouched() {
        assert_eq!(rewritten(&["SCAN", "0"], "p:"), ["SCAN", "0"]);
    }

    #[test]
    fn test_evalsha_key_count() {
        assert_eq!(
            rewritten(&["EVALSHA", "sha1", "2", "k1", "k2", "arg1"], "p:"),
            ["EVALSHA", "sha1", "2", "p:k1", "p:k2", "arg1"]
        );
    }

    #[test]
    fn test_eval_zero_keys() {
        assert_eq!(
            rewritten(&["EVAL", "return 1", "0", "arg1"], "p:"),
            ["EVAL", "return 1", "0", "arg1"]
        );
    }

    #[test]
    fn test_eval_malformed_count_untouched() {
        assert_eq!(
            rewritten(&["EVAL", "return 1", "nope", "k1"], "p:"),
            ["EVAL", "return 1", "nope", "k1"]
        );
    }

    #[test]
    fn test_unknown_verb_untouched() {
        assert_eq!(rewritten(&["FLUSHDB"], "p:"), ["FLUSHDB"]);
        assert_eq!(
            rewritten(&["CONFIG", "SET", "maxmemory", "1gb"], "p:"),
            ["CONFIG", "SET", "maxmemory", "1gb"]
        );
    }

    #[test]
    fn test_family_classification() {
        assert_eq!(KeyFamily::of("mget"), KeyFamily::MultiKeyAll);
        assert_eq!(KeyFamily::of("MSETNX"), KeyFamily::MultiKeyPaired);
        assert_eq!(KeyFamily::of("renamenx"), KeyFamily::DualKey);
        assert_eq!(KeyFamily::of("scan"), KeyFamily::PatternBearing);
        assert_eq!(KeyFamily::of("eval"), KeyFamily::ScriptInvocation);
        assert_eq!(KeyFamily::of("ZADD"), KeyFamily::SingleKey);
        assert_eq!(KeyFamily::of("PING"), KeyFamily::Keyless);
    }
}
