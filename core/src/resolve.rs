//! Dependency resolution across schema files.
//!
//! Computes a total execution order respecting every file's declared
//! `dependencies:` metadata. Cycles and references to unknown schemas are
//! fatal: they abort the load before any command executes.

use std::collections::{HashMap, HashSet};

use crate::error::{Result, SchemaError};
use crate::types::SchemaFile;

/// Orders schema files so every file follows all of its dependencies.
///
/// Files are keyed by base name. The initial visit order is the input
/// order, so ties between independent schemas are stable and re-running
/// with the same input order is idempotent. A full cycle check runs before
/// ordering so that a cycle is always reported as
/// [`SchemaError::CircularDependency`] rather than surfacing obliquely.
///
/// # Errors
///
/// [`SchemaError::CircularDependency`] when a schema (transitively)
/// depends on itself; [`SchemaError::MissingDependency`] when a declared
/// dependency has no corresponding file.
///
/// # Examples
///
/// ```
/// use redis_schema_core::{LoadConfig, order, parse};
///
/// let config = LoadConfig::default();
/// let users = parse("SET u 1;", "users.schema", &config);
/// let orders = parse("# dependencies: users\nSET o 1;", "orders.schema", &config);
///
/// let sorted = order(vec![orders, users]).unwrap();
/// let names: Vec<&str> = sorted.iter().map(|f| f.name.as_str()).collect();
/// assert_eq!(names, ["users", "orders"]);
/// ```
pub fn order(files: Vec<SchemaFile>) -> Result<Vec<SchemaFile>> {
    let names: Vec<String> = files.iter().map(|f| f.name.clone()).collect();
    let mut graph: HashMap<&str, &[String]> = HashMap::with_capacity(files.len());
    for file in &files {
        if graph
            .insert(file.name.as_str(), &file.metadata.dependencies)
            .is_some()
        {
            tracing::warn!(name = file.name.as_str(), "duplicate schema name, later file wins");
        }
    }

    // Cycle check first, with a path-local set per starting name, so a
    // cycle is reported before any missing-dependency noise.
    for name in &names {
        let mut path = HashSet::new();
        check_cycles(name, &graph, &mut path)?;
    }

    let mut visited: HashSet<String> = HashSet::new();
    let mut ordered_names: Vec<String> = Vec::with_capacity(names.len());
    for name in &names {
        visit(name, &graph, &mut visited, &mut ordered_names)?;
    }

    // Reassemble the owned files in resolved order.
    let mut by_name: HashMap<String, SchemaFile> = files
        .into_iter()
        .map(|f| (f.name.clone(), f))
        .collect();
    Ok(ordered_names
        .iter()
        .filter_map(|name| by_name.remove(name))
        .collect())
}

fn check_cycles<'a>(
    name: &'a str,
    graph: &HashMap<&str, &'a [String]>,
    path: &mut HashSet<&'a str>,
) -> Result<()> {
    if !path.insert(name) {
        return Err(SchemaError::CircularDependency(name.to_string()));
    }
    if let Some(deps) = graph.get(name) {
        for dep in deps.iter() {
            // Unknown names are the topological pass's concern.
            if graph.contains_key(dep.as_str()) {
                check_cycles(dep, graph, path)?;
            }
        }
    }
    path.remove(name);
    Ok(())
}

fn visit(
    name: &str,
    graph: &HashMap<&str, &[String]>,
    visited: &mut HashSet<String>,
    out: &mut Vec<String>,
) -> Result<()> {
    if visited.contains(name) {
        return Ok(());
    }
    visited.insert(name.to_string());

    let deps = graph
        .get(name)
        .copied()
        .unwrap_or_default();
    for dep in deps {
        if !graph.contains_key(dep.as_str()) {
            return Err(SchemaError::MissingDependency {
                schema: name.to_string(),
                dependency: dep.clone(),
            });
        }
        visit(dep, graph, visited, out)?;
    }
    out.push(name.to_string());
    Ok(())
}
