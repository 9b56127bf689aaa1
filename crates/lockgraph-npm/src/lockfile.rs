//! package-lock.json / npm-shrinkwrap.json parsing.
//!
//! Three incompatible schema generations are in the wild and all encode
//! the install topology differently:
//!
//! - **v1** (npm 5/6): a nested `"dependencies"` tree. Each record may
//!   carry a `"requires"` map of bare names and a nested `"dependencies"`
//!   object holding shadowed installs.
//! - **v2** (npm 7/8): hybrid, offering both the nested tree and a flat
//!   `"packages"` map. Parsed through the nested tree unless flat parsing
//!   is forced.
//! - **v3** (npm 9+): flat only. Keys are install paths (`""` for the
//!   root, `node_modules/x`, `node_modules/x/node_modules/y`, ...).
//!
//! `npm-shrinkwrap.json` shares the grammar exactly and goes through the
//! same code paths.
//!
//! Requirement names are bare; resolution emulates npm's install-time
//! shadowing by searching the nesting chain (or the install-path chain for
//! flat maps) from the requiring record upward to the root, nearest match
//! first. Unresolvable names and records with empty names or versions are
//! dropped silently; only non-JSON top-level content is an error.

use crate::error::{NpmError, Result};
use lockgraph_core::{ComponentId, DependencyGraph, NpmComponent};
use serde_json::{Map, Value};
use std::collections::{BTreeSet, HashMap};

/// Lockfile schema generation.
///
/// A closed set: every lockfile is parsed as exactly one of these, chosen
/// by [`LockfileSchema::select`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockfileSchema {
    /// npm 5/6 nested `"dependencies"` tree
    V1Nested,
    /// npm 7/8 hybrid: nested tree plus flat `"packages"` map
    V2Hybrid,
    /// npm 9+ flat `"packages"` map only
    V3Flat,
}

impl LockfileSchema {
    /// Selects the parse variant from the declared `lockfileVersion` field
    /// and the flat-parse override. Pure function; the override always
    /// wins.
    pub fn select(declared_version: Option<u64>, force_flat: bool) -> Self {
        if force_flat {
            return Self::V3Flat;
        }
        match declared_version {
            Some(v) if v >= 3 => Self::V3Flat,
            Some(2) => Self::V2Hybrid,
            _ => Self::V1Nested,
        }
    }

    /// True when parsing goes through the flat `"packages"` map.
    fn uses_flat_map(self) -> bool {
        matches!(self, Self::V3Flat)
    }
}

/// Parser-intermediate form of one lockfile document.
///
/// Holds the occurrence set and raw edge list extracted from the text,
/// plus the root unit's own declared dependency names. The root list is a
/// fallback seed for correlation only; the companion manifest stays the
/// authoritative source of direct dependencies.
#[derive(Debug, Clone)]
pub struct RawLockDocument {
    pub schema: LockfileSchema,
    pub root_name: Option<String>,
    pub root_version: Option<String>,
    /// Dependency names declared on the root entry.
    pub root_dependencies: Vec<String>,
    /// Every valid (name, version) occurrence, in document order.
    pub components: Vec<NpmComponent>,
    /// Raw directed requirement edges between occurrence identities.
    pub edges: Vec<(ComponentId, ComponentId)>,
}

impl RawLockDocument {
    /// Parses lockfile text.
    ///
    /// `force_flat` forces the v3 flat-map variant regardless of the
    /// file's declared `lockfileVersion`; it is read once per unit from
    /// configuration.
    ///
    /// # Errors
    ///
    /// Only unreadable top-level content fails: non-JSON text or a
    /// non-object top level. Malformed sub-records are dropped and
    /// parsing continues with the remainder.
    pub fn parse(content: &str, force_flat: bool) -> Result<Self> {
        let root: Value = serde_json::from_str(content)
            .map_err(|e| NpmError::json_parse("package-lock.json", e))?;
        let Some(obj) = root.as_object() else {
            return Err(NpmError::invalid_structure(
                "package-lock.json",
                "top level is not an object",
            ));
        };

        let declared = obj.get("lockfileVersion").and_then(Value::as_u64);
        let schema = LockfileSchema::select(declared, force_flat);
        tracing::debug!(
            "Parsing lockfile: declared version {:?}, schema {:?}",
            declared,
            schema
        );

        let mut doc = Self {
            schema,
            root_name: non_empty_str(obj.get("name")),
            root_version: non_empty_str(obj.get("version")),
            root_dependencies: Vec::new(),
            components: Vec::new(),
            edges: Vec::new(),
        };

        if schema.uses_flat_map() {
            doc.parse_flat(obj);
        } else {
            doc.parse_nested(obj);
        }

        tracing::debug!(
            "Parsed lockfile: {} occurrences, {} raw edges",
            doc.components.len(),
            doc.edges.len()
        );
        Ok(doc)
    }

    /// True when the root entry declares a usable name and version.
    pub fn has_valid_root(&self) -> bool {
        self.root_name.is_some() && self.root_version.is_some()
    }

    /// Builds the per-location dependency graph from occurrences and raw
    /// edges. Duplicate edges collapse; identities with empty fields never
    /// got this far.
    pub fn build_graph(&self) -> DependencyGraph {
        let mut graph = DependencyGraph::new();
        for component in &self.components {
            graph.add_node(component.id.clone());
        }
        for (parent, child) in &self.edges {
            graph.add_edge(parent.clone(), child.clone());
        }
        graph
    }

    /// Occurrence metadata keyed by identity; the first occurrence of an
    /// identity is canonical.
    pub fn components_by_id(&self) -> HashMap<ComponentId, &NpmComponent> {
        let mut by_id = HashMap::new();
        for component in &self.components {
            by_id.entry(component.id.clone()).or_insert(component);
        }
        by_id
    }

    // --- nested-tree variant (v1, v2 without override) ---

    fn parse_nested(&mut self, root: &Map<String, Value>) {
        let Some(deps) = root.get("dependencies").and_then(Value::as_object) else {
            return;
        };
        self.root_dependencies = deps.keys().cloned().collect();
        self.walk_nested(deps, &[deps]);
    }

    /// Walks one `"dependencies"` map. `chain` holds every enclosing map
    /// from the root down to `deps` itself, so requirement resolution can
    /// search nearest-first.
    fn walk_nested(&mut self, deps: &Map<String, Value>, chain: &[&Map<String, Value>]) {
        for (name, record) in deps {
            let Some(record) = record.as_object() else {
                tracing::debug!("Dropping malformed lockfile record '{}'", name);
                continue;
            };
            let Some(component) = parse_occurrence(name, record) else {
                continue;
            };
            let parent_id = component.id.clone();
            self.components.push(component);

            let nested = record.get("dependencies").and_then(Value::as_object);
            let mut scope: Vec<&Map<String, Value>> = chain.to_vec();
            if let Some(nested) = nested {
                scope.push(nested);
            }

            // Bare requirement names resolve against the nesting chain,
            // most deeply nested match first.
            if let Some(requires) = record.get("requires").and_then(Value::as_object) {
                for required in requires.keys() {
                    match resolve_nested(required, &scope) {
                        Some(child) => self.edges.push((parent_id.clone(), child)),
                        None => tracing::debug!(
                            "Unresolvable requirement '{}' of '{}'",
                            required,
                            name
                        ),
                    }
                }
            }

            // Shadowed installs nested under this record are its children.
            if let Some(nested) = nested {
                for (child_name, child_record) in nested {
                    if let Some(child) = child_record
                        .as_object()
                        .and_then(|r| parse_occurrence(child_name, r))
                    {
                        self.edges.push((parent_id.clone(), child.id));
                    }
                }
                self.walk_nested(nested, &scope);
            }
        }
    }

    // --- flat-map variant (v3, or any version under the override) ---

    fn parse_flat(&mut self, root: &Map<String, Value>) {
        let Some(packages) = root.get("packages").and_then(Value::as_object) else {
            return;
        };

        // The "" record is the root unit itself: it supplies the declared
        // top-level dependency names and, for some generators, the root
        // name/version missing from the top level.
        if let Some(root_record) = packages.get("").and_then(Value::as_object) {
            if let Some(deps) = root_record.get("dependencies").and_then(Value::as_object) {
                self.root_dependencies = deps.keys().cloned().collect();
            }
            if self.root_name.is_none() {
                self.root_name = non_empty_str(root_record.get("name"));
            }
            if self.root_version.is_none() {
                self.root_version = non_empty_str(root_record.get("version"));
            }
        }

        // Materialize all occurrences first: forward references are legal
        // (a record may require a package whose entry appears later).
        let mut by_path: HashMap<&str, ComponentId> = HashMap::new();
        for (path, record) in packages {
            if path.is_empty() {
                continue;
            }
            let Some(record) = record.as_object() else {
                tracing::debug!("Dropping malformed package record at '{}'", path);
                continue;
            };
            let name = extract_package_name(path);
            let Some(component) = parse_occurrence(name, record) else {
                continue;
            };
            by_path.insert(path.as_str(), component.id.clone());
            self.components.push(component);
        }

        // Second pass: resolve each record's requirement names up its
        // install-path chain.
        for (path, record) in packages {
            if path.is_empty() {
                continue;
            }
            let Some(parent_id) = by_path.get(path.as_str()).cloned() else {
                continue;
            };
            let Some(record) = record.as_object() else {
                continue;
            };

            let mut required: BTreeSet<&str> = BTreeSet::new();
            for field in ["dependencies", "requires"] {
                if let Some(map) = record.get(field).and_then(Value::as_object) {
                    required.extend(map.keys().map(String::as_str));
                }
            }

            for name in required {
                match resolve_flat(name, path, &by_path) {
                    Some(child) => self.edges.push((parent_id.clone(), child)),
                    None => tracing::debug!(
                        "Unresolvable requirement '{}' of record '{}'",
                        name,
                        path
                    ),
                }
            }
        }
    }
}

/// Builds a validated occurrence from one lockfile record; `None` drops it.
fn parse_occurrence(name: &str, record: &Map<String, Value>) -> Option<NpmComponent> {
    let version = record.get("version").and_then(Value::as_str)?;
    let id = ComponentId::new(name, version).ok()?;
    let hash = non_empty_str(record.get("integrity"));
    let dev = record.get("dev").and_then(Value::as_bool).unwrap_or(false);
    Some(NpmComponent::new(id, hash, dev))
}

/// Resolves a bare requirement name against the nesting chain, deepest
/// scope first, emulating install-time shadowing.
fn resolve_nested(name: &str, chain: &[&Map<String, Value>]) -> Option<ComponentId> {
    for scope in chain.iter().rev() {
        if let Some(record) = scope.get(name).and_then(Value::as_object) {
            if let Some(version) = record.get("version").and_then(Value::as_str) {
                if let Ok(id) = ComponentId::new(name, version) {
                    return Some(id);
                }
            }
            // Empty-version shadow entries do not satisfy the name; keep
            // searching outer scopes.
        }
    }
    None
}

/// Resolves a bare requirement name from a flat-map record by probing
/// `<ancestor>/node_modules/<name>` along the record's own install path,
/// nearest level first.
fn resolve_flat(
    name: &str,
    from_path: &str,
    by_path: &HashMap<&str, ComponentId>,
) -> Option<ComponentId> {
    let mut prefix = from_path;
    loop {
        let candidate = if prefix.is_empty() {
            format!("node_modules/{name}")
        } else {
            format!("{prefix}/node_modules/{name}")
        };
        if let Some(id) = by_path.get(candidate.as_str()) {
            return Some(id.clone());
        }
        if prefix.is_empty() {
            return None;
        }
        prefix = match prefix.rfind("/node_modules/") {
            Some(idx) => &prefix[..idx],
            None => "",
        };
    }
}

/// Extracts the package name from a flat-map install path.
///
/// - `"node_modules/express"` → `"express"`
/// - `"node_modules/@babel/core"` → `"@babel/core"`
/// - `"node_modules/express/node_modules/debug"` → `"debug"`
fn extract_package_name(path: &str) -> &str {
    path.rsplit("node_modules/").next().unwrap_or(path)
}

fn non_empty_str(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
}
