//! Parser gate
//!
//! Parsing is all-or-nothing: every record is parsed even after a failure,
//! and any failure at all means no module list escapes. An unparseable
//! module makes the dependency graph untrustworthy, so the scheduler never
//! runs on a partial set.

use crate::backend::{CompilerBackend, Module, ParseError};
use crate::error::MakeError;
use crate::input::{InputRecord, RebuildPolicy, SourceOrigin};
use std::collections::HashMap;

/// A parsed module paired with the loading metadata the scheduler needs.
#[derive(Debug, Clone)]
pub struct BuildUnit<A> {
    pub module: Module<A>,
    pub origin: SourceOrigin,
    pub policy: RebuildPolicy,
}

/// Parse every record through the backend, collecting all failures.
///
/// Module names are the identity the whole incremental scheme keys on, so
/// duplicates across records are rejected here as well.
pub fn parse_all<B: CompilerBackend>(
    backend: &B,
    records: &[InputRecord],
) -> Result<Vec<BuildUnit<B::Ast>>, MakeError> {
    let mut units = Vec::with_capacity(records.len());
    let mut failures = Vec::new();

    for record in records {
        match backend.parse_module(&record.origin, &record.text) {
            Ok(module) => {
                tracing::debug!(
                    target: "veld::parse",
                    module = %module.name,
                    imports = module.imports.len(),
                    "parsed module"
                );
                units.push(BuildUnit {
                    module,
                    origin: record.origin.clone(),
                    policy: record.policy,
                });
            }
            Err(err) => failures.push(err),
        }
    }

    if failures.is_empty() {
        let mut seen: HashMap<String, String> = HashMap::new();
        for unit in &units {
            let name = unit.module.name.to_string();
            let label = unit.origin.label();
            if let Some(first) = seen.insert(name.clone(), label.clone()) {
                failures.push(ParseError::new(
                    label,
                    format!(
                        "duplicate module name '{}' (already defined in {})",
                        name,
                        if first.is_empty() { "builtin" } else { &first }
                    ),
                ));
            }
        }
    }

    if failures.is_empty() {
        Ok(units)
    } else {
        Err(MakeError::Parse(failures))
    }
}
