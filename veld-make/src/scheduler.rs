//! Build scheduler
//!
//! Walks the dependency-ordered plan one module at a time. For each module
//! it decides fresh or stale from timestamps and from what was rebuilt
//! earlier in the run, invokes the backend for stale modules, and loads the
//! stored interface for fresh ones so their dependents can still compile.
//!
//! A module with origin `File` is rebuilt in a given run iff its policy is
//! `Normal` and: no prior artifact exists, or the source timestamp is
//! missing, or the source is strictly newer than the artifact, or any of
//! its dependencies was rebuilt in this run.

use crate::backend::{CompilerBackend, Module, ModuleInterface};
use crate::error::MakeError;
use crate::input::RebuildPolicy;
use crate::module_id::ModuleId;
use crate::output::{OutputWriter, CODE_FILE, EXTERNS_FILE};
use crate::parse::BuildUnit;
use crate::plan::BuildPlan;
use crate::progress::Progress;
use std::collections::{HashMap, HashSet};
use veld_config::MakeConfig;
use veld_vfs::FileSystem;

/// What a build run did, in plan order.
#[derive(Debug, Clone, Default)]
pub struct BuildSummary {
    pub rebuilt: Vec<ModuleId>,
    pub skipped: Vec<ModuleId>,
}

/// The incremental build scheduler.
///
/// All collaborators are injected: the file system (timestamp probes,
/// reads, writes), the compiler backend, and the progress sink. The
/// configuration is passed by reference; there is no ambient context.
pub struct Make<'a, B: CompilerBackend> {
    fs: &'a dyn FileSystem,
    backend: &'a B,
    progress: &'a dyn Progress,
    config: &'a MakeConfig,
}

impl<'a, B: CompilerBackend> Make<'a, B> {
    pub fn new(
        fs: &'a dyn FileSystem,
        backend: &'a B,
        progress: &'a dyn Progress,
        config: &'a MakeConfig,
    ) -> Self {
        Self {
            fs,
            backend,
            progress,
            config,
        }
    }

    /// Run the plan to completion or to the first fatal error.
    ///
    /// On failure, artifacts already written for earlier modules are left
    /// in place; there is no rollback.
    pub fn run(&self, plan: &BuildPlan<B::Ast>) -> Result<BuildSummary, MakeError> {
        // Modules some unit imports; a never-rebuild module outside this
        // set is not compiled at all.
        let needed: HashSet<String> = plan
            .units
            .iter()
            .flat_map(|unit| unit.module.imports.iter().map(|i| i.to_string()))
            .collect();

        let writer = OutputWriter::new(self.fs, self.progress);
        let mut interfaces: HashMap<String, ModuleInterface> = HashMap::new();
        let mut rebuilt: HashSet<String> = HashSet::new();
        let mut summary = BuildSummary::default();

        for unit in &plan.units {
            let name = unit.module.name.to_string();

            if unit.policy == RebuildPolicy::Never {
                // Builtin content: always fresh, compiled in memory only
                // when its interface is needed, never written out.
                if needed.contains(&name) {
                    let deps = dep_interfaces(&unit.module, &interfaces);
                    let artifact = self.backend.compile(&unit.module, &deps).map_err(
                        |source| MakeError::Compile {
                            module: name.clone(),
                            source,
                        },
                    )?;
                    tracing::debug!(target: "veld::make", module = %name, "compiled builtin in memory");
                    interfaces.insert(name, artifact.interface);
                }
                summary.skipped.push(unit.module.name.clone());
                continue;
            }

            let deps_rebuilt = unit
                .module
                .imports
                .iter()
                .any(|import| rebuilt.contains(&import.to_string()));
            let stale = deps_rebuilt || self.is_stale(unit)?;

            if !stale {
                match self.load_interface(&unit.module.name) {
                    Ok(interface) => {
                        self.progress.emit(&format!("Skipping {} (up to date)", name));
                        interfaces.insert(name, interface);
                        summary.skipped.push(unit.module.name.clone());
                        continue;
                    }
                    Err(err) => {
                        tracing::warn!(
                            target: "veld::make",
                            module = %name,
                            error = %err,
                            "stored interface unusable, rebuilding"
                        );
                    }
                }
            }

            self.progress.emit(&format!("Compiling {}", name));
            let deps = dep_interfaces(&unit.module, &interfaces);
            let artifact =
                self.backend
                    .compile(&unit.module, &deps)
                    .map_err(|source| MakeError::Compile {
                        module: name.clone(),
                        source,
                    })?;
            let module_dir = unit.module.name.artifact_dir(&self.config.output_dir);
            writer.write_artifact(&module_dir, &artifact, &self.config.header_lines)?;
            interfaces.insert(name.clone(), artifact.interface);
            rebuilt.insert(name);
            summary.rebuilt.push(unit.module.name.clone());
        }

        tracing::info!(
            target: "veld::make",
            rebuilt = summary.rebuilt.len(),
            skipped = summary.skipped.len(),
            "build finished"
        );
        Ok(summary)
    }

    fn is_stale(&self, unit: &BuildUnit<B::Ast>) -> Result<bool, MakeError> {
        let source_path = match unit.origin.path() {
            Some(path) => path,
            None => return Ok(true),
        };
        let source_time = self.fs.timestamp(source_path)?;

        let module_dir = unit.module.name.artifact_dir(&self.config.output_dir);
        let code_time = self.fs.timestamp(&module_dir.join(CODE_FILE))?;
        let externs_time = self.fs.timestamp(&module_dir.join(EXTERNS_FILE))?;
        // The artifact counts as present only when both files are; its
        // timestamp is the older of the two.
        let artifact_time = match (code_time, externs_time) {
            (Some(code), Some(externs)) => Some(code.min(externs)),
            _ => None,
        };

        Ok(match (source_time, artifact_time) {
            (_, None) => true,
            // Source vanished since loading: no trustworthy comparison
            // exists, so rebuild rather than silently skip.
            (None, _) => true,
            (Some(source), Some(artifact)) => source > artifact,
        })
    }

    fn load_interface(&self, name: &ModuleId) -> Result<ModuleInterface, MakeError> {
        let path = name
            .artifact_dir(&self.config.output_dir)
            .join(EXTERNS_FILE);
        let text = self.fs.read_text(&path)?;
        self.progress.emit(&format!("Reading {}", path.display()));
        let interface: ModuleInterface = serde_json::from_str(&text)?;
        if interface.module != name.to_string() {
            return Err(MakeError::Serialization(format!(
                "externs at {} name module {}",
                path.display(),
                interface.module
            )));
        }
        Ok(interface)
    }
}

fn dep_interfaces<A>(
    module: &Module<A>,
    interfaces: &HashMap<String, ModuleInterface>,
) -> Vec<ModuleInterface> {
    module
        .imports
        .iter()
        .filter_map(|import| interfaces.get(&import.to_string()).cloned())
        .collect()
}
