//! Build planning
//!
//! The plan is the dependency-ordered sequence of units the scheduler
//! walks. It is derived once, before any compilation or file-system write;
//! a dependency cycle is a hard error at this stage.

use crate::error::MakeError;
use crate::parse::BuildUnit;
use std::collections::{HashMap, VecDeque};

/// Dependency-ordered sequence of build units.
///
/// Dependencies come strictly before dependents. Imports naming modules
/// outside the unit set do not participate in ordering; the backend
/// surfaces them when the importing module compiles.
#[derive(Debug)]
pub struct BuildPlan<A> {
    pub units: Vec<BuildUnit<A>>,
}

impl<A> BuildPlan<A> {
    /// Topologically sort units by their declared imports.
    ///
    /// Ready units are scheduled in first-seen input order, so the plan
    /// (and therefore progress output and artifact bytes) is reproducible
    /// across runs. A cycle aborts with every still-unschedulable module
    /// named in input order.
    pub fn resolve(units: Vec<BuildUnit<A>>) -> Result<Self, MakeError> {
        let index: HashMap<String, usize> = units
            .iter()
            .enumerate()
            .map(|(i, unit)| (unit.module.name.to_string(), i))
            .collect();

        let mut indegree = vec![0usize; units.len()];
        let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); units.len()];
        for (i, unit) in units.iter().enumerate() {
            for import in &unit.module.imports {
                if let Some(&dep) = index.get(&import.to_string()) {
                    indegree[i] += 1;
                    dependents[dep].push(i);
                }
            }
        }

        let mut queue: VecDeque<usize> = (0..units.len()).filter(|&i| indegree[i] == 0).collect();
        let mut order = Vec::with_capacity(units.len());
        while let Some(i) = queue.pop_front() {
            order.push(i);
            for &dependent in &dependents[i] {
                indegree[dependent] -= 1;
                if indegree[dependent] == 0 {
                    queue.push_back(dependent);
                }
            }
        }

        if order.len() != units.len() {
            let implicated = units
                .iter()
                .enumerate()
                .filter(|(i, _)| indegree[*i] > 0)
                .map(|(_, unit)| unit.module.name.clone())
                .collect();
            return Err(MakeError::Cycle(implicated));
        }

        tracing::debug!(target: "veld::plan", modules = order.len(), "resolved build order");

        let mut slots: Vec<Option<BuildUnit<A>>> = units.into_iter().map(Some).collect();
        let ordered = order
            .into_iter()
            .filter_map(|i| slots[i].take())
            .collect();
        Ok(Self { units: ordered })
    }
}
