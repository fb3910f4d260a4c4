// hierarchy.rs
//
// Ordered composition of cache levels backed by a memory of last resort.
// Grounded on the teacher's `CacheHierarchy`/`SimulatorConfig` builder
// pattern (src/timing_simulator/{components,config}.rs), narrowed from
// the teacher's fixed L1-data/L1-instruction split to a single
// L1->L2->L3 chain, since this simulator has no instruction stream.

use std::cell::RefCell;
use std::fs;
use std::path::Path;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::cache_level::CacheLevel;
use crate::errors::SimulatorError;
use crate::memory::Memory;
use crate::policy::CachePolicy;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LevelConfig {
    pub cache_size: usize,
    pub block_size: usize,
    pub associativity: usize,
    pub hit_latency: u64,
    pub miss_latency: u64,
}

impl LevelConfig {
    pub fn to_policy(self) -> Result<CachePolicy, SimulatorError> {
        CachePolicy::new(
            self.cache_size,
            self.block_size,
            self.associativity,
            self.hit_latency,
            self.miss_latency,
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HierarchyConfig {
    pub levels: Vec<LevelConfig>,
    pub write_back: bool,
    pub write_allocate: bool,
    pub full_block_fill: bool,
}

impl HierarchyConfig {
    /// Loads a complete hierarchy configuration from a JSON file,
    /// overriding every CLI flag this crate otherwise derives defaults
    /// from. The individual size/associativity flags are the common
    /// path; this is the scripting/reproducibility path for saved
    /// configurations.
    pub fn from_json_file(path: &Path) -> Result<Self, SimulatorError> {
        let contents = fs::read_to_string(path)?;
        serde_json::from_str(&contents).map_err(|e| {
            SimulatorError::InvalidPolicy(format!(
                "failed to parse config file {:?}: {}",
                path, e
            ))
        })
    }

    /// The default L1/L2/L3 hierarchy this simulator ships with.
    pub fn default_three_level() -> Self {
        Self {
            levels: vec![
                LevelConfig {
                    cache_size: 16 * 1024,
                    block_size: 64,
                    associativity: 1,
                    hit_latency: 1,
                    miss_latency: 1,
                },
                LevelConfig {
                    cache_size: 128 * 1024,
                    block_size: 64,
                    associativity: 8,
                    hit_latency: 8,
                    miss_latency: 8,
                },
                LevelConfig {
                    cache_size: 2 * 1024 * 1024,
                    block_size: 64,
                    associativity: 16,
                    hit_latency: 20,
                    miss_latency: 100,
                },
            ],
            write_back: true,
            write_allocate: true,
            full_block_fill: false,
        }
    }
}

/// The assembled hierarchy: a handle to the top level (and, through it,
/// every lower level) plus the shared memory of last resort.
pub struct Hierarchy {
    top: CacheLevel,
    memory: Rc<RefCell<Memory>>,
}

impl Hierarchy {
    pub fn build(config: &HierarchyConfig) -> Result<Self, SimulatorError> {
        if config.levels.is_empty() {
            return Err(SimulatorError::InvalidPolicy(
                "a hierarchy needs at least one cache level".to_string(),
            ));
        }

        let memory = Rc::new(RefCell::new(Memory::new()));

        let mut next: Option<Box<CacheLevel>> = None;
        for level_cfg in config.levels.iter().rev() {
            let policy = level_cfg.to_policy()?.with_full_block_fill(config.full_block_fill);
            log::info!(
                "creating cache level: {} sets, {} ways, {}-byte blocks",
                policy.num_sets(),
                policy.associativity,
                policy.block_size
            );
            let level = CacheLevel::new(
                policy,
                config.write_back,
                config.write_allocate,
                next.take(),
                memory.clone(),
            );
            next = Some(Box::new(level));
        }

        Ok(Self {
            top: *next.expect("at least one level was built"),
            memory,
        })
    }

    pub fn top(&mut self) -> &mut CacheLevel {
        &mut self.top
    }

    pub fn memory(&self) -> &Rc<RefCell<Memory>> {
        &self.memory
    }

    /// Renders the stdout report: the top level's statistics block,
    /// followed recursively by each lower level's.
    pub fn report(&self) -> String {
        let mut out = String::new();
        let mut label_idx = 1;
        let mut level = Some(&self.top);
        while let Some(l) = level {
            if label_idx == 1 {
                l.stats().format_block("L1", &mut out);
            } else {
                out.push_str("---------- LOWER CACHE ----------\n");
                l.stats().format_block(&format!("L{}", label_idx), &mut out);
            }
            level = l.next();
            label_idx += 1;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_hierarchy_builds_three_levels() {
        let config = HierarchyConfig::default_three_level();
        let mut hierarchy = Hierarchy::build(&config).unwrap();
        assert!(hierarchy.top().next().is_some());
        assert!(hierarchy.top().next().unwrap().next().is_some());
        assert!(hierarchy.top().next().unwrap().next().unwrap().next().is_none());
    }

    #[test]
    fn report_contains_every_level() {
        let config = HierarchyConfig::default_three_level();
        let mut hierarchy = Hierarchy::build(&config).unwrap();
        hierarchy.top().get_byte(0, None, false).unwrap();
        let report = hierarchy.report();
        assert!(report.contains("L1 Cache:"));
        assert!(report.contains("L2 Cache:"));
        assert!(report.contains("L3 Cache:"));
        assert_eq!(report.matches("LOWER CACHE").count(), 2);
    }

    #[test]
    fn from_json_file_round_trips_the_default_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let config = HierarchyConfig::default_three_level();
        let json = serde_json::to_string(&config).unwrap();
        std::io::Write::write_all(&mut file, json.as_bytes()).unwrap();

        let loaded = HierarchyConfig::from_json_file(file.path()).unwrap();
        assert_eq!(loaded.levels.len(), 3);
        assert_eq!(loaded.levels[0].cache_size, 16 * 1024);
        assert!(loaded.write_back);
    }

    #[test]
    fn from_json_file_rejects_malformed_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, b"not json").unwrap();
        assert!(HierarchyConfig::from_json_file(file.path()).is_err());
    }

    #[test]
    fn rejects_empty_hierarchy() {
        let config = HierarchyConfig {
            levels: vec![],
            write_back: true,
            write_allocate: true,
            full_block_fill: false,
        };
        assert!(Hierarchy::build(&config).is_err());
    }
}
