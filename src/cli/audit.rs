use std::{
    ffi::OsStr,
    path::{Path, PathBuf},
};

use anyhow::Context;
use clap::Parser;
use reqtree::{
    Config, InMemoryCatalog, ProgramId, ResolvedBlock, Resolver, ResumeCache, RuleBlock,
    fingerprint,
};
use tracing::instrument;
use walkdir::WalkDir;

use super::{OutputFormat, render, terminal::Colorize};

#[derive(Debug, Parser)]
#[command(about = "Resolve degree-audit rule arrays into requirement trees")]
pub struct Audit {
    /// A rule-array JSON file, or a directory of them
    path: PathBuf,

    /// Catalog snapshot: a JSON array of courses
    #[arg(long, value_name = "FILE")]
    catalog: PathBuf,

    /// Resolution settings (TOML)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Resume cache; blocks whose rules are unchanged are not resolved again
    #[arg(long, value_name = "FILE")]
    cache: Option<PathBuf>,

    /// Resolve these blocks again even if the cache holds them (repeatable)
    #[arg(long, value_name = "BLOCK", requires = "cache")]
    refresh: Vec<String>,

    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "json")]
    format: OutputFormat,
}

impl Audit {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self) -> anyhow::Result<()> {
        let config = match &self.config {
            Some(path) => Config::load(path).map_err(anyhow::Error::msg)?,
            None => Config::default(),
        };
        let catalog = InMemoryCatalog::load(&self.catalog)?;
        let mut cache = match &self.cache {
            Some(path) => ResumeCache::load(path)?,
            None => ResumeCache::new(),
        };
        for block in &self.refresh {
            if cache.remove(block).is_none() {
                tracing::info!("{block}: not cached, nothing to refresh");
            }
        }

        let resolver = Resolver::new(&catalog, &config);
        let mut blocks = Vec::new();

        for path in collect_rule_paths(&self.path) {
            let id = block_id(&path);
            if let Err(e) = id.validate() {
                tracing::warn!("{}: {e}", path.display());
            }

            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let value: serde_json::Value = serde_json::from_str(&content)
                .with_context(|| format!("failed to parse {}", path.display()))?;
            let input_fingerprint = fingerprint(&value);
            let block: RuleBlock = serde_json::from_value(value)
                .with_context(|| format!("{} is not a rule array", path.display()))?;

            let key = id.to_string();
            let requirements = if let Some(entry) = cache.get(&key, &input_fingerprint) {
                tracing::info!("{key}: unchanged since {}", entry.resolved_at);
                entry.requirements.clone()
            } else {
                tracing::info!("{key}: resolving {} rules", block.rule_array.len());
                let requirements = resolver
                    .resolve(&block.rule_array)
                    .with_context(|| format!("failed to resolve {key}"))?;
                cache.insert(key, input_fingerprint, requirements.clone());
                requirements
            };

            blocks.push(ResolvedBlock {
                id,
                title: block.title,
                requirements,
            });
        }

        if let Some(path) = &self.cache {
            cache.save(path)?;
        }

        if !self.format.emit(&blocks)? {
            for block in &blocks {
                let heading = block.id.to_string();
                match &block.title {
                    Some(title) => println!("{} {}", heading.connective(), title.dim()),
                    None => println!("{}", heading.connective()),
                }
                print!("{}", render::requirements(&block.requirements));
            }
        }

        Ok(())
    }
}

/// Every JSON file under `root`, in path order.
fn collect_rule_paths(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| entry.path().extension() == Some(OsStr::new("json")))
        .map(walkdir::DirEntry::into_path)
        .collect()
}

/// The block identifier encoded in a rule file's name.
fn block_id(path: &Path) -> ProgramId {
    path.file_stem()
        .and_then(OsStr::to_str)
        .map(ProgramId::from)
        .unwrap_or_default()
}
