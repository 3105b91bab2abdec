//! Three-stage documentation pipeline over one repository.
//!
//! 1. **Index**: parse every supported file into a `FileStructure` and
//!    persist it as JSON in the mirror.
//! 2. **Summarize**: run the continuation summarizer over each structure
//!    JSON and persist the markdown artifact.
//! 3. **Section comments**: remark every function/method span and persist
//!    the line-anchored records.
//!
//! Faults are isolated per file: a file that fails to parse, summarize, or
//! comment is logged and skipped, and the batch continues. Existing
//! artifacts are kept unless the matching force flag is set.

use crate::config::{AppConfig, CliArgs};
use crate::workspace::{Mirror, MirrorPaths};
use anyhow::Result;
use doc_summarizer::{FileSummarizer, SectionCommenter, SectionReport, SummarizerConfig};
use llm_gateway::ChatGateway;
use std::fs;
use std::path::{Path, PathBuf};
use structure_indexer::{FileStructure, LanguageKind};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// One source file admitted by the index stage.
struct IndexedFile {
    source_path: PathBuf,
    paths: MirrorPaths,
}

#[tracing::instrument(level = "info", skip_all, fields(repo = %args.repo_path.display()))]
pub async fn run(args: &CliArgs, config: &AppConfig) -> Result<()> {
    let mirror = Mirror::resolve(&config.workspace_dir, &args.repo_path)?;
    info!(mirror = %mirror.root().display(), "output mirror resolved");

    let indexed = index_repository(&args.repo_path, &mirror)?;

    let gateway = ChatGateway::new(config.gateway.clone())?;
    summarize_files(&indexed, &gateway, args.force_reanalyze).await;
    comment_files(&indexed, &gateway, args.force_recomment).await;

    Ok(())
}

/// Stage 1: walk the repository and persist one structure JSON per
/// supported file.
fn index_repository(repo_path: &Path, mirror: &Mirror) -> Result<Vec<IndexedFile>> {
    let mut indexed = Vec::new();

    for entry in WalkDir::new(repo_path).into_iter().filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if LanguageKind::from_path(path).is_none() {
            continue;
        }
        let relative = path.strip_prefix(repo_path).unwrap_or(path).to_path_buf();

        let structure = match index_one(path) {
            Ok(structure) => structure.with_relative_path(relative.to_string_lossy()),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "skipping file");
                continue;
            }
        };

        let paths = mirror.paths_for(&relative);
        if let Some(parent) = paths.structure.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&paths.structure, serde_json::to_string_pretty(&structure)?)?;
        debug!(path = %paths.structure.display(), "structure written");

        indexed.push(IndexedFile { source_path: path.to_path_buf(), paths });
    }

    info!(files = indexed.len(), "structure indexing finished");
    Ok(indexed)
}

fn index_one(path: &Path) -> structure_indexer::Result<FileStructure> {
    let source = fs::read(path)?;
    structure_indexer::index_source(path, &source)
}

/// Stage 2: one summary artifact per structure JSON.
async fn summarize_files(files: &[IndexedFile], gateway: &ChatGateway, force: bool) {
    let summarizer = FileSummarizer::new(gateway, SummarizerConfig::default());
    let mut written = 0usize;

    for file in files {
        if file.paths.summary.exists() && !force {
            debug!(path = %file.paths.summary.display(), "summary exists; skipping");
            continue;
        }
        let structure_json = match fs::read_to_string(&file.paths.structure) {
            Ok(json) => json,
            Err(err) => {
                warn!(path = %file.paths.structure.display(), error = %err, "cannot read structure");
                continue;
            }
        };

        match summarizer.summarize(&structure_json).await {
            Ok(artifact) => {
                info!(
                    path = %file.paths.summary.display(),
                    turns = artifact.turns,
                    completion = ?artifact.completion,
                    total_tokens = artifact.usage.total_tokens,
                    "summary assembled"
                );
                if let Err(err) = fs::write(&file.paths.summary, &artifact.text) {
                    warn!(path = %file.paths.summary.display(), error = %err, "cannot write summary");
                    continue;
                }
                written += 1;
            }
            // Transport failure aborts this file only; nothing partial is written.
            Err(err) => {
                warn!(path = %file.source_path.display(), error = %err, "summarization aborted")
            }
        }
    }

    info!(written, "summarization finished");
}

/// Stage 3: line-anchored section remarks per structure JSON.
async fn comment_files(files: &[IndexedFile], gateway: &ChatGateway, force: bool) {
    let commenter = SectionCommenter::new(gateway);
    let mut written = 0usize;

    for file in files {
        if file.paths.comments.exists() && !force {
            debug!(path = %file.paths.comments.display(), "comments exist; skipping");
            continue;
        }
        let Some((structure, source, summary)) = load_section_inputs(file) else { continue };

        match commenter.comment_sections(&structure, &source, &summary).await {
            Ok(comments) => {
                let report = SectionReport {
                    file_path: file.source_path.to_string_lossy().into_owned(),
                    comments,
                };
                match serde_json::to_string_pretty(&report) {
                    Ok(json) => {
                        if let Err(err) = fs::write(&file.paths.comments, json) {
                            warn!(path = %file.paths.comments.display(), error = %err, "cannot write comments");
                            continue;
                        }
                        written += 1;
                    }
                    Err(err) => {
                        warn!(path = %file.paths.comments.display(), error = %err, "cannot serialize report")
                    }
                }
            }
            Err(err) => {
                warn!(path = %file.source_path.display(), error = %err, "section pass aborted")
            }
        }
    }

    info!(written, "section commenting finished");
}

/// Inputs for one file's section pass; any missing piece skips the file.
fn load_section_inputs(file: &IndexedFile) -> Option<(FileStructure, String, String)> {
    let structure_json = match fs::read_to_string(&file.paths.structure) {
        Ok(json) => json,
        Err(err) => {
            warn!(path = %file.paths.structure.display(), error = %err, "cannot read structure");
            return None;
        }
    };
    let structure: FileStructure = match serde_json::from_str(&structure_json) {
        Ok(structure) => structure,
        Err(err) => {
            warn!(path = %file.paths.structure.display(), error = %err, "cannot decode structure");
            return None;
        }
    };
    let source = match fs::read_to_string(&file.source_path) {
        Ok(source) => source,
        Err(err) => {
            warn!(path = %file.source_path.display(), error = %err, "cannot read source");
            return None;
        }
    };
    let summary = match fs::read_to_string(&file.paths.summary) {
        Ok(summary) => summary,
        Err(err) => {
            warn!(path = %file.paths.summary.display(), error = %err, "summary missing; run summarize first");
            return None;
        }
    };
    Some((structure, source, summary))
}
