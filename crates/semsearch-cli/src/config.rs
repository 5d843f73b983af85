//! Path resolution for the MiniLM model assets.
//!
//! Search order:
//! 1. `--model-dir` flag (authoritative when given)
//! 2. `$SEMSEARCH_MODEL_DIR`
//! 3. Platform cache directory (`directories::ProjectDirs`)
//! 4. `models/all-MiniLM-L6-v2` next to the executable

use anyhow::{anyhow, Result};
use directories::ProjectDirs;
use semsearch_core::embedding::MiniLmConfig;
use std::path::{Path, PathBuf};

/// Environment variable for a custom model directory
pub const MODEL_DIR_ENV: &str = "SEMSEARCH_MODEL_DIR";

/// Directory name the model is stored under
const MODEL_SUBDIR: &str = "all-MiniLM-L6-v2";

/// Platform cache location, e.g. `~/.cache/semsearch/models/all-MiniLM-L6-v2`.
pub fn cache_model_dir() -> Option<PathBuf> {
    ProjectDirs::from("dev", "semsearch", "semsearch")
        .map(|dirs| dirs.cache_dir().join("models").join(MODEL_SUBDIR))
}

fn exe_model_dir() -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    Some(exe.parent()?.join("models").join(MODEL_SUBDIR))
}

/// Candidate directories in search order.
pub fn candidate_dirs(custom: Option<&Path>) -> Vec<PathBuf> {
    if let Some(dir) = custom {
        return vec![dir.to_path_buf()];
    }

    std::env::var_os(MODEL_DIR_ENV)
        .map(PathBuf::from)
        .into_iter()
        .chain(cache_model_dir())
        .chain(exe_model_dir())
        .collect()
}

/// First directory in `candidates` holding every model asset.
pub fn first_complete_dir(candidates: &[PathBuf]) -> Result<PathBuf> {
    let config = MiniLmConfig::default();
    if let Some(dir) = candidates
        .iter()
        .find(|dir| config.missing_assets(dir).is_empty())
    {
        return Ok(dir.clone());
    }

    let searched: Vec<String> = candidates
        .iter()
        .map(|p| format!("  - {}", p.display()))
        .collect();
    Err(anyhow!(
        "Model files not found (need config.json, tokenizer.json, model.safetensors).\n\
         Searched locations:\n{}\n\
         Set ${} or pass --model-dir.",
        searched.join("\n"),
        MODEL_DIR_ENV
    ))
}

/// Finds the model directory containing the MiniLM weights and tokenizer.
pub fn find_model_dir(custom: Option<&Path>) -> Result<PathBuf> {
    first_complete_dir(&candidate_dirs(custom))
}
