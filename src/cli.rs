//! Minimal CLI: validate JSON/NDJSON documents against a built-in schema.
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use rayon::prelude::*;
use serde_json::Value;

use json_adt::catalog::Catalog;
use json_adt::de::{DEFAULT_MAX_DEPTH, Deserializer, Options};
use json_adt::descriptor::TypeDescriptor;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// validate JSON/NDJSON documents against algebraic type descriptors
#[derive(Parser, Debug)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// list the built-in schemas
    Schemas,
    /// deserialize every input document against a schema and report the outcome
    Check(CheckOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// treat input as newline-delimited JSON (NDJSON)
    #[arg(long, default_value_t = false)]
    ndjson: bool,

    /// JSON Pointer to select a subnode in each document (e.g. /data/items/0/payload)
    #[arg(long)]
    json_pointer: Option<String>,

    /// One or more inputs. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(clap::Parser, Debug)]
struct CheckOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// built-in schema name (see `schemas`)
    #[arg(long, short)]
    schema: String,

    /// deepest nesting the deserializer will descend into
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// write the validated documents as a JSON array (nothing written if any fail)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

/// One loaded input document, labelled for reporting.
struct Document {
    label: String,
    value: Value,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn load(&self) -> anyhow::Result<Vec<Document>> {
        let source_paths = resolve_file_path_patterns(&self.input)
            .map_err(|error| anyhow::anyhow!("failed to resolve input file paths: {error}"))?;
        let mut documents = Vec::new();
        for source_path in source_paths {
            let source_path_str = source_path.to_string_lossy().to_string();
            let source = std::fs::read_to_string(&source_path)
                .with_context(|| format!("failed to read source file {source_path_str}"))?;
            for (label, json_value) in split_documents(&source_path_str, &source, self.ndjson)? {
                let value = match self.json_pointer.as_deref() {
                    None => json_value,
                    Some(pointer) => json_value
                        .pointer(pointer)
                        .cloned()
                        .with_context(|| format!("{label}: JSON pointer {pointer} selects nothing"))?,
                };
                documents.push(Document { label, value });
            }
        }
        tracing::debug!(documents = documents.len(), "inputs loaded");
        Ok(documents)
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }
    pub fn run(&self) -> anyhow::Result<()> {
        let catalog = Catalog::builtin()?;
        match &self.cmd {
            Command::Schemas => {
                for (name, ty) in catalog.iter() {
                    println!("{} {ty}", format!("{name}:").bold());
                }
                Ok(())
            }
            Command::Check(target) => {
                let Some(descriptor) = catalog.get(&target.schema) else {
                    let known = catalog.names().collect::<Vec<_>>().join(", ");
                    bail!("unknown schema `{}` (known: {known})", target.schema);
                };
                let documents = target.input_settings.load()?;
                let options = Options::default().with_max_depth(target.max_depth);
                check_documents(descriptor, &documents, options, target.out.as_deref())
            }
        }
    }
}

fn check_documents(
    descriptor: &TypeDescriptor,
    documents: &[Document],
    options: Options,
    out: Option<&Path>,
) -> anyhow::Result<()> {
    let deserializer = Deserializer::new(options);
    let results = documents
        .par_iter()
        .map(|doc| deserializer.deserialize(descriptor, &doc.value))
        .collect::<Vec<_>>();

    let mut typed = Vec::with_capacity(results.len());
    let mut failed = 0usize;
    for (doc, result) in documents.iter().zip(results) {
        match result {
            Ok(value) => {
                println!("{} {}", "✅".green(), doc.label);
                typed.push(value);
            }
            Err(error) => {
                failed += 1;
                println!("{} {}: {}", "❌".red(), doc.label, error.to_string().red());
            }
        }
    }

    if failed > 0 {
        bail!("{failed} of {} documents failed validation against {descriptor}", documents.len());
    }

    if let Some(out) = out {
        if let Some(parent) = out.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let src = serde_json::to_string_pretty(&typed)?;
        std::fs::write(out, src).with_context(|| format!("failed to write {}", out.display()))?;
    }
    Ok(())
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

/// One document per file, or one per non-blank line in NDJSON mode.
fn split_documents(source_path_str: &str, source: &str, ndjson: bool) -> anyhow::Result<Vec<(String, Value)>> {
    if !ndjson {
        let value = serde_json::from_str::<Value>(source)
            .with_context(|| format!("Failed to parse JSON source file ({source_path_str})"))?;
        return Ok(vec![(source_path_str.to_string(), value)]);
    }
    let mut out = Vec::new();
    for (index, line) in source.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let label = format!("{source_path_str}:{}", index + 1);
        let value = serde_json::from_str::<Value>(line)
            .with_context(|| format!("Failed to parse NDJSON line ({label})"))?;
        out.push((label, value));
    }
    Ok(out)
}

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>, Box<dyn std::error::Error + Send + Sync>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{'))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern)? {
                out.push(entry?);
                matched_any = true;
            }
            if !matched_any {
                return Err(format!("glob pattern matched no files: {pattern}").into());
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}
