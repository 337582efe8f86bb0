//! `analyze` command: run the pipeline on one file and persist the result

use crate::ai::CodeAnalyzer;
use crate::config::Settings;
use crate::models::AnalysisRequest;
use crate::reporters;
use crate::store::{AnalysisStore, JsonStore, MemoryStore, NewAnalysis};
use anyhow::{bail, Context, Result};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Instant;

pub(crate) struct AnalyzeArgs<'a> {
    pub config: Option<&'a Path>,
    pub file: PathBuf,
    pub language: String,
    pub title: Option<String>,
    pub format: String,
    pub output: Option<PathBuf>,
    pub no_save: bool,
}

pub(crate) fn run(args: AnalyzeArgs) -> Result<()> {
    let settings = Settings::load(args.config)?;

    let (code, file_name) = read_input(&args.file)?;
    // Minimum-length validation belongs to this serving layer, not the core.
    if code.trim().len() < settings.limits.min_code_length {
        bail!(
            "Code too short. Minimum {} characters required.",
            settings.limits.min_code_length
        );
    }

    let mut request = AnalysisRequest::new(code).with_language(args.language.as_str());
    if let Some(name) = &file_name {
        request = request.with_file_name(name.as_str());
    }

    let model_used = settings.model.model().to_string();
    let analyzer = CodeAnalyzer::from_settings(&settings)?;

    let started = Instant::now();
    let report = analyzer.analyze(&request);
    let duration = started.elapsed().as_secs_f64();

    let title = args
        .title
        .or_else(|| file_name.clone())
        .unwrap_or_else(|| "Untitled analysis".to_string());

    let analysis = NewAnalysis {
        title,
        language: report.language.clone(),
        file_name,
        file_size: request.code.len() as u64,
        lines_of_code: request.code.lines().count(),
        model_used: Some(model_used),
        analysis_duration: Some(duration),
        report,
    };

    // Unsaved runs still go through a store so rendering sees one shape.
    let record = if args.no_save {
        MemoryStore::new().save(analysis)?
    } else {
        JsonStore::open_default()?.save(analysis)?
    };

    let rendered = reporters::render(&record, &args.format)?;
    match &args.output {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("writing report to {}", path.display()))?;
            eprintln!("Report written to {}", path.display());
        }
        None => println!("{rendered}"),
    }

    Ok(())
}

/// Read the submission from a file, or stdin when the path is '-'.
fn read_input(file: &Path) -> Result<(String, Option<String>)> {
    if file.as_os_str() == "-" {
        let mut code = String::new();
        std::io::stdin()
            .read_to_string(&mut code)
            .context("reading code from stdin")?;
        return Ok((code, None));
    }

    let code = std::fs::read_to_string(file)
        .with_context(|| format!("reading {}", file.display()))?;
    let file_name = file
        .file_name()
        .map(|name| name.to_string_lossy().to_string());
    Ok((code, file_name))
}
