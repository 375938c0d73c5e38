//! Run command orchestrator
//!
//! Drives one full record sync session against in-memory stores seeded from
//! JSON fixtures: initialize, settle lookups, apply edits, save, report.

use crate::error::CliError;
use anyhow::{Context, Result};
use colored::*;
use log::{debug, warn};
use recordsync_core::memory::StoredRecord;
use recordsync_core::{
    DraftRecord, EnrichedRecord, Fields, InitParams, MemoryPrimaryStore, MemorySecondaryStore,
    OrchestratorConfig, RecordId, RecordSyncOrchestrator, SubmitOutcome,
};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

/// Output format for run results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Human,
    Json,
    Minimal,
}

impl FromStr for OutputFormat {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" => Ok(Self::Human),
            "json" => Ok(Self::Json),
            "minimal" => Ok(Self::Minimal),
            _ => Err(CliError::UnknownFormat(s.to_string())),
        }
    }
}

/// Run command options
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// JSON file holding `{"defaultFieldValues": {...}}`
    pub params_path: PathBuf,
    /// JSON array of secondary store records
    pub store_path: PathBuf,
    /// Subject typed into the form
    pub subject: Option<String>,
    /// Description typed into the form
    pub description: Option<String>,
    /// Raw `FIELD=VALUE` edits, applied after subject and description
    pub edits: Vec<String>,
    pub format: OutputFormat,
}

/// How far the run got
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Completed,
    CreateFailed,
    WriteBackFailed,
}

/// Everything observable after one run
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub status: RunStatus,
    pub record_id: Option<RecordId>,
    pub draft: DraftRecord,
    pub enriched: EnrichedRecord,
    pub create_request: Option<StoredRecord>,
    pub write_back: Option<Fields>,
    pub ignored_edits: Vec<String>,
    pub error: Option<String>,
    #[serde(skip)]
    pub outcome: SubmitOutcome,
}

impl RunReport {
    /// Convert a failed run into the matching CLI error
    pub fn into_result(self) -> Result<(), CliError> {
        match self.outcome {
            SubmitOutcome::CreateFailed(error) => Err(CliError::CreateFailed(error)),
            SubmitOutcome::WriteBackFailed { record_id, error } => {
                Err(CliError::WriteBackFailed {
                    record_id,
                    source: error,
                })
            }
            SubmitOutcome::Completed { .. } | SubmitOutcome::AlreadySubmitted { .. } => Ok(()),
        }
    }
}

/// Orchestrator for the run command
pub struct RunOrchestrator {
    config: OrchestratorConfig,
    options: RunOptions,
}

impl RunOrchestrator {
    pub fn new(config: OrchestratorConfig, options: RunOptions) -> Self {
        debug!("Creating run orchestrator with options: {options:?}");
        Self { config, options }
    }

    /// Execute the run and display the report
    pub async fn run(&self) -> Result<()> {
        let report = self.execute().await?;
        self.display(&report)?;
        report.into_result()?;
        Ok(())
    }

    /// Execute the run without printing anything
    pub async fn execute(&self) -> Result<RunReport> {
        let edits = self
            .options
            .edits
            .iter()
            .map(|edit| parse_edit(edit))
            .collect::<Result<Vec<_>, _>>()?;

        let params = self.load_params()?;
        let secondary = Arc::new(self.load_store()?);
        let primary = Arc::new(MemoryPrimaryStore::new());

        let mut orchestrator =
            RecordSyncOrchestrator::new(primary.clone(), secondary.clone(), self.config.clone())
                .context("Failed to create record sync orchestrator")?;

        orchestrator
            .initialize(Some(&params))
            .context("Failed to initialize draft from params")?;
        orchestrator.settle_lookups().await;

        let mut ignored_edits = Vec::new();
        let typed = self
            .options
            .subject
            .iter()
            .map(|value| ("subject".to_string(), value.clone()))
            .chain(
                self.options
                    .description
                    .iter()
                    .map(|value| ("description".to_string(), value.clone())),
            )
            .chain(edits);
        for (field, value) in typed {
            if !orchestrator.on_field_edit(&field, value) {
                warn!("Ignoring edit for unknown field '{field}'");
                ignored_edits.push(field);
            }
        }

        let outcome = orchestrator.save().await;
        let record_id = outcome.record_id().cloned();

        let create_request = match &record_id {
            Some(id) => primary.get(id).await,
            None => None,
        };
        let write_back = match &record_id {
            Some(id) => secondary.written(id).await,
            None => None,
        };

        let (status, error) = match &outcome {
            SubmitOutcome::CreateFailed(e) => (RunStatus::CreateFailed, Some(e.to_string())),
            SubmitOutcome::WriteBackFailed { error, .. } => {
                (RunStatus::WriteBackFailed, Some(error.to_string()))
            }
            SubmitOutcome::Completed { .. } | SubmitOutcome::AlreadySubmitted { .. } => {
                (RunStatus::Completed, None)
            }
        };

        Ok(RunReport {
            status,
            record_id,
            draft: orchestrator.draft().clone(),
            enriched: orchestrator.enriched().clone(),
            create_request,
            write_back,
            ignored_edits,
            error,
            outcome,
        })
    }

    fn load_params(&self) -> Result<InitParams> {
        let path = &self.options.params_path;
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read params file: {}", path.display()))?;
        InitParams::from_json(&json)
            .with_context(|| format!("Invalid params file: {}", path.display()))
    }

    fn load_store(&self) -> Result<MemorySecondaryStore> {
        let path = &self.options.store_path;
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read store file: {}", path.display()))?;
        MemorySecondaryStore::from_json(&json)
            .with_context(|| format!("Invalid store file: {}", path.display()))
    }

    /// Print the report in the configured format
    pub fn display(&self, report: &RunReport) -> Result<()> {
        match self.options.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(report)?);
            }
            OutputFormat::Minimal => {
                if let Some(id) = &report.record_id {
                    println!("{id}");
                }
            }
            OutputFormat::Human => self.display_human(report)?,
        }
        Ok(())
    }

    fn display_human(&self, report: &RunReport) -> Result<()> {
        println!("{}", "Record Sync".cyan().bold());
        println!("{}", "===========".cyan());
        println!();

        println!("{}", "Enriched record:".bold());
        let enriched = &report.enriched;
        for (label, value) in [
            ("Contact", &enriched.contact_name),
            ("Account", &enriched.account_name),
            ("Subject", &enriched.subject),
            ("Description", &enriched.description),
        ] {
            println!("  {:<13}{}", format!("{label}:"), display_text(value));
        }

        for field in &report.ignored_edits {
            println!("  {} ignored edit for '{}'", "!".yellow(), field);
        }
        println!();

        match report.status {
            RunStatus::CreateFailed => {
                println!(
                    "{} {} not created: {}",
                    "✗".red(),
                    self.config.object_type,
                    report.error.as_deref().unwrap_or_default()
                );
                return Ok(());
            }
            RunStatus::Completed | RunStatus::WriteBackFailed => {}
        }

        if let (Some(id), Some(request)) = (&report.record_id, &report.create_request) {
            println!(
                "{} Created {} {}",
                "✓".green(),
                request.object_type,
                id.to_string().cyan()
            );
            println!("  {}", serde_json::to_string(&request.fields)?);
        }

        match (&report.status, &report.write_back) {
            (RunStatus::WriteBackFailed, _) => println!(
                "{} Write-back failed: {}",
                "✗".red(),
                report.error.as_deref().unwrap_or_default()
            ),
            (_, Some(payload)) => {
                println!("{} Written back", "✓".green());
                println!("  {}", serde_json::to_string(payload)?);
            }
            (_, None) => {}
        }

        Ok(())
    }
}

fn display_text(value: &Option<String>) -> String {
    match value {
        Some(text) => text.clone(),
        None => "-".dimmed().to_string(),
    }
}

/// Split a `FIELD=VALUE` edit
pub fn parse_edit(edit: &str) -> Result<(String, String), CliError> {
    match edit.split_once('=') {
        Some((field, value)) if !field.trim().is_empty() => {
            Ok((field.trim().to_string(), value.to_string()))
        }
        _ => Err(CliError::InvalidEdit(edit.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_edit() {
        assert_eq!(
            parse_edit("subject=Help").unwrap(),
            ("subject".to_string(), "Help".to_string())
        );
        assert_eq!(
            parse_edit("description=a=b").unwrap(),
            ("description".to_string(), "a=b".to_string())
        );
        assert_eq!(
            parse_edit("subject=").unwrap(),
            ("subject".to_string(), String::new())
        );
        assert!(parse_edit("subject").is_err());
        assert!(parse_edit("=Help").is_err());
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("human".parse::<OutputFormat>().unwrap(), OutputFormat::Human);
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!(
            "minimal".parse::<OutputFormat>().unwrap(),
            OutputFormat::Minimal
        );
        assert!(matches!(
            "csv".parse::<OutputFormat>(),
            Err(CliError::UnknownFormat(_))
        ));
    }
}
