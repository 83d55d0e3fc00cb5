use crate::cli::OutputFormat;
use crate::error::AppError;
use crate::orchestrator::{RunStatus, RunSummary};
use colored::Colorize;
use mirror_core::RepositoryDescriptor;
use serde::Serialize;

pub fn output_result<T: Serialize + Displayable>(result: &T, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            if let Ok(json) = serde_json::to_string_pretty(result) {
                println!("{}", json);
            }
        }
        OutputFormat::Text => {
            println!("{}", result.display());
        }
    }
}

pub fn output_list<T: Serialize + Displayable>(items: &[T], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            if let Ok(json) = serde_json::to_string_pretty(&items) {
                println!("{}", json);
            }
        }
        OutputFormat::Text => {
            for item in items {
                println!("{}", item.display());
            }
        }
    }
}

#[derive(Serialize)]
pub struct JsonError {
    pub error: bool,
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

pub fn output_error(err: &AppError, format: OutputFormat) {
    let message = match format {
        OutputFormat::Json => {
            let json_err = JsonError {
                error: true,
                code: err.code().to_string(),
                message: err.to_string(),
                hint: err.hint().map(str::to_string),
            };
            serde_json::to_string_pretty(&json_err)
                .unwrap_or_else(|_| format!(r#"{{"error": true, "message": "{}"}}"#, err))
        }
        OutputFormat::Text => {
            let mut text = format!("{}: {}", "Error".red().bold(), err);
            if let Some(hint) = err.hint() {
                text.push_str(&format!("\n{}: {}", "Hint".yellow(), hint));
            }
            text
        }
    };
    eprintln!("{}", message);
}

pub trait Displayable {
    fn display(&self) -> String;
}

impl Displayable for RepositoryDescriptor {
    fn display(&self) -> String {
        let visibility = self
            .visibility
            .clone()
            .unwrap_or_else(|| (if self.is_private { "private" } else { "public" }).to_string());

        let mut flags = Vec::new();
        if self.archived {
            flags.push("archived");
        }
        if self.fork {
            flags.push("fork");
        }

        let mut output = format!("{} {}", self.name.cyan().bold(), format!("[{}]", visibility).dimmed());
        if !flags.is_empty() {
            output.push_str(&format!(" {}", flags.join(", ").yellow()));
        }
        if let Some(branch) = &self.default_branch {
            output.push_str(&format!(" {} {}", "default:".dimmed(), branch));
        }
        if let Some(desc) = self.description.as_deref().filter(|d| !d.is_empty()) {
            output.push_str(&format!("\n  {}", desc));
        }
        output
    }
}

impl Displayable for RunSummary {
    fn display(&self) -> String {
        let title = if self.dry_run {
            "Migration summary (dry run)"
        } else {
            "Migration summary"
        };
        let status = match self.status() {
            RunStatus::Success => "completed".green().bold(),
            RunStatus::PartialFailure => "completed with failures".yellow().bold(),
        };

        let mut output = format!(
            "{} - {}\n  {}: {}\n  {}: {}\n  {}: {}",
            title.white().bold(),
            status,
            "Total".dimmed(),
            self.total,
            "Succeeded".dimmed(),
            self.succeeded.to_string().green(),
            "Failed".dimmed(),
            if self.failed > 0 {
                self.failed.to_string().red().to_string()
            } else {
                self.failed.to_string()
            }
        );

        if self.dry_run {
            output.push_str(&format!("\n  {}: {}", "Planned".dimmed(), self.planned));
        }
        if !self.skipped_organizations.is_empty() {
            output.push_str(&format!(
                "\n  {}: {}",
                "Skipped organizations".dimmed(),
                self.skipped_organizations.join(", ")
            ));
        }

        let failures: Vec<String> = self
            .failures()
            .map(|o| {
                format!(
                    "\n    {}/{} -> {}: {}",
                    o.source_org,
                    o.repository,
                    o.destination_org,
                    o.error.as_deref().unwrap_or("unknown error")
                )
            })
            .collect();
        if !failures.is_empty() {
            output.push_str(&format!("\n  {}:", "Failures".red()));
            output.push_str(&failures.concat());
        }

        output
    }
}
