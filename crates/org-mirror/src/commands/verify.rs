use crate::cli::{OutputFormat, Side};
use crate::config::Config;
use crate::error::AppError;
use crate::output::{output_result, Displayable};
use crate::verifier::verify_all;
use colored::Colorize;
use mirror_core::OrganizationPair;
use serde::Serialize;

use super::{client_for, optional_log};

#[derive(Serialize)]
struct VerifiedPairs {
    verified: bool,
    pairs: Vec<OrganizationPair>,
}

impl Displayable for VerifiedPairs {
    fn display(&self) -> String {
        let mut output = format!(
            "{} {} organization pair(s) verified",
            "OK".green().bold(),
            self.pairs.len()
        );
        for pair in &self.pairs {
            output.push_str(&format!("\n  {}", pair));
        }
        output
    }
}

pub fn handle_verify(config: &Config, format: OutputFormat) -> Result<(), AppError> {
    let pairs = config.organization_pairs()?;
    let source = client_for(config, Side::Source)?;
    let destination = client_for(config, Side::Destination)?;
    let mut log = optional_log(config, format)?;

    let report = verify_all(&pairs, &source, &destination, &mut log);
    if !report.passed() {
        return Err(AppError::Verification {
            failed: report.failed,
            checked: report.checked,
        });
    }

    output_result(
        &VerifiedPairs {
            verified: true,
            pairs,
        },
        format,
    );
    Ok(())
}
