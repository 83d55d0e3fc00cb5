use mirror_core::{MirrorError, OrganizationPair, RepositoryHost};
use std::fmt;

use crate::run_log::RunLog;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Source,
    Destination,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Source => f.write_str("source"),
            Role::Destination => f.write_str("destination"),
        }
    }
}

/// Outcome of checking every organization of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerificationReport {
    pub checked: usize,
    pub failed: usize,
}

impl VerificationReport {
    pub fn passed(&self) -> bool {
        self.failed == 0
    }
}

/// Check that `org` exists and is readable with the host's credential
pub fn verify_organization(
    host: &dyn RepositoryHost,
    org: &str,
    role: Role,
    log: &mut RunLog,
) -> bool {
    match host.get_organization(org) {
        Ok(found) => {
            log.success(format!(
                "Verified {} organization '{}' (id {})",
                role, found.login, found.id
            ));
            true
        }
        Err(MirrorError::NotFound(_)) => {
            log.error(format!(
                "{} organization '{}' not found or not visible to the {} token",
                capitalize(role),
                org,
                role
            ));
            false
        }
        Err(err) => {
            let status = err
                .status()
                .map(|s| s.to_string())
                .unwrap_or_else(|| "no status".to_string());
            log.error(format!(
                "Could not verify {} organization '{}' (HTTP {}): {}",
                role, org, status, err
            ));
            if let Some(hint) = err.hint() {
                log.error(format!("Hint: {}", hint));
            }
            false
        }
    }
}

/// Check both sides of every pair. Every organization is checked so a run
/// reports all bad mappings at once.
pub fn verify_all(
    pairs: &[OrganizationPair],
    source: &dyn RepositoryHost,
    destination: &dyn RepositoryHost,
    log: &mut RunLog,
) -> VerificationReport {
    let mut report = VerificationReport {
        checked: 0,
        failed: 0,
    };

    for pair in pairs {
        let checks = [
            (source, pair.source.as_str(), Role::Source),
            (destination, pair.destination.as_str(), Role::Destination),
        ];
        for (host, org, role) in checks {
            report.checked += 1;
            if !verify_organization(host, org, role, log) {
                report.failed += 1;
            }
        }
    }

    report
}

fn capitalize(role: Role) -> &'static str {
    match role {
        Role::Source => "Source",
        Role::Destination => "Destination",
    }
}
