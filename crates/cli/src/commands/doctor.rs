use aptscout_core::config::AppConfig;
use aptscout_inventory::ListingStore;
use serde::Serialize;

use crate::commands::{load_config, CommandResult};

pub const EXIT_NOT_READY: u8 = 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

pub fn run(json_output: bool) -> CommandResult {
    let report = build_report();
    let exit_code = if report.overall_status == CheckStatus::Pass { 0 } else { EXIT_NOT_READY };

    if json_output {
        let output = serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                escape_json(&error.to_string())
            )
        });
        return CommandResult::raw(exit_code, output);
    }

    CommandResult::raw(exit_code, render_human(&report))
}

fn build_report() -> DoctorReport {
    let mut checks = Vec::new();

    match load_config() {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            });
            checks.push(check_dataset(&config));
            checks.push(check_maps_credential(&config));
            checks.push(check_maps_command(&config));
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            for name in ["dataset_availability", "maps_credential", "maps_command"] {
                checks.push(DoctorCheck {
                    name,
                    status: CheckStatus::Skipped,
                    details: "skipped because configuration did not load".to_string(),
                });
            }
        }
    }

    let all_pass = checks.iter().all(|check| check.status == CheckStatus::Pass);
    let overall_status = if all_pass { CheckStatus::Pass } else { CheckStatus::Fail };
    let summary = if all_pass {
        "doctor: all readiness checks passed".to_string()
    } else {
        "doctor: one or more readiness checks failed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

fn check_dataset(config: &AppConfig) -> DoctorCheck {
    let path = &config.dataset.path;
    let (status, details) = match ListingStore::load(path) {
        Ok(store) if store.is_empty() => {
            (CheckStatus::Fail, format!("`{}` contains no usable listings", path.display()))
        }
        Ok(store) => (
            CheckStatus::Pass,
            format!("{} listings loaded from `{}`", store.len(), path.display()),
        ),
        Err(error) => (CheckStatus::Fail, error.to_string()),
    };

    DoctorCheck { name: "dataset_availability", status, details }
}

fn check_maps_credential(config: &AppConfig) -> DoctorCheck {
    if config.maps_credential_missing() {
        return DoctorCheck {
            name: "maps_credential",
            status: CheckStatus::Fail,
            details: "no maps API key; set APTSCOUT_MAPS_API_KEY or GOOGLE_MAPS_API_KEY"
                .to_string(),
        };
    }

    DoctorCheck {
        name: "maps_credential",
        status: CheckStatus::Pass,
        details: format!("key present, passed to the maps server as `{}`", config.maps.api_key_env),
    }
}

fn check_maps_command(config: &AppConfig) -> DoctorCheck {
    match which::which(&config.maps.command) {
        Ok(resolved) => DoctorCheck {
            name: "maps_command",
            status: CheckStatus::Pass,
            details: format!("`{}` resolves to `{}`", config.maps.command, resolved.display()),
        },
        Err(error) => DoctorCheck {
            name: "maps_command",
            status: CheckStatus::Fail,
            details: format!("`{}` is not runnable: {error}", config.maps.command),
        },
    }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = Vec::new();
    lines.push(report.summary.clone());

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}

fn escape_json(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
