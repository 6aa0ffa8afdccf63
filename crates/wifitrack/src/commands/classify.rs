//! Classify command: capability string -> security class.

use serde::Serialize;
use tabled::Tabled;

use wifitrack_core::SecurityClass;

use crate::cli::{ClassifyArgs, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;

#[derive(Debug, Serialize)]
struct Classification {
    capabilities: String,
    security: SecurityClass,
    requires_credentials: bool,
}

#[derive(Tabled)]
struct ClassificationRow {
    #[tabled(rename = "Capabilities")]
    capabilities: String,
    #[tabled(rename = "Security")]
    security: String,
    #[tabled(rename = "Credentials")]
    credentials: &'static str,
}

pub fn handle(args: &ClassifyArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let prefs = config::output_prefs(global)?;
    let results: Vec<Classification> = args
        .capabilities
        .iter()
        .map(|caps| {
            let security = SecurityClass::from_capabilities(caps);
            Classification {
                capabilities: caps.clone(),
                security,
                requires_credentials: security.requires_credentials(),
            }
        })
        .collect();

    let rendered = output::render_list(
        &prefs.format,
        &results,
        |c| ClassificationRow {
            capabilities: if c.capabilities.is_empty() {
                "(empty)".into()
            } else {
                c.capabilities.clone()
            },
            security: output::paint_security(c.security, prefs.color),
            credentials: if c.requires_credentials { "yes" } else { "no" },
        },
        |c| c.security.to_string(),
    );
    output::print_output(&rendered, global.quiet);
    Ok(())
}
