//! Name command - print the secret name for a service.

use crate::core::config::Settings;
use crate::error::Result;

/// Print the resolved secret name. Plain stdout so it can be captured in
/// scripts.
pub fn execute(settings: &Settings, service: &str) -> Result<()> {
    // Same validation as the configured list.
    let settings = settings.clone().with_services([service])?;
    let service = &settings.services()[0];

    println!("{}", settings.secret_id(service));
    Ok(())
}
