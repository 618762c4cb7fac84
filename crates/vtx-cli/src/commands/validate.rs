use serde_json::json;
use vtx_config::VtxConfig;

use crate::cli::GlobalFlags;
use crate::output::output;

/// Handle `vtx validate`.
pub fn handle(flags: &GlobalFlags, config: &VtxConfig) -> anyhow::Result<()> {
    let options = json!({
        "url": { "value": config.vertex.url },
        "username": { "value": config.vertex.username },
        "password": { "value": config.vertex.password },
    });
    let errors = vtx_lookup::validate_options(&options);
    output(&errors, flags.format)?;
    if !errors.is_empty() {
        anyhow::bail!("{} required option(s) missing", errors.len());
    }
    Ok(())
}
