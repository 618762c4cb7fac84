use vtx_config::VtxConfig;
use vtx_lookup::VertexLookup;

use crate::cli::{GlobalFlags, LookupArgs};
use crate::output::output;

/// Handle `vtx lookup`.
pub async fn handle(
    args: &LookupArgs,
    flags: &GlobalFlags,
    mut config: VtxConfig,
) -> anyhow::Result<()> {
    if let Some(limit) = flags.limit {
        config.lookup.result_limit = limit;
    }
    if let Some(concurrency) = args.concurrency {
        config.lookup.concurrency = concurrency;
    }

    config.require_vertex()?;
    let lookup = VertexLookup::from_config(&config)?;
    match lookup.do_lookup(&args.entities, &config.vertex).await {
        Ok(results) => output(&results, flags.format),
        Err(report) => {
            output(&report, flags.format)?;
            anyhow::bail!("{}: {}", report.kind, report.detail)
        }
    }
}
