use clap::{Args, Parser, Subcommand};
use vtx_core::Entity;

pub mod global;

pub use global::{GlobalFlags, OutputFormat};

/// Top-level CLI parser for the `vtx` binary.
#[derive(Debug, Parser)]
#[command(name = "vtx", version, about = "Look up indicators in Vertex")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Max nodes returned per entity (overrides `lookup.result_limit`)
    #[arg(short, long, global = true)]
    pub limit: Option<u32>,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl Cli {
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            limit: self.limit,
            quiet: self.quiet,
            verbose: self.verbose,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Look up one or more entities
    Lookup(LookupArgs),
    /// Check that the Vertex options are set
    Validate,
}

#[derive(Debug, Args)]
pub struct LookupArgs {
    /// Entities as `type:value`, e.g. `IPv4:1.2.3.4` or `domain:example.com`
    #[arg(required = true, value_parser = parse_entity)]
    pub entities: Vec<Entity>,

    /// Requests in flight at once (overrides `lookup.concurrency`)
    #[arg(long)]
    pub concurrency: Option<usize>,
}

/// Parse `type:value`. Only the first `:` separates, so IPv6 values survive.
pub fn parse_entity(raw: &str) -> Result<Entity, String> {
    let (kind, value) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected type:value, got '{raw}'"))?;
    let (kind, value) = (kind.trim(), value.trim());
    if kind.is_empty() || value.is_empty() {
        return Err(format!("expected type:value, got '{raw}'"));
    }
    Ok(Entity::new(kind, value))
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};
    use pretty_assertions::assert_eq;
    use vtx_core::EntityType;

    use super::{Cli, Commands, OutputFormat, parse_entity};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn lookup_parses_entities_and_globals() {
        let cli = Cli::try_parse_from([
            "vtx",
            "--format",
            "raw",
            "lookup",
            "IPv4:1.2.3.4",
            "domain:example.com",
            "--limit",
            "5",
        ])
        .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Raw);
        assert_eq!(cli.limit, Some(5));
        let Commands::Lookup(args) = cli.command else {
            panic!("expected lookup");
        };
        assert_eq!(args.entities.len(), 2);
        assert_eq!(args.entities[1].entity_type, EntityType::Domain);
    }

    #[test]
    fn lookup_requires_an_entity() {
        assert!(Cli::try_parse_from(["vtx", "lookup"]).is_err());
    }

    #[test]
    fn output_format_rejects_invalid_value() {
        assert!(Cli::try_parse_from(["vtx", "--format", "xml", "validate"]).is_err());
    }

    #[test]
    fn ipv6_value_keeps_its_colons() {
        let entity = parse_entity("IPv6:2001:db8::1").unwrap();
        assert_eq!(entity.entity_type, EntityType::IPv6);
        assert_eq!(entity.value, "2001:db8::1");
    }

    #[test]
    fn malformed_entities_are_rejected() {
        assert!(parse_entity("1.2.3.4").is_err());
        assert!(parse_entity("IPv4:").is_err());
        assert!(parse_entity(":1.2.3.4").is_err());
    }
}
