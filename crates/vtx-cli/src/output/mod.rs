use serde::Serialize;

use crate::cli::OutputFormat;

/// Render a serializable response to a string in the requested format.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Raw => Ok(serde_json::to_string(value)?),
    }
}

/// Print a serializable response in the requested format.
pub fn output<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render(value, format)?;
    println!("{rendered}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use vtx_core::{Entity, LookupResult};

    #[test]
    fn raw_is_single_line() {
        let miss = LookupResult::miss(Entity::new("IPv4", "1.2.3.4"));
        let rendered = render(&[miss], OutputFormat::Raw).unwrap();
        assert!(!rendered.contains('\n'));
        assert!(rendered.contains("\"data\":null"));
    }

    #[test]
    fn json_is_pretty() {
        let miss = LookupResult::miss(Entity::new("IPv4", "1.2.3.4"));
        let pretty = render(&miss, OutputFormat::Json).unwrap();
        let raw = render(&miss, OutputFormat::Raw).unwrap();
        assert!(pretty.lines().count() > 1);
        assert_eq!(
            serde_json::from_str::<serde_json::Value>(&pretty).unwrap(),
            serde_json::from_str::<serde_json::Value>(&raw).unwrap()
        );
    }
}
