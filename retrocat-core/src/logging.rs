use tracing_subscriber::filter::EnvFilter;

use crate::errors::{CatalogError, Result};

// Crate targets that follow the requested level; everything else stays at `warn`.
const CATALOG_TARGETS: &[&str] = &["retrocat", "retrocat_core", "retrocat_protocol", "retrocat_listing"];

/// Installs the stderr subscriber used by the `retrocat` binary.
///
/// `level` applies to the catalog crates only, so reqwest and hyper stay
/// quiet. A `RUST_LOG` value replaces the whole directive.
pub fn init_tracing(level: Option<&str>) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(catalog_directives(level.unwrap_or("info")))
            .map_err(|err| CatalogError::ConfigError(format!("invalid log level: {err}")))?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(atty::is(atty::Stream::Stderr))
        .compact()
        .try_init()
        .map_err(|err| CatalogError::GeneralError(err.to_string()))
}

fn catalog_directives(level: &str) -> String {
    let mut directives = String::from("warn");
    for target in CATALOG_TARGETS {
        directives.push_str(&format!(",{target}={level}"));
    }
    directives
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_is_scoped_to_catalog_crates() {
        let directives = catalog_directives("debug");
        assert!(directives.starts_with("warn,"));
        assert!(directives.contains("retrocat_listing=debug"));
        assert!(directives.contains(",retrocat=debug"));
        assert!(EnvFilter::try_new(directives).is_ok());
    }
}
