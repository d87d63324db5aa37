use std::path::Path;

use anyhow::Context;
use csvane_core::Config;

/// Loads the configuration file, if one was given, and applies the
/// command-line overrides on top of it.
pub fn resolve_config(
    path: Option<&Path>,
    separator: Option<char>,
    header: bool,
) -> anyhow::Result<Config> {
    let mut config = match path {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            Config::from_toml(&content).with_context(|| format!("parsing config {}", path.display()))?
        }
        None => Config::default(),
    };

    if let Some(separator) = separator {
        config.separator = separator;
    }
    if header {
        config.header = true;
    }

    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn flags_override_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "separator = \";\"\ncarriage_return = true").unwrap();

        let config = resolve_config(Some(file.path()), None, true).unwrap();
        assert_eq!(config.separator, ';');
        assert!(config.carriage_return);
        assert!(config.header);

        let config = resolve_config(Some(file.path()), Some('\t'), false).unwrap();
        assert_eq!(config.separator, '\t');
        assert!(!config.header);
    }

    #[test]
    fn defaults_without_file() {
        assert_eq!(resolve_config(None, None, false).unwrap(), Config::default());
    }

    #[test]
    fn invalid_override_rejected() {
        assert!(resolve_config(None, Some('#'), false).is_err());
    }
}
