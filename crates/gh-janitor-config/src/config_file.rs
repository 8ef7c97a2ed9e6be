use crate::error::ConfigError;
use crate::paths::{config_candidates, CONFIG_ENV_VAR};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// A config file found on disk
#[derive(Debug, Clone)]
pub struct ConfigSource {
    pub path: PathBuf,
    pub content: String,
}

/// Locate and read the config file
///
/// Searches in:
/// 1. The file named by `GH_ISSUE_JANITOR_CONFIG` (must exist if set)
/// 2. `.gh-issue-janitor.toml` in the current working directory
/// 3. `~/.gh-issue-janitor.toml`
/// 4. `<config dir>/gh-issue-janitor/config.toml`
///
/// Returns `Ok(None)` if no file exists.
pub fn load_config_file() -> Result<Option<ConfigSource>, ConfigError> {
    let explicit = std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from);
    load_config_file_from(explicit.as_deref(), &config_candidates())
}

/// Read `explicit` if given, else the first existing file of `candidates`
///
/// A missing candidate is skipped; one that exists but can't be read is an
/// error, as is a missing explicit file.
pub fn load_config_file_from(
    explicit: Option<&Path>,
    candidates: &[PathBuf],
) -> Result<Option<ConfigSource>, ConfigError> {
    if let Some(path) = explicit {
        let content = read(path)?;
        log::debug!("Loaded config from {} ({})", path.display(), CONFIG_ENV_VAR);
        return Ok(Some(ConfigSource {
            path: path.to_path_buf(),
            content,
        }));
    }

    for path in candidates {
        match read(path) {
            Ok(content) => {
                log::debug!("Loaded config from {}", path.display());
                return Ok(Some(ConfigSource {
                    path: path.clone(),
                    content,
                }));
            }
            Err(ConfigError::Read { source, .. }) if source.kind() == ErrorKind::NotFound => {
                log::debug!("No config at {}", path.display());
            }
            Err(e) => return Err(e),
        }
    }

    Ok(None)
}

fn read(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_explicit_file_wins() {
        let dir = TempDir::new().unwrap();
        let explicit = write(&dir, "explicit.toml", "org = \"explicit\"");
        let local = write(&dir, "local.toml", "org = \"local\"");

        let source = load_config_file_from(Some(&explicit), &[local])
            .unwrap()
            .unwrap();

        assert_eq!(source.path, explicit);
        assert_eq!(source.content, "org = \"explicit\"");
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let local = write(&dir, "local.toml", "org = \"local\"");
        let missing = dir.path().join("missing.toml");

        let err = load_config_file_from(Some(&missing), &[local]).unwrap_err();

        assert!(matches!(err, ConfigError::Read { ref path, .. } if *path == missing));
    }

    #[test]
    fn test_falls_back_through_candidates() {
        let dir = TempDir::new().unwrap();
        let home = write(&dir, "home.toml", "org = \"home\"");
        let global = write(&dir, "global.toml", "org = \"global\"");
        let candidates = vec![dir.path().join("absent.toml"), home.clone(), global];

        let source = load_config_file_from(None, &candidates).unwrap().unwrap();

        assert_eq!(source.path, home);
    }

    #[test]
    fn test_no_file_found() {
        let dir = TempDir::new().unwrap();
        let candidates = vec![dir.path().join("a.toml"), dir.path().join("b.toml")];

        assert!(load_config_file_from(None, &candidates).unwrap().is_none());
    }

    #[test]
    fn test_unreadable_candidate_is_reported() {
        let dir = TempDir::new().unwrap();
        let not_a_file = dir.path().join("config.toml");
        fs::create_dir(&not_a_file).unwrap();
        let later = write(&dir, "later.toml", "org = \"later\"");

        let err = load_config_file_from(None, &[not_a_file.clone(), later]).unwrap_err();

        assert!(matches!(err, ConfigError::Read { ref path, .. } if *path == not_a_file));
    }
}
