// ── Configuration loading and plugin binding ──
//
// One figment (TOML file + UP_ env overlay) feeds every plugin. The
// binder walks plugins in a fixed order: core section, then inputs,
// then outputs. Unknown fields are ignored; missing fields get each
// plugin's defaults; the first unmarshal failure aborts binding.

use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Toml};
use figment::Figment;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::PollerError;
use crate::registry::Registry;

/// Environment prefix for config overrides (`UP_POLLER_DEBUG=true`).
pub const ENV_PREFIX: &str = "UP_";

/// Global poller settings from the `[poller]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PollerSection {
    #[serde(default)]
    pub debug: bool,
    #[serde(default)]
    pub quiet: bool,
    /// Reserved: the original loaded shared-object plugins from this
    /// list. All unipoll plugins are compiled in; a non-empty list is
    /// logged and ignored.
    #[serde(default)]
    pub plugins: Vec<String>,
}

/// The `ConfigLoader` behind every plugin's typed config blob.
pub struct ConfigLoader {
    figment: Figment,
    path: PathBuf,
}

impl ConfigLoader {
    /// Build a loader from the first existing file in a comma-separated
    /// path list, overlaid with `UP_`-prefixed environment variables.
    pub fn from_paths(paths: &str) -> Result<Self, PollerError> {
        let path = first_existing(paths).ok_or_else(|| {
            PollerError::NoConfigFile(paths.to_owned())
        })?;

        Ok(Self::from_file(&path))
    }

    /// Build a loader for one known config file.
    pub fn from_file(path: &Path) -> Self {
        let figment = Figment::new()
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("_"));

        Self {
            figment,
            path: path.to_owned(),
        }
    }

    /// The config file this loader reads.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Extract one plugin's typed section by name. A missing section
    /// yields the type's defaults; a malformed one is an error.
    pub fn section<T>(&self, key: &str) -> Result<T, PollerError>
    where
        T: DeserializeOwned + Default,
    {
        match self.figment.find_value(key) {
            Ok(_) => self
                .figment
                .extract_inner(key)
                .map_err(|e| PollerError::Config(format!("section [{key}]: {e}"))),
            Err(_) => Ok(T::default()),
        }
    }

    /// The core `[poller]` section.
    pub fn poller_section(&self) -> Result<PollerSection, PollerError> {
        let section: PollerSection = self.section("poller")?;

        if !section.plugins.is_empty() {
            warn!(
                plugins = ?section.plugins,
                "the [poller] plugins list is ignored; all plugins are compiled in"
            );
        }

        Ok(section)
    }

    /// Walk every registered plugin and bind its config section.
    /// Core first, then inputs, then outputs; first error aborts.
    pub fn bind_plugins(&self, registry: &Registry) -> Result<PollerSection, PollerError> {
        let section = self.poller_section()?;

        for entry in registry.inputs() {
            entry.input.configure(self)?;
        }

        for entry in registry.outputs() {
            entry.output.configure(self)?;
        }

        Ok(section)
    }
}

/// The first path in a comma-separated list that exists on disk.
fn first_existing(paths: &str) -> Option<PathBuf> {
    paths
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
        .find(|p| p.exists())
}

/// Default config file search list for this platform.
pub fn default_config_paths() -> String {
    if cfg!(target_os = "macos") {
        "/usr/local/etc/unipoll/up.conf,/etc/unipoll/up.conf,up.conf".to_owned()
    } else if cfg!(windows) {
        "C:\\ProgramData\\unipoll\\up.conf,up.conf".to_owned()
    } else {
        "/etc/unipoll/up.conf,/usr/local/etc/unipoll/up.conf,up.conf".to_owned()
    }
}

/// Resolve `file://` indirection on a secret value: the referenced file
/// is read and trimmed at startup. Non-`file://` values pass through.
pub fn resolve_secret(value: &str) -> Result<String, PollerError> {
    let Some(path) = value.strip_prefix("file://") else {
        return Ok(value.to_owned());
    };

    std::fs::read_to_string(path)
        .map(|s| s.trim().to_owned())
        .map_err(|e| PollerError::Config(format!("reading secret file {path}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[derive(Debug, Default, Deserialize)]
    struct FakeSinkConfig {
        #[serde(default)]
        url: String,
        #[serde(default)]
        disable: bool,
    }

    fn write_config(body: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().expect("tempfile");
        f.write_all(body.as_bytes()).expect("write config");
        f
    }

    #[test]
    fn sections_bind_with_defaults_for_missing_fields() {
        let f = write_config(
            "[poller]\ndebug = true\n\n[fakesink]\nurl = \"http://localhost:1234\"\n",
        );
        let loader = ConfigLoader::from_file(f.path());

        let poller = loader.poller_section().expect("poller section");
        assert!(poller.debug);
        assert!(!poller.quiet);

        let sink: FakeSinkConfig = loader.section("fakesink").expect("sink section");
        assert_eq!(sink.url, "http://localhost:1234");
        assert!(!sink.disable);
    }

    #[test]
    fn missing_section_yields_defaults() {
        let f = write_config("[poller]\n");
        let loader = ConfigLoader::from_file(f.path());

        let sink: FakeSinkConfig = loader.section("nosuch").expect("defaults");
        assert_eq!(sink.url, "");
    }

    #[test]
    fn malformed_section_is_an_error() {
        let f = write_config("[fakesink]\ndisable = \"not a bool\"\n");
        let loader = ConfigLoader::from_file(f.path());

        assert!(loader.section::<FakeSinkConfig>("fakesink").is_err());
    }

    #[test]
    fn first_existing_file_wins() {
        let f = write_config("[poller]\n");
        let list = format!("/nonexistent/up.conf,{}", f.path().display());
        let loader = ConfigLoader::from_paths(&list).expect("loader");
        assert_eq!(loader.path(), f.path());
    }

    #[test]
    fn missing_all_files_is_an_error() {
        assert!(ConfigLoader::from_paths("/no/such/file.conf").is_err());
    }

    #[test]
    fn file_secret_indirection_is_trimmed() {
        let mut f = tempfile::NamedTempFile::new().expect("tempfile");
        f.write_all(b"  hunter2\n").expect("write");

        let resolved = resolve_secret(&format!("file://{}", f.path().display())).expect("secret");
        assert_eq!(resolved, "hunter2");

        assert_eq!(resolve_secret("plain").expect("plain"), "plain");
    }
}
