use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "dashctl.toml";
const DATE_PLACEHOLDER: &str = "{date}";

/// Launcher configuration. Every key is optional; the defaults match the
/// layout the reporting scripts expect when run from their own directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory the scripts run in and write their reports to.
    pub workdir: PathBuf,
    /// Program used to run the dashboard scripts.
    pub interpreter: String,
    pub cogs: GeneratorConfig,
    pub labor: GeneratorConfig,
    pub product_mix: GeneratorConfig,
    pub daily: DailyConfig,
    pub publish: PublishConfig,

    #[serde(skip)]
    base_dir: PathBuf,
    #[serde(skip)]
    source: PathBuf,
}

/// A script that writes one HTML report into the work directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    pub script: String,
    /// Report file name. Defaults to the script's stem with `.html`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report: Option<String>,
}

impl GeneratorConfig {
    fn new(script: &str) -> Self {
        Self {
            script: script.to_string(),
            report: None,
        }
    }

    pub fn report_name(&self) -> String {
        if let Some(report) = &self.report {
            return report.clone();
        }
        let stem = Path::new(&self.script)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.script.clone());
        format!("{stem}.html")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DailyConfig {
    pub script: String,
    pub report: String,
    pub email_script: String,
    pub email: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PublishConfig {
    /// Directory inside the publishing repository; publishing is disabled
    /// when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
    /// Name of the published copy. Defaults to the daily report's name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    pub remote: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    pub commit_message: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            workdir: PathBuf::from("."),
            interpreter: "python".to_string(),
            cogs: GeneratorConfig::new("cogs_dashboard.py"),
            labor: GeneratorConfig::new("labor_dashboard.py"),
            product_mix: GeneratorConfig::new("product_mix_analysis.py"),
            daily: DailyConfig::default(),
            publish: PublishConfig::default(),
            base_dir: PathBuf::from("."),
            source: PathBuf::from(DEFAULT_CONFIG_FILE),
        }
    }
}

impl Default for DailyConfig {
    fn default() -> Self {
        Self {
            script: "daily_dashboard.py".to_string(),
            report: "daily_dashboard.html".to_string(),
            email_script: "email_dashboard.py".to_string(),
            email: true,
        }
    }
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            dir: None,
            file_name: None,
            remote: "origin".to_string(),
            branch: None,
            commit_message: format!("Update daily dashboard {DATE_PLACEHOLDER}"),
        }
    }
}

impl Config {
    /// Load the configuration.
    ///
    /// An explicit `path` must exist. Without one, `./dashctl.toml` is used
    /// when present and the built-in defaults otherwise. Relative paths in
    /// the file resolve against the file's directory.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::from_file(default_path)
                } else {
                    tracing::debug!("no {DEFAULT_CONFIG_FILE} found, using defaults");
                    let mut config = Self::default();
                    config.base_dir = std::env::current_dir()?;
                    Ok(config)
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let mut config = Self::from_toml_str(&content).map_err(|message| Error::Config {
            path: path.to_path_buf(),
            message,
        })?;

        config.base_dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => std::env::current_dir()?,
        };
        config.source = path.to_path_buf();
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    fn from_toml_str(content: &str) -> std::result::Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// The configuration as TOML. Fails on paths that are not valid UTF-8.
    pub fn to_toml(&self) -> Result<String> {
        self.serialize_for(&self.source)
    }

    fn serialize_for(&self, path: &Path) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Write the default configuration to `path`, refusing to clobber an
    /// existing file unless `force` is set.
    pub fn write_default(path: &Path, force: bool) -> Result<()> {
        if path.exists() && !force {
            return Err(Error::ConfigExists(path.to_path_buf()));
        }
        let content = Self::default().serialize_for(path)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    pub fn workdir(&self) -> PathBuf {
        self.resolve(&self.workdir)
    }

    pub fn report_path(&self, generator: &GeneratorConfig) -> PathBuf {
        self.workdir().join(generator.report_name())
    }

    pub fn daily_report_path(&self) -> PathBuf {
        self.workdir().join(&self.daily.report)
    }

    pub fn publish_dir(&self) -> Option<PathBuf> {
        self.publish.dir.as_deref().map(|dir| self.resolve(dir))
    }

    pub fn publish_file_name(&self) -> &str {
        self.publish
            .file_name
            .as_deref()
            .unwrap_or(&self.daily.report)
    }

    pub fn state_dir(&self) -> PathBuf {
        self.workdir().join(".dashctl")
    }

    /// Commit message with `{date}` replaced by `date` (`YYYY-MM-DD`).
    pub fn commit_message(&self, date: chrono::NaiveDate) -> String {
        self.publish
            .commit_message
            .replace(DATE_PLACEHOLDER, &date.format("%Y-%m-%d").to_string())
    }

    #[cfg(test)]
    pub fn with_base_dir(mut self, base_dir: &Path) -> Self {
        self.base_dir = base_dir.to_path_buf();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_match_script_layout() {
        let config = Config::default();
        assert_eq!(config.interpreter, "python");
        assert_eq!(config.cogs.script, "cogs_dashboard.py");
        assert_eq!(config.cogs.report_name(), "cogs_dashboard.html");
        assert_eq!(config.labor.report_name(), "labor_dashboard.html");
        assert_eq!(config.product_mix.report_name(), "product_mix_analysis.html");
        assert_eq!(config.daily.script, "daily_dashboard.py");
        assert_eq!(config.daily.email_script, "email_dashboard.py");
        assert!(config.daily.email);
        assert!(config.publish.dir.is_none());
        assert_eq!(config.publish.remote, "origin");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml_str(
            r#"
interpreter = "python3"

[publish]
dir = "../site"
branch = "gh-pages"
"#,
        )
        .unwrap();

        assert_eq!(config.interpreter, "python3");
        assert_eq!(config.cogs.script, "cogs_dashboard.py");
        assert_eq!(config.publish.dir, Some(PathBuf::from("../site")));
        assert_eq!(config.publish.branch.as_deref(), Some("gh-pages"));
        assert_eq!(config.publish.remote, "origin");
    }

    #[test]
    fn test_generator_section_report_override() {
        let config = Config::from_toml_str(
            r#"
[labor]
script = "scripts/labor_dashboard.py"

[product_mix]
script = "product_mix_analysis.py"
report = "mix.html"
"#,
        )
        .unwrap();

        assert_eq!(config.labor.script, "scripts/labor_dashboard.py");
        assert_eq!(config.labor.report_name(), "labor_dashboard.html");
        assert_eq!(config.product_mix.report_name(), "mix.html");
        assert_eq!(config.cogs.script, "cogs_dashboard.py");
    }

    #[test]
    fn test_invalid_toml_reports_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("dashctl.toml");
        std::fs::write(&path, "interpreter = [").unwrap();

        match Config::from_file(&path) {
            Err(Error::Config { path: p, .. }) => assert_eq!(p, path),
            other => panic!("Expected Config error, got: {other:?}"),
        }
    }

    #[test]
    fn test_relative_paths_resolve_against_config_dir() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("dashctl.toml");
        std::fs::write(&path, "workdir = \"data\"\n[publish]\ndir = \"site\"\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.workdir(), temp_dir.path().join("data"));
        assert_eq!(
            config.daily_report_path(),
            temp_dir.path().join("data").join("daily_dashboard.html")
        );
        assert_eq!(config.publish_dir(), Some(temp_dir.path().join("site")));
        assert_eq!(config.state_dir(), temp_dir.path().join("data").join(".dashctl"));
    }

    #[test]
    fn test_publish_file_name_defaults_to_report() {
        let mut config = Config::default();
        assert_eq!(config.publish_file_name(), "daily_dashboard.html");

        config.publish.file_name = Some("index.html".to_string());
        assert_eq!(config.publish_file_name(), "index.html");
    }

    #[test]
    fn test_commit_message_substitutes_date() {
        let config = Config::default();
        let date = chrono::NaiveDate::from_ymd_opt(2026, 2, 3).unwrap();
        assert_eq!(config.commit_message(date), "Update daily dashboard 2026-02-03");
    }

    #[test]
    fn test_write_default_refuses_overwrite() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("dashctl.toml");

        Config::write_default(&path, false).unwrap();
        assert!(matches!(
            Config::write_default(&path, false),
            Err(Error::ConfigExists(_))
        ));
        Config::write_default(&path, true).unwrap();

        let written = Config::from_file(&path).unwrap();
        assert_eq!(written.daily.report, "daily_dashboard.html");
    }

    #[cfg(unix)]
    #[test]
    fn test_to_toml_rejects_non_utf8_path() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let mut config = Config::default();
        config.workdir = PathBuf::from(OsStr::from_bytes(b"data-\xff"));

        match config.to_toml() {
            Err(Error::Config { path, .. }) => assert_eq!(path, Path::new(DEFAULT_CONFIG_FILE)),
            other => panic!("Expected Config error, got: {other:?}"),
        }
    }

    #[test]
    fn test_to_toml_round_trips_defaults() {
        let text = Config::default().to_toml().unwrap();
        let parsed = Config::from_toml_str(&text).unwrap();
        assert_eq!(parsed.labor.script, "labor_dashboard.py");
        assert_eq!(parsed.publish.remote, "origin");
    }
}
