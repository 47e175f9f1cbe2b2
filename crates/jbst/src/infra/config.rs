//! Configuration management utilities.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dirs_next::config_dir;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

static DEFAULT_CONFIG: Lazy<&'static str> =
    Lazy::new(|| include_str!("../../assets/default-config.toml"));
static DEFAULT_WORKSPACE_CONFIG_PATH: &str = ".jbst/config.toml";

/// Layered configuration loaded from defaults, user, workspace, and env.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub render: Render,
}

/// Settings shared by every binding the renderer emits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Render {
    #[serde(default)]
    bind_function: Option<String>,
    #[serde(default)]
    container_tag: Option<String>,
    #[serde(default)]
    script_type: Option<String>,
    #[serde(default)]
    pretty: Option<bool>,
    #[serde(default)]
    placement: Option<String>,
}

impl Render {
    fn default_bind_function() -> &'static str {
        "JsonFx.Bindings.replace"
    }

    fn default_container_tag() -> &'static str {
        "div"
    }

    fn default_script_type() -> &'static str {
        "text/javascript"
    }

    fn default_pretty() -> bool {
        false
    }

    fn default_placement() -> &'static str {
        "inline"
    }

    /// Client function invoked as `bind(selector, template, data[, index])`.
    pub fn bind_function(&self) -> String {
        self.bind_function
            .clone()
            .unwrap_or_else(|| Self::default_bind_function().to_owned())
    }

    pub fn container_tag(&self) -> String {
        self.container_tag
            .clone()
            .unwrap_or_else(|| Self::default_container_tag().to_owned())
    }

    pub fn script_type(&self) -> String {
        self.script_type
            .clone()
            .unwrap_or_else(|| Self::default_script_type().to_owned())
    }

    pub fn pretty(&self) -> bool {
        self.pretty.unwrap_or_else(Self::default_pretty)
    }

    pub fn placement(&self) -> String {
        self.placement
            .clone()
            .unwrap_or_else(|| Self::default_placement().to_owned())
    }
}

impl Default for Render {
    fn default() -> Self {
        Self {
            bind_function: Some(Self::default_bind_function().to_owned()),
            container_tag: Some(Self::default_container_tag().to_owned()),
            script_type: Some(Self::default_script_type().to_owned()),
            pretty: Some(Self::default_pretty()),
            placement: Some(Self::default_placement().to_owned()),
        }
    }
}

/// Environment overrides for critical settings.
#[derive(Debug, Default, Clone)]
pub struct EnvOverrides {
    bind_function: Option<String>,
    pretty: Option<String>,
    placement: Option<String>,
}

impl EnvOverrides {
    fn from_env() -> Self {
        Self {
            bind_function: env::var("JBST_BIND_FUNCTION").ok(),
            pretty: env::var("JBST_PRETTY").ok(),
            placement: env::var("JBST_PLACEMENT").ok(),
        }
    }

    #[cfg(test)]
    fn for_tests(bind_function: &str, pretty: &str) -> Self {
        Self {
            bind_function: Some(bind_function.to_owned()),
            pretty: Some(pretty.to_owned()),
            placement: None,
        }
    }
}

impl Config {
    /// Load configuration from defaults, user/global config, workspace config, and env overrides.
    pub fn load() -> Result<Self> {
        let env = EnvOverrides::from_env();
        let global = global_config_path();
        let workspace = workspace_config_path()?;
        Self::load_with_layers(global, workspace, env)
    }

    /// Load the built-in defaults plus an explicit config file, skipping discovery.
    pub fn load_from(path: &Path) -> Result<Self> {
        Self::load_with_layers(None, Some(path.to_path_buf()), EnvOverrides::from_env())
    }

    fn load_with_layers(
        global: Option<PathBuf>,
        workspace: Option<PathBuf>,
        env_overrides: EnvOverrides,
    ) -> Result<Self> {
        let mut layers: Vec<Config> = Vec::new();

        layers.push(Self::from_str(&DEFAULT_CONFIG)?);

        if let Some(global_path) = global.filter(|path| path.exists()) {
            layers.push(Self::from_file(&global_path)?);
        }

        if let Some(workspace_path) = workspace.filter(|path| path.exists()) {
            layers.push(Self::from_file(&workspace_path)?);
        }

        let merged = layers.into_iter().reduce(Config::merge).unwrap_or_default();
        apply_env_overrides(merged, env_overrides)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        Self::from_str(&data).with_context(|| format!("invalid config file: {}", path.display()))
    }

    fn from_str(contents: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(contents).with_context(|| "failed to parse TOML config".to_string())?;
        Ok(config)
    }

    fn merge(self, other: Self) -> Self {
        Self {
            render: merge_render(self.render, other.render),
        }
    }
}

fn merge_render(mut base: Render, overlay: Render) -> Render {
    if let Some(value) = overlay.bind_function {
        base.bind_function = Some(value);
    }
    if let Some(value) = overlay.container_tag {
        base.container_tag = Some(value);
    }
    if let Some(value) = overlay.script_type {
        base.script_type = Some(value);
    }
    if let Some(value) = overlay.pretty {
        base.pretty = Some(value);
    }
    if let Some(value) = overlay.placement {
        base.placement = Some(value);
    }
    base
}

fn global_config_path() -> Option<PathBuf> {
    config_dir().map(|base| base.join("jbst/config.toml"))
}

fn workspace_config_path() -> Result<Option<PathBuf>> {
    let cwd = env::current_dir()?;
    let root = find_repo_root(&cwd).unwrap_or(cwd);
    Ok(Some(root.join(DEFAULT_WORKSPACE_CONFIG_PATH)))
}

fn find_repo_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(".git").exists())
        .map(Path::to_path_buf)
}

fn apply_env_overrides(mut config: Config, env: EnvOverrides) -> Result<Config> {
    if let Some(bind_function) = env.bind_function {
        config.render.bind_function = Some(bind_function);
    }
    if let Some(pretty) = env.pretty {
        config.render.pretty = Some(parse_flag(&pretty).with_context(|| {
            format!("JBST_PRETTY must be a boolean flag, got '{pretty}'")
        })?);
    }
    if let Some(placement) = env.placement {
        config.render.placement = Some(placement);
    }
    Ok(config)
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
