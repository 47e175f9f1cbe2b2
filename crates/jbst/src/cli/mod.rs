//! Command line front end for rendering bindings and page templates.

pub mod commands;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use serde_json::Value;

use crate::app::render::BindingRenderer;
use crate::app::startup::StartupScripts;
use crate::domain::model::{BindingDescriptor, ScriptPlacement};
use crate::infra::config::Config;
use crate::infra::templates;
use commands::{Commands, PageArgs, RenderArgs};

#[derive(Parser, Debug)]
#[command(name = "jbst", version, about = "Render JBST placeholders and client binding scripts")]
pub struct Cli {
    /// Config file to use instead of the user and workspace config files
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let config = match &self.config {
            Some(path) => Config::load_from(path)?,
            None => Config::load()?,
        };
        let renderer = BindingRenderer::from_config(&config);

        match self.command {
            Commands::Render(args) => {
                print!("{}", run_render(&renderer, args)?);
                Ok(())
            }
            Commands::Page(args) => {
                print!("{}", run_page(renderer, args)?);
                Ok(())
            }
            Commands::Completions { shell } => {
                let mut command = Cli::command();
                clap_complete::generate(shell, &mut command, "jbst", &mut io::stdout());
                Ok(())
            }
        }
    }
}

fn run_render(renderer: &BindingRenderer, args: RenderArgs) -> Result<String> {
    let mut descriptor = BindingDescriptor::new(&args.name)?;
    descriptor.data = args.data;
    descriptor.pretty = match (args.pretty, args.no_pretty) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    };
    if let Some(index) = args.index {
        descriptor.set_signed_index(index);
    }

    if let Some(inline) = &args.inline {
        let value: Value =
            serde_json::from_str(inline).context("--inline must be a valid JSON value")?;
        descriptor.inline_data = Some(value).filter(|value| !value.is_null());
    } else if let Some(path) = &args.inline_file {
        descriptor.inline_data = Some(read_data_file(path)?).filter(|value| !value.is_null());
    }

    for item in &args.items {
        let (key, json) = item
            .split_once('=')
            .with_context(|| format!("data item '{item}' must look like KEY=JSON"))?;
        let value: Value = serde_json::from_str(json)
            .with_context(|| format!("data item '{key}' is not valid JSON"))?;
        descriptor.data_items.insert(key, value)?;
    }

    let placement = args.placement.unwrap_or(renderer.options().placement);
    let mut output = match placement {
        ScriptPlacement::Inline => {
            renderer
                .render_with(&descriptor, &args.id, &args.children, placement)?
                .markup
        }
        ScriptPlacement::Deferred => {
            let mut scripts = StartupScripts::new();
            let rendered =
                renderer.render_into(&descriptor, &args.id, &args.children, &mut scripts)?;
            format!("{}\n{}", rendered.markup, renderer.startup_block(&scripts))
        }
    };
    output.push('\n');
    Ok(output)
}

fn run_page(renderer: BindingRenderer, args: PageArgs) -> Result<String> {
    let source = fs::read_to_string(&args.template)
        .with_context(|| format!("failed to read template {}", args.template.display()))?;
    let context = match &args.context {
        Some(path) => read_data_file(path)?,
        None => Value::Object(Default::default()),
    };
    templates::render_page(&source, context, renderer)
}

/// Load a JSON or YAML document, picking the format from the file extension.
pub fn read_data_file(path: &Path) -> Result<Value> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read data file {}", path.display()))?;
    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

    if is_yaml {
        serde_yaml::from_str(&contents)
            .with_context(|| format!("invalid YAML in {}", path.display()))
    } else {
        serde_json::from_str(&contents)
            .with_context(|| format!("invalid JSON in {}", path.display()))
    }
}
