//! Subcommands and their arguments.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use clap_complete::Shell;

use crate::domain::model::ScriptPlacement;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render a single JBST binding: placeholder container plus binding script
    Render(RenderArgs),

    /// Render a minijinja page template with the `jbst(...)` function available
    Page(PageArgs),

    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Script variable name of the JBST template (dotted paths allowed)
    #[arg(long)]
    pub name: String,

    /// Id of the placeholder container element
    #[arg(long)]
    pub id: String,

    /// Raw JavaScript literal or variable reference to bind
    #[arg(long)]
    pub data: Option<String>,

    /// JSON value to serialize inline; takes precedence over --data
    #[arg(long, conflicts_with = "inline_file")]
    pub inline: Option<String>,

    /// JSON or YAML file holding the value to serialize inline
    #[arg(long)]
    pub inline_file: Option<PathBuf>,

    /// Index passed as the third bind argument; negative values are ignored
    #[arg(long, allow_negative_numbers = true)]
    pub index: Option<i64>,

    /// Markup shown inside the container until the template is bound
    #[arg(long, default_value = "")]
    pub children: String,

    /// Where the binding script goes; defaults to the configured placement
    #[arg(long, value_enum)]
    pub placement: Option<ScriptPlacement>,

    /// Pretty-print inline data
    #[arg(long, overrides_with = "no_pretty")]
    pub pretty: bool,

    /// Compact inline data even when the config enables pretty-printing
    #[arg(long, overrides_with = "pretty")]
    pub no_pretty: bool,

    /// Extra data item emitted as a script variable, as KEY=JSON (repeatable)
    #[arg(long = "item", value_name = "KEY=JSON")]
    pub items: Vec<String>,
}

#[derive(Args, Debug)]
pub struct PageArgs {
    /// Template file to render
    pub template: PathBuf,

    /// JSON or YAML file providing the template context
    #[arg(long)]
    pub context: Option<PathBuf>,
}
