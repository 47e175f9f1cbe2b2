//! minijinja integration exposing a `jbst(...)` function to page templates.
//!
//! ```jinja
//! {{ jbst("App.views.list", id="items", inline=items, index=0, children="<p>Loading</p>") }}
//! ```

use std::sync::Arc;

use anyhow::{Result, anyhow};
use minijinja::value::{Kwargs, Value};
use minijinja::{Environment, Error, ErrorKind};
use serde::Serialize;

use crate::app::render::BindingRenderer;
use crate::domain::model::{BindingDescriptor, ScriptPlacement};

/// Register the `jbst` function on `env`, rendering through `renderer`.
///
/// Bindings are always written with inline script placement since a template has no startup
/// registry to hand deferred statements to.
pub fn register(env: &mut Environment<'_>, renderer: BindingRenderer) {
    let renderer = Arc::new(renderer);
    env.add_function("jbst", move |name: String, kwargs: Kwargs| {
        render_binding(&renderer, &name, &kwargs)
    });
}

/// Render a one-off template source with the `jbst` function available.
pub fn render_page<S: Serialize>(
    source: &str,
    context: S,
    renderer: BindingRenderer,
) -> Result<String> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    register(&mut env, renderer);
    env.render_str(source, context)
        .map_err(|err| anyhow!("failed to render page template: {err}"))
}

fn render_binding(
    renderer: &BindingRenderer,
    name: &str,
    kwargs: &Kwargs,
) -> Result<Value, Error> {
    let id: String = kwargs.get("id")?;
    let data: Option<String> = kwargs.get("data")?;
    let inline: Option<Value> = kwargs.get("inline")?;
    let index: Option<i64> = kwargs.get("index")?;
    let children: Option<String> = kwargs.get("children")?;
    let pretty: Option<bool> = kwargs.get("pretty")?;
    kwargs.assert_all_used()?;

    let mut descriptor = BindingDescriptor::new(name).map_err(|err| {
        tracing::warn!(name = %name, error = %err, "rejected jbst binding");
        invalid_operation(err)
    })?;
    descriptor.data = data;
    descriptor.pretty = pretty;
    if let Some(index) = index {
        descriptor.set_signed_index(index);
    }
    if let Some(inline) = inline.filter(|value| !value.is_none() && !value.is_undefined()) {
        descriptor = descriptor
            .with_inline_data(&inline)
            .map_err(invalid_operation)?;
    }

    let rendered = renderer
        .render_with(
            &descriptor,
            &id,
            children.as_deref().unwrap_or_default(),
            ScriptPlacement::Inline,
        )
        .map_err(invalid_operation)?;

    Ok(Value::from_safe_string(rendered.markup))
}

fn invalid_operation(err: impl std::fmt::Display) -> Error {
    Error::new(ErrorKind::InvalidOperation, err.to_string())
}
