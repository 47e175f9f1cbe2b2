//! Rendering of JBST placeholder containers and their binding scripts.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::app::data_block::render_data_block;
use crate::app::script::{escape_attr, js_string_literal, script_block, script_safe_json};
use crate::app::startup::StartupScripts;
use crate::domain::errors::BindingError;
use crate::domain::identifier::is_valid_identifier;
use crate::domain::model::{BindingDescriptor, RenderedBinding, ScriptPlacement};
use crate::infra::config::Config;

const DEFAULT_BIND_FUNCTION: &str = "JsonFx.Bindings.replace";
const DEFAULT_CONTAINER_TAG: &str = "div";
const DEFAULT_SCRIPT_TYPE: &str = "text/javascript";

/// Ids usable verbatim both as an attribute value and as a `#id` selector.
static ELEMENT_ID_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_-]*$").unwrap());

/// Data literal used when neither inline data nor a data expression is supplied.
const EMPTY_DATA: &str = "{}";

/// Page-wide rendering options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub bind_function: String,
    pub container_tag: String,
    pub script_type: String,
    pub pretty: bool,
    pub placement: ScriptPlacement,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            bind_function: DEFAULT_BIND_FUNCTION.to_owned(),
            container_tag: DEFAULT_CONTAINER_TAG.to_owned(),
            script_type: DEFAULT_SCRIPT_TYPE.to_owned(),
            pretty: false,
            placement: ScriptPlacement::Inline,
        }
    }
}

impl RenderOptions {
    /// Build options from configuration, falling back to defaults for unusable values.
    pub fn from_config(config: &Config) -> Self {
        let render = &config.render;

        let mut bind_function = render.bind_function();
        if !is_valid_identifier(&bind_function, true) {
            tracing::warn!(bind_function = %bind_function, "invalid bind function, using default");
            bind_function = DEFAULT_BIND_FUNCTION.to_owned();
        }

        let mut container_tag = render.container_tag().to_ascii_lowercase();
        if container_tag.is_empty() || !container_tag.chars().all(|c| c.is_ascii_alphanumeric()) {
            tracing::warn!(tag = %container_tag, "invalid container tag, using default");
            container_tag = DEFAULT_CONTAINER_TAG.to_owned();
        }

        let placement = render.placement().parse::<ScriptPlacement>().unwrap_or_else(|err| {
            tracing::warn!(error = %err, "invalid placement, using default");
            ScriptPlacement::default()
        });

        Self {
            bind_function,
            container_tag,
            script_type: render.script_type(),
            pretty: render.pretty(),
            placement,
        }
    }
}

/// Produces container markup and binding statements for [`BindingDescriptor`]s.
#[derive(Debug, Clone, Default)]
pub struct BindingRenderer {
    options: RenderOptions,
}

impl BindingRenderer {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(RenderOptions::from_config(config))
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Render using the configured default placement.
    pub fn render(
        &self,
        descriptor: &BindingDescriptor,
        element_id: &str,
        children: &str,
    ) -> Result<RenderedBinding, BindingError> {
        self.render_with(descriptor, element_id, children, self.options.placement)
    }

    /// Render `descriptor` into a container identified by `element_id`, wrapping `children` as
    /// the markup shown until the client binds the template.
    ///
    /// Nothing is produced if the descriptor has no name or the id is unusable.
    pub fn render_with(
        &self,
        descriptor: &BindingDescriptor,
        element_id: &str,
        children: &str,
        placement: ScriptPlacement,
    ) -> Result<RenderedBinding, BindingError> {
        if descriptor.name().is_empty() {
            return Err(BindingError::EmptyName);
        }
        let element_id = validate_element_id(element_id)?;

        let pretty = descriptor.pretty.unwrap_or(self.options.pretty);
        let data_block =
            render_data_block(&descriptor.data_items, &self.options.script_type, pretty)?;
        let script = self.binding_statement(descriptor, element_id, pretty)?;

        let tag = &self.options.container_tag;
        let mut markup = format!("<{tag} id=\"{}\">", escape_attr(element_id));
        markup.push_str(children);
        markup.push_str(&data_block);
        markup.push_str(&format!("</{tag}>"));

        if placement == ScriptPlacement::Inline {
            markup.push_str(&script_block(&self.options.script_type, &script));
        }

        tracing::debug!(
            name = %descriptor.name(),
            id = %element_id,
            placement = %placement,
            "rendered jbst binding"
        );

        Ok(RenderedBinding {
            markup,
            script,
            placement,
        })
    }

    /// Render with deferred placement and register the statement under `"{id}_init"`.
    pub fn render_into(
        &self,
        descriptor: &BindingDescriptor,
        element_id: &str,
        children: &str,
        scripts: &mut StartupScripts,
    ) -> Result<RenderedBinding, BindingError> {
        let rendered =
            self.render_with(descriptor, element_id, children, ScriptPlacement::Deferred)?;
        scripts.register(format!("{}_init", element_id.trim()), rendered.script.clone());
        Ok(rendered)
    }

    /// Emit the registry's statements using the configured script type.
    pub fn startup_block(&self, scripts: &StartupScripts) -> String {
        scripts.render(&self.options.script_type)
    }

    /// Build `bind("#id",Name,data[,(index)]);`.
    fn binding_statement(
        &self,
        descriptor: &BindingDescriptor,
        element_id: &str,
        pretty: bool,
    ) -> Result<String, BindingError> {
        let mut statement = String::new();
        statement.push_str(&self.options.bind_function);
        statement.push('(');
        statement.push_str(&js_string_literal(&format!("#{element_id}")));
        statement.push(',');
        statement.push_str(descriptor.name());
        statement.push(',');

        match (&descriptor.inline_data, descriptor.data.as_deref()) {
            (Some(value), _) if !value.is_null() => {
                statement.push_str(&script_safe_json(value, pretty)?)
            }
            (_, Some(expression)) if !expression.trim().is_empty() => {
                // literal or variable reference, passed through as-is
                statement.push('(');
                statement.push_str(expression);
                statement.push(')');
            }
            _ => statement.push_str(EMPTY_DATA),
        }

        if let Some(index) = descriptor.index() {
            statement.push_str(&format!(",({index})"));
        }
        statement.push_str(");");
        Ok(statement)
    }
}

fn validate_element_id(element_id: &str) -> Result<&str, BindingError> {
    let trimmed = element_id.trim();
    if trimmed.is_empty() {
        return Err(BindingError::EmptyElementId);
    }
    if !ELEMENT_ID_PATTERN.is_match(trimmed) {
        return Err(BindingError::InvalidElementId(trimmed.to_owned()));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn renderer() -> BindingRenderer {
        BindingRenderer::default()
    }

    #[test]
    fn empty_name_fails_before_output() {
        let descriptor = BindingDescriptor::default().with_data("items");
        let err = renderer()
            .render(&descriptor, "list", "<p>Loading</p>")
            .unwrap_err();
        assert!(matches!(err, BindingError::EmptyName));
    }

    #[test]
    fn empty_data_falls_back_to_object_literal() -> Result<(), BindingError> {
        let descriptor = BindingDescriptor::new("Example.list")?;
        let rendered = renderer().render(&descriptor, "list", "")?;
        assert_eq!(
            rendered.script,
            r##"JsonFx.Bindings.replace("#list",Example.list,{});"##
        );
        Ok(())
    }

    #[test]
    fn blank_data_expression_is_treated_as_absent() -> Result<(), BindingError> {
        let descriptor = BindingDescriptor::new("Foo")?.with_data("   ");
        let rendered = renderer().render(&descriptor, "x", "")?;
        assert!(rendered.script.ends_with(",Foo,{});"));
        Ok(())
    }

    #[test]
    fn raw_data_is_parenthesized() -> Result<(), BindingError> {
        let descriptor = BindingDescriptor::new("Foo")?.with_data("window.items");
        let rendered = renderer().render(&descriptor, "x", "")?;
        assert_eq!(
            rendered.script,
            r##"JsonFx.Bindings.replace("#x",Foo,(window.items));"##
        );
        Ok(())
    }

    #[test]
    fn inline_data_wins_over_raw_data() -> Result<(), BindingError> {
        let descriptor = BindingDescriptor::new("Foo")?
            .with_data("ignored")
            .with_inline_data(&json!({ "title": "Hi" }))?;
        let rendered = renderer().render(&descriptor, "x", "")?;
        assert_eq!(
            rendered.script,
            r##"JsonFx.Bindings.replace("#x",Foo,{"title":"Hi"});"##
        );
        Ok(())
    }

    #[test]
    fn index_is_appended_when_present() -> Result<(), BindingError> {
        let descriptor = BindingDescriptor::new("Foo")?.with_index(0);
        let rendered = renderer().render(&descriptor, "x", "")?;
        assert_eq!(
            rendered.script,
            r##"JsonFx.Bindings.replace("#x",Foo,{},(0));"##
        );

        let descriptor = descriptor.with_signed_index(-4);
        let rendered = renderer().render(&descriptor, "x", "")?;
        assert!(!rendered.script.contains(",("));
        Ok(())
    }

    #[test]
    fn inline_placement_wraps_children_and_appends_script() -> Result<(), BindingError> {
        let descriptor = BindingDescriptor::new("Foo")?;
        let rendered = renderer().render(&descriptor, "box", "<em>wait</em>")?;
        assert_eq!(
            rendered.markup,
            concat!(
                r#"<div id="box"><em>wait</em></div>"#,
                r##"<script type="text/javascript">JsonFx.Bindings.replace("#box",Foo,{});</script>"##
            )
        );
        assert_eq!(rendered.placement, ScriptPlacement::Inline);
        Ok(())
    }

    #[test]
    fn deferred_placement_registers_once() -> Result<(), BindingError> {
        let descriptor = BindingDescriptor::new("Foo")?;
        let mut scripts = StartupScripts::new();
        let renderer = renderer();

        let rendered = renderer.render_into(&descriptor, "box", "", &mut scripts)?;
        renderer.render_into(&descriptor, "box", "", &mut scripts)?;

        assert_eq!(rendered.markup, r#"<div id="box"></div>"#);
        assert_eq!(scripts.len(), 1);
        assert!(scripts.contains("box_init"));
        Ok(())
    }

    #[test]
    fn data_items_render_after_children() -> Result<(), BindingError> {
        let descriptor = BindingDescriptor::new("Foo")?.with_item("App.user", json!("ada"))?;
        let rendered = renderer().render_with(&descriptor, "x", "<p/>", ScriptPlacement::Deferred)?;
        assert_eq!(
            rendered.markup,
            concat!(
                r#"<div id="x"><p/><script type="text/javascript">"#,
                r#"if("undefined"===typeof App){window.App={};}App.user="ada";"#,
                r#"</script></div>"#
            )
        );
        Ok(())
    }

    #[test]
    fn element_id_is_escaped_and_validated() -> Result<(), BindingError> {
        let descriptor = BindingDescriptor::new("Foo")?;
        let renderer = renderer();

        assert!(matches!(
            renderer.render(&descriptor, "  ", ""),
            Err(BindingError::EmptyElementId)
        ));
        assert!(matches!(
            renderer.render(&descriptor, "a b", ""),
            Err(BindingError::InvalidElementId(_))
        ));

        for id in ["a.b", "a:b", "a#b", "a\"<b>", "1st", "-x"] {
            assert!(
                matches!(
                    renderer.render(&descriptor, id, ""),
                    Err(BindingError::InvalidElementId(_))
                ),
                "{id} should be rejected"
            );
        }

        let rendered = renderer.render(&descriptor, " row_1-a ", "")?;
        assert!(rendered.markup.starts_with(r#"<div id="row_1-a">"#));
        assert!(rendered.script.contains(r##""#row_1-a""##));
        Ok(())
    }

    #[test]
    fn null_inline_data_falls_back_to_data_expression() -> Result<(), BindingError> {
        let descriptor = BindingDescriptor::new("Foo")?
            .with_data("window.items")
            .with_inline_data(&None::<u32>)?;
        let rendered = renderer().render(&descriptor, "x", "")?;
        assert_eq!(
            rendered.script,
            r##"JsonFx.Bindings.replace("#x",Foo,(window.items));"##
        );

        let mut descriptor = BindingDescriptor::new("Foo")?;
        descriptor.inline_data = Some(serde_json::Value::Null);
        let rendered = renderer().render(&descriptor, "x", "")?;
        assert!(rendered.script.ends_with(",Foo,{});"));
        Ok(())
    }

    #[test]
    fn large_signed_index_is_kept() -> Result<(), BindingError> {
        let descriptor = BindingDescriptor::new("Foo")?.with_signed_index(5_000_000_000);
        let rendered = renderer().render(&descriptor, "x", "")?;
        assert!(rendered.script.ends_with(",Foo,{},(5000000000));"));
        Ok(())
    }

    #[test]
    fn options_follow_configuration() {
        let config: Config = toml::from_str(
            r#"
[render]
bind_function = "alert(1)"
container_tag = "section"
placement = "deferred"
"#,
        )
        .unwrap();
        let options = RenderOptions::from_config(&config);
        assert_eq!(options.bind_function, DEFAULT_BIND_FUNCTION);
        assert_eq!(options.container_tag, "section");
        assert_eq!(options.placement, ScriptPlacement::Deferred);
    }
}
