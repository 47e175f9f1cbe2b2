//! Script block emitting named data items as client-side variables.

use std::collections::HashSet;

use crate::app::script::{script_block, script_safe_json};
use crate::domain::errors::BindingError;
use crate::domain::model::DataItems;

/// Render `items` as a `<script>` block of variable assignments.
///
/// Dotted keys get their namespaces declared first, so `App.data.user` works even when `App`
/// does not exist yet on the page. Returns an empty string when there is nothing to emit.
pub fn render_data_block(
    items: &DataItems,
    script_type: &str,
    pretty: bool,
) -> Result<String, BindingError> {
    if items.is_empty() {
        return Ok(String::new());
    }

    let mut declared: HashSet<String> = HashSet::new();
    let mut statements = Vec::new();

    for (key, value) in items.iter() {
        let json = script_safe_json(value, pretty)?;
        let segments: Vec<&str> = key.split('.').collect();

        if segments.len() == 1 {
            statements.push(format!("var {key}={json};"));
            declared.insert(key.to_owned());
            continue;
        }

        for depth in 1..segments.len() {
            let namespace = segments[..depth].join(".");
            if !declared.insert(namespace.clone()) {
                continue;
            }
            if depth == 1 {
                statements.push(format!(
                    "if(\"undefined\"===typeof {namespace}){{window.{namespace}={{}};}}"
                ));
            } else {
                statements.push(format!(
                    "if(\"undefined\"===typeof {namespace}){{{namespace}={{}};}}"
                ));
            }
        }

        statements.push(format!("{key}={json};"));
    }

    let separator = if pretty { "\n" } else { "" };
    Ok(script_block(script_type, &statements.join(separator)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_items_render_nothing() {
        let rendered = render_data_block(&DataItems::new(), "text/javascript", false).unwrap();
        assert!(rendered.is_empty());
    }

    #[test]
    fn root_keys_are_declared_with_var() -> Result<(), BindingError> {
        let mut items = DataItems::new();
        items.insert("user", json!({ "id": 7 }))?;

        let rendered = render_data_block(&items, "text/javascript", false)?;
        assert_eq!(
            rendered,
            r#"<script type="text/javascript">var user={"id":7};</script>"#
        );
        Ok(())
    }

    #[test]
    fn nested_keys_declare_each_namespace_once() -> Result<(), BindingError> {
        let mut items = DataItems::new();
        items.insert("App.data.user", json!("ada"))?;
        items.insert("App.data.count", json!(2))?;

        let rendered = render_data_block(&items, "text/javascript", false)?;
        let body = rendered
            .strip_prefix(r#"<script type="text/javascript">"#)
            .and_then(|rest| rest.strip_suffix("</script>"))
            .expect("script wrapper");

        assert_eq!(
            body,
            concat!(
                r#"if("undefined"===typeof App){window.App={};}"#,
                r#"if("undefined"===typeof App.data){App.data={};}"#,
                r#"App.data.user="ada";"#,
                r#"App.data.count=2;"#,
            )
        );
        Ok(())
    }

    #[test]
    fn pretty_block_puts_statements_on_lines() -> Result<(), BindingError> {
        let mut items = DataItems::new();
        items.insert("a", json!(1))?;
        items.insert("b", json!(2))?;

        let rendered = render_data_block(&items, "text/javascript", true)?;
        assert!(rendered.contains("var a=1;\nvar b=2;"));
        Ok(())
    }
}
