//! Page-level registry for binding scripts that run after the page markup.

use std::collections::HashSet;

use crate::app::script::script_block;

/// Ordered collection of startup statements keyed by a unique name.
#[derive(Debug, Clone, Default)]
pub struct StartupScripts {
    keys: HashSet<String>,
    scripts: Vec<(String, String)>,
}

impl StartupScripts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `script` under `key`. Returns `false` when the key was already taken, in which
    /// case the earlier script is kept.
    pub fn register(&mut self, key: impl Into<String>, script: impl Into<String>) -> bool {
        let key = key.into();
        if !self.keys.insert(key.clone()) {
            tracing::debug!(key = %key, "startup script already registered");
            return false;
        }
        self.scripts.push((key, script.into()));
        true
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn len(&self) -> usize {
        self.scripts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scripts.is_empty()
    }

    /// Statements in registration order.
    pub fn scripts(&self) -> impl Iterator<Item = &str> {
        self.scripts.iter().map(|(_, script)| script.as_str())
    }

    /// Emit all registered statements as one `<script>` block, or nothing if empty.
    pub fn render(&self, script_type: &str) -> String {
        if self.scripts.is_empty() {
            return String::new();
        }
        let body = self.scripts().collect::<Vec<_>>().join("\n");
        script_block(script_type, &body)
    }
}
