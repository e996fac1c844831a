//! Shared CLI helpers — component paths and tree rendering.

use std::fmt::Write;

use anyhow::{bail, Result};
use colored::Colorize;

use keyconf_core::Configuration;

/// Add a dotted component path under `root`, creating missing levels.
///
/// `net.tls` adds `net` to `root` (unless present) and `tls` to `net`.
/// Returns the innermost component.
pub fn add_component_path(root: &Configuration, path: &str) -> Result<Configuration> {
    let mut node = root.clone();
    for name in path.split('.') {
        if name.is_empty() {
            bail!("invalid component path '{path}'");
        }
        node = match node.component(name) {
            Some(existing) => existing,
            None => {
                let created = Configuration::new();
                node.add_components([(name, created.clone())]);
                created
            }
        };
    }
    Ok(node)
}

/// Render a node: aliases, then settings, then each component indented
/// under a header. Keys are sorted.
pub fn render_tree(root: &Configuration) -> String {
    let mut out = String::new();
    render_node(root, 0, &mut out);
    out
}

fn render_node(node: &Configuration, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);

    let mut aliases: Vec<(String, String)> = node.aliases().into_iter().collect();
    aliases.sort();
    for (alias, target) in aliases {
        let line = format!("{alias} -> {target}");
        let _ = writeln!(out, "{indent}{}", line.dimmed());
    }

    for (key, value) in node.items() {
        let _ = writeln!(out, "{indent}{key} = {value}");
    }

    for name in node.component_names() {
        if let Some(component) = node.component(&name) {
            let header = format!("[{name}]");
            let _ = writeln!(out, "{indent}{}", header.cyan().bold());
            render_node(&component, depth + 1, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_add_component_path_nests() {
        let root = Configuration::new();
        let tls = add_component_path(&root, "net.tls").unwrap();
        let net = root.component("net").unwrap();
        assert!(Configuration::ptr_eq(&net.component("tls").unwrap(), &tls));
    }

    #[test]
    fn test_add_component_path_reuses_existing() {
        let root = Configuration::new();
        let first = add_component_path(&root, "net").unwrap();
        add_component_path(&root, "net.tls").unwrap();
        assert!(Configuration::ptr_eq(&root.component("net").unwrap(), &first));
        assert_eq!(root.component_names(), vec!["net"]);
    }

    #[test]
    fn test_add_component_path_rejects_empty_segment() {
        let root = Configuration::new();
        assert!(add_component_path(&root, "net..tls").is_err());
    }

    #[test]
    fn test_render_tree() {
        colored::control::set_override(false);
        let root = Configuration::new();
        add_component_path(&root, "sub").unwrap();
        root.set_aliases([("colour", "sub_leaf")]);
        root.configure([("stem", json!("brown")), ("sub_leaf", json!("green"))]);

        let rendered = render_tree(&root);
        assert_eq!(
            rendered,
            "colour -> sub_leaf\nstem = \"brown\"\n[sub]\n  leaf = \"green\"\n"
        );
    }
}
