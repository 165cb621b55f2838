//! Generated listing page of all discovered templates.

use serde::Serialize;
use tera::{Context, Tera};
use url::form_urlencoded;

use crate::discovery::TemplateTree;
use crate::render::RenderError;
use crate::site::Site;

const INDEX_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>Templates</title>
    <style>
        body { font-family: sans-serif; margin: 2em; }
        li { list-style: none; margin: 0.2em 0; }
        .folder { font-weight: bold; }
        .variants a { font-size: 0.85em; margin-left: 0.5em; }
    </style>
</head>
<body>
    <h1>Templates</h1>
    {% if entries | length == 0 %}<p>No templates found.</p>{% endif %}
    <ul>
    {% for entry in entries %}
        <li style="padding-left: {{ entry.depth * 1.5 }}em">
        {% if entry.href %}<a href="{{ entry.href }}">{{ entry.name }}</a>{% else %}<span class="folder">{{ entry.name }}/</span>{% endif %}
        {% if entry.variants %}<span class="variants">{% for variant in entry.variants %}<a href="{{ variant.href }}">{{ variant.id }}</a>{% endfor %}</span>{% endif %}
        </li>
    {% endfor %}
    </ul>
</body>
</html>
"#;

/// One row of the listing.
#[derive(Debug, Serialize, PartialEq)]
pub struct IndexEntry {
    pub depth: usize,
    pub name: String,
    pub href: Option<String>,
    pub variants: Vec<VariantLink>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct VariantLink {
    pub id: String,
    pub href: String,
}

fn flatten(node: &TemplateTree<'_>, depth: usize, selector: &str, rows: &mut Vec<IndexEntry>) {
    for child in node.children.values() {
        let href = child.template_name().map(|name| format!("/{name}"));
        let variants = match (child.template, &href) {
            (Some(record), Some(href)) => record
                .variants
                .iter()
                .filter(|v| !v.is_default)
                .map(|v| VariantLink {
                    id: v.id.clone(),
                    href: format!(
                        "{href}?{}",
                        form_urlencoded::Serializer::new(String::new())
                            .append_pair(selector, &v.id)
                            .finish()
                    ),
                })
                .collect(),
            _ => Vec::new(),
        };
        rows.push(IndexEntry {
            depth,
            name: child.name.clone(),
            href,
            variants,
        });
        flatten(child, depth + 1, selector, rows);
    }
}

/// Listing rows in tree order.
pub fn index_entries(site: &Site) -> Vec<IndexEntry> {
    let tree = TemplateTree::build(site.templates().values());
    let mut rows = Vec::new();
    flatten(&tree, 0, site.config().model_selector(), &mut rows);
    rows
}

/// Render the generated index page.
pub fn render_index(site: &Site) -> Result<String, RenderError> {
    let mut context = Context::new();
    context.insert("entries", &index_entries(site));
    context.insert("model_selector", site.config().model_selector());
    Tera::one_off(INDEX_PAGE, &context, true).map_err(|e| RenderError::Render {
        template: "generated-index".to_string(),
        message: e.to_string(),
    })
}
