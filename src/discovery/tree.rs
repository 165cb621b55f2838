//! Hierarchical view of the template registry, for the generated index page.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::discovery::templates::TemplateRecord;

/// A folder (no record) or a template leaf, children sorted by name.
#[derive(Debug, Default, Serialize)]
pub struct TemplateTree<'a> {
    pub name: String,
    #[serde(skip)]
    pub template: Option<&'a TemplateRecord>,
    pub children: BTreeMap<String, TemplateTree<'a>>,
}

impl<'a> TemplateTree<'a> {
    fn node(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn build<I>(templates: I) -> Self
    where
        I: IntoIterator<Item = &'a TemplateRecord>,
    {
        let mut root = Self::node("");
        for template in templates {
            let mut current = &mut root;
            for part in template.name.split('/') {
                current = current
                    .children
                    .entry(part.to_string())
                    .or_insert_with(|| Self::node(part));
            }
            current.template = Some(template);
        }
        root
    }

    pub fn is_folder(&self) -> bool {
        self.template.is_none()
    }

    pub fn template_name(&self) -> Option<&str> {
        self.template.map(|t| t.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn record(name: &str) -> TemplateRecord {
        TemplateRecord {
            name: name.into(),
            location: PathBuf::from(format!("{name}.html")),
            variants: Vec::new(),
        }
    }

    #[test]
    fn test_build_tree() {
        let records = vec![
            record("index"),
            record("events/list"),
            record("admin/users/edit"),
            record("events/detail"),
        ];
        let tree = TemplateTree::build(&records);

        assert!(tree.is_folder());
        let top: Vec<&str> = tree.children.keys().map(String::as_str).collect();
        assert_eq!(top, vec!["admin", "events", "index"]);

        let events = &tree.children["events"];
        assert!(events.is_folder());
        let leaves: Vec<&str> = events.children.keys().map(String::as_str).collect();
        assert_eq!(leaves, vec!["detail", "list"]);
        assert_eq!(events.children["list"].template_name(), Some("events/list"));

        let edit = &tree.children["admin"].children["users"].children["edit"];
        assert!(!edit.is_folder());
        assert_eq!(tree.children["index"].template_name(), Some("index"));
    }

    #[test]
    fn test_folder_that_is_also_a_template() {
        let records = vec![record("docs"), record("docs/intro")];
        let tree = TemplateTree::build(&records);
        let docs = &tree.children["docs"];
        assert_eq!(docs.template_name(), Some("docs"));
        assert_eq!(docs.children.len(), 1);
    }
}
