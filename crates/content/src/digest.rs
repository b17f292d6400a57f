use crate::{ContentStore, LeafContent, NodeKind, TopicNode};

impl ContentStore {
    /// The whole document as one markdown text, leaves in tree order.
    ///
    /// Markdown leaves are emitted verbatim. Structured leaves become a
    /// `# Title` section followed by their description and `##` lists.
    pub fn markdown_digest(&self) -> String {
        let mut sections = Vec::new();
        for node in self.topics() {
            collect_sections(node, &mut sections);
        }
        sections.join("\n\n")
    }
}

fn collect_sections(node: &TopicNode, sections: &mut Vec<String>) {
    match &node.kind {
        NodeKind::Parent { children, .. } => {
            for child in children {
                collect_sections(child, sections);
            }
        }
        NodeKind::Leaf(LeafContent::Markdown(body)) => sections.push(body.trim_end().to_string()),
        NodeKind::Leaf(LeafContent::Structured(structured)) => {
            sections.push(format!(
                "# {}\n{}",
                node.title,
                structured.description.as_deref().unwrap_or_default()
            ));
            for (heading, items) in [
                ("Features", &structured.features),
                ("Benefits", &structured.benefits),
                ("Examples", &structured.examples),
            ] {
                if !items.is_empty() {
                    let bullets: Vec<String> = items.iter().map(|item| format!("- {item}")).collect();
                    sections.push(format!("## {heading}\n{}", bullets.join("\n")));
                }
            }
            if !structured.steps.is_empty() {
                let numbered: Vec<String> = structured
                    .steps
                    .iter()
                    .enumerate()
                    .map(|(i, step)| match &step.image {
                        Some(image) => format!("{}. {} (Image: {image})", i + 1, step.text),
                        None => format!("{}. {}", i + 1, step.text),
                    })
                    .collect();
                sections.push(format!("## Steps\n{}", numbered.join("\n")));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::ContentStore;

    #[test]
    fn digest_lists_structured_sections() {
        let store = ContentStore::from_json_str(
            r##"{"version":1,"title":"T","navigation":[
                {"id":"cal","title":"Calendar","description":"Book meetings.",
                 "features":["Sync"],"steps":[{"text":"Open it","image":"a.png"},{"text":"Pick a slot"}]},
                {"id":"grp","title":"Group","children":[{"id":"md","title":"MD","content":"# MD\nBody\n"}]}
            ]}"##,
        )
        .expect("load");

        assert_eq!(
            store.markdown_digest(),
            "# Calendar\nBook meetings.\n\n## Features\n- Sync\n\n## Steps\n1. Open it (Image: a.png)\n2. Pick a slot\n\n# MD\nBody"
        );
    }
}
