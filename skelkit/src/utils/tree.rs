//! Tree rendering for bone hierarchies

use console::Style;

/// A node in a rendered tree
#[derive(Debug, Clone)]
pub struct TreeNode {
    pub name: String,
    pub node_type: NodeType,
    pub children: Vec<TreeNode>,
    /// Ordered key/value pairs shown under the node
    pub metadata: Vec<(String, String)>,
}

/// Kinds of nodes in a bone tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    Model,
    Bone,
    Sentinel,
}

/// Options for tree rendering
#[derive(Debug, Clone)]
pub struct TreeOptions {
    pub max_depth: Option<usize>,
    pub no_color: bool,
    pub show_metadata: bool,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            max_depth: None,
            no_color: false,
            show_metadata: true,
        }
    }
}

impl TreeNode {
    pub fn new(name: impl Into<String>, node_type: NodeType) -> Self {
        Self {
            name: name.into(),
            node_type,
            children: Vec::new(),
            metadata: Vec::new(),
        }
    }

    /// Add a child node
    pub fn add_child(mut self, child: TreeNode) -> Self {
        self.children.push(child);
        self
    }

    /// Add a metadata line
    pub fn with_metadata(mut self, key: &str, value: impl Into<String>) -> Self {
        self.metadata.push((key.to_string(), value.into()));
        self
    }
}

impl NodeType {
    pub fn icon(self) -> &'static str {
        match self {
            NodeType::Model => "📁",
            NodeType::Bone => "🦴",
            NodeType::Sentinel => "∅",
        }
    }

    pub fn style(self, no_color: bool) -> Style {
        if no_color {
            return Style::new();
        }
        match self {
            NodeType::Model => Style::new().bold().cyan(),
            NodeType::Bone => Style::new().green(),
            NodeType::Sentinel => Style::new().dim(),
        }
    }
}

/// Render a tree to a string
pub fn render_tree(root: &TreeNode, options: &TreeOptions) -> String {
    let mut output = String::new();
    render_node(root, &mut output, "", true, 0, options);
    output
}

fn render_node(
    node: &TreeNode,
    output: &mut String,
    prefix: &str,
    is_last: bool,
    depth: usize,
    options: &TreeOptions,
) {
    if options.max_depth.is_some_and(|max| depth > max) {
        return;
    }

    let connector = if depth == 0 {
        ""
    } else if is_last {
        "└── "
    } else {
        "├── "
    };
    let style = node.node_type.style(options.no_color);
    output.push_str(&format!(
        "{prefix}{connector}{} {}\n",
        node.node_type.icon(),
        style.apply_to(&node.name)
    ));

    let new_prefix = if depth == 0 {
        String::new()
    } else {
        format!("{prefix}{}", if is_last { "    " } else { "│   " })
    };

    if options.show_metadata {
        let key_style = if options.no_color {
            Style::new()
        } else {
            Style::new().dim()
        };
        for (key, value) in &node.metadata {
            output.push_str(&format!(
                "{new_prefix}    {}: {value}\n",
                key_style.apply_to(key)
            ));
        }
    }

    for (i, child) in node.children.iter().enumerate() {
        let is_last_child = i == node.children.len() - 1;
        render_node(child, output, &new_prefix, is_last_child, depth + 1, options);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TreeNode {
        TreeNode::new("arm", NodeType::Model)
            .add_child(
                TreeNode::new("root", NodeType::Bone)
                    .with_metadata("position", "(0, 0, 0)")
                    .add_child(TreeNode::new("forearm", NodeType::Bone)),
            )
            .add_child(TreeNode::new("NO BONE", NodeType::Sentinel))
    }

    #[test]
    fn test_tree_rendering() {
        let options = TreeOptions {
            no_color: true,
            ..TreeOptions::default()
        };
        let output = render_tree(&sample(), &options);

        assert!(output.contains("├── 🦴 root"));
        assert!(output.contains("│   └── 🦴 forearm"));
        assert!(output.contains("└── ∅ NO BONE"));
        assert!(output.contains("position: (0, 0, 0)"));
    }

    #[test]
    fn test_max_depth() {
        let options = TreeOptions {
            max_depth: Some(1),
            no_color: true,
            show_metadata: false,
        };
        let output = render_tree(&sample(), &options);

        assert!(output.contains("root"));
        assert!(!output.contains("forearm"));
        assert!(!output.contains("position"));
    }
}
