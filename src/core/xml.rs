//! Small lookups over a parsed document tree.
//!
//! Paths are `/`-separated element names relative to a node, matched against
//! local names only, so `info/name` finds the first `name` child of any `info`
//! child.

use roxmltree::Node;

fn element_children<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    name: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    node.children()
        .filter(move |child| child.is_element() && child.tag_name().name() == name)
}

/// First element reached by following `path` from `node`.
pub fn find<'a, 'input: 'a>(node: Node<'a, 'input>, path: &'a str) -> Option<Node<'a, 'input>> {
    let mut current = vec![node];
    for segment in path.split('/') {
        current = current
            .into_iter()
            .flat_map(|n| element_children(n, segment))
            .collect();
        if current.is_empty() {
            return None;
        }
    }
    current.into_iter().next()
}

/// All elements reached by following `path` from `node`, in document order.
pub fn find_all<'a, 'input: 'a>(node: Node<'a, 'input>, path: &'a str) -> Vec<Node<'a, 'input>> {
    let mut current = vec![node];
    for segment in path.split('/') {
        current = current
            .into_iter()
            .flat_map(|n| element_children(n, segment))
            .collect();
    }
    current
}

/// Trimmed leading text of the element at `path`; `None` when missing or blank.
pub fn find_text<'a, 'input: 'a>(node: Node<'a, 'input>, path: &'a str) -> Option<String> {
    let found = find(node, path)?;
    let text = found.text()?.trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// Every element named `tag` below `node`, at any depth, excluding `node` itself.
pub fn descendants_named<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    tag: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    node.descendants()
        .skip(1)
        .filter(move |n| n.is_element() && n.tag_name().name() == tag)
}

/// Concatenation of every text node below `node`, tags stripped.
pub fn flatten_text(node: Node<'_, '_>) -> String {
    node.descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect()
}
