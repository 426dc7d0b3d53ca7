//! Namespace-tolerant helpers for the directory's XML documents.

use roxmltree::{Document, Node};

/// Find the text of the first element matching `tag` anywhere in the document.
///
/// Matches the element's local name first (which already ignores declared
/// namespaces), then falls back to a raw tag-suffix match for documents that
/// embed an undeclared prefix in the tag itself.
pub(crate) fn find_text<'a>(doc: &'a Document<'a>, tag: &str) -> Option<&'a str> {
    let root = doc.root_element();

    if let Some(node) = root
        .descendants()
        .find(|n| n.is_element() && n.tag_name().name() == tag)
    {
        return node.text();
    }

    root.descendants()
        .find(|n| n.is_element() && n.tag_name().name().ends_with(tag))
        .and_then(|n| n.text())
}

/// Find the first element matching `tag` by local name.
pub(crate) fn find_element<'a, 'input>(
    doc: &'a Document<'input>,
    tag: &str,
) -> Option<Node<'a, 'input>> {
    doc.root_element()
        .descendants()
        .find(|n| n.is_element() && n.tag_name().name() == tag)
}
