//! Namespace hierarchy.
//!
//! The API returns namespaces as a flat list with `parent_id` links; listings
//! show them as an indented tree.

use std::collections::{HashMap, HashSet};

use crate::models::Namespace;

/// A namespace with its depth in the tree (roots are depth 0).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NamespaceNode<'a> {
    pub namespace: &'a Namespace,
    pub depth: usize,
}

/// Order `namespaces` depth-first, parents before children.
///
/// Roots are namespaces with no parent or whose parent is not in the list;
/// they keep input order, as do siblings. Namespaces caught in a parent
/// cycle are unreachable from any root and are appended as extra roots, so
/// every namespace appears exactly once.
#[must_use]
pub fn build_namespace_tree(namespaces: &[Namespace]) -> Vec<NamespaceNode<'_>> {
    let ids: HashSet<&str> = namespaces.iter().map(|ns| ns.id.as_str()).collect();

    let mut children: HashMap<&str, Vec<&Namespace>> = HashMap::new();
    for ns in namespaces {
        if let Some(parent) = ns.parent_id.as_deref() {
            children.entry(parent).or_default().push(ns);
        }
    }

    let mut ordered = Vec::with_capacity(namespaces.len());
    let mut visited: HashSet<&str> = HashSet::with_capacity(namespaces.len());

    let is_root = |ns: &Namespace| ns.parent_id.as_deref().is_none_or(|p| !ids.contains(p));
    for root in namespaces.iter().filter(|ns| is_root(ns)) {
        walk(root, &children, &mut visited, &mut ordered);
    }

    if ordered.len() < namespaces.len() {
        for ns in namespaces {
            if !visited.contains(ns.id.as_str()) {
                tracing::debug!(namespace = %ns.id, "Namespace on a parent cycle, listing as root");
                walk(ns, &children, &mut visited, &mut ordered);
            }
        }
    }

    ordered
}

/// Iterative depth-first walk from `root`, skipping anything already visited.
fn walk<'a>(
    root: &'a Namespace,
    children: &HashMap<&str, Vec<&'a Namespace>>,
    visited: &mut HashSet<&'a str>,
    ordered: &mut Vec<NamespaceNode<'a>>,
) {
    let mut stack = vec![(root, 0usize)];

    while let Some((ns, depth)) = stack.pop() {
        if !visited.insert(ns.id.as_str()) {
            continue;
        }
        ordered.push(NamespaceNode { namespace: ns, depth });

        if let Some(kids) = children.get(ns.id.as_str()) {
            // Reverse so the first child is popped first.
            stack.extend(kids.iter().rev().map(|kid| (*kid, depth + 1)));
        }
    }
}

/// Full dotted path of a namespace (`root.child.leaf`), following parents
/// present in `namespaces`.
#[must_use]
pub fn qualified_name(namespace: &Namespace, namespaces: &[Namespace]) -> String {
    let by_id: HashMap<&str, &Namespace> =
        namespaces.iter().map(|ns| (ns.id.as_str(), ns)).collect();

    let mut parts = vec![namespace.name.as_str()];
    let mut seen = HashSet::from([namespace.id.as_str()]);
    let mut current = namespace;

    while let Some(parent) = current.parent_id.as_deref().and_then(|p| by_id.get(p).copied()) {
        if !seen.insert(parent.id.as_str()) {
            break;
        }
        parts.push(parent.name.as_str());
        current = parent;
    }

    parts.reverse();
    parts.join(".")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ns(id: &str, parent: Option<&str>) -> Namespace {
        Namespace {
            id: id.to_string(),
            name: id.to_uppercase(),
            parent_id: parent.map(str::to_string),
            ..Default::default()
        }
    }

    fn flatten(nodes: &[NamespaceNode<'_>]) -> Vec<(String, usize)> {
        nodes.iter().map(|n| (n.namespace.id.clone(), n.depth)).collect()
    }

    #[test]
    fn test_children_follow_parents() {
        let list = vec![ns("b", Some("a")), ns("a", None), ns("c", Some("b")), ns("d", Some("a"))];
        let tree = build_namespace_tree(&list);
        assert_eq!(
            flatten(&tree),
            vec![("a".into(), 0), ("b".into(), 1), ("c".into(), 2), ("d".into(), 1)]
        );
    }

    #[test]
    fn test_missing_parent_is_root() {
        let list = vec![ns("x", Some("gone")), ns("y", None)];
        assert_eq!(flatten(&build_namespace_tree(&list)), vec![("x".into(), 0), ("y".into(), 0)]);
    }

    #[test]
    fn test_cycle_is_listed_once() {
        let list = vec![ns("p", Some("q")), ns("q", Some("p")), ns("r", None)];
        let tree = build_namespace_tree(&list);
        assert_eq!(flatten(&tree), vec![("r".into(), 0), ("p".into(), 0), ("q".into(), 1)]);
    }

    #[test]
    fn test_empty() {
        assert!(build_namespace_tree(&[]).is_empty());
    }

    #[test]
    fn test_qualified_name() {
        let list = vec![ns("a", None), ns("b", Some("a")), ns("c", Some("b"))];
        assert_eq!(qualified_name(&list[2], &list), "A.B.C");
        assert_eq!(qualified_name(&list[0], &list), "A");
    }
}
