use k8s_openapi::api::core::v1::{NodeSelector, NodeSelectorRequirement, NodeSelectorTerm};

pub const HOSTNAME_LABEL: &str = "kubernetes.io/hostname";

/// Selector restricting a claim to the given node. With no node the hostname
/// requirement is still emitted, but with an empty value list.
///
/// Whether a scheduler reads `In []` as "any node" or "no node" is up to the
/// scheduler; callers rely on the former.
pub fn hostname_selector(node: Option<&str>) -> NodeSelector {
    let values = node.map(|n| vec![n.to_string()]).unwrap_or_default();

    NodeSelector {
        node_selector_terms: vec![NodeSelectorTerm {
            match_expressions: Some(vec![NodeSelectorRequirement {
                key: HOSTNAME_LABEL.to_string(),
                operator: "In".to_string(),
                values: Some(values),
            }]),
            match_fields: None,
        }],
    }
}

/// Node names pinned by a selector built with [`hostname_selector`].
pub fn selector_nodes(selector: &NodeSelector) -> Vec<&str> {
    selector
        .node_selector_terms
        .iter()
        .flat_map(|t| t.match_expressions.iter().flatten())
        .filter(|r| r.key == HOSTNAME_LABEL && r.operator == "In")
        .flat_map(|r| r.values.iter().flatten())
        .map(|v| v.as_str())
        .collect()
}
