// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! The throwaway tree html5ever builds into.
//!
//! Nodes live in one flat list owned by [`PaDom`]; parents refer to their
//! children by [`PaDomHandle`]. Nodes detached while parsing stay in the
//! list as garbage and are simply never reached from the document.

use html5ever::{LocalName, Namespace, QualName};

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

pub(crate) fn html_name(local: &str) -> QualName {
    QualName::new(
        None,
        Namespace::from(HTML_NAMESPACE),
        LocalName::from(local),
    )
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct PaDomHandle(pub(crate) usize);

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct PaNodeContainer {
    pub(crate) name: QualName,
    pub(crate) attrs: Vec<(String, String)>,
    pub(crate) children: Vec<PaDomHandle>,
}

impl PaNodeContainer {
    pub(crate) fn local_name(&self) -> &str {
        self.name.local.as_ref()
    }

    pub(crate) fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _v)| n == name)
            .map(|(_n, v)| v.as_str())
    }

    pub(crate) fn has_class(&self, class: &str) -> bool {
        self.get_attr("class")
            .map(|v| v.split_ascii_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum PaDomNode {
    Document(PaNodeContainer),
    Container(PaNodeContainer),
    Text(String),
    /// Comments, processing instructions and anything else we keep only so
    /// that every html5ever handle points somewhere.
    Ignored,
}

#[derive(Clone, Debug)]
pub(crate) struct PaDom {
    pub(crate) nodes: Vec<PaDomNode>,
    pub(crate) document_handle: PaDomHandle,
    /// Answer to `elem_name` for nodes that are not elements.
    unnamed: QualName,
}

impl PaDom {
    pub(crate) fn new() -> Self {
        Self {
            nodes: vec![PaDomNode::Document(PaNodeContainer {
                name: html_name(""),
                attrs: Vec::new(),
                children: Vec::new(),
            })],
            document_handle: PaDomHandle(0),
            unnamed: html_name(""),
        }
    }

    pub(crate) fn document_handle(&self) -> &PaDomHandle {
        &self.document_handle
    }

    pub(crate) fn add_node(&mut self, node: PaDomNode) -> PaDomHandle {
        self.nodes.push(node);
        PaDomHandle(self.nodes.len() - 1)
    }

    pub(crate) fn get_node(&self, handle: &PaDomHandle) -> &PaDomNode {
        &self.nodes[handle.0]
    }

    pub(crate) fn get_mut_node(
        &mut self,
        handle: &PaDomHandle,
    ) -> &mut PaDomNode {
        &mut self.nodes[handle.0]
    }

    pub(crate) fn name(&self, handle: &PaDomHandle) -> &QualName {
        match self.get_node(handle) {
            PaDomNode::Document(c) | PaDomNode::Container(c) => &c.name,
            PaDomNode::Text(_) | PaDomNode::Ignored => &self.unnamed,
        }
    }

    pub(crate) fn children(&self, handle: &PaDomHandle) -> &[PaDomHandle] {
        match self.get_node(handle) {
            PaDomNode::Document(c) | PaDomNode::Container(c) => &c.children,
            PaDomNode::Text(_) | PaDomNode::Ignored => &[],
        }
    }

    pub(crate) fn children_mut(
        &mut self,
        handle: &PaDomHandle,
    ) -> Option<&mut Vec<PaDomHandle>> {
        match self.get_mut_node(handle) {
            PaDomNode::Document(c) | PaDomNode::Container(c) => {
                Some(&mut c.children)
            }
            PaDomNode::Text(_) | PaDomNode::Ignored => None,
        }
    }

    pub(crate) fn container(
        &self,
        handle: &PaDomHandle,
    ) -> Option<&PaNodeContainer> {
        match self.get_node(handle) {
            PaDomNode::Container(c) => Some(c),
            _ => None,
        }
    }

    /// The node that lists `child` among its children, if it is attached.
    pub(crate) fn parent_of(
        &self,
        child: &PaDomHandle,
    ) -> Option<PaDomHandle> {
        (0..self.nodes.len())
            .map(PaDomHandle)
            .find(|h| self.children(h).contains(child))
    }

    /// Every element under the document, depth first, in document order.
    pub(crate) fn walk(&self) -> Vec<PaDomHandle> {
        let mut out = Vec::new();
        let mut stack = vec![self.document_handle.clone()];
        while let Some(handle) = stack.pop() {
            if self.container(&handle).is_some() {
                out.push(handle.clone());
            }
            stack.extend(self.children(&handle).iter().rev().cloned());
        }
        out
    }

    /// The first element below `handle` (or `handle` itself) named `name`.
    pub(crate) fn find_descendant(
        &self,
        handle: &PaDomHandle,
        name: &str,
    ) -> Option<PaDomHandle> {
        if self
            .container(handle)
            .is_some_and(|c| c.local_name() == name)
        {
            return Some(handle.clone());
        }
        self.children(handle)
            .iter()
            .find_map(|child| self.find_descendant(child, name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(name: &str, attrs: &[(&str, &str)]) -> PaDomNode {
        PaDomNode::Container(PaNodeContainer {
            name: html_name(name),
            attrs: attrs
                .iter()
                .map(|&(n, v)| (n.to_owned(), v.to_owned()))
                .collect(),
            children: Vec::new(),
        })
    }

    #[test]
    fn has_class_matches_whole_class_names() {
        let PaDomNode::Container(node) =
            element("div", &[("class", "mediumInsert small")])
        else {
            unreachable!()
        };
        assert!(node.has_class("mediumInsert"));
        assert!(node.has_class("small"));
        assert!(!node.has_class("medium"));
    }

    #[test]
    fn walk_visits_elements_in_document_order() {
        let mut dom = PaDom::new();
        let doc = dom.document_handle().clone();
        let a = dom.add_node(element("a", &[]));
        let b = dom.add_node(element("b", &[]));
        let c = dom.add_node(element("c", &[]));
        dom.children_mut(&doc).unwrap().extend([a.clone(), c.clone()]);
        dom.children_mut(&a).unwrap().push(b.clone());

        assert_eq!(dom.walk(), vec![a.clone(), b.clone(), c]);
        assert_eq!(dom.parent_of(&b), Some(a.clone()));
        assert_eq!(dom.find_descendant(&doc, "b"), Some(b));
    }
}
