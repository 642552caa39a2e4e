// src/core/dom.rs
// Live page model: a parsed document that adapters query and the orchestrator
// mutates. Elements are addressed by `NodeId`, which survives later mutations
// (detached nodes keep their slot in the tree).

use ego_tree::{NodeId, NodeRef, Tree};
use scraper::node::Element;
use scraper::{ElementRef, Html, Node, Selector};
use url::Url;

use crate::error::{DomError, PageError};
use super::sanitize::normalize_ws;

/// Compile a selector literal. Only ever called with constants.
pub fn css(selector: &str) -> Selector {
    Selector::parse(selector).unwrap_or_else(|e| panic!("invalid selector {selector:?}: {e:?}"))
}

fn id_of(el: ElementRef<'_>) -> NodeId {
    let node: &NodeRef<'_, Node> = &el;
    node.id()
}

pub struct Page {
    html: Html,
    address: Url,
    revision: u64,
}

impl Page {
    pub fn parse(markup: &str, address: &str) -> Result<Self, PageError> {
        let parsed = Url::parse(address).map_err(|source| PageError::Address {
            address: address.to_string(),
            source,
        })?;
        Ok(Self { html: Html::parse_document(markup), address: parsed, revision: 0 })
    }

    pub fn address(&self) -> &Url {
        &self.address
    }

    /// Bumped on every structural mutation of the document.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// The page re-rendered its content. Same page load, new markup.
    pub fn replace_markup(&mut self, markup: &str) {
        self.html = Html::parse_document(markup);
        self.revision += 1;
    }

    pub fn to_html(&self) -> String {
        self.html.html()
    }

    /* ---------- queries ---------- */

    pub fn element(&self, id: NodeId) -> Option<ElementRef<'_>> {
        self.html.tree.get(id).and_then(ElementRef::wrap)
    }

    /// All matches in the whole document, in document order.
    pub fn select(&self, selector: &Selector) -> Vec<NodeId> {
        self.html.select(selector).map(id_of).collect()
    }

    /// Matches among the descendants of `scope` (not `scope` itself).
    pub fn select_in(&self, scope: NodeId, selector: &Selector) -> Vec<NodeId> {
        match self.element(scope) {
            Some(el) => el.select(selector).map(id_of).collect(),
            None => Vec::new(),
        }
    }

    pub fn select_first_in(&self, scope: NodeId, selector: &Selector) -> Option<NodeId> {
        self.element(scope)?.select(selector).next().map(id_of)
    }

    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|el| el.value().name())
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)?.value().attr(name)
    }

    /// Raw concatenation of every descendant text node, hidden or not.
    pub fn text_content(&self, id: NodeId) -> String {
        match self.element(id) {
            Some(el) => el.text().collect(),
            None => String::new(),
        }
    }

    /// Text a reader would see: skips hidden subtrees, whitespace collapsed.
    pub fn rendered_text(&self, id: NodeId) -> String {
        let mut out = String::new();
        if let Some(node) = self.html.tree.get(id) {
            push_rendered(node, &mut out);
        }
        normalize_ws(&out)
    }

    /// `id` itself or its nearest ancestor matching `selector`.
    pub fn closest(&self, id: NodeId, selector: &Selector) -> Option<NodeId> {
        let mut current = self.html.tree.get(id);
        while let Some(node) = current {
            if let Some(el) = ElementRef::wrap(node) {
                if selector.matches(&el) {
                    return Some(node.id());
                }
            }
            current = node.parent();
        }
        None
    }

    pub fn prev_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.html
            .tree
            .get(id)?
            .prev_siblings()
            .find(|n| n.value().is_element())
            .map(|n| n.id())
    }

    /* ---------- mutations ---------- */

    /// Insert the fragment's nodes right after `anchor`, in order.
    /// Returns the id of the first inserted node.
    pub fn insert_after(&mut self, anchor: NodeId, fragment: &Fragment) -> Result<NodeId, DomError> {
        let tree = &mut self.html.tree;
        let mut last = anchor;
        let mut first = None;
        for root in &fragment.roots {
            last = root.insert_after(tree, last)?;
            first.get_or_insert(last);
        }
        self.revision += 1;
        first.ok_or(DomError::EmptyFragment)
    }

    /// Replace `target` with `wrapper`, which then holds a copy of `target`
    /// followed by the nodes of `extra`. Returns the wrapper's id.
    pub fn wrap_with(
        &mut self,
        target: NodeId,
        wrapper: &Fragment,
        extra: &Fragment,
    ) -> Result<NodeId, DomError> {
        let shell = wrapper.roots.first().ok_or(DomError::EmptyFragment)?;
        let copy = Subtree::capture(self.html.tree.get(target).ok_or(DomError::StaleNode(target))?);

        let tree = &mut self.html.tree;
        let wrapper_id = shell.insert_before(tree, target)?;
        copy.append_to(tree, wrapper_id)?;
        for root in &extra.roots {
            root.append_to(tree, wrapper_id)?;
        }
        tree.get_mut(target).ok_or(DomError::StaleNode(target))?.detach();

        self.revision += 1;
        Ok(wrapper_id)
    }
}

/* ---------------- rendered text ---------------- */

fn is_hidden(el: &Element) -> bool {
    if matches!(el.name(), "script" | "style" | "template" | "noscript" | "head") {
        return true;
    }
    if el.attr("hidden").is_some() {
        return true;
    }
    el.attr("style").is_some_and(|style| {
        let compact: String = style.chars().filter(|c| !c.is_whitespace()).collect::<String>().to_ascii_lowercase();
        compact.contains("display:none") || compact.contains("visibility:hidden")
    })
}

fn breaks_line(name: &str) -> bool {
    matches!(
        name,
        "br" | "div" | "p" | "li" | "tr" | "td" | "th" | "section" | "header" | "h1" | "h2" | "h3" | "h4"
    )
}

fn push_rendered(node: NodeRef<'_, Node>, out: &mut String) {
    match node.value() {
        Node::Text(text) => out.push_str(text),
        Node::Element(el) => {
            if is_hidden(el) {
                return;
            }
            for child in node.children() {
                push_rendered(child, out);
            }
            if breaks_line(el.name()) {
                out.push(' ');
            }
        }
        _ => {
            for child in node.children() {
                push_rendered(child, out);
            }
        }
    }
}

/* ---------------- fragments ---------------- */

/// Owned copy of a node and everything under it.
#[derive(Clone, Debug)]
struct Subtree {
    node: Node,
    children: Vec<Subtree>,
}

impl Subtree {
    fn capture(node: NodeRef<'_, Node>) -> Self {
        Self {
            node: node.value().clone(),
            children: node.children().map(Self::capture).collect(),
        }
    }

    fn append_to(&self, tree: &mut Tree<Node>, parent: NodeId) -> Result<NodeId, DomError> {
        let id = tree
            .get_mut(parent)
            .ok_or(DomError::StaleNode(parent))?
            .append(self.node.clone())
            .id();
        self.attach_children(tree, id)?;
        Ok(id)
    }

    fn insert_after(&self, tree: &mut Tree<Node>, anchor: NodeId) -> Result<NodeId, DomError> {
        let id = tree
            .get_mut(anchor)
            .ok_or(DomError::StaleNode(anchor))?
            .insert_after(self.node.clone())
            .id();
        self.attach_children(tree, id)?;
        Ok(id)
    }

    fn insert_before(&self, tree: &mut Tree<Node>, anchor: NodeId) -> Result<NodeId, DomError> {
        let id = tree
            .get_mut(anchor)
            .ok_or(DomError::StaleNode(anchor))?
            .insert_before(self.node.clone())
            .id();
        self.attach_children(tree, id)?;
        Ok(id)
    }

    fn attach_children(&self, tree: &mut Tree<Node>, id: NodeId) -> Result<(), DomError> {
        for child in &self.children {
            child.append_to(tree, id)?;
        }
        Ok(())
    }
}

/// Parsed markup waiting to be grafted into a page.
#[derive(Clone, Debug)]
pub struct Fragment {
    roots: Vec<Subtree>,
}

impl Fragment {
    pub fn parse(markup: &str) -> Result<Self, DomError> {
        let html = Html::parse_fragment(markup);
        let roots: Vec<Subtree> = html
            .root_element()
            .children()
            .filter(|n| !matches!(n.value(), Node::Text(t) if t.trim().is_empty()))
            .map(Subtree::capture)
            .collect();
        if roots.is_empty() {
            return Err(DomError::EmptyFragment);
        }
        Ok(Self { roots })
    }
}
