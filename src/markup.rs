use itertools::Itertools;
use std::collections::BTreeMap;
use std::fmt::{self, Display, Write};

/// Child indices leading from a document root to an element.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodePath(Vec<usize>);

impl NodePath {
    pub fn root() -> Self {
        NodePath(Vec::new())
    }

    pub fn child(&self, idx: usize) -> Self {
        let mut path = self.0.clone();
        path.push(idx);
        NodePath(path)
    }

    pub fn join(&self, relative: &NodePath) -> Self {
        let mut path = self.0.clone();
        path.extend_from_slice(&relative.0);
        NodePath(path)
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    pub fn starts_with(&self, ancestor: &NodePath) -> bool {
        self.0.starts_with(&ancestor.0)
    }

    /// Path of `descendant` relative to `self`, if it is one.
    pub fn relative(&self, descendant: &NodePath) -> Option<NodePath> {
        if descendant.starts_with(self) {
            Some(NodePath(descendant.0[self.0.len()..].to_vec()))
        } else {
            None
        }
    }
}

impl From<Vec<usize>> for NodePath {
    fn from(indices: Vec<usize>) -> Self {
        NodePath(indices)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    tag: String,
    classes: Vec<String>,
    attrs: BTreeMap<String, String>,
    text: Option<String>,
    children: Vec<Element>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Element {
            tag: tag.to_owned(),
            classes: Vec::new(),
            attrs: BTreeMap::new(),
            text: None,
            children: Vec::new(),
        }
    }

    pub fn class(mut self, class: &str) -> Self {
        self.add_class(class);
        self
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.insert(name.to_owned(), value.to_owned());
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.text = Some(text.to_owned());
        self
    }

    pub fn child(mut self, child: Element) -> Self {
        self.append(child);
        self
    }

    pub fn add_class(&mut self, class: &str) {
        if !self.has_class(class) {
            self.classes.push(class.to_owned());
        }
    }

    pub fn append(&mut self, child: Element) {
        self.children.push(child);
    }

    /// Drops text and all children.
    pub fn clear(&mut self) {
        self.text = None;
        self.children.clear();
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    pub fn own_text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    pub fn get(&self, path: &NodePath) -> Option<&Element> {
        path.indices()
            .iter()
            .try_fold(self, |elem, &idx| elem.children.get(idx))
    }

    pub fn get_mut(&mut self, path: &NodePath) -> Option<&mut Element> {
        path.indices()
            .iter()
            .try_fold(self, |elem, &idx| elem.children.get_mut(idx))
    }

    /// Paths (relative to `self`) of all elements carrying `class`, in
    /// document order.
    pub fn find_by_class(&self, class: &str) -> Vec<NodePath> {
        let mut found = Vec::new();
        self.collect_by_class(class, NodePath::root(), &mut found);
        found
    }

    fn collect_by_class(&self, class: &str, path: NodePath, found: &mut Vec<NodePath>) {
        if self.has_class(class) {
            found.push(path.clone());
        }
        for (idx, child) in self.children.iter().enumerate() {
            child.collect_by_class(class, path.child(idx), found);
        }
    }

    /// First element carrying `class`, `self` included.
    pub fn first_by_class(&self, class: &str) -> Option<&Element> {
        if self.has_class(class) {
            return Some(self);
        }
        self.children
            .iter()
            .find_map(|child| child.first_by_class(class))
    }

    pub fn text_content(&self) -> String {
        let mut content = self.text.clone().unwrap_or_default();
        for child in &self.children {
            content.push_str(&child.text_content());
        }
        content
    }
}

fn escape(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    for c in s.chars() {
        match c {
            '&' => f.write_str("&amp;")?,
            '<' => f.write_str("&lt;")?,
            '>' => f.write_str("&gt;")?,
            '"' => f.write_str("&quot;")?,
            c => f.write_char(c)?,
        }
    }
    Ok(())
}

impl Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.tag)?;
        if !self.classes.is_empty() {
            f.write_str(" class=\"")?;
            escape(f, &self.classes.iter().join(" "))?;
            f.write_char('"')?;
        }
        for (name, value) in &self.attrs {
            write!(f, " {}=\"", name)?;
            escape(f, value)?;
            f.write_char('"')?;
        }
        f.write_char('>')?;

        if let Some(text) = &self.text {
            escape(f, text)?;
        }
        for child in &self.children {
            write!(f, "{}", child)?;
        }

        write!(f, "</{}>", self.tag)
    }
}
