use chrono::{Local, NaiveDate};
use std::fmt::{self, Display};

use crate::config::Config;
use crate::markup::{Element, NodePath};
use crate::widget::{CalendarWidget, Settings};

pub struct Document {
    root: Element,
}

impl Document {
    pub fn new(root: Element) -> Self {
        Document { root }
    }

    /// A body holding `count` empty containers marked with `marker_class`.
    pub fn page(marker_class: &str, count: usize) -> Self {
        let root = (0..count).fold(Element::new("body"), |body, _| {
            body.child(Element::new("div").class(marker_class))
        });
        Document { root }
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    pub fn element(&self, path: &NodePath) -> Option<&Element> {
        self.root.get(path)
    }

    pub fn element_mut(&mut self, path: &NodePath) -> Option<&mut Element> {
        self.root.get_mut(path)
    }

    pub fn find_by_class(&self, class: &str) -> Vec<NodePath> {
        self.root.find_by_class(class)
    }

    /// Delivers a click on `target` to the widget owning it.
    pub fn click(&mut self, widgets: &mut [CalendarWidget], target: &NodePath) -> bool {
        widgets.iter_mut().any(|widget| widget.click(target, self))
    }
}

impl Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "<!DOCTYPE html>")?;
        writeln!(f, "<html><head><meta charset=\"utf-8\"></head>")?;
        writeln!(f, "{}", self.root)?;
        write!(f, "</html>")
    }
}

/// Wraps every element carrying the configured marker class in a widget.
pub fn bootstrap(document: &mut Document, config: &Config) -> Vec<CalendarWidget> {
    bootstrap_at(
        document,
        &config.marker_class,
        Settings::from_config(config),
        Local::now().date_naive(),
    )
}

/// Markers nested inside another marker are skipped: the outer widget
/// replaces them on its first render.
pub fn bootstrap_at(
    document: &mut Document,
    marker_class: &str,
    settings: Settings,
    today: NaiveDate,
) -> Vec<CalendarWidget> {
    let mut containers: Vec<NodePath> = Vec::new();

    for path in document.find_by_class(marker_class) {
        if containers.iter().any(|outer| path.starts_with(outer)) {
            log::debug!("Skipping nested container {:?}", path);
        } else {
            containers.push(path);
        }
    }

    log::info!(
        "Found {} container(s) marked '{}'",
        containers.len(),
        marker_class
    );

    containers
        .into_iter()
        .map(|container| CalendarWidget::initialize_at(container, document, settings, today))
        .collect()
}
