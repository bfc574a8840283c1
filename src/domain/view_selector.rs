//! Single-active-view tab container.
//!
//! Views are declared up front as `(name, label, renderer)` entries and matched
//! by name against the active tag. An active tag with no matching view renders
//! nothing.

use std::fmt;

type Renderer<I, T> = Box<dyn Fn(&I) -> T + Send + Sync>;

/// One declared view.
pub struct View<I: ?Sized, T> {
    name: String,
    label: String,
    render: Renderer<I, T>,
}

impl<I: ?Sized, T> View<I, T> {
    pub fn new(
        name: impl Into<String>,
        label: impl Into<String>,
        render: impl Fn(&I) -> T + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            render: Box::new(render),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl<I: ?Sized, T> fmt::Debug for View<I, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("View")
            .field("name", &self.name)
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

/// A tab trigger as shown in the tab strip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tab<'a> {
    pub name: &'a str,
    pub label: &'a str,
    pub active: bool,
}

pub struct ViewSelector<I: ?Sized, T> {
    active: String,
    views: Vec<View<I, T>>,
}

impl<I: ?Sized, T> ViewSelector<I, T> {
    pub fn new(default: impl Into<String>, views: Vec<View<I, T>>) -> Self {
        Self {
            active: default.into(),
            views,
        }
    }

    /// Switch the active view. Undeclared names are kept and render nothing.
    pub fn select(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.is_declared(&name) {
            tracing::debug!(tab = %name, "selected tab has no declared view");
        }
        self.active = name;
    }

    pub fn active(&self) -> &str {
        &self.active
    }

    pub fn is_declared(&self, name: &str) -> bool {
        self.views.iter().any(|v| v.name == name)
    }

    /// Content of the active view, or `None` when no view has the active name.
    pub fn render(&self, input: &I) -> Option<T> {
        self.views
            .iter()
            .find(|v| v.name == self.active)
            .map(|v| (v.render)(input))
    }

    pub fn tabs(&self) -> Vec<Tab<'_>> {
        self.views
            .iter()
            .map(|v| Tab {
                name: &v.name,
                label: &v.label,
                active: v.name == self.active,
            })
            .collect()
    }
}

impl<I: ?Sized, T> fmt::Debug for ViewSelector<I, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewSelector")
            .field("active", &self.active)
            .field("views", &self.views)
            .finish()
    }
}
