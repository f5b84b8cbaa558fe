use crate::config::Endpoints;
use crate::view::{Document, Tag};
use gridbot_protocol::{targets, Command};
use std::collections::HashMap;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// The element with this id was clicked.
    Click { target: String },
}

impl UiEvent {
    pub fn click(target: impl Into<String>) -> Self {
        Self::Click {
            target: target.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Command(Command),
    Navigate(Url),
    Ignored,
}

/// Sends the user somewhere outside the page (the browser, in practice).
pub trait Navigator {
    fn navigate(&mut self, url: &Url) -> anyhow::Result<()>;
}

/// Document-level click handling. Buttons describe their command through
/// `data-action` / `data-direction`, so the router does not need to know which
/// controls exist. Elements bound explicitly (the export button) navigate instead.
#[derive(Debug, Clone, Default)]
pub struct InputRouter {
    navigations: HashMap<String, Url>,
}

impl InputRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_endpoints(endpoints: &Endpoints) -> Self {
        Self::new().bind_navigation(targets::EXPORT_BTN, endpoints.export.clone())
    }

    pub fn bind_navigation(mut self, id: &str, url: Url) -> Self {
        self.navigations.insert(id.to_string(), url);
        self
    }

    pub fn route(&self, doc: &Document, event: &UiEvent) -> Route {
        let UiEvent::Click { target } = event;

        if let Some(url) = self.navigations.get(target) {
            return Route::Navigate(url.clone());
        }

        let Some(element) = doc.get(target) else {
            return Route::Ignored;
        };
        if element.tag != Tag::Button {
            return Route::Ignored;
        }
        let Some(action) = element.data("action").filter(|a| !a.is_empty()) else {
            return Route::Ignored;
        };

        let mut command = Command::new(action);
        if let Some(direction) = element.data("direction") {
            command = command.with_direction(direction);
        }
        Route::Command(command)
    }
}
