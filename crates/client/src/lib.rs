//! Client side of gridbot: keeps a page in sync with the game server.
//!
//! The page is rebuilt from each server snapshot; the only state carried
//! between renders is the message region and its pending clear.

mod bootstrap;
mod config;
mod controller;
mod dispatch;
mod notifier;
mod render;
mod router;
pub mod view;

pub use bootstrap::bootstrap;
pub use config::{ClientConfig, Endpoints, DEFAULT_BASE_URL};
pub use controller::Controller;
pub use dispatch::{apply_outcome, CommandOutcome, Dispatcher, COMMAND_FAILED_PREFIX};
pub use notifier::{Notifier, DEFAULT_MESSAGE_TIMEOUT, SUCCESS_MESSAGE};
pub use render::{render, EMPTY_LABEL};
pub use router::{InputRouter, Navigator, Route, UiEvent};
pub use view::{Document, Element, Tag};
