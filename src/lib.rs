//! Orion: headless core for a voice/text assistant widget.
//!
//! The crate owns all widget behavior — listening state, command dispatch,
//! reply reveal, click-gated navigation, settings — while staying fully
//! presentation-agnostic. A host embeds it by feeding [`UiIntent`] values in
//! and rendering the [`WidgetEvent`] stream out, optionally wiring real
//! speech engines behind the [`speech`] trait seams.
//!
//! ```no_run
//! use orion::{AssistantClient, SettingsStore, Widget, WidgetParts};
//! use orion::command::KeywordMatcher;
//! use orion::gate::SystemOpener;
//! use std::sync::Arc;
//!
//! let client = AssistantClient::new("http://localhost:5000");
//! let store = SettingsStore::new(SettingsStore::default_path());
//! let (widget, events) = Widget::new(
//!     client,
//!     store,
//!     WidgetParts {
//!         recognition: None,
//!         synthesis: None,
//!         opener: Arc::new(SystemOpener),
//!         matcher: Arc::new(KeywordMatcher),
//!     },
//! );
//! # let _ = (widget, events);
//! ```

pub mod api;
pub mod app;
pub mod command;
pub mod dispatch;
pub mod error;
pub mod events;
pub mod gate;
pub mod render;
pub mod settings;
pub mod speech;

pub use api::{AssistantClient, AssistantReply, SongEntry};
pub use app::{Widget, WidgetParts};
pub use error::{Result, WidgetError};
pub use events::{event_channel, EventSink, UiIntent, ViewState, WidgetEvent};
pub use gate::{PendingAction, PendingActionGate, SystemOpener, UrlOpener};
pub use settings::{Settings, SettingsStore, ThemeColor};
