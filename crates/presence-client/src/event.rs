//! Page events fed into a tracking session by the embedding page.

use serde::{Deserialize, Serialize};

/// Interaction classes that count as user activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    PointerDown,
    PointerMove,
    KeyPress,
    Scroll,
    TouchStart,
    Click,
    Focus,
}

impl InteractionKind {
    /// Every subscribed interaction class.
    pub const ALL: [InteractionKind; 7] = [
        Self::PointerDown,
        Self::PointerMove,
        Self::KeyPress,
        Self::Scroll,
        Self::TouchStart,
        Self::Click,
        Self::Focus,
    ];

    /// DOM event name the class is raised from.
    pub fn dom_event(&self) -> &'static str {
        match self {
            Self::PointerDown => "mousedown",
            Self::PointerMove => "mousemove",
            Self::KeyPress => "keypress",
            Self::Scroll => "scroll",
            Self::TouchStart => "touchstart",
            Self::Click => "click",
            Self::Focus => "focus",
        }
    }

    /// Map a DOM event name back to its class.
    pub fn from_dom_event(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.dom_event() == name)
    }
}

/// Page visibility as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Visible,
    Hidden,
}

/// Signals the embedding page forwards to its session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageEvent {
    /// A raw interaction event.
    Interaction(InteractionKind),
    /// The page became visible or hidden.
    VisibilityChanged(Visibility),
    /// The page is being unloaded or navigated away from.
    Unload,
}
