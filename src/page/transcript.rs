//! # Chat Transcript
//!
//! Ordered, append-only log of rendered chat entries. Every append returns an
//! [`EntryHandle`] so transient entries (the loading placeholder) can be
//! removed later.
//!
//! ```text
//! div.chat-message > div.message-user  > p > text                 user
//! div.chat-message > div.message-model > format(text)             model
//! div.chat-message.loading-message > div.message-model > p        loading
//! div.chat-message.error-message   > div.message-model > p.error-text
//! ```

use log::debug;

use crate::render::{Element, Html, format_nodes, serialize};

pub const LOADING_TEXT: &str = "Generating response...";
pub const ERROR_PREFIX: &str = "Error: ";
pub const WELCOME_TITLE: &str = "Welcome";
pub const WELCOME_TEXT: &str = "Ask the model anything to start a conversation.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Model,
    Error,
    Loading,
}

/// What was rendered, and where in the transcript it landed.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub role: Role,
    pub text: String,
    pub rendered_at: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryHandle(u64);

#[derive(Debug, Clone)]
pub struct Entry {
    handle: EntryHandle,
    message: Message,
    node: Element,
}

impl Entry {
    pub fn handle(&self) -> EntryHandle {
        self.handle
    }

    pub fn message(&self) -> &Message {
        &self.message
    }

    pub fn role(&self) -> Role {
        self.message.role
    }

    pub fn node(&self) -> &Element {
        &self.node
    }
}

#[derive(Debug, Clone)]
pub struct Transcript {
    entries: Vec<Entry>,
    welcome: Option<Element>,
    next_ordinal: u64,
    scroll_requested: bool,
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}

impl Transcript {
    /// A fresh transcript showing the welcome placeholder.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            welcome: Some(welcome_node()),
            next_ordinal: 0,
            scroll_requested: false,
        }
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn welcome(&self) -> Option<&Element> {
        self.welcome.as_ref()
    }

    pub fn add_user_message(&mut self, text: &str) -> EntryHandle {
        if self.welcome.take().is_some() {
            debug!("Removed welcome placeholder");
        }

        let node = entry_shell(&[])
            .child(Element::new("div").class("message-user").child(Element::new("p").text(text)));
        let handle = self.append(Role::User, text, node);
        self.scroll_to_bottom();
        handle
    }

    pub fn add_loading_message(&mut self) -> EntryHandle {
        let node = entry_shell(&["loading-message"]).child(
            Element::new("div")
                .class("message-model")
                .child(Element::new("p").text(LOADING_TEXT)),
        );
        let handle = self.append(Role::Loading, LOADING_TEXT, node);
        self.scroll_to_bottom();
        handle
    }

    /// Appends a formatted model reply. Does not scroll; callers do.
    pub fn add_model_message(&mut self, text: &str) -> EntryHandle {
        let node = entry_shell(&[]).child(
            Element::new("div")
                .class("message-model")
                .children_from(format_nodes(text)),
        );
        self.append(Role::Model, text, node)
    }

    pub fn add_error_message(&mut self, text: &str) -> EntryHandle {
        let node = entry_shell(&["error-message"]).child(
            Element::new("div").class("message-model").child(
                Element::new("p")
                    .class("error-text")
                    .text(format!("{ERROR_PREFIX}{text}")),
            ),
        );
        self.append(Role::Error, text, node)
    }

    /// Removes an entry. Returns false if it was already gone.
    pub fn remove(&mut self, handle: EntryHandle) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.handle != handle);
        before != self.entries.len()
    }

    /// Asks the view to jump to the maximum scroll extent (not animated).
    pub fn scroll_to_bottom(&mut self) {
        self.scroll_requested = true;
    }

    /// Consumes a pending scroll-to-bottom request.
    pub fn take_scroll_request(&mut self) -> bool {
        std::mem::take(&mut self.scroll_requested)
    }

    /// The whole container as markup (welcome placeholder included).
    pub fn to_html(&self) -> Html {
        let mut nodes = Vec::with_capacity(self.entries.len() + 1);
        if let Some(welcome) = &self.welcome {
            nodes.push(welcome.clone().into());
        }
        nodes.extend(self.entries.iter().map(|e| e.node.clone().into()));
        serialize(&nodes)
    }

    fn append(&mut self, role: Role, text: &str, node: Element) -> EntryHandle {
        let ordinal = self.next_ordinal;
        self.next_ordinal += 1;

        debug!("Transcript #{ordinal} {role:?}: {}", node.outer_html());

        let handle = EntryHandle(ordinal);
        self.entries.push(Entry {
            handle,
            message: Message {
                role,
                text: text.to_string(),
                rendered_at: ordinal,
            },
            node,
        });
        handle
    }
}

fn entry_shell(extra_classes: &[&str]) -> Element {
    extra_classes
        .iter()
        .fold(Element::new("div").class("chat-message"), |el, class| {
            el.class(*class)
        })
}

fn welcome_node() -> Element {
    Element::new("div")
        .class("welcome-message")
        .child(Element::new("h2").text(WELCOME_TITLE))
        .child(Element::new("p").text(WELCOME_TEXT))
}
