//! Inbound interaction and outbound effect types.
//!
//! Effects are pure data. The dispatcher never touches the platform;
//! the shim on the far side of the NDJSON seam applies each effect to
//! the originating interaction in order.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::view::{ActionRow, Document, Form};

/// The acting principal, as reported by the platform shim.
#[derive(Debug, Clone, Default)]
pub struct Invoker {
    pub user_id: String,
    pub username: String,
    pub role_ids: Vec<String>,
}

/// One inbound interaction event.
#[derive(Debug, Clone)]
pub enum Interaction {
    /// Slash-command invocation with named string options.
    Command {
        name: String,
        options: BTreeMap<String, String>,
        invoker: Invoker,
    },
    /// Option autocomplete; `focused` is the partial value typed so far.
    Autocomplete { name: String, focused: String },
    /// Button press carrying only its component identifier.
    Button { custom_id: String, invoker: Invoker },
    /// Select-menu submit with the chosen values.
    Select {
        custom_id: String,
        values: Vec<String>,
        invoker: Invoker,
    },
    /// Modal form submit with the filled fields.
    Form {
        custom_id: String,
        fields: BTreeMap<String, String>,
        invoker: Invoker,
    },
}

impl Interaction {
    /// Short kind tag for logging.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Command { .. } => "command",
            Self::Autocomplete { .. } => "autocomplete",
            Self::Button { .. } => "button",
            Self::Select { .. } => "select",
            Self::Form { .. } => "form",
        }
    }
}

/// One autocomplete suggestion.
#[derive(Debug, Clone, Serialize)]
pub struct Choice {
    pub name: String,
    pub value: String,
}

/// One render effect, applied by the shim in emission order.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum Effect {
    /// Acknowledge now, render later.
    Defer { ephemeral: bool },
    /// New message in reply to the interaction.
    Reply {
        document: Document,
        components: Vec<ActionRow>,
        ephemeral: bool,
    },
    /// Fill in the deferred reply.
    EditReply {
        document: Document,
        components: Vec<ActionRow>,
    },
    /// Replace the message the component lives on.
    UpdateMessage {
        document: Document,
        components: Vec<ActionRow>,
    },
    /// Additional message after the initial response.
    FollowUp { document: Document, ephemeral: bool },
    /// Open a modal form (components and commands only).
    OpenForm { form: Form },
    /// Autocomplete suggestion list.
    Choices { choices: Vec<Choice> },
}

impl Effect {
    pub fn edit_reply(document: Document, components: Vec<ActionRow>) -> Self {
        Self::EditReply { document, components }
    }

    pub fn update(document: Document, components: Vec<ActionRow>) -> Self {
        Self::UpdateMessage { document, components }
    }

    pub fn ephemeral_reply(document: Document) -> Self {
        Self::Reply {
            document,
            components: Vec::new(),
            ephemeral: true,
        }
    }
}
