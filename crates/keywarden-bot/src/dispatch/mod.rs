//! Action dispatcher.
//!
//! One inbound interaction in, an ordered list of render effects out.
//! Routing is a static exhaustive match over the decoded callback
//! identifier; there is no runtime handler registration and at most one
//! handler runs per interaction. Unknown tokens are a silent no-op so
//! the panel coexists with foreign components on shared messages.

pub mod app;
pub mod interaction;
pub mod license;
pub mod lists;

use keywarden_core::{Action, CallbackId, Domain, PanelConfig, Result};

use crate::audit::AuditSink;
use crate::commands;
use crate::storage::Database;
use crate::view::Severity;
use crate::view::license::notice;

pub use interaction::{Choice, Effect, Interaction, Invoker};

/// Routes interactions to handlers and owns the error boundary.
#[derive(Clone)]
pub struct Dispatcher {
    db: Database,
    config: PanelConfig,
    audit: AuditSink,
}

impl Dispatcher {
    pub fn new(db: Database, config: PanelConfig, audit: AuditSink) -> Self {
        Self { db, config, audit }
    }

    /// Handle one interaction. Never fails: store and handler errors are
    /// converted into operator-facing effects here.
    pub async fn dispatch(&self, interaction: &Interaction) -> Vec<Effect> {
        match interaction {
            Interaction::Command { name, options, invoker } => {
                self.dispatch_command(name, options, invoker).await
            }
            Interaction::Autocomplete { name, focused } => {
                self.dispatch_autocomplete(name, focused).await
            }
            Interaction::Button { custom_id, invoker } => {
                let Some(decoded) = decode_or_ignore(custom_id) else {
                    return vec![];
                };
                let result = self.dispatch_button(&decoded, invoker).await;
                self.boundary(result, invoker).await
            }
            Interaction::Select { custom_id, values, invoker } => {
                let Some(decoded) = decode_or_ignore(custom_id) else {
                    return vec![];
                };
                let result = match decoded.action {
                    Action::License(action) => {
                        license::handle_select(&self.db, action, &decoded.entity_id, values).await
                    }
                    _ => Ok(vec![]),
                };
                self.boundary(result, invoker).await
            }
            Interaction::Form { custom_id, fields, invoker } => {
                let Some(decoded) = decode_or_ignore(custom_id) else {
                    return vec![];
                };
                let result = match decoded.action {
                    Action::License(action) => {
                        license::handle_form(&self.db, action, &decoded.entity_id, fields).await
                    }
                    Action::App(action) => {
                        app::handle_form(&self.db, action, &decoded.entity_id, fields).await
                    }
                    Action::Page | Action::Home => Ok(vec![]),
                };
                self.boundary(result, invoker).await
            }
        }
    }

    async fn dispatch_command(
        &self,
        name: &str,
        options: &std::collections::BTreeMap<String, String>,
        invoker: &Invoker,
    ) -> Vec<Effect> {
        if !self.config.is_authorized(&invoker.role_ids) {
            tracing::warn!(user = %invoker.username, command = name, "unauthorized invocation");
            self.audit
                .record(
                    Severity::Warning,
                    "Unauthorized command",
                    &format!("`/{name}` denied"),
                    &invoker.username,
                )
                .await;
            return vec![Effect::ephemeral_reply(notice(
                "Unauthorized",
                "You do not hold a role allowed to operate this panel.",
                Severity::Error,
            ))];
        }

        let result = match name {
            commands::CREATE_APP => commands::create_app(&self.db, options).await,
            commands::CREATE_LICENSE => commands::create_license(&self.db, options).await,
            commands::MANAGE_APP => commands::manage_app(&self.db, options).await,
            commands::MANAGE_LICENSE => commands::manage_license(&self.db, options).await,
            commands::LIST_ALL => commands::list_all(&self.db).await,
            commands::LIST_KEYS => commands::list_keys(&self.db).await,
            unknown => {
                tracing::debug!(command = unknown, "unknown command ignored");
                return vec![];
            }
        };

        // acknowledge first; the handler's reply lands as an edit
        let mut effects = vec![Effect::Defer { ephemeral: true }];
        effects.extend(self.boundary_deferred(result, invoker).await);
        effects
    }

    async fn dispatch_autocomplete(&self, name: &str, focused: &str) -> Vec<Effect> {
        let choices = match name {
            commands::MANAGE_APP | commands::CREATE_LICENSE => {
                commands::autocomplete_apps(&self.db, focused)
                    .await
                    .unwrap_or_else(|e| {
                        tracing::warn!("autocomplete lookup failed: {e}");
                        vec![]
                    })
            }
            _ => vec![],
        };
        vec![Effect::Choices { choices }]
    }

    async fn dispatch_button(&self, decoded: &CallbackId, invoker: &Invoker) -> Result<Vec<Effect>> {
        match decoded.action {
            Action::License(action) => {
                license::handle_button(&self.db, action, &decoded.entity_id, invoker).await
            }
            Action::App(action) => {
                app::handle_button(&self.db, action, &decoded.entity_id).await
            }
            Action::Page => match decoded.domain {
                Domain::ListKeys => lists::handle_keys_page(&self.db, &decoded.entity_id).await,
                _ => lists::handle_page(&self.db, &decoded.entity_id).await,
            },
            Action::Home => lists::handle_home(&self.db).await,
        }
    }

    /// Convert a handler outcome into effects for a component interaction.
    async fn boundary(&self, result: Result<Vec<Effect>>, invoker: &Invoker) -> Vec<Effect> {
        match result {
            Ok(effects) => effects,
            Err(e) if e.is_expected() => {
                vec![Effect::ephemeral_reply(notice(
                    "Action Failed",
                    &e.to_string(),
                    Severity::Warning,
                ))]
            }
            Err(e) => {
                tracing::error!("handler failed: {e}");
                self.audit
                    .record(Severity::Error, "Handler failure", &e.to_string(), &invoker.username)
                    .await;
                vec![Effect::ephemeral_reply(notice(
                    "Something Went Wrong",
                    "The action could not be completed. The failure was recorded.",
                    Severity::Error,
                ))]
            }
        }
    }

    /// Same boundary for a command already acknowledged with a defer: the
    /// notice must land as the deferred reply's edit.
    async fn boundary_deferred(&self, result: Result<Vec<Effect>>, invoker: &Invoker) -> Vec<Effect> {
        self.boundary(result, invoker)
            .await
            .into_iter()
            .map(|effect| match effect {
                Effect::Reply { document, components, .. } => {
                    Effect::EditReply { document, components }
                }
                other => other,
            })
            .collect()
    }
}

fn decode_or_ignore(custom_id: &str) -> Option<CallbackId> {
    match CallbackId::decode(custom_id) {
        Ok(decoded) => Some(decoded),
        Err(e) => {
            // foreign or malformed component; not ours to answer
            tracing::debug!(custom_id, "ignoring component: {e}");
            None
        }
    }
}
