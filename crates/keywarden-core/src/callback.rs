//! Callback-identifier codec for interactive components.
//!
//! Interactive components round-trip a small opaque string through the
//! chat platform; a later button press, form submit, or select arrives
//! carrying nothing else. The identifier therefore embeds the full
//! routing state as `"<domain>_<action>:<entity_id>"`.
//!
//! Grammar: the token is split at the FIRST `_` (domain vs rest), then
//! the rest at the FIRST `:` (action vs entity id). Domain and action
//! tokens never contain the separators (they are closed enums); the
//! entity id may contain `:` freely and `_` anywhere, since both splits
//! happen before it.

use std::fmt;

use thiserror::Error;

/// Routing domain of a callback identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Domain {
    /// Single-license management panel.
    License,
    /// Single-app management panel.
    App,
    /// Two-section list browser (apps / licenses).
    List,
    /// License-key browser.
    ListKeys,
}

impl Domain {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::License => "license",
            Self::App => "app",
            Self::List => "list",
            Self::ListKeys => "listkeys",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "license" => Some(Self::License),
            "app" => Some(Self::App),
            "list" => Some(Self::List),
            "listkeys" => Some(Self::ListKeys),
            _ => None,
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Actions available on a license panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LicenseAction {
    Toggle,
    ResetHwid,
    Extend,
    SetExpiration,
    ChangeApp,
    Ban,
    Unban,
    Delete,
}

impl LicenseAction {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Toggle => "toggle",
            Self::ResetHwid => "reset",
            Self::Extend => "extend",
            Self::SetExpiration => "setexp",
            Self::ChangeApp => "changeapp",
            Self::Ban => "ban",
            Self::Unban => "unban",
            Self::Delete => "delete",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "toggle" => Some(Self::Toggle),
            "reset" => Some(Self::ResetHwid),
            "extend" => Some(Self::Extend),
            "setexp" => Some(Self::SetExpiration),
            "changeapp" => Some(Self::ChangeApp),
            "ban" => Some(Self::Ban),
            "unban" => Some(Self::Unban),
            "delete" => Some(Self::Delete),
            _ => None,
        }
    }
}

/// Actions available on an app panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppAction {
    Toggle,
    Rename,
    DeactivateAll,
}

impl AppAction {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Toggle => "toggle",
            Self::Rename => "rename",
            Self::DeactivateAll => "deactivateall",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "toggle" => Some(Self::Toggle),
            "rename" => Some(Self::Rename),
            "deactivateall" => Some(Self::DeactivateAll),
            _ => None,
        }
    }
}

/// Decoded action, typed per domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    License(LicenseAction),
    App(AppAction),
    /// Page navigation in a list browser; the entity id carries the target.
    Page,
    /// Return to the list browser's section-selection view.
    Home,
}

impl Action {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::License(a) => a.as_str(),
            Self::App(a) => a.as_str(),
            Self::Page => "page",
            Self::Home => "home",
        }
    }
}

/// A fully decoded callback identifier: (domain, action, entity id).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackId {
    pub domain: Domain,
    pub action: Action,
    pub entity_id: String,
}

/// Why a component identifier could not be decoded.
///
/// `NotActionable` means the token lacks the grammar entirely (no `:`
/// or no `_`); callers must treat every variant as "ignore this
/// interaction", never as a fault.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("token carries no routing state")]
    NotActionable,
    #[error("unknown domain: {0}")]
    UnknownDomain(String),
    #[error("unknown action for domain {domain}: {action}")]
    UnknownAction { domain: Domain, action: String },
}

impl CallbackId {
    pub fn license(action: LicenseAction, id: &str) -> Self {
        Self {
            domain: Domain::License,
            action: Action::License(action),
            entity_id: id.to_string(),
        }
    }

    pub fn app(action: AppAction, id: &str) -> Self {
        Self {
            domain: Domain::App,
            action: Action::App(action),
            entity_id: id.to_string(),
        }
    }

    /// List-browser page navigation. The entity id is `<section>:<page>`;
    /// the second `:`-segment survives because decode splits once only.
    pub fn list_page(section: &str, page: i64) -> Self {
        Self {
            domain: Domain::List,
            action: Action::Page,
            entity_id: format!("{section}:{page}"),
        }
    }

    pub fn list_home() -> Self {
        Self {
            domain: Domain::List,
            action: Action::Home,
            entity_id: "main".to_string(),
        }
    }

    pub fn keys_page(page: i64) -> Self {
        Self {
            domain: Domain::ListKeys,
            action: Action::Page,
            entity_id: page.to_string(),
        }
    }

    /// Encode into the platform's component-identifier field.
    pub fn encode(&self) -> String {
        format!(
            "{}_{}:{}",
            self.domain.as_str(),
            self.action.as_str(),
            self.entity_id
        )
    }

    /// Decode a component identifier back into routing state.
    pub fn decode(token: &str) -> Result<Self, DecodeError> {
        let (domain_str, rest) = token.split_once('_').ok_or(DecodeError::NotActionable)?;
        let (action_str, entity_id) = rest.split_once(':').ok_or(DecodeError::NotActionable)?;

        let domain = Domain::parse(domain_str)
            .ok_or_else(|| DecodeError::UnknownDomain(domain_str.to_string()))?;

        let unknown_action = || DecodeError::UnknownAction {
            domain,
            action: action_str.to_string(),
        };

        let action = match domain {
            Domain::License => LicenseAction::parse(action_str)
                .map(Action::License)
                .ok_or_else(unknown_action)?,
            Domain::App => AppAction::parse(action_str)
                .map(Action::App)
                .ok_or_else(unknown_action)?,
            Domain::List => match action_str {
                "page" => Action::Page,
                "home" => Action::Home,
                _ => return Err(unknown_action()),
            },
            Domain::ListKeys => match action_str {
                "page" => Action::Page,
                _ => return Err(unknown_action()),
            },
        };

        Ok(Self {
            domain,
            action,
            entity_id: entity_id.to_string(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_license_actions() {
        let actions = [
            LicenseAction::Toggle,
            LicenseAction::ResetHwid,
            LicenseAction::Extend,
            LicenseAction::SetExpiration,
            LicenseAction::ChangeApp,
            LicenseAction::Ban,
            LicenseAction::Unban,
            LicenseAction::Delete,
        ];
        for action in actions {
            let id = CallbackId::license(action, "b0a1c2d3-e4f5-6789");
            let decoded = CallbackId::decode(&id.encode()).unwrap();
            assert_eq!(decoded, id);
        }
    }

    #[test]
    fn roundtrip_app_actions() {
        for action in [AppAction::Toggle, AppAction::Rename, AppAction::DeactivateAll] {
            let id = CallbackId::app(action, "some-uuid");
            assert_eq!(CallbackId::decode(&id.encode()).unwrap(), id);
        }
    }

    #[test]
    fn entity_id_may_contain_colons() {
        let id = CallbackId::list_page("app", 3);
        assert_eq!(id.encode(), "list_page:app:3");

        let decoded = CallbackId::decode("list_page:app:3").unwrap();
        assert_eq!(decoded.domain, Domain::List);
        assert_eq!(decoded.action, Action::Page);
        assert_eq!(decoded.entity_id, "app:3");
    }

    #[test]
    fn entity_id_may_contain_underscores() {
        let decoded = CallbackId::decode("license_toggle:ab_cd_ef").unwrap();
        assert_eq!(decoded.entity_id, "ab_cd_ef");
    }

    #[test]
    fn token_without_colon_is_not_actionable() {
        assert_eq!(
            CallbackId::decode("license_toggle"),
            Err(DecodeError::NotActionable)
        );
        assert_eq!(CallbackId::decode("plainbutton"), Err(DecodeError::NotActionable));
    }

    #[test]
    fn token_without_underscore_is_not_actionable() {
        assert_eq!(
            CallbackId::decode("license:toggle"),
            Err(DecodeError::NotActionable)
        );
    }

    #[test]
    fn unknown_domain_is_rejected_softly() {
        assert!(matches!(
            CallbackId::decode("webhook_toggle:abc"),
            Err(DecodeError::UnknownDomain(_))
        ));
    }

    #[test]
    fn unknown_action_is_rejected_softly() {
        assert!(matches!(
            CallbackId::decode("app_explode:abc"),
            Err(DecodeError::UnknownAction { .. })
        ));
        // "home" exists in the list domain only
        assert!(matches!(
            CallbackId::decode("listkeys_home:main"),
            Err(DecodeError::UnknownAction { .. })
        ));
    }

    #[test]
    fn keys_page_roundtrip() {
        let id = CallbackId::keys_page(7);
        assert_eq!(id.encode(), "listkeys_page:7");
        assert_eq!(CallbackId::decode("listkeys_page:7").unwrap(), id);
    }
}
