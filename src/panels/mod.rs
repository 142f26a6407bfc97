//! Panel dispatch: a tagged union of known panel kinds, resolution to a
//! bound form or detail configuration, and the active-panel lifecycle.

pub mod catalog;

use log::{debug, info, warn};

use crate::forms::config::{FormConfig, FormId};
use crate::forms::store::FormStore;

pub use catalog::DetailViewSpec;

/// A panel the application can show, with its typed context. Unknown panel
/// kinds only exist at the stringly CLI boundary ([`Panel::parse`]); past it
/// dispatch is an exhaustive match.
#[derive(Debug, Clone, PartialEq)]
pub enum Panel {
    BadgeDetail { badge_slug: String },
    EarnerBadgeUpload { recipient_ids: Vec<String> },
    IssuerCreate,
    IssuerEdit { issuer: String },
    BadgeClassCreate { issuer: String },
    BadgeClassEdit { issuer: String, badge: String },
    AssertionIssue { issuer: String, badge: String },
    IssuerNotification,
}

/// Context values a caller can hand to [`Panel::parse`]; which ones are
/// needed depends on the panel name.
#[derive(Debug, Clone, Default)]
pub struct PanelContext {
    pub issuer: Option<String>,
    pub badge: Option<String>,
    pub recipient_ids: Vec<String>,
}

impl Panel {
    /// Maps a panel name plus context to a panel, or `None` for unknown
    /// names and missing context. Never panics; callers render an empty
    /// panel on `None`.
    pub fn parse(name: &str, context: &PanelContext) -> Option<Panel> {
        let panel = match name {
            "OpenBadgeDisplay" | "BadgeDisplay" => Panel::BadgeDetail {
                badge_slug: context.badge.clone()?,
            },
            "EarnerBadgeForm" => Panel::EarnerBadgeUpload {
                recipient_ids: context.recipient_ids.clone(),
            },
            "IssuerCreateUpdateForm" => match &context.issuer {
                Some(issuer) => Panel::IssuerEdit {
                    issuer: issuer.clone(),
                },
                None => Panel::IssuerCreate,
            },
            "BadgeClassCreateUpdateForm" => {
                let issuer = context.issuer.clone()?;
                match &context.badge {
                    Some(badge) => Panel::BadgeClassEdit {
                        issuer,
                        badge: badge.clone(),
                    },
                    None => Panel::BadgeClassCreate { issuer },
                }
            }
            "BadgeInstanceIssueForm" => Panel::AssertionIssue {
                issuer: context.issuer.clone()?,
                badge: context.badge.clone()?,
            },
            "IssuerNotificationForm" => Panel::IssuerNotification,
            other => {
                warn!("unknown panel type '{other}'");
                return None;
            }
        };
        Some(panel)
    }
}

/// What a resolved panel mounts: a bound form or a detail display.
#[derive(Debug, Clone)]
pub enum PanelView {
    Form(FormConfig),
    Detail(DetailViewSpec),
}

/// Produces the fully bound configuration for a panel.
pub fn resolve(panel: &Panel) -> PanelView {
    match panel {
        Panel::BadgeDetail { badge_slug } => PanelView::Detail(catalog::badge_detail(badge_slug)),
        Panel::EarnerBadgeUpload { recipient_ids } => {
            PanelView::Form(catalog::earner_badge_upload(recipient_ids))
        }
        Panel::IssuerCreate => PanelView::Form(catalog::issuer_create()),
        Panel::IssuerEdit { issuer } => PanelView::Form(catalog::issuer_edit(issuer)),
        Panel::BadgeClassCreate { issuer } => PanelView::Form(catalog::badge_class_create(issuer)),
        Panel::BadgeClassEdit { issuer, badge } => {
            PanelView::Form(catalog::badge_class_edit(issuer, badge))
        }
        Panel::AssertionIssue { issuer, badge } => {
            PanelView::Form(catalog::assertion_issue(issuer, badge))
        }
        Panel::IssuerNotification => PanelView::Form(catalog::issuer_notification()),
    }
}

/// The single active panel: closed -> open -> closed, nothing in between.
///
/// Opening while open replaces the current panel; closing discards the
/// panel's form state and is idempotent.
#[derive(Default)]
pub struct ActivePanel {
    current: Option<(Panel, Option<FormId>)>,
}

impl ActivePanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves and mounts `panel`, initializing its form state from the
    /// catalog defaults. Any previously open panel is closed first.
    pub fn open(&mut self, panel: Panel, forms: &mut FormStore) -> PanelView {
        self.close(forms);
        let view = resolve(&panel);
        let form_id = match &view {
            PanelView::Form(config) => {
                forms.get_or_init(&config.form_id, config.initial_values());
                Some(config.form_id.clone())
            }
            PanelView::Detail(_) => None,
        };
        info!("opening panel {panel:?}");
        self.current = Some((panel, form_id));
        view
    }

    /// Clears the active panel handle and its form state. Safe to call when
    /// nothing is open.
    pub fn close(&mut self, forms: &mut FormStore) {
        if let Some((panel, form_id)) = self.current.take() {
            debug!("closing panel {panel:?}");
            if let Some(form_id) = form_id {
                forms.discard(&form_id);
            }
        }
    }

    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    pub fn panel(&self) -> Option<&Panel> {
        self.current.as_ref().map(|(panel, _)| panel)
    }

    pub fn form_id(&self) -> Option<&FormId> {
        self.current.as_ref().and_then(|(_, id)| id.as_ref())
    }
}
