use std::collections::HashMap;
use std::fmt;

use crate::api::collections::CollectionKey;
use crate::api::transport::HttpMethod;

use super::field::{FieldDescriptor, FieldValue};

/// Key identifying one form instance's stored state.
///
/// Two panels showing the same form type at the same time (e.g. editing two
/// badge classes) get distinct ids by scoping the kind with an instance key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FormId {
    kind: String,
    instance: Option<String>,
}

impl FormId {
    pub fn new(kind: &str) -> Self {
        Self {
            kind: kind.to_string(),
            instance: None,
        }
    }

    pub fn scoped(kind: &str, instance: &str) -> Self {
        Self {
            kind: kind.to_string(),
            instance: Some(instance.to_string()),
        }
    }

    /// The form type, shared by all instances; defaults registered on the
    /// store are keyed by this.
    pub fn kind(&self) -> &str {
        &self.kind
    }
}

impl fmt::Display for FormId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.instance {
            Some(instance) => write!(f, "{}:{}", self.kind, instance),
            None => write!(f, "{}", self.kind),
        }
    }
}

/// How a form's data maps onto a REST submission.
#[derive(Debug, Clone)]
pub struct ApiContext {
    /// Collection updated with the parsed response record on success.
    pub collection: CollectionKey,
    pub action_url: String,
    pub method: HttpMethod,
    pub success_statuses: Vec<u16>,
    pub success_message: String,
}

/// Layout-only grouping of field names; carries no validation semantics.
#[derive(Debug, Clone)]
pub struct ColumnGroup {
    pub title: Option<String>,
    pub fields: Vec<String>,
}

impl ColumnGroup {
    pub fn new(fields: &[&str]) -> Self {
        Self {
            title: None,
            fields: fields.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn titled(title: &str, fields: &[&str]) -> Self {
        Self {
            title: Some(title.to_string()),
            fields: fields.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Everything a render surface needs to show one form and submit it.
#[derive(Debug, Clone)]
pub struct FormConfig {
    pub form_id: FormId,
    /// Ordered; render order is this list, independent of column grouping.
    pub fields: Vec<FieldDescriptor>,
    pub columns: Vec<ColumnGroup>,
    pub api: ApiContext,
    pub help_text: Option<String>,
    /// When set, the surface submits after every field change instead of
    /// once at the end.
    pub submit_immediately: bool,
}

impl FormConfig {
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Initial field values for a fresh form state: each descriptor's
    /// default, skipping fields that default to empty.
    pub fn initial_values(&self) -> HashMap<String, FieldValue> {
        self.fields
            .iter()
            .filter(|f| f.default_value != FieldValue::Empty)
            .map(|f| (f.name.clone(), f.default_value.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::field::InputKind;

    #[test]
    fn scoped_form_ids_are_distinct() {
        let a = FormId::scoped("BadgeClassCreateUpdateForm", "chess-club/grandmaster");
        let b = FormId::scoped("BadgeClassCreateUpdateForm", "chess-club/novice");
        assert_ne!(a, b);
        assert_eq!(a.kind(), b.kind());
        assert_eq!(
            a.to_string(),
            "BadgeClassCreateUpdateForm:chess-club/grandmaster"
        );
    }

    #[test]
    fn initial_values_skip_empty_defaults() {
        let config = FormConfig {
            form_id: FormId::new("TestForm"),
            fields: vec![
                FieldDescriptor::new("name", InputKind::Text, "Name"),
                FieldDescriptor::new("notify", InputKind::Checkbox, "Notify")
                    .default_value(FieldValue::Toggle(false)),
            ],
            columns: vec![],
            api: ApiContext {
                collection: CollectionKey::IssuerIssuers,
                action_url: "/v1/issuer/issuers".into(),
                method: HttpMethod::Post,
                success_statuses: vec![200, 201],
                success_message: "ok".into(),
            },
            help_text: None,
            submit_immediately: false,
        };

        let initial = config.initial_values();
        assert!(!initial.contains_key("name"));
        assert_eq!(initial.get("notify"), Some(&FieldValue::Toggle(false)));
    }
}
