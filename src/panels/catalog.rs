//! Fully bound form and detail configurations for each panel kind, with
//! route parameters substituted into the action URLs.

use urlencoding::encode;

use crate::api::collections::CollectionKey;
use crate::api::transport::HttpMethod;
use crate::forms::config::{ApiContext, ColumnGroup, FormConfig, FormId};
use crate::forms::field::{FieldDescriptor, FieldValue, InputKind};

/// What a detail panel shows: labeled keys of one record in a collection.
#[derive(Debug, Clone)]
pub struct DetailViewSpec {
    pub title: String,
    pub collection: CollectionKey,
    pub slug: String,
    pub fields: Vec<(String, String)>,
}

pub fn issuer_create() -> FormConfig {
    issuer_form(
        FormId::new("IssuerCreateUpdateForm"),
        HttpMethod::Post,
        "/v1/issuer/issuers".to_string(),
        "New issuer created",
    )
}

pub fn issuer_edit(issuer: &str) -> FormConfig {
    issuer_form(
        FormId::scoped("IssuerCreateUpdateForm", issuer),
        HttpMethod::Put,
        format!("/v1/issuer/issuers/{}", encode(issuer)),
        "Issuer updated",
    )
}

fn issuer_form(
    form_id: FormId,
    method: HttpMethod,
    action_url: String,
    success_message: &str,
) -> FormConfig {
    FormConfig {
        form_id,
        fields: vec![
            FieldDescriptor::new("name", InputKind::Text, "Issuer Name").required(),
            FieldDescriptor::new("description", InputKind::Textarea, "Issuer Description")
                .required(),
            FieldDescriptor::new("url", InputKind::Text, "Website URL").required(),
            FieldDescriptor::new("email", InputKind::Text, "Contact Email").required(),
            FieldDescriptor::new("image", InputKind::Image, "Logo").file_name("issuer_logo.png"),
        ],
        columns: vec![
            ColumnGroup::titled("Branding", &["image"]),
            ColumnGroup::titled("Profile", &["name", "description", "url", "email"]),
        ],
        api: ApiContext {
            collection: CollectionKey::IssuerIssuers,
            action_url,
            method,
            success_statuses: vec![200, 201],
            success_message: success_message.to_string(),
        },
        help_text: None,
        submit_immediately: false,
    }
}

pub fn badge_class_create(issuer: &str) -> FormConfig {
    badge_class_form(
        FormId::scoped("BadgeClassCreateUpdateForm", issuer),
        HttpMethod::Post,
        format!("/v1/issuer/issuers/{}/badges", encode(issuer)),
        "New badge class created",
    )
}

pub fn badge_class_edit(issuer: &str, badge: &str) -> FormConfig {
    badge_class_form(
        FormId::scoped("BadgeClassCreateUpdateForm", &format!("{issuer}/{badge}")),
        HttpMethod::Put,
        format!(
            "/v1/issuer/issuers/{}/badges/{}",
            encode(issuer),
            encode(badge)
        ),
        "Badge class updated",
    )
}

fn badge_class_form(
    form_id: FormId,
    method: HttpMethod,
    action_url: String,
    success_message: &str,
) -> FormConfig {
    FormConfig {
        form_id,
        fields: vec![
            FieldDescriptor::new("name", InputKind::Text, "Badge Name").required(),
            FieldDescriptor::new("description", InputKind::Textarea, "Badge Description")
                .required(),
            FieldDescriptor::new("criteria", InputKind::Textarea, "Criteria").required(),
            FieldDescriptor::new("image", InputKind::Image, "Badge Image")
                .file_name("badge_class_image.png"),
        ],
        columns: vec![
            ColumnGroup::titled("Artwork", &["image"]),
            ColumnGroup::titled("Details", &["name", "description", "criteria"]),
        ],
        api: ApiContext {
            collection: CollectionKey::IssuerBadgeClasses,
            action_url,
            method,
            success_statuses: vec![200, 201],
            success_message: success_message.to_string(),
        },
        help_text: Some(
            "Criteria describes what an earner must do to receive this badge.".to_string(),
        ),
        submit_immediately: false,
    }
}

pub fn assertion_issue(issuer: &str, badge: &str) -> FormConfig {
    FormConfig {
        form_id: FormId::scoped("BadgeInstanceIssueForm", &format!("{issuer}/{badge}")),
        fields: vec![
            FieldDescriptor::new("email", InputKind::Text, "Recipient Email").required(),
            FieldDescriptor::new("evidence", InputKind::Text, "Evidence URL"),
            FieldDescriptor::new(
                "create_notification",
                InputKind::Checkbox,
                "Notify Recipient",
            )
            .default_value(FieldValue::Toggle(false)),
        ],
        columns: vec![ColumnGroup::new(&["email", "evidence", "create_notification"])],
        api: ApiContext {
            collection: CollectionKey::IssuerBadges,
            action_url: format!(
                "/v1/issuer/issuers/{}/badges/{}/assertions",
                encode(issuer),
                encode(badge)
            ),
            method: HttpMethod::Post,
            success_statuses: vec![200, 201],
            success_message: "Badge issued".to_string(),
        },
        help_text: None,
        submit_immediately: false,
    }
}

pub fn earner_badge_upload(recipient_ids: &[String]) -> FormConfig {
    let default_recipient = recipient_ids
        .first()
        .map(|id| FieldValue::text(id.clone()))
        .unwrap_or(FieldValue::Empty);
    FormConfig {
        form_id: FormId::new("EarnerBadgeForm"),
        fields: vec![
            FieldDescriptor::new("recipient_input", InputKind::Text, "Recipient Identifier")
                .required()
                .default_value(default_recipient),
            FieldDescriptor::new("earner_description", InputKind::Textarea, "Description"),
            FieldDescriptor::new("image", InputKind::Image, "Badge Image")
                .required()
                .file_name("earner_badge_upload.png"),
        ],
        columns: vec![
            ColumnGroup::new(&["image"]),
            ColumnGroup::new(&["recipient_input", "earner_description"]),
        ],
        api: ApiContext {
            collection: CollectionKey::EarnerBadges,
            action_url: "/v1/earner/badges".to_string(),
            method: HttpMethod::Post,
            success_statuses: vec![200, 201],
            success_message: "Badge added to your backpack".to_string(),
        },
        help_text: Some("Upload a baked badge image you have been awarded.".to_string()),
        submit_immediately: false,
    }
}

pub fn issuer_notification() -> FormConfig {
    FormConfig {
        form_id: FormId::new("IssuerNotificationForm"),
        fields: vec![
            FieldDescriptor::new("email", InputKind::Text, "Earner Email").required(),
            FieldDescriptor::new("url", InputKind::Text, "Badge URL").required(),
        ],
        columns: vec![ColumnGroup::new(&["email", "url"])],
        api: ApiContext {
            collection: CollectionKey::EarnerNotifications,
            action_url: "/v1/earner/notifications".to_string(),
            method: HttpMethod::Post,
            success_statuses: vec![200, 201],
            success_message: "Notification sent".to_string(),
        },
        help_text: None,
        submit_immediately: false,
    }
}

pub fn badge_detail(badge_slug: &str) -> DetailViewSpec {
    DetailViewSpec {
        title: format!("Badge {badge_slug}"),
        collection: CollectionKey::EarnerBadges,
        slug: badge_slug.to_string(),
        fields: vec![
            ("Badge".to_string(), "name".to_string()),
            ("Recipient".to_string(), "email".to_string()),
            ("Image".to_string(), "image".to_string()),
            ("Awarded".to_string(), "created_at".to_string()),
        ],
    }
}
