use anyhow::{Context, Result};
use colored::Colorize;
use dialoguer::{Input, Password, Select};
use std::fs;
use std::path::Path;

use crate::config::ServerConfig;
use crate::forms::field::{FieldDescriptor, FieldValue, ImageSource, InputKind};

/// Interactive confirmation prompt using arrow-key navigable selection
///
/// # Arguments
/// * `prompt` - The question to ask the user
/// * `default_yes` - Whether "Yes" should be the default selection (index 0)
///
/// # Returns
/// * `Ok(true)` if user selects "Yes"
/// * `Ok(false)` if user selects "No"
pub fn prompt_confirmation(prompt: &str, default_yes: bool) -> Result<bool> {
    let items = vec!["Yes", "No"];
    let default_index = if default_yes { 0 } else { 1 };

    let selection = Select::new()
        .with_prompt(prompt)
        .items(&items)
        .default(default_index)
        .interact()?;

    Ok(selection == 0)
}

/// Prompts for one form field according to its input kind. Returns `None`
/// when the user leaves an optional field blank.
pub fn prompt_field_value(
    descriptor: &FieldDescriptor,
    current: Option<&FieldValue>,
) -> Result<Option<FieldValue>> {
    let label = if descriptor.required {
        format!("{} {}", descriptor.label, "*".red())
    } else {
        descriptor.label.clone()
    };

    match descriptor.input_kind {
        InputKind::Text | InputKind::Textarea => {
            let initial = current.and_then(|v| v.as_text()).unwrap_or("").to_string();
            let text = Input::<String>::new()
                .with_prompt(label)
                .with_initial_text(initial)
                .allow_empty(true)
                .interact_text()?;
            if text.is_empty() {
                Ok(None)
            } else {
                Ok(Some(FieldValue::Text(text)))
            }
        }
        InputKind::Checkbox => {
            let default_on = matches!(current, Some(FieldValue::Toggle(true)));
            let on = prompt_confirmation(&label, default_on)?;
            Ok(Some(FieldValue::Toggle(on)))
        }
        InputKind::Image => {
            let answer = Input::<String>::new()
                .with_prompt(format!("{label} (file path or URL, empty to skip)"))
                .allow_empty(true)
                .interact_text()?;
            if answer.is_empty() {
                Ok(None)
            } else {
                Ok(Some(image_value_from(&answer)?))
            }
        }
    }
}

/// Turns a CLI-supplied image argument into a field value: URLs become
/// references, anything else is read from disk as an upload.
pub fn image_value_from(path_or_url: &str) -> Result<FieldValue> {
    if path_or_url.starts_with("http://") || path_or_url.starts_with("https://") {
        return Ok(FieldValue::Image(ImageSource::Url(path_or_url.to_string())));
    }
    let path = Path::new(path_or_url);
    let bytes = fs::read(path)
        .with_context(|| format!("Failed to read image file: {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "upload.png".to_string());
    Ok(FieldValue::Image(ImageSource::File { file_name, bytes }))
}

pub fn prompt_server_config(defaults: Option<&ServerConfig>) -> Result<ServerConfig> {
    let base_url = Input::<String>::new()
        .with_prompt("Badge server URL (e.g. https://badges.example.org)")
        .with_initial_text(defaults.map(|d| d.base_url.clone()).unwrap_or_default())
        .interact_text()?;

    let api_token = Password::new()
        .with_prompt("API token (empty for session auth)")
        .allow_empty_password(true)
        .interact()?;

    let csrf_token = Password::new()
        .with_prompt("CSRF token (empty if unused)")
        .allow_empty_password(true)
        .interact()?;

    let default_issuer = Input::<String>::new()
        .with_prompt("Default issuer slug (optional)")
        .allow_empty(true)
        .interact_text()?;

    Ok(ServerConfig {
        base_url,
        api_token: if api_token.is_empty() {
            None
        } else {
            Some(api_token)
        },
        csrf_token: if csrf_token.is_empty() {
            None
        } else {
            Some(csrf_token)
        },
        default_issuer: if default_issuer.is_empty() {
            None
        } else {
            Some(default_issuer)
        },
    })
}

pub fn prompt_server_selection(names: &[String], current: Option<&String>) -> Result<String> {
    let mut items = Vec::new();
    for name in names {
        if current == Some(name) {
            items.push(format!("{} (current)", name));
        } else {
            items.push(name.clone());
        }
    }

    let selection = Select::new()
        .with_prompt("Select server")
        .items(&items)
        .interact()?;

    Ok(names[selection].clone())
}
