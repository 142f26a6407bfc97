use std::collections::HashMap;

/// The kind of input a form field renders as and validates against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Text,
    Textarea,
    Checkbox,
    Image,
}

impl InputKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputKind::Text => "text",
            InputKind::Textarea => "textarea",
            InputKind::Checkbox => "checkbox",
            InputKind::Image => "image",
        }
    }
}

/// Where an image field's content comes from: a local file to upload as a
/// binary part, or a reference to an already-hosted image.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageSource {
    File { file_name: String, bytes: Vec<u8> },
    Url(String),
}

/// A single field's current value.
///
/// `Empty` doubles as "never set"; checkbox fields use `Toggle` and are never
/// considered missing (an unchecked box is a valid answer).
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Empty,
    Text(String),
    Toggle(bool),
    Image(ImageSource),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn is_present(&self) -> bool {
        match self {
            FieldValue::Empty => false,
            FieldValue::Text(s) => !s.is_empty(),
            FieldValue::Toggle(_) => true,
            FieldValue::Image(_) => true,
        }
    }
}

/// Declarative metadata for one form field.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    pub name: String,
    pub input_kind: InputKind,
    pub label: String,
    pub required: bool,
    pub default_value: FieldValue,
    /// Upload file name for image fields, e.g. "issuer_logo.png".
    pub file_name: Option<String>,
}

impl FieldDescriptor {
    pub fn new(name: &str, input_kind: InputKind, label: &str) -> Self {
        Self {
            name: name.to_string(),
            input_kind,
            label: label.to_string(),
            required: false,
            default_value: FieldValue::Empty,
            file_name: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn default_value(mut self, value: FieldValue) -> Self {
        self.default_value = value;
        self
    }

    pub fn file_name(mut self, name: &str) -> Self {
        self.file_name = Some(name.to_string());
        self
    }

    /// Whether `value` satisfies this field's requiredness rule.
    ///
    /// Checkbox fields never fail (false is a valid answer). Image fields
    /// count as filled when either a file or a URL reference is present.
    pub fn is_satisfied_by(&self, value: Option<&FieldValue>) -> bool {
        if !self.required || self.input_kind == InputKind::Checkbox {
            return true;
        }
        match value {
            None => false,
            Some(v) => v.is_present(),
        }
    }
}

/// Returns the labels of required fields that are missing from `values`,
/// in descriptor order.
pub fn missing_required(
    fields: &[FieldDescriptor],
    values: &HashMap<String, FieldValue>,
) -> Vec<String> {
    fields
        .iter()
        .filter(|f| !f.is_satisfied_by(values.get(&f.name)))
        .map(|f| f.label.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(pairs: &[(&str, FieldValue)]) -> HashMap<String, FieldValue> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn required_text_field_rejects_empty_values() {
        let field = FieldDescriptor::new("name", InputKind::Text, "Name").required();

        assert!(!field.is_satisfied_by(None));
        assert!(!field.is_satisfied_by(Some(&FieldValue::Empty)));
        assert!(!field.is_satisfied_by(Some(&FieldValue::text(""))));
        assert!(field.is_satisfied_by(Some(&FieldValue::text("Lab Issuer"))));
    }

    #[test]
    fn optional_field_always_passes() {
        let field = FieldDescriptor::new("evidence", InputKind::Text, "Evidence");
        assert!(field.is_satisfied_by(None));
        assert!(field.is_satisfied_by(Some(&FieldValue::Empty)));
    }

    #[test]
    fn required_checkbox_never_fails() {
        let field =
            FieldDescriptor::new("create_notification", InputKind::Checkbox, "Notify").required();
        assert!(field.is_satisfied_by(None));
        assert!(field.is_satisfied_by(Some(&FieldValue::Toggle(false))));
    }

    #[test]
    fn image_field_accepts_file_or_url() {
        let field = FieldDescriptor::new("image", InputKind::Image, "Badge Image").required();

        let file = FieldValue::Image(ImageSource::File {
            file_name: "badge.png".into(),
            bytes: vec![0x89, 0x50],
        });
        let url = FieldValue::Image(ImageSource::Url("https://example.org/b.png".into()));

        assert!(field.is_satisfied_by(Some(&file)));
        assert!(field.is_satisfied_by(Some(&url)));
        assert!(!field.is_satisfied_by(Some(&FieldValue::Empty)));
    }

    #[test]
    fn missing_required_reports_labels_in_field_order() {
        let fields = vec![
            FieldDescriptor::new("name", InputKind::Text, "Name").required(),
            FieldDescriptor::new("description", InputKind::Textarea, "Description").required(),
            FieldDescriptor::new("image", InputKind::Image, "Image"),
        ];
        let current = values(&[("description", FieldValue::text("a badge"))]);

        assert_eq!(missing_required(&fields, &current), vec!["Name".to_string()]);
    }
}
