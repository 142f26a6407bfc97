//! The terminal render surface for data-driven forms: binds prompts to the
//! form store, patches per edit, and reports the submission result.

use std::collections::HashMap;

use anyhow::{Context, Result};
use colored::Colorize;
use is_terminal::IsTerminal;
use log::debug;

use crate::api::collections::CollectionStore;
use crate::api::transport::Transport;
use crate::cli::commands::FormArgs;
use crate::forms::config::FormConfig;
use crate::forms::field::{FieldValue, InputKind};
use crate::forms::store::{FormStore, FormStoreError};
use crate::forms::submit::{SubmissionController, SubmitOutcome};
use crate::panels::{ActivePanel, Panel, PanelView};
use crate::ui::prompts::{image_value_from, prompt_field_value};

use super::collections::render_detail;

/// One form panel's editing session. Every edit goes through the store, and
/// in submit-immediately mode every edit also triggers a submission.
pub struct FormSession<'a, T: Transport> {
    controller: &'a SubmissionController<T>,
    forms: &'a mut FormStore,
    collections: &'a mut CollectionStore,
    config: &'a FormConfig,
}

impl<'a, T: Transport> FormSession<'a, T> {
    pub fn new(
        controller: &'a SubmissionController<T>,
        forms: &'a mut FormStore,
        collections: &'a mut CollectionStore,
        config: &'a FormConfig,
    ) -> Self {
        Self {
            controller,
            forms,
            collections,
            config,
        }
    }

    pub fn current_value(&self, field: &str) -> Option<FieldValue> {
        self.forms
            .get(&self.config.form_id)
            .and_then(|state| state.value(field).cloned())
    }

    /// Patches one field. Returns the submit outcome when the form runs in
    /// submit-immediately mode.
    pub async fn edit(
        &mut self,
        field: String,
        value: FieldValue,
    ) -> Result<Option<SubmitOutcome>, FormStoreError> {
        self.forms
            .patch(&self.config.form_id, HashMap::from([(field, value)]))?;
        if self.config.submit_immediately {
            Ok(Some(self.submit().await?))
        } else {
            Ok(None)
        }
    }

    /// Submits the current values. A form sitting in a terminal state is
    /// explicitly reset first (keeping its values), since terminal states
    /// never transition back to ready on their own.
    pub async fn submit(&mut self) -> Result<SubmitOutcome, FormStoreError> {
        let form_id = &self.config.form_id;
        if let Some(state) = self.forms.get(form_id) {
            if state.action_state.is_terminal() {
                let values = state.values.clone();
                self.forms.reset(form_id, values);
            }
        }
        self.controller
            .submit(self.config, self.forms, self.collections)
            .await
    }

    pub fn message(&self) -> String {
        self.forms
            .get(&self.config.form_id)
            .map(|state| state.message.clone())
            .unwrap_or_default()
    }
}

/// Parses `--set field=value` and `--image` arguments against the form's
/// descriptors into typed field values.
pub fn parse_field_args(config: &FormConfig, args: &FormArgs) -> Result<Vec<(String, FieldValue)>> {
    let mut edits = Vec::new();
    for assignment in &args.set {
        let (field, raw) = assignment
            .split_once('=')
            .with_context(|| format!("Expected FIELD=VALUE, got '{assignment}'"))?;
        let descriptor = config.field(field).with_context(|| {
            let known: Vec<&str> = config.fields.iter().map(|f| f.name.as_str()).collect();
            format!("Unknown field '{field}'. Known fields: {}", known.join(", "))
        })?;
        let value = match descriptor.input_kind {
            InputKind::Checkbox => match raw {
                "true" | "yes" | "on" => FieldValue::Toggle(true),
                "false" | "no" | "off" => FieldValue::Toggle(false),
                other => anyhow::bail!("'{other}' is not a valid checkbox value for '{field}'"),
            },
            InputKind::Image => image_value_from(raw)?,
            InputKind::Text | InputKind::Textarea => FieldValue::text(raw),
        };
        edits.push((field.to_string(), value));
    }

    if let Some(image) = &args.image {
        let descriptor = config
            .fields
            .iter()
            .find(|f| f.input_kind == InputKind::Image)
            .context("This form has no image field")?;
        edits.push((descriptor.name.clone(), image_value_from(image)?));
    }

    Ok(edits)
}

/// Opens a panel, drives its form (or prints its detail view), and reports
/// the result. This is the command-side counterpart of panel dispatch.
pub async fn run_panel<T: Transport>(
    controller: &SubmissionController<T>,
    forms: &mut FormStore,
    collections: &mut CollectionStore,
    panel: Panel,
    args: &FormArgs,
) -> Result<()> {
    let mut active = ActivePanel::new();
    let view = active.open(panel, forms);

    let mut config = match view {
        PanelView::Detail(spec) => {
            render_detail(&spec, collections);
            active.close(forms);
            return Ok(());
        }
        PanelView::Form(config) => config,
    };
    if args.submit_immediately {
        config.submit_immediately = true;
    }

    let watcher = forms.watch(&config.form_id);
    let scripted = parse_field_args(&config, args)?;
    let interactive = !args.yes && std::io::stdin().is_terminal();

    if let Some(help) = &config.help_text {
        println!("{}", help.dimmed());
    }

    let mut session = FormSession::new(controller, forms, collections, &config);
    let mut submitted = false;

    for (field, value) in scripted {
        if let Some(immediate) = session.edit(field, value).await? {
            report_outcome(&immediate, &session.message());
            submitted = true;
        }
    }

    if interactive {
        for group in &config.columns {
            if let Some(title) = &group.title {
                println!("{}", title.bold());
            }
            for name in &group.fields {
                let Some(descriptor) = config.field(name) else {
                    continue;
                };
                let current = session.current_value(name);
                if let Some(value) = prompt_field_value(descriptor, current.as_ref())? {
                    if let Some(immediate) = session.edit(name.clone(), value).await? {
                        report_outcome(&immediate, &session.message());
                        submitted = true;
                    }
                }
            }
        }
    }

    // In normal mode every run submits exactly once, at the end. In
    // submit-immediately mode the edits already submitted; only a run with
    // no edits at all still needs one.
    if !config.submit_immediately || !submitted {
        let outcome = session.submit().await?;
        report_outcome(&outcome, &session.message());
    }

    let observed: Vec<String> = watcher.try_iter().map(|e| format!("{:?}", e.change)).collect();
    debug!("form change sequence: {}", observed.join(" -> "));

    active.close(forms);
    Ok(())
}

fn report_outcome(outcome: &SubmitOutcome, message: &str) {
    match outcome {
        SubmitOutcome::Completed => println!("{}", message.green()),
        SubmitOutcome::Invalid { .. } | SubmitOutcome::Rejected { .. } => {
            eprintln!("{}", message.red());
        }
        SubmitOutcome::AlreadyInFlight => {
            eprintln!("{}", "A submission is already in flight".yellow());
        }
        SubmitOutcome::Discarded => {
            eprintln!("{}", "The form closed before the submission finished".yellow());
        }
    }
}
