//! Interactive prompts driving a form
//!
//! Walks a [`FormState`](crate::core::form::FormState) field by field with
//! dialoguer prompts. Values land in the form; validation stays with the
//! form so a submit afterwards reports every offending field at once.

use dialoguer::{theme::ColorfulTheme, Confirm, Input, Password, Select};
use miette::{IntoDiagnostic, Result};

use crate::core::form::{FieldKind, FieldSpec, FormState};

/// Prompt for every field of the form, in spec order
pub fn fill_interactive(form: &mut FormState) -> Result<()> {
    let theme = ColorfulTheme::default();
    let fields: Vec<FieldSpec> = form.spec().fields.clone();

    for field in fields {
        let current = form.value(&field.name).unwrap_or("").to_string();
        let value = prompt_field(&theme, &field, &current)?;
        form.set(&field.name, value)
            .map_err(|e| miette::miette!("{}", e))?;
    }

    Ok(())
}

fn prompt_field(theme: &ColorfulTheme, field: &FieldSpec, current: &str) -> Result<String> {
    match &field.kind {
        FieldKind::Select { options } => {
            let default_idx = options.iter().position(|o| o == current).unwrap_or(0);
            let selection = Select::with_theme(theme)
                .with_prompt(&field.label)
                .items(options)
                .default(default_idx)
                .interact()
                .into_diagnostic()?;
            Ok(options[selection].clone())
        }

        FieldKind::Checkbox => {
            let answer = Confirm::with_theme(theme)
                .with_prompt(&field.label)
                .default(current == "true")
                .interact()
                .into_diagnostic()?;
            Ok(answer.to_string())
        }

        FieldKind::Password | FieldKind::Confirm { .. } => {
            let value = Password::with_theme(theme)
                .with_prompt(&field.label)
                .allow_empty_password(!field.required)
                .interact()
                .into_diagnostic()?;
            Ok(value)
        }

        _ => {
            let value: String = if !current.is_empty() {
                Input::with_theme(theme)
                    .with_prompt(&field.label)
                    .default(current.to_string())
                    .allow_empty(!field.required)
                    .interact_text()
                    .into_diagnostic()?
            } else {
                Input::with_theme(theme)
                    .with_prompt(&field.label)
                    .allow_empty(!field.required)
                    .interact_text()
                    .into_diagnostic()?
            };
            Ok(value)
        }
    }
}
