use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, info_span};

use forma_cli::{FormDefinition, LoadedForm, load_values};

use crate::cli::{FieldsArgs, ResetArgs, SubmitArgs};
use crate::types::{FieldRow, ResetReport, SubmitReport};

pub fn run_fields(args: &FieldsArgs) -> Result<Vec<FieldRow>> {
    let definition = FormDefinition::load(&args.form).context("load form definition")?;
    let form = definition.build().context("register fields")?;

    let rows = definition
        .fields
        .iter()
        .map(|field| FieldRow {
            path: field.path.clone(),
            default: field.default.clone(),
            initial: form.service.get_item_initial_value(&field.path),
            value_prop_name: field.value_prop_name.clone(),
            rules: field.rules.len(),
        })
        .collect();
    Ok(rows)
}

pub fn run_submit(args: &SubmitArgs) -> Result<SubmitReport> {
    let definition = FormDefinition::load(&args.form).context("load form definition")?;
    let span = info_span!("form", name = %definition.display_name());
    let _guard = span.enter();

    let mut form = definition.build().context("register fields")?;
    let applied = apply_values_file(&mut form, args.values.as_deref())?;

    let outcome = form.service.submit(None).context("submit form")?;
    let errors = form.service.errors_by_path().context("collect field errors")?;
    info!(
        submitted = outcome.is_submitted(),
        invalid = errors.len(),
        "submit finished"
    );

    Ok(SubmitReport {
        form: definition.display_name().to_string(),
        applied,
        outcome,
        errors,
    })
}

pub fn run_reset(args: &ResetArgs) -> Result<ResetReport> {
    let definition = FormDefinition::load(&args.form).context("load form definition")?;
    let span = info_span!("form", name = %definition.display_name());
    let _guard = span.enter();

    let mut form = definition.build().context("register fields")?;
    let applied = apply_values_file(&mut form, args.values.as_deref())?;

    form.service.reset(None).context("reset form")?;
    let mut values = Vec::with_capacity(form.items.len());
    for path in form.service.registered_paths() {
        let value = form
            .service
            .get_item_value(path)
            .with_context(|| format!("read {path}"))?;
        values.push((path.clone(), value));
    }

    Ok(ResetReport {
        form: definition.display_name().to_string(),
        applied,
        values,
    })
}

fn apply_values_file(form: &mut LoadedForm, path: Option<&Path>) -> Result<usize> {
    let Some(path) = path else {
        return Ok(0);
    };
    let values = load_values(path).context("load values")?;
    form.apply_values(&values).context("apply values")
}
