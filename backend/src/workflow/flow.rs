//! Approval flow store.
//!
//! A form owns at most one flow: a JSON array of
//! `{"step": n, "role_required": "name"}` persisted as text. Reads are
//! fail-open (malformed JSON becomes an empty flow so ungoverned forms
//! are never blocked); writes go through `validate_definition` so
//! configuration mistakes surface when the flow is saved, not when a
//! submission is routed.

use log::warn;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;

use common::model::flow::FlowStep;

/// Loads a form's flow. `None` means no flow row exists; a stored but
/// malformed definition comes back as an empty step list. Steps are
/// sorted ascending by step number.
pub fn load_flow(conn: &Connection, form_id: i64) -> rusqlite::Result<Option<Vec<FlowStep>>> {
    let raw: Option<String> = conn
        .query_row(
            "SELECT flow_definition FROM approval_flows WHERE form_id = ?1",
            params![form_id],
            |row| row.get(0),
        )
        .optional()?;
    Ok(raw.map(|text| parse_definition(form_id, &text)))
}

fn parse_definition(form_id: i64, raw: &str) -> Vec<FlowStep> {
    match serde_json::from_str::<Vec<FlowStep>>(raw) {
        Ok(mut steps) => {
            steps.sort_by_key(|s| s.step);
            steps
        }
        Err(e) => {
            warn!("ignoring malformed flow definition for form {form_id}: {e}");
            Vec::new()
        }
    }
}

/// The step that follows `current`, i.e. the entry numbered
/// `current + 1`. A numbering gap exhausts the flow.
pub fn step_after(flow: &[FlowStep], current: u32) -> Option<&FlowStep> {
    flow.iter().find(|s| s.step == current + 1)
}

/// Whether a step can be routed at all. Guards ingestion against legacy
/// rows written before write-time validation existed.
pub fn step_is_routable(step: &FlowStep) -> bool {
    step.step >= 1 && !step.role_required.trim().is_empty()
}

/// Validates and normalizes a definition submitted through the flow
/// endpoints. Returns the steps sorted ascending, or a message naming
/// the first problem.
pub fn validate_definition(value: &Value) -> Result<Vec<FlowStep>, String> {
    let items = value
        .as_array()
        .ok_or_else(|| "flow_definition must be an array".to_string())?;
    if items.is_empty() {
        return Err("flow_definition must not be empty".to_string());
    }

    let mut steps = Vec::with_capacity(items.len());
    for (idx, item) in items.iter().enumerate() {
        let obj = item
            .as_object()
            .ok_or_else(|| format!("entry {} is not an object", idx + 1))?;
        let step = obj
            .get("step")
            .and_then(Value::as_u64)
            .ok_or_else(|| format!("entry {} is missing an integer 'step'", idx + 1))?;
        if step < 1 {
            return Err(format!("entry {} has step 0; steps start at 1", idx + 1));
        }
        let role = obj
            .get("role_required")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| format!("entry {} is missing 'role_required'", idx + 1))?;
        steps.push(FlowStep {
            step: step as u32,
            role_required: role.to_string(),
        });
    }

    steps.sort_by_key(|s| s.step);
    if steps[0].step != 1 {
        return Err("step numbering must start at 1".to_string());
    }
    for pair in steps.windows(2) {
        if pair[0].step == pair[1].step {
            return Err(format!("duplicate step number {}", pair[0].step));
        }
    }
    Ok(steps)
}
