//! JSON conversion-plan format and sequential execution.
//!
//! A plan externalizes the driver payload: an ordered list of anchored
//! insertions and function replacements, plus markers to count for the
//! post-run verification report. Steps run in order against the in-memory
//! document; an anchor or target that matches nothing is recorded as a zero
//! outcome, never a hard failure.

use crate::document::Document;
use crate::error::{PatchError, Result};
use crate::replace::replace_construct;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// A conversion plan: sequential steps plus verification markers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    /// Sequential patch steps to execute.
    pub steps: Vec<Step>,

    /// Markers to count in the final document for the summary report.
    #[serde(default)]
    pub verify: Vec<VerifyMarker>,
}

/// A single step in the plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    /// Insert text after the first line containing `anchor`.
    InsertAfter {
        /// Substring identifying the line to insert after.
        anchor: String,

        /// Optional outer anchor; the inner anchor only matches strictly
        /// after the first line containing this substring.
        #[serde(default)]
        within: Option<String>,

        /// Inline text to insert.
        #[serde(default)]
        content: Option<String>,

        /// Path to a file containing the text, relative to the plan file.
        #[serde(rename = "with", default)]
        with_file: Option<String>,
    },

    /// Replace every construct matching `target` with the supplied text.
    ReplaceFunction {
        /// Function signature to match (prefix rule, `async`-qualified
        /// forms included).
        target: String,

        /// Inline replacement template.
        #[serde(default)]
        content: Option<String>,

        /// Path to a file containing the template, relative to the plan
        /// file.
        #[serde(rename = "with", default)]
        with_file: Option<String>,
    },
}

/// A marker to count in the patched document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyMarker {
    /// Substring counted per line.
    pub marker: String,
    /// Human-readable label for the summary report.
    pub label: String,
}

/// Outcome of one executed step.
#[derive(Debug, Clone)]
pub struct StepOutcome {
    /// Short description of the step for progress output.
    pub description: String,
    /// Number of insertions or replacements the step performed.
    pub applied: usize,
}

/// One verification count from the final document.
#[derive(Debug, Clone)]
pub struct VerifyCount {
    /// The label from the plan entry.
    pub label: String,
    /// The counted marker.
    pub marker: String,
    /// Lines containing the marker after all steps ran.
    pub count: usize,
}

/// Full report of a plan execution.
#[derive(Debug, Clone)]
pub struct PlanReport {
    /// Per-step outcomes, in plan order.
    pub outcomes: Vec<StepOutcome>,
    /// Document line count before the first step.
    pub lines_before: usize,
    /// Document line count after the last step.
    pub lines_after: usize,
    /// Verification counts gathered after all steps.
    pub verifications: Vec<VerifyCount>,
}

impl PlanReport {
    /// Total insertions and replacements across all steps.
    pub fn total_applied(&self) -> usize {
        self.outcomes.iter().map(|o| o.applied).sum()
    }
}

/// Parse a plan from a JSON file and validate its schema.
pub fn parse_plan(plan_path: &Path) -> Result<Plan> {
    let content = fs::read_to_string(plan_path).map_err(|source| PatchError::Io {
        path: plan_path.to_path_buf(),
        source,
    })?;

    let plan: Plan =
        serde_json::from_str(&content).map_err(|e| PatchError::InvalidPlanSchema {
            message: format!("JSON parse error: {}", e),
        })?;

    validate_plan(&plan)?;
    Ok(plan)
}

fn validate_plan(plan: &Plan) -> Result<()> {
    if plan.steps.is_empty() {
        return Err(PatchError::InvalidPlanSchema {
            message: "Plan must contain at least one step".to_string(),
        });
    }

    for (i, step) in plan.steps.iter().enumerate() {
        let step_num = i + 1;
        let (name, content, with_file) = match step {
            Step::InsertAfter {
                anchor,
                content,
                with_file,
                ..
            } => {
                if anchor.is_empty() {
                    return Err(PatchError::InvalidPlanSchema {
                        message: format!("Step {} has empty 'anchor' field", step_num),
                    });
                }
                ("insert_after", content, with_file)
            }
            Step::ReplaceFunction {
                target,
                content,
                with_file,
            } => {
                if target.is_empty() {
                    return Err(PatchError::InvalidPlanSchema {
                        message: format!("Step {} has empty 'target' field", step_num),
                    });
                }
                ("replace_function", content, with_file)
            }
        };

        match (content, with_file) {
            (Some(_), None) | (None, Some(_)) => {}
            (Some(_), Some(_)) => {
                return Err(PatchError::InvalidPlanSchema {
                    message: format!(
                        "Step {} ({}): specify only one of 'content' or 'with'",
                        step_num, name
                    ),
                });
            }
            (None, None) => {
                return Err(PatchError::InvalidPlanSchema {
                    message: format!(
                        "Step {} ({}): requires either 'content' or 'with' field",
                        step_num, name
                    ),
                });
            }
        }
    }

    for (i, entry) in plan.verify.iter().enumerate() {
        if entry.marker.is_empty() {
            return Err(PatchError::InvalidPlanSchema {
                message: format!("Verify entry {} has empty 'marker' field", i + 1),
            });
        }
    }

    Ok(())
}

/// Execute a plan against the document, mutating it in place.
///
/// `base_dir` resolves `with` file references; pass the plan file's parent
/// directory. Steps run sequentially, each re-scanning the current document
/// state, so earlier edits' index shifts never leak into later steps.
pub fn execute_plan(plan: &Plan, base_dir: &Path, doc: &mut Document) -> Result<PlanReport> {
    let lines_before = doc.len();
    let mut outcomes = Vec::with_capacity(plan.steps.len());

    for step in &plan.steps {
        let outcome = match step {
            Step::InsertAfter {
                anchor,
                within,
                content,
                with_file,
            } => {
                let text = resolve_content(base_dir, content.as_deref(), with_file.as_deref())?;
                let inserted = match within {
                    Some(outer) => doc.insert_after_within(outer, anchor, &text),
                    None => doc.insert_after(anchor, &text),
                };

                match inserted {
                    Some(at) => log::info!("Inserted after '{}' at line {}", anchor, at + 1),
                    None => log::warn!("Anchor '{}' not found, insertion skipped", anchor),
                }

                StepOutcome {
                    description: format!("insert after '{}'", anchor),
                    applied: usize::from(inserted.is_some()),
                }
            }

            Step::ReplaceFunction {
                target,
                content,
                with_file,
            } => {
                let template =
                    resolve_content(base_dir, content.as_deref(), with_file.as_deref())?;
                let count = replace_construct(doc, target, &template);
                if count == 0 {
                    log::warn!("No construct matched '{}'", target);
                }

                StepOutcome {
                    description: format!("replace '{}'", target),
                    applied: count,
                }
            }
        };

        outcomes.push(outcome);
    }

    let verifications = plan
        .verify
        .iter()
        .map(|entry| VerifyCount {
            label: entry.label.clone(),
            marker: entry.marker.clone(),
            count: doc.count_containing(&entry.marker),
        })
        .collect();

    Ok(PlanReport {
        outcomes,
        lines_before,
        lines_after: doc.len(),
        verifications,
    })
}

fn resolve_content(
    base_dir: &Path,
    inline: Option<&str>,
    with_file: Option<&str>,
) -> Result<String> {
    match (inline, with_file) {
        (Some(text), None) => Ok(text.to_string()),
        (None, Some(rel)) => {
            let path = resolve_path(base_dir, rel);
            fs::read_to_string(&path).map_err(|source| PatchError::Io { path, source })
        }
        (Some(_), Some(_)) => Err(PatchError::InvalidPlanSchema {
            message: "Specify only one of 'content' or 'with'".to_string(),
        }),
        (None, None) => Err(PatchError::InvalidPlanSchema {
            message: "Step requires either 'content' or 'with' field".to_string(),
        }),
    }
}

fn resolve_path(base_dir: &Path, value: &str) -> PathBuf {
    let path = Path::new(value);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}
