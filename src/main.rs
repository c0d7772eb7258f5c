//! Linepatch CLI binary
//!
//! This is the main entry point for the linepatch command-line interface.
//! The CLI is a thin adapter over the library APIs - NO patching logic is
//! implemented here.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

fn main() -> ExitCode {
    // Parse CLI arguments
    let cli = linepatch::cli::parse_args();

    // Initialize logger if verbose
    if cli.verbose {
        env_logger::init();
    }

    // Execute command
    let result = match cli.command {
        linepatch::cli::Commands::Apply {
            input,
            output,
            plan,
        } => execute_apply(&input, &output, &plan),

        linepatch::cli::Commands::Locate {
            input,
            signature,
            from,
        } => execute_locate(&input, &signature, from),
    };

    // Handle result
    match result {
        Ok(msg) => {
            println!("{}", msg);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(1)
        }
    }
}

/// Execute the apply command.
///
/// This function is a thin adapter that:
/// 1. Reads the input file into a document
/// 2. Parses and executes the conversion plan
/// 3. Writes the patched copy atomically
/// 4. Reports per-step progress and the final summary
fn execute_apply(
    input: &Path,
    output: &Path,
    plan_path: &Path,
) -> Result<String, linepatch::PatchError> {
    use linepatch::document::Document;
    use linepatch::plan::{execute_plan, parse_plan};

    let mut doc = Document::read(input)?;
    let before_hash = compute_hash(doc.contents().as_bytes());

    let plan = parse_plan(plan_path)?;
    let base_dir = plan_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    let report = execute_plan(&plan, &base_dir, &mut doc)?;

    for (i, outcome) in report.outcomes.iter().enumerate() {
        println!(
            "Step {}: {} -> {} applied",
            i + 1,
            outcome.description,
            outcome.applied
        );
    }

    doc.write(output)?;
    let after_hash = compute_hash(doc.contents().as_bytes());

    let mut msg = format!(
        "Wrote {} ({} -> {} lines, {} changes, hash {} -> {})",
        output.display(),
        report.lines_before,
        report.lines_after,
        report.total_applied(),
        before_hash,
        after_hash
    );

    for v in &report.verifications {
        msg.push_str(&format!("\n{} ('{}'): {} lines", v.label, v.marker, v.count));
    }

    Ok(msg)
}

/// Execute the locate command.
///
/// Exposes the brace-balanced range finder for inspection. An absent
/// signature is reported, not treated as a failure.
fn execute_locate(
    input: &Path,
    signature: &str,
    from: usize,
) -> Result<String, linepatch::PatchError> {
    use linepatch::document::Document;
    use linepatch::locate::find_construct;

    let doc = Document::read(input)?;

    match find_construct(doc.lines(), from, signature) {
        Some(span) => Ok(format!(
            "Construct '{}' spans lines {}..{} ({} lines)",
            signature,
            span.start,
            span.end,
            span.len()
        )),
        None => Ok(format!(
            "No construct matching '{}' found from line {}",
            signature, from
        )),
    }
}

/// Compute SHA-256 hash of file contents.
fn compute_hash(bytes: &[u8]) -> String {
    use sha2::{Digest, Sha256};

    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let result = hasher.finalize();
    format!("{:x}", result)
}
