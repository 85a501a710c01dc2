use std::path::Path;
use std::process::Command;

use anyhow::Context;
use git2::Repository;
use tracing::debug;

use crate::error::AtofetchError;
use crate::report::{ConsoleReporter, Reporter};

const CONVERTER_BIN: &str = "easyeda2kicad";

/// Projects living in the shared modules repository keep footprints at the
/// top level; everything else uses the electronics subtree.
const SHARED_MODULES_REMOTE: &str = "git@gitlab.atopile.io:atopile/modules.git";

pub(super) fn run_footprint(cwd: &Path, component_id: &str) -> anyhow::Result<()> {
    // Validation happens before any filesystem or repository access.
    let component_id = normalize_component_id(component_id)?;
    let reporter = ConsoleReporter;

    let repo = Repository::discover(cwd)
        .with_context(|| format!("{} is not inside a project repository", cwd.display()))?;
    let project_root = repo
        .workdir()
        .ok_or_else(|| anyhow::anyhow!("project repository has no working tree"))?
        .to_path_buf();
    let remote_url = repo
        .find_remote("origin")
        .context("project repository has no origin remote")?
        .url()
        .unwrap_or_default()
        .to_string();

    let footprints_dir = if remote_url == SHARED_MODULES_REMOTE {
        project_root.join("footprints")
    } else {
        project_root.join("elec").join("footprints").join("footprints")
    };
    reporter.info(&format!("Footprints directory: {}", footprints_dir.display()));

    let ato_file_path = project_root.join("elec").join("src");
    debug!(
        component_id = %component_id,
        converter = CONVERTER_BIN,
        output = %footprints_dir.display(),
        "running footprint converter"
    );

    let output = Command::new(CONVERTER_BIN)
        .arg("--full")
        .arg(format!("--lcsc_id={component_id}"))
        .arg(format!("--output={}", footprints_dir.display()))
        .arg("--overwrite")
        .arg("--ato")
        .arg(format!("--ato_file_path={}", ato_file_path.display()))
        .output()
        .with_context(|| format!("failed to run {CONVERTER_BIN}; is it installed and on PATH?"))?;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
    println!("STDOUT: {stdout}");
    println!("STDERR: {stderr}");

    if !output.status.success() {
        return Err(AtofetchError::ExternalTool {
            status: output.status.code().unwrap_or(-1),
            stdout,
            stderr,
        }
        .into());
    }

    Ok(())
}

/// Uppercase the id and require the `C<digits>` shape JLCPCB uses.
fn normalize_component_id(raw: &str) -> Result<String, AtofetchError> {
    let normalized = raw.trim().to_ascii_uppercase();
    match normalized.strip_prefix('C') {
        Some(digits) if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) => {
            Ok(normalized)
        }
        _ => Err(AtofetchError::InvalidComponentId(raw.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercase_ids_are_normalized() {
        assert_eq!(normalize_component_id("c123").expect("valid"), "C123");
    }

    #[test]
    fn wellformed_ids_pass_through() {
        assert_eq!(normalize_component_id("C920587").expect("valid"), "C920587");
    }

    #[test]
    fn wrong_prefix_is_rejected() {
        assert!(matches!(
            normalize_component_id("X123"),
            Err(AtofetchError::InvalidComponentId(_))
        ));
    }

    #[test]
    fn non_digit_tail_is_rejected() {
        assert!(matches!(
            normalize_component_id("C12A"),
            Err(AtofetchError::InvalidComponentId(_))
        ));
    }

    #[test]
    fn bare_prefix_is_rejected() {
        assert!(normalize_component_id("C").is_err());
        assert!(normalize_component_id("").is_err());
    }
}
