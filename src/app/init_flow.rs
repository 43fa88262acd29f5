//! `finetalk init` orchestration.

use finetalk::config::{initialize_default_global_config, GlobalConfigInitResult};
use finetalk::ui::RenderSink;

/// Write the bundled config template to the per-user config path.
pub(crate) fn run_init_flow(renderer: &dyn RenderSink, force: bool) -> Result<(), String> {
    let result = initialize_default_global_config(force)
        .map_err(|e| format!("failed to initialize ~/.config/finetalk: {e}"))?;
    apply_init_result(renderer, &result);
    Ok(())
}

/// Report the outcome of config initialization.
pub(crate) fn apply_init_result(renderer: &dyn RenderSink, result: &GlobalConfigInitResult) {
    match result {
        GlobalConfigInitResult::Created { path } => {
            renderer.success(&format!("wrote default config to {}", path.display()));
        }
        GlobalConfigInitResult::AlreadyInitialized { path } => {
            renderer.warn(&format!(
                "finetalk is already initialized at {}; use `finetalk init --force` to overwrite",
                path.display()
            ));
        }
        GlobalConfigInitResult::Overwritten { path, backup_path } => {
            renderer.success(&format!("rewrote default config at {}", path.display()));
            renderer.field("backup", &backup_path.display().to_string());
        }
    }
}
