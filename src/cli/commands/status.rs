use anyhow::Result;

use super::super::{args::StatusCommand, exit_status::ExitStatus, report};
use crate::{
    config::{REGISTRY_RELATIVE_PATH, resolve_registry_path},
    registry::{Registry, RegistryLoadResult},
};

pub fn status(cmd: StatusCommand) -> Result<ExitStatus> {
    let registry_path = resolve_registry_path(&cmd.directory, cmd.registry.registry.as_deref());
    let Some(registry_path) = registry_path else {
        report::print_note(&format!(
            "no {} found in {} or its parent directories",
            REGISTRY_RELATIVE_PATH,
            cmd.directory.display()
        ));
        return Ok(ExitStatus::Success);
    };

    let RegistryLoadResult { registry, warning } = Registry::load(Some(registry_path));
    if let Some(warning) = warning {
        report::print_warning(&warning.to_string());
    }
    report::print_registry(&registry);

    Ok(ExitStatus::Success)
}
