use collide_core::domain::AnalysisTool;
use std::path::Path;

pub(super) const PROGRAM_NAME: &str = "collide-diag";

#[derive(Debug, Clone, Copy)]
pub(super) struct ToolCommandSpec {
    pub(super) command: &'static str,
    pub(super) tool: AnalysisTool,
    /// Executable name that runs this command directly.
    pub(super) program_alias: &'static str,
}

pub(super) const TOOL_COMMANDS: [ToolCommandSpec; 2] = [
    ToolCommandSpec {
        command: "ion-coll",
        tool: AnalysisTool::IonColl,
        program_alias: "ion_coll_ratio",
    },
    ToolCommandSpec {
        command: "histo-e",
        tool: AnalysisTool::HistoE,
        program_alias: "plot_histo_e",
    },
];

pub(super) fn tool_command_spec(tool: AnalysisTool) -> ToolCommandSpec {
    match tool {
        AnalysisTool::IonColl => TOOL_COMMANDS[0],
        AnalysisTool::HistoE => TOOL_COMMANDS[1],
    }
}

pub(super) fn command_alias_from_program_name(program_name: &str) -> Option<&'static str> {
    let executable_name = Path::new(program_name)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(program_name);
    let normalized = executable_name
        .strip_suffix(".exe")
        .unwrap_or(executable_name);

    if normalized == PROGRAM_NAME {
        return None;
    }

    let spec = TOOL_COMMANDS
        .iter()
        .find(|spec| spec.program_alias == normalized)?;
    tracing::debug!(tool = %spec.tool, alias = normalized, "dispatching via program alias");
    Some(spec.command)
}

#[cfg(test)]
mod tests {
    use super::{TOOL_COMMANDS, command_alias_from_program_name, tool_command_spec};
    use collide_core::domain::AnalysisTool;

    #[test]
    fn aliases_resolve_to_subcommands() {
        assert_eq!(
            command_alias_from_program_name("/usr/local/bin/ion_coll_ratio"),
            Some("ion-coll")
        );
        assert_eq!(
            command_alias_from_program_name("plot_histo_e.exe"),
            Some("histo-e")
        );
        assert_eq!(command_alias_from_program_name("collide-diag"), None);
        assert_eq!(command_alias_from_program_name("python3"), None);
    }

    #[test]
    fn every_tool_has_a_command() {
        for spec in TOOL_COMMANDS {
            assert_eq!(tool_command_spec(spec.tool).command, spec.command);
        }
        assert_eq!(tool_command_spec(AnalysisTool::HistoE).program_alias, "plot_histo_e");
    }
}
