//! Declarative manifest edit script

use crate::document::ManifestDocument;
use crate::error::ManifestResult;
use serde_json::Value;

/// What to do with a task whose command matches exactly
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskAction {
    /// Remove the task
    Delete,
    /// Replace the command
    Rewrite(&'static str),
}

/// One step of the edit script
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestEdit {
    /// Make sure a top-level object exists
    EnsureObject(&'static str),
    /// Set `imports[key]` to a version pin
    Pin {
        /// Import map key
        key: &'static str,
        /// Specifier with version range
        specifier: &'static str,
    },
    /// Delete an import map key
    RemoveImport(&'static str),
    /// Delete a top-level key
    RemoveKey(&'static str),
    /// Act on every task whose command is exactly `command`
    Task {
        /// Legacy command string
        command: &'static str,
        /// Action on match
        action: TaskAction,
    },
}

/// Top-level import map key
pub const IMPORTS: &str = "imports";
/// Top-level task map key
pub const TASKS: &str = "tasks";

/// Fresh 1.x → 2 manifest migration
pub const UPGRADE_SCRIPT: &[ManifestEdit] = &[
    ManifestEdit::EnsureObject(IMPORTS),
    ManifestEdit::Pin {
        key: "fresh",
        specifier: "jsr:@fresh/core@^2.0.0",
    },
    ManifestEdit::Pin {
        key: "preact",
        specifier: "npm:preact@^10.26.9",
    },
    ManifestEdit::Pin {
        key: "@preact/signals",
        specifier: "npm:@preact/signals@^2.2.1",
    },
    ManifestEdit::RemoveImport("$fresh/"),
    ManifestEdit::RemoveImport("preact/"),
    ManifestEdit::RemoveImport("preact-render-to-string"),
    ManifestEdit::RemoveImport("@preact/signals-core"),
    ManifestEdit::RemoveKey("lock"),
    ManifestEdit::Task {
        command: "deno run -A -r https://fresh.deno.dev/update .",
        action: TaskAction::Delete,
    },
    ManifestEdit::Task {
        command: "deno task cli manifest $(pwd)",
        action: TaskAction::Delete,
    },
    ManifestEdit::Task {
        command: "echo \"import '\\$fresh/src/dev/cli.ts'\" > /tmp/fresh-cli.ts && deno run -A /tmp/fresh-cli.ts",
        action: TaskAction::Delete,
    },
    ManifestEdit::Task {
        command: "deno run -A main.ts",
        action: TaskAction::Rewrite("deno serve -A _fresh/server.js"),
    },
    ManifestEdit::Task {
        command: "deno run -A --watch=static/,routes/ dev.ts",
        action: TaskAction::Rewrite("deno run -A --watch=static/,routes/ dev.ts"),
    },
    ManifestEdit::Task {
        command: "deno run -A dev.ts build",
        action: TaskAction::Rewrite("deno run -A dev.ts build"),
    },
];

/// Apply an edit script, then drop a task map the script emptied
///
/// # Errors
/// `ManifestError::InvalidShape` if `imports` is not an object.
pub fn apply_script(document: &mut ManifestDocument, script: &[ManifestEdit]) -> ManifestResult<()> {
    let had_tasks = task_count(document) > 0;

    for edit in script {
        match *edit {
            ManifestEdit::EnsureObject(key) => {
                document.object_mut(key)?;
            }
            ManifestEdit::Pin { key, specifier } => {
                document
                    .object_mut(IMPORTS)?
                    .insert(key.to_string(), Value::String(specifier.to_string()));
            }
            ManifestEdit::RemoveImport(key) => {
                if document.remove_path(&[IMPORTS, key]).is_some() {
                    tracing::debug!(key, "removed import");
                }
            }
            ManifestEdit::RemoveKey(key) => {
                document.remove_path(&[key]);
            }
            ManifestEdit::Task { command, action } => apply_task(document, command, action),
        }
    }

    if had_tasks && task_count(document) == 0 {
        document.remove_path(&[TASKS]);
    }
    Ok(())
}

fn apply_task(document: &mut ManifestDocument, command: &str, action: TaskAction) {
    let matching: Vec<String> = match document.get_path(&[TASKS]) {
        Some(Value::Object(tasks)) => tasks
            .iter()
            .filter(|(_, value)| value.as_str() == Some(command))
            .map(|(name, _)| name.clone())
            .collect(),
        _ => return,
    };
    for name in matching {
        match action {
            TaskAction::Delete => {
                tracing::debug!(task = %name, "removed legacy task");
                document.remove_path(&[TASKS, name.as_str()]);
            }
            TaskAction::Rewrite(replacement) => {
                if replacement != command {
                    tracing::debug!(task = %name, replacement, "rewrote legacy task");
                }
                document.set_path(&[TASKS, name.as_str()], Value::String(replacement.to_string()));
            }
        }
    }
}

fn task_count(document: &ManifestDocument) -> usize {
    document
        .get_path(&[TASKS])
        .and_then(Value::as_object)
        .map_or(0, serde_json::Map::len)
}
