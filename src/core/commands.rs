//! Built-in command handlers.
//!
//! Each command is a unit struct implementing [`CommandHandler`]; the
//! parsing and dispatch machinery knows nothing about any of them beyond
//! that interface. [`builtin_registry`] wires up the default set.

use crate::core::env::is_valid_var_name;
use crate::core::path;
use crate::core::registry::{
    CommandDescriptor, CommandHandler, CommandRegistry, ExecutionContext,
};
use crate::core::script;
use crate::core::tree::VirtualTree;
use crate::error::ShellError;
use crate::models::{OutputLine, TextStyle};

/// Registry pre-loaded with the built-in command set.
pub fn builtin_registry() -> CommandRegistry {
    let mut registry = CommandRegistry::new();
    registry.register(CommandDescriptor::new("pwd", Pwd));
    registry.register(CommandDescriptor::new("cd", Cd));
    registry.register(CommandDescriptor::new("ls", Ls).alias("dir"));
    registry.register(CommandDescriptor::new("cat", Cat).alias("type"));
    registry.register(CommandDescriptor::new("echo", Echo));
    registry.register(CommandDescriptor::new("mkdir", Mkdir).alias("md"));
    registry.register(CommandDescriptor::new("touch", Touch));
    registry.register(CommandDescriptor::new("rm", Rm).alias("del"));
    registry.register(CommandDescriptor::new("env", EnvVars));
    registry.register(CommandDescriptor::new("export", Export));
    registry.register(CommandDescriptor::new("unset", Unset));
    registry.register(CommandDescriptor::new("./", RunScript));
    registry
}

/// Complete entry names in the current directory against the partial last
/// argument. Directory suggestions get a trailing `/`.
fn complete_entries(args: &[String], tree: &VirtualTree, dirs_only: bool) -> Vec<String> {
    let partial = args.last().map(String::as_str).unwrap_or("");
    tree.list(None)
        .iter()
        .filter(|e| (e.is_dir || !dirs_only) && e.name.starts_with(partial))
        .map(|e| {
            if e.is_dir {
                format!("{}/", e.name)
            } else {
                e.name.clone()
            }
        })
        .collect()
}

// =============================================================================
// Filesystem Commands
// =============================================================================

/// `pwd`: print the absolute working directory.
struct Pwd;

impl CommandHandler for Pwd {
    fn execute(&self, ctx: &mut ExecutionContext<'_>) -> Result<(), ShellError> {
        let absolute = path::to_absolute_display_path(&ctx.cwd, ctx.tree.home());
        ctx.emit(absolute, TextStyle::Plain);
        Ok(())
    }
}

/// `cd [path]`: change directory, defaulting to home.
struct Cd;

impl CommandHandler for Cd {
    fn execute(&self, ctx: &mut ExecutionContext<'_>) -> Result<(), ShellError> {
        let target = ctx.args.first().map(String::as_str).unwrap_or("~");
        if ctx.tree.set_current_directory(target) {
            return Ok(());
        }
        let absolute = path::resolve(target, &ctx.tree.current_absolute(), ctx.tree.home());
        if ctx.tree.get_node(&absolute).is_some() {
            Err(ShellError::NotADirectory(target.to_string()))
        } else {
            Err(ShellError::NotFound(target.to_string()))
        }
    }

    fn completions(&self, args: &[String], tree: &VirtualTree) -> Vec<String> {
        complete_entries(args, tree, true)
    }
}

/// `ls [-l] [path]`: list a directory.
struct Ls;

impl CommandHandler for Ls {
    fn execute(&self, ctx: &mut ExecutionContext<'_>) -> Result<(), ShellError> {
        let target = ctx.args.first().map(String::as_str);
        let long = ctx.has_flag("l");
        let lines: Vec<OutputLine> = ctx
            .tree
            .list(target)
            .into_iter()
            .map(|entry| {
                let kind = if entry.is_dir { 'd' } else { '-' };
                let text = if long {
                    format!(
                        "{}{} {:>6} {} {}",
                        kind,
                        entry.permissions,
                        entry.size,
                        entry.modified.format("%Y-%m-%d %H:%M"),
                        entry.name,
                    )
                } else {
                    entry.name.clone()
                };
                if entry.is_dir {
                    OutputLine::dir_entry(text)
                } else {
                    OutputLine::file_entry(text)
                }
            })
            .collect();
        for line in lines {
            ctx.emit_line(line);
        }
        Ok(())
    }

    fn completions(&self, args: &[String], tree: &VirtualTree) -> Vec<String> {
        complete_entries(args, tree, true)
    }
}

/// `cat <file>...`: print file contents.
struct Cat;

impl CommandHandler for Cat {
    fn execute(&self, ctx: &mut ExecutionContext<'_>) -> Result<(), ShellError> {
        if ctx.args.is_empty() {
            return Err(ShellError::CommandFailed(
                "cat: missing file operand".to_string(),
            ));
        }
        let args = ctx.args.clone();
        for target in &args {
            let Some(node) = ctx.tree.get_node(target) else {
                return Err(ShellError::NotFound(target.clone()));
            };
            let Some(content) = node.content().map(str::to_string) else {
                return Err(ShellError::IsADirectory(target.clone()));
            };
            for line in content.lines() {
                ctx.emit(line, TextStyle::Plain);
            }
        }
        Ok(())
    }

    fn completions(&self, args: &[String], tree: &VirtualTree) -> Vec<String> {
        complete_entries(args, tree, false)
    }
}

/// `echo [args...]`: print arguments joined by spaces.
struct Echo;

impl CommandHandler for Echo {
    fn execute(&self, ctx: &mut ExecutionContext<'_>) -> Result<(), ShellError> {
        ctx.emit(ctx.args.join(" "), TextStyle::Plain);
        Ok(())
    }
}

/// `mkdir <name>...`: create directories in the current directory.
struct Mkdir;

impl CommandHandler for Mkdir {
    fn execute(&self, ctx: &mut ExecutionContext<'_>) -> Result<(), ShellError> {
        if ctx.args.is_empty() {
            return Err(ShellError::CommandFailed(
                "mkdir: missing operand".to_string(),
            ));
        }
        let args = ctx.args.clone();
        for name in &args {
            if !ctx.tree.create_directory(name) {
                return Err(ShellError::AlreadyExists(name.clone()));
            }
        }
        Ok(())
    }
}

/// `touch <name>...`: create empty files or refresh modified times.
struct Touch;

impl CommandHandler for Touch {
    fn execute(&self, ctx: &mut ExecutionContext<'_>) -> Result<(), ShellError> {
        if ctx.args.is_empty() {
            return Err(ShellError::CommandFailed(
                "touch: missing file operand".to_string(),
            ));
        }
        let args = ctx.args.clone();
        for name in &args {
            match ctx.tree.read_file(name) {
                // rewriting the same content refreshes the modified time
                Some(content) => {
                    ctx.tree.write_file(name, &content);
                }
                None if ctx.tree.exists(name) => {
                    return Err(ShellError::IsADirectory(name.clone()));
                }
                None => {
                    if !ctx.tree.create_file(name, "") {
                        return Err(ShellError::CommandFailed(format!(
                            "touch: cannot create '{}'",
                            name
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}

/// `rm [-r] <name>...`: delete entries in the current directory.
struct Rm;

impl CommandHandler for Rm {
    fn execute(&self, ctx: &mut ExecutionContext<'_>) -> Result<(), ShellError> {
        if ctx.args.is_empty() {
            return Err(ShellError::CommandFailed("rm: missing operand".to_string()));
        }
        let recursive = ctx.has_flag("r");
        let args = ctx.args.clone();
        for name in &args {
            if ctx.tree.delete_node(name, recursive) {
                continue;
            }
            if ctx.tree.exists(name) {
                return Err(ShellError::DirectoryNotEmpty(name.clone()));
            }
            return Err(ShellError::NotFound(name.clone()));
        }
        Ok(())
    }

    fn completions(&self, args: &[String], tree: &VirtualTree) -> Vec<String> {
        complete_entries(args, tree, false)
    }
}

// =============================================================================
// Environment Commands
// =============================================================================

/// `env`: print all environment variables.
struct EnvVars;

impl CommandHandler for EnvVars {
    fn execute(&self, ctx: &mut ExecutionContext<'_>) -> Result<(), ShellError> {
        let lines: Vec<String> = ctx
            .env
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect();
        for line in lines {
            ctx.emit(line, TextStyle::Plain);
        }
        Ok(())
    }
}

/// `export [KEY=value | KEY]`: set or show environment variables.
struct Export;

impl CommandHandler for Export {
    fn execute(&self, ctx: &mut ExecutionContext<'_>) -> Result<(), ShellError> {
        let Some(assignment) = ctx.args.first().cloned() else {
            let lines: Vec<String> = ctx
                .env
                .iter()
                .map(|(key, value)| format!("declare -x {}=\"{}\"", key, value))
                .collect();
            for line in lines {
                ctx.emit(line, TextStyle::Plain);
            }
            return Ok(());
        };
        match assignment.split_once('=') {
            Some((key, value)) => ctx.env.set(key.trim(), value.trim()),
            None => {
                // bare key: show its current value, silently skip unknowns
                let key = assignment.trim();
                if let Some(value) = ctx.env.get(key).map(str::to_string) {
                    ctx.emit(format!("{}={}", key, value), TextStyle::Plain);
                }
                Ok(())
            }
        }
    }
}

/// `unset <KEY>`: remove a variable, silently succeeding when absent.
struct Unset;

impl CommandHandler for Unset {
    fn execute(&self, ctx: &mut ExecutionContext<'_>) -> Result<(), ShellError> {
        let Some(key) = ctx.args.first() else {
            return Err(ShellError::CommandFailed(
                "unset: missing variable name".to_string(),
            ));
        };
        if !is_valid_var_name(key) {
            return Err(ShellError::InvalidVariableName(key.clone()));
        }
        ctx.env.unset(key);
        Ok(())
    }
}

// =============================================================================
// Script Execution
// =============================================================================

/// `./<script>`: run a script file through the script interpreter.
struct RunScript;

impl CommandHandler for RunScript {
    fn execute(&self, ctx: &mut ExecutionContext<'_>) -> Result<(), ShellError> {
        let Some(target) = ctx.args.first().cloned() else {
            return Err(ShellError::CommandFailed(
                "./: missing script name".to_string(),
            ));
        };
        let mut lines = Vec::new();
        let ok = script::run(&target, ctx.tree, ctx.env, &mut lines);
        for line in lines {
            ctx.emit_line(line);
        }
        if ok {
            Ok(())
        } else {
            Err(ShellError::ScriptFailed(target))
        }
    }

    fn completions(&self, args: &[String], tree: &VirtualTree) -> Vec<String> {
        complete_entries(args, tree, false)
    }
}
