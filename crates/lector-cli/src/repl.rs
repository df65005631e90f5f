//! Interactive REPL (Read-Eval-Print Loop) mode.
//!
//! Extraction and cache requests run in the background. Whatever finished
//! while the user was typing is applied just before the next prompt.

use crate::clipboard::SystemClipboard;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use lector_domain::PresetId;
use lector_sdk::ExtractionBackend;
use lector_session::{Completion, DirectorySink, Workbench, WorkbenchEvent};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::PathBuf;

/// Run the interactive REPL.
pub async fn run_repl<B: ExtractionBackend + 'static>(
    config: &Config,
    workbench: &mut Workbench<B>,
    formatter: &Formatter,
) -> Result<()> {
    println!("{}", formatter.info("Lector REPL - Type 'help' for commands, 'exit' to quit"));
    println!();

    let editor_config = rustyline::Config::builder()
        .max_history_size(config.settings.history_size)?
        .auto_add_history(false)
        .build();
    let mut editor = DefaultEditor::with_config(editor_config)?;

    // Load history
    let history_path = get_history_path()?;
    let _ = editor.load_history(&history_path);

    let mut clipboard = SystemClipboard::new();

    loop {
        report_ready(workbench, formatter);

        let prompt = format!("lector [{}]> ", workbench.phase());
        match editor.readline(&prompt) {
            Ok(line) => {
                let line = line.trim();

                if line.is_empty() {
                    continue;
                }

                editor.add_history_entry(line).ok();

                match parse_repl_command(line) {
                    Ok(ReplCommand::Exit) => {
                        println!("{}", formatter.info("Goodbye!"));
                        break;
                    }
                    Ok(ReplCommand::Help) => {
                        print_help(formatter);
                    }
                    Ok(cmd) => {
                        if let Err(e) = execute_repl_command(cmd, workbench, &mut clipboard, config, formatter).await {
                            eprintln!("{}", formatter.error(&e.to_string()));
                        }
                        formatter.print_notices(&workbench.take_notices());
                    }
                    Err(e) => {
                        eprintln!("{}", formatter.error(&e.to_string()));
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", formatter.info("Use 'exit' to quit"));
            }
            Err(ReadlineError::Eof) => {
                break;
            }
            Err(err) => {
                eprintln!("{}", formatter.error(&format!("Error: {}", err)));
                break;
            }
        }
    }

    // Save history
    editor.save_history(&history_path).ok();

    Ok(())
}

/// REPL command type.
#[derive(Debug, PartialEq, Eq)]
enum ReplCommand {
    Exit,
    Help,
    Open(PathBuf),
    Remove,
    Preset(PresetId),
    Prompt(String),
    Submit,
    Wait,
    Status,
    Show,
    Copy,
    Export(Option<PathBuf>),
    ClearCache,
    Presets,
}

/// Parse a REPL command line.
fn parse_repl_command(line: &str) -> Result<ReplCommand> {
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim_start()),
        None => (line, ""),
    };

    match head {
        "exit" | "quit" | "q" => Ok(ReplCommand::Exit),
        "help" | "?" => Ok(ReplCommand::Help),
        "open" => {
            if rest.is_empty() {
                return Err(CliError::InvalidInput("Usage: open <path>".to_string()));
            }
            Ok(ReplCommand::Open(PathBuf::from(rest)))
        }
        "remove" => Ok(ReplCommand::Remove),
        "preset" => PresetId::parse(rest).map(ReplCommand::Preset).ok_or_else(|| {
            CliError::InvalidInput(format!(
                "Usage: preset <{}>",
                PresetId::ALL.iter().map(|p| p.as_str()).collect::<Vec<_>>().join("|")
            ))
        }),
        // Everything after the command word, verbatim
        "prompt" => Ok(ReplCommand::Prompt(rest.to_string())),
        "submit" => Ok(ReplCommand::Submit),
        "wait" => Ok(ReplCommand::Wait),
        "status" => Ok(ReplCommand::Status),
        "show" => Ok(ReplCommand::Show),
        "copy" => Ok(ReplCommand::Copy),
        "export" => Ok(ReplCommand::Export((!rest.is_empty()).then(|| PathBuf::from(rest)))),
        "clear-cache" => Ok(ReplCommand::ClearCache),
        "presets" => Ok(ReplCommand::Presets),
        _ => Err(CliError::InvalidInput(format!(
            "Unknown command: {}. Type 'help' for available commands.",
            head
        ))),
    }
}

/// Execute a REPL command.
async fn execute_repl_command<B: ExtractionBackend + 'static>(
    cmd: ReplCommand,
    workbench: &mut Workbench<B>,
    clipboard: &mut SystemClipboard,
    config: &Config,
    formatter: &Formatter,
) -> Result<()> {
    match cmd {
        ReplCommand::Open(path) => {
            let asset = workbench.select_file(&path).await?;
            println!(
                "{}",
                formatter.success(&format!("Loaded {} ({} bytes)", asset.file_name(), asset.len()))
            );
        }
        ReplCommand::Remove => {
            workbench.remove_image();
            println!("{}", formatter.info("Image removed"));
        }
        ReplCommand::Preset(preset) => {
            workbench.select_preset(preset);
            println!("{}", formatter.info(&format!("Prompt: {}", preset.canonical_text())));
        }
        ReplCommand::Prompt(text) => {
            workbench.set_prompt(text);
            match workbench.prompt().active_preset() {
                Some(preset) => println!("{}", formatter.info(&format!("Matches preset '{}'", preset))),
                None if workbench.prompt().text().is_empty() => {
                    println!("{}", formatter.info("Prompt cleared; the backend picks its own"))
                }
                None => println!("{}", formatter.info("Custom prompt set")),
            }
        }
        ReplCommand::Submit => match workbench.submit() {
            Some(seq) => println!("{}", formatter.info(&format!("Submitted request {}", seq))),
            None if workbench.image().is_none() => {
                return Err(CliError::InvalidInput("Open an image first".to_string()))
            }
            None => println!("{}", formatter.warning("A request is already in flight")),
        },
        ReplCommand::Wait => {
            workbench.settle().await;
            println!("{}", formatter.format_result(&workbench.view())?);
        }
        ReplCommand::Status => {
            println!("{}", formatter.format_view(&workbench.view())?);
        }
        ReplCommand::Show => {
            println!("{}", formatter.format_result(&workbench.view())?);
        }
        ReplCommand::Copy => {
            workbench.copy_to_clipboard(clipboard);
        }
        ReplCommand::Export(dir) => {
            let dir = dir.unwrap_or_else(|| config.download_dir());
            if let Some(path) = workbench.export(&DirectorySink::new(dir)).await {
                println!("{}", path.display());
            }
        }
        ReplCommand::ClearCache => {
            if !workbench.clear_cache() {
                println!("{}", formatter.warning("A clear request is already in progress"));
            }
        }
        ReplCommand::Presets => {
            println!("{}", formatter.format_presets(workbench.prompt())?);
        }
        ReplCommand::Exit | ReplCommand::Help => {}
    }

    Ok(())
}

/// Apply finished background work and print what it produced.
fn report_ready<B: ExtractionBackend + 'static>(workbench: &mut Workbench<B>, formatter: &Formatter) {
    let finished_extraction = workbench.apply_ready().iter().any(|event| {
        matches!(
            event,
            WorkbenchEvent::Extraction {
                completion: Completion::Applied(_),
                ..
            }
        )
    });

    formatter.print_notices(&workbench.take_notices());
    if finished_extraction {
        if let Ok(output) = formatter.format_result(&workbench.view()) {
            println!("{}", output);
        }
    }
}

fn get_history_path() -> Result<PathBuf> {
    let lector_dir = Config::dir()?;
    std::fs::create_dir_all(&lector_dir)?;
    Ok(lector_dir.join("history.txt"))
}

fn print_help(formatter: &Formatter) {
    println!("{}", formatter.info("Available commands:"));
    println!();
    println!("  open <path>          - Select an image (png, jpg, jpeg, gif, bmp, webp)");
    println!("  remove               - Drop the image, result and error");
    println!("  preset <id>          - Use a preset prompt (id-card|receipt|business-card|table|form)");
    println!("  prompt [text]        - Set a custom prompt; no text clears it");
    println!("  submit               - Start extraction in the background");
    println!("  wait                 - Wait for outstanding requests and show the result");
    println!("  status               - Show the session state");
    println!("  show                 - Show the current result");
    println!("  copy                 - Copy the result as plain text");
    println!("  export [dir]         - Download the raw result as JSON");
    println!("  clear-cache          - Ask the backend to release GPU memory");
    println!("  presets              - List preset prompts");
    println!("  help, ?              - Show this help");
    println!("  exit, quit, q        - Exit REPL");
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(parse_repl_command("exit").unwrap(), ReplCommand::Exit);
        assert_eq!(parse_repl_command("?").unwrap(), ReplCommand::Help);
        assert_eq!(parse_repl_command("submit").unwrap(), ReplCommand::Submit);
        assert_eq!(parse_repl_command("clear-cache").unwrap(), ReplCommand::ClearCache);
    }

    #[test]
    fn test_parse_open_keeps_spaces() {
        assert_eq!(
            parse_repl_command("open  My Scans/receipt 1.png").unwrap(),
            ReplCommand::Open(PathBuf::from("My Scans/receipt 1.png"))
        );
        assert!(parse_repl_command("open").is_err());
    }

    #[test]
    fn test_parse_preset() {
        assert_eq!(
            parse_repl_command("preset business_card").unwrap(),
            ReplCommand::Preset(PresetId::BusinessCard)
        );
        assert!(parse_repl_command("preset passport").is_err());
    }

    #[test]
    fn test_parse_prompt() {
        assert_eq!(
            parse_repl_command("prompt List every  total").unwrap(),
            ReplCommand::Prompt("List every  total".to_string())
        );
        assert_eq!(parse_repl_command("prompt").unwrap(), ReplCommand::Prompt(String::new()));
    }

    #[test]
    fn test_parse_export() {
        assert_eq!(parse_repl_command("export").unwrap(), ReplCommand::Export(None));
        assert_eq!(
            parse_repl_command("export /tmp/out").unwrap(),
            ReplCommand::Export(Some(PathBuf::from("/tmp/out")))
        );
    }

    #[test]
    fn test_unknown_command() {
        assert!(matches!(parse_repl_command("assert x"), Err(CliError::InvalidInput(_))));
    }
}
