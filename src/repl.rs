// pixie-batch/src/repl.rs
use crate::command::{Action, Command, HELP_ENTRIES};
use crate::processors::BatchRunner;
use crate::report::ConsoleReporter;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::PathBuf;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct HelpRow {
    #[tabled(rename = "Command")]
    command: &'static str,
    #[tabled(rename = "Description")]
    description: &'static str,
}

enum Input {
    Line(String),
    Interrupted,
    Closed,
}

/// Interactive prompt. Ctrl-C cancels the current prompt, Ctrl-D or `exit`
/// leaves.
pub struct Repl {
    runner: BatchRunner,
    editor: DefaultEditor,
    reporter: ConsoleReporter,
}

impl Repl {
    pub fn new(runner: BatchRunner) -> anyhow::Result<Self> {
        Ok(Self {
            runner,
            editor: DefaultEditor::new()?,
            reporter: ConsoleReporter::new(),
        })
    }

    pub fn run(&mut self) -> anyhow::Result<()> {
        self.print_welcome();
        print_help();

        loop {
            let line = match self.read("\nEnter command> ")? {
                Input::Line(line) => line,
                Input::Interrupted => {
                    print_cancelled();
                    continue;
                }
                Input::Closed => break,
            };

            if line.trim().is_empty() {
                continue;
            }
            if let Err(e) = self.editor.add_history_entry(line.as_str()) {
                log::debug!("Could not record history entry: {}", e);
            }

            match line.parse::<Command>() {
                Ok(Command::Exit) => break,
                Ok(Command::Help) => print_help(),
                Ok(Command::Run(action)) => {
                    let directory = match self.read("Enter images directory path> ")? {
                        Input::Line(path) => PathBuf::from(path.trim()),
                        Input::Interrupted => {
                            print_cancelled();
                            continue;
                        }
                        Input::Closed => break,
                    };
                    self.execute(&action, directory);
                }
                Err(e) => {
                    log::debug!("{}", e);
                    eprintln!(
                        "{} Invalid command! Use 'help' to see available commands.",
                        "[ERR]".red().bold()
                    );
                }
            }
        }

        println!("{} Goodbye!", "[*]".blue().bold());
        Ok(())
    }

    fn execute(&mut self, action: &Action, directory: PathBuf) {
        match action.execute(&self.runner, &directory, &mut self.reporter) {
            Ok(report) => log::debug!("{:?}", report.summary()),
            Err(e) => eprintln!("{} {}", "[ERR]".red().bold(), e),
        }
    }

    fn read(&mut self, prompt: &str) -> anyhow::Result<Input> {
        match self.editor.readline(prompt) {
            Ok(line) => Ok(Input::Line(line)),
            Err(ReadlineError::Interrupted) => Ok(Input::Interrupted),
            Err(ReadlineError::Eof) => Ok(Input::Closed),
            Err(e) => Err(e.into()),
        }
    }

    fn print_welcome(&self) {
        let line = "─".repeat(60);
        println!("{}", line.dimmed());
        println!("  {}", "Pixie Batch - image processing tool".cyan().bold());
        println!(
            "  {}",
            "Batch resize, convert, filter and AI enhancement".green()
        );
        let model = if self.runner.processor().super_resolution().is_available() {
            "AI enhancement: ready".green()
        } else {
            "AI enhancement: unavailable".yellow()
        };
        println!("  {}", model);
        println!("{}", line.dimmed());
    }
}

fn print_help() {
    let rows: Vec<HelpRow> = HELP_ENTRIES
        .iter()
        .map(|&(command, description)| HelpRow {
            command,
            description,
        })
        .collect();

    println!("{}", "Available Commands".cyan().bold());
    println!("{}", Table::new(rows).with(Style::rounded()));
}

fn print_cancelled() {
    println!(
        "{} Operation cancelled by user. Use 'exit' to quit.",
        "[WARN]".yellow().bold()
    );
}
