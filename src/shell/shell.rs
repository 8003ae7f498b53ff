use std::fmt::Display;
use std::io::{self, BufRead, Write};

use colored::Colorize;
use snafu::{ResultExt, Snafu};
use supports_color::Stream;
use tracing::debug;

use crate::namespace::Namespace;

/// Line-oriented interactive driver over one [`Namespace`].
///
/// Every command maps onto one of the four public namespace operations;
/// operation failures are reported to the user and never terminate the
/// session.
pub struct Shell {
    namespace: Namespace,
}

#[derive(Debug, PartialEq, Eq)]
enum Outcome {
    Continue,
    Exit,
}

impl Shell {
    pub fn new(namespace: Namespace) -> Self {
        Shell { namespace }
    }

    /// Runs the read-eval-print loop until `exit` or end of input.
    pub fn run(&self) -> Result<(), ShellError> {
        if supports_color::on(Stream::Stdout).is_none() {
            colored::control::set_override(false);
        }

        let stdin = io::stdin();
        let mut stdout = io::stdout();

        println!("canopy virtual namespace. Type 'help' for available commands.");
        loop {
            self.print_prompt(&mut stdout)?;

            let mut line = String::new();
            let read = stdin.lock().read_line(&mut line).context(ReadLineSnafu)?;
            if read == 0 {
                debug!("Reached end of input, leaving the shell");
                return Ok(());
            }

            if self.dispatch(line.trim()) == Outcome::Exit {
                return Ok(());
            }
        }
    }

    fn print_prompt(&self, stdout: &mut io::Stdout) -> Result<(), ShellError> {
        write!(stdout, "{} ", format!("{}>", self.namespace.current_path()).cyan())
            .context(WriteSnafu)?;
        stdout.flush().context(WriteSnafu)?;

        Ok(())
    }

    fn dispatch(&self, line: &str) -> Outcome {
        let mut parts = line.split_whitespace();
        let Some(command) = parts.next() else {
            return Outcome::Continue;
        };
        let argument = parts.next();

        match (command, argument) {
            ("pwd", None) => println!("{}", self.namespace.current_path()),
            ("cd", None) => {}
            ("cd", Some(path)) => report(self.namespace.change_directory(path)),
            ("mkdir", Some(name)) => report(self.namespace.create_directory(name).map(|_| ())),
            ("touch", Some(name)) => report(self.namespace.create_file(name).map(|_| ())),
            ("mkdir" | "touch", None) => {
                println!("{}", format!("'{command}' expects a name").red());
            }
            ("help", None) => print_help(),
            ("exit", None) => return Outcome::Exit,
            _ => println!("{}", format!("Unknown command: '{line}'. Try 'help'.").red()),
        }

        Outcome::Continue
    }
}

fn report<E: Display>(result: Result<(), E>) {
    if let Err(error) = result {
        println!("{}", error.to_string().red());
    }
}

fn print_help() {
    println!("pwd            print the current directory");
    println!("cd <path>      change directory (absolute or relative)");
    println!("mkdir <name>   create a directory here");
    println!("touch <name>   create a file here");
    println!("help           show this message");
    println!("exit           leave the shell");
}

#[derive(Debug, Snafu)]
pub enum ShellError {
    #[snafu(display("Failed to read from standard input"))]
    ReadLineError { source: std::io::Error },
    #[snafu(display("Failed to write to standard output"))]
    WriteError { source: std::io::Error },
}
