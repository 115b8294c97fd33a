//! Interactive selector loop over one cached registry

use crate::diagnostics::report_diagnostics;
use anyhow::Result;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::Path;
use tokenscope_query::{format_result, FormatOptions, QueryEngine};
use tokenscope_registry::RegistryCache;
use tokenscope_selector::{parse_selector, OutputFormat};

const HELP: &str = "\
Enter a selector, e.g. `tokens.color.*` or `components where name = 'Button'`
Commands:
  :format <default|json|table|list|count>   change output format
  :reload                                   re-read the registry file
  :help                                     show this help
  :quit                                     exit";

enum Step {
    Continue,
    Quit,
}

pub struct Repl<'a> {
    registry: &'a Path,
    engine: QueryEngine,
    cache: RegistryCache,
    format: OutputFormat,
    color: bool,
}

impl<'a> Repl<'a> {
    pub fn new(registry: &'a Path, engine: QueryEngine, color: bool) -> Self {
        Self {
            registry,
            engine,
            cache: RegistryCache::new(),
            format: OutputFormat::Default,
            color,
        }
    }

    pub fn run(&mut self) -> Result<()> {
        // Fail fast on a missing registry before prompting
        self.cache.load(self.registry)?;

        let mut editor = DefaultEditor::new()?;
        println!("tokenscope repl ({}). Type :help for commands.", self.registry.display());

        loop {
            match editor.readline("tokenscope> ") {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    let _ = editor.add_history_entry(line);
                    match self.handle(line) {
                        Ok(Step::Continue) => {}
                        Ok(Step::Quit) => break,
                        Err(e) => eprintln!("{}: {:#}", "error".red().bold(), e),
                    }
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
                Err(e) => return Err(e.into()),
            }
        }

        Ok(())
    }

    fn handle(&mut self, line: &str) -> Result<Step> {
        match line.split_once(' ').map_or((line, ""), |(cmd, rest)| (cmd, rest.trim())) {
            (":quit" | ":q" | ":exit", _) => return Ok(Step::Quit),
            (":help" | ":h", _) => println!("{}", HELP),
            (":reload", _) => {
                self.cache.invalidate(self.registry);
                let document = self.cache.load(self.registry)?;
                println!(
                    "reloaded: {} components, {} token groups",
                    document.components.len(),
                    document.tokens.len()
                );
            }
            (":format", name) => {
                self.format = name.parse().map_err(anyhow::Error::msg)?;
                println!("output format: {:?}", self.format);
            }
            (command, _) if command.starts_with(':') => {
                anyhow::bail!("unknown command {}, try :help", command)
            }
            _ => self.query(line)?,
        }
        Ok(Step::Continue)
    }

    fn query(&mut self, selector: &str) -> Result<()> {
        let (query, diagnostics) = parse_selector(selector);
        report_diagnostics(selector, &diagnostics, self.color);

        let source = self.registry.display().to_string();
        let document = self.cache.load(self.registry)?;
        let result = self.engine.execute(document, &query, &source);

        let options = FormatOptions {
            pretty: true,
            color: self.color,
        };
        println!("{}", format_result(&result, self.format, &options));
        Ok(())
    }
}
