//! ArborDB CLI
//!
//! Interactive shell: one SQL statement per line on stdin, outcome on
//! stdout. Lines starting with `.` are meta commands.

use std::io::{self, BufRead, IsTerminal, Write};

use arbordb::{Config, Engine};
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

/// ArborDB CLI
#[derive(Parser, Debug)]
#[command(name = "arbordb-cli")]
#[command(about = "Interactive shell for the ArborDB table engine")]
#[command(version)]
struct Args {
    /// B+Tree order for row stores and column indexes
    #[arg(short, long, default_value = "32")]
    order: usize,

    /// Max cached full-table results
    #[arg(short, long, default_value = "10000")]
    cache_capacity: usize,

    /// Disable the query cache
    #[arg(long)]
    no_cache: bool,
}

/// What the shell should do after a line
enum Control {
    Continue,
    Exit,
}

fn main() {
    // Logs go to stderr so stdout carries only results
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let config = Config::builder()
        .btree_order(args.order)
        .query_cache_enabled(!args.no_cache)
        .query_cache_capacity(args.cache_capacity)
        .build();

    let mut engine = match Engine::new(config) {
        Ok(engine) => engine,
        Err(e) => {
            tracing::error!("Failed to create engine: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("ArborDB v{} (order {})", arbordb::VERSION, args.order);

    if let Err(e) = run(&mut engine) {
        tracing::error!("I/O error: {}", e);
        std::process::exit(1);
    }
}

/// Read-eval-print loop until EOF or `.exit`
fn run(engine: &mut Engine) -> io::Result<()> {
    let stdin = io::stdin();
    let interactive = stdin.is_terminal();
    let mut stdout = io::stdout().lock();
    let mut lines = stdin.lock().lines();

    loop {
        if interactive {
            write!(stdout, "arbordb> ")?;
            stdout.flush()?;
        }

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let control = if line.starts_with('.') {
            meta_command(engine, line, &mut stdout)?
        } else {
            let result = arbordb::sql::parse(line).and_then(|statement| {
                tracing::debug!(table = statement.table(), "Executing statement");
                engine.execute(&statement)
            });
            match result {
                Ok(outcome) => writeln!(stdout, "{}", outcome)?,
                Err(e) => writeln!(stdout, "Error: {}", e)?,
            }
            Control::Continue
        };

        if let Control::Exit = control {
            break;
        }
    }

    stdout.flush()
}

fn meta_command(engine: &mut Engine, line: &str, out: &mut impl Write) -> io::Result<Control> {
    match line {
        ".exit" | ".quit" => return Ok(Control::Exit),
        ".tables" => {
            for name in engine.table_names() {
                writeln!(out, "{}", name)?;
            }
        }
        ".stats" => {
            writeln!(out, "order: {}", engine.config().btree_order)?;
            for name in engine.table_names() {
                if let Ok(table) = engine.table(name) {
                    writeln!(
                        out,
                        "{}: {} rows, {} columns, height {}",
                        name,
                        table.len(),
                        table.columns().len(),
                        table.rows().height()
                    )?;
                }
            }
            match engine.cache_stats() {
                Some(stats) => writeln!(
                    out,
                    "cache: {}/{} entries, {} hits, {} misses, hit rate {:.2}",
                    stats.entries,
                    stats.capacity,
                    stats.hits,
                    stats.misses,
                    stats.hit_rate()
                )?,
                None => writeln!(out, "cache: disabled")?,
            }
        }
        ".clear" => {
            engine.clear();
            writeln!(out, "All tables dropped")?;
        }
        other => writeln!(out, "Unknown command: {}", other)?,
    }

    Ok(Control::Continue)
}
