//! CLI: render a book of soft poems, or profile a basic book configuration.
//!
//! Usage:
//!   soft-poem-book render --config data/book.json [--seed N] [--no-snapshot]
//!   soft-poem-book profile --input data/basic.json --output data/book.json [--seed N]
//!
//! Set RUST_LOG=soft_poem_core=debug to follow each poem's rendition.

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use soft_poem_core::poem::profile_poems;
use soft_poem_core::{Book, BookConfig, RenderedPoem, seeded_rng};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "soft-poem-book", about = "Stochastic poem renderer")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render every poem of a book, in a weighted random order.
    Render {
        /// Book configuration (JSON)
        #[arg(long, value_name = "FILE")]
        config: PathBuf,

        /// Seed of the rendition. Drawn from the OS when missing.
        #[arg(long)]
        seed: Option<u64>,

        /// Build the book from the configuration without reading or writing `<stem>.bin`
        #[arg(long)]
        no_snapshot: bool,
    },
    /// Derive a full book configuration from a basic one.
    Profile {
        /// Basic book configuration (JSON)
        #[arg(long, value_name = "FILE")]
        input: PathBuf,

        /// Where the profiled configuration is written
        #[arg(long, value_name = "FILE")]
        output: PathBuf,

        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let outcome = match args.command {
        Command::Render { config, seed, no_snapshot } => render(&config, seed, no_snapshot),
        Command::Profile { input, output, seed } => profile(&input, &output, seed),
    };

    if let Err(e) = outcome {
        error!(error = %e, "soft-poem-book failed");
        process::exit(1);
    }
}

fn render(config_path: &Path, seed: Option<u64>, no_snapshot: bool) -> soft_poem_core::Result<()> {
    let seed = seed.unwrap_or_else(rand::random);
    // Book construction gets its own stream so the rendition only depends on `seed`.
    let mut build_rng = seeded_rng(rand::random());

    let book = if no_snapshot {
        Book::from_config(&BookConfig::from_file(config_path)?, &mut build_rng)?
    } else {
        Book::load_or_build(config_path, &mut build_rng)?
    };

    println!("<!-- seed {seed} -->");
    for poem in book.render_seeded(seed)? {
        println!("{}", poem_markup(&poem));
    }
    Ok(())
}

fn poem_markup(poem: &RenderedPoem) -> String {
    format!(
        r#"<section class="poem" id="poem-{}" data-name="{}" style="margin-top: {}em; padding-left: {}%">{}</section>"#,
        poem.immutable_id,
        escape_attribute(&poem.name),
        poem.gap_before,
        poem.left_pad,
        poem.body
    )
}

/// Escapes a value for use inside a double-quoted HTML attribute.
fn escape_attribute(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;").replace('<', "&lt;")
}

fn profile(input: &Path, output: &Path, seed: Option<u64>) -> soft_poem_core::Result<()> {
    let seed = seed.unwrap_or_else(rand::random);
    info!(seed, input = %input.display(), "profiling book");

    // Read without resolving `source_dir` so the output stays relative like the input.
    let mut config: BookConfig = serde_json::from_str(&fs::read_to_string(input)?)?;
    config.poems = profile_poems(&mut seeded_rng(seed), &config.poems)?;

    fs::write(output, config.to_json_pretty()?)?;
    info!(output = %output.display(), poems = config.poems.len(), "wrote profiled book");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(name: &str) -> RenderedPoem {
        RenderedPoem {
            immutable_id: 7,
            name: name.to_owned(),
            gap_before: 3.0,
            left_pad: 0.0,
            body: r#"<div class="poem-line"> sea</div>"#.to_owned(),
        }
    }

    #[test]
    fn poem_section_carries_its_layout() {
        assert_eq!(
            poem_markup(&rendered("tide")),
            r#"<section class="poem" id="poem-7" data-name="tide" style="margin-top: 3em; padding-left: 0%"><div class="poem-line"> sea</div></section>"#
        );
    }

    #[test]
    fn poem_name_cannot_break_out_of_its_attribute() {
        let markup = poem_markup(&rendered(r#"a "quoted" & <odd> name"#));
        assert!(markup.contains(r#"data-name="a &quot;quoted&quot; &amp; &lt;odd> name""#));
    }
}
