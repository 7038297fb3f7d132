//! Command line utilities.

use std::path::PathBuf;

use anyhow::{Context, Result};
pub use clap::Parser;

use crate::{HtmlMinifier, Options, PartialOptions};

/// Command line usage description.
#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// Input HTML file
    pub input: PathBuf,

    /// Output file [default: standard output]
    pub output: Option<PathBuf>,

    /// Options file (JSON, TOML or YAML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override an option, e.g. `-o removeComments=false`
    #[arg(short, long = "option", value_name = "NAME=BOOL")]
    pub options: Vec<String>,
}

impl Cli {
    /// Resolve the options from the options file and the overrides.
    ///
    /// Overrides given on the command line take precedence.
    pub fn resolve_options(&self) -> Result<Options> {
        let from_file = match &self.config {
            Some(path) => PartialOptions::from_file(path).context("loading configuration")?,
            None => PartialOptions::default(),
        };

        let from_args =
            PartialOptions::from_pairs(&self.options).context("parsing option overrides")?;

        Ok(Options::default().merge(&from_file.or(from_args)))
    }
}

/// Run the minifier.
pub fn run(cli: &Cli) -> Result<()> {
    let options = cli.resolve_options()?;

    let input = std::fs::read_to_string(&cli.input)
        .with_context(|| format!("reading {:?}", cli.input))?;

    let output = HtmlMinifier::with_options(options)
        .minify(&input)
        .with_context(|| format!("minifying {:?}", cli.input))?;

    match &cli.output {
        Some(path) => {
            std::fs::write(path, &output).with_context(|| format!("writing {:?}", path))?;
        },
        None => print!("{}", output),
    }

    tracing::info!(
        "Minified {:?}: {} bytes saved ({} -> {})",
        cli.input,
        input.len().saturating_sub(output.len()),
        input.len(),
        output.len()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{Cli, Parser};

    #[test]
    fn resolve_overrides() {
        let cli = Cli::parse_from([
            "htmlmin",
            "index.html",
            "-o",
            "removeComments=false",
            "--option",
            "collapseWhitespace=false",
        ]);

        let options = cli.resolve_options().unwrap();

        assert!(!options.remove_comments);
        assert!(!options.collapse_whitespace);
        assert!(options.remove_optional_tags);
        assert_eq!(cli.output, None);
    }

    #[test]
    fn reject_invalid_override() {
        let cli = Cli::parse_from(["htmlmin", "index.html", "-o", "removeComments"]);

        assert!(cli.resolve_options().is_err());
    }
}
