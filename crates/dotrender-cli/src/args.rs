//! Command-line argument definitions for the dotrender CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Flags mirror the `dot` ones where they exist (`-K`,
//! `-T`, `-o`).

use clap::Parser;

use dotrender::parameter::ParameterKind;

/// Command-line arguments for the dotrender tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the DOT source file
    #[arg(help = "Path to the DOT source file (derived from --output if omitted)")]
    pub source: Option<String>,

    /// Layout engine (dot, neato, ...); defaults to the configured engine
    #[arg(short = 'K', long)]
    pub engine: Option<String>,

    /// Output format (pdf, png, ...); inferred from --output if omitted
    #[arg(short = 'T', long)]
    pub format: Option<String>,

    /// Output renderer (cairo, gd, ...)
    #[arg(short, long)]
    pub renderer: Option<String>,

    /// Output formatter (cairo, gd, ...); requires --renderer
    #[arg(short, long)]
    pub formatter: Option<String>,

    /// Path for the rendered file; the engine names it if omitted
    #[arg(short, long)]
    pub output: Option<String>,

    /// Suppress the engine's stderr
    #[arg(short, long)]
    pub quiet: bool,

    /// Fail if the result file already exists
    #[arg(long, conflicts_with = "overwrite_source")]
    pub no_clobber: bool,

    /// Allow the engine to write to the file it reads from
    #[arg(long)]
    pub overwrite_source: bool,

    /// Neato no-op mode (-n<N>), keeps existing node positions
    #[arg(long, value_name = "N")]
    pub neato_no_op: Option<u8>,

    /// Resolve and log the engine command without running it
    #[arg(long)]
    pub dry_run: bool,

    /// Print the accepted values of a parameter kind and exit
    #[arg(long, value_name = "KIND")]
    pub list: Option<ParameterKind>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dot_style_flags() {
        let args = Args::try_parse_from([
            "dotrender", "-K", "neato", "-T", "png", "-o", "out.png", "spam.gv",
        ])
        .unwrap();

        assert_eq!(args.engine.as_deref(), Some("neato"));
        assert_eq!(args.format.as_deref(), Some("png"));
        assert_eq!(args.output.as_deref(), Some("out.png"));
        assert_eq!(args.source.as_deref(), Some("spam.gv"));
        assert_eq!(args.log_level, "info");
    }

    #[test]
    fn test_no_clobber_conflicts_with_overwrite_source() {
        let result = Args::try_parse_from([
            "dotrender",
            "--no-clobber",
            "--overwrite-source",
            "spam.gv",
        ]);

        assert!(result.is_err());
    }

    #[test]
    fn test_list_kind() {
        let args = Args::try_parse_from(["dotrender", "--list", "format"]).unwrap();

        assert_eq!(args.list, Some(ParameterKind::Format));
        assert!(Args::try_parse_from(["dotrender", "--list", "spam"]).is_err());
    }
}
