//! `sasswright`: a small CLI wrapping [`sasswright::StyleSheet`] — file or
//! stdin in, stdout or file out, one flag per `Options` field (spec §6.3).

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use clap::Parser;
use sasswright::{Options, OutputStyle, SourceMapMode, StyleSheet};

#[derive(Parser, Debug)]
#[command(name = "sasswright", about = "Compile Sass/SCSS to CSS", version)]
struct Args {
    /// Input file; omit or pass `-` to read from stdin.
    input: Option<PathBuf>,

    /// Write output here instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[arg(long, default_value = "expanded")]
    style: String,

    #[arg(long, default_value_t = 10)]
    precision: usize,

    #[arg(long)]
    indented: bool,

    #[arg(short = 'I', long = "load-path")]
    load_paths: Vec<PathBuf>,

    #[arg(long, default_value = "none")]
    source_map: String,

    #[arg(long)]
    source_map_contents: bool,

    #[arg(long)]
    embed_source_map: bool,

    #[arg(long)]
    omit_source_map_url: bool,

    #[arg(long)]
    quiet: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut builder = env_logger::Builder::from_default_env();
    if args.quiet {
        builder.filter_level(log::LevelFilter::Error);
    }
    builder.init();

    let style = match args.style.as_str() {
        "expanded" => OutputStyle::Expanded,
        "nested" => OutputStyle::Nested,
        "compact" => OutputStyle::Compact,
        "compressed" => OutputStyle::Compressed,
        other => anyhow::bail!("unknown --style \"{other}\" (expected expanded/nested/compact/compressed)"),
    };
    let source_map = match args.source_map.as_str() {
        "none" => SourceMapMode::Off,
        "inline" => SourceMapMode::Inline,
        "external" => SourceMapMode::External,
        other => anyhow::bail!("unknown --source-map \"{other}\" (expected none/inline/external)"),
    };

    let mut options = Options::new()
        .style(style)
        .precision(args.precision)
        .indented_syntax(args.indented)
        .source_map(source_map)
        .source_map_contents(args.source_map_contents)
        .source_map_embed(args.embed_source_map)
        .omit_source_map_url(args.omit_source_map_url);
    for path in &args.load_paths {
        options = options.include_path(path.clone());
    }

    let css = match &args.input {
        Some(path) if path != &PathBuf::from("-") => StyleSheet::from_path(path, &options)?,
        _ => {
            let mut input = String::new();
            io::stdin().read_to_string(&mut input)?;
            StyleSheet::new(&input, &options)?
        }
    };

    match args.output {
        Some(path) => fs::write(path, css)?,
        None => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            lock.write_all(css.as_bytes())?;
        }
    }

    Ok(())
}
