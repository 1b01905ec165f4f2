use crate::batch::render_all;
use crate::canvas::{Recorder, SurfaceRegistry};
use crate::command_dump::{commands_to_json, write_command_dump};
use crate::config::{Config, load_config};
use crate::fallback::{sequence_text, state_machine_text};
use crate::ir::DiagramSet;
use crate::parser::parse_document;
use crate::render::{render_svg, write_output_svg};
use crate::text_metrics::FontMeasure;
use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "cdr",
    version,
    about = "Render sequence diagrams and state machines from doc-gen pages or JSON"
)]
pub struct Args {
    /// Input file (.json, .json5, .html) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output directory, one file per canvas id. Defaults to stdout.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON file (theme, themeVariables, layout overrides)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Canvas ids to leave without a surface; they are written as text
    #[arg(long = "skip", value_delimiter = ',')]
    pub skip: Vec<String>,

    /// Log debug output to stderr
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Png,
    Text,
    Commands,
}

impl OutputFormat {
    fn extension(self) -> &'static str {
        match self {
            OutputFormat::Svg => "svg",
            OutputFormat::Png => "png",
            OutputFormat::Text => "txt",
            OutputFormat::Commands => "json",
        }
    }
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = load_config(args.config.as_deref())?;
    let input = read_input(args.input.as_deref())?;
    let set = parse_document(&input)?;

    if args.output_format == OutputFormat::Png && args.output.is_none() {
        return Err(anyhow::anyhow!("Output directory required for png output"));
    }
    if let Some(dir) = args.output.as_deref() {
        std::fs::create_dir_all(dir)?;
    }

    let mut surfaces = SurfaceRegistry::new(FontMeasure::from_theme(&config.theme));
    if args.output_format != OutputFormat::Text {
        for id in set.canvas_ids() {
            if args.skip.iter().any(|skip| skip == id) {
                info!(canvas = id, "skipping surface");
            } else {
                surfaces.provision(id);
            }
        }
    }
    let report = render_all(&mut surfaces, &set, &config);

    for id in set.canvas_ids() {
        match surfaces.get(id) {
            Some(recorder) if report.drawn.iter().any(|drawn| drawn == id) => {
                write_drawn(id, recorder, &args, &config)?;
            }
            _ => {
                let text = fallback_text(&set, id);
                let output = args.output.as_deref().map(|dir| dir.join(format!("{id}.txt")));
                write_output_text(&text, output.as_deref())?;
            }
        }
    }

    if !report.missing.is_empty() && args.output_format != OutputFormat::Text {
        warn!(
            count = report.missing.len(),
            "diagrams without a surface were written as text"
        );
    }
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn write_drawn(
    id: &str,
    recorder: &Recorder<FontMeasure>,
    args: &Args,
    config: &Config,
) -> Result<()> {
    let output = args
        .output
        .as_deref()
        .map(|dir| dir.join(format!("{id}.{}", args.output_format.extension())));

    match args.output_format {
        OutputFormat::Svg => {
            let svg = render_svg(recorder, &config.theme, &config.render);
            write_output_svg(&svg, output.as_deref())?;
        }
        OutputFormat::Png => {
            let output = output.ok_or_else(|| anyhow::anyhow!("Output path required for png output"))?;
            let svg = render_svg(recorder, &config.theme, &config.render);
            write_png(&svg, &output, config)?;
        }
        OutputFormat::Commands => match output {
            Some(path) => write_command_dump(&path, id, recorder)?,
            None => println!("{}", commands_to_json(id, recorder)?),
        },
        OutputFormat::Text => {
            return Err(anyhow::anyhow!("text output goes through the fallback renderer"));
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
fn write_png(svg: &str, output: &Path, config: &Config) -> Result<()> {
    crate::render::write_output_png(svg, output, &config.render, &config.theme)
}

#[cfg(not(feature = "png"))]
fn write_png(_svg: &str, _output: &Path, _config: &Config) -> Result<()> {
    Err(anyhow::anyhow!("PNG output requires the `png` feature"))
}

fn fallback_text(set: &DiagramSet, id: &str) -> String {
    set.sequence_diagrams
        .iter()
        .filter(|diagram| diagram.canvas_id() == id)
        .map(sequence_text)
        .chain(
            set.state_machines
                .iter()
                .filter(|machine| machine.canvas_id() == id)
                .map(state_machine_text),
        )
        .collect()
}

fn write_output_text(text: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => std::fs::write(path, text)?,
        None => print!("{text}"),
    }
    Ok(())
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path {
        if path != Path::new("-") {
            return Ok(std::fs::read_to_string(path)?);
        }
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}
