use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};
use log::info;

use rfpages::{
    assemble, import_encoded, layout, DocumentConfig, FrameBuffer, GridSpec, Margins, Orientation, PaperSize,
    PdfBuilder,
};

/// Input token that inserts a page break instead of an image.
const BREAK_TOKEN: &str = ":break";

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OrientationArg {
    Portrait,
    Landscape,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PaperArg {
    A4,
    Letter,
}

/// Lay out PNG/JPEG frames on a grid and write them as a PDF.
#[derive(Debug, Parser)]
#[command(name = "rfpages", version, about)]
struct Cli {
    /// Image files in capture order; `:break` starts a new page
    #[arg(required = true)]
    inputs: Vec<String>,

    /// JSON configuration file (flags below override it)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Grid as ROWSxCOLUMNS, e.g. 3x3
    #[arg(long)]
    grid: Option<GridSpec>,

    #[arg(long, value_enum)]
    orientation: Option<OrientationArg>,

    #[arg(long, value_enum)]
    paper: Option<PaperArg>,

    /// Page margin in millimetres, applied to every side
    #[arg(long)]
    margin: Option<f64>,

    /// Output path (defaults to the configured filename)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the layout plan as JSON instead of writing a document
    #[arg(long)]
    plan: bool,

    /// Print the document as a data URI instead of writing a file
    #[arg(long, conflicts_with = "plan")]
    data_uri: bool,
}

impl Cli {
    fn document_config(&self) -> anyhow::Result<DocumentConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("reading config {}", path.display()))?;
                DocumentConfig::from_json(&json)?
            }
            None => DocumentConfig::default(),
        };
        if let Some(grid) = self.grid {
            config.grid = grid;
        }
        if let Some(o) = self.orientation {
            config.orientation = match o {
                OrientationArg::Portrait => Orientation::Portrait,
                OrientationArg::Landscape => Orientation::Landscape,
            };
        }
        if let Some(p) = self.paper {
            config.paper = match p {
                PaperArg::A4 => PaperSize::A4,
                PaperArg::Letter => PaperSize::Letter,
            };
        }
        if let Some(m) = self.margin {
            config.margin = Margins::uniform(m);
        }
        if let Some(out) = &self.output {
            config.filename = out.display().to_string();
        }
        Ok(config)
    }

    fn frames(&self) -> anyhow::Result<FrameBuffer> {
        let mut frames = FrameBuffer::new();
        for input in &self.inputs {
            if input == BREAK_TOKEN {
                frames.append_break();
                continue;
            }
            let bytes = std::fs::read(input).with_context(|| format!("reading {}", input))?;
            let image = import_encoded(bytes).with_context(|| format!("decoding {}", input))?;
            frames.append(image)?;
        }
        if frames.image_count() == 0 {
            bail!("no images given");
        }
        Ok(frames)
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = cli.document_config()?;
    let frames = cli.frames()?;
    let plan = layout(frames.snapshot(), &config.layout_config()?)?;

    if cli.plan {
        println!("{}", plan.to_json()?);
        return Ok(());
    }

    let output = assemble(&plan, PdfBuilder::new(), &config.filename)?;
    if cli.data_uri {
        println!("{}", output.to_data_uri());
        return Ok(());
    }

    output.save(output.filename())?;
    info!("wrote {} ({})", output.filename(), output.blob().id);
    println!("{}: {} pages, {} images", output.filename(), plan.page_count, plan.commands.len());
    Ok(())
}
