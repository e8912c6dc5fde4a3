use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use reelc::{
    AudioNode, AudioTrack, ExecutorOpts, ImageNode, ImageTrack, Project, ProjectBuilder,
    RenderOptions, Renderer, Size, TextNode, TextTrack, VideoNode, VideoTrack,
};

#[derive(Parser, Debug)]
#[command(name = "reelc", version, about = "Compile timeline projects into ffmpeg commands")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the ffmpeg command for a project without running it.
    Print(PrintArgs),
    /// Render a project (requires `ffmpeg` on PATH unless `--dry-run`).
    Render(RenderArgs),
    /// Write a demo project as JSON.
    Example(ExampleArgs),
}

#[derive(Parser, Debug)]
struct PrintArgs {
    /// Input project JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output media path used in the printed command.
    #[arg(long, default_value = "output.mp4")]
    out: PathBuf,

    #[command(flatten)]
    encoding: EncodingArgs,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input project JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output media path.
    #[arg(long)]
    out: PathBuf,

    #[command(flatten)]
    encoding: EncodingArgs,

    /// Log the command instead of running it.
    #[arg(long)]
    dry_run: bool,

    /// Log the command and forward ffmpeg output.
    #[arg(long, short)]
    verbose: bool,

    /// Kill ffmpeg after this many seconds (0 disables the limit).
    #[arg(long, default_value_t = 600)]
    timeout_secs: u64,

    /// ffmpeg binary to run.
    #[arg(long, default_value = "ffmpeg")]
    ffmpeg: PathBuf,
}

#[derive(clap::Args, Debug)]
struct EncodingArgs {
    /// Encoder preset.
    #[arg(long, value_enum, default_value_t = QualityChoice::Medium)]
    quality: QualityChoice,

    /// Container format.
    #[arg(long, value_enum, default_value_t = FormatChoice::Mp4)]
    format: FormatChoice,
}

#[derive(Parser, Debug)]
struct ExampleArgs {
    /// Destination JSON file; prints to stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum QualityChoice {
    High,
    Medium,
    Low,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatChoice {
    Mp4,
    Avi,
    Mov,
}

impl EncodingArgs {
    fn render_options(&self, out: PathBuf) -> RenderOptions {
        RenderOptions {
            quality: match self.quality {
                QualityChoice::High => reelc::Quality::High,
                QualityChoice::Medium => reelc::Quality::Medium,
                QualityChoice::Low => reelc::Quality::Low,
            },
            format: match self.format {
                FormatChoice::Mp4 => reelc::Format::Mp4,
                FormatChoice::Avi => reelc::Format::Avi,
                FormatChoice::Mov => reelc::Format::Mov,
            },
            ..RenderOptions::new(out)
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let verbose = matches!(&cli.cmd, Command::Render(args) if args.verbose);
    tracing_subscriber::fmt()
        .with_max_level(if verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_writer(std::io::stderr)
        .init();

    match cli.cmd {
        Command::Print(args) => cmd_print(args),
        Command::Render(args) => cmd_render(args),
        Command::Example(args) => cmd_example(args),
    }
}

fn read_project(path: &std::path::Path) -> anyhow::Result<Project> {
    let project = Project::from_path(path)
        .with_context(|| format!("load project '{}'", path.display()))?;
    Ok(project)
}

fn cmd_print(args: PrintArgs) -> anyhow::Result<()> {
    let project = read_project(&args.in_path)?;
    let options = args.encoding.render_options(args.out);
    let line = Renderer::default().command_string(&project, &options)?;
    println!("{line}");
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let project = read_project(&args.in_path)?;
    let options = RenderOptions {
        dry_run: args.dry_run,
        verbose: args.verbose,
        ..args.encoding.render_options(args.out)
    };
    let renderer = Renderer::new(ExecutorOpts {
        ffmpeg_path: args.ffmpeg,
        timeout: (args.timeout_secs > 0).then(|| Duration::from_secs(args.timeout_secs)),
    });

    renderer.render(&project, &options)?;
    if !options.dry_run {
        eprintln!("wrote {}", options.output_path.display());
    }
    Ok(())
}

fn cmd_example(args: ExampleArgs) -> anyhow::Result<()> {
    let json = example_project()?.to_json_pretty()?;
    match args.out {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create output dir '{}'", parent.display()))?;
            }
            std::fs::write(&path, json + "\n")
                .with_context(|| format!("write project '{}'", path.display()))?;
            eprintln!("wrote {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn example_project() -> reelc::ReelResult<Project> {
    ProjectBuilder::new(Size::new(1920, 1080), 30.0)
        .track(
            VideoTrack::new("main_video", 1).clip(
                VideoNode::new("clip1", "input_video.mp4")
                    .trim(0.0, Some(10.0))
                    .window(0.0, 10.0)
                    .sized(Size::new(1920, 1080)),
            ),
        )
        .track(
            AudioTrack::new("background_music", 0).clip(
                AudioNode::new("audio1", "background.mp3")
                    .trim(0.0, Some(10.0))
                    .window(0.0, 10.0)
                    .volume(0.5),
            ),
        )
        .track(
            TextTrack::new("title_text", 2).text(
                TextNode::new("title1", "Welcome to reelc")
                    .window(1.0, 4.0)
                    .at(100, 100)
                    .font("Arial")
                    .font_size(48.0)
                    .color("white"),
            ),
        )
        .track(
            ImageTrack::new("logo", 3).image(
                ImageNode::new("logo1", "logo.png")
                    .window(0.0, 2.0)
                    .at(50, 50)
                    .sized(Size::new(200, 100)),
            ),
        )
        .build()
}
