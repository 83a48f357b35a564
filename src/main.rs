use clap::{Parser, Subcommand};
use mediaconv::imaging::geometry::Bounds;
use mediaconv::output::{Report, print_report};
use mediaconv::{
    AudioRequest, Converter, DeleteRequest, ImageRequest, LogoRequest, VideoRequest, config,
};
use std::fs::File;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "mediaconv")]
#[command(about = "Normalize uploaded media into storage-ready files")]
#[command(long_about = "\
Normalize uploaded media into storage-ready files

Each conversion copies the upload into the output directory, encodes it and
removes the copy again:

  media/
  ├── processed_holiday.webp      # image: exact WxH canvas
  ├── brand.png                   # logo: clamped into bounds, no prefix
  ├── processed_clip.mp4          # video: letterboxed (mp4) or scaled (webm)
  └── processed_talk.mp3          # audio: re-encoded at a fixed bitrate

Images and logos need cwebp for WebP output; video and audio need ffmpeg.

Run 'mediaconv gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Config file (stock defaults when omitted)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Storage directory for outputs
    #[arg(long, default_value = "media", global = true)]
    out_dir: PathBuf,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Debug-level logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fit an image onto an exact canvas
    Image {
        input: PathBuf,
        #[arg(long)]
        width: u32,
        #[arg(long)]
        height: u32,
        /// png, jpg/jpeg or webp
        #[arg(long)]
        format: String,
        /// 1 (smallest) to 5 (best)
        #[arg(long, default_value_t = 3)]
        quality: u8,
        /// Aspect deviation in percent up to which the image is stretched
        #[arg(long, default_value_t = 0.0)]
        stretch_threshold: f64,
        /// Transparent instead of blurred background
        #[arg(long)]
        transparent: bool,
    },
    /// Clamp a logo into min/max bounds
    Logo {
        input: PathBuf,
        /// png, jpg/jpeg or webp (config default when omitted)
        #[arg(long)]
        format: Option<String>,
        #[arg(long)]
        max_width: u32,
        #[arg(long)]
        max_height: u32,
        #[arg(long, default_value_t = 0)]
        min_width: u32,
        #[arg(long, default_value_t = 0)]
        min_height: u32,
    },
    /// Transcode a video into a WxH frame
    Video {
        input: PathBuf,
        #[arg(long)]
        width: u32,
        #[arg(long)]
        height: u32,
        /// mp4 or webm
        #[arg(long)]
        format: String,
        #[arg(long, default_value_t = 3)]
        quality: u8,
    },
    /// Re-encode audio (an mp4 source always becomes mp3)
    Audio {
        input: PathBuf,
        /// mp3, m4a, opus or wav
        #[arg(long)]
        format: String,
        /// kbps, 64 to 320
        #[arg(long, default_value_t = 128)]
        bitrate: u32,
    },
    /// Print the format category of each file name
    Classify { files: Vec<String> },
    /// Delete a stored artifact
    Delete {
        /// File name inside the storage directory
        #[arg(required_unless_present = "path")]
        file_name: Option<String>,
        /// Explicit path to delete instead
        #[arg(long)]
        path: Option<PathBuf>,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Respect RUST_LOG if set, otherwise pick the level from --verbose
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "mediaconv=debug".to_string()
        } else {
            "mediaconv=info".to_string()
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    let report = match cli.command {
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
            return Ok(());
        }
        Command::Classify { files } => {
            for file in &files {
                print_report(&Report::classified(file), cli.json)?;
            }
            return Ok(());
        }
        Command::Delete { file_name, path } => {
            let converter = load_converter(cli.config.as_deref())?;
            let deleted = converter.delete(&DeleteRequest {
                dir: cli.out_dir,
                file_name: file_name.unwrap_or_default(),
                override_path: path,
            })?;
            Report::Deleted { path: deleted }
        }
        Command::Image {
            input,
            width,
            height,
            format,
            quality,
            stretch_threshold,
            transparent,
        } => {
            let converter = load_converter(cli.config.as_deref())?;
            let output = converter.image(ImageRequest {
                file_name: upload_name(&input)?,
                source: File::open(&input)?,
                width,
                height,
                format,
                stretch_threshold,
                quality,
                transparent_background: transparent,
                dir: cli.out_dir,
            })?;
            Report::converted("image", &input, output)
        }
        Command::Logo {
            input,
            format,
            max_width,
            max_height,
            min_width,
            min_height,
        } => {
            let converter = load_converter(cli.config.as_deref())?;
            let output = converter.logo(LogoRequest {
                file_name: upload_name(&input)?,
                source: File::open(&input)?,
                format,
                bounds: Bounds {
                    max_width,
                    max_height,
                    min_width,
                    min_height,
                },
                dir: cli.out_dir,
            })?;
            Report::converted("logo", &input, output)
        }
        Command::Video {
            input,
            width,
            height,
            format,
            quality,
        } => {
            let converter = load_converter(cli.config.as_deref())?;
            let output = converter.video(VideoRequest {
                file_name: upload_name(&input)?,
                source: File::open(&input)?,
                width,
                height,
                format,
                quality,
                dir: cli.out_dir,
            })?;
            Report::converted("video", &input, output)
        }
        Command::Audio {
            input,
            format,
            bitrate,
        } => {
            let converter = load_converter(cli.config.as_deref())?;
            let output = converter.audio(AudioRequest {
                file_name: upload_name(&input)?,
                source: File::open(&input)?,
                bitrate_kbps: bitrate,
                format,
                dir: cli.out_dir,
            })?;
            Report::converted("audio", &input, output)
        }
    };

    print_report(&report, cli.json)?;
    Ok(())
}

fn load_converter(config_path: Option<&Path>) -> Result<Converter, config::ConfigError> {
    let config = config::load_config(config_path)?;
    Converter::from_config(&config)
}

/// The upload's file name as the pipelines see it.
fn upload_name(input: &Path) -> Result<String, String> {
    input
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .ok_or_else(|| format!("not a file path: {}", input.display()))
}
