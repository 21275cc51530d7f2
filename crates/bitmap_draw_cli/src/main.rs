use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bitmap_draw::{
    draw_line, draw_pixel, draw_rect, draw_text, extract_font, fill_rect, measure_text, Color,
    ExtractOptions, Font,
};
use clap::{Args, Parser, Subcommand};
use image::RgbaImage;
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use walkdir::WalkDir;

#[derive(Parser, Debug)]
#[command(author, version, about = "Draw shapes and bitmap text onto images")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build a JSON font from a reference strip image (or every PNG in a directory)
    BuildFont(BuildFontArgs),
    /// Draw text onto an image
    Text(TextArgs),
    /// Print the width in pixels of a string
    Measure(MeasureArgs),
    /// Blend a single pixel
    Pixel(PixelArgs),
    /// Draw a line between two points
    Line(LineArgs),
    /// Draw a rectangle outline
    Rect(RectArgs),
    /// Draw a filled rectangle
    Fill(RectArgs),
}

#[derive(Args, Debug)]
struct ImagePaths {
    /// Input image path
    input: PathBuf,
    /// Output image path
    #[arg(short, long)]
    output: PathBuf,
}

#[derive(Args, Debug)]
struct BuildFontArgs {
    /// Reference image, or a directory searched for PNG reference images
    input: PathBuf,
    /// Output font path (single image input only, defaults to the input with a .json extension)
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// JSON file with extraction options; flags below override it
    #[arg(long)]
    options: Option<PathBuf>,
    /// Characters in the order they appear in the image
    #[arg(long)]
    chars: Option<String>,
    /// Keep lowercase lookups distinct instead of upper-casing text before lookup
    #[arg(long)]
    keep_case: bool,
    /// Color of glyph pixels (#rrggbb, #rrggbbaa, r,g,b or r,g,b,a)
    #[arg(long)]
    font_color: Option<Color>,
    /// Delimiter colors in order; repeat the flag for each color
    #[arg(long = "delimiter")]
    delimiters: Vec<Color>,
    /// Fail on characters without a delimiter run instead of storing empty glyphs
    #[arg(long)]
    strict: bool,
}

#[derive(Args, Debug)]
struct FontArg {
    /// JSON font file; the built-in 3x5 font is used when omitted
    #[arg(long)]
    font: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct TextArgs {
    #[command(flatten)]
    paths: ImagePaths,
    /// Text to draw
    text: String,
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    x: i32,
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    y: i32,
    #[arg(long, default_value = "#000000")]
    color: Color,
    #[command(flatten)]
    font: FontArg,
}

#[derive(Args, Debug)]
struct MeasureArgs {
    /// Text to measure
    text: String,
    #[command(flatten)]
    font: FontArg,
}

#[derive(Args, Debug)]
struct PixelArgs {
    #[command(flatten)]
    paths: ImagePaths,
    #[arg(long, allow_negative_numbers = true)]
    x: i32,
    #[arg(long, allow_negative_numbers = true)]
    y: i32,
    #[arg(long, default_value = "#000000")]
    color: Color,
}

#[derive(Args, Debug)]
struct LineArgs {
    #[command(flatten)]
    paths: ImagePaths,
    #[arg(long, allow_negative_numbers = true)]
    x0: i32,
    #[arg(long, allow_negative_numbers = true)]
    y0: i32,
    #[arg(long, allow_negative_numbers = true)]
    x1: i32,
    #[arg(long, allow_negative_numbers = true)]
    y1: i32,
    #[arg(long, default_value = "#000000")]
    color: Color,
}

#[derive(Args, Debug)]
struct RectArgs {
    #[command(flatten)]
    paths: ImagePaths,
    #[arg(long, allow_negative_numbers = true)]
    x: i32,
    #[arg(long, allow_negative_numbers = true)]
    y: i32,
    #[arg(long, allow_negative_numbers = true)]
    width: i32,
    #[arg(long, allow_negative_numbers = true)]
    height: i32,
    #[arg(long, default_value = "#000000")]
    color: Color,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::BuildFont(args) => build_font(args),
        Commands::Text(args) => text(args),
        Commands::Measure(args) => measure(args),
        Commands::Pixel(args) => {
            edit_image(&args.paths, |image| draw_pixel(image, args.x, args.y, args.color))
        },
        Commands::Line(args) => edit_image(&args.paths, |image| {
            draw_line(image, args.x0, args.y0, args.x1, args.y1, args.color)
        }),
        Commands::Rect(args) => edit_image(&args.paths, |image| {
            draw_rect(image, args.x, args.y, args.width, args.height, args.color)
        }),
        Commands::Fill(args) => edit_image(&args.paths, |image| {
            fill_rect(image, args.x, args.y, args.width, args.height, args.color)
        }),
    }
}

fn build_font(args: BuildFontArgs) -> Result<()> {
    let options = args.to_options()?;

    if !args.input.is_dir() {
        let output = args.output.clone().unwrap_or_else(|| args.input.with_extension("json"));
        return build_one(&args.input, &output, &options);
    }

    if args.output.is_some() {
        anyhow::bail!("--output cannot be used with a directory input");
    }

    let mut entries: Vec<PathBuf> = WalkDir::new(&args.input)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.path().to_path_buf())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("png"))
        })
        .collect();
    entries.sort();
    if entries.is_empty() {
        anyhow::bail!("no PNG reference images found in {:?}", args.input);
    }

    let progress = ProgressBar::new(entries.len() as u64);
    progress.set_style(
        ProgressStyle::with_template(
            "{spinner} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} fonts",
        )?
        .progress_chars("=> "),
    );

    for entry in &entries {
        build_one(entry, &entry.with_extension("json"), &options)?;
        progress.inc(1);
    }

    progress.finish_with_message(format!("Fonts written next to images in {:?}", args.input));
    Ok(())
}

fn build_one(input: &Path, output: &Path, options: &ExtractOptions) -> Result<()> {
    let image = open_image(input)?;
    let font = extract_font(&image, options)
        .with_context(|| format!("failed to extract font from {:?}", input))?;
    font.save(output).with_context(|| format!("failed to write font {:?}", output))?;
    info!("Wrote {} glyphs to {:?}", font.chars().len(), output);
    Ok(())
}

fn text(args: TextArgs) -> Result<()> {
    let font = args.font.load()?;
    let mut image = open_image(&args.paths.input)?;
    let end = draw_text(&mut image, args.x, args.y, &args.text, args.color, &font)
        .with_context(|| format!("failed to draw {:?}", args.text))?;
    info!("Text spans x={}..{}", args.x, end);
    save_image(&image, &args.paths.output)
}

fn measure(args: MeasureArgs) -> Result<()> {
    let font = args.font.load()?;
    let width = measure_text(&args.text, &font)
        .with_context(|| format!("failed to measure {:?}", args.text))?;
    println!("{}", width);
    Ok(())
}

fn edit_image(paths: &ImagePaths, draw: impl FnOnce(&mut RgbaImage)) -> Result<()> {
    let mut image = open_image(&paths.input)?;
    draw(&mut image);
    save_image(&image, &paths.output)
}

fn open_image(path: &Path) -> Result<RgbaImage> {
    let image = image::open(path).with_context(|| format!("failed to open image {:?}", path))?;
    Ok(image.into_rgba8())
}

fn save_image(image: &RgbaImage, path: &Path) -> Result<()> {
    image.save(path).with_context(|| format!("failed to write image {:?}", path))
}

impl BuildFontArgs {
    fn to_options(&self) -> Result<ExtractOptions> {
        let mut options: ExtractOptions = match &self.options {
            Some(path) => {
                let file =
                    File::open(path).with_context(|| format!("failed to open {:?}", path))?;
                serde_json::from_reader(BufReader::new(file))
                    .with_context(|| format!("failed to parse options {:?}", path))?
            },
            None => ExtractOptions::default(),
        };

        if let Some(chars) = &self.chars {
            options.chars = chars.clone();
        }
        if self.keep_case {
            options.to_upper = false;
        }
        if let Some(color) = self.font_color {
            options.font_color = color;
        }
        if !self.delimiters.is_empty() {
            options.delimiters = self.delimiters.clone();
        }
        options.strict |= self.strict;
        Ok(options)
    }
}

impl FontArg {
    fn load(&self) -> Result<Font> {
        match &self.font {
            Some(path) => {
                Font::load(path).with_context(|| format!("failed to load font {:?}", path))
            },
            None => Ok(Font::default()),
        }
    }
}
