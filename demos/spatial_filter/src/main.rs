use argh::FromArgs;
use std::{path::PathBuf, time::Instant};

use kfilter::{
    imgproc::{
        filter::ConvolutionEngine, parallel::ExecutionStrategy, BorderMode, FilterConfig,
        Technique,
    },
    io::{
        functional::{self as F, DecodedImage},
        jpeg::check_jpeg_quality,
    },
};

#[derive(FromArgs)]
/// Blur an image with a gaussian or box kernel and adjust its contrast
struct Args {
    /// path to the input image
    #[argh(option, short = 'i')]
    input: PathBuf,

    /// path to the output image, png or jpeg
    #[argh(option, short = 'o')]
    output: PathBuf,

    /// filter technique: gaussian or box (default: gaussian)
    #[argh(option, short = 't', default = "String::from(\"gaussian\")")]
    technique: String,

    /// kernel radius (default: 1)
    #[argh(option, short = 'r', default = "1")]
    radius: i64,

    /// contrast offset within [-255, 255] (default: 0)
    #[argh(option, short = 'c', default = "0")]
    contrast: i64,

    /// border handling: renormalize or truncate (default: renormalize)
    #[argh(option, short = 'b', default = "String::from(\"renormalize\")")]
    border: String,

    /// number of worker threads (default: all cores)
    #[argh(option, short = 'j')]
    threads: Option<usize>,

    /// jpeg quality within [0, 100] (default: 90)
    #[argh(option, short = 'q', from_str_fn(parse_quality))]
    quality: Option<u8>,

    /// print image information and timing
    #[argh(switch, short = 'v')]
    verbose: bool,
}

fn parse_quality(value: &str) -> Result<u8, String> {
    let quality = value
        .parse::<u8>()
        .map_err(|e| format!("invalid quality {value}: {e}"))?;
    check_jpeg_quality(quality).map_err(|e| e.to_string())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Args = argh::from_env();

    let default_filter = if args.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let start = Instant::now();

    // validate the configuration before touching any pixel
    let technique: Technique = args.technique.parse()?;
    let border: BorderMode = args.border.parse()?;
    let config = FilterConfig::new(args.radius, technique, args.contrast)?.with_border(border);

    let strategy = match args.threads {
        Some(n) => ExecutionStrategy::Fixed(n),
        None => ExecutionStrategy::ParallelRows,
    };
    let engine = ConvolutionEngine::new(config).with_strategy(strategy);

    // read the image
    let src = F::read_image_any(&args.input)?;
    let size = src.size();

    log::info!("Image width: {}", size.width);
    log::info!("Image height: {}", size.height);
    log::info!("Kernel width: {}", config.kernel_width());

    // apply the filter; returns once every pixel is written
    let dst = match &src {
        DecodedImage::Rgb8(img) => engine.apply(img)?,
        DecodedImage::Rgb16(img) => engine.apply(img)?,
    };

    F::write_image_any_rgba8(&args.output, &dst, args.quality)?;

    log::info!("Time taken: {:?}", start.elapsed());

    Ok(())
}
