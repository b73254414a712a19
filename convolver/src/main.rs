use std::ffi::OsStr;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use fast_image_convolve as fc;
use image::{DynamicImage, ImageReader};
use log::debug;

mod structs;

#[derive(Parser)]
#[clap(version, about, long_about = None)]
#[clap(disable_help_flag = true)]
#[clap(group(clap::ArgGroup::new("kernel").required(true).args(["sigma", "box_size"])))]
struct Cli {
    #[clap(long, action = clap::ArgAction::HelpLong)]
    help: Option<bool>,

    /// Path to source image file
    #[clap(value_parser)]
    source_path: PathBuf,

    /// Path to result image file
    #[clap(value_parser)]
    destination_path: Option<PathBuf>,

    /// Sigma of gaussian kernel (low-pass filter)
    #[clap(short, long, value_parser)]
    sigma: Option<f32>,

    /// Size of box averaging kernel, must be odd
    #[clap(short, long, value_parser)]
    box_size: Option<usize>,

    /// Return source image minus low-pass filtered one (high-pass filter)
    #[clap(long, action)]
    high_pass: bool,

    /// Overwrite destination file
    #[clap(short, long, action)]
    overwrite: bool,

    /// Algorithm used to apply the kernel
    #[clap(short, long, value_enum, default_value_t = structs::Algorithm::Auto)]
    algorithm: structs::Algorithm,

    /// Way to multiply spectra in the frequency domain
    #[clap(short, long, value_enum, default_value_t = structs::SpectralMultiply::Polar)]
    multiply: structs::SpectralMultiply,

    /// Never use the frequency domain in the auto mode
    #[clap(long, action)]
    no_spectral: bool,

    /// Minimal count of kernel weights to use the frequency domain
    #[clap(short, long, value_parser, default_value_t = fc::DEFAULT_NAIVE_CELL_THRESHOLD)]
    threshold: usize,

    #[clap(flatten)]
    verbose: clap_verbosity_flag::Verbosity,
}

fn main() -> Result<()> {
    let cli: Cli = Cli::parse();
    env_logger::Builder::new()
        .filter_level(cli.verbose.log_level_filter())
        .init();
    convolve(&cli)
}

fn convolve(cli: &Cli) -> Result<()> {
    let kernel = create_kernel(cli)?;
    debug!(
        "Use kernel {}x{} with {} weights",
        kernel.width(),
        kernel.height(),
        kernel.cell_count()
    );
    let config = convolution_config(cli, kernel);
    debug!("Selected algorithm: {:?}", config.selected_algorithm());
    let convolver = fc::Convolver::new(config);

    let source = open_source_image(cli)?;
    let result = if source.color().has_alpha() {
        let planes = convolve_planes(cli, &convolver, &source.to_rgba32f(), 3)?;
        DynamicImage::ImageRgba32F(
            fc::merge_channels::<image::Rgba<f32>>(&planes)
                .with_context(|| "Failed to merge channels")?,
        )
    } else {
        let planes = convolve_planes(cli, &convolver, &source.to_rgb32f(), 3)?;
        DynamicImage::ImageRgb32F(
            fc::merge_channels::<image::Rgb<f32>>(&planes)
                .with_context(|| "Failed to merge channels")?,
        )
    };

    save_result(cli, result)
}

fn create_kernel(cli: &Cli) -> Result<fc::Kernel> {
    match (cli.sigma, cli.box_size) {
        (Some(sigma), _) => {
            fc::Kernel::gaussian(sigma).with_context(|| "Failed to create gaussian kernel")
        }
        (None, Some(size)) => {
            fc::Kernel::box_filter(size).with_context(|| "Failed to create box kernel")
        }
        (None, None) => Err(anyhow!("Kernel is not specified")),
    }
}

fn convolution_config(cli: &Cli, kernel: fc::Kernel) -> fc::ConvolutionConfig {
    fc::ConvolutionConfig::new(kernel)
        .algorithm(structs::convolution_alg(cli.algorithm, cli.multiply))
        .allow_spectral(!cli.no_spectral)
        .naive_cell_threshold(cli.threshold)
}

fn open_source_image(cli: &Cli) -> Result<DynamicImage> {
    let source_path = &cli.source_path;
    debug!("Opening the source image {:?}", source_path);
    ImageReader::open(source_path)
        .with_context(|| format!("Failed to read source file from {:?}", source_path))?
        .decode()
        .with_context(|| "Failed to decode source image")
}

/// Convolves first `count` channels of the image, other channels
/// (alpha) are kept as is.
fn convolve_planes<P>(
    cli: &Cli,
    convolver: &fc::Convolver,
    image: &image::ImageBuffer<P, Vec<f32>>,
    count: usize,
) -> Result<Vec<fc::Image>>
where
    P: image::Pixel<Subpixel = f32>,
{
    let mut planes = fc::split_channels(image).with_context(|| "Failed to split channels")?;
    for (i, plane) in planes.iter_mut().take(count).enumerate() {
        debug!("Convolve channel {}", i);
        if cli.high_pass {
            let low = convolver
                .convolve(plane)
                .with_context(|| "Failed to convolve image")?;
            high_pass(plane, &low, convolver.config().kernel())?;
        } else {
            convolver
                .process(plane)
                .with_context(|| "Failed to convolve image")?;
        }
    }
    Ok(planes)
}

/// Subtracts low frequencies from the plane. Pixels of the zeroed
/// border of low-pass result are set to zero too.
fn high_pass(plane: &mut fc::Image, low: &fc::Image, kernel: &fc::Kernel) -> Result<()> {
    let mut high = low.clone();
    for (dst, (&src, &low)) in high
        .pixels_mut()
        .iter_mut()
        .zip(plane.pixels().iter().zip(low.pixels()))
    {
        // Shift to the middle of the range to make negative values visible
        *dst = src - low + 0.5;
    }
    fc::apply_zero_border(&mut high, kernel);
    plane
        .replace_pixels(high)
        .with_context(|| "Failed to subtract low frequencies")?;
    Ok(())
}

fn save_result(cli: &Cli, image: DynamicImage) -> Result<()> {
    let result_path = if let Some(path) = cli.destination_path.clone() {
        path
    } else {
        let mut path = PathBuf::from("./");
        let ext = cli
            .source_path
            .extension()
            .unwrap_or_else(|| OsStr::new("png"));
        path.push("result");
        path.set_extension(ext);
        path
    };
    if result_path.exists() && !cli.overwrite {
        return Err(anyhow!(
            "Destination path {:?} already exists.",
            result_path
        ));
    };

    debug!("Save the result image into the file {:?}", result_path);
    let image = if image.color().has_alpha() {
        DynamicImage::ImageRgba8(image.to_rgba8())
    } else {
        DynamicImage::ImageRgb8(image.to_rgb8())
    };
    image
        .save(&result_path)
        .with_context(|| "Failed to save the result image")?;
    Ok(())
}
