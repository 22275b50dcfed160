//! Reduce an image to a palette of k colors by cutting the minimum spanning tree of its distinct colors.

#![deny(unsafe_code, unsafe_op_in_unsafe_fn)]
#![warn(
	clippy::pedantic,
	clippy::cargo,
	clippy::use_debug,
	clippy::dbg_macro,
	clippy::todo,
	clippy::unimplemented,
	clippy::unwrap_used,
	clippy::unwrap_in_result,
	clippy::unneeded_field_pattern,
	clippy::rest_pat_in_fully_bound_structs,
	clippy::unnecessary_self_imports,
	clippy::str_to_string,
	clippy::string_to_string,
	clippy::string_slice,
	missing_docs,
	clippy::missing_docs_in_private_items,
	rustdoc::all,
	clippy::float_cmp_const,
	clippy::lossy_float_literal
)]
#![allow(clippy::doc_markdown, clippy::module_name_repetitions, clippy::missing_panics_doc)]

mod cli;

#[allow(clippy::wildcard_imports)]
use cli::*;

use std::{
	fmt::{self, Display},
	path::Path,
	process::ExitCode,
	time::Instant,
};

use clap::Parser;
use colored::Colorize;
use image::DynamicImage;
use palette::Srgb;
use spantone::{Palette, PixelGrid};

/// Record the running time of a function and print the elapsed time
macro_rules! time {
	($name: literal, $verbose: expr, $func_call: expr) => {{
		let start = Instant::now();
		let result = $func_call;
		if $verbose {
			println!("{} took {}ms", $name, start.elapsed().as_millis());
		}
		result
	}};
}

/// Error cases for the quantization pipeline
#[derive(Debug)]
enum CliError {
	/// Failed to read or decode the image file
	ImageLoad(image::ImageError),
	/// Failed to encode or write the quantized image
	ImageSave(image::ImageError),
	/// The image could not be reduced to the requested palette
	Quantize(spantone::Error),
}

impl Display for CliError {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			CliError::ImageLoad(e) => write!(f, "Failed to load the image file: {e}"),
			CliError::ImageSave(e) => write!(f, "Failed to save the quantized image: {e}"),
			CliError::Quantize(e) => write!(f, "Failed to quantize the image: {e}"),
		}
	}
}

fn main() -> ExitCode {
	let options = Options::parse();

	let result = run_quantize_and_print_palette(&options);

	// Returning Result<_> uses Debug printing instead of Display
	if let Err(e) = result {
		eprintln!("{e}");
		ExitCode::FAILURE
	} else {
		ExitCode::SUCCESS
	}
}

/// Builds a thread pool and then runs `quantize_and_print_palette`
#[cfg(feature = "threads")]
fn run_quantize_and_print_palette(options: &Options) -> Result<(), CliError> {
	let pool = rayon::ThreadPoolBuilder::new()
		.num_threads(usize::from(options.threads))
		.build()
		.expect("initialized thread pool");

	pool.install(|| quantize_and_print_palette(options))
}

/// Runs `quantize_and_print_palette` on a single thread
#[cfg(not(feature = "threads"))]
fn run_quantize_and_print_palette(options: &Options) -> Result<(), CliError> {
	quantize_and_print_palette(options)
}

/// Load an image, reduce it to k colors, and print the palette using the given options
fn quantize_and_print_palette(options: &Options) -> Result<(), CliError> {
	// Input
	let img = time!("Image loading", options.verbose, load_image(&options.image))?;
	let mut grid = PixelGrid::from_image(&img.into_rgb8()).map_err(CliError::Quantize)?;

	// Processing
	if let Some(sigma) = options.smooth_sigma {
		grid = time!(
			"Smoothing",
			options.verbose,
			spantone::gaussian_smooth(&grid, options.smooth_size, sigma)
		);
	}

	let palette = quantize_grid(&mut grid, options)?;

	// Output
	if let Some(path) = &options.save {
		time!("Image saving", options.verbose, grid.into_image().save(path)).map_err(CliError::ImageSave)?;
	}

	print_palette(&palette, options);

	Ok(())
}

/// Load the image at the given path
fn load_image(path: &Path) -> Result<DynamicImage, CliError> {
	image::open(path).map_err(CliError::ImageLoad)
}

/// Build the spanning tree over the grid's colors, cut it into k clusters, and remap the grid
fn quantize_grid(grid: &mut PixelGrid, options: &Options) -> Result<Palette, CliError> {
	let verbose = options.verbose;

	let mst = time!("Tree construction", verbose, spantone::build_mst(grid)).map_err(CliError::Quantize)?;
	if verbose {
		println!(
			"Spanned {} distinct colors with total weight {:.2}",
			mst.num_colors(),
			mst.total_weight
		);
	}

	let palette =
		time!("Palette extraction", verbose, spantone::extract_palette(&mst, options.k)).map_err(CliError::Quantize)?;

	time!("Remapping", verbose, spantone::quantize(grid, &palette));

	Ok(palette)
}

/// Print one line of palette representatives based off the provided options
///
/// Swatches carry their color themselves, so --colorize only applies to the
/// hex and rgb formats.
fn print_palette(palette: &Palette, options: &Options) {
	let entries: Vec<String> = match options.output {
		FormatOutput::Hex => palette
			.representatives()
			.map(|color| colorized(format!("{color:X}"), color, options.colorize))
			.collect(),

		FormatOutput::Rgb => palette
			.representatives()
			.map(|color| colorized(format!("({},{},{})", color.red, color.green, color.blue), color, options.colorize))
			.collect(),

		FormatOutput::Swatch => palette
			.representatives()
			.map(|color| "   ".on_truecolor(color.red, color.green, color.blue).to_string())
			.collect(),
	};

	let delimiter = match options.output {
		FormatOutput::Hex | FormatOutput::Rgb => " ",
		FormatOutput::Swatch => "",
	};

	println!("{}", entries.join(delimiter));
}

/// Wrap one color's formatted text in the chosen colorize mode
fn colorized(text: String, color: Srgb<u8>, mode: Option<ColorizeOutput>) -> String {
	match mode {
		Some(ColorizeOutput::Fg) => text.truecolor(color.red, color.green, color.blue).to_string(),
		Some(ColorizeOutput::Bg) => text.on_truecolor(color.red, color.green, color.blue).to_string(),
		None => text,
	}
}
