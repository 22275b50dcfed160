//! Specifies the CLI and handles arg parsing

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Supported output formats for the palette colors
#[derive(Copy, Clone, ValueEnum)]
pub enum FormatOutput {
	/// sRGB hexcode
	Hex,
	/// sRGB (r,g,b) triple
	Rgb,
	/// Whitespace with true color background
	Swatch,
}

/// Ways to colorize the output text
#[derive(Copy, Clone, ValueEnum)]
pub enum ColorizeOutput {
	/// Foreground
	Fg,
	/// Background
	Bg,
}

/// Reduce an image to a palette of k colors by cutting the minimum spanning tree of its distinct colors.
///
/// The palette is printed in the chosen format, and the quantized image itself
/// can be written back out with --save.
#[derive(Parser)]
#[command(version)]
pub struct Options {
	/// The path to the input image
	pub image: PathBuf,

	/// The number of colors to reduce the image to
	///
	/// Must be between 1 and the number of distinct colors in the image.
	#[arg(short, default_value_t = 8)]
	pub k: u32,

	/// Write the quantized image to the given path
	///
	/// The format is deduced from the file extension.
	#[arg(short, long)]
	pub save: Option<PathBuf>,

	/// The format to print the colors in
	#[arg(short, long, default_value = "hex")]
	pub output: FormatOutput,

	/// Color the foreground or background for each printed color
	#[arg(short, long)]
	pub colorize: Option<ColorizeOutput>,

	/// Blur the image with a gaussian filter of this standard deviation before quantizing
	///
	/// Tree construction is quadratic in the number of distinct colors,
	/// so a slight blur can cut the running time on photographs dramatically
	/// by merging speckled colors into their surroundings.
	/// Values around 0.5 to 2.0 are sensible; the option is off by default.
	#[arg(long, value_parser = parse_valid_sigma)]
	pub smooth_sigma: Option<f64>,

	/// The diameter, in pixels, of the gaussian filter used by --smooth-sigma
	///
	/// Even diameters are widened by one so that the filter stays centered.
	#[arg(long, default_value_t = 5)]
	pub smooth_size: usize,

	/// Print additional information, such as the distinct color count and the tree weight
	#[arg(long)]
	pub verbose: bool,

	/// The number of threads to use
	///
	/// A value of 0 uses one thread per logical core.
	#[cfg(feature = "threads")]
	#[arg(long, default_value_t = 0)]
	pub threads: u8,
}

/// Parse the smoothing sigma and ensure it is positive
fn parse_valid_sigma(s: &str) -> Result<f64, String> {
	let value: f64 = s.parse().map_err(|e| format!("{e}"))?;
	if value > 0.0 {
		Ok(value)
	} else {
		Err(format!("{value} is not a positive sigma"))
	}
}
