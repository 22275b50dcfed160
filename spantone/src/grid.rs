//! The in-memory pixel grid the quantization pipeline reads and rewrites

use crate::Error;
use image::RgbImage;
use palette::Srgb;

/// A row-major grid of sRGB pixels with nonzero dimensions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelGrid {
	/// The width in pixels
	width: u32,
	/// The height in pixels
	height: u32,
	/// The pixels in row-major order, `width * height` of them
	pixels: Vec<Srgb<u8>>,
}

impl PixelGrid {
	/// Create a grid from row-major pixels
	///
	/// # Errors
	///
	/// Returns [`Error::EmptyImage`] if `width` or `height` is zero,
	/// or [`Error::DimensionMismatch`] if `pixels` does not hold exactly
	/// `width * height` entries.
	pub fn from_pixels(width: u32, height: u32, pixels: Vec<Srgb<u8>>) -> Result<Self, Error> {
		if width == 0 || height == 0 {
			return Err(Error::EmptyImage);
		}

		let len = pixels.len();
		if len != (width as usize) * (height as usize) {
			return Err(Error::DimensionMismatch { len, width, height });
		}

		Ok(Self { width, height, pixels })
	}

	/// Create a grid by viewing a decoded RGB image as sRGB pixels
	///
	/// # Errors
	///
	/// Returns [`Error::EmptyImage`] if the image has a zero width or height.
	pub fn from_image(image: &RgbImage) -> Result<Self, Error> {
		let pixels: &[Srgb<u8>] = palette::cast::from_component_slice(image.as_raw());
		Self::from_pixels(image.width(), image.height(), pixels.to_vec())
	}

	/// The width in pixels
	#[must_use]
	pub const fn width(&self) -> u32 {
		self.width
	}

	/// The height in pixels
	#[must_use]
	pub const fn height(&self) -> u32 {
		self.height
	}

	/// The color at column `x` of row `y`
	///
	/// # Panics
	///
	/// Panics if `x >= width` or `y >= height`.
	#[must_use]
	pub fn get(&self, x: u32, y: u32) -> Srgb<u8> {
		assert!(x < self.width && y < self.height);
		self.pixels[self.offset(x, y)]
	}

	/// Replace the color at column `x` of row `y`
	///
	/// # Panics
	///
	/// Panics if `x >= width` or `y >= height`.
	pub fn set(&mut self, x: u32, y: u32, color: Srgb<u8>) {
		assert!(x < self.width && y < self.height);
		let offset = self.offset(x, y);
		self.pixels[offset] = color;
	}

	/// The pixels in row-major order
	#[must_use]
	pub fn pixels(&self) -> &[Srgb<u8>] {
		&self.pixels
	}

	/// The pixels in row-major order, mutably
	pub fn pixels_mut(&mut self) -> &mut [Srgb<u8>] {
		&mut self.pixels
	}

	/// Convert the grid back into an RGB image buffer for encoding
	#[must_use]
	pub fn into_image(self) -> RgbImage {
		let components = palette::cast::into_component_slice(self.pixels.as_slice()).to_vec();
		RgbImage::from_raw(self.width, self.height, components)
			.unwrap_or_else(|| unreachable!("the pixel buffer matches the grid dimensions"))
	}

	/// The row-major offset of the cell at `(x, y)`
	fn offset(&self, x: u32, y: u32) -> usize {
		(y as usize) * (self.width as usize) + (x as usize)
	}
}
