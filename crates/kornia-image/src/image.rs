use crate::error::ImageError;

/// Image size in pixels
///
/// A struct to represent the size of an image in pixels.
///
/// # Examples
///
/// ```
/// use kornia_image::ImageSize;
///
/// let image_size = ImageSize {
///   width: 10,
///   height: 20,
/// };
///
/// assert_eq!(image_size.width, 10);
/// assert_eq!(image_size.height, 20);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageSize {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
}

impl ImageSize {
    /// Number of pixels covered by the image.
    #[inline]
    pub fn num_pixels(&self) -> usize {
        self.width * self.height
    }
}

impl std::fmt::Display for ImageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "ImageSize {{ width: {}, height: {} }}",
            self.width, self.height
        )
    }
}

impl From<[usize; 2]> for ImageSize {
    fn from(size: [usize; 2]) -> Self {
        ImageSize {
            width: size[0],
            height: size[1],
        }
    }
}

/// Represents an image with pixel data.
///
/// The pixels are stored row-major with interleaved channels, i.e. the layout
/// of an array with shape (H, W, C).
#[derive(Clone, Debug, PartialEq)]
pub struct Image<T, const CHANNELS: usize> {
    size: ImageSize,
    data: Vec<T>,
}

impl<T, const CHANNELS: usize> Image<T, CHANNELS> {
    /// Create a new image from pixel data.
    ///
    /// # Arguments
    ///
    /// * `size` - The size of the image in pixels.
    /// * `data` - The pixel data of the image.
    ///
    /// # Errors
    ///
    /// If the length of the pixel data does not match the image size, an error is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use kornia_image::{Image, ImageSize};
    ///
    /// let image = Image::<f32, 2>::new(
    ///    ImageSize {
    ///       width: 10,
    ///       height: 20,
    ///    },
    ///    vec![0f32; 10 * 20 * 2],
    /// ).unwrap();
    ///
    /// assert_eq!(image.size().width, 10);
    /// assert_eq!(image.size().height, 20);
    /// assert_eq!(image.num_channels(), 2);
    /// ```
    pub fn new(size: ImageSize, data: Vec<T>) -> Result<Self, ImageError> {
        if data.len() != size.num_pixels() * CHANNELS {
            return Err(ImageError::InvalidChannelShape(
                data.len(),
                size.num_pixels() * CHANNELS,
            ));
        }

        Ok(Self { size, data })
    }

    /// Create a new image with the given size and default pixel data.
    ///
    /// # Examples
    ///
    /// ```
    /// use kornia_image::{Image, ImageSize};
    ///
    /// let depth = Image::<f32, 1>::from_size_val(
    ///   ImageSize {
    ///     width: 4,
    ///     height: 3,
    ///   }, 10.0).unwrap();
    ///
    /// assert_eq!(depth.as_slice().len(), 12);
    /// ```
    pub fn from_size_val(size: ImageSize, val: T) -> Result<Self, ImageError>
    where
        T: Clone,
    {
        Image::new(size, vec![val; size.num_pixels() * CHANNELS])
    }

    /// Create a new image evaluating `f(x, y)` for every pixel.
    pub fn from_fn(size: ImageSize, mut f: impl FnMut(usize, usize) -> [T; CHANNELS]) -> Self {
        let mut data = Vec::with_capacity(size.num_pixels() * CHANNELS);
        for y in 0..size.height {
            for x in 0..size.width {
                data.extend(f(x, y));
            }
        }
        Self { size, data }
    }

    /// Get the size of the image in pixels.
    #[inline]
    pub fn size(&self) -> ImageSize {
        self.size
    }

    /// Get the number of columns of the image.
    #[inline]
    pub fn cols(&self) -> usize {
        self.size.width
    }

    /// Get the number of rows of the image.
    #[inline]
    pub fn rows(&self) -> usize {
        self.size.height
    }

    /// Get the width of the image in pixels.
    #[inline]
    pub fn width(&self) -> usize {
        self.size.width
    }

    /// Get the height of the image in pixels.
    #[inline]
    pub fn height(&self) -> usize {
        self.size.height
    }

    /// Get the number of channels in the image.
    #[inline]
    pub fn num_channels(&self) -> usize {
        CHANNELS
    }

    /// Total number of elements, i.e. pixels times channels.
    #[inline]
    pub fn numel(&self) -> usize {
        self.data.len()
    }

    /// Get the pixel data as a flat slice.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Get the pixel data as a mutable flat slice.
    #[inline]
    pub fn as_slice_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Consume the image and return its pixel data.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Get the value at (x, y, ch).
    ///
    /// # Errors
    ///
    /// Returns an error if the coordinates or the channel are out of bounds.
    pub fn get_pixel(&self, x: usize, y: usize, ch: usize) -> Result<T, ImageError>
    where
        T: Copy,
    {
        if x >= self.width() || y >= self.height() {
            return Err(ImageError::PixelIndexOutOfBounds(
                x,
                y,
                self.width(),
                self.height(),
            ));
        }

        if ch >= CHANNELS {
            return Err(ImageError::ChannelIndexOutOfBounds(ch, CHANNELS));
        }

        Ok(self.data[(y * self.width() + x) * CHANNELS + ch])
    }

    /// Set the value at (x, y, ch).
    ///
    /// # Errors
    ///
    /// Returns an error if the coordinates or the channel are out of bounds.
    pub fn set_pixel(&mut self, x: usize, y: usize, ch: usize, val: T) -> Result<(), ImageError> {
        if x >= self.width() || y >= self.height() {
            return Err(ImageError::PixelIndexOutOfBounds(
                x,
                y,
                self.width(),
                self.height(),
            ));
        }

        if ch >= CHANNELS {
            return Err(ImageError::ChannelIndexOutOfBounds(ch, CHANNELS));
        }

        let idx = (y * self.width() + x) * CHANNELS + ch;
        self.data[idx] = val;

        Ok(())
    }

    /// Get a channel of the image.
    ///
    /// # Errors
    ///
    /// If the channel index is out of bounds, an error is returned.
    pub fn channel(&self, channel: usize) -> Result<Image<T, 1>, ImageError>
    where
        T: Copy,
    {
        if channel >= CHANNELS {
            return Err(ImageError::ChannelIndexOutOfBounds(channel, CHANNELS));
        }

        let channel_data = self
            .data
            .chunks_exact(CHANNELS)
            .map(|pixel| pixel[channel])
            .collect();

        Image::new(self.size, channel_data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_size() {
        let image_size = ImageSize {
            width: 10,
            height: 20,
        };
        assert_eq!(image_size.width, 10);
        assert_eq!(image_size.height, 20);
        assert_eq!(image_size.num_pixels(), 200);
    }

    #[test]
    fn image_wrong_data_length() {
        let res = Image::<f32, 2>::new(
            ImageSize {
                width: 3,
                height: 2,
            },
            vec![0.0; 6],
        );
        assert_eq!(res, Err(ImageError::InvalidChannelShape(6, 12)));
    }

    #[test]
    fn image_from_fn_layout() -> Result<(), ImageError> {
        let image = Image::<usize, 2>::from_fn(
            ImageSize {
                width: 3,
                height: 2,
            },
            |x, y| [x, y],
        );
        assert_eq!(image.as_slice(), &[0, 0, 1, 0, 2, 0, 0, 1, 1, 1, 2, 1]);
        assert_eq!(image.get_pixel(2, 1, 0)?, 2);
        assert_eq!(image.get_pixel(2, 1, 1)?, 1);
        Ok(())
    }

    #[test]
    fn image_pixel_access() -> Result<(), ImageError> {
        let mut image = Image::<f32, 1>::from_size_val([4, 3].into(), 0.0)?;
        image.set_pixel(3, 2, 0, 5.0)?;
        assert_eq!(image.get_pixel(3, 2, 0)?, 5.0);
        assert_eq!(image.as_slice()[11], 5.0);
        assert_eq!(
            image.get_pixel(4, 0, 0),
            Err(ImageError::PixelIndexOutOfBounds(4, 0, 4, 3))
        );
        assert_eq!(
            image.get_pixel(0, 0, 1),
            Err(ImageError::ChannelIndexOutOfBounds(1, 1))
        );
        Ok(())
    }

    #[test]
    fn image_channel() -> Result<(), ImageError> {
        let image = Image::<f32, 2>::new([2, 1].into(), vec![1.0, 2.0, 3.0, 4.0])?;
        let c1 = image.channel(1)?;
        assert_eq!(c1.as_slice(), &[2.0, 4.0]);
        assert_eq!(c1.size(), image.size());
        assert!(image.channel(2).is_err());
        Ok(())
    }

    #[test]
    fn image_mutable_data() -> Result<(), ImageError> {
        let mut image = Image::<u8, 1>::from_size_val([3, 1].into(), 1)?;
        image.as_slice_mut()[1] = 7;
        assert_eq!(image.get_pixel(1, 0, 0)?, 7);
        assert_eq!(image.into_vec(), vec![1, 7, 1]);
        Ok(())
    }
}
