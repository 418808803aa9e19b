use crate::Error;

/// Owned raster, rows packed top to bottom.
#[derive(Debug, Clone, PartialEq)]
pub struct Image<T> {
    width: usize,
    height: usize,
    pixels: Vec<T>,
}

impl<T> Image<T> {
    pub fn from_vec(width: usize, height: usize, pixels: Vec<T>) -> Result<Self, Error> {
        check_len(width, height, pixels.len())?;
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Evaluates `f(x, y)` for every pixel in raster order.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut pixels = Vec::with_capacity(width.saturating_mul(height));
        for y in 0..height {
            pixels.extend((0..width).map(|x| f(x, y)));
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn dims(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn data(&self) -> &[T] {
        &self.pixels
    }

    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.pixels
    }

    pub fn into_vec(self) -> Vec<T> {
        self.pixels
    }

    pub fn get(&self, x: usize, y: usize) -> Option<&T> {
        self.as_view().get(x, y)
    }

    pub fn get_mut(&mut self, x: usize, y: usize) -> Option<&mut T> {
        if x >= self.width {
            return None;
        }
        self.pixels.get_mut(y * self.width + x)
    }

    pub fn as_view(&self) -> ImageView<'_, T> {
        ImageView {
            width: self.width,
            height: self.height,
            pixels: &self.pixels,
        }
    }

    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> Image<U> {
        Image {
            width: self.width,
            height: self.height,
            pixels: self.pixels.iter().map(f).collect(),
        }
    }
}

impl<T: Clone> Image<T> {
    pub fn new_fill(width: usize, height: usize, value: T) -> Self {
        Self {
            width,
            height,
            pixels: vec![value; width.saturating_mul(height)],
        }
    }
}

/// Borrowed raster with the same packed layout as [`Image`]: pixel `(x, y)`
/// is element `y * width + x`.
#[derive(Debug)]
pub struct ImageView<'a, T> {
    width: usize,
    height: usize,
    pixels: &'a [T],
}

impl<T> Clone for ImageView<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ImageView<'_, T> {}

impl<'a, T> ImageView<'a, T> {
    /// Wraps a foreign buffer, e.g. the raw pixels of a decoded image.
    pub fn new(width: usize, height: usize, pixels: &'a [T]) -> Result<Self, Error> {
        check_len(width, height, pixels.len())?;
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn dims(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn pixels(&self) -> &'a [T] {
        self.pixels
    }

    /// Row `y`. Panics when `y >= height`.
    pub fn row(&self, y: usize) -> &'a [T] {
        let start = y * self.width;
        &self.pixels[start..start + self.width]
    }

    pub fn get(&self, x: usize, y: usize) -> Option<&'a T> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(y * self.width + x)
    }

    /// [`get`](Self::get) for signed coordinates; anything off the canvas is
    /// `None`.
    pub fn get_signed(&self, x: isize, y: isize) -> Option<&'a T> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        self.get(x, y)
    }
}

impl<T: Clone> ImageView<'_, T> {
    pub fn to_image(&self) -> Image<T> {
        Image {
            width: self.width,
            height: self.height,
            pixels: self.pixels.to_vec(),
        }
    }
}

/// Fails with [`Error::DimensionMismatch`] unless both sizes agree.
///
/// Stages call this where two masks must describe the same canvas; a failure
/// is a programming fault, never a property of the input image.
pub fn ensure_same_dims(expected: (usize, usize), actual: (usize, usize)) -> Result<(), Error> {
    if expected != actual {
        return Err(Error::DimensionMismatch { expected, actual });
    }
    Ok(())
}

fn check_len(width: usize, height: usize, len: usize) -> Result<(), Error> {
    let needed = width
        .checked_mul(height)
        .ok_or(Error::TooLarge { width, height })?;
    if needed != len {
        return Err(Error::BufferLength { width, height, len });
    }
    Ok(())
}
