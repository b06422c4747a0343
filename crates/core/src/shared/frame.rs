use ndarray::ArrayView3;

/// A single captured frame: contiguous row-major bytes, 8-bit channels,
/// 3 (RGB) or 4 (RGBA) channels per pixel.
///
/// Owned exclusively by the orchestrator for one loop iteration; classifiers
/// and backends only ever see `&Frame` and never mutate pixel data.
#[derive(Clone, Debug)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    channels: u8,
    index: usize,
    timestamp_ms: f64,
}

impl Frame {
    pub fn new(
        data: Vec<u8>,
        width: u32,
        height: u32,
        channels: u8,
        index: usize,
        timestamp_ms: f64,
    ) -> Self {
        debug_assert!(
            channels == 3 || channels == 4,
            "channels must be 3 (RGB) or 4 (RGBA)"
        );
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * (channels as usize),
            "data length must equal width * height * channels"
        );
        Self {
            data,
            width,
            height,
            channels,
            index,
            timestamp_ms,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn timestamp_ms(&self) -> f64 {
        self.timestamp_ms
    }

    pub fn pixel_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// RGB triple at (x, y). The alpha channel of RGBA frames is ignored.
    ///
    /// Callers must stay in bounds; classifiers iterate frame dimensions.
    pub fn rgb(&self, x: u32, y: u32) -> (u8, u8, u8) {
        debug_assert!(x < self.width && y < self.height);
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * (self.channels as usize);
        (self.data[i], self.data[i + 1], self.data[i + 2])
    }

    pub fn as_ndarray(&self) -> ArrayView3<'_, u8> {
        ArrayView3::from_shape(self.shape(), &self.data)
            .expect("Frame data length must match dimensions")
    }

    fn shape(&self) -> (usize, usize, usize) {
        (
            self.height as usize,
            self.width as usize,
            self.channels as usize,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_construction_and_accessors() {
        let data = vec![0u8; 12]; // 2x2x3
        let frame = Frame::new(data.clone(), 2, 2, 3, 5, 166.7);
        assert_eq!(frame.width(), 2);
        assert_eq!(frame.height(), 2);
        assert_eq!(frame.channels(), 3);
        assert_eq!(frame.index(), 5);
        assert_eq!(frame.pixel_count(), 4);
        assert!((frame.timestamp_ms() - 166.7).abs() < f64::EPSILON);
        assert_eq!(frame.data(), &data[..]);
    }

    #[test]
    fn test_rgb_reads_rgb_frame() {
        // 2x1 RGB: second pixel red
        let data = vec![0, 0, 0, 255, 10, 20];
        let frame = Frame::new(data, 2, 1, 3, 0, 0.0);
        assert_eq!(frame.rgb(0, 0), (0, 0, 0));
        assert_eq!(frame.rgb(1, 0), (255, 10, 20));
    }

    #[test]
    fn test_rgb_skips_alpha_on_rgba_frame() {
        // 1x2 RGBA
        let data = vec![1, 2, 3, 255, 4, 5, 6, 128];
        let frame = Frame::new(data, 1, 2, 4, 0, 0.0);
        assert_eq!(frame.rgb(0, 0), (1, 2, 3));
        assert_eq!(frame.rgb(0, 1), (4, 5, 6));
    }

    #[test]
    fn test_as_ndarray_shape() {
        let data = vec![0u8; 24]; // 2x4x3
        let frame = Frame::new(data, 4, 2, 3, 0, 0.0);
        let arr = frame.as_ndarray();
        assert_eq!(arr.shape(), &[2, 4, 3]); // (height, width, channels)
    }

    #[test]
    fn test_as_ndarray_pixel_access() {
        // 2x2 RGB: set pixel (row=1, col=0) to red
        let mut data = vec![0u8; 12];
        data[6] = 255; // row=1, col=0, R
        let frame = Frame::new(data, 2, 2, 3, 0, 0.0);
        let arr = frame.as_ndarray();
        assert_eq!(arr[[1, 0, 0]], 255);
        assert_eq!(arr[[1, 0, 1]], 0);
    }

    #[test]
    #[should_panic(expected = "data length must equal width * height * channels")]
    fn test_mismatched_data_length_panics_in_debug() {
        let data = vec![0u8; 10]; // wrong size for 2x2x3
        Frame::new(data, 2, 2, 3, 0, 0.0);
    }

    #[test]
    fn test_clone_is_independent() {
        let frame = Frame::new(vec![100u8; 12], 2, 2, 3, 0, 0.0);
        let cloned = frame.clone();
        assert_eq!(frame.data(), cloned.data());
    }
}
