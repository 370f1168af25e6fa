use image::{imageops, Rgba, Rgba32FImage, RgbaImage};

use super::FilterSettings;

/// One stage of the composed filter transform. Percent stages carry the raw percentage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterStep {
    Brightness(f32),
    Contrast(f32),
    Saturate(f32),
    Blur(f32),
    Grayscale(f32),
}

impl FilterStep {
    pub fn is_identity(&self) -> bool {
        match *self {
            Self::Brightness(value) | Self::Contrast(value) | Self::Saturate(value) => {
                value == 100.0
            }
            Self::Blur(radius) => radius <= 0.0,
            Self::Grayscale(amount) => amount <= 0.0,
        }
    }

    fn color_op(&self) -> Option<ColorOp> {
        match *self {
            Self::Brightness(value) => Some(ColorOp::Scale(value / 100.0)),
            Self::Contrast(value) => Some(ColorOp::Contrast(value / 100.0)),
            Self::Saturate(value) => Some(ColorOp::Matrix(saturate_matrix(value / 100.0))),
            Self::Grayscale(value) => Some(ColorOp::Matrix(grayscale_matrix(value / 100.0))),
            Self::Blur(_) => None,
        }
    }
}

impl std::fmt::Display for FilterStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Brightness(value) => write!(f, "brightness({value}%)"),
            Self::Contrast(value) => write!(f, "contrast({value}%)"),
            Self::Saturate(value) => write!(f, "saturate({value}%)"),
            Self::Blur(radius) => write!(f, "blur({radius}px)"),
            Self::Grayscale(value) => write!(f, "grayscale({value}%)"),
        }
    }
}

/// The ordered transform produced by [`render`]: brightness, contrast, saturate, blur, grayscale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterExpression {
    steps: [FilterStep; 5],
}

pub fn render(settings: &FilterSettings) -> FilterExpression {
    FilterExpression {
        steps: [
            FilterStep::Brightness(settings.brightness()),
            FilterStep::Contrast(settings.contrast()),
            FilterStep::Saturate(settings.saturate()),
            FilterStep::Blur(settings.blur()),
            FilterStep::Grayscale(settings.grayscale()),
        ],
    }
}

impl FilterExpression {
    pub fn steps(&self) -> &[FilterStep] {
        &self.steps
    }

    pub fn is_identity(&self) -> bool {
        self.steps.iter().all(FilterStep::is_identity)
    }

    /// Applies every stage in order and returns the filtered copy.
    ///
    /// Consecutive color stages run in floating point without intermediate
    /// quantization; blur is a barrier between them and works on
    /// premultiplied alpha.
    pub fn apply(&self, source: &RgbaImage) -> RgbaImage {
        let mut output = source.clone();
        let mut pending = Vec::with_capacity(self.steps.len());

        for step in self.steps.iter().filter(|step| !step.is_identity()) {
            match (step, step.color_op()) {
                (_, Some(op)) => pending.push(op),
                (FilterStep::Blur(radius), None) => {
                    apply_color_ops(&mut output, &pending);
                    pending.clear();
                    output = blur_premultiplied(&output, *radius);
                }
                _ => {}
            }
        }
        apply_color_ops(&mut output, &pending);
        output
    }
}

impl std::fmt::Display for FilterExpression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (index, step) in self.steps.iter().enumerate() {
            if index > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{step}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
enum ColorOp {
    Scale(f32),
    Contrast(f32),
    Matrix([[f32; 3]; 3]),
}

impl ColorOp {
    fn apply(&self, rgb: [f32; 3]) -> [f32; 3] {
        let out = match self {
            Self::Scale(factor) => rgb.map(|c| c * factor),
            Self::Contrast(factor) => rgb.map(|c| (c - 0.5) * factor + 0.5),
            Self::Matrix(m) => [
                m[0][0] * rgb[0] + m[0][1] * rgb[1] + m[0][2] * rgb[2],
                m[1][0] * rgb[0] + m[1][1] * rgb[1] + m[1][2] * rgb[2],
                m[2][0] * rgb[0] + m[2][1] * rgb[1] + m[2][2] * rgb[2],
            ],
        };
        out.map(|c| c.clamp(0.0, 1.0))
    }
}

fn apply_color_ops(image: &mut RgbaImage, ops: &[ColorOp]) {
    if ops.is_empty() {
        return;
    }
    for pixel in image.pixels_mut() {
        let [r, g, b, a] = pixel.0;
        let mut rgb = [r, g, b].map(|c| f32::from(c) / 255.0);
        for op in ops {
            rgb = op.apply(rgb);
        }
        let [r, g, b] = rgb.map(|c| (c * 255.0).round() as u8);
        pixel.0 = [r, g, b, a];
    }
}

fn blur_premultiplied(image: &RgbaImage, sigma: f32) -> RgbaImage {
    if image.pixels().all(|pixel| pixel.0[3] == u8::MAX) {
        return imageops::blur(image, sigma);
    }

    let mut premultiplied = Rgba32FImage::new(image.width(), image.height());
    for (dst, src) in premultiplied.pixels_mut().zip(image.pixels()) {
        let [r, g, b, a] = src.0.map(|c| f32::from(c) / 255.0);
        *dst = Rgba([r * a, g * a, b * a, a]);
    }

    let blurred = imageops::blur(&premultiplied, sigma);
    let mut output = RgbaImage::new(image.width(), image.height());
    for (dst, src) in output.pixels_mut().zip(blurred.pixels()) {
        let [r, g, b, a] = src.0;
        if a <= f32::EPSILON {
            continue;
        }
        let quantize = |c: f32| (c * 255.0).round().clamp(0.0, 255.0) as u8;
        *dst = Rgba([quantize(r / a), quantize(g / a), quantize(b / a), quantize(a)]);
    }
    output
}

fn saturate_matrix(s: f32) -> [[f32; 3]; 3] {
    [
        [0.213 + 0.787 * s, 0.715 - 0.715 * s, 0.072 - 0.072 * s],
        [0.213 - 0.213 * s, 0.715 + 0.285 * s, 0.072 - 0.072 * s],
        [0.213 - 0.213 * s, 0.715 - 0.715 * s, 0.072 + 0.928 * s],
    ]
}

fn grayscale_matrix(amount: f32) -> [[f32; 3]; 3] {
    let keep = 1.0 - amount.clamp(0.0, 1.0);
    [
        [0.2126 + 0.7874 * keep, 0.7152 - 0.7152 * keep, 0.0722 - 0.0722 * keep],
        [0.2126 - 0.2126 * keep, 0.7152 + 0.2848 * keep, 0.0722 - 0.0722 * keep],
        [0.2126 - 0.2126 * keep, 0.7152 - 0.7152 * keep, 0.0722 + 0.9278 * keep],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{FilterChannel, FilterPreset};
    use image::Rgba;

    fn solid(width: u32, height: u32, rgba: [u8; 4]) -> RgbaImage {
        RgbaImage::from_pixel(width, height, Rgba(rgba))
    }

    #[test]
    fn render_lists_stages_in_fixed_order() {
        let expression = render(&FilterPreset::Soft.settings());
        assert_eq!(
            expression.to_string(),
            "brightness(105%) contrast(90%) saturate(95%) blur(1px) grayscale(0%)"
        );
        assert!(matches!(expression.steps()[3], FilterStep::Blur(r) if r == 1.0));
    }

    #[test]
    fn original_settings_leave_pixels_untouched() {
        let source = solid(4, 4, [12, 200, 90, 255]);
        let expression = render(&FilterSettings::default());
        assert!(expression.is_identity());
        assert_eq!(expression.apply(&source), source);
    }

    #[test]
    fn brightness_scales_each_channel() {
        let settings = FilterSettings::default()
            .with(FilterChannel::Brightness, 50.0)
            .expect("valid");
        let out = render(&settings).apply(&solid(1, 1, [200, 100, 0, 255]));
        assert_eq!(out.get_pixel(0, 0).0, [100, 50, 0, 255]);
    }

    #[test]
    fn zero_contrast_collapses_to_mid_gray() {
        let settings = FilterSettings::default()
            .with(FilterChannel::Contrast, 0.0)
            .expect("valid");
        let out = render(&settings).apply(&solid(1, 1, [10, 240, 30, 77]));
        assert_eq!(out.get_pixel(0, 0).0, [128, 128, 128, 77]);
    }

    #[test]
    fn full_grayscale_equalizes_channels() {
        let settings = FilterSettings::default()
            .with(FilterChannel::Grayscale, 100.0)
            .expect("valid");
        let out = render(&settings).apply(&solid(1, 1, [255, 0, 0, 255]));
        let [r, g, b, a] = out.get_pixel(0, 0).0;
        assert_eq!(r, g);
        assert_eq!(g, b);
        assert_eq!(r, 54);
        assert_eq!(a, 255);
    }

    #[test]
    fn zero_saturation_matches_luma_weights() {
        let settings = FilterSettings::default()
            .with(FilterChannel::Saturate, 0.0)
            .expect("valid");
        let out = render(&settings).apply(&solid(1, 1, [0, 255, 0, 255]));
        let [r, g, b, _] = out.get_pixel(0, 0).0;
        assert_eq!((r, g, b), (182, 182, 182));
    }

    fn edge(value: u8) -> RgbaImage {
        let mut source = solid(9, 1, [0, 0, 0, 255]);
        for x in 5..9 {
            source.put_pixel(x, 0, Rgba([value, value, value, 255]));
        }
        source
    }

    #[test]
    fn brightness_runs_before_blur() {
        let source = edge(200);
        let settings = FilterSettings::new(200.0, 100.0, 100.0, 2.0, 0.0).expect("valid");
        let filtered = render(&settings).apply(&source);

        let mut brightened = source.clone();
        apply_color_ops(&mut brightened, &[ColorOp::Scale(2.0)]);
        assert_eq!(filtered, imageops::blur(&brightened, 2.0));

        // Brightening clamps at 255 before the edge is smeared, so the reversed
        // order gives a visibly brighter ramp.
        let mut reversed = imageops::blur(&source, 2.0);
        apply_color_ops(&mut reversed, &[ColorOp::Scale(2.0)]);
        let forward = filtered.get_pixel(4, 0).0[0];
        let backward = reversed.get_pixel(4, 0).0[0];
        assert!(backward > forward + 20, "forward={forward} reversed={backward}");
    }

    #[test]
    fn blur_runs_before_grayscale() {
        let mut source = solid(9, 1, [0, 0, 0, 255]);
        for x in 5..9 {
            source.put_pixel(x, 0, Rgba([255, 0, 0, 255]));
        }
        let settings = FilterSettings::new(100.0, 100.0, 100.0, 2.0, 100.0).expect("valid");
        let filtered = render(&settings).apply(&source);

        let mut expected = imageops::blur(&source, 2.0);
        apply_color_ops(&mut expected, &[ColorOp::Matrix(grayscale_matrix(1.0))]);
        assert_eq!(filtered, expected);

        // Both stages are linear, so the opposite order only differs by rounding.
        let mut grayed = source.clone();
        apply_color_ops(&mut grayed, &[ColorOp::Matrix(grayscale_matrix(1.0))]);
        let reversed = imageops::blur(&grayed, 2.0);
        for (a, b) in filtered.pixels().zip(reversed.pixels()) {
            for channel in 0..3 {
                assert!(a.0[channel].abs_diff(b.0[channel]) <= 3);
            }
        }
    }

    #[test]
    fn blur_ignores_color_of_transparent_pixels() {
        let mut source = solid(5, 1, [0, 0, 255, 255]);
        for x in 0..2 {
            source.put_pixel(x, 0, Rgba([255, 0, 0, 0]));
        }
        let settings = FilterSettings::default()
            .with(FilterChannel::Blur, 1.0)
            .expect("valid");
        let out = render(&settings).apply(&source);

        let [r, g, b, a] = out.get_pixel(2, 0).0;
        assert_eq!((r, g, b), (0, 0, 255));
        assert!(a > 0 && a < 255);

        let [r, _, b, a] = out.get_pixel(0, 0).0;
        assert_eq!((r, b), (0, 255));
        assert!(a > 0);
    }

    #[test]
    fn blur_preserves_dimensions() {
        let settings = FilterSettings::default()
            .with(FilterChannel::Blur, 10.0)
            .expect("valid");
        let out = render(&settings).apply(&solid(33, 17, [1, 2, 3, 255]));
        assert_eq!(out.dimensions(), (33, 17));
    }
}
