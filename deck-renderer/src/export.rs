//! Slide export to raster images.
//!
//! Renders a [`Slide`] to an SVG intermediate representation, then rasterizes
//! it with resvg/tiny-skia at a fixed oversampling factor and encodes PNG or
//! JPEG.

use std::fmt::Write;

use base64::Engine;
use deck_core::{Element, ElementKind, FontWeight, Slide, TextAlign};
use image::ImageEncoder;

use crate::error::{RenderError, RenderResult};

/// Oversampling applied to exported rasters.
pub const EXPORT_SCALE: f32 = 2.0;

/// JPEG quality used for exports (0.9 on a 0-1 scale).
pub const JPEG_QUALITY: u8 = 90;

/// Line height multiplier for text boxes.
const LINE_HEIGHT: f64 = 1.16;

/// Raster output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RasterFormat {
    /// PNG image.
    #[default]
    Png,
    /// JPEG image.
    Jpeg,
}

impl RasterFormat {
    /// MIME type of the encoded output.
    #[must_use]
    pub fn mime(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }

    /// Conventional file extension.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
        }
    }
}

/// Configuration for slide export.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Slide width in pixels.
    pub width: u32,
    /// Slide height in pixels.
    pub height: u32,
    /// Background color as RGBA bytes.
    pub background: [u8; 4],
    /// JPEG quality 1-100.
    pub jpeg_quality: u8,
    /// Oversampling factor.
    pub scale: f32,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            background: [255, 255, 255, 255],
            jpeg_quality: JPEG_QUALITY,
            scale: EXPORT_SCALE,
        }
    }
}

impl ExportConfig {
    /// Default export settings for a canvas of the given size.
    #[must_use]
    pub fn for_canvas(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }
}

/// Exports a [`Slide`] to raster images.
pub struct SlideExporter {
    config: ExportConfig,
}

impl SlideExporter {
    /// Create a new exporter with the given configuration.
    #[must_use]
    pub fn new(config: ExportConfig) -> Self {
        Self { config }
    }

    /// Create an exporter with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(ExportConfig::default())
    }

    /// The configuration in use.
    #[must_use]
    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Export a slide to the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if the slide cannot be rendered or encoded.
    pub fn export(&self, slide: &Slide, format: RasterFormat) -> RenderResult<Vec<u8>> {
        match format {
            RasterFormat::Png => self.render_to_png(slide),
            RasterFormat::Jpeg => self.render_to_jpeg(slide),
        }
    }

    /// Export a slide as a `data:` URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the slide cannot be rendered or encoded.
    pub fn export_data_url(&self, slide: &Slide, format: RasterFormat) -> RenderResult<String> {
        let bytes = self.export(slide, format)?;
        let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
        Ok(format!("data:{};base64,{encoded}", format.mime()))
    }

    /// Export the slide to PNG bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering or encoding fails.
    pub fn render_to_png(&self, slide: &Slide) -> RenderResult<Vec<u8>> {
        let svg_string = self.render_to_svg(slide);
        let pixmap = Self::rasterize_svg(&svg_string)?;

        pixmap
            .encode_png()
            .map_err(|e| RenderError::Export(format!("PNG encoding failed: {e}")))
    }

    /// Export the slide to JPEG bytes.
    ///
    /// Transparent pixels are composited over the background color.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering or encoding fails.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn render_to_jpeg(&self, slide: &Slide) -> RenderResult<Vec<u8>> {
        let svg_string = self.render_to_svg(slide);
        let pixmap = Self::rasterize_svg(&svg_string)?;

        let (width, height) = (pixmap.width(), pixmap.height());
        let bg = &self.config.background;
        let mut rgb_data = Vec::with_capacity((width * height * 3) as usize);
        for pixel in pixmap.data().chunks_exact(4) {
            let alpha = f32::from(pixel[3]) / 255.0;
            let inv = 1.0 - alpha;
            rgb_data.push((f32::from(pixel[0]).mul_add(alpha, f32::from(bg[0]) * inv)) as u8);
            rgb_data.push((f32::from(pixel[1]).mul_add(alpha, f32::from(bg[1]) * inv)) as u8);
            rgb_data.push((f32::from(pixel[2]).mul_add(alpha, f32::from(bg[2]) * inv)) as u8);
        }

        let mut buf = std::io::Cursor::new(Vec::new());
        let encoder =
            image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buf, self.config.jpeg_quality);
        encoder
            .write_image(&rgb_data, width, height, image::ColorType::Rgb8.into())
            .map_err(|e| RenderError::Export(format!("JPEG encoding failed: {e}")))?;

        Ok(buf.into_inner())
    }

    /// Render the slide to an SVG string.
    ///
    /// Elements are drawn in list order, so later elements paint on top.
    #[must_use]
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn render_to_svg(&self, slide: &Slide) -> String {
        let (view_w, view_h) = (self.config.width.max(1), self.config.height.max(1));
        let scale = self.config.scale.max(0.01);
        let out_w = ((view_w as f32) * scale).round().max(1.0) as u32;
        let out_h = ((view_h as f32) * scale).round().max(1.0) as u32;

        let mut svg = String::with_capacity(4096);
        let _ = write!(
            svg,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{out_w}\" height=\"{out_h}\" viewBox=\"0 0 {view_w} {view_h}\">",
        );

        let bg = &self.config.background;
        let bg_alpha = f32::from(bg[3]) / 255.0;
        let _ = write!(
            svg,
            "<rect width=\"100%\" height=\"100%\" fill=\"rgba({},{},{},{})\"/>",
            bg[0], bg[1], bg[2], bg_alpha,
        );

        for element in slide.elements() {
            render_element_svg(&mut svg, element);
        }

        svg.push_str("</svg>");
        svg
    }

    /// Rasterize an SVG string to a tiny-skia Pixmap.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn rasterize_svg(svg_string: &str) -> RenderResult<tiny_skia::Pixmap> {
        let opt = usvg::Options::default();
        let tree = usvg::Tree::from_str(svg_string, &opt)
            .map_err(|e| RenderError::Export(format!("SVG parsing failed: {e}")))?;

        let px_w = tree.size().width() as u32;
        let px_h = tree.size().height() as u32;

        let mut pixmap = tiny_skia::Pixmap::new(px_w.max(1), px_h.max(1))
            .ok_or_else(|| RenderError::Export("Failed to create pixmap".to_string()))?;

        // The viewBox-to-size scaling is folded into the parsed tree.
        resvg::render(
            &tree,
            tiny_skia::Transform::default(),
            &mut pixmap.as_mut(),
        );

        Ok(pixmap)
    }
}

/// Render a single element to SVG.
fn render_element_svg(svg: &mut String, element: &Element) {
    let _ = write!(
        svg,
        "<g transform=\"rotate({} {} {})\" opacity=\"{}\">",
        element.angle, element.x, element.y, element.opacity,
    );

    match element.kind() {
        ElementKind::Text(style) => {
            if let Some(background) = &style.background_color {
                let _ = write!(
                    svg,
                    "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\"/>",
                    element.x,
                    element.y,
                    element.width,
                    element.height,
                    escape_xml(background),
                );
            }
            let (anchor, text_x) = match style.text_align {
                TextAlign::Left => ("start", element.x),
                TextAlign::Center => ("middle", element.x + element.width / 2.0),
                TextAlign::Right => ("end", element.x + element.width),
            };
            let weight = match style.font_weight {
                FontWeight::Normal => "normal",
                FontWeight::Bold => "bold",
            };
            let _ = write!(
                svg,
                "<text font-size=\"{}\" font-family=\"{}\" font-weight=\"{weight}\" fill=\"{}\" text-anchor=\"{anchor}\">",
                style.font_size,
                escape_xml(&style.font_family),
                escape_xml(&style.fill),
            );
            let line_step = style.font_size * LINE_HEIGHT;
            let mut baseline = element.y + style.font_size;
            for line in style.text.lines() {
                let _ = write!(
                    svg,
                    "<tspan x=\"{text_x}\" y=\"{baseline}\">{}</tspan>",
                    escape_xml(line),
                );
                baseline += line_step;
            }
            svg.push_str("</text>");
        }

        ElementKind::Rectangle(style) => {
            let _ = write!(
                svg,
                "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\"{}/>",
                element.x,
                element.y,
                element.width,
                element.height,
                escape_xml(&style.fill),
                stroke_attrs(style.stroke.as_deref(), style.stroke_width),
            );
        }

        ElementKind::Circle(style) => {
            let radius = element.width.min(element.height) / 2.0;
            let _ = write!(
                svg,
                "<circle cx=\"{}\" cy=\"{}\" r=\"{radius}\" fill=\"{}\"{}/>",
                element.x + radius,
                element.y + radius,
                escape_xml(&style.fill),
                stroke_attrs(style.stroke.as_deref(), style.stroke_width),
            );
        }

        ElementKind::Line(style) => {
            let stroke = style.stroke.as_deref().unwrap_or(&style.fill);
            let _ = write!(
                svg,
                "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"{}\" stroke-width=\"{}\"/>",
                element.x,
                element.y,
                element.x + element.width,
                element.y + element.height,
                escape_xml(stroke),
                style.stroke_width,
            );
        }

        ElementKind::Image(source) => {
            let _ = write!(
                svg,
                "<image x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" preserveAspectRatio=\"none\" href=\"{}\"/>",
                element.x,
                element.y,
                element.width,
                element.height,
                escape_xml(&source.src),
            );
        }
    }

    svg.push_str("</g>");
}

fn stroke_attrs(stroke: Option<&str>, width: f64) -> String {
    match stroke {
        Some(color) if width > 0.0 => {
            format!(" stroke=\"{}\" stroke-width=\"{width}\"", escape_xml(color))
        }
        _ => String::new(),
    }
}

/// Escape special XML characters.
fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
