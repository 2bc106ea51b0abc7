//! SVG backend.

use crate::renderer::{GRID_COLOR, GRID_LINE_WIDTH, Layer, RenderResult, Renderer, Scene};
use floorplan_core::color::SerializableColor;
use floorplan_core::shapes::{Geometry, Paint, Primitive};
use std::fmt::Write;

/// Writes a [`Scene`] as a standalone SVG document sized to the plan.
#[derive(Debug, Default)]
pub struct SvgRenderer {
    output: String,
}

impl SvgRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// The document produced by the last [`Renderer::build_scene`].
    pub fn svg(&self) -> &str {
        &self.output
    }

    pub fn into_svg(self) -> String {
        self.output
    }

    /// Render a scene in one call.
    pub fn render_to_string(scene: &Scene) -> RenderResult<String> {
        let mut renderer = Self::new();
        renderer.build_scene(scene)?;
        Ok(renderer.into_svg())
    }
}

impl Renderer for SvgRenderer {
    fn build_scene(&mut self, scene: &Scene) -> RenderResult<()> {
        let mut out = String::new();
        let (w, h) = (scene.size.width, scene.size.height);
        writeln!(out, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
        writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
        )?;
        writeln!(
            out,
            r#"  <rect width="{w}" height="{h}"{}/>"#,
            color_attr("fill", scene.background)
        )?;

        if !scene.grid.is_empty() {
            writeln!(
                out,
                r#"  <g class="grid" stroke="{}" stroke-width="{GRID_LINE_WIDTH}">"#,
                GRID_COLOR.to_hex()
            )?;
            for line in &scene.grid {
                writeln!(
                    out,
                    r#"    <line x1="{}" y1="{}" x2="{}" y2="{}"/>"#,
                    line.p0.x, line.p0.y, line.p1.x, line.p1.y
                )?;
            }
            writeln!(out, "  </g>")?;
        }

        for layer in &scene.layers {
            write_layer(&mut out, layer)?;
        }
        writeln!(out, "</svg>")?;

        log::debug!("svg: {} layers, {} bytes", scene.layers.len(), out.len());
        self.output = out;
        Ok(())
    }
}

fn write_layer(out: &mut String, layer: &Layer) -> std::fmt::Result {
    let translation = layer.transform.translation();
    let tag = match layer.element_id {
        Some(id) => format!(r#"data-element-id="{id}""#),
        None => r#"class="selection""#.to_string(),
    };
    writeln!(
        out,
        r#"  <g {tag} transform="translate({}, {}) rotate({})">"#,
        translation.x, translation.y, layer.rotation
    )?;
    for primitive in &layer.primitives {
        write_primitive(out, primitive)?;
    }
    writeln!(out, "  </g>")
}

fn write_primitive(out: &mut String, primitive: &Primitive) -> std::fmt::Result {
    let paint = paint_attrs(&primitive.paint);
    match &primitive.geometry {
        Geometry::Rect(rounded) => {
            let rect = rounded.rect();
            let radius = rounded.radii().top_left;
            let rx = if radius > 0.0 { format!(r#" rx="{radius}""#) } else { String::new() };
            writeln!(
                out,
                r#"    <rect x="{}" y="{}" width="{}" height="{}"{rx}{paint}/>"#,
                rect.x0,
                rect.y0,
                rect.width(),
                rect.height()
            )
        }
        Geometry::Ellipse(ellipse) => {
            let center = ellipse.center();
            let radii = ellipse.radii();
            writeln!(
                out,
                r#"    <ellipse cx="{}" cy="{}" rx="{}" ry="{}"{paint}/>"#,
                center.x, center.y, radii.x, radii.y
            )
        }
        Geometry::Circle(circle) => writeln!(
            out,
            r#"    <circle cx="{}" cy="{}" r="{}"{paint}/>"#,
            circle.center.x, circle.center.y, circle.radius
        ),
        Geometry::Line(line) => writeln!(
            out,
            r#"    <line x1="{}" y1="{}" x2="{}" y2="{}"{paint}/>"#,
            line.p0.x, line.p0.y, line.p1.x, line.p1.y
        ),
        Geometry::Path(path) => writeln!(out, r#"    <path d="{}"{paint}/>"#, path.to_svg()),
        Geometry::Text {
            anchor,
            content,
            font_size,
            font_weight,
        } => writeln!(
            out,
            r#"    <text x="{}" y="{}" text-anchor="middle" dominant-baseline="middle" font-size="{font_size}" font-weight="{font_weight}"{paint}>{}</text>"#,
            anchor.x,
            anchor.y,
            escape_xml(content)
        ),
    }
}

fn paint_attrs(paint: &Paint) -> String {
    let mut attrs = match paint.fill {
        Some(fill) => color_attr("fill", fill),
        None => r#" fill="none""#.to_string(),
    };
    if let Some(stroke) = paint.stroke {
        attrs.push_str(&color_attr("stroke", stroke.color));
        attrs.push_str(&format!(r#" stroke-width="{}""#, stroke.width));
        if let Some([dash, gap]) = stroke.dash {
            attrs.push_str(&format!(r#" stroke-dasharray="{dash} {gap}""#));
        }
    }
    if paint.opacity < 1.0 {
        attrs.push_str(&format!(r#" opacity="{}""#, paint.opacity));
    }
    attrs
}

/// `name="#rrggbb"`, plus `name-opacity` for translucent colors.
fn color_attr(name: &str, color: SerializableColor) -> String {
    let opaque = SerializableColor { a: 255, ..color };
    let mut attr = format!(r#" {name}="{}""#, opaque.to_hex());
    if color.a < 255 {
        let opacity = f64::from(color.a) / 255.0;
        attr.push_str(&format!(r#" {name}-opacity="{opacity:.3}""#));
    }
    attr
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}
