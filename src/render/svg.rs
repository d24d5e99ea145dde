//! Static SVG snapshot of the current engine state. This is a stand-in host
//! for the real rendering library: it consumes the same layer descriptors the
//! render boundary produces.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use anyhow::{anyhow, Context, Result};
use geo::{Coord, Geometry, Polygon, Rect};

use crate::color::Rgba;
use crate::engine::{derive_layers, LayerGeometry, MapEngine};
use crate::geom::geometry_bounds;

/// Render every layer of the engine's current state into an SVG file.
pub fn write_svg(path: &Path, engine: &MapEngine, width: i32, margin: i32) -> Result<()> {
    let bounds = national_bounds(engine)
        .ok_or_else(|| anyhow!("[write_svg] Could not determine bounds; nothing to draw."))?;

    let margin = margin as f64;
    let width = width as f64;
    let scale = (width - 2.0 * margin) / bounds.width();
    let height = bounds.height() * scale + 2.0 * margin;

    // lon/lat -> SVG coords (Y down)
    let project = move |coord: &Coord<f64>| -> (f64, f64) {
        let x = margin + (coord.x - bounds.min().x) * scale;
        let y = margin + (bounds.max().y - coord.y) * scale;
        (x, y)
    };

    let mut writer = SvgWriter::new(path)?;
    writer.write_header(width, height)?;

    for layer in derive_layers(engine) {
        match &layer.geometry {
            LayerGeometry::Boxes(boxes) => {
                for polygon in boxes {
                    writeln!(
                        writer,
                        r#"<path style="fill:none;stroke:{};stroke-width:{}" d="{}"/>"#,
                        hex(layer.line_color),
                        layer.line_width,
                        polygon_path(polygon, &project),
                    )?;
                }
            }
            LayerGeometry::Regions(names) => {
                for (name, fill) in names.iter().zip(&layer.fills) {
                    let Some(region) = engine.store().region(name) else { continue };
                    let Some(path) = geometry_path(&region.geometry, &project) else { continue };
                    writeln!(
                        writer,
                        r#"<path fill-rule="evenodd" style="{}" d="{path}"/>"#,
                        style(*fill, layer.line_color, layer.line_width),
                    )?;
                }
            }
            LayerGeometry::Cells(cells) => {
                for (cell, fill) in cells.iter().zip(&layer.fills) {
                    let mut path = String::new();
                    ring_path(&cell.ring.0, &project, &mut path);
                    writeln!(
                        writer,
                        r#"<path style="{}" d="{path}"/>"#,
                        style(*fill, layer.line_color, layer.line_width),
                    )?;
                }
            }
        }
    }

    writer.write_footer()?;
    writer.flush()?;
    Ok(())
}

/// Union of all region bounding boxes.
fn national_bounds(engine: &MapEngine) -> Option<Rect<f64>> {
    engine
        .store()
        .regions()
        .iter()
        .filter_map(|region| geometry_bounds(&region.geometry).ok())
        .reduce(|a, b| {
            Rect::new(
                Coord { x: a.min().x.min(b.min().x), y: a.min().y.min(b.min().y) },
                Coord { x: a.max().x.max(b.max().x), y: a.max().y.max(b.max().y) },
            )
        })
}

fn style(fill: Rgba, line: Rgba, line_width: f32) -> String {
    format!(
        "fill:{};fill-opacity:{:.3};stroke:{};stroke-width:{}",
        hex(fill),
        fill.a as f64 / 255.0,
        hex(line),
        line_width,
    )
}

fn hex(color: Rgba) -> String {
    format!("#{:02x}{:02x}{:02x}", color.r, color.g, color.b)
}

fn geometry_path(geometry: &Geometry<f64>, project: &impl Fn(&Coord<f64>) -> (f64, f64)) -> Option<String> {
    let mut out = String::new();
    match geometry {
        Geometry::Polygon(polygon) => out.push_str(&polygon_path(polygon, project)),
        Geometry::MultiPolygon(mp) => {
            for polygon in mp.0.iter() {
                out.push_str(&polygon_path(polygon, project));
            }
        }
        _ => return None,
    }
    Some(out)
}

fn polygon_path(polygon: &Polygon<f64>, project: &impl Fn(&Coord<f64>) -> (f64, f64)) -> String {
    let mut out = String::new();
    ring_path(&polygon.exterior().0, project, &mut out);
    for interior in polygon.interiors() {
        ring_path(&interior.0, project, &mut out);
    }
    out
}

/// Append a ring as an SVG subpath: "M x,y L x,y ... Z"
fn ring_path(ring: &[Coord<f64>], project: &impl Fn(&Coord<f64>) -> (f64, f64), out: &mut String) {
    if ring.is_empty() {
        return;
    }
    let coords: Vec<_> = ring.iter().map(project).collect();
    out.push_str(&format!(" M{:.3},{:.3}", coords[0].0, coords[0].1));
    for &(x, y) in &coords[1..] {
        out.push_str(&format!(" L{x:.3},{y:.3}"));
    }
    out.push('Z');
}

struct SvgWriter {
    writer: BufWriter<File>,
}

/// Implement std::io::Write so `write!` / `writeln!` work.
impl Write for SvgWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> { self.writer.write(buf) }

    fn flush(&mut self) -> std::io::Result<()> { self.writer.flush() }

    fn write_all(&mut self, buf: &[u8]) -> std::io::Result<()> { self.writer.write_all(buf) }
}

impl SvgWriter {
    fn new(path: &Path) -> Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("[write_svg] Failed to create {}", path.display()))?;
        Ok(Self { writer: BufWriter::new(file) })
    }

    fn write_header(&mut self, width: f64, height: f64) -> Result<()> {
        writeln!(self, r##"<?xml version="1.0" encoding="UTF-8" standalone="no"?>"##)?;
        writeln!(
            self,
            r##"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height:.0}" viewBox="0 0 {width} {height:.0}">"##
        )?;
        writeln!(self, r##"<rect width="100%" height="100%" fill="#ffffff"/>"##)?;
        Ok(())
    }

    fn write_footer(&mut self) -> Result<()> {
        writeln!(self, "</svg>")?;
        Ok(())
    }
}
