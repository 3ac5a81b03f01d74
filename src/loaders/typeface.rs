use anyhow::{anyhow, bail, Context, Result};
use glam::Vec2;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::str::SplitWhitespace;

/// Raw typeface JSON as exported by facetype.js
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypefaceData {
    pub glyphs: HashMap<String, GlyphData>,
    #[serde(default)]
    pub family_name: String,
    pub resolution: f32,
    pub bounding_box: BoundingBox,
    #[serde(default)]
    pub underline_thickness: f32,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    pub x_min: f32,
    pub x_max: f32,
    pub y_min: f32,
    pub y_max: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GlyphData {
    /// Horizontal advance in font units
    pub ha: f32,
    /// Outline command string, absent for blank glyphs such as space
    #[serde(default)]
    pub o: Option<String>,
}

/// One outline drawing command, in font units
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(Vec2),
    LineTo(Vec2),
    QuadTo { ctrl: Vec2, to: Vec2 },
    CubicTo { ctrl1: Vec2, ctrl2: Vec2, to: Vec2 },
}

#[derive(Debug, Clone)]
pub struct Glyph {
    pub advance: f32,
    pub commands: Vec<PathCommand>,
}

impl Glyph {
    /// Flatten the outline into closed contours.
    ///
    /// Curves are sampled with `curve_segments` points each; consecutive
    /// duplicate points and a closing point equal to the first are dropped.
    pub fn contours(&self, scale: f32, offset: Vec2, curve_segments: u32) -> Vec<Vec<Vec2>> {
        let segments = curve_segments.max(1);
        let place = |p: Vec2| p * scale + offset;

        let mut contours = Vec::new();
        let mut current: Vec<Vec2> = Vec::new();
        let mut pen = offset;

        for command in &self.commands {
            match *command {
                PathCommand::MoveTo(p) => {
                    finish_contour(&mut contours, std::mem::take(&mut current));
                    pen = place(p);
                    current.push(pen);
                }
                PathCommand::LineTo(p) => {
                    pen = place(p);
                    push_point(&mut current, pen);
                }
                PathCommand::QuadTo { ctrl, to } => {
                    let (p0, p1, p2) = (pen, place(ctrl), place(to));
                    for i in 1..=segments {
                        let t = i as f32 / segments as f32;
                        let u = 1.0 - t;
                        push_point(&mut current, p0 * (u * u) + p1 * (2.0 * u * t) + p2 * (t * t));
                    }
                    pen = p2;
                }
                PathCommand::CubicTo { ctrl1, ctrl2, to } => {
                    let (p0, p1, p2, p3) = (pen, place(ctrl1), place(ctrl2), place(to));
                    for i in 1..=segments {
                        let t = i as f32 / segments as f32;
                        let u = 1.0 - t;
                        push_point(
                            &mut current,
                            p0 * (u * u * u)
                                + p1 * (3.0 * u * u * t)
                                + p2 * (3.0 * u * t * t)
                                + p3 * (t * t * t),
                        );
                    }
                    pen = p3;
                }
            }
        }
        finish_contour(&mut contours, current);
        contours
    }
}

fn push_point(contour: &mut Vec<Vec2>, p: Vec2) {
    if contour.last().map_or(true, |last| last.distance_squared(p) > f32::EPSILON) {
        contour.push(p);
    }
}

fn finish_contour(contours: &mut Vec<Vec<Vec2>>, mut contour: Vec<Vec2>) {
    if let (Some(first), Some(last)) = (contour.first(), contour.last()) {
        if contour.len() > 1 && first.distance_squared(*last) <= f32::EPSILON {
            contour.pop();
        }
    }
    if contour.len() >= 3 {
        contours.push(contour);
    }
}

/// Parse an outline string: `m x y`, `l x y`, `q x y cpx cpy`,
/// `b x y cp1x cp1y cp2x cp2y` (end point first, control points after)
pub fn parse_outline(outline: &str) -> Result<Vec<PathCommand>> {
    let mut tokens = outline.split_whitespace();
    let mut commands = Vec::new();

    while let Some(op) = tokens.next() {
        let command = match op {
            "m" => PathCommand::MoveTo(next_point(&mut tokens, op)?),
            "l" => PathCommand::LineTo(next_point(&mut tokens, op)?),
            "q" => {
                let to = next_point(&mut tokens, op)?;
                let ctrl = next_point(&mut tokens, op)?;
                PathCommand::QuadTo { ctrl, to }
            }
            "b" => {
                let to = next_point(&mut tokens, op)?;
                let ctrl1 = next_point(&mut tokens, op)?;
                let ctrl2 = next_point(&mut tokens, op)?;
                PathCommand::CubicTo { ctrl1, ctrl2, to }
            }
            // facetype.js emits 'z' on some exports; contours close implicitly
            "z" => continue,
            other => bail!("unknown outline command '{other}'"),
        };
        commands.push(command);
    }
    Ok(commands)
}

fn next_point(tokens: &mut SplitWhitespace<'_>, op: &str) -> Result<Vec2> {
    let mut coord = || -> Result<f32> {
        let raw = tokens
            .next()
            .ok_or_else(|| anyhow!("truncated '{op}' command"))?;
        raw.parse::<f32>()
            .with_context(|| format!("bad coordinate '{raw}' in '{op}' command"))
    };
    let x = coord()?;
    let y = coord()?;
    Ok(Vec2::new(x, y))
}

/// A parsed, ready-to-lay-out font
#[derive(Debug, Clone)]
pub struct Typeface {
    family_name: String,
    resolution: f32,
    bounding_box: BoundingBox,
    underline_thickness: f32,
    glyphs: HashMap<char, Glyph>,
}

impl Typeface {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .context(format!("Failed to read typeface: {:?}", path))?;
        Self::from_json(&text).context(format!("Failed to parse typeface: {:?}", path))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let data: TypefaceData = serde_json::from_str(json)?;
        Self::from_data(data)
    }

    pub fn from_data(data: TypefaceData) -> Result<Self> {
        if data.resolution <= 0.0 {
            bail!("typeface resolution must be positive, got {}", data.resolution);
        }

        let mut glyphs = HashMap::with_capacity(data.glyphs.len());
        for (key, glyph) in data.glyphs {
            let mut chars = key.chars();
            let (Some(ch), None) = (chars.next(), chars.next()) else {
                log::debug!("skipping multi-character glyph key {key:?}");
                continue;
            };
            let commands = match &glyph.o {
                Some(outline) => parse_outline(outline)
                    .with_context(|| format!("glyph {key:?}"))?,
                None => Vec::new(),
            };
            glyphs.insert(
                ch,
                Glyph {
                    advance: glyph.ha,
                    commands,
                },
            );
        }

        Ok(Self {
            family_name: data.family_name,
            resolution: data.resolution,
            bounding_box: data.bounding_box,
            underline_thickness: data.underline_thickness,
            glyphs,
        })
    }

    pub fn family_name(&self) -> &str {
        &self.family_name
    }

    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }

    pub fn glyph(&self, ch: char) -> Option<&Glyph> {
        self.glyphs.get(&ch)
    }

    pub fn scale_for(&self, size: f32) -> f32 {
        size / self.resolution
    }

    pub fn line_height(&self, size: f32) -> f32 {
        (self.bounding_box.y_max - self.bounding_box.y_min + self.underline_thickness)
            * self.scale_for(size)
    }

    /// Lay out `text` and return the contours of each glyph, in order.
    ///
    /// Characters without a glyph fall back to '?', or are skipped with a
    /// warning when the font has no '?' either. '\n' starts a new line.
    pub fn layout(&self, text: &str, size: f32, curve_segments: u32) -> Vec<Vec<Vec<Vec2>>> {
        let scale = self.scale_for(size);
        let line_height = self.line_height(size);
        let mut offset = Vec2::ZERO;
        let mut glyphs = Vec::new();

        for ch in text.chars() {
            if ch == '\n' {
                offset.x = 0.0;
                offset.y -= line_height;
                continue;
            }
            let Some(glyph) = self.glyph(ch).or_else(|| self.glyph('?')) else {
                log::warn!(
                    "character {ch:?} does not exist in font family {}",
                    self.family_name
                );
                continue;
            };
            glyphs.push(glyph.contours(scale, offset, curve_segments));
            offset.x += glyph.advance * scale;
        }
        glyphs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FONT: &str = r#"{
        "familyName": "Test",
        "resolution": 1000,
        "underlineThickness": 50,
        "boundingBox": { "xMin": 0, "xMax": 800, "yMin": -200, "yMax": 800 },
        "glyphs": {
            "I": { "ha": 300, "o": "m 0 0 l 200 0 l 200 700 l 0 700 l 0 0" },
            " ": { "ha": 250 },
            "o": { "ha": 600, "o": "m 0 0 q 500 0 500 250 l 500 500 l 0 500" }
        }
    }"#;

    #[test]
    fn parses_commands_end_point_first() {
        let cmds = parse_outline("m 1 2 q 10 20 5 6 b 7 8 1 1 2 2").unwrap();
        assert_eq!(cmds[0], PathCommand::MoveTo(Vec2::new(1.0, 2.0)));
        assert_eq!(
            cmds[1],
            PathCommand::QuadTo {
                ctrl: Vec2::new(5.0, 6.0),
                to: Vec2::new(10.0, 20.0)
            }
        );
        assert!(matches!(cmds[2], PathCommand::CubicTo { to, .. } if to == Vec2::new(7.0, 8.0)));
    }

    #[test]
    fn rejects_unknown_and_truncated_commands() {
        assert!(parse_outline("x 1 2").is_err());
        assert!(parse_outline("m 1").is_err());
        assert!(parse_outline("l 1 abc").is_err());
    }

    #[test]
    fn closing_point_is_dropped() {
        let font = Typeface::from_json(FONT).unwrap();
        let contours = font.glyph('I').unwrap().contours(1.0, Vec2::ZERO, 12);
        assert_eq!(contours.len(), 1);
        assert_eq!(contours[0].len(), 4);
    }

    #[test]
    fn curves_are_sampled() {
        let font = Typeface::from_json(FONT).unwrap();
        let contours = font.glyph('o').unwrap().contours(1.0, Vec2::ZERO, 12);
        // move + 12 curve samples + 2 lines
        assert_eq!(contours[0].len(), 15);
    }

    #[test]
    fn layout_advances_by_ha() {
        let font = Typeface::from_json(FONT).unwrap();
        let glyphs = font.layout("I I", 1.0, 4);
        assert_eq!(glyphs.len(), 3);
        assert!(glyphs[1].is_empty());
        let second = &glyphs[2][0];
        assert!((second[0].x - (300.0 + 250.0) / 1000.0).abs() < 1e-6);
    }

    #[test]
    fn line_height_uses_bbox_and_underline() {
        let font = Typeface::from_json(FONT).unwrap();
        assert!((font.line_height(1.0) - 1.05).abs() < 1e-6);
    }

    #[test]
    fn missing_glyph_is_skipped() {
        let font = Typeface::from_json(FONT).unwrap();
        assert_eq!(font.layout("IZ", 1.0, 4).len(), 1);
    }
}
