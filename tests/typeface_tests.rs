use approx::assert_relative_eq;
use glam::Vec2;
use portfolio_visuals::geometry::text::{shapes_from_contours, TextGeometry, CAP_MATERIAL, SIDE_MATERIAL};
use portfolio_visuals::geometry::triangulate::triangulate;
use portfolio_visuals::loaders::typeface::parse_outline;
use portfolio_visuals::loaders::{PathCommand, Typeface};

const FONT_PATH: &str = "assets/fonts/block.typeface.json";

/// A square "o" with a square hole, plus a curved "c"
const RING_FONT: &str = r#"{
    "familyName": "Ring",
    "resolution": 100,
    "boundingBox": { "xMin": 0, "xMax": 100, "yMin": -20, "yMax": 100 },
    "underlineThickness": 10,
    "glyphs": {
        "o": { "ha": 110, "o": "m 0 0 l 100 0 l 100 100 l 0 100 m 30 30 l 30 70 l 70 70 l 70 30" },
        "c": { "ha": 90, "o": "m 0 0 l 80 0 q 80 80 80 40 l 0 80" },
        " ": { "ha": 50 }
    }
}"#;

fn sign(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    (p.x - b.x) * (a.y - b.y) - (a.x - b.x) * (p.y - b.y)
}

fn triangle_contains(tri: [Vec2; 3], p: Vec2) -> bool {
    let d1 = sign(p, tri[0], tri[1]);
    let d2 = sign(p, tri[1], tri[2]);
    let d3 = sign(p, tri[2], tri[0]);
    let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
    let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
    !(has_neg && has_pos)
}

#[cfg(test)]
mod typeface_tests {
    use super::*;

    #[test]
    fn test_outline_commands_parse_end_point_first() {
        let commands = parse_outline("m 0 0 l 10 0 q 10 10 20 5 b 0 10 5 20 0 15").unwrap();
        assert_eq!(
            commands,
            vec![
                PathCommand::MoveTo(Vec2::new(0.0, 0.0)),
                PathCommand::LineTo(Vec2::new(10.0, 0.0)),
                PathCommand::QuadTo {
                    ctrl: Vec2::new(20.0, 5.0),
                    to: Vec2::new(10.0, 10.0),
                },
                PathCommand::CubicTo {
                    ctrl1: Vec2::new(5.0, 20.0),
                    ctrl2: Vec2::new(0.0, 15.0),
                    to: Vec2::new(0.0, 10.0),
                },
            ]
        );
    }

    #[test]
    fn test_truncated_outline_is_an_error() {
        assert!(parse_outline("m 0 0 l 10").is_err());
        assert!(parse_outline("z 1 2").is_err());
    }

    #[test]
    fn test_glyph_outline_becomes_contours() {
        let font = Typeface::from_json(RING_FONT).unwrap();
        let contours = font.glyph('o').unwrap().contours(1.0, Vec2::ZERO, 12);

        assert_eq!(contours.len(), 2);
        assert_eq!(contours[0].len(), 4);
        assert_eq!(contours[1].len(), 4);
    }

    #[test]
    fn test_curves_are_sampled_per_segment() {
        let font = Typeface::from_json(RING_FONT).unwrap();
        let contours = font.glyph('c').unwrap().contours(1.0, Vec2::ZERO, 12);

        // two line points, twelve curve samples, one closing line point
        assert_eq!(contours.len(), 1);
        assert_eq!(contours[0].len(), 2 + 12 + 1);
    }

    #[test]
    fn test_triangulated_hole_stays_empty() {
        let font = Typeface::from_json(RING_FONT).unwrap();
        let contours = font.glyph('o').unwrap().contours(1.0, Vec2::ZERO, 12);
        let shapes = shapes_from_contours(&contours);
        assert_eq!(shapes.len(), 1);
        assert_eq!(shapes[0].holes.len(), 1);

        let shape = &shapes[0];
        let mut points = shape.contour.clone();
        points.extend(shape.holes.iter().flatten().copied());
        let triangles = triangulate(&shape.contour, &shape.holes);
        assert!(!triangles.is_empty());

        let centre = Vec2::new(50.0, 50.0);
        for tri in triangles {
            let corners = tri.map(|i| points[i as usize]);
            assert!(!triangle_contains(corners, centre), "triangle {corners:?} covers the hole");
        }
    }

    #[test]
    fn test_line_height_and_scale() {
        let font = Typeface::from_json(RING_FONT).unwrap();
        assert_relative_eq!(font.scale_for(2.0), 0.02);
        assert_relative_eq!(font.line_height(1.0), 1.3, epsilon = 1e-6);
    }

    #[test]
    fn test_layout_advances_and_falls_back() {
        let font = Typeface::from_json(RING_FONT).unwrap();
        let glyphs = font.layout("o o", 100.0, 12);
        assert_eq!(glyphs.len(), 3);
        assert!(glyphs[1].is_empty());
        assert_relative_eq!(glyphs[2][0][0].x, 160.0);

        // no glyph and no '?' in this font
        assert!(font.layout("x", 100.0, 12).is_empty());
    }

    #[test]
    fn test_missing_file_is_reported() {
        let err = Typeface::load("does/not/exist.json").unwrap_err();
        assert!(format!("{err:#}").contains("exist.json"));
    }

    #[test]
    fn test_bundled_font_covers_labels() {
        let font = Typeface::load(FONT_PATH).unwrap();
        assert_eq!(font.family_name(), "Block");
        for ch in "MatthewPriceDICE? ".chars() {
            assert!(font.glyph(ch).is_some(), "missing glyph {ch:?}");
        }
    }

    #[test]
    fn test_extruded_text_has_cap_and_side_groups() {
        let font = Typeface::load(FONT_PATH).unwrap();
        let geometry = TextGeometry::new(1.5, 0.4).build(&font, "DICE");

        assert!(geometry.triangle_count() > 0);
        let groups = geometry.draw_groups();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].material_index, CAP_MATERIAL);
        assert_eq!(groups[1].material_index, SIDE_MATERIAL);
        assert_eq!(groups[1].start, groups[0].count);

        let bounds = geometry.bounding_box().unwrap();
        assert_relative_eq!(bounds.min.z, -0.2, epsilon = 1e-4);
        assert_relative_eq!(bounds.max.z, 0.2, epsilon = 1e-4);
    }
}
