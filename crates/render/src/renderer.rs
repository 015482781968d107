use std::fmt::Write;

use galaxy_gen::PointCloud;
use glam::Vec3;

/// Camera/view configuration for rendering.
#[derive(Debug, Clone, Copy)]
pub struct RenderView {
    /// Camera position in world space.
    pub eye: Vec3,
    /// Point the camera is looking at.
    pub target: Vec3,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
}

impl Default for RenderView {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, 3.0),
            target: Vec3::ZERO,
            fov_degrees: 75.0,
        }
    }
}

impl RenderView {
    /// Back the camera away from the target until a sphere of `radius`
    /// around it fits the vertical field of view.
    pub fn framing(radius: f32, fov_degrees: f32) -> Self {
        let half = (fov_degrees.to_radians() * 0.5).max(f32::EPSILON);
        let distance = radius / half.sin();
        Self {
            eye: Vec3::new(0.0, distance * 0.5, distance),
            target: Vec3::ZERO,
            fov_degrees,
        }
    }
}

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer reads a cloud and a view configuration, then produces
/// output. It never mutates the cloud.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame of `cloud` from the given view.
    fn render(&self, cloud: &PointCloud, view: &RenderView) -> Self::Output;
}

/// Debug text renderer: a human-readable summary of a cloud.
///
/// Useful for CLI output, logging, and testing the render interface.
#[derive(Debug)]
pub struct DebugTextRenderer {
    /// How many leading points to list individually.
    pub preview: usize,
}

impl Default for DebugTextRenderer {
    fn default() -> Self {
        Self { preview: 5 }
    }
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_preview(preview: usize) -> Self {
        Self { preview }
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, cloud: &PointCloud, view: &RenderView) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "=== Point Cloud ({} points) ===", cloud.len());
        let _ = writeln!(
            out,
            "Camera: eye=({:.1}, {:.1}, {:.1}) target=({:.1}, {:.1}, {:.1}) fov={:.0}",
            view.eye.x,
            view.eye.y,
            view.eye.z,
            view.target.x,
            view.target.y,
            view.target.z,
            view.fov_degrees
        );

        match cloud.bounds() {
            Some(b) => {
                let _ = writeln!(
                    out,
                    "Bounds: min=({:.2}, {:.2}, {:.2}) max=({:.2}, {:.2}, {:.2})",
                    b.min.x, b.min.y, b.min.z, b.max.x, b.max.y, b.max.z
                );
            }
            None => out.push_str("Bounds: empty\n"),
        }

        for (i, (p, c)) in cloud.iter().take(self.preview).enumerate() {
            let _ = writeln!(
                out,
                "  [{i}] pos=({:.3}, {:.3}, {:.3}) color={}",
                p.x,
                p.y,
                p.z,
                c.to_hex()
            );
        }
        if cloud.len() > self.preview {
            let _ = writeln!(out, "  ... {} more", cloud.len() - self.preview);
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cloud() -> PointCloud {
        PointCloud::from_buffers(
            vec![0.0, 0.0, 0.0, 1.0, 2.0, 3.0, -1.0, 0.5, 0.0],
            vec![1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0],
        )
        .unwrap()
    }

    #[test]
    fn debug_renderer_empty_cloud() {
        let empty = PointCloud::from_buffers(Vec::new(), Vec::new()).unwrap();
        let output = DebugTextRenderer::new().render(&empty, &RenderView::default());

        assert!(output.contains("0 points"));
        assert!(output.contains("Bounds: empty"));
    }

    #[test]
    fn debug_renderer_with_points() {
        let renderer = DebugTextRenderer::with_preview(2);
        let output = renderer.render(&cloud(), &RenderView::default());

        assert!(output.contains("3 points"));
        assert!(output.contains("[1] pos=(1.000, 2.000, 3.000) color=#00ff00"));
        assert!(!output.contains("[2]"));
        assert!(output.contains("... 1 more"));
        assert!(output.contains("max=(1.00, 2.00, 3.00)"));
    }

    #[test]
    fn render_view_default() {
        let view = RenderView::default();
        assert_eq!(view.fov_degrees, 75.0);
        assert_eq!(view.eye, Vec3::new(0.0, 0.0, 3.0));
        assert_eq!(view.target, Vec3::ZERO);
    }

    #[test]
    fn framing_moves_back_for_larger_radius() {
        let near = RenderView::framing(1.0, 75.0);
        let far = RenderView::framing(5.0, 75.0);
        assert!(far.eye.length() > near.eye.length());
        assert!(far.eye.z > 5.0);
    }
}
