use galaxy_gen::PointCloud;

/// One interleaved vertex as laid out in a GPU vertex buffer.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PointVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

impl PointVertex {
    /// Byte stride between consecutive vertices.
    pub const STRIDE: usize = std::mem::size_of::<PointVertex>();
    /// Byte offset of `color` within a vertex.
    pub const COLOR_OFFSET: usize = std::mem::size_of::<[f32; 3]>();
}

/// Interleave a cloud's position and color buffers, preserving point order.
pub fn interleave(cloud: &PointCloud) -> Vec<PointVertex> {
    cloud
        .positions()
        .chunks_exact(3)
        .zip(cloud.colors().chunks_exact(3))
        .map(|(p, c)| PointVertex {
            position: [p[0], p[1], p[2]],
            color: [c[0], c[1], c[2]],
        })
        .collect()
}

/// View vertices as raw bytes for upload.
pub fn as_bytes(vertices: &[PointVertex]) -> &[u8] {
    bytemuck::cast_slice(vertices)
}
