//! GPU-facing plain-old-data layouts. Field order and padding follow WGSL
//! uniform alignment rules (vec3 padded to 16 bytes).

use std::mem::size_of;

/// Interleaved mesh vertex
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Camera uniform buffer data for GPU
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub position: [f32; 3],
    pub time: f32,
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PointLightRaw {
    pub position: [f32; 3],
    pub intensity: f32,
    pub color: [f32; 3],
    pub distance: f32,
}

/// Per-frame data shared by every mesh draw
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FrameUniform {
    pub camera: CameraUniform,
    /// rgb + intensity
    pub ambient: [f32; 4],
    /// direction towards the light + intensity
    pub directional_dir: [f32; 4],
    pub directional_color: [f32; 4],
    pub points: [PointLightRaw; 3],
}

/// Per draw-group material and transform
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniform {
    pub model: [[f32; 4]; 4],
    pub normal_matrix: [[f32; 4]; 4],
    /// rgb + opacity
    pub color: [f32; 4],
    /// metalness, roughness, gradient enabled, unused
    pub params: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct BrightPassUniform {
    pub threshold: f32,
    pub smooth_width: f32,
    pub _pad: [f32; 2],
}

/// One separable blur step; weights are packed four per vec4
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct BlurUniform {
    pub direction: [f32; 2],
    pub texel_size: [f32; 2],
    pub kernel_radius: u32,
    pub _pad: [u32; 3],
    pub weights: [[f32; 4]; 3],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CompositeUniform {
    pub strength: f32,
    pub radius: f32,
    pub _pad: [f32; 2],
    /// five mip factors in x..w of [0] and x of [1]
    pub factors: [[f32; 4]; 2],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ShimmerUniform {
    pub time: f32,
    pub intensity: f32,
    pub _pad: [f32; 2],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_sizes_are_16_byte_multiples() {
        assert_eq!(size_of::<CameraUniform>(), 80);
        assert_eq!(size_of::<FrameUniform>() % 16, 0);
        assert_eq!(size_of::<ObjectUniform>(), 160);
        assert_eq!(size_of::<BlurUniform>(), 80);
        assert_eq!(size_of::<CompositeUniform>(), 48);
        assert_eq!(size_of::<ShimmerUniform>(), 16);
        assert_eq!(size_of::<BrightPassUniform>(), 16);
    }

    #[test]
    fn vertex_stride() {
        assert_eq!(size_of::<Vertex>(), 32);
        assert_eq!(Vertex::layout().array_stride, 32);
    }
}
