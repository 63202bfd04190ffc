/// Texture, view and sampler bound together for the cube shader.
pub struct Texture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

/// RGBA8 checkerboard, `size` x `size` texels split into `cells` squares per side.
pub fn checkerboard(size: u32, cells: u32, light: [u8; 4], dark: [u8; 4]) -> Vec<u8> {
    let cell = (size / cells.max(1)).max(1);
    let mut data = Vec::with_capacity((size * size * 4) as usize);
    for y in 0..size {
        for x in 0..size {
            let texel = if (x / cell + y / cell) % 2 == 0 {
                light
            } else {
                dark
            };
            data.extend_from_slice(&texel);
        }
    }
    data
}

impl Texture {
    /// Procedural checker texture; stands in for loaded image assets.
    pub fn checker(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        const SIZE: u32 = 64;
        let data = checkerboard(SIZE, 8, [235, 235, 235, 255], [90, 90, 110, 255]);
        Self::from_rgba8(device, queue, "checker_texture", SIZE, SIZE, &data)
    }

    pub fn from_rgba8(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &str,
        width: u32,
        height: u32,
        data: &[u8],
    ) -> Self {
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            data,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(label),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });
        Self {
            texture,
            view,
            sampler,
        }
    }

    /// Depth attachment matching the surface size.
    pub fn create_depth(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth_texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&Default::default())
    }
}

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

#[cfg(test)]
mod tests {
    use super::*;

    const L: [u8; 4] = [255, 255, 255, 255];
    const D: [u8; 4] = [0, 0, 0, 255];

    fn texel(data: &[u8], size: u32, x: u32, y: u32) -> [u8; 4] {
        let i = ((y * size + x) * 4) as usize;
        [data[i], data[i + 1], data[i + 2], data[i + 3]]
    }

    #[test]
    fn checkerboard_size() {
        assert_eq!(checkerboard(16, 4, L, D).len(), 16 * 16 * 4);
    }

    #[test]
    fn checkerboard_alternates_cells() {
        let data = checkerboard(8, 2, L, D);
        assert_eq!(texel(&data, 8, 0, 0), L);
        assert_eq!(texel(&data, 8, 3, 3), L);
        assert_eq!(texel(&data, 8, 4, 0), D);
        assert_eq!(texel(&data, 8, 0, 4), D);
        assert_eq!(texel(&data, 8, 7, 7), L);
    }

    #[test]
    fn checkerboard_zero_cells_is_solid() {
        let data = checkerboard(4, 0, L, D);
        assert!(data.chunks(4).all(|t| t == L));
    }
}
