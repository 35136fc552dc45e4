//! Double-buffered grid state
//!
//! Owns the two GPU grid textures and tracks which one holds the current
//! generation. The textures are allocated once at startup and never resized.

use std::sync::mpsc;

use thiserror::Error;

/// Errors raised while allocating the grid textures.
///
/// These are unrecoverable: no valid simulation can run without both
/// buffers, so callers treat them as fatal at startup.
#[derive(Debug, Error)]
pub enum GridError {
    #[error("grid dimensions must be non-zero (got {width}x{height})")]
    ZeroSized { width: u32, height: u32 },
    #[error("grid {width}x{height} exceeds device texture limit {limit}")]
    TooLarge { width: u32, height: u32, limit: u32 },
}

/// One grid buffer: the texture and its shader-facing view
pub struct GridTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
}

/// Double-buffered cell grid living in GPU memory.
///
/// Exactly one of the two textures is "current" (the generation being
/// displayed and read by the next step); the other is "scratch" (the write
/// target of the in-flight step). [`GridState::advance`] swaps the roles
/// once per completed step. Cell state lives in the red channel: 0.0 dead,
/// 1.0 alive, thresholded at 0.5 by every reader.
pub struct GridState {
    textures: [GridTexture; 2],
    current: usize,
    width: u32,
    height: u32,
}

impl GridState {
    /// Texel format for both grid buffers.
    ///
    /// A single 8-bit channel would suffice, but `rgba8unorm` is the
    /// narrowest core format a compute kernel can write through a storage
    /// binding; only the red channel carries state.
    pub const CELL_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

    /// Allocates both grid textures and seeds the initial current buffer.
    ///
    /// `seed_fn` is queried once per cell. The scratch buffer is left
    /// uninitialized; nothing reads it before the first step writes it.
    ///
    /// # Errors
    /// Fails if the dimensions are zero or exceed the device's 2D texture
    /// limit. Callers treat this as fatal.
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        width: u32,
        height: u32,
        mut seed_fn: impl FnMut(u32, u32) -> bool,
    ) -> Result<Self, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::ZeroSized { width, height });
        }
        let limit = device.limits().max_texture_dimension_2d;
        if width > limit || height > limit {
            return Err(GridError::TooLarge {
                width,
                height,
                limit,
            });
        }

        let textures = [
            Self::create_grid_texture(device, width, height, "grid_texture_a"),
            Self::create_grid_texture(device, width, height, "grid_texture_b"),
        ];

        let state = Self {
            textures,
            current: 0,
            width,
            height,
        };

        let data = texel_data(width, height, &mut seed_fn);
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &state.current().texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &data,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );

        Ok(state)
    }

    fn create_grid_texture(
        device: &wgpu::Device,
        width: u32,
        height: u32,
        label: &str,
    ) -> GridTexture {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::CELL_FORMAT,
            // COPY_SRC is for the diagnostic readback path only
            usage: wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::STORAGE_BINDING
                | wgpu::TextureUsages::COPY_DST
                | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        GridTexture { texture, view }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Index of the texture holding the current generation
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// Index of the texture receiving the next generation
    pub fn scratch_index(&self) -> usize {
        1 - self.current
    }

    pub fn current(&self) -> &GridTexture {
        &self.textures[self.current_index()]
    }

    pub fn scratch(&self) -> &GridTexture {
        &self.textures[self.scratch_index()]
    }

    pub fn texture(&self, index: usize) -> &GridTexture {
        &self.textures[index]
    }

    /// Promotes scratch to current.
    ///
    /// Precondition: the step writing the scratch buffer has been recorded
    /// and its pass closed, so the writes are visible to whatever reads the
    /// new current buffer next. The ordering obligation sits with the
    /// caller; the grid has no view of GPU completion and cannot check it.
    pub fn advance(&mut self) {
        self.current = 1 - self.current;
    }

    /// Reads the current generation back to the CPU, one byte per cell
    /// (the red channel: 0 dead, 255 alive).
    ///
    /// Blocks on the GPU; diagnostic and test use only.
    pub fn read_cells(&self, device: &wgpu::Device, queue: &wgpu::Queue) -> Vec<u8> {
        let padded_bpr = padded_bytes_per_row(self.width);
        let staging = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("grid_staging"),
            size: padded_bpr as u64 * self.height as u64,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("grid_readback_encoder"),
        });
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: &self.current().texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &staging,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(padded_bpr),
                    rows_per_image: Some(self.height),
                },
            },
            wgpu::Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
        );
        queue.submit(std::iter::once(encoder.finish()));

        let slice = staging.slice(..);
        let (tx, rx) = mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        let _ = device.poll(wgpu::PollType::Wait);

        let mut cells = Vec::with_capacity((self.width * self.height) as usize);
        if let Ok(Ok(())) = rx.recv() {
            let data = slice.get_mapped_range();
            for row in 0..self.height {
                let start = (row * padded_bpr) as usize;
                for col in 0..self.width {
                    cells.push(data[start + (col * 4) as usize]);
                }
            }
        }
        cells
    }
}

/// Expands a per-cell seed function into tightly packed texel bytes
fn texel_data(width: u32, height: u32, seed_fn: &mut impl FnMut(u32, u32) -> bool) -> Vec<u8> {
    let mut data = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        for x in 0..width {
            let v = if seed_fn(x, y) { 255 } else { 0 };
            data.extend_from_slice(&[v, 0, 0, 255]);
        }
    }
    data
}

/// Rows in a texture-to-buffer copy must align to 256 bytes
pub(crate) fn padded_bytes_per_row(width: u32) -> u32 {
    let tight = 4 * width;
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    ((tight + align - 1) / align) * align
}
