use std::{path::Path, sync::mpsc};

use image::RgbaImage;
use vello::wgpu;

use crate::{
  error::RenderError,
  render::{GpuHandle, RenderConfig},
};

/// Copies the rendered texture back from the GPU and writes it as an image.
pub fn save(handle: &GpuHandle, config: RenderConfig, path: &Path) -> Result<(), RenderError> {
  let unpadded = 4 * config.width;
  let padded = padded_bytes_per_row(config.width);

  let buffer = handle.device.create_buffer(&wgpu::BufferDescriptor {
    label:              Some("Output Buffer"),
    size:               u64::from(padded) * u64::from(config.height),
    usage:              wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
    mapped_at_creation: false,
  });

  let mut encoder = handle.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
    label: Some("texture_buffer_copy_encoder"),
  });

  encoder.copy_texture_to_buffer(
    wgpu::TexelCopyTextureInfo {
      texture:   &handle.texture,
      mip_level: 0,
      origin:    wgpu::Origin3d::ZERO,
      aspect:    wgpu::TextureAspect::All,
    },
    wgpu::TexelCopyBufferInfo {
      buffer: &buffer,
      layout: wgpu::TexelCopyBufferLayout {
        offset:         0,
        bytes_per_row:  Some(padded),
        rows_per_image: Some(config.height),
      },
    },
    config.extent_3d(),
  );

  handle.queue.submit(std::iter::once(encoder.finish()));

  let slice = buffer.slice(..);
  let (tx, rx) = mpsc::channel();
  slice.map_async(wgpu::MapMode::Read, move |result| {
    let _ = tx.send(result);
  });
  handle.device.poll(wgpu::PollType::Wait).map_err(|e| RenderError::Readback(e.to_string()))?;
  rx.recv()
    .map_err(|e| RenderError::Readback(e.to_string()))?
    .map_err(|e| RenderError::Readback(e.to_string()))?;

  let pixels = {
    let data = slice.get_mapped_range();
    unpad_rows(&data, unpadded as usize, padded as usize, config.height as usize)
  };
  buffer.unmap();

  let image = RgbaImage::from_raw(config.width, config.height, pixels)
    .ok_or_else(|| RenderError::Readback("pixel buffer does not match image size".to_string()))?;
  image.save(path)?;

  tracing::debug!(
    path = %path.display(),
    width = config.width,
    height = config.height,
    "saved plot"
  );
  Ok(())
}

/// Rows copied out of a texture must start on a 256 byte boundary.
fn padded_bytes_per_row(width: u32) -> u32 {
  let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
  (4 * width).div_ceil(align) * align
}

fn unpad_rows(data: &[u8], unpadded: usize, padded: usize, rows: usize) -> Vec<u8> {
  data.chunks(padded).take(rows).flat_map(|row| &row[..unpadded]).copied().collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn row_padding() {
    assert_eq!(padded_bytes_per_row(64), 256);
    assert_eq!(padded_bytes_per_row(65), 512);
    assert_eq!(padded_bytes_per_row(1024), 4096);
  }

  #[test]
  fn unpadding() {
    let data = [1, 2, 0, 0, 3, 4, 0, 0];
    assert_eq!(unpad_rows(&data, 2, 4, 2), vec![1, 2, 3, 4]);
  }
}
