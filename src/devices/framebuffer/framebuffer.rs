//! Framebuffer writer using embedded-graphics
use bootloader_api::info::{FrameBuffer, PixelFormat};
use embedded_graphics::{pixelcolor::Rgb888, prelude::*};

pub struct FramebufferWriter {
    framebuffer: &'static mut [u8],
    pub width: usize,
    pub height: usize,
    pub stride: usize,
    pub bytes_per_pixel: usize,
    pixel_format: PixelFormat,
}

impl FramebufferWriter {
    pub fn new(fb: &'static mut FrameBuffer) -> Self {
        let info = fb.info();

        Self {
            framebuffer: fb.buffer_mut(),
            width: info.width,
            height: info.height,
            stride: info.stride,
            bytes_per_pixel: info.bytes_per_pixel,
            pixel_format: info.pixel_format,
        }
    }

    fn pixel_offset(&self, x: usize, y: usize) -> Option<usize> {
        let offset = (y * self.stride + x) * self.bytes_per_pixel;
        (offset + self.bytes_per_pixel <= self.framebuffer.len()).then_some(offset)
    }

    fn put_pixel(&mut self, offset: usize, color: Rgb888) {
        let bpp = self.bytes_per_pixel;
        let pixel = &mut self.framebuffer[offset..offset + bpp];
        match self.pixel_format {
            PixelFormat::Rgb if bpp >= 3 => {
                pixel[0] = color.r();
                pixel[1] = color.g();
                pixel[2] = color.b();
            }
            PixelFormat::U8 => {
                let luma = (color.r() as u16 * 3 + color.g() as u16 * 6 + color.b() as u16) / 10;
                pixel[0] = luma as u8;
            }
            _ if bpp >= 3 => {
                pixel[0] = color.b();
                pixel[1] = color.g();
                pixel[2] = color.r();
            }
            _ => {}
        }
    }
}

impl DrawTarget for FramebufferWriter {
    type Color = Rgb888;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(Point { x, y }, color) in pixels {
            if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
                continue;
            }

            if let Some(offset) = self.pixel_offset(x as usize, y as usize) {
                self.put_pixel(offset, color);
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        for y in 0..self.height {
            for x in 0..self.width {
                if let Some(offset) = self.pixel_offset(x, y) {
                    self.put_pixel(offset, color);
                }
            }
        }
        Ok(())
    }
}

impl OriginDimensions for FramebufferWriter {
    fn size(&self) -> Size {
        Size::new(self.width as u32, self.height as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn writer(width: usize, height: usize, format: PixelFormat) -> FramebufferWriter {
        let bytes = std::vec![0u8; width * height * 4];
        FramebufferWriter {
            framebuffer: std::boxed::Box::leak(bytes.into_boxed_slice()),
            width,
            height,
            stride: width,
            bytes_per_pixel: 4,
            pixel_format: format,
        }
    }

    #[test]
    fn bgr_is_the_default_layout() {
        let mut fb = writer(4, 2, PixelFormat::Bgr);
        fb.draw_iter([Pixel(Point::new(1, 1), Rgb888::new(1, 2, 3))]).unwrap();
        let offset = (4 + 1) * 4;
        assert_eq!(&fb.framebuffer[offset..offset + 3], &[3, 2, 1]);
    }

    #[test]
    fn rgb_keeps_channel_order() {
        let mut fb = writer(4, 2, PixelFormat::Rgb);
        fb.draw_iter([Pixel(Point::new(0, 0), Rgb888::new(1, 2, 3))]).unwrap();
        assert_eq!(&fb.framebuffer[..3], &[1, 2, 3]);
    }

    #[test]
    fn off_screen_pixels_are_dropped() {
        let mut fb = writer(2, 2, PixelFormat::Bgr);
        fb.draw_iter([
            Pixel(Point::new(-1, 0), Rgb888::WHITE),
            Pixel(Point::new(2, 0), Rgb888::WHITE),
            Pixel(Point::new(0, 5), Rgb888::WHITE),
        ])
        .unwrap();
        assert!(fb.framebuffer.iter().all(|&b| b == 0));
    }

    #[test]
    fn clear_fills_every_pixel() {
        let mut fb = writer(3, 3, PixelFormat::Rgb);
        DrawTarget::clear(&mut fb, Rgb888::new(9, 9, 9)).unwrap();
        assert!(fb.framebuffer.chunks(4).all(|px| px[..3] == [9, 9, 9]));
        assert_eq!(fb.size(), Size::new(3, 3));
    }
}
