mod common;

use common::setup;
use gles2_glow::{
    BindingSlot, Framebuffer, FramebufferAttachment, FramebufferStatus, GlError, ImageTarget,
    PixelDataType, PixelFormat, Renderbuffer, RenderbufferFormat, Texture, TextureKind,
};

fn color_texture(gles: &gles2_glow::Gles, width: u32, height: u32) -> Texture {
    let texture = Texture::new(gles, TextureKind::Texture2D).unwrap();
    texture.bind().unwrap();
    texture
        .upload::<u8>(
            ImageTarget::Texture2D,
            0,
            width,
            height,
            PixelFormat::Rgba,
            PixelDataType::UnsignedByte,
            None,
        )
        .unwrap();
    texture
}

#[test]
fn completeness() {
    let (gles, _) = setup();

    let framebuffer = Framebuffer::new(&gles).unwrap();
    framebuffer.bind().unwrap();
    assert!(framebuffer.is_bound());
    assert_eq!(framebuffer.status().unwrap(), FramebufferStatus::MissingAttachment);
    assert_eq!(
        framebuffer.check_complete(),
        Err(GlError::IncompleteFramebuffer(
            FramebufferStatus::MissingAttachment
        ))
    );

    let color = color_texture(&gles, 64, 32);
    framebuffer
        .attach_texture(FramebufferAttachment::Color, &color, ImageTarget::Texture2D, 0)
        .unwrap();

    let mut depth = Renderbuffer::new(&gles).unwrap();
    depth.bind().unwrap();
    depth.storage(RenderbufferFormat::Depth16, 64, 32).unwrap();
    framebuffer
        .attach_renderbuffer(FramebufferAttachment::Depth, &depth)
        .unwrap();

    assert_eq!(framebuffer.status().unwrap(), FramebufferStatus::Complete);
    assert_eq!(framebuffer.check_complete(), Ok(()));
}

#[test]
fn mismatched_dimensions() {
    let (gles, _) = setup();

    let framebuffer = Framebuffer::new(&gles).unwrap();
    framebuffer.bind().unwrap();

    let color = color_texture(&gles, 16, 16);
    framebuffer
        .attach_texture(FramebufferAttachment::Color, &color, ImageTarget::Texture2D, 0)
        .unwrap();

    let mut stencil = Renderbuffer::new(&gles).unwrap();
    stencil.bind().unwrap();
    stencil.storage(RenderbufferFormat::Stencil8, 8, 8).unwrap();
    framebuffer
        .attach_renderbuffer(FramebufferAttachment::Stencil, &stencil)
        .unwrap();

    assert_eq!(
        framebuffer.check_complete(),
        Err(GlError::IncompleteFramebuffer(
            FramebufferStatus::IncompleteDimensions
        ))
    );

    framebuffer.detach(FramebufferAttachment::Stencil).unwrap();
    assert_eq!(framebuffer.status().unwrap(), FramebufferStatus::Complete);
}

#[test]
fn attachment_without_storage_is_incomplete() {
    let (gles, _) = setup();

    let framebuffer = Framebuffer::new(&gles).unwrap();
    framebuffer.bind().unwrap();

    let renderbuffer = Renderbuffer::new(&gles).unwrap();
    framebuffer
        .attach_renderbuffer(FramebufferAttachment::Color, &renderbuffer)
        .unwrap();

    assert_eq!(
        framebuffer.status().unwrap(),
        FramebufferStatus::IncompleteAttachment
    );
}

#[test]
fn renderbuffer_storage() {
    let (gles, _) = setup();

    let mut renderbuffer = Renderbuffer::new(&gles).unwrap();
    assert_eq!(renderbuffer.format(), None);
    assert_eq!((renderbuffer.width(), renderbuffer.height()), (0, 0));

    renderbuffer.bind().unwrap();
    assert!(renderbuffer.is_bound());
    renderbuffer
        .storage(RenderbufferFormat::Rgb565, 320, 240)
        .unwrap();

    assert_eq!(renderbuffer.format(), Some(RenderbufferFormat::Rgb565));
    assert_eq!((renderbuffer.width(), renderbuffer.height()), (320, 240));

    renderbuffer.unbind().unwrap();
    assert_eq!(gles.bound(BindingSlot::Renderbuffer), 0);
}

#[test]
fn unbinding_restores_the_default_framebuffer() {
    let (gles, driver) = setup();

    let framebuffer = Framebuffer::new(&gles).unwrap();
    framebuffer.bind().unwrap();
    assert_eq!(gles.bound(BindingSlot::Framebuffer), framebuffer.handle());

    let before = driver.calls("bind_framebuffer");
    framebuffer.unbind().unwrap();
    framebuffer.unbind().unwrap();

    assert_eq!(driver.calls("bind_framebuffer"), before + 1);
    assert_eq!(gles.bound(BindingSlot::Framebuffer), 0);
    assert!(!framebuffer.is_bound());
}

#[cfg(any(debug_assertions, feature = "diagnostics"))]
#[test]
fn attaching_needs_the_framebuffer_bound() {
    let (gles, driver) = setup();

    let framebuffer = Framebuffer::new(&gles).unwrap();
    let color = color_texture(&gles, 4, 4);

    assert_eq!(
        framebuffer.attach_texture(FramebufferAttachment::Color, &color, ImageTarget::Texture2D, 0),
        Err(GlError::NotBound {
            op: "glFramebufferTexture2D",
            slot: BindingSlot::Framebuffer,
            expected: framebuffer.handle(),
            current: 0,
        })
    );
    assert_eq!(driver.calls("framebuffer_texture_2d"), 0);
}

#[cfg(any(debug_assertions, feature = "diagnostics"))]
#[test]
fn attaching_a_disposed_texture_fails() {
    let (gles, _) = setup();

    let framebuffer = Framebuffer::new(&gles).unwrap();
    framebuffer.bind().unwrap();

    let mut color = color_texture(&gles, 4, 4);
    color.dispose();

    assert_eq!(
        framebuffer.attach_texture(FramebufferAttachment::Color, &color, ImageTarget::Texture2D, 0),
        Err(GlError::Disposed {
            op: "glFramebufferTexture2D"
        })
    );
}

#[cfg(any(debug_assertions, feature = "diagnostics"))]
#[test]
fn storage_needs_the_renderbuffer_bound() {
    let (gles, _) = setup();

    let mut renderbuffer = Renderbuffer::new(&gles).unwrap();
    let result = renderbuffer.storage(RenderbufferFormat::Rgba4, 4, 4);

    assert_eq!(
        result,
        Err(GlError::NotBound {
            op: "glRenderbufferStorage",
            slot: BindingSlot::Renderbuffer,
            expected: renderbuffer.handle(),
            current: 0,
        })
    );
    assert_eq!(renderbuffer.format(), None);
}
