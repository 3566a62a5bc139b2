mod common;

use common::setup;
use gles2_glow::{
    BlendEquation, BlendFactor, Capability, ClearBuffers, CompareFunc, ErrorCode, Face,
    FrontFace, GlError, HintMode, HintTarget, IndexType, PixelDataType, PixelFormat,
    PixelStore, PrimitiveType, StencilOp,
};

#[test]
fn clear_and_read_back() {
    let (gles, _) = setup();

    gles.clear_color(1., 0., 0.5, 1.).unwrap();
    gles.clear_depth(1.).unwrap();
    gles.clear_stencil(0).unwrap();
    gles.clear(ClearBuffers::COLOR | ClearBuffers::DEPTH).unwrap();

    let mut pixels = [0u8; 2 * 2 * 4];
    gles.read_pixels(0, 0, 2, 2, PixelFormat::Rgba, PixelDataType::UnsignedByte, &mut pixels)
        .unwrap();

    for texel in pixels.chunks(4) {
        assert_eq!(texel, [255, 0, 128, 255]);
    }
}

#[test]
fn clear_buffers() {
    let all = ClearBuffers::COLOR | ClearBuffers::DEPTH | ClearBuffers::STENCIL;

    assert_eq!(all, ClearBuffers::ALL);
    assert!(all.contains(ClearBuffers::DEPTH));
    assert!(!ClearBuffers::COLOR.contains(ClearBuffers::STENCIL));
    assert_eq!(ClearBuffers::default().bits(), 0);
}

#[test]
fn viewport() {
    let (gles, _) = setup();

    assert_eq!(gles.viewport_box().unwrap(), [0, 0, 640, 480]);
    gles.viewport(10, 20, 320, 240).unwrap();
    assert_eq!(gles.viewport_box().unwrap(), [10, 20, 320, 240]);
}

#[test]
fn capabilities() {
    let (gles, _) = setup();

    // dithering is the only capability enabled initially
    for &capability in Capability::ALL {
        assert_eq!(
            gles.is_enabled(capability).unwrap(),
            capability == Capability::Dither
        );
    }

    gles.enable(Capability::Blend).unwrap();
    gles.enable(Capability::DepthTest).unwrap();
    gles.disable(Capability::Dither).unwrap();

    assert!(gles.is_enabled(Capability::Blend).unwrap());
    assert!(gles.is_enabled(Capability::DepthTest).unwrap());
    assert!(!gles.is_enabled(Capability::Dither).unwrap());
}

#[test]
fn fixed_function_state() {
    let (gles, driver) = setup();

    gles.blend_func(BlendFactor::SrcAlpha, BlendFactor::OneMinusSrcAlpha)
        .unwrap();
    gles.blend_equation(BlendEquation::ReverseSubtract).unwrap();
    gles.blend_color(0.5, 0.5, 0.5, 1.).unwrap();
    gles.depth_func(CompareFunc::LessOrEqual).unwrap();
    gles.depth_mask(false).unwrap();
    gles.depth_range(0.1, 0.9).unwrap();
    gles.color_mask(true, true, true, false).unwrap();
    gles.stencil_func(CompareFunc::Always, 1, 0xff).unwrap();
    gles.stencil_op(StencilOp::Keep, StencilOp::Keep, StencilOp::Replace)
        .unwrap();
    gles.stencil_mask_separate(Face::Back, 0x0f).unwrap();
    gles.cull_face(Face::Front).unwrap();
    gles.front_face(FrontFace::Clockwise).unwrap();
    gles.line_width(2.).unwrap();
    gles.polygon_offset(1., 1.).unwrap();
    gles.sample_coverage(0.5, false).unwrap();
    gles.hint(HintTarget::GenerateMipmap, HintMode::Nicest).unwrap();
    gles.pixel_store(PixelStore::UnpackAlignment, 1).unwrap();
    gles.scissor(0, 0, 16, 16).unwrap();

    // convenience setters go through their separate variants
    assert_eq!(driver.calls("blend_func_separate"), 1);
    assert_eq!(driver.calls("blend_equation_separate"), 1);
    assert_eq!(driver.calls("stencil_func_separate"), 1);
    assert_eq!(driver.calls("stencil_op_separate"), 1);

    assert_eq!(gles.error(), None);
}

#[test]
fn draw() {
    let (gles, _) = setup();

    gles.draw_arrays(PrimitiveType::Triangles, 0, 3).unwrap();
    gles.draw_elements(PrimitiveType::TriangleStrip, 4, IndexType::UnsignedShort, 0)
        .unwrap();
    gles.flush().unwrap();
    gles.finish().unwrap();

    assert_eq!(IndexType::UnsignedShort.size(), 2);
}

#[test]
fn implementation_strings() {
    let (gles, _) = setup();

    assert_eq!(gles.vendor().unwrap(), "gles2-glow");
    assert_eq!(gles.renderer().unwrap(), "in-memory mock");
    assert!(gles.version().unwrap().starts_with("OpenGL ES 2.0"));
    assert!(gles
        .shading_language_version()
        .unwrap()
        .starts_with("OpenGL ES GLSL ES 1.00"));
    assert_eq!(gles.extensions().unwrap(), vec!["GL_OES_mock_objects"]);
}

#[test]
fn limits() {
    let (gles, _) = setup();

    assert_eq!(gles.max_texture_size().unwrap(), 2048);
    assert_eq!(gles.max_texture_units(), 8);
    assert_eq!(gles.max_vertex_attributes(), 8);
    assert_eq!(gles.active_texture_unit(), 0);
}

#[test]
fn errors_are_read_and_reset() {
    let (gles, driver) = setup();
    assert_eq!(gles.error(), None);

    driver.raise_error(gles2_glow::gl::OUT_OF_MEMORY);
    assert_eq!(gles.error(), Some(ErrorCode::OutOfMemory));
    assert_eq!(gles.error(), None);
}

#[cfg(any(debug_assertions, feature = "diagnostics"))]
mod diagnostics {
    use super::*;
    use gles2_glow::{gl, Framebuffer};

    #[test]
    fn invalid_values_are_reported() {
        let (gles, _) = setup();

        assert_eq!(
            gles.line_width(0.),
            Err(GlError::Driver {
                op: "glLineWidth",
                code: gl::INVALID_VALUE,
            })
        );
        assert_eq!(
            gles.pixel_store(PixelStore::PackAlignment, 3)
                .unwrap_err()
                .error_code(),
            Some(ErrorCode::InvalidValue)
        );
    }

    #[test]
    fn drawing_into_an_incomplete_framebuffer_fails() {
        let (gles, _) = setup();

        let framebuffer = Framebuffer::new(&gles).unwrap();
        framebuffer.bind().unwrap();

        assert_eq!(
            gles.draw_arrays(PrimitiveType::Triangles, 0, 3),
            Err(GlError::Driver {
                op: "glDrawArrays",
                code: gl::INVALID_FRAMEBUFFER_OPERATION,
            })
        );
    }

    #[test]
    fn errors_are_attributed_to_the_failing_call() {
        let (gles, driver) = setup();

        driver.raise_error(gl::INVALID_ENUM);

        // the next checked call picks the pending error up
        let error = gles.flush().unwrap_err();
        assert_eq!(
            error,
            GlError::Driver {
                op: "glFlush",
                code: gl::INVALID_ENUM,
            }
        );
        assert_eq!(error.to_string(), format!("glFlush: {}", ErrorCode::InvalidEnum));
        assert_eq!(gles.flush(), Ok(()));
    }
}

#[test]
fn short_read_buffer_is_rejected() {
    let (gles, driver) = setup();
    let mut pixels = [0u8; 1];

    assert_eq!(
        gles.read_pixels(0, 0, 16, 16, PixelFormat::Rgba, PixelDataType::UnsignedByte, &mut pixels),
        Err(GlError::NotEnoughPixels {
            op: "glReadPixels",
            expected: 16 * 16 * 4,
            provided: 1,
        })
    );
    assert_eq!(driver.calls("read_pixels"), 0);
    assert_eq!(driver.calls("pixel_store_i32"), 0);
}

#[test]
fn reads_of_unaligned_rows_are_tightly_packed() {
    let (gles, _) = setup();
    gles.clear(ClearBuffers::COLOR).unwrap();

    // 3 RGB pixels make 9-byte rows
    let mut pixels = [0xffu8; 3 * 2 * 3];
    gles.read_pixels(0, 0, 3, 2, PixelFormat::Rgb, PixelDataType::UnsignedByte, &mut pixels)
        .unwrap();

    assert_eq!(gles.error(), None);
    assert!(pixels.iter().all(|&b| b == 0));
}

#[cfg(not(any(debug_assertions, feature = "diagnostics")))]
#[test]
fn errors_stay_pending_without_diagnostics() {
    let (gles, _) = setup();

    assert_eq!(gles.line_width(0.), Ok(()));
    assert_eq!(gles.error(), Some(ErrorCode::InvalidValue));
}
