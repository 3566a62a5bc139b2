mod common;

use std::collections::HashSet;

use common::setup;
use gles2_glow::{
    BindingSlot, BufferKind, DataBuffer, ErrorCode, Framebuffer, GlError, ObjectType, Program,
    Renderbuffer, Shader, ShaderKind, Texture, TextureKind,
};

#[test]
fn dispose_deletes_exactly_once() {
    let (gles, driver) = setup();

    let mut buffer = DataBuffer::new(&gles, BufferKind::Vertex).unwrap();
    let mut texture = Texture::new(&gles, TextureKind::Texture2D).unwrap();
    let mut framebuffer = Framebuffer::new(&gles).unwrap();
    let mut renderbuffer = Renderbuffer::new(&gles).unwrap();
    let mut shader = Shader::new(&gles, ShaderKind::Vertex, common::VERTEX).unwrap();
    let mut program = Program::new(&gles).unwrap();

    let handles = [
        buffer.handle(),
        texture.handle(),
        framebuffer.handle(),
        renderbuffer.handle(),
        shader.handle(),
        program.handle(),
    ];

    for &handle in &handles {
        assert_ne!(handle, 0);
    }

    for _ in 0..2 {
        buffer.dispose();
        texture.dispose();
        framebuffer.dispose();
        renderbuffer.dispose();
        shader.dispose();
        program.dispose();
    }

    assert_eq!(buffer.handle(), 0);
    assert_eq!(texture.handle(), 0);
    assert_eq!(framebuffer.handle(), 0);
    assert_eq!(renderbuffer.handle(), 0);
    assert_eq!(shader.handle(), 0);
    assert_eq!(program.handle(), 0);

    // dropping a disposed object doesn't delete again
    drop((buffer, texture, framebuffer, renderbuffer, shader, program));

    for &handle in &handles {
        assert_eq!(driver.delete_count(handle), 1);
        assert!(!driver.is_live(handle));
    }
}

#[test]
fn drop_deletes() {
    let (gles, driver) = setup();

    let handle = {
        let texture = Texture::new(&gles, TextureKind::CubeMap).unwrap();
        texture.handle()
    };

    assert_eq!(driver.delete_count(handle), 1);
    assert_eq!(gles.live_objects(ObjectType::Texture), 0);
}

#[test]
fn live_counts() {
    let (gles, _) = setup();
    assert!(gles.live_resources().is_empty());

    let _a = DataBuffer::new(&gles, BufferKind::Vertex).unwrap();
    let mut b = DataBuffer::new(&gles, BufferKind::Index).unwrap();
    let _t = Texture::new(&gles, TextureKind::Texture2D).unwrap();

    assert_eq!(gles.live_objects(ObjectType::Buffer), 2);
    assert_eq!(
        gles.live_resources(),
        vec![(ObjectType::Buffer, 2), (ObjectType::Texture, 1)]
    );

    b.dispose();
    b.dispose();
    assert_eq!(gles.live_objects(ObjectType::Buffer), 1);
}

#[test]
fn wrappers_over_the_same_handle_are_equal() {
    let (gles, driver) = setup();

    let raw = Texture::new(&gles, TextureKind::Texture2D)
        .unwrap()
        .into_raw();
    assert_eq!(driver.delete_count(raw), 0);

    let a = Texture::from_raw(&gles, TextureKind::Texture2D, raw);
    let b = Texture::from_raw(&gles, TextureKind::Texture2D, raw);
    let other = Texture::new(&gles, TextureKind::Texture2D).unwrap();

    assert_eq!(a, b);
    assert_ne!(a, other);

    let mut set = HashSet::new();
    set.insert(a.handle());
    assert!(!set.insert(b.handle()));

    let mut textures = HashSet::new();
    textures.insert(&a);
    textures.insert(&b);
    textures.insert(&other);
    assert_eq!(textures.len(), 2);
    drop(textures);

    // only one of them may own the native texture
    assert_eq!(b.into_raw(), raw);
    drop(a);

    assert_eq!(driver.delete_count(raw), 1);
    assert_eq!(gles.live_objects(ObjectType::Texture), 1);
}

#[test]
fn into_raw_gives_up_ownership() {
    let (gles, driver) = setup();

    let program = Program::new(&gles).unwrap();
    let raw = program.into_raw();

    assert_ne!(raw, 0);
    assert_eq!(driver.delete_count(raw), 0);
    assert!(driver.is_live(raw));
    assert_eq!(gles.live_objects(ObjectType::Program), 0);
}

#[test]
fn deleting_a_bound_object_clears_its_binding() {
    let (gles, _) = setup();

    let mut buffer = DataBuffer::new(&gles, BufferKind::Index).unwrap();
    buffer.bind().unwrap();
    assert_eq!(gles.bound(BindingSlot::ElementArrayBuffer), buffer.handle());

    buffer.dispose();
    assert_eq!(gles.bound(BindingSlot::ElementArrayBuffer), 0);

    let mut texture = Texture::new(&gles, TextureKind::Texture2D).unwrap();
    texture.bind_to_unit(2).unwrap();
    texture.bind_to_unit(5).unwrap();
    texture.dispose();

    for &unit in &[2, 5] {
        gles.set_active_texture_unit(unit).unwrap();
        assert_eq!(gles.bound(BindingSlot::Texture2D), 0);
    }

    // a new object may reuse slots freely afterwards
    let other = DataBuffer::new(&gles, BufferKind::Index).unwrap();
    other.bind().unwrap();
    assert!(other.is_bound());
}

#[test]
fn deleting_the_active_program_stops_using_it() {
    let (gles, driver) = setup();

    let mut program = common::program(&gles);
    program.use_program().unwrap();
    assert!(program.is_active());

    let before = driver.calls("use_program");
    program.dispose();

    assert_eq!(gles.bound(BindingSlot::Program), 0);
    assert_eq!(driver.calls("use_program"), before + 1);
    assert!(!program.is_active());
}

#[test]
fn failed_creation() {
    let (gles, driver) = setup();

    driver.fail_creation(true);
    let result = Texture::new(&gles, TextureKind::Texture2D);
    driver.fail_creation(false);

    match result {
        Err(GlError::CreationFailed { object, .. }) => assert_eq!(object, ObjectType::Texture),
        other => panic!("unexpected result: {:?}", other),
    }

    assert_eq!(gles.live_objects(ObjectType::Texture), 0);
    assert_eq!(gles.error(), Some(ErrorCode::OutOfMemory));
    assert!(Texture::new(&gles, TextureKind::Texture2D).is_ok());
}

#[test]
fn objects_outlive_the_context() {
    let (gles, driver) = setup();

    let texture = Texture::new(&gles, TextureKind::Texture2D).unwrap();
    let handle = texture.handle();

    drop(gles);
    assert!(driver.is_live(handle));

    drop(texture);
    assert_eq!(driver.delete_count(handle), 1);
}
