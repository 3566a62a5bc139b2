mod common;

use common::setup;
use gles2_glow::{BindingSlot, ErrorCode, GlError, Uniform, ValueType};

#[test]
fn float_round_trips() {
    let (gles, _) = setup();
    let program = common::program(&gles);
    program.use_program().unwrap();

    let f1 = Uniform::new(&program, "u_f1").unwrap();
    let f2 = Uniform::new(&program, "u_f2").unwrap();
    let f3 = Uniform::new(&program, "u_f3").unwrap();
    let f4 = Uniform::new(&program, "u_f4").unwrap();

    f1.set(0.5f32).unwrap();
    f2.set([1f32, 2.]).unwrap();
    f3.set([1f32, 2., 3.]).unwrap();
    f4.set([1f32, 2., 3., 4.]).unwrap();

    assert_eq!(f1.get::<f32>().unwrap(), 0.5);
    assert_eq!(f2.get::<[f32; 2]>().unwrap(), [1., 2.]);
    assert_eq!(f3.get::<[f32; 3]>().unwrap(), [1., 2., 3.]);
    assert_eq!(f4.get::<[f32; 4]>().unwrap(), [1., 2., 3., 4.]);
}

#[test]
fn int_round_trips() {
    let (gles, _) = setup();
    let program = common::program(&gles);
    program.use_program().unwrap();

    let i1 = Uniform::new(&program, "u_i1").unwrap();
    let i2 = Uniform::new(&program, "u_i2").unwrap();
    let i3 = Uniform::new(&program, "u_i3").unwrap();
    let i4 = Uniform::new(&program, "u_i4").unwrap();
    let sampler = Uniform::new(&program, "u_sampler").unwrap();

    i1.set(-7).unwrap();
    i2.set([1, -2]).unwrap();
    i3.set([1, 2, 3]).unwrap();
    i4.set([4, 3, 2, 1]).unwrap();
    sampler.set(3).unwrap();

    assert_eq!(i1.get::<i32>().unwrap(), -7);
    assert_eq!(i2.get::<[i32; 2]>().unwrap(), [1, -2]);
    assert_eq!(i3.get::<[i32; 3]>().unwrap(), [1, 2, 3]);
    assert_eq!(i4.get::<[i32; 4]>().unwrap(), [4, 3, 2, 1]);
    assert_eq!(sampler.get::<i32>().unwrap(), 3);
}

#[test]
fn bool_round_trips() {
    let (gles, _) = setup();
    let program = common::program(&gles);
    program.use_program().unwrap();

    let flag = Uniform::new(&program, "u_flag").unwrap();
    assert!(!flag.get::<bool>().unwrap());

    flag.set(true).unwrap();
    assert!(flag.get::<bool>().unwrap());

    flag.set(false).unwrap();
    assert!(!flag.get::<bool>().unwrap());
}

#[test]
fn matrix_round_trips() {
    let (gles, _) = setup();
    let program = common::program(&gles);
    program.use_program().unwrap();

    let m2 = Uniform::new(&program, "u_m2").unwrap();
    let m3 = Uniform::new(&program, "u_m3").unwrap();
    let mvp = Uniform::new(&program, "u_mvp").unwrap();

    let identity3: [[f32; 3]; 3] = [[1., 0., 0.], [0., 1., 0.], [0., 0., 1.]];
    let translation: [[f32; 4]; 4] = [
        [1., 0., 0., 0.],
        [0., 1., 0., 0.],
        [0., 0., 1., 0.],
        [2., 3., 4., 1.],
    ];

    m2.set([[1f32, 2.], [3., 4.]]).unwrap();
    m3.set(identity3).unwrap();
    mvp.set(translation).unwrap();

    assert_eq!(m2.get::<[[f32; 2]; 2]>().unwrap(), [[1., 2.], [3., 4.]]);
    assert_eq!(m3.get::<[[f32; 3]; 3]>().unwrap(), identity3);
    assert_eq!(mvp.get::<[[f32; 4]; 4]>().unwrap(), translation);
}

#[test]
fn array_elements() {
    let (gles, driver) = setup();
    let program = common::program(&gles);
    program.use_program().unwrap();

    let weights = Uniform::new(&program, "u_weights").unwrap();
    assert_eq!(weights.name(), "u_weights");

    let before = driver.calls("uniform_f32");
    weights.set_slice(&[0.1f32, 0.2, 0.3, 0.4]).unwrap();

    assert_eq!(driver.calls("uniform_f32"), before + 1);
    assert_eq!(weights.get::<f32>().unwrap(), 0.1);
}

#[test]
fn missing_uniforms_are_ignored() {
    let (gles, driver) = setup();
    let program = common::program(&gles);
    program.use_program().unwrap();

    let missing = Uniform::new(&program, "u_missing").unwrap();
    assert!(!missing.is_found());
    assert_eq!(missing.location(), -1);

    let before = driver.calls("uniform_f32");
    missing.set(1.0f32).unwrap();
    missing.set_slice(&[1.0f32, 2.0]).unwrap();

    assert_eq!(driver.calls("uniform_f32"), before);
    assert_eq!(gles.error(), None);
}

#[test]
fn missing_uniforms_read_as_zero() {
    let (gles, driver) = setup();
    let program = common::program(&gles);
    program.use_program().unwrap();

    let missing = Uniform::new(&program, "u_missing").unwrap();
    assert_eq!(missing.ty(), None);

    assert_eq!(missing.get::<[[f32; 4]; 4]>().unwrap(), [[0.; 4]; 4]);
    assert_eq!(missing.get::<i32>().unwrap(), 0);
    assert_eq!(driver.calls("get_uniform_f32"), 0);
    assert_eq!(driver.calls("get_uniform_i32"), 0);
    assert_eq!(gles.error(), None);
}

#[test]
fn declared_types_are_recorded() {
    let (gles, _) = setup();
    let program = common::program(&gles);

    let mvp = Uniform::new(&program, "u_mvp").unwrap();
    let weights = Uniform::new(&program, "u_weights").unwrap();
    let sampler = Uniform::new(&program, "u_sampler").unwrap();

    assert_eq!(mvp.ty(), Some(ValueType::FloatMat4));
    assert_eq!(weights.ty(), Some(ValueType::Float));
    assert_eq!(sampler.ty(), Some(ValueType::Sampler2D));
}

#[test]
fn reads_must_match_the_declared_size() {
    let (gles, driver) = setup();
    let program = common::program(&gles);
    program.use_program().unwrap();

    let mvp = Uniform::new(&program, "u_mvp").unwrap();
    let f2 = Uniform::new(&program, "u_f2").unwrap();

    assert_eq!(
        mvp.get::<f32>(),
        Err(GlError::UniformMismatch {
            name: "u_mvp".to_owned(),
            requested: "f32",
        })
    );
    assert!(matches!(
        f2.get::<[f32; 4]>(),
        Err(GlError::UniformMismatch { .. })
    ));
    assert_eq!(driver.calls("get_uniform_f32"), 0);

    assert_eq!(f2.get::<[f32; 2]>().unwrap(), [0., 0.]);
    assert_eq!(driver.calls("get_uniform_f32"), 1);
}

#[test]
fn locations_are_stable_across_lookups() {
    let (gles, _) = setup();
    let program = common::program(&gles);

    let a = Uniform::new(&program, "u_f4").unwrap();
    let b = Uniform::new(&program, "u_f4").unwrap();

    assert!(a.is_found());
    assert_eq!(a.location(), b.location());
}

#[cfg(any(debug_assertions, feature = "diagnostics"))]
#[test]
fn setting_requires_the_active_program() {
    let (gles, driver) = setup();
    let program = common::program(&gles);
    let f1 = Uniform::new(&program, "u_f1").unwrap();

    assert_eq!(
        f1.set(1.0f32),
        Err(gles2_glow::GlError::NotBound {
            op: "glUniform",
            slot: BindingSlot::Program,
            expected: program.handle(),
            current: 0,
        })
    );
    assert_eq!(driver.calls("uniform_f32"), 0);

    // also for uniforms the program doesn't have
    let missing = Uniform::new(&program, "u_missing").unwrap();
    assert!(missing.set(1.0f32).is_err());
}

#[cfg(any(debug_assertions, feature = "diagnostics"))]
#[test]
fn type_mismatch_is_a_driver_error() {
    let (gles, _) = setup();
    let program = common::program(&gles);
    program.use_program().unwrap();

    let f4 = Uniform::new(&program, "u_f4").unwrap();

    assert_eq!(
        f4.set(1).unwrap_err().error_code(),
        Some(ErrorCode::InvalidOperation)
    );
}

#[cfg(not(any(debug_assertions, feature = "diagnostics")))]
#[test]
fn setting_without_the_active_program_reaches_the_driver() {
    let (gles, driver) = setup();
    let program = common::program(&gles);
    let f1 = Uniform::new(&program, "u_f1").unwrap();

    assert_eq!(f1.set(1.0f32), Ok(()));
    assert_eq!(driver.calls("uniform_f32"), 1);
    assert_eq!(gles.bound(BindingSlot::Program), 0);
    assert_eq!(gles.error(), Some(ErrorCode::InvalidOperation));
}
