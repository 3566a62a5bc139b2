#![cfg(any(debug_assertions, feature = "diagnostics"))]

mod common;

use std::io::{self, Write};
use std::sync::{Mutex, Once};

use gles2_glow::driver::mock::MockDriver;
use gles2_glow::{Context, Gles, Uniform, VertexAttribute};

static LOGS: Mutex<Vec<u8>> = Mutex::new(Vec::new());
static INIT: Once = Once::new();

struct Capture;

impl Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        LOGS.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn setup() -> Gles {
    INIT.call_once(|| {
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Debug)
            .format(|buf, record| writeln!(buf, "{} {}", record.level(), record.args()))
            .target(env_logger::Target::Pipe(Box::new(Capture)))
            .init();
    });

    Gles::from_context(Context::from_driver(MockDriver::new())).unwrap()
}

fn logged(line: &str) -> bool {
    let logs = LOGS.lock().unwrap();
    String::from_utf8_lossy(&logs).lines().any(|l| l.starts_with(line))
}

#[test]
fn missing_uniform_is_warned() {
    let gles = setup();
    let program = common::program(&gles);

    let missing = Uniform::new(&program, "u_missing").unwrap();
    assert!(!missing.is_found());

    assert!(logged(&format!(
        "WARN uniform u_missing not found in program {}",
        program.handle()
    )));
}

#[test]
fn missing_attribute_is_warned() {
    let gles = setup();
    let program = common::program(&gles);

    let missing = VertexAttribute::new(&program, "a_missing").unwrap();
    assert_eq!(missing.location(), -1);

    assert!(logged(&format!(
        "WARN vertex attribute a_missing not found in program {}",
        program.handle()
    )));
}

#[test]
fn found_names_are_not_warned() {
    let gles = setup();
    let program = common::program(&gles);

    assert!(Uniform::new(&program, "u_f4").unwrap().is_found());
    VertexAttribute::new(&program, "a_uv").unwrap();

    assert!(!logged("WARN uniform u_f4 not found"));
    assert!(!logged("WARN vertex attribute a_uv not found"));
}
