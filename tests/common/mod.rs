//! Helpers shared by the integration tests.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

static NEXT_DIR: AtomicUsize = AtomicUsize::new(0);

/// A throwaway resource root under the system temp directory.
pub struct ResourceDir {
    path: PathBuf,
}

impl ResourceDir {
    pub fn new() -> Self {
        let path = std::env::temp_dir().join(format!(
            "hearth-test-{}-{}",
            std::process::id(),
            NEXT_DIR.fetch_add(1, Ordering::SeqCst)
        ));
        std::fs::create_dir_all(&path).unwrap();
        Self { path }
    }

    pub fn with_file(self, name: &str, contents: &[u8]) -> Self {
        let file = self.path.join(name);
        if let Some(parent) = file.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(file, contents).unwrap();
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ResourceDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}

/// Splits a serialized response into its head text and body bytes.
pub fn split_response(raw: &[u8]) -> (String, Vec<u8>) {
    let end = raw
        .windows(3)
        .position(|w| w == b"\n\r\n")
        .expect("response head terminator");
    let head = String::from_utf8(raw[..end + 1].to_vec()).unwrap();
    (head, raw[end + 3..].to_vec())
}

/// Looks up a header line (`Name: value\n`) in a serialized head.
pub fn head_header<'a>(head: &'a str, name: &str) -> Option<&'a str> {
    head.lines()
        .skip(1)
        .filter_map(|line| line.split_once(": "))
        .find(|(k, _)| *k == name)
        .map(|(_, v)| v)
}

/// Decodes a chunked body, returning the payload and the number of
/// non-terminal chunks. Panics on malformed framing.
pub fn decode_chunked(mut raw: &[u8]) -> (Vec<u8>, usize) {
    let mut out = Vec::new();
    let mut chunks = 0;
    loop {
        let line_end = raw.windows(2).position(|w| w == b"\r\n").expect("size line");
        let size = usize::from_str_radix(std::str::from_utf8(&raw[..line_end]).unwrap(), 16).unwrap();
        raw = &raw[line_end + 2..];
        if size == 0 {
            assert_eq!(raw, b"\r\n", "terminal chunk must end with an empty trailer");
            return (out, chunks);
        }
        out.extend_from_slice(&raw[..size]);
        assert_eq!(&raw[size..size + 2], b"\r\n");
        raw = &raw[size + 2..];
        chunks += 1;
    }
}
