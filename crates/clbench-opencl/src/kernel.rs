//! Kernel source loading and compilation.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{OpenClError, Result};

/// Default kernel file, resolved against the working directory.
pub const KERNEL_FILE: &str = "vector_add_kernel.cl";

/// Entry point compiled and dispatched by the benchmark.
pub const KERNEL_NAME: &str = "vector_add";

/// Upper bound on the number of source bytes read from disk.
pub const MAX_SOURCE_SIZE: usize = 0x10_0000;

/// Built-in copy of `vector_add_kernel.cl`.
pub const VECTOR_ADD_SOURCE: &str = r#"__kernel void vector_add(__global const int *A, __global const int *B, __global int *C) {

    // Get the index of the current element to be processed
    int i = get_global_id(0);

    // Do the operation
    C[i] = A[i] + B[i];
}
"#;

/// OpenCL C source text loaded from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KernelSource {
    path: PathBuf,
    text: String,
    truncated: bool,
}

impl KernelSource {
    /// Read at most [`MAX_SOURCE_SIZE`] bytes of kernel source from `path`.
    ///
    /// # Errors
    ///
    /// Returns [`OpenClError::KernelSourceNotFound`] when the file cannot be
    /// opened, [`OpenClError::KernelSourceRead`] on a read failure and
    /// [`OpenClError::KernelSourceEncoding`] when the bytes are not UTF-8.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| OpenClError::KernelSourceNotFound {
            path: path.to_path_buf(),
            source,
        })?;

        // One extra byte tells us whether the file was longer than the limit.
        let mut bytes = Vec::new();
        file.take(MAX_SOURCE_SIZE as u64 + 1).read_to_end(&mut bytes).map_err(|source| {
            OpenClError::KernelSourceRead { path: path.to_path_buf(), source }
        })?;

        let truncated = bytes.len() > MAX_SOURCE_SIZE;
        if truncated {
            warn!(
                "kernel source {} exceeds {} bytes; only the first {} bytes are used",
                path.display(),
                MAX_SOURCE_SIZE,
                MAX_SOURCE_SIZE
            );
            bytes.truncate(MAX_SOURCE_SIZE);
        }

        let text = String::from_utf8(bytes)
            .map_err(|_| OpenClError::KernelSourceEncoding { path: path.to_path_buf() })?;

        debug!("loaded {} bytes of kernel source from {}", text.len(), path.display());
        Ok(Self { path: path.to_path_buf(), text, truncated })
    }

    /// Wrap in-memory source text, e.g. [`VECTOR_ADD_SOURCE`].
    pub fn from_text(text: impl Into<String>) -> Self {
        Self { path: PathBuf::from("<builtin>"), text: text.into(), truncated: false }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether the file on disk was longer than [`MAX_SOURCE_SIZE`].
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// Whether the source declares a `__kernel` function called `name`.
    ///
    /// Scans identifier tokens across the whole source, so declarations that
    /// span lines or carry `__attribute__((...))` qualifiers are recognised.
    /// Comments are skipped. This is advisory only; the driver remains the
    /// authority when the kernel is created.
    pub fn declares_kernel(&self, name: &str) -> bool {
        let tokens = tokenize(&self.text);
        let mut qualified = false;
        let mut i = 0;
        while i < tokens.len() {
            match tokens[i] {
                Token::Ident("__kernel" | "kernel") => qualified = true,
                Token::Ident("__attribute__") => {
                    i = skip_parens(&tokens, i + 1);
                    continue;
                }
                Token::Ident(ident) if tokens.get(i + 1) == Some(&Token::Punct('(')) => {
                    if qualified && ident == name {
                        return true;
                    }
                    qualified = false;
                }
                Token::Punct(';' | '{' | '}') => qualified = false,
                _ => {}
            }
            i += 1;
        }
        false
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
    Ident(&'a str),
    Punct(char),
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn tokenize(src: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut rest = src;
    while let Some(c) = rest.chars().next() {
        if rest.starts_with("//") {
            rest = rest.find('\n').map_or("", |i| &rest[i..]);
        } else if rest.starts_with("/*") {
            rest = rest[2..].find("*/").map_or("", |i| &rest[i + 4..]);
        } else if is_ident_char(c) {
            let end = rest.find(|c: char| !is_ident_char(c)).unwrap_or(rest.len());
            tokens.push(Token::Ident(&rest[..end]));
            rest = &rest[end..];
        } else {
            if !c.is_whitespace() {
                tokens.push(Token::Punct(c));
            }
            rest = &rest[c.len_utf8()..];
        }
    }
    tokens
}

/// Index just past the balanced `( ... )` group starting at `start`, or
/// `start` itself when no group opens there.
fn skip_parens(tokens: &[Token<'_>], start: usize) -> usize {
    if tokens.get(start) != Some(&Token::Punct('(')) {
        return start;
    }
    let mut depth = 0usize;
    for (offset, token) in tokens[start..].iter().enumerate() {
        match token {
            Token::Punct('(') => depth += 1,
            Token::Punct(')') => {
                depth -= 1;
                if depth == 0 {
                    return start + offset + 1;
                }
            }
            _ => {}
        }
    }
    tokens.len()
}

#[cfg(feature = "opencl-runtime")]
pub use runtime::compile;

#[cfg(feature = "opencl-runtime")]
mod runtime {
    use opencl3::context::Context;
    use opencl3::kernel::Kernel;
    use opencl3::program::Program;
    use tracing::trace;

    use super::{KernelSource, KERNEL_NAME};
    use crate::error::{OpenClError, Result};

    /// Create a program from `source`, build it for the context's devices
    /// and create the [`KERNEL_NAME`] kernel.
    ///
    /// The program is returned alongside the kernel because the kernel
    /// must not outlive it.
    pub fn compile(context: &Context, source: &KernelSource) -> Result<(Program, Kernel)> {
        let program = Program::create_and_build_from_source(context, source.text(), "")
            .map_err(|log| OpenClError::KernelCompileFailed {
                kernel_name: KERNEL_NAME.into(),
                log,
            })?;
        trace!("built program from {}", source.path().display());

        let kernel = Kernel::create(&program, KERNEL_NAME).map_err(|e| {
            OpenClError::KernelCompileFailed { kernel_name: KERNEL_NAME.into(), log: e.to_string() }
        })?;

        Ok((program, kernel))
    }
}
