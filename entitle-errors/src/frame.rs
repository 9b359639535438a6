//! Call-stack capture

use serde::{Deserialize, Serialize};

/// Placeholder for symbols the platform cannot resolve.
pub const UNKNOWN: &str = "<unknown>";

/// One call site in a captured stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    /// Source file path
    pub file: String,
    /// Demangled function name
    pub func: String,
    /// Line number, 0 when unresolvable
    pub line: u32,
}

impl Frame {
    pub(crate) fn unknown() -> Self {
        Self {
            file: UNKNOWN.to_string(),
            func: UNKNOWN.to_string(),
            line: 0,
        }
    }
}

impl std::fmt::Display for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}:{})", self.func, self.file, self.line)
    }
}

/// Capture the current call stack, outward through callers.
///
/// The capturer's own frames are dropped, so with `skip` 0 the first
/// returned frame is the immediate caller. Each additional `skip` drops
/// one more frame from the top. Capture never fails: unresolvable
/// symbols come back as [`UNKNOWN`] with line 0. Behavior is identical
/// in normal control flow and inside a panic-recovery boundary; the
/// result reflects whatever the stack is at the moment of the call.
#[inline(never)]
pub fn capture_stack(skip: usize) -> Vec<Frame> {
    let trace = backtrace::Backtrace::new();
    let mut frames = Vec::new();
    for frame in trace.frames() {
        for symbol in frame.symbols() {
            let func = symbol
                .name()
                .map(|n| strip_hash(&n.to_string()))
                .unwrap_or_else(|| UNKNOWN.to_string());
            let file = symbol
                .filename()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| UNKNOWN.to_string());
            let line = symbol.lineno().unwrap_or(0);
            frames.push(Frame { file, func, line });
        }
    }

    // Everything up to and including our own frame is capture machinery.
    // If symbols are stripped and the marker never shows, keep the whole
    // trace rather than guessing.
    let start = frames
        .iter()
        .position(|f| f.func.contains("frame::capture_stack"))
        .map(|i| i + 1)
        .unwrap_or(0);
    frames.into_iter().skip(start + skip).collect()
}

/// Drop the trailing `::h0123456789abcdef` disambiguator rustc appends
/// to mangled symbols, keeping the readable path.
fn strip_hash(name: &str) -> String {
    if let Some(idx) = name.rfind("::h") {
        let tail = &name[idx + 3..];
        if tail.len() == 16 && tail.chars().all(|c| c.is_ascii_hexdigit()) {
            return name[..idx].to_string();
        }
    }
    name.to_string()
}
