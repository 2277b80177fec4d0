// ClassDesk - platform/fs.rs
//
// Small filesystem and desktop-integration helpers: atomic file writes,
// opening URLs in the system browser, and revealing exported files.
//
// Launch failures are logged at WARN level and returned to the caller; the
// spawned processes are never waited on so the UI never blocks.

use std::io;
use std::path::Path;
use std::process::Command;

/// Write `bytes` to `path` atomically (write sibling temp file, then rename).
///
/// Creates parent directories as needed. A crash between write and rename
/// loses the new contents but never corrupts the previous file.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp = path.with_file_name(tmp_name);

    std::fs::write(&tmp, bytes)?;
    std::fs::rename(&tmp, path).inspect_err(|_| {
        let _ = std::fs::remove_file(&tmp);
    })
}

/// Desktop family, for picking the URL handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Desktop {
    Windows,
    MacOs,
    Unix,
}

impl Desktop {
    fn current() -> Self {
        if cfg!(target_os = "windows") {
            Self::Windows
        } else if cfg!(target_os = "macos") {
            Self::MacOs
        } else {
            Self::Unix
        }
    }
}

/// Program and arguments that hand `target` to the desktop's default
/// handler. The target is always a single argument and no shell is involved.
fn opener(desktop: Desktop, target: &str) -> (&'static str, Vec<String>) {
    match desktop {
        Desktop::Windows => (
            "rundll32",
            vec!["url.dll,FileProtocolHandler".to_string(), target.to_string()],
        ),
        Desktop::MacOs => ("open", vec![target.to_string()]),
        Desktop::Unix => ("xdg-open", vec![target.to_string()]),
    }
}

/// Open an http(s) URL in the system browser.
pub fn open_in_browser(url: &url::Url) -> io::Result<()> {
    if !matches!(url.scheme(), "http" | "https") {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("refusing to open non-web URL scheme '{}'", url.scheme()),
        ));
    }
    let (program, args) = opener(Desktop::current(), url.as_str());
    Command::new(program)
        .args(&args)
        .spawn()
        .map(|_| tracing::debug!(host = url.host_str().unwrap_or(""), "Opened URL in browser"))
        .inspect_err(|e| tracing::warn!(error = %e, "Failed to launch browser"))
}

/// Open the folder containing `path` in the system file manager.
///
/// Windows and macOS select the file itself; Linux file managers have no
/// standard per-file selection, so the parent directory is opened.
pub fn reveal_in_file_manager(path: &Path) -> io::Result<()> {
    #[cfg(target_os = "windows")]
    let mut cmd = {
        // `/select,<path>` must be a single argument with no space after the comma.
        let mut cmd = Command::new("explorer");
        cmd.arg(format!("/select,{}", path.display()));
        cmd
    };
    #[cfg(target_os = "macos")]
    let mut cmd = {
        let mut cmd = Command::new("open");
        cmd.arg("-R").arg(path);
        cmd
    };
    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    let mut cmd = {
        let mut cmd = Command::new("xdg-open");
        cmd.arg(path.parent().unwrap_or(path));
        cmd
    };

    cmd.spawn().map(|_| ()).inspect_err(|e| {
        tracing::warn!(
            path = %path.display(),
            error = %e,
            "Failed to reveal file in file manager"
        )
    })
}
