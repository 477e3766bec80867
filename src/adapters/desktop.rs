//! Desktop conveniences: clipboard and browser
//!
//! Both are optional. The defaults report themselves unavailable and the
//! caller falls back to printing instructions, so headless hosts work
//! without special-casing.

use crate::domain::{Result, TaggerError};
use std::process::Command;
use std::sync::Mutex;

/// Places text on the system clipboard
pub trait Clipboard: Send + Sync {
    /// Copy `text` to the clipboard
    fn copy_text(&self, text: &str) -> Result<()>;
}

/// Opens URLs for the user
pub trait BrowserLauncher: Send + Sync {
    /// Open `url` in a new browser tab
    fn open(&self, url: &str) -> Result<()>;
}

/// Clipboard that is never available
#[derive(Debug, Default, Clone, Copy)]
pub struct NoClipboard;

impl Clipboard for NoClipboard {
    fn copy_text(&self, _text: &str) -> Result<()> {
        Err(TaggerError::Other("clipboard access is not available".to_string()))
    }
}

/// The system clipboard
///
/// On X11 the copied text is served by this process, so keep the value
/// alive until the user has pasted.
pub struct SystemClipboard {
    inner: Mutex<arboard::Clipboard>,
}

impl SystemClipboard {
    /// Connect to the system clipboard
    ///
    /// # Errors
    ///
    /// Fails when no clipboard is reachable, e.g. over SSH or in CI.
    pub fn connect() -> Result<Self> {
        let clipboard = arboard::Clipboard::new()
            .map_err(|e| TaggerError::Other(format!("clipboard unavailable: {e}")))?;
        Ok(Self {
            inner: Mutex::new(clipboard),
        })
    }
}

impl Clipboard for SystemClipboard {
    fn copy_text(&self, text: &str) -> Result<()> {
        let mut clipboard = self
            .inner
            .lock()
            .map_err(|_| TaggerError::Other("clipboard lock poisoned".to_string()))?;
        clipboard
            .set_text(text.to_string())
            .map_err(|e| TaggerError::Other(format!("failed to copy to clipboard: {e}")))
    }
}

/// Browser launcher that never opens anything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoBrowser;

impl BrowserLauncher for NoBrowser {
    fn open(&self, _url: &str) -> Result<()> {
        Err(TaggerError::Other("browser launching is disabled".to_string()))
    }
}

/// Opens URLs with the platform's default handler
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemBrowser;

impl BrowserLauncher for SystemBrowser {
    fn open(&self, url: &str) -> Result<()> {
        let mut command = opener_command(url);
        let status = command
            .status()
            .map_err(|e| TaggerError::Other(format!("failed to launch browser: {e}")))?;
        if !status.success() {
            return Err(TaggerError::Other(format!(
                "browser launcher exited with {status}"
            )));
        }
        Ok(())
    }
}

#[cfg(target_os = "macos")]
fn opener_command(url: &str) -> Command {
    let mut command = Command::new("open");
    command.arg(url);
    command
}

#[cfg(target_os = "windows")]
fn opener_command(url: &str) -> Command {
    let mut command = Command::new("cmd");
    command.args(["/C", "start", "", url]);
    command
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn opener_command(url: &str) -> Command {
    let mut command = Command::new("xdg-open");
    command.arg(url);
    command
}

/// The desktop capabilities chosen at startup
pub struct Desktop {
    /// Clipboard capability
    pub clipboard: Box<dyn Clipboard>,
    /// Browser capability
    pub browser: Box<dyn BrowserLauncher>,
}

impl Desktop {
    /// No clipboard, no browser
    pub fn headless() -> Self {
        Self {
            clipboard: Box::new(NoClipboard),
            browser: Box::new(NoBrowser),
        }
    }

    /// Capabilities for an interactive session
    ///
    /// Uses the system clipboard when one can be reached.
    pub fn detect(open_browser: bool) -> Self {
        let browser: Box<dyn BrowserLauncher> = if open_browser {
            Box::new(SystemBrowser)
        } else {
            Box::new(NoBrowser)
        };
        let clipboard: Box<dyn Clipboard> = match SystemClipboard::connect() {
            Ok(clipboard) => Box::new(clipboard),
            Err(e) => {
                tracing::debug!(error = %e, "Falling back to printed instructions");
                Box::new(NoClipboard)
            }
        };
        Self { clipboard, browser }
    }
}
