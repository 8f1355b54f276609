//! Clipboard writes that work in secure and insecure contexts alike.
//!
//! Callers only see [`Clipboard::copy`], which never fails: a privileged write
//! is attempted when allowed, and anything else goes through the legacy
//! select-and-copy technique.

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClipboardError {
    #[error("clipboard API is not available")]
    Unavailable,
    #[error("clipboard API requires a secure context")]
    InsecureContext,
    #[error("clipboard write was denied: {0}")]
    Denied(String),
    #[error("could not create the copy container: {0}")]
    Container(String),
    #[error("legacy copy command was rejected")]
    CommandRejected,
}

/// What happened to a copy request. Only used to decide whether to show the
/// confirmation label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    Privileged,
    Legacy,
    Failed,
}

impl CopyOutcome {
    pub fn is_copied(self) -> bool {
        !matches!(self, CopyOutcome::Failed)
    }
}

/// The host's asynchronous, permission-gated clipboard API.
#[async_trait(?Send)]
pub trait PrivilegedClipboard {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// The host's synchronous selection-based copy mechanism.
pub trait LegacyCopyTarget {
    type Container;

    /// Attaches an off-screen, read-only text container holding `text`.
    fn insert_container(&mut self, text: &str) -> Result<Self::Container, ClipboardError>;
    fn select_contents(&mut self, container: &Self::Container);
    fn exec_copy(&mut self) -> Result<(), ClipboardError>;
    fn remove_container(&mut self, container: Self::Container);
}

#[async_trait(?Send)]
pub trait Clipboard {
    async fn copy(&mut self, text: &str) -> CopyOutcome;
}

pub struct ClipboardAdapter<P, L> {
    privileged: Option<P>,
    secure_context: bool,
    legacy: L,
}

impl<P, L> ClipboardAdapter<P, L>
where
    P: PrivilegedClipboard,
    L: LegacyCopyTarget,
{
    pub fn new(privileged: Option<P>, secure_context: bool, legacy: L) -> Self {
        Self {
            privileged,
            secure_context,
            legacy,
        }
    }

    /// An adapter that always uses the legacy technique.
    pub fn legacy_only(legacy: L) -> Self {
        Self::new(None, false, legacy)
    }

    async fn write_privileged(&self, text: &str) -> Result<(), ClipboardError> {
        let api = self.privileged.as_ref().ok_or(ClipboardError::Unavailable)?;
        if !self.secure_context {
            return Err(ClipboardError::InsecureContext);
        }
        api.write_text(text).await
    }

    fn write_legacy(&mut self, text: &str) -> Result<(), ClipboardError> {
        let container = self.legacy.insert_container(text)?;
        self.legacy.select_contents(&container);
        let result = self.legacy.exec_copy();
        // The container goes away whether or not the command succeeded.
        self.legacy.remove_container(container);
        result
    }
}

#[async_trait(?Send)]
impl<P, L> Clipboard for ClipboardAdapter<P, L>
where
    P: PrivilegedClipboard,
    L: LegacyCopyTarget,
{
    async fn copy(&mut self, text: &str) -> CopyOutcome {
        match self.write_privileged(text).await {
            Ok(()) => return CopyOutcome::Privileged,
            Err(e) => debug!(error = %e, "Falling back to legacy copy"),
        }
        match self.write_legacy(text) {
            Ok(()) => CopyOutcome::Legacy,
            Err(e) => {
                warn!(error = %e, "Clipboard copy failed");
                CopyOutcome::Failed
            }
        }
    }
}
