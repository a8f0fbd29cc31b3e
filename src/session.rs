// Upload session state.
//
// `Session` is the whole UI state of one run: the selected file, its
// preview, the last colorized result and the busy flag. The phase shown
// to the user is derived from those fields, never stored separately.

use crate::error::ColorizeError;
use crate::media::{self, ImageRef};
use std::path::Path;
use std::sync::Arc;

/// The image the user picked, read fully into memory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub mime: String,
    pub bytes: Arc<[u8]>,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, mime: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        SelectedFile {
            name: name.into(),
            mime: mime.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a file from disk. The MIME type comes from the extension.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("image")
            .to_string();
        let mime = media::image_mime_for_path(path).unwrap_or(media::FALLBACK_MIME);
        Ok(SelectedFile::new(name, mime, bytes))
    }

    /// File name without its extension, used to name saved results.
    pub fn stem(&self) -> &str {
        Path::new(&self.name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(&self.name)
    }

    fn preview(&self) -> ImageRef {
        ImageRef::new(self.name.clone(), self.mime.clone(), Arc::clone(&self.bytes))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Nothing selected yet.
    Idle,
    /// A file is selected and no request is running.
    Ready,
    /// A request is in flight.
    Loading,
    /// A colorized result is available.
    Done,
}

/// Proof that a request was started. Handed back to `Session::finish`
/// so the response can be matched with the selection it was made for.
#[derive(Debug)]
pub struct Ticket {
    generation: u64,
    file: SelectedFile,
}

impl Ticket {
    pub fn file(&self) -> &SelectedFile {
        &self.file
    }
}

/// What `Session::finish` did with a response.
#[derive(Debug, PartialEq, Eq)]
pub enum Completion {
    /// The result was stored.
    Colorized,
    /// The request failed; the user must be told.
    Failed(ColorizeError),
    /// A newer file was selected while the request ran; outcome dropped.
    Superseded,
}

#[derive(Debug, Default)]
pub struct Session {
    file: Option<SelectedFile>,
    preview: Option<ImageRef>,
    result: Option<ImageRef>,
    busy: bool,
    generation: u64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        if self.busy {
            Phase::Loading
        } else if self.result.is_some() {
            Phase::Done
        } else if self.file.is_some() {
            Phase::Ready
        } else {
            Phase::Idle
        }
    }

    pub fn file(&self) -> Option<&SelectedFile> {
        self.file.as_ref()
    }

    pub fn preview(&self) -> Option<&ImageRef> {
        self.preview.as_ref()
    }

    pub fn result(&self) -> Option<&ImageRef> {
        self.result.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// The action control is enabled only with a file and nothing in flight.
    pub fn can_colorize(&self) -> bool {
        self.file.is_some() && !self.busy
    }

    /// Replace the selection. The old preview and any result are dropped,
    /// and a request still in flight becomes stale.
    pub fn select_file(&mut self, file: SelectedFile) {
        self.generation += 1;
        self.preview = Some(file.preview());
        self.file = Some(file);
        self.result = None;
    }

    /// Mark a request as started. Returns `None` (and changes nothing)
    /// when there is no file or a request is already running.
    pub fn begin(&mut self) -> Option<Ticket> {
        if !self.can_colorize() {
            return None;
        }
        let file = self.file.clone()?;
        self.busy = true;
        Some(Ticket {
            generation: self.generation,
            file,
        })
    }

    /// Apply the outcome of a request. Busy is always cleared.
    pub fn finish(&mut self, ticket: Ticket, outcome: Result<ImageRef, ColorizeError>) -> Completion {
        self.busy = false;
        if ticket.generation != self.generation {
            return Completion::Superseded;
        }
        match outcome {
            Ok(result) => {
                self.result = Some(result);
                Completion::Colorized
            }
            Err(err) => Completion::Failed(err),
        }
    }
}
