// Controller tying the session state to a colorization backend and to
// whatever shows alerts to the user.

use crate::api::Colorize;
use crate::session::{Completion, SelectedFile, Session};

/// Sink for blocking, user-facing alerts.
pub trait Notify {
    fn alert(&self, message: &str);
}

pub struct App<C, N> {
    session: Session,
    colorizer: C,
    notifier: N,
}

impl<C: Colorize, N: Notify> App<C, N> {
    pub fn new(colorizer: C, notifier: N) -> Self {
        App {
            session: Session::new(),
            colorizer,
            notifier,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Select File: store the file, preview it, drop any old result.
    pub fn select_file(&mut self, file: SelectedFile) {
        log::debug!("selected {} ({} bytes, {})", file.name, file.bytes.len(), file.mime);
        self.session.select_file(file);
    }

    /// Start Colorization. Returns `None` when the action is disabled
    /// (no file, or a request already running).
    pub fn start_colorization(&mut self) -> Option<Completion> {
        let ticket = self.session.begin()?;
        let outcome = self.colorizer.colorize(ticket.file());
        let completion = self.session.finish(ticket, outcome);
        match &completion {
            Completion::Colorized => log::debug!("colorization finished"),
            Completion::Failed(err) => {
                log::warn!("colorization failed: {}", err);
                self.notifier.alert(err.user_message());
            }
            Completion::Superseded => log::debug!("dropping response for a replaced selection"),
        }
        Some(completion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ColorizeError, BACKEND_UNREACHABLE};
    use crate::media::ImageRef;
    use crate::session::Phase;
    use std::cell::{Cell, RefCell};
    use std::sync::Arc;

    /// Backend that returns canned outcomes and counts calls.
    struct Canned {
        outcome: Result<Vec<u8>, ColorizeError>,
        calls: Cell<usize>,
        seen: RefCell<Vec<String>>,
    }

    impl Canned {
        fn ok(bytes: &[u8]) -> Self {
            Canned {
                outcome: Ok(bytes.to_vec()),
                calls: Cell::new(0),
                seen: RefCell::new(Vec::new()),
            }
        }

        fn err(e: ColorizeError) -> Self {
            Canned {
                outcome: Err(e),
                calls: Cell::new(0),
                seen: RefCell::new(Vec::new()),
            }
        }
    }

    impl Colorize for &Canned {
        fn colorize(&self, file: &SelectedFile) -> Result<ImageRef, ColorizeError> {
            self.calls.set(self.calls.get() + 1);
            self.seen.borrow_mut().push(file.name.clone());
            self.outcome
                .clone()
                .map(|b| ImageRef::new("out", "image/png", Arc::from(b)))
        }
    }

    #[derive(Default)]
    struct Recorder(RefCell<Vec<String>>);

    impl Notify for Recorder {
        fn alert(&self, message: &str) {
            self.0.borrow_mut().push(message.to_string());
        }
    }

    fn photo(name: &str) -> SelectedFile {
        SelectedFile::new(name, "image/jpeg", b"grayscale".to_vec())
    }

    #[test]
    fn disabled_without_file() {
        let backend = Canned::ok(b"x");
        let mut app = App::new(&backend, Recorder::default());
        assert_eq!(app.start_colorization(), None);
        assert_eq!(backend.calls.get(), 0);
        assert!(app.notifier().0.borrow().is_empty());
    }

    #[test]
    fn success_shows_exact_bytes() {
        let backend = Canned::ok(b"colored bytes");
        let mut app = App::new(&backend, Recorder::default());
        app.select_file(photo("photo.jpg"));

        assert_eq!(app.start_colorization(), Some(Completion::Colorized));
        assert_eq!(app.session().result().unwrap().bytes(), b"colored bytes");
        assert!(!app.session().is_busy());
        assert_eq!(app.session().phase(), Phase::Done);
        assert!(app.notifier().0.borrow().is_empty());
        assert_eq!(*backend.seen.borrow(), vec!["photo.jpg".to_string()]);
    }

    #[test]
    fn failure_alerts_exactly_once() {
        let backend = Canned::err(ColorizeError::Server { status: 500 });
        let mut app = App::new(&backend, Recorder::default());
        app.select_file(photo("photo.png"));

        let done = app.start_colorization();
        assert!(matches!(done, Some(Completion::Failed(ColorizeError::Server { status: 500 }))));
        assert_eq!(*app.notifier().0.borrow(), vec![BACKEND_UNREACHABLE.to_string()]);
        assert!(!app.session().is_busy());
        assert!(app.session().result().is_none());
        assert_eq!(app.session().phase(), Phase::Ready);
    }

    #[test]
    fn can_retry_after_failure() {
        let backend = Canned::err(ColorizeError::Network("refused".into()));
        let mut app = App::new(&backend, Recorder::default());
        app.select_file(photo("photo.png"));
        app.start_colorization();
        app.start_colorization();
        assert_eq!(backend.calls.get(), 2);
        assert_eq!(app.notifier().0.borrow().len(), 2);
    }
}
