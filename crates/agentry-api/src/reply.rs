//! Terminal reply sink.

use std::sync::{Arc, Mutex};

use agentry_core::hub::ReplySink;

/// Reply sink that prints each builder message as it arrives and keeps a
/// copy for machine-readable output at the end of the turn.
///
/// Cloning shares the record, so the CLI holds one handle while the turn
/// controller owns another.
#[derive(Clone)]
pub struct ConsoleReplySink {
    records: Arc<Mutex<Vec<String>>>,
    echo: bool,
}

impl ConsoleReplySink {
    /// `echo: false` suppresses live printing; used for `--json`, where the
    /// collected replies are printed once at the end instead.
    pub fn new(echo: bool) -> Self {
        Self {
            records: Arc::new(Mutex::new(Vec::new())),
            echo,
        }
    }

    /// Every reply sent so far, in order.
    pub fn replies(&self) -> Vec<String> {
        self.records.lock().expect("reply lock poisoned").clone()
    }
}

impl ReplySink for ConsoleReplySink {
    fn add_reply(&self, text: &str) {
        if self.echo {
            println!();
            println!("{text}");
        }
        self.records
            .lock()
            .expect("reply lock poisoned")
            .push(text.to_string());
    }
}
