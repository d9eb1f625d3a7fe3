//! In-process stand-ins for the HTTP client and browser surface

use async_trait::async_trait;
use readyprobe_probes::{BrowserSurface, HttpClient, SurfaceError, TransportError};
use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Surface on which a fixed set of selectors is present
pub struct FakeSurface {
    url: String,
    present: HashSet<String>,
    waits: Mutex<Vec<String>>,
}

impl FakeSurface {
    pub fn new(url: &str, present: &[&str]) -> Self {
        Self {
            url: url.to_string(),
            present: present.iter().map(|s| s.to_string()).collect(),
            waits: Mutex::new(Vec::new()),
        }
    }

    /// Selectors waited on, in order
    pub fn waits(&self) -> Vec<String> {
        self.waits.lock().unwrap().clone()
    }
}

#[async_trait]
impl BrowserSurface for FakeSurface {
    fn current_url(&self) -> String {
        self.url.clone()
    }

    async fn wait_for_selector(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> Result<(), SurfaceError> {
        self.waits.lock().unwrap().push(selector.to_string());
        if self.present.contains(selector) {
            Ok(())
        } else {
            tokio::time::sleep(timeout).await;
            Err(SurfaceError::Timeout {
                timeout_ms: timeout.as_millis() as u64,
            })
        }
    }
}

/// Surface whose browser has gone away
pub struct ClosedSurface;

#[async_trait]
impl BrowserSurface for ClosedSurface {
    fn current_url(&self) -> String {
        "about:blank".to_string()
    }

    async fn wait_for_selector(
        &self,
        _selector: &str,
        _timeout: Duration,
    ) -> Result<(), SurfaceError> {
        Err(SurfaceError::Unavailable("target page closed".to_string()))
    }
}

/// Client answering from a script; the last entry repeats once the script runs out
pub struct ScriptedClient {
    script: Mutex<VecDeque<Result<u16, TransportError>>>,
    last: Mutex<Option<Result<u16, TransportError>>>,
    calls: AtomicUsize,
}

impl ScriptedClient {
    pub fn new(script: Vec<Result<u16, TransportError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            last: Mutex::new(None),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn statuses(statuses: &[u16]) -> Self {
        Self::new(statuses.iter().map(|s| Ok(*s)).collect())
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HttpClient for ScriptedClient {
    async fn get_status(&self, _url: &str) -> Result<u16, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self.script.lock().unwrap().pop_front();
        let mut last = self.last.lock().unwrap();
        match next {
            Some(result) => {
                *last = Some(result.clone());
                result
            }
            None => last.clone().unwrap_or(Ok(200)),
        }
    }
}
