//! Browser surface capability
//!
//! The element probe never drives a browser itself. It only needs something
//! that can wait for a selector to attach within a window, which is what any
//! automation backend (CDP, WebDriver, an in-process fake) can provide.

use async_trait::async_trait;
use std::time::Duration;

use crate::error::SurfaceError;

/// A page that can be asked whether an element exists
#[async_trait]
pub trait BrowserSurface: Send + Sync {
    /// URL of the page currently loaded, used in diagnostics
    fn current_url(&self) -> String;

    /// Wait until an element matching `selector` is attached, or `timeout` elapses
    ///
    /// Implementations poll on their own; a single call is a whole wait window.
    async fn wait_for_selector(&self, selector: &str, timeout: Duration)
        -> Result<(), SurfaceError>;
}

#[async_trait]
impl<T: BrowserSurface + ?Sized> BrowserSurface for std::sync::Arc<T> {
    fn current_url(&self) -> String {
        (**self).current_url()
    }

    async fn wait_for_selector(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> Result<(), SurfaceError> {
        (**self).wait_for_selector(selector, timeout).await
    }
}
