//! Passing data to a page through the navigation event channel instead of
//! url parameters.

use std::future::Future;

use futures::channel::oneshot;
use pagekit_core::{Error, Result};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::{Host, Page};

pub type Payload = Map<String, Value>;

#[derive(Clone, Debug)]
pub struct Relay {
    event: String,
}

impl Default for Relay {
    fn default() -> Self {
        Self::new("getData")
    }
}

impl Relay {
    pub fn new(event: impl Into<String>) -> Self {
        Self {
            event: event.into(),
        }
    }

    pub fn event(&self) -> &str {
        &self.event
    }

    /// Navigates to `url` and, once the page is open, sends it a copy of
    /// `payload`. Nothing is sent if navigation fails.
    pub fn navigate_with_data<H: Host + ?Sized>(
        &self,
        host: &H,
        url: &str,
        payload: &Payload,
    ) -> Result<()> {
        let channel = host.navigate(url).map_err(|e| {
            log::warn!("navigate to '{url}' failed: {e}");
            Error::Navigation {
                url: url.to_string(),
                reason: e.reason,
            }
        })?;
        channel.emit(&self.event, Value::Object(payload.clone()));
        Ok(())
    }

    /// Serialises `data` first; it must serialise to a JSON object.
    pub fn navigate_with<H: Host + ?Sized, T: Serialize>(
        &self,
        host: &H,
        url: &str,
        data: &T,
    ) -> Result<()> {
        match serde_json::to_value(data)? {
            Value::Object(map) => self.navigate_with_data(host, url, &map),
            other => Err(Error::Payload(format!(
                "expected an object payload, got {other}"
            ))),
        }
    }

    /// Resolves with the payload sent by [`navigate_with_data`].
    ///
    /// Never fails: a page that was not opened through `navigate`, a channel
    /// that goes away without sending, or a non-object payload all resolve
    /// with an empty map.
    ///
    /// [`navigate_with_data`]: Self::navigate_with_data
    pub fn receive_data(&self, page: &Page) -> impl Future<Output = Payload> + use<> {
        let rx = match page.opener_event_channel() {
            Some(channel) => {
                let (tx, rx) = oneshot::channel();
                channel.once(&self.event, move |data| {
                    let _ = tx.send(data.clone());
                });
                Some(rx)
            }
            None => {
                log::debug!("page '{}' has no opener channel", page.route());
                None
            }
        };
        async move {
            let Some(rx) = rx else {
                return Payload::new();
            };
            match rx.await {
                Ok(Value::Object(map)) => map,
                Ok(other) => {
                    log::debug!("ignoring non-object payload {other}");
                    Payload::new()
                }
                Err(oneshot::Canceled) => Payload::new(),
            }
        }
    }
}
