use std::future::Future;

use pagekit_core::{Config, GuardHandle, GuardRegistry, Result, Store, WatchHandle};
use pagekit_navigation::{Host, Page, Payload, Relay, ShowHandle, ShowHooks};
use serde::Serialize;
use serde_json::Value;

use crate::methods::{HostValue, Method, MethodRegistry};

/// Every pagekit helper bound to one host.
///
/// All state lives in the toolkit: two toolkits never share busy keys,
/// stored values, pending hooks or methods.
pub struct Toolkit<H: Host> {
    host: H,
    config: Config,
    guards: GuardRegistry,
    store: Store,
    hooks: ShowHooks,
    relay: Relay,
    methods: MethodRegistry,
}

impl<H: Host> Toolkit<H> {
    pub fn new(host: H) -> Self {
        Self::build(host, Config::default())
    }

    pub fn with_config(host: H, config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(host, config))
    }

    fn build(host: H, config: Config) -> Self {
        Self {
            guards: GuardRegistry::new(),
            store: Store::with_default_fires(config.default_watch_fires),
            hooks: ShowHooks::new(),
            relay: Relay::new(config.data_event.clone()),
            methods: MethodRegistry::new(config.notice_title.clone()),
            host,
            config,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn guards(&self) -> &GuardRegistry {
        &self.guards
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn hooks(&self) -> &ShowHooks {
        &self.hooks
    }

    // show-once

    pub fn on_next_show(&self, callback: impl FnOnce() + 'static) -> Result<ShowHandle> {
        self.hooks.on_next_show(&self.host, callback)
    }

    pub fn on_next_show_with(
        &self,
        callback: impl FnOnce() + 'static,
        before_navigate: impl FnOnce(),
    ) -> Result<ShowHandle> {
        self.hooks
            .on_next_show_with(&self.host, callback, before_navigate)
    }

    pub fn cancel_show(&self, handle: ShowHandle) -> bool {
        self.hooks.cancel(handle)
    }

    // navigation relay

    pub fn navigate_with_data(&self, url: &str, payload: &Payload) -> Result<()> {
        self.relay.navigate_with_data(&self.host, url, payload)
    }

    pub fn navigate_with<T: Serialize>(&self, url: &str, data: &T) -> Result<()> {
        self.relay.navigate_with(&self.host, url, data)
    }

    pub fn receive_data(&self, page: &Page) -> impl Future<Output = Payload> + use<H> {
        self.relay.receive_data(page)
    }

    // guard

    pub fn run_once(&self, key: impl Into<String>, op: impl FnOnce(GuardHandle)) -> bool {
        self.guards.run_once(key, op)
    }

    pub fn release(&self, key: &str) {
        self.guards.release(key)
    }

    // store

    pub fn write(&self, key: impl Into<String>, value: impl Into<Value>) {
        self.store.write(key, value)
    }

    pub fn read(&self, key: &str) -> Option<Value> {
        self.store.read(key)
    }

    pub fn watch(
        &self,
        key: impl Into<String>,
        callback: impl Fn(&str, &Value) + 'static,
    ) -> WatchHandle {
        self.store.watch(key, callback)
    }

    // methods

    pub fn add_method(&self, key: impl Into<String>, entry: HostValue) -> bool {
        self.methods.add(&self.host, key, entry)
    }

    pub fn run_method(&self, key: &str) -> Option<Method> {
        self.methods.get(&self.host, key)
    }
}
