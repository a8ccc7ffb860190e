use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use serde_json::Value;
use smallvec::SmallVec;

enum Listener {
    On(Rc<dyn Fn(&Value)>),
    Once(Box<dyn FnOnce(&Value)>),
}

#[derive(Default)]
struct Endpoint {
    listeners: HashMap<String, SmallVec<[Listener; 1]>>,
    // emitted before anyone listened
    buffered: HashMap<String, VecDeque<Value>>,
    // the other end is gone; nothing new will arrive
    closed: bool,
}

struct Ends {
    local: Rc<RefCell<Endpoint>>,
    peer: Rc<RefCell<Endpoint>>,
}

impl Drop for Ends {
    /// Once the last handle to this end goes away, listeners on the other end
    /// can only be served from what is already buffered. Pending `once`
    /// listeners are dropped so whoever waits on them sees the sender vanish.
    fn drop(&mut self) {
        let orphaned: Vec<Listener> = {
            let mut peer = self.peer.borrow_mut();
            peer.closed = true;
            peer.listeners
                .values_mut()
                .flat_map(|ls| {
                    let (once, on): (SmallVec<[Listener; 1]>, SmallVec<[Listener; 1]>) =
                        std::mem::take(ls)
                            .into_iter()
                            .partition(|l| matches!(l, Listener::Once(_)));
                    *ls = on;
                    once
                })
                .collect()
        };
        drop(orphaned);
    }
}

/// One end of a two-way event channel between an opener page and the page
/// it opened. `emit` on one end reaches listeners on the other end; events
/// emitted before the other end listens are buffered.
///
/// Clones share the end. When every clone of one end is dropped, `once`
/// listeners still waiting on the other end are dropped too.
#[derive(Clone)]
pub struct EventChannel {
    ends: Rc<Ends>,
}

impl EventChannel {
    pub fn pair() -> (EventChannel, EventChannel) {
        let a = Rc::new(RefCell::new(Endpoint::default()));
        let b = Rc::new(RefCell::new(Endpoint::default()));
        (
            EventChannel {
                ends: Rc::new(Ends {
                    local: a.clone(),
                    peer: b.clone(),
                }),
            },
            EventChannel {
                ends: Rc::new(Ends { local: b, peer: a }),
            },
        )
    }

    /// Delivers `data` to the other end's listeners in registration order.
    pub fn emit(&self, event: &str, data: impl Into<Value>) {
        let data = data.into();
        let due = {
            let mut guard = self.ends.peer.borrow_mut();
            let peer = &mut *guard;
            let Some(listeners) = peer.listeners.get_mut(event).filter(|l| !l.is_empty()) else {
                log::debug!("channel: buffering '{event}'");
                peer.buffered.entry(event.to_string()).or_default().push_back(data);
                return;
            };
            let mut due = Vec::with_capacity(listeners.len());
            let mut kept = SmallVec::new();
            for l in std::mem::take(listeners) {
                if let Listener::On(f) = &l {
                    kept.push(Listener::On(f.clone()));
                }
                due.push(l);
            }
            *listeners = kept;
            due
        };
        for l in due {
            match l {
                Listener::On(f) => f(&data),
                Listener::Once(f) => f(&data),
            }
        }
    }

    /// Listens for every `event`, starting with anything already buffered.
    pub fn on(&self, event: &str, handler: impl Fn(&Value) + 'static) {
        let handler: Rc<dyn Fn(&Value)> = Rc::new(handler);
        let backlog: Vec<Value> = {
            let mut local = self.ends.local.borrow_mut();
            if !local.closed {
                local
                    .listeners
                    .entry(event.to_string())
                    .or_default()
                    .push(Listener::On(handler.clone()));
            }
            local
                .buffered
                .remove(event)
                .map(Vec::from)
                .unwrap_or_default()
        };
        for v in &backlog {
            handler(v);
        }
    }

    /// Listens for the next `event` only. If the other end is already gone
    /// and nothing is buffered, `handler` is dropped without running.
    pub fn once(&self, event: &str, handler: impl FnOnce(&Value) + 'static) {
        let buffered = {
            let mut local = self.ends.local.borrow_mut();
            let next = local.buffered.get_mut(event).and_then(|q| q.pop_front());
            if next.is_none() {
                if local.closed {
                    log::debug!("channel: '{event}' will never arrive");
                } else {
                    local
                        .listeners
                        .entry(event.to_string())
                        .or_default()
                        .push(Listener::Once(Box::new(handler)));
                }
                return;
            }
            next
        };
        if let Some(v) = buffered {
            handler(&v);
        }
    }

    /// Drops every listener for `event` on this end.
    pub fn off(&self, event: &str) {
        self.ends.local.borrow_mut().listeners.remove(event);
    }

    /// Whether the other end has been dropped.
    pub fn is_closed(&self) -> bool {
        self.ends.local.borrow().closed
    }
}
