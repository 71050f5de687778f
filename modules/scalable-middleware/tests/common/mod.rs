//! In-memory host store for driving the middleware chain in tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use scalable_middleware::{apply_middleware, Middleware, Next, StoreApi};
use scalable_state::{Action, Reducer, Value};

struct Host {
    state: Mutex<Value>,
    reducer: Box<dyn Reducer>,
    reduced: Mutex<Vec<Action>>,
}

impl Host {
    fn reduce(&self, action: Action) {
        {
            let mut state = self.state.lock().unwrap();
            let next = self.reducer.reduce(Some(state.clone()), &action);
            *state = next;
        }
        self.reduced.lock().unwrap().push(action);
    }
}

impl StoreApi for Host {
    fn state(&self) -> Value {
        self.state.lock().unwrap().clone()
    }
}

/// Holds state, runs every action through the middlewares and then the
/// reducer, and records the actions that reached the reducer.
pub struct MemoryStore {
    host: Arc<Host>,
    dispatch: Next,
}

impl MemoryStore {
    pub fn new(reducer: impl Reducer + 'static, middlewares: Vec<Arc<dyn Middleware>>) -> Self {
        let initial = reducer.reduce(None, &Action::new("@@init"));
        let host = Arc::new(Host {
            state: Mutex::new(initial),
            reducer: Box::new(reducer),
            reduced: Mutex::new(Vec::new()),
        });

        let base_host = Arc::clone(&host);
        let base: Next = Arc::new(move |action: Action| base_host.reduce(action));
        let dispatch = apply_middleware(host.clone(), middlewares, base);

        Self { host, dispatch }
    }

    pub fn dispatch(&self, action: Action) {
        (self.dispatch)(action);
    }

    pub fn state(&self) -> Value {
        self.host.state()
    }

    /// Every action that reached the reducer, in order. The init action is
    /// not included.
    pub fn reduced(&self) -> Vec<Action> {
        self.host.reduced.lock().unwrap().clone()
    }

    pub fn last_reduced(&self) -> Option<Action> {
        self.host.reduced.lock().unwrap().last().cloned()
    }

    /// Wait until `check` holds for the current state. Panics after a second.
    pub async fn eventually(&self, check: impl Fn(&Value) -> bool) {
        let deadline = tokio::time::Instant::now() + Duration::from_secs(1);
        loop {
            if check(&self.state()) {
                return;
            }
            assert!(
                tokio::time::Instant::now() < deadline,
                "state never matched: {}",
                self.state()
            );
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }
}
