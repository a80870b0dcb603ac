//! Test utilities for router tests
//!
//! Provides a recording engine, router fixtures, and logger setup.

#![allow(dead_code)]

use page_navigator::*;
use std::sync::{Arc, Mutex};

/// One engine call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineCall {
    pub open_type: OpenType,
    pub options: EngineOptions,
}

/// Engine that records every call instead of changing screens.
#[derive(Debug, Default)]
pub struct RecordingEngine {
    calls: Mutex<Vec<EngineCall>>,
}

impl RecordingEngine {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> Vec<EngineCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn kinds(&self) -> Vec<OpenType> {
        self.calls().into_iter().map(|c| c.open_type).collect()
    }

    pub fn urls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| c.options.url)
            .collect()
    }

    fn record(&self, open_type: OpenType, options: EngineOptions) {
        self.calls.lock().unwrap().push(EngineCall { open_type, options });
    }
}

impl NavigationEngine for RecordingEngine {
    fn navigate_to(&self, options: EngineOptions) {
        self.record(OpenType::NavigateTo, options);
    }

    fn redirect_to(&self, options: EngineOptions) {
        self.record(OpenType::RedirectTo, options);
    }

    fn re_launch(&self, options: EngineOptions) {
        self.record(OpenType::ReLaunch, options);
    }

    fn switch_tab(&self, options: EngineOptions) {
        self.record(OpenType::SwitchTab, options);
    }

    fn navigate_back(&self, options: EngineOptions) {
        self.record(OpenType::NavigateBack, options);
    }

    fn name(&self) -> &'static str {
        "RecordingEngine"
    }
}

/// Route logger output through the test harness. Safe to call repeatedly.
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Router with the given routes and a fresh recording engine.
pub fn router_with(routes: &[&str]) -> (Router, Arc<RecordingEngine>) {
    init_logger();
    let engine = RecordingEngine::new();
    let router = Router::new(
        RouterOptions::new(Arc::clone(&engine) as Arc<dyn NavigationEngine>)
            .routes(routes.iter().copied()),
    );
    (router, engine)
}

/// Router with `/a` and `/b`.
pub fn ab_router() -> (Router, Arc<RecordingEngine>) {
    router_with(&["/a", "/b"])
}

/// Paths of the stack, bottom first.
pub fn stack_paths(router: &Router) -> Vec<String> {
    router.matched().iter().map(|r| r.path.clone()).collect()
}

/// Path of the current route, if any.
pub fn current_path(router: &Router) -> Option<String> {
    router.current_route().map(|r| r.path.clone())
}
