//! The host navigation engine.
//!
//! The router never renders anything. Once guards approve a navigation it
//! hands the transition to a [`NavigationEngine`], the host's screen
//! primitives, through the method named after the navigation's [`OpenType`].
//!
//! # Example
//!
//! ```
//! use page_navigator::{EngineOptions, NavigationEngine};
//!
//! struct PrintEngine;
//!
//! impl NavigationEngine for PrintEngine {
//!     fn navigate_to(&self, options: EngineOptions) {
//!         println!("open {:?}", options.url);
//!     }
//!     fn redirect_to(&self, options: EngineOptions) {
//!         println!("replace with {:?}", options.url);
//!     }
//!     fn re_launch(&self, options: EngineOptions) {
//!         println!("relaunch at {:?}", options.url);
//!     }
//!     fn switch_tab(&self, options: EngineOptions) {
//!         println!("tab {:?}", options.url);
//!     }
//!     fn navigate_back(&self, options: EngineOptions) {
//!         println!("back {:?}", options.delta);
//!     }
//! }
//! ```

use crate::request::{Extras, OpenType};

/// Options handed to the engine when a navigation commits.
///
/// Forward navigations carry `url` (the resolved full path); backward
/// navigations carry `delta`. `extras` are passed through untouched from
/// the caller's [`NavigateOptions`](crate::NavigateOptions).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineOptions {
    /// Target URL for forward navigations.
    pub url: Option<String>,
    /// Number of pages to pop for backward navigations.
    pub delta: Option<usize>,
    /// Caller-supplied options.
    pub extras: Extras,
}

/// The host's screen-transition primitives.
pub trait NavigationEngine: Send + Sync + 'static {
    /// Open a new page on top of the current one.
    fn navigate_to(&self, options: EngineOptions);

    /// Replace the current page.
    fn redirect_to(&self, options: EngineOptions);

    /// Close every page and open the target.
    fn re_launch(&self, options: EngineOptions);

    /// Switch to a tab-bar page.
    fn switch_tab(&self, options: EngineOptions);

    /// Close `delta` pages.
    fn navigate_back(&self, options: EngineOptions);

    /// Engine name for debugging.
    fn name(&self) -> &'static str {
        "NavigationEngine"
    }

    /// Call the method named by `open_type`.
    fn dispatch(&self, open_type: OpenType, options: EngineOptions) {
        match open_type {
            OpenType::NavigateTo => self.navigate_to(options),
            OpenType::RedirectTo => self.redirect_to(options),
            OpenType::ReLaunch => self.re_launch(options),
            OpenType::SwitchTab => self.switch_tab(options),
            OpenType::NavigateBack => self.navigate_back(options),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Recorder {
        calls: Arc<Mutex<Vec<String>>>,
    }

    impl Recorder {
        fn push(&self, kind: &str, options: &EngineOptions) {
            self.calls.lock().unwrap().push(format!(
                "{}:{}",
                kind,
                options
                    .url
                    .clone()
                    .or_else(|| options.delta.map(|d| d.to_string()))
                    .unwrap_or_default()
            ));
        }
    }

    impl NavigationEngine for Recorder {
        fn navigate_to(&self, options: EngineOptions) {
            self.push("navigate_to", &options);
        }
        fn redirect_to(&self, options: EngineOptions) {
            self.push("redirect_to", &options);
        }
        fn re_launch(&self, options: EngineOptions) {
            self.push("re_launch", &options);
        }
        fn switch_tab(&self, options: EngineOptions) {
            self.push("switch_tab", &options);
        }
        fn navigate_back(&self, options: EngineOptions) {
            self.push("navigate_back", &options);
        }
    }

    #[test]
    fn test_dispatch_by_open_type() {
        let engine = Recorder::default();
        let url = |u: &str| EngineOptions {
            url: Some(u.to_string()),
            ..EngineOptions::default()
        };

        engine.dispatch(OpenType::NavigateTo, url("/a"));
        engine.dispatch(OpenType::RedirectTo, url("/b"));
        engine.dispatch(OpenType::ReLaunch, url("/c"));
        engine.dispatch(OpenType::SwitchTab, url("/d"));
        engine.dispatch(
            OpenType::NavigateBack,
            EngineOptions {
                delta: Some(2),
                ..EngineOptions::default()
            },
        );

        assert_eq!(
            *engine.calls.lock().unwrap(),
            vec![
                "navigate_to:/a",
                "redirect_to:/b",
                "re_launch:/c",
                "switch_tab:/d",
                "navigate_back:2"
            ]
        );
        assert_eq!(engine.name(), "NavigationEngine");
    }
}
