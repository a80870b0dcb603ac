//! Guard pipeline tests: vetoes, redirects, callbacks, failures, ordering and
//! after-guards, all driven through the router.

mod common;

use common::*;
use page_navigator::*;
use std::sync::{Arc, Mutex};

fn deny(path: &'static str) -> impl NavigationGuard {
    guard_fn(move |to: &ResolvedRoute, _: Option<&ResolvedRoute>| to.path != path).named("deny")
}

#[tokio::test]
async fn test_rejecting_guard_rolls_back() {
    let (mut router, engine) = ab_router();
    router.before_each(deny("/b"));

    router.navigate_to("/a").await;
    let result = router.navigate_to("/b").await;

    assert_eq!(
        result,
        NavigationResult::Blocked {
            reason: "Navigation aborted by guard 'deny'".into()
        }
    );
    assert_eq!(stack_paths(&router), vec!["/a"]);
    assert_eq!(current_path(&router).as_deref(), Some("/a"));
    assert!(router.previous_route().is_none());
    assert_eq!(engine.kinds(), vec![OpenType::NavigateTo]);
    assert_eq!(engine.urls(), vec!["/a"]);
}

#[tokio::test]
async fn test_rejected_back_restores_stack() {
    let (mut router, engine) = ab_router();
    router.navigate_to("/a").await;
    router.navigate_to("/b").await;

    router.before_each(guard_fn(|_: &ResolvedRoute, from: Option<&ResolvedRoute>| {
        from.map_or(true, |r| r.path != "/b")
    }));
    let result = router.navigate_back(BackOptions::default()).await;

    assert!(result.is_blocked());
    assert_eq!(stack_paths(&router), vec!["/a", "/b"]);
    assert_eq!(current_path(&router).as_deref(), Some("/b"));
    assert_eq!(router.previous_route().map(|r| r.path.as_str()), Some("/a"));
    assert_eq!(engine.calls().len(), 2);
}

#[tokio::test]
async fn test_guard_sees_tentative_to_and_from() {
    let (mut router, _) = ab_router();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    router.before_each(guard_fn(
        move |to: &ResolvedRoute, from: Option<&ResolvedRoute>| {
            sink.lock()
                .unwrap()
                .push((to.path.clone(), from.map(|r| r.path.clone())));
        },
    ));

    router.navigate_to("/a").await;
    router.navigate_to("/b").await;
    router.navigate_back(BackOptions::default()).await;

    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            ("/a".to_string(), None),
            ("/b".to_string(), Some("/a".to_string())),
            ("/a".to_string(), Some("/b".to_string())),
        ]
    );
}

#[tokio::test]
async fn test_path_redirect() {
    let (mut router, engine) = router_with(&["/a", "/b", "/login"]);
    router.before_each(guard_fn(|to: &ResolvedRoute, _: Option<&ResolvedRoute>| {
        if to.path == "/b" {
            NextValue::from("/login")
        } else {
            NextValue::Continue
        }
    }));

    router.navigate_to("/a").await;
    let result = router.redirect_to("/b").await;

    assert_eq!(result, NavigationResult::Success { path: "/login".into() });
    assert_eq!(stack_paths(&router), vec!["/a", "/login"]);
    let current = router.current_route().unwrap();
    assert!(current.before_each);
    assert_eq!(current.open_type, OpenType::NavigateTo);
    assert_eq!(
        engine.kinds(),
        vec![OpenType::NavigateTo, OpenType::NavigateTo]
    );
    assert_eq!(engine.urls(), vec!["/a", "/login"]);
}

#[tokio::test]
async fn test_request_redirect_keeps_open_type() {
    let (mut router, engine) = router_with(&["/a", "/b", "/login"]);
    router.before_each(async_guard_fn(|to: ResolvedRoute, _| async move {
        Ok::<_, NavigationError>(if to.path == "/b" {
            NextValue::from(NavigateRequest::ReLaunch(
                Location::new("/login").query("from", "b"),
            ))
        } else {
            NextValue::Continue
        })
    }));

    router.navigate_to("/a").await;
    router.navigate_to("/b").await;

    assert_eq!(stack_paths(&router), vec!["/login"]);
    let current = router.current_route().unwrap();
    assert!(current.before_each);
    assert_eq!(current.query.get("from"), Some("b"));
    assert_eq!(engine.kinds(), vec![OpenType::NavigateTo, OpenType::ReLaunch]);
    assert_eq!(engine.urls(), vec!["/a", "/login?from=b"]);
}

#[tokio::test]
async fn test_callback_takes_over() {
    let (mut router, engine) = ab_router();
    let origins = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&origins);
    router.before_each(next_guard_fn(move |to: ResolvedRoute, _, next: Next| {
        let sink = Arc::clone(&sink);
        async move {
            if to.path == "/b" {
                next.call(NextValue::callback(move |origin| {
                    sink.lock().unwrap().push(origin);
                }));
            } else {
                next.proceed();
            }
            Ok::<_, NavigationError>(None)
        }
    }));

    router.navigate_to("/a").await;
    let result = router.navigate_to("/b").await;

    assert_eq!(result, NavigationResult::Handled);
    assert_eq!(stack_paths(&router), vec!["/a"]);
    assert_eq!(
        *origins.lock().unwrap(),
        vec![GuardOrigin { before_each: true }]
    );
    assert_eq!(engine.calls().len(), 1);
}

#[tokio::test]
async fn test_guard_error_is_reported_without_rollback() {
    let (mut router, engine) = ab_router();
    router.before_each(
        async_guard_fn(|to: ResolvedRoute, _| async move {
            if to.path == "/b" {
                Err(NavigationError::custom("session lookup failed"))
            } else {
                Ok(())
            }
        })
        .named("session"),
    );

    router.navigate_to("/a").await;
    let result = router.navigate_to("/b").await;

    assert_eq!(
        result,
        NavigationResult::Error(NavigationError::GuardFailed {
            guard: "session".into(),
            message: "session lookup failed".into(),
        })
    );
    assert_eq!(stack_paths(&router), vec!["/a", "/b"]);
    assert_eq!(engine.calls().len(), 1);
}

#[tokio::test]
async fn test_guard_returning_aborted_error_rolls_back() {
    let (mut router, _) = ab_router();
    router.before_each(async_guard_fn(|to: ResolvedRoute, _| async move {
        if to.path == "/b" {
            Err(NavigationError::GuardAborted {
                guard: "manual".into(),
            })
        } else {
            Ok(true)
        }
    }));

    router.navigate_to("/a").await;

    assert!(router.navigate_to("/b").await.is_blocked());
    assert_eq!(stack_paths(&router), vec!["/a"]);
}

#[tokio::test]
async fn test_first_next_call_wins() {
    let (mut router, engine) = ab_router();
    router.before_each(next_guard_fn(|_, _, next: Next| async move {
        next.abort();
        next.proceed();
        next.redirect("/b");
        Ok::<_, NavigationError>(None)
    }));

    let result = router.navigate_to("/a").await;

    assert!(result.is_blocked());
    assert!(router.matched().is_empty());
    assert!(engine.calls().is_empty());
}

#[tokio::test]
async fn test_next_guard_may_return_redirect() {
    let (mut router, _) = router_with(&["/a", "/login"]);
    router.before_each(next_guard_fn(|to: ResolvedRoute, _, next: Next| async move {
        if to.path == "/login" {
            next.proceed();
            Ok::<_, NavigationError>(None)
        } else {
            Ok(Some(NextValue::from("/login")))
        }
    }));

    router.navigate_to("/a").await;

    assert_eq!(stack_paths(&router), vec!["/login"]);
}

#[tokio::test]
async fn test_guards_run_in_order_and_stop_at_veto() {
    let (mut router, _) = ab_router();
    let ran = Arc::new(Mutex::new(Vec::new()));
    for (name, allow) in [("first", true), ("second", false), ("third", true)] {
        let ran = Arc::clone(&ran);
        router.before_each(
            async_guard_fn(move |_, _| {
                let ran = Arc::clone(&ran);
                async move {
                    tokio::task::yield_now().await;
                    ran.lock().unwrap().push(name);
                    Ok::<_, NavigationError>(allow)
                }
            })
            .named(name),
        );
    }

    let result = router.navigate_to("/a").await;

    assert!(matches!(
        result,
        NavigationResult::Blocked { ref reason } if reason.contains("second")
    ));
    assert_eq!(*ran.lock().unwrap(), vec!["first", "second"]);
}

#[tokio::test]
async fn test_last_guard_value_decides() {
    let (mut router, _) = router_with(&["/a", "/login"]);
    router.before_each(guard_fn(|to: &ResolvedRoute, _: Option<&ResolvedRoute>| {
        if to.path == "/a" {
            NextValue::from("/login")
        } else {
            NextValue::Continue
        }
    }));
    router.before_each(guard_fn(|_: &ResolvedRoute, _: Option<&ResolvedRoute>| true));

    router.navigate_to("/a").await;

    // The second guard's plain approval overrides the first one's redirect.
    assert_eq!(stack_paths(&router), vec!["/a"]);
}

#[tokio::test]
async fn test_redirect_loop_is_cut_off() {
    let (mut router, engine) = router_with(&["/a", "/b", "/c"]);
    router.before_each(guard_fn(|to: &ResolvedRoute, _: Option<&ResolvedRoute>| {
        match to.path.as_str() {
            "/b" => NextValue::from("/c"),
            "/c" => NextValue::from("/b"),
            _ => NextValue::Continue,
        }
    }));

    router.navigate_to("/a").await;
    let result = router.navigate_to("/b").await;

    match result {
        NavigationResult::Error(NavigationError::RedirectLoop { depth, .. }) => {
            assert_eq!(depth, MAX_REDIRECT_DEPTH + 1);
        }
        other => panic!("expected redirect loop, got {:?}", other),
    }
    assert_eq!(stack_paths(&router), vec!["/a"]);
    assert_eq!(engine.calls().len(), 1);
}

#[tokio::test]
async fn test_after_guards_run_after_commit() {
    let (mut router, engine) = ab_router();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let engine_probe = Arc::clone(&engine);
    router.after_each(guard_fn(
        move |to: &ResolvedRoute, from: Option<&ResolvedRoute>| {
            // The engine has already been called when after-guards run.
            sink.lock().unwrap().push((
                to.path.clone(),
                from.map(|r| r.path.clone()),
                engine_probe.calls().len(),
            ));
            false
        },
    ));
    router.before_each(deny("/b"));

    let first = router.navigate_to("/a").await;
    router.navigate_to("/b").await;

    // A failing after-guard changes nothing.
    assert!(first.is_success());
    assert_eq!(stack_paths(&router), vec!["/a"]);
    assert_eq!(*seen.lock().unwrap(), vec![("/a".to_string(), None, 1)]);
}
