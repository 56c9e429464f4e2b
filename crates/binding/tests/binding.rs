use parking_lot::Mutex;
use std::sync::Arc;
use tidings_binding::{BindingError, BindingErrorExt, Scope, ScopedSubscription};
use tidings_dispatcher::{Dispatcher, Listener, event_map};

#[event_map]
pub enum Ui {
    Clicked(u32),
    Closed,
}

#[event_map]
pub enum Net {
    Connected(String),
}

fn recorder() -> (Arc<Mutex<Vec<String>>>, impl Fn(&str) + Clone + Send + Sync + 'static) {
    let calls: Arc<Mutex<Vec<String>>> = Arc::default();
    let sink = Arc::clone(&calls);
    (calls, move |entry: &str| sink.lock().push(entry.to_owned()))
}

#[test]
fn descendants_resolve_the_nearest_provider() {
    let root = Scope::root();
    let app = Dispatcher::<Ui>::builder().name("app").build().unwrap();
    root.provide(app.clone());

    let page = root.child("page");
    let widget = page.child("widget");
    assert!(widget.dispatcher::<Ui>().unwrap().same_as(&app));

    let local = Dispatcher::<Ui>::builder().name("page").build().unwrap();
    page.provide(local.clone());
    assert!(widget.dispatcher::<Ui>().unwrap().same_as(&local));
    assert!(root.dispatcher::<Ui>().unwrap().same_as(&app));
    assert!(!widget.provides::<Ui>());
}

#[test]
fn missing_provider_is_reported() {
    let root = Scope::named("shell");
    root.provide(Dispatcher::<Ui>::new());
    let child = root.child("panel");

    let err = child.dispatcher::<Net>().unwrap_err();
    assert_eq!(
        err,
        BindingError::NotProvided { map: "Net", scope: "panel".into(), context: None }
    );
    assert_eq!(err.to_string(), "No `Net` dispatcher provided to scope `panel` or its ancestors");

    let err = child.emitter::<Net, net::Connected>().context("Wiring status bar").unwrap_err();
    assert_eq!(
        err.to_string(),
        "No `Net` dispatcher provided to scope `panel` or its ancestors (Wiring status bar)"
    );
    assert!(child.subscribe::<Net, net::Connected>(|_| {}).is_err());
}

#[test]
fn maps_are_provided_independently() {
    let root = Scope::root();
    root.provide(Dispatcher::<Ui>::new());
    root.provide(Dispatcher::<Net>::new());

    let ui = root.dispatcher::<Ui>().unwrap();
    let net = root.dispatcher::<Net>().unwrap();
    ui.on::<ui::Closed>(|_| {});

    assert_eq!(ui.subscriber_count::<ui::Closed>(), 1);
    assert!(net.is_empty());
}

#[test]
fn scope_subscription_ends_on_drop() {
    let root = Scope::root();
    let dispatcher = Dispatcher::<Ui>::new();
    root.provide(dispatcher.clone());
    let (calls, record) = recorder();

    {
        let guard = root
            .child("button")
            .subscribe::<Ui, ui::Clicked>(move |n| record(&format!("clicked:{n}")))
            .unwrap();
        assert!(guard.is_active());
        dispatcher.emit::<ui::Clicked>(1);
    }

    dispatcher.emit::<ui::Clicked>(2);
    assert_eq!(*calls.lock(), ["clicked:1"]);
    assert_eq!(dispatcher.subscriber_count::<ui::Clicked>(), 0);
}

#[test]
fn activate_never_double_subscribes() {
    let dispatcher = Dispatcher::<Ui>::new();
    let (calls, record) = recorder();
    let listener = Listener::new(move |_: &()| record("closed"));
    let mut guard = ScopedSubscription::<Ui, ui::Closed>::new(dispatcher.clone(), listener);

    assert!(!guard.is_active());
    assert_eq!(dispatcher.subscriber_count::<ui::Closed>(), 0);

    assert!(guard.activate());
    assert!(!guard.activate());
    assert_eq!(dispatcher.subscriber_count::<ui::Closed>(), 1);

    dispatcher.notify::<ui::Closed>();
    assert!(guard.deactivate());
    assert!(!guard.deactivate());
    dispatcher.notify::<ui::Closed>();

    assert_eq!(*calls.lock(), ["closed"]);
    assert_eq!(dispatcher.subscriber_count::<ui::Closed>(), 0);
}

#[test]
fn guard_reactivates_after_external_clear() {
    let dispatcher = Dispatcher::<Ui>::new();
    let mut guard =
        ScopedSubscription::<Ui, ui::Closed>::new(dispatcher.clone(), Listener::new(|_: &()| {}));
    guard.activate();

    dispatcher.clear_all();
    assert!(!guard.is_active());

    assert!(guard.activate());
    assert_eq!(dispatcher.subscriber_count::<ui::Closed>(), 1);
}

#[test]
fn changed_deps_resubscribe_once() {
    let dispatcher = Dispatcher::<Ui>::new();
    let (calls, record) = recorder();

    let early = record.clone();
    dispatcher.on::<ui::Clicked>(move |_| early("first"));

    let late = record.clone();
    let mut guard = ScopedSubscription::<Ui, ui::Clicked, &str>::with_deps(
        dispatcher.clone(),
        Listener::new(move |_: &u32| late("guarded")),
        "light",
    );
    guard.activate();

    let last = record;
    dispatcher.on::<ui::Clicked>(move |_| last("last"));

    assert!(!guard.set_deps("light"));
    dispatcher.emit::<ui::Clicked>(1);
    assert_eq!(*calls.lock(), ["first", "guarded", "last"]);

    assert!(guard.set_deps("dark"));
    assert_eq!(guard.deps(), &"dark");
    assert!(guard.is_active());
    assert_eq!(dispatcher.subscriber_count::<ui::Clicked>(), 3);

    calls.lock().clear();
    dispatcher.emit::<ui::Clicked>(2);
    assert_eq!(*calls.lock(), ["first", "last", "guarded"]);
}

#[test]
fn inactive_guard_stays_inactive_on_deps_change() {
    let dispatcher = Dispatcher::<Ui>::new();
    let mut guard = ScopedSubscription::<Ui, ui::Clicked, u8>::with_deps(
        dispatcher.clone(),
        Listener::new(|_: &u32| {}),
        1,
    );

    assert!(guard.set_deps(2));
    assert!(!guard.is_active());
    assert!(dispatcher.is_empty());
}

#[test]
fn externally_cleared_guard_stays_inactive_on_deps_change() {
    let dispatcher = Dispatcher::<Ui>::new();
    let (calls, record) = recorder();

    let first = record.clone();
    let mut guard = ScopedSubscription::<Ui, ui::Clicked, u8>::with_deps(
        dispatcher.clone(),
        Listener::new(move |_: &u32| first("first")),
        1,
    );
    guard.activate();
    dispatcher.clear_event::<ui::Clicked>();

    assert!(guard.set_deps(2));
    assert!(!guard.is_active());
    assert!(guard.rebind(3, Listener::new(move |_: &u32| record("rebound"))));
    assert!(!guard.is_active());
    assert_eq!(dispatcher.subscriber_count::<ui::Clicked>(), 0);

    dispatcher.emit::<ui::Clicked>(1);
    assert!(calls.lock().is_empty());

    assert!(guard.activate());
    dispatcher.emit::<ui::Clicked>(2);
    assert_eq!(*calls.lock(), ["rebound"]);
}

#[test]
fn rebind_swaps_the_listener() {
    let dispatcher = Dispatcher::<Ui>::new();
    let (calls, record) = recorder();

    let old = record.clone();
    let mut guard = ScopedSubscription::<Ui, ui::Clicked, u32>::with_deps(
        dispatcher.clone(),
        Listener::new(move |n: &u32| old(&format!("old:{n}"))),
        1,
    );
    guard.activate();

    let new = record;
    assert!(guard.rebind(2, Listener::new(move |n: &u32| new(&format!("new:{n}")))));
    dispatcher.emit::<ui::Clicked>(5);

    assert_eq!(*calls.lock(), ["new:5"]);
    assert_eq!(dispatcher.subscriber_count::<ui::Clicked>(), 1);
}

#[test]
fn emitter_forwards_to_the_provided_dispatcher() {
    let root = Scope::root();
    let dispatcher = Dispatcher::<Ui>::new();
    root.provide(dispatcher.clone());
    let (calls, record) = recorder();

    let clicked = record.clone();
    dispatcher.on::<ui::Clicked>(move |n| clicked(&format!("clicked:{n}")));
    dispatcher.on::<ui::Closed>(move |_| record("closed"));

    let clicks = root.child("toolbar").emitter::<Ui, ui::Clicked>().unwrap();
    let copy = clicks.clone();
    let close = root.emitter::<Ui, ui::Closed>().unwrap();

    assert_eq!(clicks.event(), "Clicked");
    assert_eq!(clicks.emit(1).delivered(), 1);
    copy.emit(2);
    close.notify();

    assert_eq!(*calls.lock(), ["clicked:1", "clicked:2", "closed"]);
}
