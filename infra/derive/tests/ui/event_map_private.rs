mod inner {
    use tidings_dispatcher::event_map;

    #[event_map(module = signals)]
    enum Local {
        Ping(u8),
    }

    pub fn run() -> usize {
        let dispatcher = tidings_dispatcher::Dispatcher::<Local>::new();
        dispatcher.on::<signals::Ping>(|n| assert_eq!(*n, 7));
        dispatcher.emit::<signals::Ping>(7).invoked
    }
}

fn main() {
    assert_eq!(inner::run(), 1);
}
