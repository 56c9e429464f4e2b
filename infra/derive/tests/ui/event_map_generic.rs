use tidings_dispatcher::event_map;

#[event_map]
pub enum Wrapper<T> {
    Value(T),
}

fn main() {}
