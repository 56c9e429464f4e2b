use tidings_dispatcher::event_map;

#[event_map]
pub enum Pointer {
    Moved { x: i32, y: i32 },
}

fn main() {}
