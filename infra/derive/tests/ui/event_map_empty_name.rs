use tidings_dispatcher::event_map;

#[event_map]
pub enum Door {
    #[event(name = "")]
    Opened,
}

fn main() {}
