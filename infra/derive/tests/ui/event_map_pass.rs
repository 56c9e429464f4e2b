use tidings_dispatcher::{Dispatcher, Event, EventMap, event_map};

pub struct User {
    pub name: String,
}

#[event_map]
pub enum Account {
    /// Payload shares the variant's name.
    User(User),
    Renamed(String, String),
    #[event(name = "account:deleted")]
    Deleted,
    #[cfg(any())]
    Archived(u64),
}

fn main() {
    assert_eq!(Account::NAME, "Account");
    assert_eq!(Account::EVENT_NAMES, ["User", "Renamed", "account:deleted"]);
    assert_eq!(<account::Deleted as Event<Account>>::NAME, "account:deleted");

    assert_eq!(Account::EVENT_NAMES.len(), 3);

    let dispatcher = Dispatcher::<Account>::new();
    dispatcher.on::<account::User>(|user| assert_eq!(user.name, "ada"));
    dispatcher.on::<account::Renamed>(|(from, to)| assert_ne!(from, to));
    dispatcher.on::<account::Deleted>(|_| {});

    dispatcher.emit::<account::User>(User { name: "ada".to_owned() });
    dispatcher.emit::<account::Renamed>(("ada".to_owned(), "grace".to_owned()));
    assert_eq!(dispatcher.notify::<account::Deleted>().invoked, 1);
}
