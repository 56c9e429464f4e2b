//! A small store simulation: a till emits, a back office and a receipt printer listen.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use tidings::{BindingError, Dispatcher, Listener, Scope, ScopedSubscription, event_map};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Item {
    pub sku: &'static str,
    pub cents: u32,
}

#[event_map(crate = ::tidings)]
pub enum Store {
    /// An item was scanned at the till.
    ItemAdded(Item),
    /// Order number and its total in cents.
    CheckedOut(u32, u64),
    #[event(name = "store:closed")]
    Closed,
}

const CATALOG: [Item; 3] = [
    Item { sku: "coffee", cents: 350 },
    Item { sku: "bagel", cents: 225 },
    Item { sku: "juice", cents: 410 },
];

/// Totals observed by the listeners during one run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub orders: u32,
    pub items: u32,
    pub revenue_cents: u64,
    /// Listener failures reported by the dispatcher, all isolated.
    pub failures: usize,
}

#[derive(Default)]
struct Ledger {
    items: AtomicU32,
    revenue: AtomicU64,
    orders: AtomicU32,
}

/// Runs `orders` checkouts against the `Store` dispatcher provided to `root`.
///
/// # Errors
/// Returns [`BindingError::NotProvided`] when `root` has no `Store` dispatcher.
pub fn run(root: &Scope, orders: u32) -> Result<Summary, BindingError> {
    let ledger = Arc::new(Ledger::default());
    let till = root.child("till");
    let back_office = root.child("back-office");

    let tally = Arc::clone(&ledger);
    let _items = back_office.subscribe::<Store, store::ItemAdded>(move |item| {
        tally.items.fetch_add(1, Ordering::Relaxed);
        tally.revenue.fetch_add(u64::from(item.cents), Ordering::Relaxed);
    })?;

    let counted = Arc::clone(&ledger);
    let _orders = back_office.subscribe::<Store, store::CheckedOut>(move |_| {
        counted.orders.fetch_add(1, Ordering::Relaxed);
    })?;

    let dispatcher: Dispatcher<Store> = till.dispatcher()?;
    let loyalty = dispatcher.try_on::<store::CheckedOut>(|(order, _)| {
        if order % 2 == 0 { Err(format!("loyalty service rejected order {order}").into()) } else { Ok(()) }
    });

    let mut receipts = ScopedSubscription::<Store, store::CheckedOut, &str>::with_deps(
        dispatcher.clone(),
        receipt_printer("USD"),
        "USD",
    );
    receipts.activate();

    let closing = dispatcher.on_scoped::<store::Closed>(|_| info!("Store closed for the day"));

    let scan = till.emitter::<Store, store::ItemAdded>()?;
    let checkout = till.emitter::<Store, store::CheckedOut>()?;
    let mut failures = 0;

    for order in 1..=orders {
        let basket = [CATALOG[order as usize % CATALOG.len()], CATALOG[(order as usize + 1) % CATALOG.len()]];
        for item in basket {
            failures += scan.emit(item).failed;
        }

        if order == orders.div_ceil(2) {
            receipts.rebind("EUR", receipt_printer("EUR"));
        }

        let total = basket.iter().map(|item| u64::from(item.cents)).sum();
        failures += checkout.emit((order, total)).failed;
    }

    failures += dispatcher.notify::<store::Closed>().failed;
    loyalty.unsubscribe();
    drop(closing);

    Ok(Summary {
        orders: ledger.orders.load(Ordering::Relaxed),
        items: ledger.items.load(Ordering::Relaxed),
        revenue_cents: ledger.revenue.load(Ordering::Relaxed),
        failures,
    })
}

fn receipt_printer(currency: &'static str) -> Listener<(u32, u64)> {
    Listener::new(move |(order, total): &(u32, u64)| {
        info!(order, currency, total = total / 100, cents = total % 100, "Receipt printed");
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listeners_observe_every_order_and_failures_stay_isolated() {
        let root = Scope::root();
        let dispatcher = Dispatcher::<Store>::new();
        root.provide(dispatcher.clone());

        let summary = run(&root, 4).unwrap();

        assert_eq!(summary.orders, 4);
        assert_eq!(summary.items, 8);
        assert_eq!(summary.failures, 2);

        let expected: u64 = (1..=4usize)
            .map(|order| {
                u64::from(CATALOG[order % 3].cents) + u64::from(CATALOG[(order + 1) % 3].cents)
            })
            .sum();
        assert_eq!(summary.revenue_cents, expected);
        assert!(dispatcher.is_empty(), "every guard should be gone after the run");
    }

    #[test]
    fn missing_dispatcher_is_an_error() {
        assert!(matches!(run(&Scope::root(), 1), Err(BindingError::NotProvided { .. })));
    }
}
