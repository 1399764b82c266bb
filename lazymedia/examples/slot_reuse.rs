use std::sync::Arc;

use lazymedia::{LazyLoader, LoaderOptions, ViewportRegistry};

fn main() {
    // A virtualized list recycles one slot (one loader) across rows.
    let registry = ViewportRegistry::new();
    let mut loader = LazyLoader::with_observer(
        LoaderOptions::new("row-0.jpg"),
        Arc::new(registry.clone()),
    );
    loader.attach(10);

    // With no `on_near` route configured we deliver straight into the loader.
    registry.deliver(10, 1.0, true);
    loader.notify_near(10);
    loader.notify_load();
    println!(
        "slot shows {} ({:?})",
        loader.effective_source(),
        loader.status()
    );

    // The list scrolls; the slot is recycled for another row. The loader
    // tears the old subscription down and arms a fresh one for the new value.
    let resolved = loader.state();
    loader.set_source("row-8.jpg");
    println!(
        "recycled: armed={} still showing {}",
        loader.is_armed(),
        loader.effective_source()
    );

    registry.deliver(10, 1.0, true);
    loader.notify_near(10);
    loader.notify_load();
    println!(
        "slot shows {} ({:?})",
        loader.effective_source(),
        loader.status()
    );

    // Scrolling back: restore the earlier row's resolved state so its image
    // is not deferred a second time.
    loader.set_source("row-0.jpg");
    loader.restore_state(resolved);
    println!(
        "restored: armed={} showing {} ({:?})",
        loader.is_armed(),
        loader.effective_source(),
        loader.status()
    );
}
