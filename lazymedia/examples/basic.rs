use std::sync::{Arc, Mutex};

use lazymedia::{LazyLoader, LoaderOptions, NodeId, ViewportRegistry};

fn main() {
    // Simulate a framework adapter that owns the scroll state.
    let registry = ViewportRegistry::new();
    let queue: Arc<Mutex<Vec<NodeId>>> = Arc::new(Mutex::new(Vec::new()));

    let options = {
        let queue = Arc::clone(&queue);
        LoaderOptions::new("https://example.com/photo.jpg")
            .with_on_near(Some(move |node: NodeId| {
                queue.lock().unwrap().push(node);
            }))
            .with_on_change(Some(|l: &LazyLoader| {
                println!("  on_change: phase={:?} status={:?}", l.phase(), l.status());
            }))
    };
    let mut loader = LazyLoader::with_observer(options, Arc::new(registry.clone()));

    // Mount the node and tell the registry where it sits in the document.
    loader.attach(1);
    registry.set_node_extent(1, 1200, 40);

    // Scroll the simulated viewport towards the node. With a 200-tall
    // viewport and the default 75% look-ahead, the node fires at offset 900.
    for offset in [0u64, 300, 600, 900] {
        let fired = registry.set_viewport(offset, 200);
        println!("scroll to {offset}: fired={fired}");
        let nodes: Vec<NodeId> = queue.lock().unwrap().drain(..).collect();
        for node in nodes {
            loader.notify_near(node);
        }
    }

    // The platform element reports completion for the swapped-in source.
    loader.notify_load();
    println!(
        "final: effective={} status={:?} armed={}",
        loader.effective_source(),
        loader.status(),
        loader.is_armed()
    );
}
