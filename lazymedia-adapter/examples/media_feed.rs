use std::sync::{Arc, Mutex};

use lazymedia::{LazyLoader, LoaderOptions, NodeId, ViewportRegistry};
use lazymedia_adapter::{LazyImage, LazyVideo, MediaProps};

fn short(source: &str) -> String {
    if source.starts_with("data:") {
        String::from("placeholder")
    } else {
        String::from(source)
    }
}

fn main() {
    let registry = ViewportRegistry::new();
    let queue: Arc<Mutex<Vec<NodeId>>> = Arc::new(Mutex::new(Vec::new()));

    // A feed of six images, 400 units apart, viewed through a 400-tall
    // viewport with the default 75% look-ahead.
    let mut feed: Vec<LazyImage> = (0..6)
        .map(|i| {
            let node = i as NodeId + 1;
            let options = {
                let queue = Arc::clone(&queue);
                LoaderOptions::default().with_on_near(Some(move |node: NodeId| {
                    queue.lock().unwrap().push(node);
                }))
            };
            let loader = LazyLoader::with_observer(options, Arc::new(registry.clone()));
            let mut ctrl = LazyImage::from_loader(
                loader,
                MediaProps::new(format!("feed-{i}.jpg")).with_class_name("feed-item"),
            );
            ctrl.mount(node);
            registry.set_node_extent(node, i as u64 * 400, 360);
            ctrl
        })
        .collect();

    for offset in [0u64, 400, 800, 1200, 1600] {
        registry.set_viewport(offset, 400);
        let nodes: Vec<NodeId> = queue.lock().unwrap().drain(..).collect();
        for node in nodes {
            // Each controller rejects deliveries for other nodes.
            for ctrl in feed.iter_mut() {
                ctrl.on_near(node);
            }
        }
        let shown: Vec<String> = feed.iter().map(|c| short(&c.element().source)).collect();
        println!("offset {offset:>4}: {shown:?}");
    }

    // Platform completion events arrive; one image fails to decode.
    for (i, ctrl) in feed.iter_mut().enumerate() {
        if i == 3 {
            ctrl.on_error();
        } else {
            ctrl.on_load();
        }
    }
    for ctrl in &feed {
        let el = ctrl.element();
        println!("{}: class={:?}", short(&el.source), el.class);
    }

    // Videos share the same controller, parameterized by kind. No capability
    // injected here, so the source swaps eagerly on mount.
    let mut clip = LazyVideo::new(
        MediaProps::new("teaser.mov")
            .with_alternate_text("teaser clip")
            .with_attribute("muted", "muted"),
    );
    clip.mount(99);
    clip.on_load();
    let el = clip.element();
    println!(
        "video: tag={} subtype={:?} class={:?}",
        el.tag, el.subtype, el.class
    );
}
