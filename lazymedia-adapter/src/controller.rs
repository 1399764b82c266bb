use alloc::format;
use alloc::string::String;
use alloc::sync::Arc;

use core::marker::PhantomData;

use lazymedia::{LazyLoader, LoadStatus, LoaderOptions, NodeId, ProximitySource};

use crate::{ElementKind, Image, MediaElement, MediaProps, Video, status_class};

/// A framework-neutral controller pairing a [`LazyLoader`] with presentation
/// props, generic over the rendered element kind.
///
/// This type does not hold any UI objects. Adapters drive it by calling:
/// - `mount`/`unmount` when the element enters/leaves the rendered tree
/// - `on_near` when their proximity plumbing reports the node
/// - `on_load`/`on_error` when the platform element completes
///
/// and rebuild from [`element`](Self::element) after each change. The
/// proximity observer is managed entirely by the wrapped loader; the
/// controller never touches it directly.
pub struct MediaController<E: ElementKind> {
    loader: LazyLoader,
    props: MediaProps,
    _kind: PhantomData<E>,
}

/// A lazily loaded still image.
pub type LazyImage = MediaController<Image>;

/// A lazily loaded video.
pub type LazyVideo = MediaController<Video>;

impl<E: ElementKind> MediaController<E> {
    /// Creates a controller with no proximity capability (loads eagerly on
    /// mount). Inject a real capability with [`Self::with_observer`].
    pub fn new(props: MediaProps) -> Self {
        let loader = LazyLoader::new(LoaderOptions::new(props.source.clone()));
        Self {
            loader,
            props,
            _kind: PhantomData,
        }
    }

    /// Creates a controller observing through the given proximity capability.
    pub fn with_observer(props: MediaProps, observer: Arc<dyn ProximitySource>) -> Self {
        let loader =
            LazyLoader::with_observer(LoaderOptions::new(props.source.clone()), observer);
        Self {
            loader,
            props,
            _kind: PhantomData,
        }
    }

    /// Wraps an existing loader (e.g. one built with custom options or
    /// callbacks). The loader's requested source is aligned to `props.source`.
    pub fn from_loader(mut loader: LazyLoader, props: MediaProps) -> Self {
        loader.set_source(props.source.clone());
        Self {
            loader,
            props,
            _kind: PhantomData,
        }
    }

    pub fn loader(&self) -> &LazyLoader {
        &self.loader
    }

    pub fn loader_mut(&mut self) -> &mut LazyLoader {
        &mut self.loader
    }

    pub fn into_loader(self) -> LazyLoader {
        self.loader
    }

    pub fn props(&self) -> &MediaProps {
        &self.props
    }

    /// Mounts the rendered node and arms proximity observation when needed.
    pub fn mount(&mut self, node: NodeId) {
        self.loader.attach(node);
    }

    /// Unmounts: releases any live subscription; queued deliveries that
    /// arrive afterwards are ignored.
    pub fn unmount(&mut self) {
        self.loader.detach();
    }

    /// Forwards a proximity delivery for `node`.
    pub fn on_near(&mut self, node: NodeId) {
        self.loader.notify_near(node);
    }

    /// Forwards a successful load report from the platform element.
    pub fn on_load(&mut self) {
        self.loader.notify_load();
    }

    /// Forwards a load failure report from the platform element.
    pub fn on_error(&mut self) {
        self.loader.notify_error();
    }

    /// Replaces the presentation props; a changed `source` tears down and
    /// re-evaluates the proximity subscription.
    pub fn set_props(&mut self, props: MediaProps) {
        let source_changed = props.source != self.props.source;
        self.props = props;
        if source_changed {
            self.loader.set_source(self.props.source.clone());
        }
    }

    /// Replaces just the requested source.
    pub fn set_source(&mut self, source: impl Into<String>) {
        let source = source.into();
        self.props.source = source.clone();
        self.loader.set_source(source);
    }

    /// Builds the renderable description for the current state.
    pub fn element(&self) -> MediaElement {
        MediaElement {
            tag: E::TAG,
            source: String::from(self.loader.effective_source()),
            alternate_text: self.props.alternate_text.clone(),
            class: compose_class(&self.props.class_name, self.loader.status()),
            subtype: self
                .props
                .subtype
                .clone()
                .or_else(|| E::default_subtype().map(String::from)),
            attributes: self.props.extra.clone(),
        }
    }
}

impl<E: ElementKind> core::fmt::Debug for MediaController<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MediaController")
            .field("tag", &E::TAG)
            .field("loader", &self.loader)
            .field("props", &self.props)
            .finish()
    }
}

fn compose_class(class_name: &str, status: LoadStatus) -> String {
    let status = status_class(status);
    match (class_name.is_empty(), status.is_empty()) {
        (_, true) => String::from(class_name),
        (true, false) => String::from(status),
        (false, false) => format!("{class_name} {status}"),
    }
}
