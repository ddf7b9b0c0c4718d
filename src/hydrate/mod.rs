//! Placeholder hydration.
//!
//! Rendered posts contain inert placeholder elements such as
//! `<SteamGameBlock :gameUrl="'...'" />`. A [`Hydrator`] finds them in a
//! [`Container`], decodes their bound props and mounts one [`Widget`] per
//! element.
//!
//! Mount records are keyed by `(container id, element position)`, so:
//! - hydrating the same container again unmounts every old widget before
//!   mounting its replacement
//! - records for elements that disappeared are torn down on the next pass
//!
//! The hydrator is not reentrant; `&mut self` serializes passes.

mod components;
mod dom;
mod props;
mod selector;

#[cfg(test)]
mod tests;

pub use components::default_components;
pub use dom::{Element, scan};
pub use props::{BINDING_PREFIX, PropKind, PropValue, Props, decode_prop};
pub use selector::Selector;

use rustc_hash::{FxHashMap, FxHasher};
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};
use std::ops::Range;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HydrateError {
    #[error("invalid selector `{0}` (expected `Tag`, `.class`, `#id` or `[attr]`)")]
    InvalidSelector(String),
}

/// A live widget bound to one element.
pub trait Widget: Send {
    fn render(&self) -> String;

    /// Release resources. Called exactly once, before the widget is dropped.
    fn unmount(&mut self) {}
}

/// Factory for widgets of one placeholder type.
pub trait Component: Send + Sync {
    /// Declared props and how to decode them.
    fn schema(&self) -> &[(&'static str, PropKind)];

    fn mount(&self, props: &Props) -> Box<dyn Widget>;
}

/// Selectors mapped to components, tried in insertion order.
#[derive(Clone, Default)]
pub struct ComponentMap {
    entries: Vec<(Selector, Arc<dyn Component>)>,
}

impl ComponentMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, selector: &str, component: Arc<dyn Component>) -> Result<&mut Self, HydrateError> {
        let selector = selector.parse::<Selector>()?;
        self.entries.push((selector, component));
        Ok(self)
    }

    /// Insert by element name, which cannot fail for a plain identifier.
    pub(crate) fn insert_tag(&mut self, tag: &str, component: Arc<dyn Component>) {
        self.entries.push((Selector::Tag(tag.to_string()), component));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn find(&self, element: &Element) -> Option<&Arc<dyn Component>> {
        self.entries
            .iter()
            .find(|(selector, _)| selector.matches(element))
            .map(|(_, component)| component)
    }
}

/// A fragment of rendered HTML with a stable identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    pub id: String,
    pub html: String,
}

impl Container {
    pub fn new(id: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            html: html.into(),
        }
    }

    fn fingerprint(&self) -> u64 {
        let mut hasher = FxHasher::default();
        self.html.hash(&mut hasher);
        hasher.finish()
    }
}

/// Identity of one mounted widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(u64);

struct MountRecord {
    instance: InstanceId,
    element: String,
    range: Range<usize>,
    widget: Box<dyn Widget>,
}

impl MountRecord {
    fn teardown(mut self) {
        self.widget.unmount();
    }
}

#[derive(Default)]
struct Mounted {
    fingerprint: u64,
    /// Keyed by element position in the container.
    records: BTreeMap<usize, MountRecord>,
}

/// Mounts and tracks widgets across containers.
#[derive(Default)]
pub struct Hydrator {
    containers: FxHashMap<String, Mounted>,
    next_instance: u64,
}

impl Hydrator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount a widget on every element of `container` matched by `map`.
    ///
    /// Returns the number of widgets mounted by this pass.
    pub fn hydrate(&mut self, container: &Container, map: &ComponentMap) -> usize {
        let elements = scan(&container.html);
        let mut previous = self
            .containers
            .remove(&container.id)
            .map(|m| m.records)
            .unwrap_or_default();
        let mut mounted = Mounted {
            fingerprint: container.fingerprint(),
            records: BTreeMap::new(),
        };

        for (position, element) in elements.iter().enumerate() {
            let Some(component) = map.find(element) else {
                continue;
            };
            if let Some(old) = previous.remove(&position) {
                old.teardown();
            }

            let props = Props::decode(&element.attrs, component.schema());
            let widget = component.mount(&props);
            let instance = InstanceId(self.next_instance);
            self.next_instance += 1;

            crate::debug!("hydrate"; "{}#{} <{}> mounted ({} props)", container.id, position, element.name, props.len());
            mounted.records.insert(
                position,
                MountRecord {
                    instance,
                    element: element.name.clone(),
                    range: element.range.clone(),
                    widget,
                },
            );
        }

        // Elements gone from the container
        for (_, stale) in previous {
            stale.teardown();
        }

        let count = mounted.records.len();
        self.containers.insert(container.id.clone(), mounted);
        count
    }

    /// Unmount everything in `container_id`.
    pub fn teardown(&mut self, container_id: &str) -> usize {
        let Some(mounted) = self.containers.remove(container_id) else {
            return 0;
        };
        let count = mounted.records.len();
        for (_, record) in mounted.records {
            record.teardown();
        }
        count
    }

    /// Instances mounted in `container_id`, in document order.
    pub fn instances(&self, container_id: &str) -> Vec<InstanceId> {
        self.containers
            .get(container_id)
            .map(|m| m.records.values().map(|r| r.instance).collect())
            .unwrap_or_default()
    }

    /// Element names mounted in `container_id`, in document order.
    pub fn mounted_elements(&self, container_id: &str) -> Vec<&str> {
        self.containers
            .get(container_id)
            .map(|m| m.records.values().map(|r| r.element.as_str()).collect())
            .unwrap_or_default()
    }

    /// Total live widgets.
    pub fn len(&self) -> usize {
        self.containers.values().map(|m| m.records.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The container's HTML with each hydrated element replaced by its
    /// widget's output.
    ///
    /// Returns the HTML unchanged if the container was not hydrated in its
    /// current state.
    pub fn render(&self, container: &Container) -> String {
        let Some(mounted) = self.containers.get(&container.id) else {
            return container.html.clone();
        };
        if mounted.fingerprint != container.fingerprint() {
            crate::log!("warn"; "container `{}` changed since hydration; rendering as-is", container.id);
            return container.html.clone();
        }

        let mut out = String::with_capacity(container.html.len());
        let mut cursor = 0;
        for record in mounted.records.values() {
            // Nested inside an element already replaced
            if record.range.start < cursor {
                continue;
            }
            out.push_str(&container.html[cursor..record.range.start]);
            out.push_str(&record.widget.render());
            cursor = record.range.end;
        }
        out.push_str(&container.html[cursor..]);
        out
    }
}

impl Drop for Hydrator {
    fn drop(&mut self) {
        for (_, mounted) in self.containers.drain() {
            for (_, record) in mounted.records {
                record.teardown();
            }
        }
    }
}

/// Hydrate and render `html` in one go with the built-in components.
///
/// `image_root` resolves relative carousel paths.
pub fn hydrate_html(html: &str, image_root: &str) -> String {
    let container = Container::new("document", html);
    let mut hydrator = Hydrator::new();
    hydrator.hydrate(&container, &default_components(image_root));
    hydrator.render(&container)
}
