//! Filter registry - named channels of ordered transform functions.
//!
//! Each channel holds handlers sorted by priority (lower = called first,
//! registration order for ties). Handler errors are not swallowed: they
//! propagate to whoever applied the channel.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use tracing::debug;

/// Block attributes as saved by the editor.
pub type Attributes = Map<String, Value>;

type AttributesFn = Arc<dyn Fn(Attributes) -> Result<Attributes> + Send + Sync>;
type ContentFn = Arc<dyn Fn(String) -> Result<String> + Send + Sync>;
type RenderFn = Arc<dyn Fn(&Attributes, &str) -> Result<String> + Send + Sync>;
type ToggleFn = Arc<dyn Fn(bool) -> Result<bool> + Send + Sync>;

/// Names of the filter channels the render pipeline applies.
pub mod channel {
    /// Attributes of every block.
    pub const ATTRIBUTES: &str = "offset_block_attributes";
    /// Content of every block.
    pub const CONTENT: &str = "offset_block_content";
    /// Prefix of the per-block render override channel.
    pub const RENDER: &str = "offset_block_render";
    /// Whether to enqueue a block's front-end style.
    pub const IS_STYLE_ENQUEUE: &str = "offset_block_is_style_enqueue";
    /// Whether to enqueue a block's front-end script.
    pub const IS_SCRIPT_ENQUEUE: &str = "offset_block_is_script_enqueue";

    /// Per-block variant of a channel, e.g. `offset_block_content_offset_hero`.
    pub fn for_block(base: &str, hook_name: &str) -> String {
        format!("{base}_{hook_name}")
    }
}

#[derive(Clone)]
struct Handler<F> {
    callback: F,
    priority: i32,
}

/// Registry of filter channels, one map per handler signature.
#[derive(Default)]
pub struct FilterRegistry {
    attributes: HashMap<String, Vec<Handler<AttributesFn>>>,
    content: HashMap<String, Vec<Handler<ContentFn>>>,
    render: HashMap<String, Vec<Handler<RenderFn>>>,
    toggles: HashMap<String, Vec<Handler<ToggleFn>>>,
}

impl std::fmt::Debug for FilterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterRegistry")
            .field("attributes", &self.attributes.keys().collect::<Vec<_>>())
            .field("content", &self.content.keys().collect::<Vec<_>>())
            .field("render", &self.render.keys().collect::<Vec<_>>())
            .field("toggles", &self.toggles.keys().collect::<Vec<_>>())
            .finish()
    }
}

fn insert<F>(map: &mut HashMap<String, Vec<Handler<F>>>, channel: String, priority: i32, callback: F) {
    let list = map.entry(channel).or_default();
    list.push(Handler { callback, priority });
    list.sort_by_key(|h| h.priority);
}

fn handlers<'a, F>(map: &'a HashMap<String, Vec<Handler<F>>>, channel: &str) -> &'a [Handler<F>] {
    map.get(channel).map(|v| v.as_slice()).unwrap_or(&[])
}

impl FilterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a transform to an attributes channel.
    pub fn add_attributes_filter<F>(&mut self, channel: impl Into<String>, priority: i32, f: F)
    where
        F: Fn(Attributes) -> Result<Attributes> + Send + Sync + 'static,
    {
        insert(&mut self.attributes, channel.into(), priority, Arc::new(f));
    }

    /// Attach a transform to a content channel.
    pub fn add_content_filter<F>(&mut self, channel: impl Into<String>, priority: i32, f: F)
    where
        F: Fn(String) -> Result<String> + Send + Sync + 'static,
    {
        insert(&mut self.content, channel.into(), priority, Arc::new(f));
    }

    /// Attach a handler to a render override channel.
    ///
    /// The handler receives the filtered attributes and content and returns
    /// HTML, or an empty string to decline.
    pub fn add_render_filter<F>(&mut self, channel: impl Into<String>, priority: i32, f: F)
    where
        F: Fn(&Attributes, &str) -> Result<String> + Send + Sync + 'static,
    {
        insert(&mut self.render, channel.into(), priority, Arc::new(f));
    }

    /// Attach a transform to a boolean toggle channel.
    pub fn add_toggle_filter<F>(&mut self, channel: impl Into<String>, priority: i32, f: F)
    where
        F: Fn(bool) -> Result<bool> + Send + Sync + 'static,
    {
        insert(&mut self.toggles, channel.into(), priority, Arc::new(f));
    }

    /// Pass attributes through every handler of a channel.
    pub fn apply_attributes(&self, channel: &str, attributes: Attributes) -> Result<Attributes> {
        handlers(&self.attributes, channel)
            .iter()
            .try_fold(attributes, |acc, h| {
                (h.callback)(acc).with_context(|| format!("filter '{channel}' failed"))
            })
    }

    /// Pass content through every handler of a channel.
    pub fn apply_content(&self, channel: &str, content: String) -> Result<String> {
        handlers(&self.content, channel)
            .iter()
            .try_fold(content, |acc, h| {
                (h.callback)(acc).with_context(|| format!("filter '{channel}' failed"))
            })
    }

    /// Ask render handlers for override HTML.
    ///
    /// Returns the first non-empty string; later handlers are not called.
    pub fn apply_render(
        &self,
        channel: &str,
        attributes: &Attributes,
        content: &str,
    ) -> Result<Option<String>> {
        for handler in handlers(&self.render, channel) {
            let html = (handler.callback)(attributes, content)
                .with_context(|| format!("filter '{channel}' failed"))?;
            if !html.is_empty() {
                debug!(channel = %channel, priority = handler.priority, "render override fired");
                return Ok(Some(html));
            }
        }
        Ok(None)
    }

    /// Pass a boolean through every handler of a toggle channel.
    pub fn apply_toggle(&self, channel: &str, initial: bool) -> Result<bool> {
        handlers(&self.toggles, channel)
            .iter()
            .try_fold(initial, |acc, h| {
                (h.callback)(acc).with_context(|| format!("filter '{channel}' failed"))
            })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn empty_channel_passes_through() {
        let filters = FilterRegistry::new();
        let mut attrs = Attributes::new();
        attrs.insert("title".to_string(), json!("Hi"));

        let out = filters.apply_attributes(channel::ATTRIBUTES, attrs.clone()).unwrap();
        assert_eq!(out, attrs);
        assert_eq!(filters.apply_content(channel::CONTENT, "x".to_string()).unwrap(), "x");
        assert!(filters.apply_toggle(channel::IS_STYLE_ENQUEUE, true).unwrap());
        assert!(filters
            .apply_render("offset_block_render_hero", &attrs, "")
            .unwrap()
            .is_none());
    }

    #[test]
    fn transforms_compose_in_priority_order() {
        let mut filters = FilterRegistry::new();
        filters.add_content_filter(channel::CONTENT, 20, |c| Ok(format!("{c}b")));
        filters.add_content_filter(channel::CONTENT, 5, |c| Ok(format!("{c}a")));
        filters.add_content_filter(channel::CONTENT, 20, |c| Ok(format!("{c}c")));

        let out = filters.apply_content(channel::CONTENT, String::new()).unwrap();
        assert_eq!(out, "abc");
    }

    #[test]
    fn attribute_filters_can_add_keys() {
        let mut filters = FilterRegistry::new();
        filters.add_attributes_filter(channel::ATTRIBUTES, 10, |mut a| {
            a.insert("align".to_string(), json!("wide"));
            Ok(a)
        });

        let out = filters
            .apply_attributes(channel::ATTRIBUTES, Attributes::new())
            .unwrap();
        assert_eq!(out["align"], "wide");
    }

    #[test]
    fn render_stops_at_first_non_empty() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut filters = FilterRegistry::new();

        filters.add_render_filter("r", 1, |_, _| Ok(String::new()));
        filters.add_render_filter("r", 2, |_, content| Ok(format!("<b>{content}</b>")));
        let counter = Arc::clone(&calls);
        filters.add_render_filter("r", 3, move |_, _| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok("<i>late</i>".to_string())
        });

        let html = filters.apply_render("r", &Attributes::new(), "hi").unwrap();
        assert_eq!(html.as_deref(), Some("<b>hi</b>"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn toggles_compose() {
        let mut filters = FilterRegistry::new();
        filters.add_toggle_filter("t", 10, |_| Ok(false));
        filters.add_toggle_filter("t", 20, |v| Ok(!v));
        assert!(filters.apply_toggle("t", true).unwrap());
    }

    #[test]
    fn handler_errors_propagate_with_channel() {
        let mut filters = FilterRegistry::new();
        filters.add_content_filter(channel::CONTENT, 10, |_| anyhow::bail!("boom"));

        let err = filters
            .apply_content(channel::CONTENT, "x".to_string())
            .unwrap_err();
        assert!(err.to_string().contains(channel::CONTENT));
        assert!(format!("{err:#}").contains("boom"));
    }

    #[test]
    fn per_block_channel_name() {
        assert_eq!(
            channel::for_block(channel::IS_STYLE_ENQUEUE, "offset_hero"),
            "offset_block_is_style_enqueue_offset_hero"
        );
    }
}
