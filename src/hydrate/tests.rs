use super::*;
use crate::markdown::{CarouselImage, render};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Records every mount and tracks live widgets.
#[derive(Default)]
struct Recorder {
    schema: Vec<(&'static str, PropKind)>,
    live: Arc<AtomicUsize>,
    mounted: Mutex<Vec<Props>>,
}

impl Recorder {
    fn with_schema(schema: &[(&'static str, PropKind)]) -> Arc<Self> {
        Arc::new(Self {
            schema: schema.to_vec(),
            ..Default::default()
        })
    }

    fn live(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }
}

struct RecorderWidget {
    live: Arc<AtomicUsize>,
    label: String,
}

impl Widget for RecorderWidget {
    fn render(&self) -> String {
        format!("<i>{}</i>", self.label)
    }

    fn unmount(&mut self) {
        self.live.fetch_sub(1, Ordering::SeqCst);
    }
}

impl Component for Recorder {
    fn schema(&self) -> &[(&'static str, PropKind)] {
        &self.schema
    }

    fn mount(&self, props: &Props) -> Box<dyn Widget> {
        self.live.fetch_add(1, Ordering::SeqCst);
        self.mounted.lock().push(props.clone());
        let label = props
            .get("videoUrl")
            .and_then(PropValue::as_text)
            .unwrap_or("recorder")
            .to_string();
        Box::new(RecorderWidget {
            live: Arc::clone(&self.live),
            label,
        })
    }
}

fn recorder_map(selector: &str, recorder: &Arc<Recorder>) -> ComponentMap {
    let mut map = ComponentMap::new();
    map.insert(selector, Arc::clone(recorder) as Arc<dyn Component>)
        .unwrap();
    map
}

const PAGE: &str = "<p>intro</p>\
<BilibiliVideoBlock :videoUrl=\"&#39;https://b.tv/1&#39;\" />\
<p>middle</p>\
<BilibiliVideoBlock :videoUrl=\"&#39;https://b.tv/2&#39;\" />";

// ============================================================================
// Mount bookkeeping
// ============================================================================

#[test]
fn test_hydrate_twice_keeps_one_instance_per_element() {
    let recorder = Recorder::with_schema(&[("videoUrl", PropKind::Text)]);
    let map = recorder_map("BilibiliVideoBlock", &recorder);
    let container = Container::new("post", PAGE);
    let mut hydrator = Hydrator::new();

    assert_eq!(hydrator.hydrate(&container, &map), 2);
    let first = hydrator.instances("post");
    assert_eq!(recorder.live(), 2);

    assert_eq!(hydrator.hydrate(&container, &map), 2);
    let second = hydrator.instances("post");
    assert_eq!(recorder.live(), 2);
    assert_eq!(hydrator.len(), 2);

    assert_eq!(second.len(), 2);
    assert!(second.iter().all(|id| !first.contains(id)));
}

#[test]
fn test_stale_records_torn_down() {
    let recorder = Recorder::with_schema(&[]);
    let map = recorder_map("BilibiliVideoBlock", &recorder);
    let mut hydrator = Hydrator::new();

    hydrator.hydrate(&Container::new("post", PAGE), &map);
    assert_eq!(recorder.live(), 2);

    hydrator.hydrate(&Container::new("post", "<p>gone</p>"), &map);
    assert_eq!(recorder.live(), 0);
    assert!(hydrator.is_empty());
}

#[test]
fn test_containers_independent() {
    let recorder = Recorder::with_schema(&[]);
    let map = recorder_map("BilibiliVideoBlock", &recorder);
    let mut hydrator = Hydrator::new();

    hydrator.hydrate(&Container::new("a", PAGE), &map);
    hydrator.hydrate(&Container::new("b", PAGE), &map);
    assert_eq!(recorder.live(), 4);

    assert_eq!(hydrator.teardown("a"), 2);
    assert_eq!(recorder.live(), 2);
    assert_eq!(hydrator.teardown("a"), 0);
}

#[test]
fn test_drop_unmounts() {
    let recorder = Recorder::with_schema(&[]);
    let map = recorder_map("BilibiliVideoBlock", &recorder);
    {
        let mut hydrator = Hydrator::new();
        hydrator.hydrate(&Container::new("post", PAGE), &map);
        assert_eq!(recorder.live(), 2);
    }
    assert_eq!(recorder.live(), 0);
}

#[test]
fn test_first_matching_selector_wins() {
    let by_tag = Recorder::with_schema(&[]);
    let by_attr = Recorder::with_schema(&[]);
    let mut map = ComponentMap::new();
    map.insert("[:videoUrl]", Arc::clone(&by_attr) as Arc<dyn Component>)
        .unwrap()
        .insert("BilibiliVideoBlock", Arc::clone(&by_tag) as Arc<dyn Component>)
        .unwrap();

    let mut hydrator = Hydrator::new();
    hydrator.hydrate(&Container::new("post", PAGE), &map);
    assert_eq!(by_attr.live(), 2);
    assert_eq!(by_tag.live(), 0);
}

#[test]
fn test_invalid_selector() {
    let mut map = ComponentMap::new();
    let err = map
        .insert("div p", Recorder::with_schema(&[]) as Arc<dyn Component>)
        .err()
        .unwrap();
    assert_eq!(err, HydrateError::InvalidSelector("div p".into()));
    assert!(map.is_empty());
}

// ============================================================================
// Rendering
// ============================================================================

#[test]
fn test_render_splices_widgets() {
    let recorder = Recorder::with_schema(&[("videoUrl", PropKind::Text)]);
    let map = recorder_map("BilibiliVideoBlock", &recorder);
    let container = Container::new("post", PAGE);
    let mut hydrator = Hydrator::new();
    hydrator.hydrate(&container, &map);

    assert_eq!(
        hydrator.render(&container),
        "<p>intro</p><i>https://b.tv/1</i><p>middle</p><i>https://b.tv/2</i>"
    );
}

#[test]
fn test_render_skips_changed_container() {
    let recorder = Recorder::with_schema(&[]);
    let map = recorder_map("BilibiliVideoBlock", &recorder);
    let mut hydrator = Hydrator::new();
    hydrator.hydrate(&Container::new("post", PAGE), &map);

    let changed = Container::new("post", "<p>new</p>");
    assert_eq!(hydrator.render(&changed), "<p>new</p>");
}

#[test]
fn test_render_outer_element_wins() {
    let recorder = Recorder::with_schema(&[]);
    let map = recorder_map(".wrap", &recorder);
    let mut map_all = map.clone();
    map_all
        .insert("b", Arc::clone(&recorder) as Arc<dyn Component>)
        .unwrap();

    let container = Container::new("c", "<div class=\"wrap\"><b>x</b></div>!");
    let mut hydrator = Hydrator::new();
    assert_eq!(hydrator.hydrate(&container, &map_all), 2);
    assert_eq!(hydrator.render(&container), "<i>recorder</i>!");
}

// ============================================================================
// Renderer → hydrator round trips
// ============================================================================

#[test]
fn test_embed_round_trip() {
    let url = "https://store.steampowered.com/app/620/?a=1&b='c'";
    let html = render(&format!("```steam-game\n{url}\n```\n"));

    let recorder = Recorder::with_schema(&[("gameUrl", PropKind::Text)]);
    let map = recorder_map("SteamGameBlock", &recorder);
    let mut hydrator = Hydrator::new();
    assert_eq!(hydrator.hydrate(&Container::new("post", html), &map), 1);

    let mounted = recorder.mounted.lock();
    assert_eq!(mounted[0].text("gameUrl"), Some(url));
}

#[test]
fn test_carousel_round_trip() {
    let content = [
        "![Alpha](alpha.png \"First\")",
        "gallery/beta.jpg | Second's \"quoted\" caption",
        "this line is dropped",
        "https://cdn.example.com/gamma.webp",
        "delta.gif",
    ];
    let html = render(&format!("```carousel\n{}\n```\n", content.join("\n")));

    let recorder = Recorder::with_schema(&[("images", PropKind::Json)]);
    let map = recorder_map("ImageCarousel", &recorder);
    let mut hydrator = Hydrator::new();
    hydrator.hydrate(&Container::new("post", html), &map);

    let mounted = recorder.mounted.lock();
    let images: Vec<CarouselImage> =
        serde_json::from_value(mounted[0].json("images").unwrap().clone()).unwrap();

    let pairs: Vec<(&str, &str)> = images
        .iter()
        .map(|i| (i.src.as_str(), i.description.as_str()))
        .collect();
    assert_eq!(
        pairs,
        [
            ("alpha.png", "First"),
            ("gallery/beta.jpg", "Second's \"quoted\" caption"),
            ("https://cdn.example.com/gamma.webp", ""),
            ("delta.gif", ""),
        ]
    );
}

#[test]
fn test_default_components_render_page() {
    let source = "```github-repo\nhttps://github.com/rust-lang/rust\n```\n\n```carousel\na.png | A\n```\n";
    let html = hydrate_html(&render(source), "/Posts/Images");
    assert!(html.contains("href=\"https://github.com/rust-lang/rust\""));
    assert!(html.contains("<figure><img src=\"/Posts/Images/a.png\""));
    assert!(!html.contains("GithubRepoBlock"));
    assert!(!html.contains("ImageCarousel"));
}
