#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Block library tests: discovery, event dispatch, registration.

use offset_blocks::BlockLibrary;
use offset_blocks::hooks::HostEvent;
use offset_blocks::host::{HostCall, RecordingHost};
use offset_blocks::location::HostRoots;
use offset_test_utils::{TestBlocksDir, test_block};

#[test]
fn discover_registers_valid_blocks_and_skips_invalid() {
    let dir = TestBlocksDir::new();
    dir.add("hero", test_block("offset/hero"));
    dir.add("card", test_block("offset/card"));
    dir.add_raw("broken/block.json", "{}");
    dir.add_raw("notes/readme.md", "not a block");

    let mut library = BlockLibrary::new(HostRoots::default());
    let registered = library.discover(dir.path()).unwrap();

    // Directory name order: card, hero
    assert_eq!(registered, vec!["offset/card", "offset/hero"]);
    assert_eq!(library.len(), 2);
    assert!(library.get("offset/hero").is_some());
}

#[test]
fn init_registers_every_block_with_host() {
    let dir = TestBlocksDir::new();
    dir.add("hero", test_block("offset/hero").with_key("category", "design".into()));
    dir.add("card", test_block("offset/card"));

    let mut library = BlockLibrary::new(HostRoots::default());
    library.discover(dir.path()).unwrap();

    let host = RecordingHost::new();
    library.dispatch(HostEvent::Init, &host);
    assert_eq!(host.registered_blocks(), vec!["offset/card", "offset/hero"]);

    let hero = host
        .calls()
        .into_iter()
        .find_map(|c| match c {
            HostCall::RegisterBlockType(r) if r.name == "offset/hero" => Some(r),
            _ => None,
        })
        .unwrap();
    assert_eq!(hero.manifest["category"], "design");
}

#[test]
fn frontend_enqueue_only_for_blocks_with_assets() {
    let dir = TestBlocksDir::new();
    dir.add(
        "hero",
        test_block("offset/hero")
            .with_all_assets()
            .with_block_url("https://cdn.test/hero"),
    );
    dir.add("plain", test_block("offset/plain"));

    let mut library = BlockLibrary::new(HostRoots::default());
    library.discover(dir.path()).unwrap();

    assert_eq!(library.actions().action_count(HostEvent::EnqueueScripts), 1);
    assert_eq!(library.actions().action_count(HostEvent::Init), 2);

    let host = RecordingHost::new();
    library.dispatch(HostEvent::EnqueueScripts, &host);
    assert_eq!(host.enqueued_styles(), vec!["offset_hero_style"]);
    assert_eq!(host.enqueued_scripts(), vec!["offset_hero_script"]);

    match &host.calls()[0] {
        HostCall::EnqueueStyle(asset) => {
            assert_eq!(asset.src, "https://cdn.test/hero/build/style-index.css");
        }
        other => panic!("expected style enqueue first, got {other:?}"),
    }
}

#[test]
fn editor_enqueue_requires_block_editor_screen() {
    let dir = TestBlocksDir::new();
    dir.add(
        "hero",
        test_block("offset/hero")
            .with_all_assets()
            .with_block_url("https://cdn.test/hero"),
    );

    let mut library = BlockLibrary::new(HostRoots::default());
    library.discover(dir.path()).unwrap();

    let dashboard = RecordingHost::new();
    library.dispatch(HostEvent::AdminEnqueueScripts, &dashboard);
    assert!(dashboard.calls().is_empty());

    let editor = RecordingHost::in_block_editor();
    library.dispatch(HostEvent::AdminEnqueueScripts, &editor);
    assert_eq!(editor.enqueued_styles(), vec!["offset_hero_editor_style"]);
    assert_eq!(editor.enqueued_scripts(), vec!["offset_hero_editor_script"]);
}

#[test]
fn reregistering_replaces_block_and_subscriptions() {
    let dir = TestBlocksDir::new();
    let first = dir.add(
        "hero",
        test_block("offset/hero")
            .with_all_assets()
            .with_block_url("https://cdn.test/hero"),
    );
    let second = dir.add("hero-plain", test_block("offset/hero"));

    let mut library = BlockLibrary::new(HostRoots::default());
    library.register(&first).unwrap();
    assert!(library.actions().has_action(HostEvent::EnqueueScripts, "offset/hero"));

    library.register(&second).unwrap();
    assert_eq!(library.len(), 1);
    assert_eq!(library.actions().action_count(HostEvent::Init), 1);
    assert!(!library.actions().has_action(HostEvent::EnqueueScripts, "offset/hero"));
    assert_eq!(library.get("offset/hero").unwrap().dir(), second.as_path());
}

#[test]
fn discover_skips_names_without_a_hook_name() {
    let dir = TestBlocksDir::new();
    dir.add("a-jp", test_block("日本"));
    dir.add("b-zh", test_block("中文"));
    dir.add("hero", test_block("offset/hero"));

    let mut library = BlockLibrary::new(HostRoots::default());
    let registered = library.discover(dir.path()).unwrap();

    assert_eq!(registered, vec!["offset/hero"]);
    assert!(library.get("日本").is_none());
    assert!(library.get("中文").is_none());
}
