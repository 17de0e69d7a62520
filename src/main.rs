/// Native walkthrough: replays a scripted visit against the in-memory page
/// and logs what happens.
///
/// Usage: `sayour-sim [config.json]`
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::time::Duration;

    use sayour::host::{Bounds, Group, Hook, View};
    use sayour::sim::{Harness, RecordingView};
    use sayour::{Control, Key, Message, SiteConfig};

    let config = match std::env::args().nth(1) {
        Some(path) => match SiteConfig::load_from_path(std::path::Path::new(&path)) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => SiteConfig::default(),
    };

    env_logger::Builder::new()
        .filter_level(config.log_level.to_level_filter())
        .init();

    let mut view = RecordingView::new()
        .with(Hook::Preloader)
        .with(Hook::PreloaderBar)
        .with(Hook::PreloaderPercent)
        .with(Hook::Header)
        .with(Hook::GalleryModal)
        .with(Hook::GalleryMainImage)
        .with(Hook::GalleryCounter)
        .with(Hook::Popup)
        .with(Hook::PopupVideo)
        .with(Hook::NewsletterInput)
        .with(Hook::NewsletterField)
        .with(Hook::Cursor)
        .with(Hook::CursorFollower)
        .with_group(Group::Hero, 3)
        .with_group(Group::Reveal, 4)
        .with_group(Group::LazyVideo, 1)
        .with_viewport(1440.0, 900.0);
    for i in 0..4 {
        view.set_bounds(Hook::Reveal(i), Bounds::new(400.0 * i as f64, 300.0));
    }

    let mut harness = Harness::new(&config, view);
    harness.init();
    for asset in 0..config.critical_assets.len() {
        harness.send(Message::AssetSettled {
            asset,
            loaded: true,
        });
    }
    harness.advance(Duration::from_secs(1));

    harness.scroll(400.0);
    harness.send(Message::VideoVisible(0));
    harness.advance(Duration::from_millis(500));
    harness.send(Message::Click(Control::PopupClose));

    harness.send(Message::Click(Control::PreviewItem(1)));
    harness.send(Message::Key(Key::ArrowRight));
    harness.advance(Duration::from_millis(200));
    harness.send(Message::Key(Key::Escape));

    harness
        .view
        .set_input_value(Hook::NewsletterInput, "guest@example.com");
    harness.send(Message::Submit);
    harness.advance(Duration::from_secs(4));

    let page = &harness.page;
    log::info!(
        "Visit done: locked={}, revealed={}, popup={:?}, gallery open={}",
        page.lock().is_locked(),
        page.reveal().revealed_count(),
        page.popup().state(),
        page.gallery().is_open()
    );
}

// WASM doesn't use main(), it uses wasm_bindgen's start function
#[cfg(target_arch = "wasm32")]
fn main() {}
