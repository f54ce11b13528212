use pretty_assertions::assert_eq;

use winstack::config::Config;
use winstack::geometry::{Point, Rect, Size};
use winstack::layout::{cascade_offsets, stack_frames, Arranger};
use winstack::source::WindowSource;
use winstack::store::{IconLayoutStore, LayoutDirs, LayoutStore, MatchTier};
use winstack::testing::{MemoryDesktop, MemoryShell, MemoryWindow};

fn open(desktop: &MemoryDesktop, titles: &[&str]) {
    for (i, title) in titles.iter().enumerate() {
        desktop.add(MemoryWindow::new(
            title,
            &format!("/usr/bin/{}", title.to_lowercase()),
            Rect::new(40 * i as i32, 30 * i as i32, 800, 600),
        ));
    }
}

#[test]
fn stack_then_save_then_cascade_then_restore() {
    let root = tempfile::tempdir().unwrap();
    let dirs = LayoutDirs::new(root.path());
    let config = Config::default();
    let desktop = MemoryDesktop::new(Size::new(1920, 1080));
    open(&desktop, &["Terminal", "Browser", "Editor"]);

    let source = WindowSource::new(&desktop, &config);
    let windows = source.handles().unwrap();
    let arranger = Arranger::new(&desktop, &config);

    arranger.stack(&windows, 0);
    let stacked: Vec<Rect> = windows.iter().map(|w| desktop.get(*w).unwrap().frame).collect();
    assert_eq!(
        stacked,
        vec![
            Rect::new(0, 0, 1920, 360),
            Rect::new(0, 360, 1920, 360),
            Rect::new(0, 720, 1920, 360),
        ]
    );
    // Sorted by title.
    assert_eq!(desktop.get(windows[0]).unwrap().title, "Browser");

    let store = LayoutStore::new(&desktop, &dirs);
    store.save("stacked", &windows).unwrap();
    assert_eq!(dirs.window_layouts().unwrap(), vec!["stacked"]);

    arranger.cascade(&windows);
    assert_ne!(desktop.get(windows[0]).unwrap().frame, stacked[0]);

    let summary = store.restore("stacked", &source.handles().unwrap()).unwrap();
    assert_eq!(summary.matches.len(), 3);
    assert!(summary.matches.iter().all(|m| m.tier == MatchTier::Handle));
    let restored: Vec<Rect> = windows.iter().map(|w| desktop.get(*w).unwrap().frame).collect();
    assert_eq!(restored, stacked);
}

#[test]
fn cascade_and_squish_agree_on_positions() {
    let config = Config::default();
    let desktop = MemoryDesktop::new(Size::new(1366, 768));
    let titles: Vec<String> = (0..20).map(|i| format!("Window {:02}", i)).collect();
    let titles: Vec<&str> = titles.iter().map(String::as_str).collect();
    open(&desktop, &titles);

    let windows = WindowSource::new(&desktop, &config).handles().unwrap();
    let arranger = Arranger::new(&desktop, &config);
    arranger.cascade(&windows);

    let expected = cascade_offsets(windows.len(), Size::new(1366, 768), &config.cascade);
    let actual: Vec<Point> = windows
        .iter()
        .map(|w| desktop.get(*w).unwrap().frame.origin())
        .collect();
    assert_eq!(actual, expected);

    assert_eq!(arranger.squish(&windows), 20);
}

#[test]
fn large_sets_are_stacked_page_by_page() {
    let config = Config::default();
    let desktop = MemoryDesktop::new(Size::new(1920, 1080));
    let titles: Vec<String> = (0..19).map(|i| format!("Window {:02}", i)).collect();
    let titles: Vec<&str> = titles.iter().map(String::as_str).collect();
    open(&desktop, &titles);

    let windows = WindowSource::new(&desktop, &config).handles().unwrap();
    let arranger = Arranger::new(&desktop, &config);

    let mut pager = arranger.stack(&windows, 0);
    assert_eq!(pager.count(), 3);
    assert!(!pager.has_prev());

    while pager.next() {
        arranger.stack(&windows, pager.index());
    }
    assert_eq!(pager.index(), 2);
    assert!(!pager.has_next());

    // The last page holds the three leftover windows, stacked on their own.
    let last: Vec<Rect> = windows[16..]
        .iter()
        .map(|w| desktop.get(*w).unwrap().frame)
        .collect();
    assert_eq!(last, stack_frames(3, Size::new(1920, 1080)));
}

#[test]
fn desktop_icons_survive_being_shuffled() {
    let root = tempfile::tempdir().unwrap();
    let dirs = LayoutDirs::new(root.path());
    let shell = MemoryShell::new([
        ("Home", Point::new(16, 16)),
        ("Trash", Point::new(16, 116)),
        ("notes.txt", Point::new(116, 16)),
    ]);

    let store = IconLayoutStore::new(&shell, &dirs);
    store.save("tidy").unwrap();

    shell.move_icon("Home", Point::new(900, 400));
    shell.move_icon("notes.txt", Point::new(10, 700));

    assert_eq!(store.restore("tidy").unwrap(), 3);
    assert_eq!(shell.position_of("Home"), Some(Point::new(16, 16)));
    assert_eq!(shell.position_of("notes.txt"), Some(Point::new(116, 16)));
    assert_eq!(dirs.desktop_layouts().unwrap(), vec!["tidy"]);
}
