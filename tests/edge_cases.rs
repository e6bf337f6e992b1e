use boxtree::{BBox, RTree, TreeOptions};

fn small_tree() -> TreeOptions {
    TreeOptions::new().with_max_entries(4)
}

#[test]
fn test_loading_nothing_is_a_noop() {
    let mut empty: Vec<[f64; 2]> = Vec::new();
    let mut tree = RTree::new();
    tree.load(&mut empty[..]);

    assert!(tree.is_empty());
    assert_eq!(tree.height(), 1);
    assert!(tree.entries().is_empty());
}

#[test]
fn test_search_on_empty_tree() {
    let tree = RTree::<&mut [[f64; 4]]>::new();

    assert!(tree.search(BBox::new(-180.0, -90.0, 180.0, 90.0)).is_empty());
    assert!(!tree.collides(BBox::new(-180.0, -90.0, 180.0, 90.0)));
}

#[test]
fn test_remove_from_empty_tree_is_a_noop() {
    let mut tree = RTree::<&mut [[f64; 4]]>::new();
    assert!(!tree.remove(BBox::new(0.0, 0.0, 1.0, 1.0)));
}

#[test]
fn test_tiny_loads_fall_back_to_insertion() {
    let mut one = vec![[1.0, 1.0, 2.0, 2.0]];
    let mut tree = RTree::new();
    tree.load(&mut one[..]);

    assert_eq!(tree.len(), 1);
    assert_eq!(tree.height(), 1);
    assert!(tree.collides(BBox::new(0.0, 0.0, 1.5, 1.5)));
}

#[test]
fn test_remove_missing_rectangle_is_a_noop() {
    let mut data = vec![
        [0.0, 0.0, 1.0, 1.0],
        [2.0, 2.0, 3.0, 3.0],
        [4.0, 4.0, 5.0, 5.0],
        [6.0, 6.0, 7.0, 7.0],
    ];
    let mut tree = RTree::with_options(small_tree()).unwrap();
    tree.load(&mut data[..]);

    assert!(!tree.remove(BBox::new(10.0, 10.0, 11.0, 11.0)));
    // Same area, different corner: equality is componentwise.
    assert!(!tree.remove(BBox::new(0.0, 0.0, 1.0, 1.000001)));
    assert_eq!(tree.len(), 4);
}

#[test]
fn test_duplicate_rectangles_remove_one_at_a_time() {
    let mut data = vec![
        [5.0, 5.0, 6.0, 6.0],
        [5.0, 5.0, 6.0, 6.0],
        [0.0, 0.0, 1.0, 1.0],
        [9.0, 9.0, 9.5, 9.5],
    ];
    let mut tree = RTree::with_options(small_tree()).unwrap();
    tree.load(&mut data[..]);

    let duplicate = BBox::new(5.0, 5.0, 6.0, 6.0);
    assert!(tree.remove(duplicate));
    assert_eq!(tree.len(), 3);
    assert!(tree.collides(duplicate));

    assert!(tree.remove(duplicate));
    assert_eq!(tree.len(), 2);
    assert!(!tree.collides(duplicate));
}

#[test]
fn test_remove_with_rejecting_predicate_is_a_noop() {
    let mut data = vec![
        [0.0, 0.0, 1.0, 1.0],
        [2.0, 2.0, 3.0, 3.0],
        [4.0, 4.0, 5.0, 5.0],
        [6.0, 6.0, 7.0, 7.0],
    ];
    let mut tree = RTree::with_options(small_tree()).unwrap();
    tree.load(&mut data[..]);

    assert!(!tree.remove_with(BBox::new(2.0, 2.0, 3.0, 3.0), |_| false));
    assert_eq!(tree.len(), 4);
}

#[test]
fn test_remove_everything_then_reload() {
    let mut data: Vec<[f64; 4]> = (0..20)
        .map(|i| {
            let v = i as f64;
            [v, v, v + 0.5, v + 0.5]
        })
        .collect();
    let reference = data.clone();
    let mut fresh = data.clone();

    let mut tree = RTree::with_options(small_tree()).unwrap();
    tree.load(&mut data[..]);

    for rect in &reference {
        assert!(tree.remove(BBox::new(rect[0], rect[1], rect[2], rect[3])));
    }
    assert!(tree.is_empty());
    assert_eq!(tree.height(), 1);
    assert!(!tree.collides(BBox::new(-100.0, -100.0, 100.0, 100.0)));

    tree.load(&mut fresh[..]);
    assert_eq!(tree.len(), 20);
    assert!(tree.collides(BBox::new(0.0, 0.0, 0.25, 0.25)));
}

#[test]
fn test_clear_releases_everything() {
    let mut data: Vec<[f64; 2]> = (0..30).map(|i| [i as f64, (i * 3 % 7) as f64]).collect();
    let mut again: Vec<[f64; 2]> = (0..5).map(|i| [i as f64, i as f64]).collect();
    let mut tree = RTree::new();
    tree.load(&mut data[..]);
    assert_eq!(tree.len(), 30);

    tree.clear();
    assert!(tree.is_empty());
    assert_eq!(tree.height(), 1);
    assert!(tree.search(BBox::new(0.0, 0.0, 100.0, 100.0)).is_empty());

    tree.load(&mut again[..]);
    assert_eq!(tree.len(), 5);
}

#[test]
fn test_unbounded_rectangles_bulk_load() {
    let inf = f64::INFINITY;
    let mut data = vec![[-inf, -inf, inf, inf]; 6];
    let mut tree = RTree::with_options(small_tree()).unwrap();
    tree.load(&mut data[..]);

    assert_eq!(tree.height(), 2);
    assert_eq!(tree.len(), 6);
    assert_eq!(tree.search(BBox::new(0.0, 0.0, 1.0, 1.0)).len(), 6);
}

#[test]
fn test_unbounded_rectangles_inserted_one_by_one() {
    let inf = f64::INFINITY;
    let mut data = vec![[-inf, -inf, inf, inf]; 6];
    let mut tree = RTree::with_options(small_tree()).unwrap();
    for rect in data.chunks_exact_mut(1) {
        tree.insert(rect);
    }

    assert_eq!(tree.height(), 2);
    assert_eq!(tree.len(), 6);
    assert_eq!(tree.search(BBox::new(0.0, 0.0, 1.0, 1.0)).len(), 6);
}

#[test]
fn test_nan_query_returns_nothing() {
    let mut data = vec![
        [0.0, 0.0, 1.0, 1.0],
        [2.0, 2.0, 3.0, 3.0],
        [4.0, 4.0, 5.0, 5.0],
        [6.0, 6.0, 7.0, 7.0],
    ];
    let mut tree = RTree::with_options(small_tree()).unwrap();
    tree.load(&mut data[..]);

    let query = BBox::new(f64::NAN, 0.0, 10.0, 10.0);
    assert!(tree.search(query).is_empty());
    assert!(!tree.collides(query));
}

#[test]
fn test_degenerate_rectangles_are_searchable() {
    // Points and a zero-width segment stored as rectangles.
    let mut data = vec![
        [3.0, 3.0, 3.0, 3.0],
        [5.0, 1.0, 5.0, 8.0],
        [7.0, 7.0, 7.0, 7.0],
        [9.0, 9.0, 9.0, 9.0],
    ];
    let mut tree = RTree::with_options(small_tree()).unwrap();
    tree.load(&mut data[..]);

    assert!(tree.collides(BBox::new(3.0, 3.0, 3.0, 3.0)));
    assert_eq!(tree.search(BBox::new(4.0, 0.0, 6.0, 10.0)).len(), 1);
    assert!(tree.remove(BBox::new(5.0, 1.0, 5.0, 8.0)));
    assert!(tree.search(BBox::new(4.0, 0.0, 6.0, 10.0)).is_empty());
}

#[test]
fn test_entry_data_points_back_into_storage() {
    let mut data = vec![[1.0, 2.0, 3.0, 4.0], [5.0, 6.0, 7.0, 8.0]];
    let mut tree = RTree::new();
    tree.load(&mut data[..]);

    let hits = tree.search(BBox::new(0.0, 0.0, 3.5, 4.5));
    assert_eq!(hits.len(), 1);
    let pinned: &[[f64; 4]] = hits[0].data();
    assert_eq!(pinned.len(), 1);
    assert_eq!(pinned[0], [1.0, 2.0, 3.0, 4.0]);
}
