use super::*;

#[test]
fn contains_is_half_open() {
    let r = Rect::new(2, 3, 4, 2);
    assert!(r.contains(Pos::new(2, 3)));
    assert!(r.contains(Pos::new(5, 4)));
    assert!(!r.contains(Pos::new(6, 3)));
    assert!(!r.contains(Pos::new(2, 5)));
}

#[test]
fn empty_rect_contains_nothing() {
    let r = Rect::new(5, 5, 0, 3);
    assert!(!r.contains(Pos::new(5, 5)));
    assert!(r.is_empty());
}

#[test]
fn mid_y_rounds_down() {
    assert_eq!(Rect::new(0, 4, 10, 1).mid_y(), 4);
    assert_eq!(Rect::new(0, 4, 10, 3).mid_y(), 5);
}

#[test]
fn right_and_bottom_saturate() {
    let r = Rect::new(u16::MAX - 1, u16::MAX - 1, 10, 10);
    assert_eq!(r.right(), u16::MAX);
    assert_eq!(r.bottom(), u16::MAX);
}
