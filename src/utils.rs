//! Geometry helpers shared by the desktop, taskbar, menu and windows

use serde::{Deserialize, Serialize};

/// A point in shell coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset_from(&self, origin: Point) -> Point {
        Point::new(self.x - origin.x, self.y - origin.y)
    }
}

/// Width and height in pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/// Rectangle structure for layout and hit testing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    pub fn from_parts(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// Half-open containment: the right and bottom edges are outside.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.right() && p.y >= self.y && p.y < self.bottom()
    }

    /// Top-left position that centers `size` inside this rectangle
    pub fn centered(&self, size: Size) -> Point {
        Point::new(
            self.x + (self.width - size.width) / 2,
            self.y + (self.height - size.height) / 2,
        )
    }

    /// Clamp a top-left position so that a box of `size` stays inside.
    ///
    /// Each axis is clamped independently. When the box is larger than the
    /// rectangle the lower bound wins, which pins the title bar to the top
    /// left corner instead of pushing it off screen.
    pub fn clamp_origin(&self, origin: Point, size: Size) -> Point {
        let max_x = self.right() - size.width;
        let max_y = self.bottom() - size.height;
        Point::new(
            origin.x.min(max_x).max(self.x),
            origin.y.min(max_y).max(self.y),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_is_half_open() {
        let r = Rect::new(10, 10, 20, 20);
        assert!(r.contains(Point::new(10, 10)));
        assert!(r.contains(Point::new(29, 29)));
        assert!(!r.contains(Point::new(30, 15)));
        assert!(!r.contains(Point::new(15, 30)));
    }

    #[test]
    fn clamp_keeps_box_inside() {
        let desk = Rect::new(0, 0, 600, 370);
        let size = Size::new(300, 200);
        assert_eq!(desk.clamp_origin(Point::new(-40, 500), size), Point::new(0, 170));
        assert_eq!(desk.clamp_origin(Point::new(900, -3), size), Point::new(300, 0));
        assert_eq!(desk.clamp_origin(Point::new(120, 80), size), Point::new(120, 80));
    }

    #[test]
    fn clamp_pins_oversized_box_to_origin() {
        let desk = Rect::new(5, 5, 100, 100);
        let p = desk.clamp_origin(Point::new(60, 60), Size::new(400, 400));
        assert_eq!(p, Point::new(5, 5));
    }

    #[test]
    fn centered_in_shell() {
        let shell = Rect::new(0, 0, 600, 400);
        assert_eq!(shell.centered(Size::new(350, 180)), Point::new(125, 110));
    }
}
