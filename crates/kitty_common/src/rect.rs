/// An axis-aligned rectangle with half-open bounds: a point on the right or
/// bottom edge is outside.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: u32, h: u32) -> Rect {
        Rect { x, y, w, h }
    }

    pub fn from_point_size((x, y): (i32, i32), (w, h): (u32, u32)) -> Rect {
        Rect { x, y, w, h }
    }

    #[inline]
    pub const fn topleft(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    #[inline]
    pub const fn size(&self) -> (u32, u32) {
        (self.w, self.h)
    }

    #[inline]
    pub fn right(&self) -> i32 {
        self.x.saturating_add_unsigned(self.w)
    }

    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y.saturating_add_unsigned(self.h)
    }

    pub fn center(&self) -> (i32, i32) {
        (self.x + (self.w / 2) as i32, self.y + (self.h / 2) as i32)
    }

    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    pub fn collidepoint(&self, (x, y): (i32, i32)) -> bool {
        self.x <= x && x < self.right() && self.y <= y && y < self.bottom()
    }

    pub fn colliderect(&self, other: &Rect) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    pub fn moved(&self, (dx, dy): (i32, i32)) -> Rect {
        Rect {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    pub fn move_ip(&mut self, delta: (i32, i32)) {
        *self = self.moved(delta);
    }
}
