use crate::config::{Corner, ViewConfig};
use crate::gui::scene::{
    ACCEPT_POPUP_MAX_HEIGHT, ACCEPT_POPUP_WIDTH, BUTTON_GAP, BUTTON_HEIGHT, BUTTON_ROW_TOP,
    CARD_HEIGHT, CARD_MAX_WIDTH, CARD_PADDING, DECLINE_POPUP_HEIGHT, DECLINE_POPUP_WIDTH,
    ENVELOPE_HEIGHT, ENVELOPE_WIDTH, HEART_COUNT, HEART_DRIFT, IMAGE_SHARE, NUDGE_OFFSET,
    POPUP_INSET, RESET_HEIGHT, RESET_MARGIN, RESET_WIDTH,
};
use courtship::{AssetRef, Assets, Offset, PopupState, Presentation, Stage};
use gdk_pixbuf::Pixbuf;
use rand::Rng;
use std::collections::HashMap;
use std::f64::consts::TAU;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self {
            x,
            y,
            w: w.max(0.0),
            h: h.max(0.0),
        }
    }

    pub fn centered(center: Point, w: f64, h: f64) -> Self {
        Self::new(center.x - w / 2.0, center.y - h / 2.0, w, h)
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.w && p.y >= self.y && p.y <= self.y + self.h
    }

    /// Scales about the centre.
    pub fn scaled(&self, factor: f64) -> Self {
        Self::centered(self.center(), self.w * factor, self.h * factor)
    }

    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy, self.w, self.h)
    }

    pub fn inset(&self, by: f64) -> Self {
        Self::new(self.x + by, self.y + by, self.w - 2.0 * by, self.h - 2.0 * by)
    }
}

/// Owned copy of a [`Presentation`] so the draw callback never borrows the
/// experience.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub stage: Stage,
    pub popup: PopupState,
    pub decline_offset: Offset,
    pub decline_scale: f64,
    pub accept_growth: f64,
    pub accept_share: f64,
    pub nudge: bool,
    pub decline_image: Option<AssetRef>,
    pub carousel_image: Option<AssetRef>,
    pub video: Option<AssetRef>,
}

impl From<&Presentation<'_>> for Frame {
    fn from(p: &Presentation<'_>) -> Self {
        Self {
            stage: p.stage,
            popup: p.popup,
            decline_offset: p.decline_offset,
            decline_scale: p.decline_scale,
            accept_growth: p.accept_growth,
            accept_share: p.accept_share,
            nudge: p.nudge,
            decline_image: p.decline_image.cloned(),
            carousel_image: p.carousel_image.cloned(),
            video: p.video.cloned(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Target {
    #[default]
    Nothing,
    Reset,
    Envelope,
    Accept,
    Decline,
    Popup,
    Backdrop,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Layout {
    pub width: f64,
    pub height: f64,
    pub envelope: Rect,
    pub card: Rect,
    pub accept: Rect,
    pub decline: Rect,
    pub reset: Rect,
    pub popup: Option<Rect>,
    pub image: Option<Rect>,
    pub video: Option<Rect>,
}

impl Layout {
    pub fn compute(frame: &Frame, width: f64, height: f64, corner: Corner) -> Self {
        let center = Point::new(width / 2.0, height / 2.0);
        let room = (width - 2.0 * POPUP_INSET).max(0.0);

        let envelope = Rect::centered(center, ENVELOPE_WIDTH.min(room), ENVELOPE_HEIGHT);
        let card = Rect::centered(center, CARD_MAX_WIDTH.min(room), CARD_HEIGHT);

        let row = Rect::new(
            card.x + CARD_PADDING,
            card.y + BUTTON_ROW_TOP,
            card.w - 2.0 * CARD_PADDING,
            BUTTON_HEIGHT,
        );
        let usable = (row.w - BUTTON_GAP).max(0.0);
        let accept_w = usable * frame.accept_share;
        let nudge = if frame.nudge { NUDGE_OFFSET } else { 0.0 };

        let accept = Rect::new(row.x + nudge, row.y, accept_w, row.h).scaled(frame.accept_growth);
        let decline = Rect::new(row.x + accept_w + BUTTON_GAP, row.y, usable - accept_w, row.h)
            .translated(frame.decline_offset.x, frame.decline_offset.y)
            .scaled(frame.decline_scale);

        let (popup, image, video) = match frame.popup {
            PopupState::None => (None, None, None),
            PopupState::Decline => {
                let popup = Rect::centered(
                    center,
                    DECLINE_POPUP_WIDTH.min(room),
                    DECLINE_POPUP_HEIGHT,
                );
                let inner = popup.inset(POPUP_INSET);
                // caption strip below the picture
                let image = Rect::new(inner.x, inner.y, inner.w, inner.h - 56.0);
                (Some(popup), Some(image), None)
            }
            PopupState::Accept => {
                let popup = Rect::centered(
                    center,
                    ACCEPT_POPUP_WIDTH.min(room),
                    ACCEPT_POPUP_MAX_HEIGHT.min((height - 2.0 * POPUP_INSET).max(0.0)),
                );
                let inner = popup.inset(POPUP_INSET);
                let image_h = inner.h * IMAGE_SHARE;
                let image = Rect::new(inner.x, inner.y, inner.w, image_h);
                let video = Rect::new(
                    inner.x,
                    inner.y + image_h + 12.0,
                    inner.w,
                    inner.h - image_h - 12.0,
                );
                (Some(popup), Some(image), Some(video))
            }
        };

        Self {
            width,
            height,
            envelope,
            card,
            accept,
            decline,
            reset: reset_rect(width, height, corner),
            popup,
            image,
            video,
        }
    }

    pub fn hit(&self, frame: &Frame, p: Point) -> Target {
        if self.reset.contains(p) {
            return Target::Reset;
        }

        if let Some(popup) = self.popup {
            return if popup.contains(p) {
                Target::Popup
            } else {
                Target::Backdrop
            };
        }

        match frame.stage {
            Stage::Closed if self.envelope.contains(p) => Target::Envelope,
            // decline is drawn on top of accept
            Stage::Open if self.decline.contains(p) => Target::Decline,
            Stage::Open if self.accept.contains(p) => Target::Accept,
            _ => Target::Nothing,
        }
    }
}

fn reset_rect(width: f64, height: f64, corner: Corner) -> Rect {
    let left = RESET_MARGIN;
    let right = width - RESET_MARGIN - RESET_WIDTH;
    let top = RESET_MARGIN;
    let bottom = height - RESET_MARGIN - RESET_HEIGHT;

    let (x, y) = match corner {
        Corner::NorthWest => (left, top),
        Corner::NorthEast => (right, top),
        Corner::SouthWest => (left, bottom),
        Corner::SouthEast => (right, bottom),
    };
    Rect::new(x, y, RESET_WIDTH, RESET_HEIGHT)
}

/// Decoded pictures keyed by asset reference. Missing files are skipped and
/// drawn as placeholders.
#[derive(Default)]
pub struct Images {
    pixbufs: HashMap<AssetRef, Pixbuf>,
}

impl Images {
    pub fn load(view: &ViewConfig, assets: &Assets) -> Self {
        let mut images = Self::default();
        images.preload(view, assets);
        images
    }

    pub fn preload(&mut self, view: &ViewConfig, assets: &Assets) {
        for asset in assets
            .images
            .iter()
            .chain(std::iter::once(&assets.decline_image))
        {
            if self.pixbufs.contains_key(asset) {
                continue;
            }
            let path = view.resolve(asset);
            match Pixbuf::from_file(&path) {
                Ok(pixbuf) => {
                    self.pixbufs.insert(asset.clone(), pixbuf);
                }
                Err(e) => log::warn!("Failed to load image {}: {}", path.display(), e),
            }
        }
    }

    pub fn get(&self, asset: &AssetRef) -> Option<&Pixbuf> {
        self.pixbufs.get(asset)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CursorAction {
    pub should_redraw: bool,
    pub entered_decline: bool,
}

impl CursorAction {
    pub fn new(should_redraw: bool, entered_decline: bool) -> Self {
        Self {
            should_redraw,
            entered_decline,
        }
    }
}

/// Background decoration. `x` and `y` are fractions of the window size.
#[derive(Debug, Clone, PartialEq)]
pub struct Heart {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub opacity: f64,
    pub period: f64,
    pub delay: f64,
}

impl Heart {
    pub fn scatter(count: usize, rng: &mut impl Rng) -> Vec<Heart> {
        (0..count)
            .map(|_| Heart {
                x: rng.gen_range(0.04..0.96),
                y: rng.gen_range(0.06..0.92),
                size: rng.gen_range(14.0..34.0),
                opacity: rng.gen_range(0.08..0.24),
                period: rng.gen_range(5.0..9.0),
                delay: rng.gen_range(0.0..2.5),
            })
            .collect()
    }

    pub fn center(&self, width: f64, height: f64) -> Point {
        Point::new(self.x * width, self.y * height)
    }

    /// Upward drift in pixels at `time` seconds, in `[0, HEART_DRIFT]`.
    pub fn rise(&self, time: f64) -> f64 {
        let phase = ((time + self.delay) / self.period).rem_euclid(1.0);
        HEART_DRIFT * (1.0 - (phase * TAU).cos()) / 2.0
    }
}

pub struct State {
    pub frame: Frame,
    pub layout: Layout,
    pub view: ViewConfig,
    pub images: Images,
    pub hovered: Target,
    pub hearts: Vec<Heart>,
    /// Frame clock in seconds, drives the hearts.
    pub clock: f64,
}

impl State {
    pub fn new(frame: Frame, view: ViewConfig, images: Images) -> Self {
        Self {
            frame,
            layout: Layout::default(),
            view,
            images,
            hovered: Target::Nothing,
            hearts: Heart::scatter(HEART_COUNT, &mut rand::thread_rng()),
            clock: 0.0,
        }
    }

    pub fn set_frame(&mut self, frame: Frame) {
        self.frame = frame;
        self.relayout(self.layout.width, self.layout.height);
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        if (width, height) != (self.layout.width, self.layout.height) {
            self.relayout(width, height);
        }
    }

    fn relayout(&mut self, width: f64, height: f64) {
        self.layout = Layout::compute(&self.frame, width, height, self.view.reset_corner);
    }

    pub fn target_at(&self, p: Point) -> Target {
        self.layout.hit(&self.frame, p)
    }

    /// Tracks hover. `entered_decline` is reported only when the pointer moves
    /// onto the decline control from somewhere else.
    pub fn update_cursor(&mut self, cursor: Point) -> CursorAction {
        let target = self.target_at(cursor);
        let changed = self.hovered != target;
        let entered_decline = changed && target == Target::Decline;
        self.hovered = target;

        CursorAction::new(changed, entered_decline)
    }

    pub fn clear_hover(&mut self) -> CursorAction {
        let changed = self.hovered != Target::Nothing;
        self.hovered = Target::Nothing;
        CursorAction::new(changed, false)
    }
}
