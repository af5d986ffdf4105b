pub mod model;
pub mod view;

pub use model::{CursorAction, Frame, Layout, Point, Rect, State, Target};
pub use view::draw;

pub const ENVELOPE_WIDTH: f64 = 460.0;
pub const ENVELOPE_HEIGHT: f64 = 310.0;
pub const CARD_MAX_WIDTH: f64 = 860.0;
pub const CARD_HEIGHT: f64 = 420.0;
pub const CARD_PADDING: f64 = 56.0;
pub const BUTTON_ROW_TOP: f64 = 240.0; // from card top
pub const BUTTON_HEIGHT: f64 = 64.0;
pub const BUTTON_GAP: f64 = 24.0;
pub const NUDGE_OFFSET: f64 = 12.0;
pub const RESET_WIDTH: f64 = 96.0;
pub const RESET_HEIGHT: f64 = 36.0;
pub const RESET_MARGIN: f64 = 20.0;
pub const DECLINE_POPUP_WIDTH: f64 = 420.0;
pub const DECLINE_POPUP_HEIGHT: f64 = 360.0;
pub const ACCEPT_POPUP_WIDTH: f64 = 520.0;
pub const ACCEPT_POPUP_MAX_HEIGHT: f64 = 760.0;
pub const POPUP_INSET: f64 = 24.0;
pub const IMAGE_SHARE: f64 = 0.62; // of the accept popup's inner height
pub const CORNER_RADIUS: f64 = 18.0;
pub const HEART_COUNT: usize = 14;
pub const HEART_DRIFT: f64 = 14.0;
