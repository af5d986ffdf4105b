use crate::evasion::Offset;
use crate::popup::PopupState;
use crate::push::PushState;
use crate::settings::{AssetRef, Assets};
use crate::stage::Stage;

const ENGAGED_ACCEPT_SHARE: f64 = 0.66;

/// Everything a renderer needs for one frame, derived from the current state.
#[derive(Debug, Clone, PartialEq)]
pub struct Presentation<'a> {
    pub stage: Stage,
    pub popup: PopupState,
    pub decline_offset: Offset,
    pub decline_scale: f64,
    pub accept_growth: f64,
    /// Fraction of the button row given to the accept control.
    pub accept_share: f64,
    pub nudge: bool,
    pub decline_image: Option<&'a AssetRef>,
    pub carousel_image: Option<&'a AssetRef>,
    pub video: Option<&'a AssetRef>,
}

impl<'a> Presentation<'a> {
    pub fn derive(
        stage: Stage,
        popup: PopupState,
        push: PushState,
        position: Offset,
        carousel_index: Option<usize>,
        assets: &'a Assets,
    ) -> Self {
        let accepting = popup == PopupState::Accept;

        Self {
            stage,
            popup,
            decline_offset: Offset::new(position.x + push.decline_shift(), position.y),
            decline_scale: push.decline_scale(),
            accept_growth: push.accept_growth(),
            accept_share: if push.engaged() {
                ENGAGED_ACCEPT_SHARE
            } else {
                0.5
            },
            nudge: push.nudging(),
            decline_image: (popup == PopupState::Decline).then_some(&assets.decline_image),
            carousel_image: carousel_index.and_then(|i| assets.images.get(i)),
            video: accepting.then_some(&assets.video),
        }
    }
}
