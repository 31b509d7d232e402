pub mod pointer;
pub mod scroll;
pub mod window;

use crate::SharedPage;
use backdrop_core::effects::EffectTarget;

pub fn wire(page: &SharedPage, targets: &[EffectTarget], reduced_motion: bool) {
    pointer::wire_pointermove(page);
    pointer::wire_hover(page, targets, reduced_motion);
    scroll::wire(page);
    window::wire_resize(page);
    window::wire_visibility(page);
    window::wire_pagehide(page);
}
