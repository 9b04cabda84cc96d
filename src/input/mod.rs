mod event;
mod reader;

pub use event::{modal_action, normal_action, Action, ModalAction};
pub use reader::EventReader;
