mod confirm;
mod command_overlay;
mod filter_bar;
mod form_modal;
mod input;
mod key_result;
mod search_input;

pub use command_overlay::draw_command_overlay;
pub use confirm::draw_confirm;
pub use filter_bar::{FilterBar, FilterBarEvent};
pub use form_modal::draw_form_modal;
pub use input::{InputResult, TextInput};
pub use key_result::KeyResult;
pub use search_input::{SearchEvent, SearchInput};
