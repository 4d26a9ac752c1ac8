mod state;
mod waiting_step_list_component;

pub use state::{WaitingStepListOptions, WaitingStepListState};
pub use waiting_step_list_component::{FIND_LEARNER_BUTTON_ID, WaitingStepListComponent, display_cells};
