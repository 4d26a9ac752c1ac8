//! UI components: the details loader container and the learner table.

pub mod component;
pub mod details_loader;
pub mod waiting_step_list;

pub use details_loader::DetailsLoaderComponent;
