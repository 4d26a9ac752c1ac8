mod details_loader_component;
mod state;

pub use details_loader_component::DetailsLoaderComponent;
pub use state::{DetailsLoaderState, LoaderHooks};
