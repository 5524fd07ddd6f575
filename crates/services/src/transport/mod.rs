mod controller;
mod in_memory;
mod resource;
mod view;

pub use controller::{
    LoadState, MediaTransportController, SEEK_TOLERANCE_SECONDS, TransportNotification,
};
pub use in_memory::{InMemoryMediaResource, InMemoryResourceFactory, ResourceCommand};
pub use resource::{MediaResource, ResourceEvent, ResourceFactory};
pub use view::TransportView;
