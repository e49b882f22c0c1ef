mod canvas;
mod component;
mod driver;
mod logos;
mod physics;
mod render;
mod scene;
mod surface;
mod types;

pub use component::NetworkBackdrop;
