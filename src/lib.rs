pub mod data;
pub mod model;
pub mod protocol;
pub mod session;
pub mod view_models;

pub use session::QuizSession;
