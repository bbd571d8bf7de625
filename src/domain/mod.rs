pub mod profile;
pub mod question;
pub mod session;
pub mod study_material;

pub use profile::Profile;
pub use question::{AnswerChoice, Question, Subject};
pub use session::NewSession;
pub use study_material::{Flashcard, Note};
